//! Query the remote source for every path point and cache the SST table.

use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tempfile::NamedTempFile;

use super::Settings;
use crate::{cli::create_progress_bar, fetch, fetch::CmapClient, table};

pub struct FetchOptions {
    pub force: bool,
    pub api_key: Option<String>,
    pub table: String,
    pub variable: String,
    pub first_year: i32,
    pub last_year: i32,
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiKeyRecord {
    #[serde(rename = "apiKey")]
    api_key: String,
}

pub async fn fetch(settings: &Settings, options: FetchOptions) -> Result<PathBuf> {
    let sst_path = settings.sst_table();
    if sst_path.is_file() && !options.force {
        log::info!("`{}` exists, skipping fetch", sst_path.display());
        return Ok(sst_path);
    }
    if options.first_year > options.last_year {
        return Err(anyhow!(
            "first year {} is after last year {}",
            options.first_year,
            options.last_year
        ));
    }

    let api_key = match options.api_key {
        Some(key) => key,
        None => read_api_key(&settings.api_key())?,
    };
    let points_path = settings.path_points();
    let points = table::read_path_points(&points_path)
        .with_context(|| format!("reading path points from `{}`", points_path.display()))?;
    log::info!("{} path points loaded", points.len());

    let client = CmapClient::new(&api_key, &options.table, &options.variable).with_base_url(&options.base_url);
    let bar = create_progress_bar(points.len() as u64, "Fetching SST time series...".to_string());
    let sst = fetch::acquire(&client, &points, options.first_year..=options.last_year, &bar).await?;
    bar.finish_with_message("SST time series fetched");

    fs::create_dir_all(&settings.data_dir)?;
    let tmp = NamedTempFile::new_in(&settings.data_dir)?;
    sst.to_writer(BufWriter::new(tmp.as_file()))?;
    tmp.persist(&sst_path)
        .with_context(|| format!("saving `{}`", sst_path.display()))?;

    Ok(sst_path)
}

/// Reads the first key from a CSV file with an `apiKey` column.
pub fn read_api_key(file_path: &Path) -> Result<String> {
    let file = File::open(file_path).with_context(|| {
        format!(
            "no API key given and `{}` could not be opened",
            file_path.display()
        )
    })?;
    let mut reader = csv::Reader::from_reader(file);
    let record: ApiKeyRecord = reader
        .deserialize()
        .next()
        .ok_or_else(|| anyhow!("`{}` contains no API key", file_path.display()))??;

    Ok(record.api_key.trim().to_string())
}

// -- Tests -------------------------------------------------------------------
