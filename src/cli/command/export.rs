//! Export the SST table and its anomalies to parquet.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::Settings;
use crate::{
    cli::create_spinner,
    parquet,
    table::{AnomalyTable, SstTable},
};

pub fn export(settings: &Settings, output: Option<PathBuf>, baseline_year: Option<i32>) -> Result<PathBuf> {
    let sst_path = settings.sst_table();
    let sst = SstTable::read_csv(&sst_path)
        .with_context(|| format!("reading SST table from `{}`", sst_path.display()))?;
    let anomalies = AnomalyTable::from_sst(&sst, baseline_year)?;

    let file_path = output.unwrap_or_else(|| settings.anomalies_parquet());
    let bar = create_spinner("Writing parquet file...".to_string());
    let rows = parquet::save_anomalies(&sst, &anomalies, &file_path)
        .with_context(|| format!("writing `{}`", file_path.display()))?;
    bar.finish_with_message("Parquet file written");
    log::info!("{rows} rows exported");

    Ok(file_path)
}
