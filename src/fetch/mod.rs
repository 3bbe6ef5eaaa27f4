//! Builds the wide SST table by querying a time-series source point by point.
//!
//! The source's grid is ¼° with cell centres at x.125, so each integer path
//! coordinate is queried at its cell centre and shifted back when stored.

pub mod cmap;

use std::{collections::BTreeMap, ops::RangeInclusive};

use chrono::NaiveDate;
use indicatif::ProgressBar;

use crate::{
    error::{ConveyorError, Result},
    table::{PathPoint, SstRow, SstTable},
};

pub use cmap::CmapClient;

/// Offset from an integer coordinate to the centre of its grid cell.
pub const GRID_OFFSET: f64 = 0.125;

pub const FIRST_YEAR: i32 = 1982;
pub const LAST_YEAR: i32 = 2021;

/// A single-point query over a date range at the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesQuery {
    pub lat: f64,
    pub lon: f64,
    pub depth: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SeriesQuery {
    /// Query for the grid cell of `point`, covering whole calendar years.
    pub fn for_point(point: &PathPoint, years: &RangeInclusive<i32>) -> Result<Self> {
        let invalid = || ConveyorError::MalformedTable(format!("invalid year range {years:?}"));
        let start = NaiveDate::from_ymd_opt(*years.start(), 1, 1).ok_or_else(invalid)?;
        let end = NaiveDate::from_ymd_opt(*years.end(), 12, 31).ok_or_else(invalid)?;

        Ok(SeriesQuery {
            lat: point.latitude as f64 + GRID_OFFSET,
            lon: point.longitude as f64 + GRID_OFFSET,
            depth: 0.0,
            start,
            end,
        })
    }
}

/// One timestamped measurement, reduced to its year.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub year: i32,
    pub lat: f64,
    pub lon: f64,
    pub value: Option<f64>,
}

/// Anything that can answer a [`SeriesQuery`].
#[allow(async_fn_in_trait)]
pub trait SeriesSource {
    async fn time_series(&self, query: &SeriesQuery) -> Result<Vec<Sample>>;
}

/// Coordinates as integer micro-degrees so they can be grouped on.
pub type CellKey = (i64, i64);

fn cell_key(lon: f64, lat: f64) -> CellKey {
    ((lon * 1e6).round() as i64, (lat * 1e6).round() as i64)
}

/// Mean of the non-missing samples per (cell, year). A cell whose samples are
/// all missing is kept with no years, so it still becomes a row.
pub fn annual_means(samples: &[Sample]) -> BTreeMap<CellKey, BTreeMap<i32, f64>> {
    let mut sums: BTreeMap<CellKey, BTreeMap<i32, (f64, usize)>> = BTreeMap::new();
    for sample in samples {
        let cell = sums.entry(cell_key(sample.lon, sample.lat)).or_default();
        let Some(value) = sample.value else {
            continue;
        };
        let entry = cell.entry(sample.year).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(cell, years)| {
            let means = years
                .into_iter()
                .map(|(year, (sum, count))| (year, sum / count as f64))
                .collect();
            (cell, means)
        })
        .collect()
}

/// One row per grid cell, with coordinates shifted back from cell centres.
pub fn pivot(path: u8, means: &BTreeMap<CellKey, BTreeMap<i32, f64>>, years: &[i32]) -> Vec<SstRow> {
    means
        .iter()
        .map(|(&(lon, lat), by_year)| SstRow {
            path,
            longitude: (lon as f64 / 1e6 - GRID_OFFSET).round() as i32,
            latitude: (lat as f64 / 1e6 - GRID_OFFSET).round() as i32,
            values: years.iter().map(|y| by_year.get(y).copied()).collect(),
        })
        .collect()
}

/// Queries every point in order and joins the results into one table. The
/// first failing query aborts the whole run.
pub async fn acquire<S: SeriesSource>(
    source: &S,
    points: &[PathPoint],
    years: RangeInclusive<i32>,
    progress: &ProgressBar,
) -> Result<SstTable> {
    let year_list: Vec<i32> = years.clone().collect();
    let mut table = SstTable::new(year_list.clone());

    for point in points {
        let query = SeriesQuery::for_point(point, &years)?;
        let samples = source.time_series(&query).await?;
        if samples.is_empty() {
            return Err(ConveyorError::NoData {
                longitude: point.longitude,
                latitude: point.latitude,
            });
        }
        log::debug!(
            "{} samples for ({}, {}) on path {}",
            samples.len(),
            point.longitude,
            point.latitude,
            point.path
        );

        for row in pivot(point.path, &annual_means(&samples), &year_list) {
            if !table.rows.contains(&row) {
                table.push(row)?;
            }
        }
        progress.inc(1);
    }

    Ok(table)
}

// -- Tests -------------------------------------------------------------------
