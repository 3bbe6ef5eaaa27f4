//! Tabular inputs and outputs: the path definition list and the wide SST table.

pub mod anomaly;

use std::{fs::File, io, path::Path};

use serde::Deserialize;

use crate::error::{ConveyorError, Result};

pub use anomaly::{AnomalyTable, Point};

/// Leading key columns of the SST table, followed by one column per year.
pub const KEY_COLUMNS: [&str; 3] = ["path", "longitude", "latitude"];

/// One vertex of a conveyor path, as listed in the path definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PathPoint {
    pub path: u8,
    pub longitude: i32,
    pub latitude: i32,
}

/// Reads the path definitions, keeping file order. Columns other than
/// `path`, `longitude` and `latitude` are ignored.
pub fn read_path_points(file_path: &Path) -> Result<Vec<PathPoint>> {
    read_path_points_from(File::open(file_path)?)
}

pub fn read_path_points_from<R: io::Read>(reader: R) -> Result<Vec<PathPoint>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut points = Vec::new();

    for record in reader.deserialize() {
        let point: PathPoint = record?;
        check_path_id(point.path as i64)?;
        points.push(point);
    }

    Ok(points)
}

/// A row of the SST table: one geographic point and its annual means.
#[derive(Debug, Clone, PartialEq)]
pub struct SstRow {
    pub path: u8,
    pub longitude: i32,
    pub latitude: i32,
    pub values: Vec<Option<f64>>,
}

/// Wide table of annual mean SST, one column per year.
#[derive(Debug, Clone, PartialEq)]
pub struct SstTable {
    pub years: Vec<i32>,
    pub rows: Vec<SstRow>,
}

impl SstTable {
    pub fn new(years: Vec<i32>) -> Self {
        SstTable {
            years,
            rows: Vec::new(),
        }
    }

    pub fn read_csv(file_path: &Path) -> Result<Self> {
        Self::from_reader(File::open(file_path)?)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = reader.headers()?.clone();
        let keys: Vec<&str> = headers.iter().take(KEY_COLUMNS.len()).collect();
        if keys != KEY_COLUMNS {
            return Err(ConveyorError::MalformedTable(format!(
                "expected leading columns {:?}, found {:?}",
                KEY_COLUMNS, keys
            )));
        }

        let years = headers
            .iter()
            .skip(KEY_COLUMNS.len())
            .map(|h| {
                h.parse::<i32>()
                    .map_err(|_| ConveyorError::MalformedTable(format!("column `{h}` is not a year")))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut table = SstTable::new(years);
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            table.push(parse_row(&record, line + 2)?)?;
        }

        Ok(table)
    }

    /// Writes the table as CSV; missing values become empty cells.
    pub fn to_writer<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);

        let mut header: Vec<String> = KEY_COLUMNS.iter().map(|c| c.to_string()).collect();
        header.extend(self.years.iter().map(|y| y.to_string()));
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![
                row.path.to_string(),
                row.longitude.to_string(),
                row.latitude.to_string(),
            ];
            record.extend(row.values.iter().map(|v| v.map(|v| v.to_string()).unwrap_or_default()));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn push(&mut self, row: SstRow) -> Result<()> {
        if row.values.len() != self.years.len() {
            return Err(ConveyorError::MalformedTable(format!(
                "row at ({}, {}) has {} values for {} years",
                row.longitude,
                row.latitude,
                row.values.len(),
                self.years.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn year_index(&self, year: i32) -> Option<usize> {
        self.years.iter().position(|&y| y == year)
    }
}

fn parse_row(record: &csv::StringRecord, line: usize) -> Result<SstRow> {
    let field = |i: usize| record.get(i).unwrap_or("");
    let malformed = |what: &str, value: &str| {
        ConveyorError::MalformedTable(format!("line {line}: invalid {what} `{value}`"))
    };

    let path = field(0).parse::<i64>().map_err(|_| malformed("path", field(0)))?;
    let path = check_path_id(path)?;
    let longitude = field(1).parse::<i32>().map_err(|_| malformed("longitude", field(1)))?;
    let latitude = field(2).parse::<i32>().map_err(|_| malformed("latitude", field(2)))?;

    let values = record
        .iter()
        .skip(KEY_COLUMNS.len())
        .map(|cell| match cell {
            "" => Ok(None),
            cell => cell.parse::<f64>().map(Some).map_err(|_| malformed("value", cell)),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SstRow {
        path,
        longitude,
        latitude,
        values,
    })
}

fn check_path_id(path: i64) -> Result<u8> {
    match path {
        1 | 2 => Ok(path as u8),
        other => Err(ConveyorError::UnknownPath(other)),
    }
}

// -- Tests -------------------------------------------------------------------
