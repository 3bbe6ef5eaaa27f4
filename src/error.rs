//! Errors raised while loading, fetching and rendering conveyor data.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConveyorError {
    #[error("path {path} needs at least {required} point(s), found {found}")]
    PathTooShort {
        path: u8,
        required: usize,
        found: usize,
    },

    #[error("path {0} is missing from the table")]
    MissingPath(u8),

    #[error("unknown path id {0}, expected 1 (open) or 2 (closed)")]
    UnknownPath(i64),

    #[error("year {0} is not a column of the table")]
    UnknownYear(i32),

    #[error("no anomaly for point {index} of path {path} in {year}")]
    MissingAnomaly { path: u8, index: usize, year: i32 },

    #[error("malformed table: {0}")]
    MalformedTable(String),

    #[error("no samples returned for longitude {longitude}, latitude {latitude}")]
    NoData { longitude: i32, latitude: i32 },

    #[error("`{}` is not a readable TrueType font", .0.display())]
    InvalidFont(std::path::PathBuf),

    #[error("remote source responded with status {0}")]
    RemoteStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
}

pub type Result<T, E = ConveyorError> = std::result::Result<T, E>;
