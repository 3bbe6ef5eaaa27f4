//! Handles serialising and saving data to disk in the _parquet_ file format.

pub mod anomalies;

pub use anomalies::save_anomalies;
