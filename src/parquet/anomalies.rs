//! Save the SST table and its anomalies to a parquet file in long format.

use std::{collections::HashMap, fs::File, path::Path, sync::Arc};

use arrow::{
    array::{ArrayRef, Float64Array, Int32Array, UInt8Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, file::properties::WriterProperties};

use crate::{
    error::Result,
    table::{AnomalyTable, Point, SstTable},
};

/// One row per (point, year). Missing measurements and anomalies are nulls.
pub fn save_anomalies(sst: &SstTable, anomalies: &AnomalyTable, file_path: &Path) -> Result<usize> {
    let file = File::create(file_path)?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("path", DataType::UInt8, false),
        Field::new("longitude", DataType::Int32, false),
        Field::new("latitude", DataType::Int32, false),
        Field::new("year", DataType::Int32, false),
        Field::new("sst", DataType::Float64, true),
        Field::new("anomaly", DataType::Float64, true),
    ]));

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

    let points: HashMap<(u8, i32, i32), &Point> = anomalies
        .points()
        .map(|p| ((p.path, p.longitude, p.latitude), p))
        .collect();

    let num_rows = sst.rows.len() * sst.years.len();

    let mut paths = Vec::with_capacity(num_rows);
    let mut longitudes = Vec::with_capacity(num_rows);
    let mut latitudes = Vec::with_capacity(num_rows);
    let mut years = Vec::with_capacity(num_rows);
    let mut values = Vec::with_capacity(num_rows);
    let mut deltas = Vec::with_capacity(num_rows);

    for row in &sst.rows {
        let point = points.get(&(row.path, row.longitude, row.latitude));
        for (&year, &value) in sst.years.iter().zip(&row.values) {
            paths.push(row.path);
            longitudes.push(row.longitude);
            latitudes.push(row.latitude);
            years.push(year);
            values.push(value);
            deltas.push(point.and_then(|p| p.anomaly(year)));
        }
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(UInt8Array::from(paths)),
        Arc::new(Int32Array::from(longitudes)),
        Arc::new(Int32Array::from(latitudes)),
        Arc::new(Int32Array::from(years)),
        Arc::new(Float64Array::from(values)),
        Arc::new(Float64Array::from(deltas)),
    ];

    let batch = RecordBatch::try_new(schema, columns)?;

    writer.write(&batch)?;
    writer.close()?;

    Ok(num_rows)
}

// -- Tests -------------------------------------------------------------------
