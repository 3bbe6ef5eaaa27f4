//! Per-year anomalies relative to a baseline year, grouped by path.

use std::collections::BTreeMap;

use crate::{
    error::{ConveyorError, Result},
    geodesic::GeoPoint,
};

use super::SstTable;

/// A path vertex with its anomaly for every year that has data.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub path: u8,
    pub longitude: i32,
    pub latitude: i32,
    pub anomaly_by_year: BTreeMap<i32, f64>,
}

impl Point {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::from((self.longitude, self.latitude))
    }

    pub fn anomaly(&self, year: i32) -> Option<f64> {
        self.anomaly_by_year.get(&year).copied()
    }
}

/// Anomalies for every point, grouped by path id in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyTable {
    years: Vec<i32>,
    baseline: i32,
    paths: BTreeMap<u8, Vec<Point>>,
}

impl AnomalyTable {
    /// Builds anomalies against `baseline`, or against the first year column
    /// when none is given. The baseline's own anomaly is exactly zero, even
    /// for points with no baseline measurement.
    pub fn from_sst(table: &SstTable, baseline: Option<i32>) -> Result<Self> {
        let baseline = match baseline {
            Some(year) => year,
            None => *table
                .years
                .first()
                .ok_or_else(|| ConveyorError::MalformedTable("table has no year columns".into()))?,
        };
        let base_index = table.year_index(baseline).ok_or(ConveyorError::UnknownYear(baseline))?;

        let mut paths: BTreeMap<u8, Vec<Point>> = BTreeMap::new();
        for row in &table.rows {
            let base = row.values[base_index];
            let anomaly_by_year = table
                .years
                .iter()
                .zip(&row.values)
                .filter_map(|(&year, value)| {
                    if year == baseline {
                        return Some((year, 0.0));
                    }
                    match (value, base) {
                        (Some(value), Some(base)) => Some((year, value - base)),
                        _ => None,
                    }
                })
                .collect();

            paths.entry(row.path).or_default().push(Point {
                path: row.path,
                longitude: row.longitude,
                latitude: row.latitude,
                anomaly_by_year,
            });
        }

        Ok(AnomalyTable {
            years: table.years.clone(),
            baseline,
            paths,
        })
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn baseline(&self) -> i32 {
        self.baseline
    }

    pub fn path(&self, id: u8) -> Result<&[Point]> {
        self.paths
            .get(&id)
            .map(Vec::as_slice)
            .ok_or(ConveyorError::MissingPath(id))
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.paths.values().flatten()
    }

    /// Largest absolute anomaly over every point and year; zero for an empty table.
    pub fn max_abs(&self) -> f64 {
        self.points()
            .flat_map(|p| p.anomaly_by_year.values())
            .fold(0.0, |acc: f64, v| acc.max(v.abs()))
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
path,longitude,latitude,1982,1983,1984
1,-30,10,20.0,21.5,19.0
2,60,-40,10.0,,7.25
1,-40,20,,19.0,18.0
";

    fn anomalies(baseline: Option<i32>) -> AnomalyTable {
        let table = SstTable::from_reader(TABLE.as_bytes()).unwrap();
        AnomalyTable::from_sst(&table, baseline).unwrap()
    }

    #[test]
    fn should_zero_baseline_for_every_point() {
        let table = anomalies(None);

        assert_eq!(table.baseline(), 1982);
        for point in table.points() {
            assert_eq!(point.anomaly(1982), Some(0.0));
        }
    }

    #[test]
    fn should_subtract_baseline() {
        let table = anomalies(None);
        let path1 = table.path(1).unwrap();

        assert_eq!(path1[0].anomaly(1983), Some(1.5));
        assert_eq!(path1[0].anomaly(1984), Some(-1.0));
        // No baseline measurement: only the baseline itself has an anomaly.
        assert_eq!(path1[1].anomaly(1983), None);

        let path2 = table.path(2).unwrap();
        assert_eq!(path2[0].anomaly(1983), None);
        assert_eq!(path2[0].anomaly(1984), Some(-2.75));
    }

    #[test]
    fn should_group_paths_in_input_order() {
        let table = anomalies(None);
        let path1 = table.path(1).unwrap();

        assert_eq!(path1.len(), 2);
        assert_eq!((path1[0].longitude, path1[0].latitude), (-30, 10));
        assert_eq!((path1[1].longitude, path1[1].latitude), (-40, 20));
        assert!(matches!(table.path(3), Err(ConveyorError::MissingPath(3))));
    }

    #[test]
    fn should_find_max_abs_anomaly() {
        assert_eq!(anomalies(None).max_abs(), 2.75);
    }

    #[test]
    fn should_use_requested_baseline() {
        let table = anomalies(Some(1984));
        let path1 = table.path(1).unwrap();

        assert_eq!(table.baseline(), 1984);
        assert_eq!(path1[0].anomaly(1982), Some(1.0));
        assert_eq!(path1[1].anomaly(1983), Some(1.0));
        assert_eq!(path1[1].anomaly(1984), Some(0.0));
        assert_eq!(table.max_abs(), 2.75);
    }

    #[test]
    fn should_reject_unknown_baseline() {
        let table = SstTable::from_reader(TABLE.as_bytes()).unwrap();
        assert!(matches!(
            AnomalyTable::from_sst(&table, Some(1999)),
            Err(ConveyorError::UnknownYear(1999))
        ));
    }

    #[test]
    fn should_report_zero_max_for_empty_table() {
        let table = SstTable::new(vec![1982]);
        assert_eq!(AnomalyTable::from_sst(&table, None).unwrap().max_abs(), 0.0);
    }
}
