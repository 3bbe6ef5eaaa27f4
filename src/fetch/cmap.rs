//! Client for the Simons CMAP time-series endpoint.
//!
//! A query is a stored-procedure call returning CSV with `time`, `lat`, `lon`
//! and the requested variable as columns.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use reqwest::header::AUTHORIZATION;

use super::{Sample, SeriesQuery, SeriesSource};
use crate::error::{ConveyorError, Result};

pub const DEFAULT_BASE_URL: &str = "https://simonscmap.com";
pub const DEFAULT_TABLE: &str = "tblSST_AVHRR_OI_NRT";
pub const DEFAULT_VARIABLE: &str = "sst";

const TIME_SERIES_PROCEDURE: &str = "uspTimeSeries";

#[derive(Debug, Clone)]
pub struct CmapClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
    variable: String,
}

impl CmapClient {
    pub fn new(api_key: &str, table: &str, variable: &str) -> Self {
        CmapClient {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            table: table.to_string(),
            variable: variable.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/data/sp", self.base_url)
    }

    /// Query string for a single-point time series.
    pub fn params(&self, query: &SeriesQuery) -> Vec<(&'static str, String)> {
        vec![
            ("spName", TIME_SERIES_PROCEDURE.to_string()),
            ("tableName", self.table.clone()),
            ("fields", self.variable.clone()),
            ("dt1", query.start.format("%Y-%m-%d").to_string()),
            ("dt2", query.end.format("%Y-%m-%d").to_string()),
            ("lat1", query.lat.to_string()),
            ("lat2", query.lat.to_string()),
            ("lon1", query.lon.to_string()),
            ("lon2", query.lon.to_string()),
            ("depth1", query.depth.to_string()),
            ("depth2", query.depth.to_string()),
        ]
    }
}

impl SeriesSource for CmapClient {
    async fn time_series(&self, query: &SeriesQuery) -> Result<Vec<Sample>> {
        let response = self
            .http
            .get(self.endpoint())
            .header(AUTHORIZATION, format!("Api-Key {}", self.api_key))
            .query(&self.params(query))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ConveyorError::RemoteStatus(response.status()));
        }

        let body = response.text().await?;
        parse_samples(&body, &self.variable)
    }
}

/// Parses the CSV body of a time-series response. Empty or `NaN` cells are
/// missing values; an unparseable timestamp is an error.
pub fn parse_samples(body: &str, variable: &str) -> Result<Vec<Sample>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(body.as_bytes());
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ConveyorError::MalformedTable(format!("response has no `{name}` column")))
    };
    let (time, lat, lon, measured) = (column("time")?, column("lat")?, column("lon")?, column(variable)?);

    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |i: usize| record.get(i).unwrap_or("");
        let number = |i: usize| {
            cell(i)
                .parse::<f64>()
                .map_err(|_| ConveyorError::MalformedTable(format!("invalid number `{}`", cell(i))))
        };

        let year = parse_year(cell(time))
            .ok_or_else(|| ConveyorError::MalformedTable(format!("invalid timestamp `{}`", cell(time))))?;
        let value = match cell(measured) {
            "" => None,
            text => text.parse::<f64>().ok().filter(|v| v.is_finite()),
        };

        samples.push(Sample {
            year,
            lat: number(lat)?,
            lon: number(lon)?,
            value,
        });
    }

    Ok(samples)
}

/// Year of an ISO-8601 timestamp or date.
pub fn parse_year(time: &str) -> Option<i32> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(time) {
        return Some(dt.year());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(time, format) {
            return Some(dt.year());
        }
    }
    NaiveDate::parse_from_str(time, "%Y-%m-%d").ok().map(|d| d.year())
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::PathPoint;

    #[test]
    fn should_build_time_series_params() {
        let client = CmapClient::new("key", DEFAULT_TABLE, DEFAULT_VARIABLE);
        let point = PathPoint {
            path: 1,
            longitude: -30,
            latitude: 10,
        };
        let query = SeriesQuery::for_point(&point, &(1982..=2021)).unwrap();
        let params = client.params(&query);

        assert!(params.contains(&("spName", "uspTimeSeries".to_string())));
        assert!(params.contains(&("tableName", "tblSST_AVHRR_OI_NRT".to_string())));
        assert!(params.contains(&("fields", "sst".to_string())));
        assert!(params.contains(&("dt1", "1982-01-01".to_string())));
        assert!(params.contains(&("dt2", "2021-12-31".to_string())));
        assert!(params.contains(&("lon1", "-29.875".to_string())));
        assert!(params.contains(&("lat2", "10.125".to_string())));
        assert!(params.contains(&("depth1", "0".to_string())));
    }

    #[test]
    fn should_trim_base_url() {
        let client = CmapClient::new("key", "t", "v").with_base_url("http://localhost:8080/");
        assert_eq!(client.endpoint(), "http://localhost:8080/api/data/sp");
    }

    #[test]
    fn should_parse_response_body() {
        let body = "\
time,lat,lon,sst,sst_std
1982-01-01T00:00:00.000Z,10.125,-29.875,25.5,0.1
1982-01-02T00:00:00.000Z,10.125,-29.875,,0.1
1983-06-01,10.125,-29.875,NaN,
";
        let samples = parse_samples(body, "sst").unwrap();

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].year, 1982);
        assert_eq!(samples[0].lon, -29.875);
        assert_eq!(samples[0].value, Some(25.5));
        assert_eq!(samples[1].value, None);
        assert_eq!(samples[2].year, 1983);
        assert_eq!(samples[2].value, None);
    }

    #[test]
    fn should_reject_response_without_variable() {
        let body = "time,lat,lon,chl\n1982-01-01,0,0,1.0\n";
        assert!(matches!(
            parse_samples(body, "sst"),
            Err(ConveyorError::MalformedTable(_))
        ));
    }

    #[test]
    fn should_parse_timestamp_years() {
        assert_eq!(parse_year("1999-12-31T23:59:59Z"), Some(1999));
        assert_eq!(parse_year("2001-03-04T05:06:07.000"), Some(2001));
        assert_eq!(parse_year("2010-01-01 00:00:00"), Some(2010));
        assert_eq!(parse_year("2021-07-15"), Some(2021));
        assert_eq!(parse_year("yesterday"), None);
    }
}
