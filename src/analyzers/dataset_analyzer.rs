use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

use crate::error::{PipelineError, Result};
use crate::models::{DailyRecord, Pollutant, POLLUTANT_COUNT};

/// Coverage and range statistics over a daily aggregate, for the
/// `info` command and post-run summaries.
#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub unique_stations: usize,
    pub date_range: (NaiveDate, NaiveDate),
    pub geographic_bounds: GeographicBounds,
    pub pollutant_coverage: Vec<PollutantCoverage>,
}

#[derive(Debug, Serialize)]
pub struct GeographicBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

#[derive(Debug, Serialize)]
pub struct PollutantCoverage {
    pub pollutant: Pollutant,
    pub records_with_data: usize,
    pub mean: Option<f64>,
}

impl PollutantCoverage {
    pub fn coverage_percentage(&self, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        (self.records_with_data as f64 / total as f64) * 100.0
    }
}

pub struct DatasetAnalyzer;

impl DatasetAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, records: &[DailyRecord]) -> Result<DatasetSummary> {
        if records.is_empty() {
            return Err(PipelineError::InvalidFormat(
                "no records to analyze".to_string(),
            ));
        }

        let mut stations = HashSet::new();
        let mut min_date = records[0].date;
        let mut max_date = records[0].date;
        let mut bounds = GeographicBounds {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        let mut sums = [0.0f64; POLLUTANT_COUNT];
        let mut counts = [0usize; POLLUTANT_COUNT];

        for record in records {
            stations.insert(record.station_name.clone());
            min_date = min_date.min(record.date);
            max_date = max_date.max(record.date);

            if let (Some(lat), Some(lon)) = (record.latitude, record.longitude) {
                bounds.min_lat = bounds.min_lat.min(lat);
                bounds.max_lat = bounds.max_lat.max(lat);
                bounds.min_lon = bounds.min_lon.min(lon);
                bounds.max_lon = bounds.max_lon.max(lon);
            }

            for (i, value) in record.values.iter().enumerate() {
                if let Some(v) = value {
                    sums[i] += v;
                    counts[i] += 1;
                }
            }
        }

        let pollutant_coverage = Pollutant::ALL
            .iter()
            .enumerate()
            .map(|(i, &pollutant)| PollutantCoverage {
                pollutant,
                records_with_data: counts[i],
                mean: (counts[i] > 0).then(|| sums[i] / counts[i] as f64),
            })
            .collect();

        Ok(DatasetSummary {
            total_records: records.len(),
            unique_stations: stations.len(),
            date_range: (min_date, max_date),
            geographic_bounds: bounds,
            pollutant_coverage,
        })
    }
}

impl Default for DatasetAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetSummary {
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str("Dataset Summary\n");
        out.push_str("===============\n");
        out.push_str(&format!("Records:  {}\n", self.total_records));
        out.push_str(&format!("Stations: {}\n", self.unique_stations));
        out.push_str(&format!(
            "Range:    {} to {}\n",
            self.date_range.0, self.date_range.1
        ));
        out.push_str(&format!(
            "Bounds:   lat [{:.4}, {:.4}], lon [{:.4}, {:.4}]\n",
            self.geographic_bounds.min_lat,
            self.geographic_bounds.max_lat,
            self.geographic_bounds.min_lon,
            self.geographic_bounds.max_lon
        ));
        out.push_str("\nPollutant coverage:\n");
        for coverage in &self.pollutant_coverage {
            match coverage.mean {
                Some(mean) => out.push_str(&format!(
                    "  {:>5}: {:6.1}% of records, mean {:.2}\n",
                    coverage.pollutant.column_name(),
                    coverage.coverage_percentage(self.total_records),
                    mean
                )),
                None => out.push_str(&format!(
                    "  {:>5}: no data\n",
                    coverage.pollutant.column_name()
                )),
            }
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PipelineError::InvalidFormat(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PollutantValues;
    use chrono::Datelike;

    fn record(name: &str, date: &str, pm25: Option<f64>) -> DailyRecord {
        let mut values: PollutantValues = Default::default();
        values[Pollutant::Pm25.index()] = pm25;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        DailyRecord {
            station_name: name.to_string(),
            latitude: Some(40.42),
            longitude: Some(-3.71),
            date,
            year: date.year(),
            month: date.month(),
            values,
            cigarettes: pm25.map(|v| v / 22.0),
        }
    }

    #[test]
    fn test_summary_statistics() {
        let records = vec![
            record("Vallecas", "2015-01-07", Some(10.0)),
            record("Vallecas", "2015-01-08", Some(30.0)),
            record("Barajas Pueblo", "2015-02-01", None),
        ];

        let summary = DatasetAnalyzer::new().analyze(&records).unwrap();

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.unique_stations, 2);
        assert_eq!(
            summary.date_range,
            (
                NaiveDate::from_ymd_opt(2015, 1, 7).unwrap(),
                NaiveDate::from_ymd_opt(2015, 2, 1).unwrap()
            )
        );

        let pm25 = summary
            .pollutant_coverage
            .iter()
            .find(|c| c.pollutant == Pollutant::Pm25)
            .unwrap();
        assert_eq!(pm25.records_with_data, 2);
        assert_eq!(pm25.mean, Some(20.0));
        assert!((pm25.coverage_percentage(3) - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_empty_dataset_fails() {
        assert!(DatasetAnalyzer::new().analyze(&[]).is_err());
    }

    #[test]
    fn test_json_output() {
        let records = vec![record("Vallecas", "2015-01-07", Some(10.0))];
        let summary = DatasetAnalyzer::new().analyze(&records).unwrap();
        let json = summary.to_json().unwrap();
        assert!(json.contains("\"total_records\": 1"));
    }
}
