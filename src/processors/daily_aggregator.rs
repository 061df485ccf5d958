use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

use crate::models::pollutant::{Pollutant, PollutantValues, POLLUTANT_COUNT};
use crate::models::{DailyRecord, RawReading};

/// Reduces raw readings to one record per (station, calendar day) by
/// averaging every pollutant over the day's readings, then derives
/// the cigarette equivalent from the PM2.5 mean.
pub struct DailyAggregator {
    pm25_cigarette_divisor: f64,
}

#[derive(Default)]
struct DayAccumulator {
    sums: [f64; POLLUTANT_COUNT],
    counts: [usize; POLLUTANT_COUNT],
    lat_sum: f64,
    lon_sum: f64,
    coord_count: usize,
}

impl DayAccumulator {
    fn add(&mut self, reading: &RawReading) {
        for (i, value) in reading.values.iter().enumerate() {
            if let Some(v) = value {
                self.sums[i] += v;
                self.counts[i] += 1;
            }
        }
        if let (Some(lat), Some(lon)) = (reading.latitude, reading.longitude) {
            self.lat_sum += lat;
            self.lon_sum += lon;
            self.coord_count += 1;
        }
    }

    fn means(&self) -> PollutantValues {
        let mut means: PollutantValues = Default::default();
        for i in 0..POLLUTANT_COUNT {
            if self.counts[i] > 0 {
                means[i] = Some(self.sums[i] / self.counts[i] as f64);
            }
        }
        means
    }

    fn coordinates(&self) -> (Option<f64>, Option<f64>) {
        if self.coord_count == 0 {
            (None, None)
        } else {
            let n = self.coord_count as f64;
            (Some(self.lat_sum / n), Some(self.lon_sum / n))
        }
    }
}

impl DailyAggregator {
    pub fn new(pm25_cigarette_divisor: f64) -> Self {
        Self {
            pm25_cigarette_divisor,
        }
    }

    /// Group readings by (station name, day) and average. Readings
    /// that failed the station join carry no name and cannot be
    /// grouped; they are skipped and counted.
    pub fn aggregate(&self, readings: &[RawReading]) -> Vec<DailyRecord> {
        let mut groups: HashMap<(String, NaiveDate), DayAccumulator> = HashMap::new();
        let mut unmatched = 0usize;

        for reading in readings {
            let Some(name) = &reading.station_name else {
                unmatched += 1;
                continue;
            };
            groups
                .entry((name.clone(), reading.day()))
                .or_default()
                .add(reading);
        }

        if unmatched > 0 {
            tracing::warn!(
                unmatched,
                "readings without a station match were excluded from aggregation"
            );
        }

        let mut records: Vec<DailyRecord> = groups
            .into_iter()
            .map(|((station_name, date), acc)| {
                let values = acc.means();
                let (latitude, longitude) = acc.coordinates();
                let cigarettes = values[Pollutant::Pm25.index()]
                    .map(|pm25| pm25 / self.pm25_cigarette_divisor);

                DailyRecord {
                    station_name,
                    latitude,
                    longitude,
                    date,
                    year: date.year(),
                    month: date.month(),
                    values,
                    cigarettes,
                }
            })
            .collect();

        records.sort_by(|a, b| {
            a.station_name
                .cmp(&b.station_name)
                .then_with(|| a.date.cmp(&b.date))
        });

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn reading(name: Option<&str>, timestamp: &str, pm25: Option<f64>) -> RawReading {
        let mut values: PollutantValues = Default::default();
        values[Pollutant::Pm25.index()] = pm25;
        RawReading {
            station_id: 28079004,
            timestamp: NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").unwrap(),
            station_name: name.map(|n| n.to_string()),
            latitude: name.map(|_| 40.423882),
            longitude: name.map(|_| -3.712247),
            values,
        }
    }

    #[test]
    fn test_daily_mean_is_true_mean() {
        let readings = vec![
            reading(Some("Plaza de España"), "2015-01-07 01:00:00", Some(10.0)),
            reading(Some("Plaza de España"), "2015-01-07 09:00:00", Some(20.0)),
            reading(Some("Plaza de España"), "2015-01-07 17:00:00", Some(30.0)),
        ];

        let records = DailyAggregator::new(22.0).aggregate(&readings);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.value(Pollutant::Pm25), Some(20.0));
        let cigarettes = record.cigarettes.unwrap();
        assert!((cigarettes - 20.0 / 22.0).abs() < 1e-12);
        assert_eq!(record.year, 2015);
        assert_eq!(record.month, 1);
    }

    #[test]
    fn test_missing_values_do_not_contribute() {
        let readings = vec![
            reading(Some("Vallecas"), "2015-01-07 01:00:00", Some(44.0)),
            reading(Some("Vallecas"), "2015-01-07 02:00:00", None),
        ];

        let records = DailyAggregator::new(22.0).aggregate(&readings);

        // The missing reading is not a zero: the mean is 44, not 22
        assert_eq!(records[0].value(Pollutant::Pm25), Some(44.0));
        assert!((records[0].cigarettes.unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_pm25_leaves_cigarettes_empty() {
        let readings = vec![reading(Some("Vallecas"), "2015-01-07 01:00:00", None)];
        let records = DailyAggregator::new(22.0).aggregate(&readings);
        assert_eq!(records[0].cigarettes, None);
    }

    #[test]
    fn test_groups_split_by_station_and_day() {
        let readings = vec![
            reading(Some("Vallecas"), "2015-01-07 01:00:00", Some(10.0)),
            reading(Some("Vallecas"), "2015-01-08 01:00:00", Some(20.0)),
            reading(Some("Barajas Pueblo"), "2015-01-07 01:00:00", Some(30.0)),
        ];

        let records = DailyAggregator::new(22.0).aggregate(&readings);

        assert_eq!(records.len(), 3);
        // Sorted by station name, then date
        assert_eq!(records[0].station_name, "Barajas Pueblo");
        assert_eq!(records[1].station_name, "Vallecas");
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2015, 1, 7).unwrap());
        assert_eq!(records[2].date, NaiveDate::from_ymd_opt(2015, 1, 8).unwrap());
    }

    #[test]
    fn test_unmatched_readings_are_skipped() {
        let readings = vec![
            reading(None, "2015-01-07 01:00:00", Some(10.0)),
            reading(Some("Vallecas"), "2015-01-07 01:00:00", Some(20.0)),
        ];

        let records = DailyAggregator::new(22.0).aggregate(&readings);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].station_name, "Vallecas");
    }
}
