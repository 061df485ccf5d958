use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::Result;
use crate::models::pollutant::{Pollutant, PollutantValues};
use crate::models::station::StationRecord;
use crate::utils::constants::{DATE_FORMAT, TIMESTAMP_FORMAT};

/// One row of a per-year measurement file, as serialized on disk.
/// The raw files carry more species than the pipeline tracks; unknown
/// columns are ignored and absent ones deserialize as missing.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementRow {
    pub station: u32,
    pub date: String,

    #[serde(rename = "BEN", default)]
    pub ben: Option<f64>,

    #[serde(rename = "CO", default)]
    pub co: Option<f64>,

    #[serde(rename = "NO_2", default)]
    pub no_2: Option<f64>,

    #[serde(rename = "SO_2", default)]
    pub so_2: Option<f64>,

    #[serde(rename = "O_3", default)]
    pub o_3: Option<f64>,

    #[serde(rename = "PM25", default)]
    pub pm25: Option<f64>,

    #[serde(rename = "PM10", default)]
    pub pm10: Option<f64>,
}

impl MeasurementRow {
    pub fn pollutant_values(&self) -> PollutantValues {
        let mut values: PollutantValues = Default::default();
        values[Pollutant::Benzene.index()] = self.ben;
        values[Pollutant::CarbonMonoxide.index()] = self.co;
        values[Pollutant::NitrogenDioxide.index()] = self.no_2;
        values[Pollutant::SulphurDioxide.index()] = self.so_2;
        values[Pollutant::Ozone.index()] = self.o_3;
        values[Pollutant::Pm25.index()] = self.pm25;
        values[Pollutant::Pm10.index()] = self.pm10;
        values
    }
}

/// A raw observation joined onto the station reference. Stations
/// missing from the reference keep empty identity fields rather than
/// failing the join.
#[derive(Debug, Clone)]
pub struct RawReading {
    pub station_id: u32,
    pub timestamp: NaiveDateTime,
    pub station_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub values: PollutantValues,
}

impl RawReading {
    /// Join a measurement row onto the station map and parse its
    /// timestamp. An unparsable date is fatal for the whole run.
    pub fn from_row(row: &MeasurementRow, stations: &HashMap<u32, StationRecord>) -> Result<Self> {
        let timestamp = parse_timestamp(&row.date)?;
        let station = stations.get(&row.station);

        Ok(Self {
            station_id: row.station,
            timestamp,
            station_name: station.map(|s| s.name.clone()),
            latitude: station.map(|s| s.latitude),
            longitude: station.map(|s| s.longitude),
            values: row.pollutant_values(),
        })
    }

    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    pub fn month(&self) -> u32 {
        self.timestamp.month()
    }
}

/// Parse a reading timestamp, accepting date-time and date-only forms.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        Ok(ts) => Ok(ts),
        Err(_) => {
            let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)?;
            Ok(date.and_time(NaiveTime::MIN))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station_map() -> HashMap<u32, StationRecord> {
        let mut map = HashMap::new();
        map.insert(
            28079004,
            StationRecord::new(
                28079004,
                "Plaza de España".to_string(),
                40.423882,
                -3.712247,
            ),
        );
        map
    }

    fn row(station: u32, date: &str) -> MeasurementRow {
        MeasurementRow {
            station,
            date: date.to_string(),
            ben: None,
            co: None,
            no_2: Some(42.0),
            so_2: None,
            o_3: None,
            pm25: Some(18.5),
            pm10: None,
        }
    }

    #[test]
    fn test_join_attaches_station_identity() {
        let reading =
            RawReading::from_row(&row(28079004, "2015-01-07 09:00:00"), &station_map()).unwrap();

        assert_eq!(reading.station_name.as_deref(), Some("Plaza de España"));
        assert_eq!(reading.latitude, Some(40.423882));
        assert_eq!(reading.day(), NaiveDate::from_ymd_opt(2015, 1, 7).unwrap());
        assert_eq!(reading.year(), 2015);
        assert_eq!(reading.month(), 1);
        assert_eq!(reading.values[Pollutant::Pm25.index()], Some(18.5));
    }

    #[test]
    fn test_unknown_station_keeps_empty_identity() {
        let reading =
            RawReading::from_row(&row(99999999, "2015-01-07 09:00:00"), &station_map()).unwrap();

        assert_eq!(reading.station_name, None);
        assert_eq!(reading.latitude, None);
        assert_eq!(reading.longitude, None);
    }

    #[test]
    fn test_date_only_timestamp() {
        let ts = parse_timestamp("2015-01-07").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2015, 1, 7).unwrap());
    }

    #[test]
    fn test_unparsable_date_is_fatal() {
        assert!(RawReading::from_row(&row(28079004, "07/01/2015"), &station_map()).is_err());
    }
}
