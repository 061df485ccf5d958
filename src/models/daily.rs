use chrono::NaiveDate;
use serde::Serialize;

use crate::models::pollutant::{Pollutant, PollutantValues};

/// One station-day: the mean of every pollutant over that day's
/// readings plus the derived cigarette equivalent. The cigarette
/// value is always computed from the PM2.5 mean, never carried
/// independently of it.
#[derive(Debug, Clone, Serialize)]
pub struct DailyRecord {
    pub station_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub values: PollutantValues,
    pub cigarettes: Option<f64>,
}

impl DailyRecord {
    pub fn value(&self, pollutant: Pollutant) -> Option<f64> {
        self.values[pollutant.index()]
    }

    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// A daily record with the area classification attached by the
/// normalized-name join. Rows with no metadata match keep a null
/// area; they are never dropped at this stage.
#[derive(Debug, Clone, Serialize)]
pub struct MergedRecord {
    pub station_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub values: PollutantValues,
    pub cigarettes: Option<f64>,
    pub area_type: Option<String>,
}

impl MergedRecord {
    pub fn from_daily(daily: &DailyRecord, area_type: Option<String>) -> Self {
        Self {
            station_name: daily.station_name.clone(),
            latitude: daily.latitude,
            longitude: daily.longitude,
            date: daily.date,
            year: daily.year,
            month: daily.month,
            values: daily.values,
            cigarettes: daily.cigarettes,
            area_type,
        }
    }

    pub fn value(&self, pollutant: Pollutant) -> Option<f64> {
        self.values[pollutant.index()]
    }
}
