use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::utils::constants::{MADRID_MAX_LAT, MADRID_MAX_LON, MADRID_MIN_LAT, MADRID_MIN_LON};

/// Normalized station name -> area classification label.
pub type AreaMap = HashMap<String, String>;

/// One row of the station reference file (stations.csv).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StationRecord {
    pub id: u32,

    #[validate(length(min = 1))]
    pub name: String,

    #[serde(rename = "lat")]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[serde(rename = "lon")]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl StationRecord {
    pub fn new(id: u32, name: String, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name,
            latitude,
            longitude,
        }
    }

    pub fn is_within_madrid_bounds(&self) -> bool {
        self.latitude >= MADRID_MIN_LAT
            && self.latitude <= MADRID_MAX_LAT
            && self.longitude >= MADRID_MIN_LON
            && self.longitude <= MADRID_MAX_LON
    }
}
