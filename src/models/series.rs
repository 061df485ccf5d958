use chrono::NaiveDate;
use serde::Serialize;

use crate::models::pollutant::{Pollutant, PollutantValues};

/// Per-pollutant mean over one (year, month) cell. Training input for
/// the forecaster.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyMean {
    pub year: i32,
    pub month: u32,
    pub values: PollutantValues,
}

impl MonthlyMean {
    pub fn value(&self, pollutant: Pollutant) -> Option<f64> {
        self.values[pollutant.index()]
    }

    pub fn first_of_month(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

/// Per-pollutant mean over one year, with each value also expressed
/// as a percentage of the baseline year (100 = baseline level).
#[derive(Debug, Clone, Serialize)]
pub struct YearlyMean {
    pub year: i32,
    pub values: PollutantValues,
    pub percentages: PollutantValues,
}

impl YearlyMean {
    pub fn value(&self, pollutant: Pollutant) -> Option<f64> {
        self.values[pollutant.index()]
    }

    pub fn percentage(&self, pollutant: Pollutant) -> Option<f64> {
        self.percentages[pollutant.index()]
    }
}

/// Per-pollutant mean over one (area type, year) cell.
#[derive(Debug, Clone, Serialize)]
pub struct AreaYearMean {
    pub area_type: String,
    pub year: i32,
    pub values: PollutantValues,
}

/// Mean cigarette equivalent over one (area type, year) cell. Groups
/// whose mean is zero or missing never appear here; a zero is treated
/// as "no data", not a clean-air reading.
#[derive(Debug, Clone, Serialize)]
pub struct AreaYearCigarettes {
    pub area_type: String,
    pub year: i32,
    pub cigarettes: f64,
}

/// One month of a pollutant forecast. Historical months carry the
/// observed mean; future months leave it empty.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub expected: f64,
    pub lower: f64,
    pub upper: f64,
    pub observed: Option<f64>,
}

/// The full monthly prediction sequence for one pollutant, from the
/// first observed month through the configured horizon, ascending.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastSeries {
    pub pollutant: Pollutant,
    pub points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// Number of leading points backed by an observed month.
    pub fn observed_len(&self) -> usize {
        self.points.iter().filter(|p| p.observed.is_some()).count()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}
