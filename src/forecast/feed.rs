use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::forecast::model::{interval_z, HoltWinters};
use crate::models::{ForecastPoint, ForecastSeries, MonthlyMean, Pollutant};

/// Builds the per-pollutant monthly training series from the
/// (year, month) view and extends each through the configured
/// horizon. Pollutants are independent: each fits on its own series,
/// fan-out over rayon, and one failing pollutant only removes itself
/// from the result set.
pub struct ForecastFeed {
    config: PipelineConfig,
}

impl ForecastFeed {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Forecast every pollutant, dropping the ones with too little
    /// data (logged, not fatal).
    pub fn forecast_all(&self, monthly: &[MonthlyMean]) -> Vec<ForecastSeries> {
        Pollutant::ALL
            .par_iter()
            .filter_map(|&pollutant| match self.forecast_pollutant(monthly, pollutant) {
                Ok(series) => Some(series),
                Err(error) => {
                    tracing::warn!(%pollutant, %error, "skipping pollutant forecast");
                    None
                }
            })
            .collect()
    }

    /// Fit one pollutant and produce its full monthly sequence: the
    /// observed range with in-sample predictions, then the horizon
    /// extension with widening prediction intervals.
    pub fn forecast_pollutant(
        &self,
        monthly: &[MonthlyMean],
        pollutant: Pollutant,
    ) -> Result<ForecastSeries> {
        let observed: BTreeMap<(i32, u32), f64> = monthly
            .iter()
            .filter_map(|m| m.value(pollutant).map(|v| ((m.year, m.month), v)))
            .collect();

        if observed.len() < self.config.min_training_points {
            return Err(PipelineError::InsufficientData {
                series: pollutant.column_name().to_string(),
                points: observed.len(),
                required: self.config.min_training_points,
            });
        }

        // BTreeMap iteration is ordered, so first/last bound the
        // observed range
        let (&first, _) = observed.iter().next().ok_or_else(|| {
            PipelineError::InsufficientData {
                series: pollutant.column_name().to_string(),
                points: 0,
                required: self.config.min_training_points,
            }
        })?;
        let (&last, _) = observed.iter().next_back().ok_or_else(|| {
            PipelineError::InsufficientData {
                series: pollutant.column_name().to_string(),
                points: 0,
                required: self.config.min_training_points,
            }
        })?;

        // Contiguous monthly axis over the observed range; interior
        // gaps are interpolated for fitting but carry no observed
        // value in the output.
        let axis = month_axis(first, last)?;
        let raw: Vec<Option<f64>> = axis
            .iter()
            .map(|&(year, month)| observed.get(&(year, month)).copied())
            .collect();
        let training = interpolate_gaps(&raw);

        let model = HoltWinters::fit_auto(self.config.seasonal_period, &training)?;
        let z = interval_z(self.config.interval_width);
        let sigma = model.sigma();

        let mut points = Vec::with_capacity(axis.len());
        for (i, &(year, month)) in axis.iter().enumerate() {
            let expected = model.fitted()[i];
            points.push(ForecastPoint {
                date: first_of_month(year, month)?,
                expected,
                lower: expected - z * sigma,
                upper: expected + z * sigma,
                observed: raw[i],
            });
        }

        // Horizon extension: one point per month after the observed
        // range through December of the horizon year, interval
        // widening with the step distance.
        let horizon_months = months_until(last, (self.config.horizon_end_year, 12));
        let future = model.forecast(horizon_months);
        let mut cursor = last;
        for (k, &expected) in future.iter().enumerate() {
            cursor = next_month(cursor);
            let band = z * sigma * ((k + 1) as f64).sqrt();
            points.push(ForecastPoint {
                date: first_of_month(cursor.0, cursor.1)?,
                expected,
                lower: expected - band,
                upper: expected + band,
                observed: None,
            });
        }

        Ok(ForecastSeries { pollutant, points })
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        PipelineError::InvalidFormat(format!("invalid calendar month {}-{:02}", year, month))
    })
}

fn next_month((year, month): (i32, u32)) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Number of months strictly after `from`, up to and including `to`;
/// zero when `to` is not after `from`.
fn months_until(from: (i32, u32), to: (i32, u32)) -> usize {
    let from_idx = from.0 as i64 * 12 + (from.1 as i64 - 1);
    let to_idx = to.0 as i64 * 12 + (to.1 as i64 - 1);
    (to_idx - from_idx).max(0) as usize
}

fn month_axis(first: (i32, u32), last: (i32, u32)) -> Result<Vec<(i32, u32)>> {
    if !(1..=12).contains(&first.1) || !(1..=12).contains(&last.1) {
        return Err(PipelineError::InvalidFormat(format!(
            "invalid month in range {:?}..{:?}",
            first, last
        )));
    }
    let mut axis = vec![first];
    let mut cursor = first;
    while cursor != last {
        cursor = next_month(cursor);
        axis.push(cursor);
    }
    Ok(axis)
}

/// Linear interpolation of interior gaps. The axis is bounded by
/// observed months, so every gap has a neighbor on both sides.
fn interpolate_gaps(raw: &[Option<f64>]) -> Vec<f64> {
    let mut values = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        match raw[i] {
            Some(v) => {
                values.push(v);
                i += 1;
            }
            None => {
                // Find the bracketing observed values
                let prev = values.last().copied().unwrap_or(0.0);
                let mut j = i;
                while j < raw.len() && raw[j].is_none() {
                    j += 1;
                }
                let next = raw.get(j).and_then(|v| *v).unwrap_or(prev);
                let gap = (j - i + 1) as f64;
                for step in 0..(j - i) {
                    let t = (step + 1) as f64 / gap;
                    values.push(prev + t * (next - prev));
                }
                i = j;
            }
        }
    }

    values
}
