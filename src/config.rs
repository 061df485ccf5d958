use crate::error::{PipelineError, Result};
use crate::utils::constants::{
    DEFAULT_BASELINE_YEAR, DEFAULT_HORIZON_END_YEAR, DEFAULT_INTERVAL_WIDTH,
    DEFAULT_MIN_TRAINING_POINTS, DEFAULT_PM25_CIGARETTE_DIVISOR, DEFAULT_SEASONAL_PERIOD,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pipeline settings with documented defaults. Values can be overridden
/// by a config file (`--config`) and by `MADRID_AQ_*` environment
/// variables, in that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Reference year for the baseline-percentage view (default 2001,
    /// the first year of the observed range).
    pub baseline_year: i32,

    /// Divisor converting a PM2.5 daily mean to cigarette equivalents
    /// (default 22.0, the published ambient-exposure equivalence).
    pub pm25_cigarette_divisor: f64,

    /// Last forecast year; predictions run through December of this
    /// year (default 2030).
    pub horizon_end_year: i32,

    /// Width of the forecast prediction interval (default 0.95).
    pub interval_width: f64,

    /// Minimum usable monthly points required to fit a pollutant
    /// series (default 24, two full seasonal cycles).
    pub min_training_points: usize,

    /// Seasonal period of the training series in months (default 12).
    pub seasonal_period: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            baseline_year: DEFAULT_BASELINE_YEAR,
            pm25_cigarette_divisor: DEFAULT_PM25_CIGARETTE_DIVISOR,
            horizon_end_year: DEFAULT_HORIZON_END_YEAR,
            interval_width: DEFAULT_INTERVAL_WIDTH,
            min_training_points: DEFAULT_MIN_TRAINING_POINTS,
            seasonal_period: DEFAULT_SEASONAL_PERIOD,
        }
    }
}

impl PipelineConfig {
    /// Load settings layered as defaults -> optional file -> environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder
            .add_source(config::Environment::with_prefix("MADRID_AQ").try_parsing(true));

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pm25_cigarette_divisor <= 0.0 {
            return Err(PipelineError::Config(format!(
                "pm25_cigarette_divisor must be positive, got {}",
                self.pm25_cigarette_divisor
            )));
        }
        if !(0.0..1.0).contains(&self.interval_width) || self.interval_width == 0.0 {
            return Err(PipelineError::Config(format!(
                "interval_width must be in (0, 1), got {}",
                self.interval_width
            )));
        }
        if self.seasonal_period == 0 {
            return Err(PipelineError::Config(
                "seasonal_period must be at least 1".to_string(),
            ));
        }
        if self.min_training_points < 2 * self.seasonal_period {
            return Err(PipelineError::Config(format!(
                "min_training_points must cover two seasonal cycles ({} points), got {}",
                2 * self.seasonal_period,
                self.min_training_points
            )));
        }
        Ok(())
    }
}
