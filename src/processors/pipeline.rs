use crate::config::PipelineConfig;
use crate::error::Result;
use crate::forecast::ForecastFeed;
use crate::models::{
    AreaMap, AreaYearCigarettes, AreaYearMean, DailyRecord, ForecastSeries, MergedRecord,
    MonthlyMean, RawReading, YearlyMean,
};
use crate::processors::aggregate_views;
use crate::processors::area_joiner::AreaJoiner;
use crate::processors::daily_aggregator::DailyAggregator;

/// The whole derivation chain built once at startup: daily aggregate,
/// area join, and the four downstream views, each exposed through a
/// read-only accessor. The presentation layer consumes these tables;
/// nothing here is recomputed or mutated after construction.
pub struct AirQualityPipeline {
    config: PipelineConfig,
    daily: Vec<DailyRecord>,
    merged: Vec<MergedRecord>,
    cigarette_view: Vec<AreaYearCigarettes>,
    monthly_means: Vec<MonthlyMean>,
    yearly_means: Vec<YearlyMean>,
    area_year_means: Vec<AreaYearMean>,
}

impl AirQualityPipeline {
    /// Build every derived view from an existing daily aggregate.
    pub fn build(config: PipelineConfig, daily: Vec<DailyRecord>, areas: &AreaMap) -> Result<Self> {
        tracing::info!(records = daily.len(), "building derived views");

        let merged = AreaJoiner::new().join(&daily, areas);
        let cigarette_view = aggregate_views::cigarette_view(&merged);
        let monthly_means = aggregate_views::monthly_means(&daily);
        let yearly_means = aggregate_views::yearly_means(&daily, config.baseline_year)?;
        let area_year_means = aggregate_views::area_year_means(&merged);

        Ok(Self {
            config,
            daily,
            merged,
            cigarette_view,
            monthly_means,
            yearly_means,
            area_year_means,
        })
    }

    /// Run the full chain from raw readings: daily aggregation first,
    /// then the views.
    pub fn from_readings(
        config: PipelineConfig,
        readings: &[RawReading],
        areas: &AreaMap,
    ) -> Result<Self> {
        let aggregator = DailyAggregator::new(config.pm25_cigarette_divisor);
        let daily = aggregator.aggregate(readings);
        Self::build(config, daily, areas)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn daily(&self) -> &[DailyRecord] {
        &self.daily
    }

    pub fn merged(&self) -> &[MergedRecord] {
        &self.merged
    }

    pub fn cigarette_view(&self) -> &[AreaYearCigarettes] {
        &self.cigarette_view
    }

    pub fn monthly_means(&self) -> &[MonthlyMean] {
        &self.monthly_means
    }

    pub fn yearly_means(&self) -> &[YearlyMean] {
        &self.yearly_means
    }

    pub fn area_year_means(&self) -> &[AreaYearMean] {
        &self.area_year_means
    }

    /// Fit and extend the per-pollutant forecasts from the monthly
    /// view. Pollutants with too little data are skipped with a
    /// warning; the rest are unaffected.
    pub fn forecasts(&self) -> Vec<ForecastSeries> {
        ForecastFeed::new(self.config.clone()).forecast_all(&self.monthly_means)
    }
}
