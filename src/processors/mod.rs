pub mod aggregate_views;
pub mod area_joiner;
pub mod daily_aggregator;
pub mod pipeline;

pub use area_joiner::AreaJoiner;
pub use daily_aggregator::DailyAggregator;
pub use pipeline::AirQualityPipeline;
