pub mod feed;
pub mod model;

pub use feed::ForecastFeed;
pub use model::{FittedModel, HoltWinters};
