pub mod constants;
pub mod filename;
pub mod progress;
pub mod text;

pub use constants::*;
pub use filename::{generate_default_daily_filename, parse_measurement_year};
pub use progress::ProgressReporter;
pub use text::normalize_station_name;
