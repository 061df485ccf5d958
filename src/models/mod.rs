pub mod daily;
pub mod pollutant;
pub mod reading;
pub mod series;
pub mod station;

pub use daily::{DailyRecord, MergedRecord};
pub use pollutant::{Pollutant, PollutantValues, POLLUTANT_COUNT};
pub use reading::{MeasurementRow, RawReading};
pub use series::{
    AreaYearCigarettes, AreaYearMean, ForecastPoint, ForecastSeries, MonthlyMean, YearlyMean,
};
pub use station::{AreaMap, StationRecord};
