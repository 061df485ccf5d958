pub mod measurement_reader;
pub mod metadata_reader;
pub mod station_reader;

pub use measurement_reader::MeasurementReader;
pub use metadata_reader::MetadataReader;
pub use station_reader::StationReader;
