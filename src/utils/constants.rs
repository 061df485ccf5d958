/// File names and patterns
pub const STATIONS_FILE: &str = "stations.csv";
pub const MEASUREMENT_FILE_PREFIX: &str = "madrid_";
pub const MEASUREMENT_FILE_EXTENSION: &str = "csv";

/// Metadata column headers (municipal station-information file)
pub const METADATA_STATION_COLUMN: &str = "ESTACION";
pub const METADATA_AREA_COLUMN: &str = "NOM_TIPO";

/// Timestamp formats accepted by the ingestion stage
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Pipeline defaults (overridable via `PipelineConfig`)
pub const DEFAULT_BASELINE_YEAR: i32 = 2001;
pub const DEFAULT_PM25_CIGARETTE_DIVISOR: f64 = 22.0;
pub const DEFAULT_HORIZON_END_YEAR: i32 = 2030;
pub const DEFAULT_INTERVAL_WIDTH: f64 = 0.95;
pub const DEFAULT_MIN_TRAINING_POINTS: usize = 24;
pub const DEFAULT_SEASONAL_PERIOD: usize = 12;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Madrid geographic bounds (sanity range for station coordinates)
pub const MADRID_MIN_LAT: f64 = 40.0;
pub const MADRID_MAX_LAT: f64 = 41.0;
pub const MADRID_MIN_LON: f64 = -4.5;
pub const MADRID_MAX_LON: f64 = -3.0;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
