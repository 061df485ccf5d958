use crate::utils::constants::{MEASUREMENT_FILE_EXTENSION, MEASUREMENT_FILE_PREFIX};
use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

/// Extract the year from a per-year measurement filename
/// (e.g. madrid_2015.csv -> 2015). Returns None for anything that
/// does not match the pattern.
pub fn parse_measurement_year(path: &Path) -> Option<i32> {
    let filename = path.file_name()?.to_str()?;
    let stem = filename.strip_suffix(&format!(".{}", MEASUREMENT_FILE_EXTENSION))?;
    let year_part = stem.strip_prefix(MEASUREMENT_FILE_PREFIX)?;
    year_part.parse::<i32>().ok()
}

/// Generate default daily-aggregate filename: madrid-aq-daily-{YYMMDD}.csv
pub fn generate_default_daily_filename() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!("madrid-aq-daily-{:02}{:02}{:02}.csv", year, month, day);
    PathBuf::from("output").join(filename)
}
