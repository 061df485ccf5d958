use crate::error::{PipelineError, Result};
use crate::models::AreaMap;
use crate::utils::constants::{METADATA_AREA_COLUMN, METADATA_STATION_COLUMN};
use crate::utils::text::normalize_station_name;
use std::borrow::Cow;
use std::path::Path;

pub struct MetadataReader;

impl MetadataReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the municipal station-information file into a
    /// normalized-name -> area-type map. The file is
    /// semicolon-delimited and often Latin-1 encoded; UTF-8 input is
    /// accepted as-is.
    pub fn read_area_map(&self, path: &Path) -> Result<AreaMap> {
        let bytes = std::fs::read(path)?;
        let text = decode_text(&bytes);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let station_idx = find_column(&headers, METADATA_STATION_COLUMN, path)?;
        let area_idx = find_column(&headers, METADATA_AREA_COLUMN, path)?;

        let mut areas = AreaMap::new();
        for record in reader.records() {
            let record = record?;
            let station = record.get(station_idx).unwrap_or("").trim();
            let area = record.get(area_idx).unwrap_or("").trim();
            if station.is_empty() || area.is_empty() {
                continue;
            }
            areas.insert(normalize_station_name(station), area.to_string());
        }

        tracing::debug!(stations = areas.len(), "area metadata loaded");
        Ok(areas)
    }
}

impl Default for MetadataReader {
    fn default() -> Self {
        Self::new()
    }
}

fn find_column(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| PipelineError::MissingColumn {
            file: path.display().to_string(),
            column: name.to_string(),
        })
}

/// The municipal export is Latin-1; newer dumps are UTF-8. Try UTF-8
/// first and fall back to Windows-1252, which maps every byte.
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded
        }
    }
}
