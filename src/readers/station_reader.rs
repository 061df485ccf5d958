use crate::error::Result;
use crate::models::StationRecord;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use validator::Validate;

pub struct StationReader;

impl StationReader {
    pub fn new() -> Self {
        Self
    }

    /// Read station reference rows from stations.csv. Columns beyond
    /// id/name/lat/lon (address, elevation) are ignored.
    pub fn read_stations(&self, path: &Path) -> Result<Vec<StationRecord>> {
        let file = File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);
        let mut stations = Vec::new();

        for result in reader.deserialize() {
            let station: StationRecord = result?;
            station.validate()?;
            stations.push(station);
        }

        Ok(stations)
    }

    /// Read station metadata keyed by station id.
    pub fn read_stations_map(&self, path: &Path) -> Result<HashMap<u32, StationRecord>> {
        let stations = self.read_stations(path)?;
        let mut map = HashMap::with_capacity(stations.len());

        for station in stations {
            map.insert(station.id, station);
        }

        Ok(map)
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_stations_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "id,name,address,lon,lat,elevation")?;
        writeln!(
            temp_file,
            "28079004,Plaza de España,Plaza de España,-3.712247,40.423882,635"
        )?;
        writeln!(
            temp_file,
            "28079008,Escuelas Aguirre,Entre C/ Alcalá y C/ O' Donell,-3.682319,40.421553,670"
        )?;

        let reader = StationReader::new();
        let stations = reader.read_stations(temp_file.path())?;

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, 28079004);
        assert_eq!(stations[0].name, "Plaza de España");
        assert!((stations[0].latitude - 40.423882).abs() < 1e-9);
        assert!((stations[0].longitude - -3.712247).abs() < 1e-9);
        assert!(stations[1].is_within_madrid_bounds());

        Ok(())
    }

    #[test]
    fn test_read_stations_map() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "id,name,lon,lat")?;
        writeln!(temp_file, "28079035,Plaza del Carmen,-3.703172,40.419209")?;

        let reader = StationReader::new();
        let map = reader.read_stations_map(temp_file.path())?;

        assert_eq!(map.len(), 1);
        assert_eq!(map[&28079035].name, "Plaza del Carmen");

        Ok(())
    }

    #[test]
    fn test_rejects_invalid_coordinates() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "id,name,lon,lat").unwrap();
        writeln!(temp_file, "1,Broken,-3.7,120.0").unwrap();

        let reader = StationReader::new();
        assert!(reader.read_stations(temp_file.path()).is_err());
    }
}
