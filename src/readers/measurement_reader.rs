use crate::error::{PipelineError, Result};
use crate::models::{MeasurementRow, RawReading, StationRecord};
use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use crate::utils::filename::parse_measurement_year;
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub struct MeasurementReader {
    max_workers: usize,
}

impl MeasurementReader {
    pub fn new(max_workers: usize) -> Self {
        Self { max_workers }
    }

    /// Find per-year measurement files (madrid_{year}.csv) in a
    /// directory, sorted by year. The year range is whatever is on
    /// disk; nothing is hard-coded.
    pub fn discover_year_files(&self, dir: &Path) -> Result<Vec<(i32, PathBuf)>> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if let Some(year) = parse_measurement_year(&path) {
                files.push((year, path));
            }
        }

        files.sort_by_key(|(year, _)| *year);

        if files.is_empty() {
            return Err(PipelineError::InvalidFormat(format!(
                "no madrid_{{year}}.csv files found in {}",
                dir.display()
            )));
        }

        Ok(files)
    }

    /// Read one year's file and left-join every row onto the station
    /// reference by station id. Row order is preserved; unknown
    /// station ids keep empty identity fields.
    pub fn read_year_file(
        &self,
        path: &Path,
        stations: &HashMap<u32, StationRecord>,
    ) -> Result<Vec<RawReading>> {
        let file = File::open(path)?;
        let buf = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut reader = csv::Reader::from_reader(buf);
        let mut readings = Vec::new();

        for result in reader.deserialize() {
            let row: MeasurementRow = result?;
            readings.push(RawReading::from_row(&row, stations)?);
        }

        Ok(readings)
    }

    /// Read every year file in the directory, in parallel, and
    /// concatenate the results in year order.
    pub fn read_all(
        &self,
        dir: &Path,
        stations: &HashMap<u32, StationRecord>,
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<RawReading>> {
        let files = self.discover_year_files(dir)?;

        if let Some(p) = progress {
            p.set_message(&format!("Reading {} measurement files...", files.len()));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let per_year: Result<Vec<Vec<RawReading>>> = pool.install(|| {
            files
                .par_iter()
                .map(|(_, path)| {
                    let readings = self.read_year_file(path, stations);
                    if let Some(p) = progress {
                        p.increment(1);
                    }
                    readings
                })
                .collect()
        });

        // par_iter + collect preserves input order, so years stay sorted.
        let readings: Vec<RawReading> = per_year?.into_iter().flatten().collect();

        tracing::debug!(
            files = files.len(),
            readings = readings.len(),
            "measurement ingest complete"
        );

        Ok(readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pollutant;
    use std::io::Write;
    use tempfile::TempDir;

    fn station_map() -> HashMap<u32, StationRecord> {
        let mut map = HashMap::new();
        map.insert(
            28079004,
            StationRecord::new(
                28079004,
                "Plaza de España".to_string(),
                40.423882,
                -3.712247,
            ),
        );
        map
    }

    fn write_year_file(dir: &Path, year: i32, rows: &[&str]) {
        let mut file = File::create(dir.join(format!("madrid_{}.csv", year))).unwrap();
        writeln!(file, "date,station,BEN,CO,NO_2,SO_2,O_3,PM25,PM10,TOL").unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
    }

    #[test]
    fn test_discover_year_files_sorted() -> Result<()> {
        let dir = TempDir::new()?;
        write_year_file(dir.path(), 2003, &[]);
        write_year_file(dir.path(), 2001, &[]);
        File::create(dir.path().join("stations.csv"))?;

        let reader = MeasurementReader::new(2);
        let files = reader.discover_year_files(dir.path())?;

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].0, 2001);
        assert_eq!(files[1].0, 2003);

        Ok(())
    }

    #[test]
    fn test_discover_empty_directory_fails() {
        let dir = TempDir::new().unwrap();
        let reader = MeasurementReader::new(2);
        assert!(reader.discover_year_files(dir.path()).is_err());
    }

    #[test]
    fn test_read_year_file_joins_station() -> Result<()> {
        let dir = TempDir::new()?;
        write_year_file(
            dir.path(),
            2015,
            &[
                "2015-01-07 01:00:00,28079004,0.5,0.3,42.0,6.0,50.0,18.5,25.0,3.1",
                "2015-01-07 02:00:00,28079099,,,40.0,,,,,",
            ],
        );

        let reader = MeasurementReader::new(1);
        let readings =
            reader.read_year_file(&dir.path().join("madrid_2015.csv"), &station_map())?;

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].station_name.as_deref(), Some("Plaza de España"));
        assert_eq!(readings[0].values[Pollutant::Pm25.index()], Some(18.5));
        // Unknown station id: joined fields stay empty, row is kept
        assert_eq!(readings[1].station_name, None);
        assert_eq!(
            readings[1].values[Pollutant::NitrogenDioxide.index()],
            Some(40.0)
        );

        Ok(())
    }

    #[test]
    fn test_read_all_concatenates_in_year_order() -> Result<()> {
        let dir = TempDir::new()?;
        write_year_file(
            dir.path(),
            2002,
            &["2002-03-01 01:00:00,28079004,,,30.0,,,,,"],
        );
        write_year_file(
            dir.path(),
            2001,
            &["2001-06-01 01:00:00,28079004,,,20.0,,,,,"],
        );

        let reader = MeasurementReader::new(2);
        let readings = reader.read_all(dir.path(), &station_map(), None)?;

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].year(), 2001);
        assert_eq!(readings[1].year(), 2002);

        Ok(())
    }
}
