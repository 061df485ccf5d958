use chrono::NaiveDate;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

use madrid_aq::analyzers::DatasetAnalyzer;
use madrid_aq::models::{AreaMap, DailyRecord, Pollutant, PollutantValues};
use madrid_aq::processors::{AirQualityPipeline, DailyAggregator};
use madrid_aq::readers::{MeasurementReader, MetadataReader, StationReader};
use madrid_aq::writers::{CsvWriter, ParquetWriter};
use madrid_aq::PipelineConfig;

fn write_stations_file(dir: &Path) {
    let mut file = File::create(dir.join("stations.csv")).unwrap();
    writeln!(file, "id,name,address,lon,lat,elevation").unwrap();
    writeln!(
        file,
        "28079004,Plaza de España,Plaza de España,-3.712247,40.423882,635"
    )
    .unwrap();
    writeln!(
        file,
        "28079040,Vallecas,C/ Arroyo del Olivar,-3.651529,40.388148,666"
    )
    .unwrap();
}

fn write_year_file(dir: &Path, year: i32, rows: &[String]) {
    let mut file = File::create(dir.join(format!("madrid_{}.csv", year))).unwrap();
    writeln!(file, "date,station,BEN,CO,NO_2,SO_2,O_3,PM25,PM10").unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
}

fn write_metadata_file(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("informacion_estaciones.csv");
    let mut file = File::create(&path).unwrap();
    // Latin-1 bytes, the encoding the municipal export ships in
    file.write_all(b"NUMERO;ESTACION;NOM_TIPO\n").unwrap();
    file.write_all(b"4;Plaza de Espa\xf1a;UT\n").unwrap();
    file.write_all(b"40;Vallecas;UF\n").unwrap();
    path
}

#[test]
fn test_prepare_to_views_end_to_end() {
    let dir = TempDir::new().unwrap();
    write_stations_file(dir.path());

    // Baseline year with PM2.5 data, plus the scenario day:
    // Plaza de España reads 44 µg/m³ on one day in January 2015
    write_year_file(
        dir.path(),
        2001,
        &[
            "2001-06-15 01:00:00,28079004,,,40.0,,,30.0,".to_string(),
            "2001-06-15 13:00:00,28079004,,,60.0,,,30.0,".to_string(),
        ],
    );
    write_year_file(
        dir.path(),
        2015,
        &[
            "2015-01-07 01:00:00,28079004,,,42.0,,,40.0,".to_string(),
            "2015-01-07 13:00:00,28079004,,,38.0,,,48.0,".to_string(),
            // A reading that fails the station join: kept at ingest,
            // excluded from aggregation
            "2015-01-07 01:00:00,99999999,,,10.0,,,10.0,".to_string(),
        ],
    );
    let metadata_path = write_metadata_file(dir.path());

    let config = PipelineConfig::default();
    let stations = StationReader::new()
        .read_stations_map(&dir.path().join("stations.csv"))
        .unwrap();
    let readings = MeasurementReader::new(2)
        .read_all(dir.path(), &stations, None)
        .unwrap();
    assert_eq!(readings.len(), 5);

    let daily = DailyAggregator::new(config.pm25_cigarette_divisor).aggregate(&readings);
    // Two station-days: the unjoined reading is dropped
    assert_eq!(daily.len(), 2);

    let scenario_day = daily
        .iter()
        .find(|r| r.date == NaiveDate::from_ymd_opt(2015, 1, 7).unwrap())
        .unwrap();
    assert_eq!(scenario_day.station_name, "Plaza de España");
    assert_eq!(scenario_day.value(Pollutant::Pm25), Some(44.0));
    assert!((scenario_day.cigarettes.unwrap() - 2.0).abs() < 1e-12);

    let areas = MetadataReader::new().read_area_map(&metadata_path).unwrap();
    let pipeline = AirQualityPipeline::build(config, daily, &areas).unwrap();

    // Area attached through the normalized name "plaza de espana"
    let merged_scenario = pipeline
        .merged()
        .iter()
        .find(|r| r.year == 2015)
        .unwrap();
    assert_eq!(merged_scenario.area_type.as_deref(), Some("UT"));

    // The scenario day lands in the (2015, 1) monthly mean
    let january = pipeline
        .monthly_means()
        .iter()
        .find(|m| (m.year, m.month) == (2015, 1))
        .unwrap();
    assert_eq!(january.value(Pollutant::Pm25), Some(44.0));

    // Baseline year percentage pins to 100; 2015 is relative to it
    let yearly = pipeline.yearly_means();
    assert_eq!(yearly[0].year, 2001);
    assert_eq!(yearly[0].percentage(Pollutant::Pm25), Some(100.0));
    let pct_2015 = yearly[1].percentage(Pollutant::Pm25).unwrap();
    assert!((pct_2015 - 44.0 / 30.0 * 100.0).abs() < 1e-9);

    // Both (UT, year) cells survive the cigarette-view filter
    assert_eq!(pipeline.cigarette_view().len(), 2);
    assert!((pipeline.cigarette_view()[1].cigarettes - 2.0).abs() < 1e-12);
}

#[test]
fn test_daily_exports_round_trip() {
    let dir = TempDir::new().unwrap();

    let mut values: PollutantValues = Default::default();
    values[Pollutant::Pm25.index()] = Some(44.0);
    let record = DailyRecord {
        station_name: "Plaza de España".to_string(),
        latitude: Some(40.423882),
        longitude: Some(-3.712247),
        date: NaiveDate::from_ymd_opt(2015, 1, 7).unwrap(),
        year: 2015,
        month: 1,
        values,
        cigarettes: Some(2.0),
    };

    // CSV round trip
    let csv_path = dir.path().join("daily.csv");
    let csv_writer = CsvWriter::new();
    csv_writer.write_daily_records(&[record.clone()], &csv_path).unwrap();
    let read_back = csv_writer.read_daily_records(&csv_path).unwrap();
    assert_eq!(read_back.len(), 1);
    assert_eq!(read_back[0].station_name, "Plaza de España");
    assert_eq!(read_back[0].cigarettes, Some(2.0));

    // Parquet export with file info
    let parquet_path = dir.path().join("daily.parquet");
    let parquet_writer = ParquetWriter::new();
    parquet_writer
        .write_daily_records(&[record], &parquet_path)
        .unwrap();
    let info = parquet_writer.get_file_info(&parquet_path).unwrap();
    assert_eq!(info.total_rows, 1);

    // The analyzer reads the same records the writers handle
    let summary = DatasetAnalyzer::new().analyze(&read_back).unwrap();
    assert_eq!(summary.total_records, 1);
    assert_eq!(summary.unique_stations, 1);
}

#[test]
fn test_forecasts_span_observed_range_to_horizon() {
    // Eighteen years of monthly station-days, 2001 through 2018
    let mut daily = Vec::new();
    for year in 2001..=2018 {
        for month in 1..=12u32 {
            let mut values: PollutantValues = Default::default();
            let i = (year - 2001) as f64 * 12.0 + month as f64;
            let level = 25.0 - 0.03 * i
                + 3.0 * (2.0 * std::f64::consts::PI * month as f64 / 12.0).cos();
            values[Pollutant::Pm25.index()] = Some(level);
            let date = NaiveDate::from_ymd_opt(year, month, 15).unwrap();
            daily.push(DailyRecord {
                station_name: "Vallecas".to_string(),
                latitude: Some(40.388148),
                longitude: Some(-3.651529),
                date,
                year,
                month,
                values,
                cigarettes: Some(level / 22.0),
            });
        }
    }

    let pipeline =
        AirQualityPipeline::build(PipelineConfig::default(), daily, &AreaMap::new()).unwrap();
    let forecasts = pipeline.forecasts();

    // Only PM2.5 has data; the other six are skipped, not fatal
    assert_eq!(forecasts.len(), 1);
    let series = &forecasts[0];
    assert_eq!(series.pollutant, Pollutant::Pm25);

    // One row per month, 2001-01 through 2030-12
    assert_eq!(series.points.len(), 360);
    assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2001, 1, 1));
    assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2030, 12, 1));
    assert_eq!(series.observed_len(), 216);

    for window in series.points.windows(2) {
        assert!(window[0].date < window[1].date);
    }
    for point in &series.points {
        assert!(point.lower <= point.expected && point.expected <= point.upper);
    }
}
