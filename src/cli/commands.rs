use crate::analyzers::DatasetAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::forecast::ForecastFeed;
use crate::models::Pollutant;
use crate::processors::aggregate_views;
use crate::processors::{AirQualityPipeline, DailyAggregator};
use crate::readers::{MeasurementReader, MetadataReader, StationReader};
use crate::utils::constants::STATIONS_FILE;
use crate::utils::filename::generate_default_daily_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvWriter, ParquetWriter};

pub async fn run(cli: Cli) -> Result<()> {
    let config = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Prepare {
            input_dir,
            output_file,
            format,
            compression,
            max_workers,
        } => {
            println!("Preparing daily aggregate...");
            println!("Input directory: {}", input_dir.display());
            println!("Workers: {}", max_workers);

            let progress = ProgressReporter::new_spinner("Reading measurement data...", false);

            let stations =
                StationReader::new().read_stations_map(&input_dir.join(STATIONS_FILE))?;
            let readings =
                MeasurementReader::new(max_workers).read_all(&input_dir, &stations, Some(&progress))?;

            progress.set_message("Aggregating daily means...");
            let daily = DailyAggregator::new(config.pm25_cigarette_divisor).aggregate(&readings);
            progress.finish_with_message(&format!(
                "Aggregated {} station-days from {} readings",
                daily.len(),
                readings.len()
            ));

            let output_file = output_file.unwrap_or_else(generate_default_daily_filename);
            if let Some(parent) = output_file.parent() {
                std::fs::create_dir_all(parent)?;
            }

            match format.as_str() {
                "csv" => {
                    CsvWriter::new().write_daily_records(&daily, &output_file)?;
                }
                "parquet" => {
                    let writer = ParquetWriter::new().with_compression(&compression)?;
                    writer.write_daily_records(&daily, &output_file)?;
                    let info = writer.get_file_info(&output_file)?;
                    println!("\n{}", info.summary());
                }
                other => {
                    return Err(PipelineError::Config(format!(
                        "unsupported output format: {}",
                        other
                    )))
                }
            }

            let summary = DatasetAnalyzer::new().analyze(&daily)?;
            println!("\n{}", summary.summary());
            println!("Wrote {}", output_file.display());
        }

        Commands::Views {
            daily_file,
            metadata_file,
            output_dir,
        } => {
            println!("Deriving aggregate views...");
            println!("Daily aggregate: {}", daily_file.display());

            let daily = CsvWriter::new().read_daily_records(&daily_file)?;
            let areas = MetadataReader::new().read_area_map(&metadata_file)?;
            let pipeline = AirQualityPipeline::build(config, daily, &areas)?;

            std::fs::create_dir_all(&output_dir)?;
            let writer = CsvWriter::new();
            writer.write_cigarette_view(
                pipeline.cigarette_view(),
                &output_dir.join("cigarettes_by_area_year.csv"),
            )?;
            writer.write_monthly_means(
                pipeline.monthly_means(),
                &output_dir.join("monthly_means.csv"),
            )?;
            writer.write_yearly_means(
                pipeline.yearly_means(),
                &output_dir.join("yearly_means.csv"),
            )?;
            writer.write_area_year_means(
                pipeline.area_year_means(),
                &output_dir.join("area_year_means.csv"),
            )?;

            println!(
                "Cigarette view: {} rows, monthly means: {} rows, yearly means: {} rows, area/year means: {} rows",
                pipeline.cigarette_view().len(),
                pipeline.monthly_means().len(),
                pipeline.yearly_means().len(),
                pipeline.area_year_means().len()
            );
            println!("Wrote view files to {}", output_dir.display());
        }

        Commands::Forecast {
            daily_file,
            output_dir,
            pollutant,
            horizon_year,
        } => {
            let mut config = config;
            if let Some(year) = horizon_year {
                config.horizon_end_year = year;
            }

            println!("Fitting pollutant forecasts...");
            println!("Daily aggregate: {}", daily_file.display());
            println!("Horizon: December {}", config.horizon_end_year);

            let daily = CsvWriter::new().read_daily_records(&daily_file)?;
            let monthly = aggregate_views::monthly_means(&daily);
            let feed = ForecastFeed::new(config);

            let series_list = match pollutant {
                Some(name) => {
                    let pollutant = Pollutant::from_arg(&name)?;
                    vec![feed.forecast_pollutant(&monthly, pollutant)?]
                }
                None => feed.forecast_all(&monthly),
            };

            if series_list.is_empty() {
                println!("No pollutant had enough data to forecast");
                return Ok(());
            }

            std::fs::create_dir_all(&output_dir)?;
            let writer = CsvWriter::new();
            for series in &series_list {
                let path = output_dir.join(format!(
                    "forecast_{}.csv",
                    series.pollutant.column_name().to_lowercase()
                ));
                writer.write_forecast_series(series, &path)?;
                println!(
                    "{}: {} months ({} observed) -> {}",
                    series.pollutant,
                    series.points.len(),
                    series.observed_len(),
                    path.display()
                );
            }
        }

        Commands::Info { file, sample, json } => {
            let daily = CsvWriter::new().read_daily_records(&file)?;
            let summary = DatasetAnalyzer::new().analyze(&daily)?;

            if json {
                println!("{}", summary.to_json()?);
            } else {
                println!("{}", summary.summary());

                if sample > 0 {
                    println!("Sample Records (showing up to {} records):", sample);
                    for (i, record) in daily.iter().take(sample).enumerate() {
                        println!(
                            "{}. {} on {}: PM2.5={}, cigarettes={}",
                            i + 1,
                            record.station_name,
                            record.date,
                            format_value(record.value(Pollutant::Pm25)),
                            format_value(record.cigarettes),
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}
