use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "madrid-aq")]
#[command(about = "Madrid air-quality data processor and forecaster")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Pipeline config file (toml)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the daily aggregate from raw per-year measurement files
    Prepare {
        #[arg(
            short,
            long,
            help = "Directory with stations.csv and madrid_{year}.csv files"
        )]
        input_dir: PathBuf,

        #[arg(
            short,
            long,
            help = "Output file path [default: output/madrid-aq-daily-{YYMMDD}.csv]"
        )]
        output_file: Option<PathBuf>,

        #[arg(long, default_value = "csv", help = "Output format: csv or parquet")]
        format: String,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,
    },

    /// Derive the area/year/month views from a daily aggregate
    Views {
        #[arg(short, long, help = "Daily aggregate CSV produced by prepare")]
        daily_file: PathBuf,

        #[arg(
            short,
            long,
            help = "Semicolon-delimited station metadata file (ESTACION;NOM_TIPO)"
        )]
        metadata_file: PathBuf,

        #[arg(short, long, help = "Directory for the view CSV exports")]
        output_dir: PathBuf,
    },

    /// Fit per-pollutant forecasts from a daily aggregate
    Forecast {
        #[arg(short, long, help = "Daily aggregate CSV produced by prepare")]
        daily_file: PathBuf,

        #[arg(short, long, help = "Directory for the forecast CSV exports")]
        output_dir: PathBuf,

        #[arg(short, long, help = "Forecast a single pollutant (e.g. PM10)")]
        pollutant: Option<String>,

        #[arg(long, help = "Override the horizon end year")]
        horizon_year: Option<i32>,
    },

    /// Display information about a daily aggregate file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,

        #[arg(long, default_value = "false", help = "Emit the summary as JSON")]
        json: bool,
    },
}
