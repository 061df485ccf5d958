use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::error::Result;
use crate::models::pollutant::{Pollutant, PollutantValues};
use crate::models::{
    AreaYearCigarettes, AreaYearMean, DailyRecord, ForecastSeries, MonthlyMean, YearlyMean,
};

/// On-disk row of the daily aggregate, matching the column layout the
/// dashboard consumes (name, coordinates, date parts, pollutants,
/// cigarette equivalent).
#[derive(Debug, Serialize, Deserialize)]
struct DailyRow {
    name: String,
    lat: Option<f64>,
    lon: Option<f64>,
    date: NaiveDate,
    year: i32,
    month: u32,

    #[serde(rename = "BEN")]
    ben: Option<f64>,

    #[serde(rename = "CO")]
    co: Option<f64>,

    #[serde(rename = "NO_2")]
    no_2: Option<f64>,

    #[serde(rename = "SO_2")]
    so_2: Option<f64>,

    #[serde(rename = "O_3")]
    o_3: Option<f64>,

    #[serde(rename = "PM25")]
    pm25: Option<f64>,

    #[serde(rename = "PM10")]
    pm10: Option<f64>,

    #[serde(rename = "Cigarettes")]
    cigarettes: Option<f64>,
}

impl From<&DailyRecord> for DailyRow {
    fn from(record: &DailyRecord) -> Self {
        Self {
            name: record.station_name.clone(),
            lat: record.latitude,
            lon: record.longitude,
            date: record.date,
            year: record.year,
            month: record.month,
            ben: record.value(Pollutant::Benzene),
            co: record.value(Pollutant::CarbonMonoxide),
            no_2: record.value(Pollutant::NitrogenDioxide),
            so_2: record.value(Pollutant::SulphurDioxide),
            o_3: record.value(Pollutant::Ozone),
            pm25: record.value(Pollutant::Pm25),
            pm10: record.value(Pollutant::Pm10),
            cigarettes: record.cigarettes,
        }
    }
}

impl DailyRow {
    fn into_record(self) -> DailyRecord {
        let mut values: PollutantValues = Default::default();
        values[Pollutant::Benzene.index()] = self.ben;
        values[Pollutant::CarbonMonoxide.index()] = self.co;
        values[Pollutant::NitrogenDioxide.index()] = self.no_2;
        values[Pollutant::SulphurDioxide.index()] = self.so_2;
        values[Pollutant::Ozone.index()] = self.o_3;
        values[Pollutant::Pm25.index()] = self.pm25;
        values[Pollutant::Pm10.index()] = self.pm10;

        DailyRecord {
            station_name: self.name,
            latitude: self.lat,
            longitude: self.lon,
            date: self.date,
            // Derived parts come from the date column, so a file
            // edited by hand cannot desynchronize them
            year: self.date.year(),
            month: self.date.month(),
            values,
            cigarettes: self.cigarettes,
        }
    }
}

pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_daily_records(&self, records: &[DailyRecord], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_writer(File::create(path)?);
        for record in records {
            writer.serialize(DailyRow::from(record))?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read_daily_records(&self, path: &Path) -> Result<Vec<DailyRecord>> {
        let mut reader = csv::Reader::from_reader(File::open(path)?);
        let mut records = Vec::new();
        for result in reader.deserialize() {
            let row: DailyRow = result?;
            records.push(row.into_record());
        }
        Ok(records)
    }

    pub fn write_cigarette_view(&self, view: &[AreaYearCigarettes], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_writer(File::create(path)?);
        writer.write_record(["area_type", "year", "cigarettes"])?;
        for row in view {
            writer.write_record([
                row.area_type.clone(),
                row.year.to_string(),
                row.cigarettes.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_monthly_means(&self, view: &[MonthlyMean], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_writer(File::create(path)?);
        let mut header = vec!["year".to_string(), "month".to_string()];
        header.extend(Pollutant::ALL.iter().map(|p| p.column_name().to_string()));
        writer.write_record(&header)?;

        for row in view {
            let mut fields = vec![row.year.to_string(), row.month.to_string()];
            fields.extend(row.values.iter().map(format_optional));
            writer.write_record(&fields)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_yearly_means(&self, view: &[YearlyMean], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_writer(File::create(path)?);
        let mut header = vec!["year".to_string()];
        header.extend(Pollutant::ALL.iter().map(|p| p.column_name().to_string()));
        header.extend(
            Pollutant::ALL
                .iter()
                .map(|p| format!("{}_percentage", p.column_name())),
        );
        writer.write_record(&header)?;

        for row in view {
            let mut fields = vec![row.year.to_string()];
            fields.extend(row.values.iter().map(format_optional));
            fields.extend(row.percentages.iter().map(format_optional));
            writer.write_record(&fields)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_area_year_means(&self, view: &[AreaYearMean], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_writer(File::create(path)?);
        let mut header = vec!["area_type".to_string(), "year".to_string()];
        header.extend(Pollutant::ALL.iter().map(|p| p.column_name().to_string()));
        writer.write_record(&header)?;

        for row in view {
            let mut fields = vec![row.area_type.clone(), row.year.to_string()];
            fields.extend(row.values.iter().map(format_optional));
            writer.write_record(&fields)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_forecast_series(&self, series: &ForecastSeries, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_writer(File::create(path)?);
        writer.write_record(["date", "expected", "lower", "upper", "observed"])?;
        for point in &series.points {
            writer.write_record([
                point.date.to_string(),
                point.expected.to_string(),
                point.lower.to_string(),
                point.upper.to_string(),
                point
                    .observed
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn format_optional(value: &Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
