use crate::error::Result;
use crate::models::pollutant::Pollutant;
use crate::models::DailyRecord;
use crate::utils::constants::DEFAULT_ROW_GROUP_SIZE;
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            "snappy" => Compression::SNAPPY,
            "gzip" => Compression::GZIP(GzipLevel::default()),
            "lz4" => Compression::LZ4,
            "zstd" => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            "none" => Compression::UNCOMPRESSED,
            _ => {
                return Err(crate::error::PipelineError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write the daily aggregate to a Parquet file.
    pub fn write_daily_records(&self, records: &[DailyRecord], path: &Path) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let schema = self.create_schema();
        let batch = self.records_to_batch(records, schema.clone())?;

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        Ok(())
    }

    fn create_schema(&self) -> Arc<Schema> {
        let mut fields = vec![
            Field::new("name", DataType::Utf8, false),
            Field::new("lat", DataType::Float64, true),
            Field::new("lon", DataType::Float64, true),
            Field::new("date", DataType::Date32, false),
            Field::new("year", DataType::Int32, false),
            Field::new("month", DataType::Int32, false),
        ];
        for pollutant in Pollutant::ALL {
            fields.push(Field::new(
                pollutant.column_name(),
                DataType::Float64,
                true,
            ));
        }
        fields.push(Field::new("Cigarettes", DataType::Float64, true));

        Arc::new(Schema::new(fields))
    }

    fn records_to_batch(
        &self,
        records: &[DailyRecord],
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let epoch = NaiveDate::default(); // 1970-01-01

        let names: Vec<String> = records.iter().map(|r| r.station_name.clone()).collect();
        let lats: Vec<Option<f64>> = records.iter().map(|r| r.latitude).collect();
        let lons: Vec<Option<f64>> = records.iter().map(|r| r.longitude).collect();
        let dates: Vec<i32> = records
            .iter()
            .map(|r| r.date.signed_duration_since(epoch).num_days() as i32)
            .collect();
        let years: Vec<i32> = records.iter().map(|r| r.year).collect();
        let months: Vec<i32> = records.iter().map(|r| r.month as i32).collect();

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(names)),
            Arc::new(Float64Array::from(lats)),
            Arc::new(Float64Array::from(lons)),
            Arc::new(Date32Array::from(dates)),
            Arc::new(Int32Array::from(years)),
            Arc::new(Int32Array::from(months)),
        ];

        for pollutant in Pollutant::ALL {
            let values: Vec<Option<f64>> =
                records.iter().map(|r| r.value(pollutant)).collect();
            columns.push(Arc::new(Float64Array::from(values)));
        }

        let cigarettes: Vec<Option<f64>> = records.iter().map(|r| r.cigarettes).collect();
        columns.push(Arc::new(Float64Array::from(cigarettes)));

        let batch = RecordBatch::try_new(schema, columns)?;
        Ok(batch)
    }

    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0, // Convert to MB
            self.compression,
        )
    }
}
