// Sensor data domain models - columnar request payload and row records
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Fewest records a PDF report can be built from
pub const MIN_REPORT_RECORDS: usize = 3;

/// Parallel arrays as posted by the terminal UI
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SensorData {
    pub timestamps: Vec<String>,
    pub smoke: Vec<i64>,
    pub methane: Vec<i64>,
    pub co: Vec<i64>,
    pub air: Vec<i64>,
    pub gpi: Vec<f64>,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
}

/// One time-stamped observation. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorRecord {
    pub timestamp: String,
    pub smoke: i64,
    pub methane: i64,
    pub co: i64,
    pub air: i64,
    pub gpi: f64,
    pub temperature: f64,
    pub humidity: f64,
}

impl SensorData {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Reshape for the PDF pipeline, which needs at least three rows
    pub fn into_report_records(self) -> Result<Vec<SensorRecord>, ValidationError> {
        if self.len() < MIN_REPORT_RECORDS {
            return Err(ValidationError::NotEnoughRecords(self.len()));
        }
        self.into_records()
    }

    /// Reshape for the CSV export, which accepts any non-empty batch
    pub fn into_export_records(self) -> Result<Vec<SensorRecord>, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::NoData);
        }
        self.into_records()
    }

    fn into_records(self) -> Result<Vec<SensorRecord>, ValidationError> {
        let expected = self.len();
        let lengths = [
            ("smoke", self.smoke.len()),
            ("methane", self.methane.len()),
            ("co", self.co.len()),
            ("air", self.air.len()),
            ("gpi", self.gpi.len()),
            ("temperature", self.temperature.len()),
            ("humidity", self.humidity.len()),
        ];
        if let Some((column, actual)) = lengths.into_iter().find(|(_, len)| *len != expected) {
            return Err(ValidationError::ColumnLengthMismatch {
                column,
                expected,
                actual,
            });
        }

        let records = self
            .timestamps
            .into_iter()
            .enumerate()
            .map(|(i, timestamp)| SensorRecord {
                timestamp,
                smoke: self.smoke[i],
                methane: self.methane[i],
                co: self.co[i],
                air: self.air[i],
                gpi: self.gpi[i],
                temperature: self.temperature[i],
                humidity: self.humidity[i],
            })
            .collect();

        Ok(records)
    }
}

/// Numeric columns tracked by the statistics and charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorColumn {
    Smoke,
    Methane,
    Co,
    Air,
    Gpi,
    Temperature,
    Humidity,
}

impl SensorColumn {
    pub const ALL: [SensorColumn; 7] = [
        SensorColumn::Smoke,
        SensorColumn::Methane,
        SensorColumn::Co,
        SensorColumn::Air,
        SensorColumn::Gpi,
        SensorColumn::Temperature,
        SensorColumn::Humidity,
    ];

    /// The MQ gas-sensor array
    pub const GAS: [SensorColumn; 4] = [
        SensorColumn::Smoke,
        SensorColumn::Methane,
        SensorColumn::Co,
        SensorColumn::Air,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SensorColumn::Smoke => "smoke",
            SensorColumn::Methane => "methane",
            SensorColumn::Co => "co",
            SensorColumn::Air => "air",
            SensorColumn::Gpi => "gpi",
            SensorColumn::Temperature => "temperature",
            SensorColumn::Humidity => "humidity",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SensorColumn::Smoke => "MQ-2 (Smoke)",
            SensorColumn::Methane => "MQ-3 (Methane)",
            SensorColumn::Co => "MQ-7 (CO)",
            SensorColumn::Air => "MQ-135 (Air)",
            SensorColumn::Gpi => "GPI",
            SensorColumn::Temperature => "Temperature (C)",
            SensorColumn::Humidity => "Humidity (%)",
        }
    }

    /// Raw ADC columns are printed without decimals
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            SensorColumn::Smoke | SensorColumn::Methane | SensorColumn::Co | SensorColumn::Air
        )
    }

    pub fn value(self, record: &SensorRecord) -> f64 {
        match self {
            SensorColumn::Smoke => record.smoke as f64,
            SensorColumn::Methane => record.methane as f64,
            SensorColumn::Co => record.co as f64,
            SensorColumn::Air => record.air as f64,
            SensorColumn::Gpi => record.gpi,
            SensorColumn::Temperature => record.temperature,
            SensorColumn::Humidity => record.humidity,
        }
    }

    pub fn values(self, records: &[SensorRecord]) -> Vec<f64> {
        records.iter().map(|r| self.value(r)).collect()
    }
}
