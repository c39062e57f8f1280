// Report artifacts - chart images and finished documents
use bytes::Bytes;
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// The fixed set of charts every report carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartRole {
    Sensors,
    GpiTrend,
    Environment,
    Distribution,
}

impl ChartRole {
    pub const ALL: [ChartRole; 4] = [
        ChartRole::Sensors,
        ChartRole::GpiTrend,
        ChartRole::Environment,
        ChartRole::Distribution,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ChartRole::Sensors => "sensors.png",
            ChartRole::GpiTrend => "gpi.png",
            ChartRole::Environment => "env.png",
            ChartRole::Distribution => "distribution.png",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartRole::Sensors => "Sensor Readings Graph",
            ChartRole::GpiTrend => "Gas Pollution Index (GPI) Trend",
            ChartRole::Environment => "Environmental Conditions",
            ChartRole::Distribution => "Value Distribution Analysis",
        }
    }
}

/// A rendered chart living in the per-report scratch directory
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    pub role: ChartRole,
    pub path: PathBuf,
    pub legend: Vec<LegendEntry>,
    /// Axis note printed under the image, e.g. the y range
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: (u8, u8, u8),
}

impl LegendEntry {
    pub fn new(label: impl Into<String>, color: (u8, u8, u8)) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChartSet {
    pub charts: Vec<ChartArtifact>,
}

impl ChartSet {
    pub fn get(&self, role: ChartRole) -> Option<&ChartArtifact> {
        self.charts.iter().find(|c| c.role == role)
    }

    #[cfg(test)]
    pub fn paths(&self) -> impl Iterator<Item = &std::path::Path> {
        self.charts.iter().map(|c| c.path.as_path())
    }
}

/// A finished download: PDF report or CSV export
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

impl ReportDocument {
    pub fn pdf(generated_at: DateTime<Local>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: stamped_name("pranbot_report", "pdf", generated_at),
            content_type: "application/pdf",
            bytes: Bytes::from(bytes),
        }
    }

    pub fn csv(generated_at: DateTime<Local>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: stamped_name("pranbot_data", "csv", generated_at),
            content_type: "text/csv",
            bytes: Bytes::from(bytes),
        }
    }
}

/// `<prefix>_YYYYmmdd_HHMMSS.<ext>`
pub fn stamped_name(prefix: &str, extension: &str, at: DateTime<Local>) -> String {
    format!("{}_{}.{}", prefix, at.format("%Y%m%d_%H%M%S"), extension)
}
