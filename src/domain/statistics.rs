// Descriptive statistics over a batch of sensor records
use std::fmt;

use super::error::ValidationError;
use super::sensor::{SensorColumn, SensorRecord};

/// Records compared at each end of the batch for the GPI trend
pub const TREND_WINDOW: usize = 5;

/// GPI above this counts as moderate or worse
pub const GPI_MODERATE_LIMIT: f64 = 100.0;

/// GPI above this counts as unhealthy or worse
pub const GPI_UNHEALTHY_LIMIT: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorStatus {
    Normal,
    Alert,
    Good,
    Moderate,
    Unhealthy,
    NotRated,
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SensorStatus::Normal => "Normal",
            SensorStatus::Alert => "Alert",
            SensorStatus::Good => "Good",
            SensorStatus::Moderate => "Moderate",
            SensorStatus::Unhealthy => "Unhealthy",
            SensorStatus::NotRated => "-",
        };
        f.write_str(label)
    }
}

/// Classify a column mean against its fixed threshold.
///
/// A mean sitting exactly on a threshold falls on the worse side.
pub fn classify(column: SensorColumn, mean: f64) -> SensorStatus {
    let alert_at = |limit: f64| {
        if mean < limit {
            SensorStatus::Normal
        } else {
            SensorStatus::Alert
        }
    };

    match column {
        SensorColumn::Smoke => alert_at(900.0),
        SensorColumn::Methane => alert_at(200.0),
        SensorColumn::Co => alert_at(100.0),
        SensorColumn::Air => alert_at(150.0),
        SensorColumn::Gpi => {
            if mean < 50.0 {
                SensorStatus::Good
            } else if mean < 100.0 {
                SensorStatus::Moderate
            } else {
                SensorStatus::Unhealthy
            }
        }
        SensorColumn::Temperature | SensorColumn::Humidity => SensorStatus::NotRated,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStatistics {
    pub column: SensorColumn,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation (n - 1); zero for a single value
    pub std_dev: f64,
    pub status: SensorStatus,
}

impl SeriesStatistics {
    pub fn compute(column: SensorColumn, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = mean(values);
        let std_dev = if values.len() > 1 {
            let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            (sum_sq / (values.len() - 1) as f64).sqrt()
        } else {
            0.0
        };

        Some(Self {
            column,
            min,
            max,
            mean,
            std_dev,
            status: classify(column, mean),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpiTrend {
    Increasing,
    Decreasing,
}

impl fmt::Display for GpiTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpiTrend::Increasing => f.write_str("increasing"),
            GpiTrend::Decreasing => f.write_str("decreasing"),
        }
    }
}

/// Records averaged at each end of a batch of `len` values.
///
/// Batches shorter than the window average everything on both sides, so they
/// always read as decreasing. A batch of exactly one window drops one record
/// per side, otherwise both ends would be the same records.
fn trend_window(len: usize) -> usize {
    match len {
        n if n < TREND_WINDOW => n,
        TREND_WINDOW => TREND_WINDOW - 1,
        _ => TREND_WINDOW,
    }
}

/// Compare the mean of the last window against the first; ties read as decreasing.
pub fn gpi_trend(values: &[f64]) -> GpiTrend {
    if values.is_empty() {
        return GpiTrend::Decreasing;
    }
    let window = trend_window(values.len());
    let head = mean(&values[..window]);
    let tail = mean(&values[values.len() - window..]);
    if tail > head {
        GpiTrend::Increasing
    } else {
        GpiTrend::Decreasing
    }
}

/// Records strictly above a GPI limit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exceedance {
    pub count: usize,
    pub percent: f64,
}

impl Exceedance {
    pub fn over(values: &[f64], limit: f64) -> Self {
        let count = values.iter().filter(|v| **v > limit).count();
        let percent = if values.is_empty() {
            0.0
        } else {
            count as f64 / values.len() as f64 * 100.0
        };
        Self { count, percent }
    }
}

/// Everything the narrative and the document need to know about a batch
#[derive(Debug, Clone)]
pub struct ReportStatistics {
    pub record_count: usize,
    pub first_timestamp: String,
    pub last_timestamp: String,
    pub series: Vec<SeriesStatistics>,
    pub gpi_trend: GpiTrend,
    pub gpi_over_moderate: Exceedance,
    pub gpi_over_unhealthy: Exceedance,
}

impl ReportStatistics {
    pub fn summarize(records: &[SensorRecord]) -> Result<Self, ValidationError> {
        let (first, last) = match (records.first(), records.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ValidationError::NoData),
        };

        let series = SensorColumn::ALL
            .iter()
            .filter_map(|column| SeriesStatistics::compute(*column, &column.values(records)))
            .collect();

        let gpi = SensorColumn::Gpi.values(records);

        Ok(Self {
            record_count: records.len(),
            first_timestamp: first.timestamp.clone(),
            last_timestamp: last.timestamp.clone(),
            series,
            gpi_trend: gpi_trend(&gpi),
            gpi_over_moderate: Exceedance::over(&gpi, GPI_MODERATE_LIMIT),
            gpi_over_unhealthy: Exceedance::over(&gpi, GPI_UNHEALTHY_LIMIT),
        })
    }

    #[cfg(test)]
    pub fn get(&self, column: SensorColumn) -> Option<&SeriesStatistics> {
        self.series.iter().find(|s| s.column == column)
    }
}

/// Box-plot summary: quartiles plus whiskers at the furthest values within 1.5 IQR
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

impl BoxSummary {
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = percentile(&sorted, 0.25);
        let median = percentile(&sorted, 0.5);
        let q3 = percentile(&sorted, 0.75);
        let reach = 1.5 * (q3 - q1);

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|v| *v >= q1 - reach)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= q3 + reach)
            .unwrap_or(q3);

        Some(Self {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

// Linear interpolation between closest ranks; `sorted` must be non-empty
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}
