// Narrative service - Builds the analysis prompt and absorbs generation failures
use crate::application::text_generator::{ServiceStatus, TextGenerator};
use crate::domain::narrative::NarrativeText;
use crate::domain::sensor::SensorColumn;
use crate::domain::statistics::{ReportStatistics, SeriesStatistics};
use std::fmt::Write;
use std::sync::Arc;

const ANALYSIS_OUTLINE: &str = "\
Please provide:

1. EXECUTIVE SUMMARY (2-3 paragraphs):
- Overall air quality assessment
- Key findings and concerns
- Risk level classification

2. DETAILED SENSOR ANALYSIS:
- Analysis of each sensor (MQ-2, MQ-3, MQ-7, MQ-135)
- What each reading indicates about environmental conditions
- Correlation between sensors

3. GAS POLLUTION INDEX (GPI) ASSESSMENT:
- GPI trend interpretation
- Time periods of concern
- Comparison to safety standards

4. ENVIRONMENTAL CONDITIONS:
- Temperature and humidity impact on sensor readings
- Environmental comfort assessment

5. SAFETY RECOMMENDATIONS:
- Immediate actions if needed
- Long-term monitoring suggestions
- Ventilation recommendations

6. TECHNICAL CONCLUSIONS:
- Sensor calibration observations
- Data quality assessment
- System performance notes

Write in a professional, technical style suitable for industrial safety reports. \
Be specific with numbers and percentages.";

#[derive(Clone)]
pub struct NarrativeService {
    generator: Arc<dyn TextGenerator>,
}

impl NarrativeService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    pub async fn status(&self) -> ServiceStatus {
        self.generator.status().await
    }

    /// Never fails: a broken model service yields an inline "Error..." note instead
    pub async fn narrate(&self, stats: &ReportStatistics) -> NarrativeText {
        let prompt = build_prompt(stats);

        tracing::info!("Generating AI analysis with {}", self.generator.model());
        match self.generator.generate(&prompt).await {
            Ok(text) => {
                tracing::info!("AI analysis complete ({} chars)", text.len());
                NarrativeText::generated(text)
            }
            Err(e) => {
                tracing::warn!("AI analysis unavailable: {}", e);
                NarrativeText::failure(e.to_string())
            }
        }
    }
}

/// Prompt embedding the batch statistics and the six-part outline
pub fn build_prompt(stats: &ReportStatistics) -> String {
    let mut summary = String::new();
    let _ = writeln!(summary, "Sensor Data Statistics:");
    let _ = writeln!(summary, "- Total Records: {}", stats.record_count);
    let _ = writeln!(
        summary,
        "- Time Range: {} to {}",
        stats.first_timestamp, stats.last_timestamp
    );
    let _ = writeln!(summary);
    for series in &stats.series {
        let _ = writeln!(summary, "{}", describe_series(series));
    }

    let moderate = stats.gpi_over_moderate;
    let unhealthy = stats.gpi_over_unhealthy;
    let trend = format!(
        "Trend Analysis:\n\
         - GPI Trend: {}\n\
         - Records with Moderate+ GPI (>100): {} ({:.1}%)\n\
         - Records with Unhealthy+ GPI (>200): {} ({:.1}%)",
        stats.gpi_trend, moderate.count, moderate.percent, unhealthy.count, unhealthy.percent
    );

    format!(
        "You are an expert environmental safety analyst reviewing sensor data from an \
         autonomous gas detection robot called Pran-Bot. Analyze the following sensor data \
         and provide a comprehensive technical report.\n\n{}\n{}\n\n{}",
        summary, trend, ANALYSIS_OUTLINE
    )
}

fn describe_series(series: &SeriesStatistics) -> String {
    let column = series.column;
    let (min, max) = if column.is_integer() {
        (format!("{:.0}", series.min), format!("{:.0}", series.max))
    } else {
        (format!("{:.1}", series.min), format!("{:.1}", series.max))
    };

    match column {
        SensorColumn::Temperature => format!(
            "Temperature: Min={}C, Max={}C, Mean={:.1}C",
            min, max, series.mean
        ),
        SensorColumn::Humidity => format!(
            "Humidity: Min={}%, Max={}%, Mean={:.1}%",
            min, max, series.mean
        ),
        SensorColumn::Gpi => format!("GPI: Min={}, Max={}, Mean={:.1}", min, max, series.mean),
        _ => format!(
            "{}: Min={}, Max={}, Mean={:.1}, Std={:.1}",
            column.label(),
            min,
            max,
            series.mean,
            series.std_dev
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::text_generator::GenerationError;
    use crate::domain::sensor::tests::sample_data;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedGenerator {
        reply: Result<String, GenerationError>,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        fn model(&self) -> &str {
            "test-model"
        }

        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone()
        }

        async fn status(&self) -> ServiceStatus {
            ServiceStatus::Connected
        }
    }

    fn stats() -> ReportStatistics {
        let records = sample_data(6).into_report_records().unwrap();
        ReportStatistics::summarize(&records).unwrap()
    }

    #[test]
    fn test_prompt_embeds_statistics_and_outline() {
        let prompt = build_prompt(&stats());
        assert!(prompt.contains("- Total Records: 6"));
        assert!(prompt.contains("- Time Range: 10:00 to 10:05"));
        assert!(prompt.contains("MQ-2 (Smoke): Min=300, Max=350, Mean=325.0"));
        assert!(prompt.contains("- GPI Trend: increasing"));
        for section in [
            "1. EXECUTIVE SUMMARY",
            "2. DETAILED SENSOR ANALYSIS",
            "3. GAS POLLUTION INDEX (GPI) ASSESSMENT",
            "4. ENVIRONMENTAL CONDITIONS",
            "5. SAFETY RECOMMENDATIONS",
            "6. TECHNICAL CONCLUSIONS",
        ] {
            assert!(prompt.contains(section), "missing {section}");
        }
    }

    #[tokio::test]
    async fn test_generated_text_passes_through() {
        let generator = Arc::new(ScriptedGenerator {
            reply: Ok("1. EXECUTIVE SUMMARY\n\nAll clear.".into()),
            prompts: Mutex::new(Vec::new()),
        });
        let service = NarrativeService::new(generator.clone());

        let narrative = service.narrate(&stats()).await;
        assert!(!narrative.is_failure());
        assert_eq!(narrative.text(), "1. EXECUTIVE SUMMARY\n\nAll clear.");
        assert_eq!(generator.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_becomes_inline_error_text() {
        let generator = Arc::new(ScriptedGenerator {
            reply: Err(GenerationError::Status(503)),
            prompts: Mutex::new(Vec::new()),
        });
        let narrative = NarrativeService::new(generator).narrate(&stats()).await;
        assert!(narrative.is_failure());
        assert_eq!(narrative.text(), "Error: 503");
    }
}
