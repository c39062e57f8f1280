// Report service - Orchestrates validation, statistics, charts, narrative and PDF assembly
use crate::application::narrative_service::NarrativeService;
use crate::domain::error::ReportError;
use crate::domain::report::ReportDocument;
use crate::domain::sensor::SensorData;
use crate::domain::statistics::ReportStatistics;
use crate::infrastructure::pdf::{Block, ReportHeader};
use crate::infrastructure::{charts, csv_export, pdf};
use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

#[derive(Clone)]
pub struct ReportService {
    narrative: NarrativeService,
    archive_dir: Option<PathBuf>,
    model_label: String,
}

impl ReportService {
    pub fn new(
        narrative: NarrativeService,
        archive_dir: Option<PathBuf>,
        model_label: impl Into<String>,
    ) -> Self {
        Self {
            narrative,
            archive_dir,
            model_label: model_label.into(),
        }
    }

    /// Build the PDF report for one batch.
    ///
    /// A narrative failure does not fail the report; it is printed in the
    /// analysis section instead.
    pub async fn generate_report(&self, data: SensorData) -> Result<ReportDocument, ReportError> {
        let draft = self.draft(data).await?;
        let generated_at = draft.generated_at;
        let bytes = tokio::task::spawn_blocking(move || draft.render()).await??;

        let document = ReportDocument::pdf(generated_at, bytes);
        tracing::info!(
            "Report {} ready ({} bytes)",
            document.file_name,
            document.bytes.len()
        );
        Ok(document)
    }

    /// Everything up to typesetting: archive, statistics, charts and narrative
    async fn draft(&self, data: SensorData) -> Result<ReportDraft, ReportError> {
        let generated_at = Local::now();
        let records = Arc::new(data.into_report_records()?);
        tracing::info!("Generating report from {} records", records.len());

        if let Some(dir) = self.archive_dir.clone() {
            let records = records.clone();
            tokio::task::spawn_blocking(move || csv_export::archive(&records, &dir, generated_at))
                .await??;
        }

        let stats = ReportStatistics::summarize(&records)?;

        let scratch = tempfile::Builder::new()
            .prefix("pranbot_report_")
            .tempdir()?;
        let chart_dir = scratch.path().to_path_buf();
        let chart_records = records.clone();
        let charts =
            tokio::task::spawn_blocking(move || charts::render_all(&chart_records, &chart_dir))
                .await??;
        tracing::info!("Rendered {} charts", charts.charts.len());

        let narrative = self.narrative.narrate(&stats).await;

        let header = ReportHeader {
            generated_at,
            model_label: self.model_label.clone(),
        };
        let plan = pdf::layout_plan(&header, &stats, &charts, &narrative)?;

        Ok(ReportDraft {
            generated_at,
            plan,
            scratch,
        })
    }

    /// Serialize the batch to CSV without any further analysis
    pub fn export_csv(&self, data: SensorData) -> Result<ReportDocument, ReportError> {
        let records = data.into_export_records()?;
        let bytes = csv_export::to_csv_bytes(&records)?;
        tracing::info!("Exported {} records as CSV", records.len());
        Ok(ReportDocument::csv(Local::now(), bytes))
    }
}

/// A laid-out report whose charts still live in the scratch directory
struct ReportDraft {
    generated_at: DateTime<Local>,
    plan: Vec<Block>,
    scratch: TempDir,
}

impl ReportDraft {
    /// Typeset the plan, then remove the scratch directory whether or not that succeeded
    fn render(self) -> Result<Vec<u8>, ReportError> {
        let bytes = pdf::render(&self.plan);
        if let Err(e) = self.scratch.close() {
            tracing::warn!("Could not remove chart scratch directory: {}", e);
        }
        bytes
    }
}
