// Application state for HTTP handlers
use crate::application::device_service::DeviceService;
use crate::application::narrative_service::NarrativeService;
use crate::application::report_service::ReportService;

#[derive(Clone)]
pub struct AppState {
    pub device_service: DeviceService,
    pub narrative_service: NarrativeService,
    pub report_service: ReportService,
}
