// HTTP request handlers
use crate::domain::device::{DeviceAck, DeviceReading, DeviceSnapshot};
use crate::domain::sensor::SensorData;
use crate::infrastructure::http_response::attachment_response;
use crate::presentation::api_error::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct CommandQuery {
    pub d: Option<String>,
}

#[derive(Deserialize)]
pub struct AutoQuery {
    pub v: Option<String>,
}

/// Body of both export endpoints
#[derive(Deserialize)]
pub struct ReportRequest {
    #[serde(rename = "sensorData", default)]
    pub sensor_data: SensorData,
}

#[derive(Serialize)]
struct MockPayload {
    #[serde(flatten)]
    snapshot: DeviceSnapshot,
    mock: bool,
}

#[derive(Serialize)]
struct DegradedPayload {
    #[serde(flatten)]
    snapshot: DeviceSnapshot,
    error: String,
}

/// Current robot readings; always a well-formed payload even when the robot is away
pub async fn get_data(State(state): State<Arc<AppState>>) -> Response {
    match state.device_service.read().await {
        DeviceReading::Live(body) => Json(body).into_response(),
        DeviceReading::Mock(snapshot) => Json(MockPayload {
            snapshot,
            mock: true,
        })
        .into_response(),
        DeviceReading::Unavailable(e) => {
            let status = if e.is_transport() {
                StatusCode::GATEWAY_TIMEOUT
            } else {
                StatusCode::BAD_GATEWAY
            };
            let payload = DegradedPayload {
                snapshot: DeviceSnapshot::degraded(),
                error: e.to_string(),
            };
            (status, Json(payload)).into_response()
        }
    }
}

fn ack_body(ack: DeviceAck) -> Json<serde_json::Value> {
    match ack {
        DeviceAck::Sent => Json(json!({ "status": "OK" })),
        DeviceAck::Mock => Json(json!({ "status": "OK", "mock": true })),
    }
}

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(message.to_string()))
}

/// Forward one drive/servo command
pub async fn send_cmd(
    Query(query): Query<CommandQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let command = required(query.d, "No command provided")?;
    let ack = state.device_service.send_command(&command).await?;
    Ok(ack_body(ack))
}

/// Toggle autonomous mode
pub async fn set_auto(
    Query(query): Query<AutoQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let value = required(query.v, "No value provided")?;
    let ack = state.device_service.set_auto(&value).await?;
    Ok(ack_body(ack))
}

/// Service liveness plus the state of the language model backend
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let ollama = state.narrative_service.status().await;
    Json(json!({
        "status": "running",
        "ollama": ollama,
        "model": state.narrative_service.model(),
    }))
}

fn sensor_data(payload: Result<Json<ReportRequest>, JsonRejection>) -> Result<SensorData, ApiError> {
    payload
        .map(|Json(request)| request.sensor_data)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

fn into_attachment(document: crate::domain::report::ReportDocument) -> Response {
    match attachment_response(document) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Full PDF report for the posted batch
pub async fn generate_report(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let data = sensor_data(payload)?;
    let document = state.report_service.generate_report(data).await?;
    Ok(into_attachment(document))
}

/// Raw CSV export of the posted batch
pub async fn generate_csv(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let data = sensor_data(payload)?;
    let document = state.report_service.export_csv(data)?;
    Ok(into_attachment(document))
}
