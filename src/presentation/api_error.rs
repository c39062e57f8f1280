// JSON error bodies for the HTTP layer
use crate::domain::error::{DeviceError, ReportError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Caller sent something unusable
    BadRequest(String),
    /// The robot refused or failed a forwarded request
    Upstream(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(m) | ApiError::Upstream(m) | ApiError::Internal(m) => m,
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::Validation(v) => ApiError::BadRequest(v.to_string()),
            other => {
                tracing::error!("Report pipeline failed: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<DeviceError> for ApiError {
    fn from(e: DeviceError) -> Self {
        ApiError::Upstream(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ValidationError;

    #[test]
    fn test_status_mapping() {
        let validation: ApiError = ReportError::from(ValidationError::NotEnoughRecords(1)).into();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert!(validation.message().starts_with("Not enough sensor data"));

        let chart: ApiError = ReportError::Chart("empty series".into()).into();
        assert_eq!(chart.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(chart.message(), "Chart rendering failed: empty series");

        let device: ApiError = DeviceError::BadStatus(500).into();
        assert_eq!(device.status(), StatusCode::BAD_GATEWAY);
    }
}
