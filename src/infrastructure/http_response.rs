// HTTP response utilities for file downloads
use crate::domain::report::ReportDocument;
use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
};

/// Serve a finished document as an attachment with its stamped file name
pub fn attachment_response(document: ReportDocument) -> Result<Response<Body>, StatusCode> {
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        document.file_name
    ))
    .map_err(|e| {
        tracing::error!("Invalid attachment name {}: {}", document.file_name, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, document.content_type)
        .header(header::CONTENT_LENGTH, document.bytes.len())
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(document.bytes))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
