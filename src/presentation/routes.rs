// Router assembly - API routes, static terminal UI and cross-cutting layers
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    generate_csv, generate_report, get_data, health, send_cmd, set_auto,
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

/// Long recording sessions post tens of thousands of samples
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

pub fn build_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/data", get(get_data))
        .route("/api/cmd", get(send_cmd))
        .route("/api/auto", get(set_auto))
        .route("/health", get(health))
        .route("/generate-report", post(generate_report))
        .route("/generate-csv", post(generate_csv))
        .fallback_service(ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::device_service::DeviceService;
    use crate::application::narrative_service::NarrativeService;
    use crate::application::report_service::ReportService;
    use crate::domain::sensor::tests::sample_data;
    use crate::infrastructure::config::{DeviceSettings, NarrativeSettings};
    use crate::infrastructure::device_client::HttpDeviceGateway;
    use crate::infrastructure::ollama_client::OllamaClient;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use axum::Json;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const CLOSED: &str = "http://127.0.0.1:1";

    fn app_with(device_url: &str, mock: bool, static_dir: &Path) -> Router {
        let gateway = Arc::new(HttpDeviceGateway::new(&DeviceSettings {
            base_url: device_url.to_string(),
            mock,
            ..DeviceSettings::default()
        }));
        let generator = Arc::new(OllamaClient::new(&NarrativeSettings {
            generate_url: format!("{CLOSED}/api/generate"),
            tags_url: format!("{CLOSED}/api/tags"),
            timeout_secs: 2,
            health_timeout_secs: 1,
            ..NarrativeSettings::default()
        }));
        let narrative_service = NarrativeService::new(generator);
        let state = Arc::new(AppState {
            device_service: DeviceService::new(gateway, mock),
            report_service: ReportService::new(narrative_service.clone(), None, "Gemma 2 9B"),
            narrative_service,
        });
        build_router(state, static_dir)
    }

    fn app() -> Router {
        app_with(CLOSED, false, Path::new("static"))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn batch(len: usize) -> Value {
        json!({ "sensorData": sample_data(len) })
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_report_with_too_few_records_is_rejected() {
        let response = app()
            .oneshot(post_json("/generate-report", batch(2)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("minimum 3 records"));
    }

    #[tokio::test]
    async fn test_report_without_sensor_data_is_rejected() {
        let response = app()
            .oneshot(post_json("/generate-report", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_report_with_mismatched_columns_is_rejected() {
        let mut body = batch(4);
        body["sensorData"]["humidity"] = json!([1.0, 2.0]);
        let response = app().oneshot(post_json("/generate-report", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("humidity"));
    }

    #[tokio::test]
    async fn test_report_survives_unreachable_model_service() {
        let response = app()
            .oneshot(post_json("/generate-report", batch(8)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"pranbot_report_"));
        assert!(body_bytes(response).await.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_csv_export() {
        let response = app()
            .oneshot(post_json("/generate-csv", batch(5)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        let text = String::from_utf8(body_bytes(response).await).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "timestamp,smoke,methane,co,air,gpi,temperature,humidity");
    }

    #[tokio::test]
    async fn test_csv_export_without_records_is_rejected() {
        let response = app()
            .oneshot(post_json("/generate-csv", batch(0)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No sensor data provided");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let request = Request::post("/generate-csv")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unreachable_device_gives_degraded_payload() {
        let response = app()
            .oneshot(Request::get("/api/data").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let body = body_json(response).await;
        for key in [
            "smoke",
            "methane",
            "co",
            "air",
            "battery",
            "radar_angle",
            "radar_distance",
        ] {
            assert_eq!(body[key], 0, "key {key}");
        }
        assert_eq!(body["ir_left"], 1);
        assert_eq!(body["ir_right"], 1);
        assert!(body["error"].as_str().unwrap().starts_with("ESP32"));
    }

    #[tokio::test]
    async fn test_live_device_body_is_forwarded() {
        let device = Router::new()
            .route(
                "/data",
                get(|| async { Json(json!({ "smoke": 512, "battery": 3900, "firmware": "1.2" })) }),
            )
            .route("/cmd", get(|| async { "OK" }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, device).await });

        let app = app_with(&format!("http://{addr}"), false, Path::new("static"));
        let response = app
            .clone()
            .oneshot(Request::get("/api/data").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "smoke": 512, "battery": 3900, "firmware": "1.2" })
        );

        let response = app
            .oneshot(Request::get("/api/cmd?d=F").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "status": "OK" }));
    }

    #[tokio::test]
    async fn test_device_error_status_gives_bad_gateway() {
        let device = Router::new().route(
            "/data",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, device).await });

        let response = app_with(&format!("http://{addr}"), false, Path::new("static"))
            .oneshot(Request::get("/api/data").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["smoke"], 0);
    }

    #[tokio::test]
    async fn test_mock_mode_never_touches_the_network() {
        let app = app_with(CLOSED, true, Path::new("static"));

        let response = app
            .clone()
            .oneshot(Request::get("/api/data").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["mock"], true);
        assert!((300..=1400).contains(&body["smoke"].as_i64().unwrap()));

        let response = app
            .oneshot(Request::get("/api/auto?v=1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await, json!({ "status": "OK", "mock": true }));
    }

    #[tokio::test]
    async fn test_command_requires_a_value() {
        let response = app()
            .oneshot(Request::get("/api/cmd").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No command provided");

        let response = app()
            .oneshot(Request::get("/api/auto?v=").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No value provided");
    }

    #[tokio::test]
    async fn test_command_to_unreachable_device_is_bad_gateway() {
        let response = app()
            .oneshot(Request::get("/api/cmd?d=S").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_health_reports_disconnected_model_service() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "status": "running", "ollama": "disconnected", "model": "gemma2:9b" })
        );
    }

    #[tokio::test]
    async fn test_static_terminal_is_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>PRAN-BOT</h1>").unwrap();

        let response = app_with(CLOSED, false, dir.path())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"<h1>PRAN-BOT</h1>");
    }
}
