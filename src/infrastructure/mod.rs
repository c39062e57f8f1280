// Infrastructure layer - External dependencies and adapters
pub mod charts;
pub mod config;
pub mod csv_export;
pub mod device_client;
pub mod http_response;
pub mod ollama_client;
pub mod pdf;
