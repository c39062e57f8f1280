// Port for the locally hosted text-generation model
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Why a generation call produced no text. The message is what lands in the report.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Error: {0}")]
    Status(u16),

    #[error("Error connecting to Ollama: {0}")]
    Connection(String),
}

/// Reachability of the model service as reported by `/health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Connected,
    /// Service answers but does not list the configured model
    ModelMissing,
    Error,
    Disconnected,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier sent with every request
    fn model(&self) -> &str;

    /// One non-streaming completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Cheap reachability probe
    async fn status(&self) -> ServiceStatus;
}
