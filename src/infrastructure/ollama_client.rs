// Ollama client implementation of the text-generation port
use crate::application::text_generator::{GenerationError, ServiceStatus, TextGenerator};
use crate::infrastructure::config::NarrativeSettings;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    generate_url: String,
    tags_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
    health_timeout: Duration,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaClient {
    pub fn new(settings: &NarrativeSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            generate_url: settings.generate_url.clone(),
            tags_url: settings.tags_url.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            timeout: Duration::from_secs(settings.timeout_secs),
            health_timeout: Duration::from_secs(settings.health_timeout_secs),
        }
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: self.max_tokens,
                temperature: self.temperature,
            },
        }
    }

    /// Tags are listed as `name:tag`; a bare configured name matches any tag of it
    fn lists_model(&self, tags: &TagsResponse) -> bool {
        tags.models.iter().any(|m| {
            m.name == self.model || m.name.split(':').next() == Some(self.model.as_str())
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(&self.generate_url)
            .timeout(self.timeout)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| GenerationError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GenerationError::Status(response.status().as_u16()));
        }

        let data = response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| GenerationError::Connection(e.to_string()))?;

        Ok(data.response)
    }

    async fn status(&self) -> ServiceStatus {
        let response = match self
            .client
            .get(&self.tags_url)
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Ollama probe failed: {}", e);
                return ServiceStatus::Disconnected;
            }
        };

        if !response.status().is_success() {
            return ServiceStatus::Error;
        }

        match response.json::<TagsResponse>().await {
            Ok(tags) if self.lists_model(&tags) => ServiceStatus::Connected,
            Ok(_) => ServiceStatus::ModelMissing,
            Err(e) => {
                tracing::debug!("Ollama tags unreadable: {}", e);
                ServiceStatus::Error
            }
        }
    }
}
