// HTTP gateway to the robot's ESP32 web server
use crate::application::device_gateway::DeviceGateway;
use crate::domain::error::DeviceError;
use crate::infrastructure::config::DeviceSettings;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpDeviceGateway {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpDeviceGateway {
    pub fn new(settings: &DeviceSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout: settings.timeout(),
        }
    }

    fn build_url(&self, path: &str, param: Option<(&str, &str)>) -> String {
        match param {
            Some((key, value)) => format!(
                "{}/{}?{}={}",
                self.base_url,
                path,
                key,
                urlencoding::encode(value)
            ),
            None => format!("{}/{}", self.base_url, path),
        }
    }

    /// Single attempt, bounded by the device timeout
    async fn get(&self, url: &str) -> Result<reqwest::Response, DeviceError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify_transport)?;

        if !response.status().is_success() {
            return Err(DeviceError::BadStatus(response.status().as_u16()));
        }
        Ok(response)
    }
}

fn classify_transport(e: reqwest::Error) -> DeviceError {
    if e.is_timeout() {
        DeviceError::Timeout
    } else {
        DeviceError::Unreachable(e.to_string())
    }
}

#[async_trait]
impl DeviceGateway for HttpDeviceGateway {
    async fn snapshot(&self) -> Result<serde_json::Value, DeviceError> {
        let response = self.get(&self.build_url("data", None)).await?;
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| DeviceError::InvalidPayload(e.to_string()))
    }

    async fn command(&self, command: &str) -> Result<(), DeviceError> {
        self.get(&self.build_url("cmd", Some(("d", command)))).await?;
        Ok(())
    }

    async fn set_auto(&self, value: &str) -> Result<(), DeviceError> {
        self.get(&self.build_url("auto", Some(("v", value)))).await?;
        Ok(())
    }
}
