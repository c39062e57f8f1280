// Device service - Robot proxy use cases with mock and degraded fallbacks
use crate::application::device_gateway::DeviceGateway;
use crate::domain::device::{DeviceAck, DeviceReading, DeviceSnapshot};
use crate::domain::error::DeviceError;
use std::sync::Arc;

#[derive(Clone)]
pub struct DeviceService {
    gateway: Arc<dyn DeviceGateway>,
    mock: bool,
}

impl DeviceService {
    pub fn new(gateway: Arc<dyn DeviceGateway>, mock: bool) -> Self {
        Self { gateway, mock }
    }

    pub async fn read(&self) -> DeviceReading {
        if self.mock {
            return DeviceReading::Mock(DeviceSnapshot::randomized(&mut rand::thread_rng()));
        }

        match self.gateway.snapshot().await {
            Ok(body) => DeviceReading::Live(body),
            Err(e) => {
                tracing::warn!("Device read failed, serving degraded payload: {}", e);
                DeviceReading::Unavailable(e)
            }
        }
    }

    pub async fn send_command(&self, command: &str) -> Result<DeviceAck, DeviceError> {
        if self.mock {
            return Ok(DeviceAck::Mock);
        }

        tracing::debug!("Forwarding command {:?} to device", command);
        self.gateway.command(command).await.map(|_| DeviceAck::Sent).inspect_err(|e| {
            tracing::warn!("Device command {:?} failed: {}", command, e);
        })
    }

    pub async fn set_auto(&self, value: &str) -> Result<DeviceAck, DeviceError> {
        if self.mock {
            return Ok(DeviceAck::Mock);
        }

        self.gateway.set_auto(value).await.map(|_| DeviceAck::Sent).inspect_err(|e| {
            tracing::warn!("Device auto mode {:?} failed: {}", value, e);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingGateway {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DeviceGateway for FailingGateway {
        async fn snapshot(&self) -> Result<serde_json::Value, DeviceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DeviceError::Timeout)
        }

        async fn command(&self, _command: &str) -> Result<(), DeviceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DeviceError::Unreachable("refused".into()))
        }

        async fn set_auto(&self, _value: &str) -> Result<(), DeviceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DeviceError::BadStatus(500))
        }
    }

    fn service(mock: bool) -> (DeviceService, Arc<FailingGateway>) {
        let gateway = Arc::new(FailingGateway {
            calls: AtomicUsize::new(0),
        });
        (DeviceService::new(gateway.clone(), mock), gateway)
    }

    #[tokio::test]
    async fn test_failure_becomes_unavailable_reading() {
        let (service, gateway) = service(false);
        assert_eq!(service.read().await, DeviceReading::Unavailable(DeviceError::Timeout));
        assert!(service.send_command("F").await.is_err());
        assert_eq!(service.set_auto("1").await, Err(DeviceError::BadStatus(500)));
        // Exactly one attempt per call, no retries
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_mock_mode_skips_gateway() {
        let (service, gateway) = service(true);
        assert!(matches!(service.read().await, DeviceReading::Mock(_)));
        assert_eq!(service.send_command("F").await, Ok(DeviceAck::Mock));
        assert_eq!(service.set_auto("0").await, Ok(DeviceAck::Mock));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }
}
