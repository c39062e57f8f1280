// Port for the robot's HTTP endpoints
use crate::domain::error::DeviceError;
use async_trait::async_trait;

#[async_trait]
pub trait DeviceGateway: Send + Sync {
    /// Current sensor snapshot, body passed through untouched
    async fn snapshot(&self) -> Result<serde_json::Value, DeviceError>;

    /// Forward an opaque drive/actuator command
    async fn command(&self, command: &str) -> Result<(), DeviceError>;

    /// Switch autonomous mode
    async fn set_auto(&self, value: &str) -> Result<(), DeviceError>;
}
