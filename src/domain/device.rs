// Robot device readings - live, mock and degraded payloads
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::DeviceError;

/// Snapshot of the robot's sensors in the shape the terminal UI expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub smoke: i64,
    pub methane: i64,
    pub co: i64,
    pub air: i64,
    pub battery: i64,
    pub ir_left: u8,
    pub ir_right: u8,
    pub radar_angle: i64,
    pub radar_distance: i64,
}

impl DeviceSnapshot {
    /// All-zero readings; IR lines read 1 (no obstacle) so the UI does not stop the robot
    pub fn degraded() -> Self {
        Self {
            smoke: 0,
            methane: 0,
            co: 0,
            air: 0,
            battery: 0,
            ir_left: 1,
            ir_right: 1,
            radar_angle: 0,
            radar_distance: 0,
        }
    }

    /// Plausible values for UI work without hardware
    pub fn randomized<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            smoke: rng.gen_range(300..=1400),
            methane: rng.gen_range(100..=1000),
            co: rng.gen_range(20..=500),
            air: rng.gen_range(50..=1600),
            battery: rng.gen_range(3000..=4200),
            ir_left: rng.gen_range(0..=1),
            ir_right: rng.gen_range(0..=1),
            radar_angle: 20 + 5 * rng.gen_range(0..28),
            radar_distance: rng.gen_range(5..=200),
        }
    }
}

/// Outcome of a sensor read; callers never need to inspect strings to tell them apart
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceReading {
    /// Body forwarded verbatim from the robot
    Live(serde_json::Value),
    Mock(DeviceSnapshot),
    Unavailable(DeviceError),
}

/// Outcome of a command or mode change that reached (or skipped) the robot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAck {
    Sent,
    Mock,
}
