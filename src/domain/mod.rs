// Domain layer - Sensor records, statistics and report artifacts
pub mod device;
pub mod error;
pub mod narrative;
pub mod report;
pub mod sensor;
pub mod statistics;
