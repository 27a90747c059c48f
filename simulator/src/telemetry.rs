use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: i64,
    pub diastolic: i64,
}

/// Body of `POST /gateway/device-data`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceReading {
    pub device_id: String,
    pub heart_rate: i64,
    pub oxygen_level: i64,
    pub pressure: BloodPressure,
    pub temperature: f64,
    pub timestamp: DateTime<Utc>,
}
