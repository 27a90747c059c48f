use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimal demographic record keyed by an externally assigned id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    /// Free-form date text, stored as given
    pub date_of_birth: String,
}

/// Partial patient update; absent, null and empty fields are ignored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: i64,
    pub diastolic: i64,
}

/// One telemetry sample posted by a sensor gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceReading {
    pub device_id: String,
    pub heart_rate: i64,
    pub oxygen_level: i64,
    pub pressure: BloodPressure,
    pub temperature: f64,
    #[serde(deserialize_with = "crate::validate::iso_datetime")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingSummary {
    pub heart_rate: i64,
    pub oxygen_level: i64,
    pub temperature: f64,
    pub pressure: BloodPressure,
}

/// Acknowledgement returned to the gateway after a reading is stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingAck {
    pub status: String,
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub data_summary: ReadingSummary,
}

impl From<&DeviceReading> for ReadingAck {
    fn from(reading: &DeviceReading) -> Self {
        Self {
            status: "received".to_string(),
            device_id: reading.device_id.clone(),
            timestamp: reading.timestamp,
            data_summary: ReadingSummary {
                heart_rate: reading.heart_rate,
                oxygen_level: reading.oxygen_level,
                temperature: reading.temperature,
                pressure: reading.pressure,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Seeded login entry. Passwords are plaintext.
#[derive(Debug, Clone)]
pub struct UserCredential {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub status: String,
    pub id: String,
}

impl Deleted {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            status: "deleted".to_string(),
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalHistory {
    pub patient_id: String,
    pub history: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestVitals {
    pub heart_rate: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestMedicalData {
    pub patient_id: String,
    pub latest: LatestVitals,
}

/// Marks whether a response value came from a store or is a fixed stand-in.
///
/// Both variants serialize to the same body; the HTTP layer tags placeholder
/// responses with an `x-data-source: placeholder` header.
#[derive(Debug, Clone, PartialEq)]
pub enum Sourced<T> {
    Live(T),
    Placeholder(T),
}

impl<T> Sourced<T> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Sourced::Placeholder(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Sourced::Live(value) | Sourced::Placeholder(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ack_summarises_reading() {
        let reading = DeviceReading {
            device_id: "dev-1".to_string(),
            heart_rate: 80,
            oxygen_level: 96,
            pressure: BloodPressure {
                systolic: 125,
                diastolic: 82,
            },
            temperature: 36.9,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        };

        let ack = serde_json::to_value(ReadingAck::from(&reading)).unwrap();
        assert_eq!(ack["status"], "received");
        assert_eq!(ack["timestamp"], "2024-01-02T03:04:05Z");
        assert_eq!(ack["data_summary"]["pressure"]["systolic"], 125);
        assert!(ack["data_summary"].get("device_id").is_none());
    }

    #[test]
    fn test_sourced() {
        assert!(!Sourced::Live(1).is_placeholder());
        assert!(Sourced::Placeholder(1).is_placeholder());
        assert_eq!(Sourced::Placeholder("x").into_inner(), "x");
    }
}
