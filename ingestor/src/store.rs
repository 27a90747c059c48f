use crate::errors::StoreError;
use crate::model::{Deleted, DeviceReading, Patient, PatientUpdate};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Patient records keyed by caller-supplied id
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// All patients in insertion order
    async fn list(&self) -> Vec<Patient>;

    async fn get(&self, id: &str) -> Result<Patient, StoreError>;

    /// Fails with `DuplicatePatient` if the id is taken; the stored record is untouched
    async fn create(&self, patient: Patient) -> Result<Patient, StoreError>;

    /// Overwrites only the fields that are present and non-empty
    async fn update(&self, id: &str, changes: PatientUpdate) -> Result<Patient, StoreError>;

    async fn delete(&self, id: &str) -> Result<Deleted, StoreError>;
}

/// Latest reading per device; no history is kept
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Replaces any previous reading for the same device. Returns the number
    /// of devices tracked afterwards.
    async fn put_latest(&self, reading: DeviceReading) -> usize;

    async fn latest(&self, device_id: &str) -> Result<DeviceReading, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryPatientStore {
    patients: RwLock<Vec<Patient>>,
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the given records. Later duplicates of an id are dropped.
    pub fn with_patients(patients: impl IntoIterator<Item = Patient>) -> Self {
        let mut unique: Vec<Patient> = Vec::new();
        for patient in patients {
            if !unique.iter().any(|p| p.id == patient.id) {
                unique.push(patient);
            }
        }
        Self {
            patients: RwLock::new(unique),
        }
    }
}

#[async_trait]
impl PatientStore for InMemoryPatientStore {
    async fn list(&self) -> Vec<Patient> {
        self.patients.read().await.clone()
    }

    async fn get(&self, id: &str) -> Result<Patient, StoreError> {
        self.patients
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(StoreError::PatientNotFound)
    }

    async fn create(&self, patient: Patient) -> Result<Patient, StoreError> {
        let mut patients = self.patients.write().await;
        if patients.iter().any(|p| p.id == patient.id) {
            return Err(StoreError::DuplicatePatient);
        }
        patients.push(patient.clone());
        Ok(patient)
    }

    async fn update(&self, id: &str, changes: PatientUpdate) -> Result<Patient, StoreError> {
        let mut patients = self.patients.write().await;
        let patient = patients
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::PatientNotFound)?;

        if let Some(name) = changes.name.filter(|n| !n.is_empty()) {
            patient.name = name;
        }
        if let Some(dob) = changes.date_of_birth.filter(|d| !d.is_empty()) {
            patient.date_of_birth = dob;
        }

        Ok(patient.clone())
    }

    async fn delete(&self, id: &str) -> Result<Deleted, StoreError> {
        let mut patients = self.patients.write().await;
        let index = patients
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::PatientNotFound)?;
        patients.remove(index);
        Ok(Deleted::new(id))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryReadingStore {
    latest: RwLock<HashMap<String, DeviceReading>>,
}

impl InMemoryReadingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReadingStore for InMemoryReadingStore {
    async fn put_latest(&self, reading: DeviceReading) -> usize {
        let mut latest = self.latest.write().await;
        latest.insert(reading.device_id.clone(), reading);
        latest.len()
    }

    async fn latest(&self, device_id: &str) -> Result<DeviceReading, StoreError> {
        self.latest
            .read()
            .await
            .get(device_id)
            .cloned()
            .ok_or(StoreError::NoDeviceData)
    }
}
