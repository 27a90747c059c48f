use crate::auth::{placeholder_profile, UserDirectory};
use crate::errors::ApiError;
use crate::ingest::submit_reading;
use crate::metrics::LOGIN_FAILURES_TOTAL;
use crate::model::{
    Deleted, DeviceReading, LatestMedicalData, LatestVitals, LoginRequest, LoginResponse,
    MedicalHistory, MessageResponse, Patient, PatientUpdate, ReadingAck, Sourced, UserProfile,
};
use crate::store::{InMemoryPatientStore, InMemoryReadingStore, PatientStore, ReadingStore};
use crate::validate::{ApiKey, ValidJson};
use axum::{
    extract::{Path, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

pub const DATA_SOURCE_HEADER: &str = "x-data-source";

/// Handles shared by every route
#[derive(Clone)]
pub struct AppState {
    pub patients: Arc<dyn PatientStore>,
    pub readings: Arc<dyn ReadingStore>,
    pub users: Arc<UserDirectory>,
    pub device_api_key: Arc<str>,
}

impl AppState {
    /// Empty stores and no login accounts
    pub fn new(device_api_key: &str) -> Self {
        Self {
            patients: Arc::new(InMemoryPatientStore::new()),
            readings: Arc::new(InMemoryReadingStore::new()),
            users: Arc::new(UserDirectory::default()),
            device_api_key: Arc::from(device_api_key),
        }
    }

    /// Demo accounts and the two demo patients
    pub fn seeded(device_api_key: &str) -> Self {
        Self {
            patients: Arc::new(InMemoryPatientStore::with_patients(demo_patients())),
            users: Arc::new(UserDirectory::seeded()),
            ..Self::new(device_api_key)
        }
    }

    pub fn with_users(mut self, users: UserDirectory) -> Self {
        self.users = Arc::new(users);
        self
    }
}

fn demo_patients() -> Vec<Patient> {
    vec![
        Patient {
            id: "123".to_string(),
            name: "Igor".to_string(),
            date_of_birth: "2003-05-30".to_string(),
        },
        Patient {
            id: "456".to_string(),
            name: "Yam".to_string(),
            date_of_birth: "1985-07-15".to_string(),
        },
    ]
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/profile", get(profile))
        .route("/gateway/device-data", post(receive_device_data))
        .route("/device/:device_id/latest", get(latest_device_data))
        .route("/patients", get(list_patients).post(create_patient))
        .route(
            "/patients/:id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .route("/patients/:id/medical-data", get(medical_history))
        .route("/patients/:id/medical-data/latest", get(latest_medical_data))
        .fallback(unknown_route)
        .layer(middleware::map_response(detail_for_method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn unknown_route() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}

/// Gives axum's bare 405 the same `{detail}` body as other failures
async fn detail_for_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut replaced =
        ApiError::MethodNotAllowed("Method Not Allowed".to_string()).into_response();
    if let Some(allow) = allow {
        replaced.headers_mut().insert(header::ALLOW, allow);
    }
    replaced
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn login(
    State(state): State<AppState>,
    ValidJson(credentials): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .users
        .authenticate(&credentials.email, &credentials.password)
        .ok_or_else(|| {
            LOGIN_FAILURES_TOTAL.inc();
            ApiError::Unauthorized("Invalid email or password".to_string())
        })?;

    debug!("User {} logged in", user.id);
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user_id: user.id,
        name: user.name,
    }))
}

async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logged out".to_string(),
    })
}

async fn profile() -> Sourced<UserProfile> {
    placeholder_profile()
}

async fn receive_device_data(
    State(state): State<AppState>,
    ApiKey(api_key): ApiKey,
    ValidJson(reading): ValidJson<DeviceReading>,
) -> Result<Json<ReadingAck>, ApiError> {
    let ack = submit_reading(
        state.readings.as_ref(),
        &state.device_api_key,
        &api_key,
        reading,
    )
    .await?;
    Ok(Json(ack))
}

async fn latest_device_data(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<DeviceReading>, ApiError> {
    let reading = state.readings.latest(&device_id).await?;
    Ok(Json(reading))
}

async fn list_patients(State(state): State<AppState>) -> Json<Vec<Patient>> {
    Json(state.patients.list().await)
}

async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Sourced<Patient>, ApiError> {
    Ok(Sourced::Live(state.patients.get(&id).await?))
}

async fn create_patient(
    State(state): State<AppState>,
    ValidJson(patient): ValidJson<Patient>,
) -> Result<Json<Patient>, ApiError> {
    Ok(Json(state.patients.create(patient).await?))
}

async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(changes): ValidJson<PatientUpdate>,
) -> Result<Json<Patient>, ApiError> {
    Ok(Json(state.patients.update(&id, changes).await?))
}

async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    Ok(Json(state.patients.delete(&id).await?))
}

// No history store is wired up yet
async fn medical_history(Path(id): Path<String>) -> Sourced<MedicalHistory> {
    Sourced::Placeholder(MedicalHistory {
        patient_id: id,
        history: Vec::new(),
    })
}

async fn latest_medical_data(Path(id): Path<String>) -> Sourced<LatestMedicalData> {
    Sourced::Placeholder(LatestMedicalData {
        patient_id: id,
        latest: LatestVitals {
            heart_rate: 75,
            timestamp: Utc::now(),
        },
    })
}

impl<T: Serialize> IntoResponse for Sourced<T> {
    fn into_response(self) -> Response {
        let placeholder = self.is_placeholder();
        let mut response = Json(self.into_inner()).into_response();
        if placeholder {
            response.headers_mut().insert(
                HeaderName::from_static(DATA_SOURCE_HEADER),
                HeaderValue::from_static("placeholder"),
            );
        }
        response
    }
}
