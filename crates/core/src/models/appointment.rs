use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// A persisted booking. Instants are always held in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub trainer_id: i64,
    pub user_id: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// A booking that passed validation and is ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub trainer_id: i64,
    pub user_id: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Body of `POST /appointments`. Timestamps stay raw until validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub trainer_id: i64,
    pub user_id: i64,
    pub starts_at: String,
    pub ends_at: String,
}

/// An appointment rendered in the scheduling timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub id: i64,
    pub starts_at: DateTime<FixedOffset>,
    pub ends_at: DateTime<FixedOffset>,
    pub trainer_id: i64,
    pub user_id: i64,
}
