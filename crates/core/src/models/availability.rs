use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Query string of `GET /appointments`.
///
/// Every field is optional at the serde level so that a missing parameter
/// surfaces as a domain error rather than an extractor rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub trainer_id: Option<String>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
}

/// A free slot, rendered in the scheduling timezone. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub starts_at: DateTime<FixedOffset>,
    pub ends_at: DateTime<FixedOffset>,
}
