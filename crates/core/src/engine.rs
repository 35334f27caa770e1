//! # Availability Engine
//!
//! Orchestrates the policy, the slot walk and the validator on top of an
//! [`AppointmentRepository`].
//!
//! The engine keeps no state of its own besides the immutable policy. Double
//! bookings are rejected by the repository's uniqueness constraint: the insert
//! is attempted directly and a unique violation becomes
//! [`SchedulingError::Conflict`].

use std::{collections::HashSet, sync::Arc};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::{
    errors::{SchedulingError, SchedulingResult},
    models::{
        appointment::{Appointment, AppointmentResponse, CreateAppointmentRequest},
        availability::{AvailabilityQuery, AvailableSlot},
    },
    policy::CivilTimePolicy,
    repository::AppointmentRepository,
    slots::free_slots,
    validation::validate_booking,
};

#[derive(Clone)]
pub struct AvailabilityEngine {
    policy: CivilTimePolicy,
    repository: Arc<dyn AppointmentRepository>,
}

impl AvailabilityEngine {
    pub fn new(policy: CivilTimePolicy, repository: Arc<dyn AppointmentRepository>) -> Self {
        Self { policy, repository }
    }

    pub fn policy(&self) -> &CivilTimePolicy {
        &self.policy
    }

    /// Free slots of a trainer inside `[starts_at, ends_at)`.
    ///
    /// All three query parameters are required. Timestamps must carry an
    /// offset; the trainer id must be an integer.
    pub async fn list_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> SchedulingResult<Vec<AvailableSlot>> {
        let (Some(trainer_id), Some(starts_at), Some(ends_at)) = (
            non_blank(&query.trainer_id),
            non_blank(&query.starts_at),
            non_blank(&query.ends_at),
        ) else {
            return Err(SchedulingError::MissingParameter(
                "trainer_id, starts_at, ends_at".to_string(),
            ));
        };

        let (range_start, range_end) = match (
            self.policy.parse_instant(starts_at),
            self.policy.parse_instant(ends_at),
        ) {
            (Ok(start), Ok(end)) => (start, end),
            _ => return Err(SchedulingError::invalid_timestamps()),
        };
        let trainer_id = parse_trainer_id(trainer_id)?;

        self.free_slots_for(trainer_id, range_start, range_end).await
    }

    /// Free slots for already parsed inputs.
    pub async fn free_slots_for(
        &self,
        trainer_id: i64,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> SchedulingResult<Vec<AvailableSlot>> {
        if range_start >= range_end {
            return Ok(Vec::new());
        }

        let booked = self
            .repository
            .find_by_trainer_and_start_range(trainer_id, range_start, range_end)
            .await?;
        debug!(
            trainer_id,
            booked = booked.len(),
            "Loaded booked appointments for availability"
        );

        let booked: HashSet<DateTime<Utc>> = booked.iter().map(|apt| apt.starts_at).collect();
        Ok(free_slots(&self.policy, range_start, range_end, &booked))
    }

    /// Validates and books a slot.
    ///
    /// There is no existence check before the insert; the repository decides
    /// atomically whether the slot is still free.
    pub async fn create_booking(
        &self,
        request: &CreateAppointmentRequest,
    ) -> SchedulingResult<AppointmentResponse> {
        let new_appointment = validate_booking(&self.policy, request).inspect_err(|err| {
            debug!(trainer_id = request.trainer_id, %err, "Rejected booking proposal");
        })?;

        let appointment = self
            .repository
            .create(new_appointment)
            .await
            .map_err(SchedulingError::from)
            .inspect_err(|err| {
                if matches!(err, SchedulingError::Conflict) {
                    warn!(
                        trainer_id = request.trainer_id,
                        starts_at = %request.starts_at,
                        "Slot already booked"
                    );
                }
            })?;

        debug!(id = appointment.id, trainer_id = appointment.trainer_id, "Appointment created");
        Ok(self.render(appointment))
    }

    /// Every appointment of a trainer, ordered by start.
    pub async fn list_bookings(&self, trainer_id: &str) -> SchedulingResult<Vec<AppointmentResponse>> {
        let trainer_id = match trainer_id.trim() {
            "" => return Err(SchedulingError::MissingParameter("trainer_id".to_string())),
            raw => parse_trainer_id(raw)?,
        };

        let mut appointments = self.repository.find_by_trainer(trainer_id).await?;
        appointments.sort_by_key(|apt| apt.starts_at);

        Ok(appointments
            .into_iter()
            .map(|apt| self.render(apt))
            .collect())
    }

    fn render(&self, appointment: Appointment) -> AppointmentResponse {
        AppointmentResponse {
            id: appointment.id,
            starts_at: self.policy.to_display(appointment.starts_at),
            ends_at: self.policy.to_display(appointment.ends_at),
            trainer_id: appointment.trainer_id,
            user_id: appointment.user_id,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_trainer_id(raw: &str) -> SchedulingResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| SchedulingError::InvalidFormat(format!("trainer_id: {raw:?} is not an integer")))
}
