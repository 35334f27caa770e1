//! # Booking Validator
//!
//! Structural and policy checks on a proposed booking. Checks run in a fixed
//! order and the first failure wins:
//!
//! 1. both timestamps parse as RFC 3339 with an explicit offset
//! 2. the start is inside business hours
//! 3. the start sits on a :00 or :30 local boundary
//! 4. the span is exactly one slot
//!
//! A proposal that passes can still lose to a concurrent booking; conflicts
//! are only detected when the repository insert runs.

use crate::{
    errors::{SchedulingError, SchedulingResult},
    models::appointment::{CreateAppointmentRequest, NewAppointment},
    policy::CivilTimePolicy,
};

pub fn validate_booking(
    policy: &CivilTimePolicy,
    request: &CreateAppointmentRequest,
) -> SchedulingResult<NewAppointment> {
    let (starts_at, ends_at) = match (
        policy.parse_instant(&request.starts_at),
        policy.parse_instant(&request.ends_at),
    ) {
        (Ok(starts_at), Ok(ends_at)) => (starts_at, ends_at),
        _ => return Err(SchedulingError::invalid_timestamps()),
    };

    if !policy.is_business_hours(starts_at) {
        return Err(SchedulingError::OutsideBusinessHours);
    }

    if !policy.is_slot_aligned(starts_at) {
        return Err(SchedulingError::Misaligned);
    }

    if ends_at - starts_at != policy.slot_duration() {
        return Err(SchedulingError::InvalidDuration);
    }

    Ok(NewAppointment {
        trainer_id: request.trainer_id,
        user_id: request.user_id,
        starts_at,
        ends_at,
    })
}
