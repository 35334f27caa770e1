//! In-process appointment store.
//!
//! Appointments are keyed by `(trainer_id, starts_at)`, so the uniqueness rule
//! is enforced by the map itself under a single lock. Only suitable for tests
//! and single-instance local runs; state is lost on restart.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::eyre;
use trainerbook_core::{
    errors::RepositoryError,
    models::appointment::{Appointment, NewAppointment},
    repository::AppointmentRepository,
};

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    appointments: BTreeMap<(i64, DateTime<Utc>), Appointment>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryAppointmentRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.appointments.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Other(eyre!("appointment store lock poisoned")))
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn find_by_trainer_and_start_range(
        &self,
        trainer_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        if start >= end {
            return Ok(Vec::new());
        }
        let state = self.lock()?;
        Ok(state
            .appointments
            .range((trainer_id, start)..(trainer_id, end))
            .map(|(_, apt)| apt.clone())
            .collect())
    }

    async fn create(&self, appointment: NewAppointment) -> Result<Appointment, RepositoryError> {
        let mut state = self.lock()?;
        let key = (appointment.trainer_id, appointment.starts_at);
        if state.appointments.contains_key(&key) {
            return Err(RepositoryError::UniqueViolation);
        }

        state.last_id += 1;
        let created = Appointment {
            id: state.last_id,
            trainer_id: appointment.trainer_id,
            user_id: appointment.user_id,
            starts_at: appointment.starts_at,
            ends_at: appointment.ends_at,
        };
        state.appointments.insert(key, created.clone());
        Ok(created)
    }

    async fn find_by_trainer(&self, trainer_id: i64) -> Result<Vec<Appointment>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .appointments
            .values()
            .filter(|apt| apt.trainer_id == trainer_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn new_appointment(trainer_id: i64, hour: u32, minute: u32) -> NewAppointment {
        let starts_at = Utc.with_ymd_and_hms(2019, 1, 24, hour, minute, 0).unwrap();
        NewAppointment {
            trainer_id,
            user_id: 100,
            starts_at,
            ends_at: starts_at + Duration::minutes(30),
        }
    }

    #[test]
    fn ids_are_assigned_in_sequence() {
        let repo = InMemoryAppointmentRepository::new();
        let first = tokio_test::block_on(repo.create(new_appointment(1, 17, 0))).unwrap();
        let second = tokio_test::block_on(repo.create(new_appointment(1, 17, 30))).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.len().unwrap(), 2);
    }

    #[test]
    fn same_trainer_and_start_is_rejected() {
        let repo = InMemoryAppointmentRepository::new();
        tokio_test::block_on(repo.create(new_appointment(1, 17, 0))).unwrap();

        let duplicate = tokio_test::block_on(repo.create(new_appointment(1, 17, 0)));
        assert!(matches!(duplicate, Err(RepositoryError::UniqueViolation)));

        let other_trainer = tokio_test::block_on(repo.create(new_appointment(2, 17, 0)));
        assert!(other_trainer.is_ok());
        assert_eq!(repo.len().unwrap(), 2);
    }

    #[test]
    fn range_is_half_open_and_per_trainer() {
        let repo = InMemoryAppointmentRepository::new();
        for (trainer, hour) in [(1, 16), (1, 17), (1, 18), (2, 17)] {
            tokio_test::block_on(repo.create(new_appointment(trainer, hour, 0))).unwrap();
        }

        let start = Utc.with_ymd_and_hms(2019, 1, 24, 17, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2019, 1, 24, 18, 0, 0).unwrap();
        let found = tokio_test::block_on(repo.find_by_trainer_and_start_range(1, start, end)).unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].starts_at, start);
        assert_eq!(found[0].trainer_id, 1);

        let inverted = tokio_test::block_on(repo.find_by_trainer_and_start_range(1, end, start)).unwrap();
        assert!(inverted.is_empty());
    }

    #[tokio::test]
    async fn concurrent_bookings_of_one_slot_admit_exactly_one() {
        let repo = InMemoryAppointmentRepository::new();
        let mut handles = Vec::new();
        for _ in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.create(new_appointment(1, 17, 0)).await
            }));
        }

        let mut admitted = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => admitted += 1,
                Err(RepositoryError::UniqueViolation) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(admitted, 1);
        assert_eq!(conflicts, 15);
    }
}
