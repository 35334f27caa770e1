use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use trainerbook_core::{
    errors::RepositoryError,
    models::appointment::{Appointment, NewAppointment},
    repository::AppointmentRepository,
};

// Mock repository for testing
mock! {
    pub AppointmentRepo {}

    #[async_trait]
    impl AppointmentRepository for AppointmentRepo {
        async fn find_by_trainer_and_start_range(
            &self,
            trainer_id: i64,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<Appointment>, RepositoryError>;

        async fn create(
            &self,
            appointment: NewAppointment,
        ) -> Result<Appointment, RepositoryError>;

        async fn find_by_trainer(
            &self,
            trainer_id: i64,
        ) -> Result<Vec<Appointment>, RepositoryError>;
    }
}
