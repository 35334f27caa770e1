use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Missing required query parameters: {0}")]
    MissingParameter(String),

    #[error("Invalid {0}")]
    InvalidFormat(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Appointments must be during business hours (M-F 8am-5pm PT)")]
    OutsideBusinessHours,

    #[error("Appointments must start at :00 or :30 minutes")]
    Misaligned,

    #[error("Appointments must be exactly 30 minutes long")]
    InvalidDuration,

    #[error("Appointment slot is already booked")]
    Conflict,

    #[error("Missing or invalid bearer token")]
    Unauthorized,

    #[error("Repository error: {0}")]
    Repository(#[from] eyre::Report),
}

impl SchedulingError {
    /// Error for a timestamp pair that could not be parsed as RFC 3339.
    pub fn invalid_timestamps() -> Self {
        SchedulingError::InvalidFormat("date format for starts_at or ends_at".to_string())
    }

    /// True for every rejection detected before a write is attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SchedulingError::MissingParameter(_)
                | SchedulingError::InvalidFormat(_)
                | SchedulingError::InvalidRequest(_)
                | SchedulingError::OutsideBusinessHours
                | SchedulingError::Misaligned
                | SchedulingError::InvalidDuration
        )
    }
}

/// Failures surfaced by an [`AppointmentRepository`](crate::repository::AppointmentRepository).
///
/// Unique violations are kept apart from everything else so the engine can
/// report them as booking conflicts.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("unique constraint violated on (trainer_id, starts_at)")]
    UniqueViolation,

    #[error(transparent)]
    Other(#[from] eyre::Report),
}

impl From<RepositoryError> for SchedulingError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation => SchedulingError::Conflict,
            RepositoryError::Other(report) => SchedulingError::Repository(report),
        }
    }
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;
