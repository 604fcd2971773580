use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Check-out must be after check-in")]
    InvalidRange,
    #[error("Guest count must be between 1 and the listing maximum")]
    InvalidGuestCount,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found")]
    NotFound,
    #[error("Payment verification failed: {0}")]
    VerificationFailed(String),
    #[error("Persistence error: {0}")]
    PersistenceError(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
