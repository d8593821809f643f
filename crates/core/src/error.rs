//! Domain error type shared by the repository and API layers.

/// Domain-level error. HTTP mapping lives in the API crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup by id found nothing.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Input failed domain validation (empty name, bad enum label, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
