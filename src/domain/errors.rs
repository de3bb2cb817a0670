//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Invalid user input. Reported inline; never sent to the network.
    #[error("{0}")]
    Validation(String),

    /// Transport failure talking to the backend. Shown as a generic
    /// connectivity message; the operation is abandoned without retry.
    /// The underlying cause is kept for logging only.
    #[error("Erro de ligação ao servidor")]
    Network(String),

    /// Backend answered `ok: false`. Carries the backend message verbatim
    /// when provided, otherwise a generic fallback.
    #[error("{0}")]
    Api(String),

    /// Session missing or expired (HTTP 401 from any `/api/` route).
    #[error("Não autorizado: {0}")]
    Auth(String),

    /// Notification channel failure.
    #[error("Notification error: {0}")]
    Notify(String),

    /// Local state file (notification permission) failure.
    #[error("State error: {0}")]
    State(String),
}
