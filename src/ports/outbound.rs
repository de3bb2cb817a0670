//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use chrono::{DateTime, Local};

use crate::domain::{
    DomainError, HistoryFilter, Medication, MedicationDraft, MedicationId, NotifyPermission,
    TakeDraft, TakeRecord,
};

/// Backend REST gateway for medications and take history.
#[async_trait::async_trait]
pub trait MedicationApi: Send + Sync {
    /// Fetch the full medication list. Callers replace their in-memory list
    /// wholesale with the result.
    async fn list_medications(&self) -> Result<Vec<Medication>, DomainError>;

    /// Create a medication. Returns the backend-assigned id.
    async fn create_medication(&self, draft: &MedicationDraft)
        -> Result<MedicationId, DomainError>;

    /// Update all fields of an existing medication.
    async fn update_medication(
        &self,
        id: MedicationId,
        draft: &MedicationDraft,
    ) -> Result<(), DomainError>;

    /// Delete a medication.
    async fn delete_medication(&self, id: MedicationId) -> Result<(), DomainError>;

    /// Mark a medication taken right now. The backend records the take and
    /// implicitly deletes the medication from the active list.
    async fn take_now(&self, id: MedicationId, note: &str) -> Result<(), DomainError>;

    /// Record a take from the alert-dismissal path. The medication stays in
    /// the active list.
    async fn record_take(&self, take: &TakeDraft) -> Result<(), DomainError>;

    /// Fetch take history for a month or date range, newest first.
    async fn list_takes(&self, filter: &HistoryFilter) -> Result<Vec<TakeRecord>, DomainError>;
}

/// Session management against the backend's auth routes.
#[async_trait::async_trait]
pub trait AuthPort: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<(), DomainError>;

    async fn logout(&self) -> Result<(), DomainError>;
}

/// Wall-clock source. Injectable so time-dependent tests can simulate tick
/// advancement deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// User-visible alert channel: the terminal banner plus audio cue. Must
/// never fail a scheduler tick; adapters swallow their own I/O errors.
#[async_trait::async_trait]
pub trait AlertSink: Send + Sync {
    async fn show_alert(&self, medication: &Medication);
}

/// Platform notification channel, gated by a three-state permission the
/// surrounding platform may grant, deny, or leave undecided.
#[async_trait::async_trait]
pub trait NotifierPort: Send + Sync {
    /// Current permission state.
    async fn permission(&self) -> NotifyPermission;

    /// Ask the user for permission. May resolve to any of the three states;
    /// a platform without notification support reports `Denied`.
    async fn request_permission(&self) -> Result<NotifyPermission, DomainError>;

    /// Emit a notification. Callers only invoke this when permission is
    /// `Granted`; adapters still no-op safely otherwise.
    async fn notify(&self, title: &str, body: &str) -> Result<(), DomainError>;
}
