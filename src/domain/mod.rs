//! Core domain layer. No external I/O dependencies.
//!
//! Entities and the pure scheduling rules live here. Dependencies flow inward.

pub mod calendar;
pub mod entities;
pub mod errors;
pub mod schedule;

pub use calendar::{month_grid, CalendarCell};
pub use entities::{
    HistoryFilter, Medication, MedicationDraft, MedicationId, NotifyPermission, TakeDraft,
    TakeRecord,
};
pub use errors::DomainError;
pub use schedule::{due_medications, next_dose, AlertKey, NextDose, ReminderState};
