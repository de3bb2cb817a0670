//! Application use cases. Orchestrate domain logic via ports.

pub mod history_service;
pub mod medication_service;
pub mod reminder_service;

pub use history_service::HistoryService;
pub use medication_service::MedicationService;
pub use reminder_service::ReminderService;
