//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/terminal types here — these are mapped from adapters. Wire field
//! names stay in the backend's Portuguese (`nome`, `hora`, ...); Rust-side
//! names are English.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Opaque, stable medication identifier assigned by the backend.
pub type MedicationId = i64;

/// A scheduled medication. `time` is the daily dose time as `HH:MM`;
/// `date` is an optional scheduled day as `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: MedicationId,
    #[serde(rename = "nome")]
    pub name: String,
    pub dose: String,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "data")]
    pub date: Option<String>,
}

impl Medication {
    /// Parse the stored `HH:MM` time-of-day. None when missing or malformed;
    /// such entries are skipped by the scheduler rather than erroring.
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.time, "%H:%M").ok()
    }
}

/// User-submitted medication fields, before the backend assigns an id.
/// Used for both create and update.
#[derive(Debug, Clone, Serialize)]
pub struct MedicationDraft {
    #[serde(rename = "nome")]
    pub name: String,
    pub dose: String,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "data")]
    pub date: String,
}

impl MedicationDraft {
    /// Client-side validation: all fields required, `HH:MM` time, and a
    /// today-or-future `YYYY-MM-DD` date. Rejected drafts never reach the
    /// network. Messages are user-facing.
    pub fn validate(&self, today: NaiveDate) -> Result<(), DomainError> {
        if self.name.trim().is_empty()
            || self.dose.trim().is_empty()
            || self.time.trim().is_empty()
            || self.date.trim().is_empty()
        {
            return Err(DomainError::Validation(
                "Preenche nome, dose, hora e data.".into(),
            ));
        }
        if NaiveTime::parse_from_str(&self.time, "%H:%M").is_err() {
            return Err(DomainError::Validation("Hora inválida (HH:MM).".into()));
        }
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|_| DomainError::Validation("Data inválida.".into()))?;
        if date < today {
            return Err(DomainError::Validation(
                "A data tem de ser hoje ou no futuro.".into(),
            ));
        }
        Ok(())
    }
}

/// A recorded dose intake ("toma") as returned by the history API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub med_id: Option<MedicationId>,
    #[serde(rename = "nome")]
    pub name: String,
    pub dose: String,
    #[serde(rename = "nota", default)]
    pub note: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(rename = "data")]
    pub date: String,
    /// `HH:MM:SS`
    #[serde(rename = "hora")]
    pub time: String,
}

/// A manual take submission from the alert-dismissal path. The backend
/// timestamps it server-side.
#[derive(Debug, Clone, Serialize)]
pub struct TakeDraft {
    pub med_id: MedicationId,
    #[serde(rename = "nome")]
    pub name: String,
    pub dose: String,
    #[serde(rename = "nota")]
    pub note: String,
}

/// History query: either a whole month or an explicit date range.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    /// `YYYY-MM`
    pub month: Option<String>,
    /// `YYYY-MM-DD`, inclusive
    pub start: Option<String>,
    /// `YYYY-MM-DD`, inclusive
    pub end: Option<String>,
}

impl HistoryFilter {
    pub fn month(month: impl Into<String>) -> Self {
        Self {
            month: Some(month.into()),
            ..Self::default()
        }
    }

    pub fn range(start: Option<String>, end: Option<String>) -> Self {
        Self {
            month: None,
            start,
            end,
        }
    }
}

/// Platform notification permission. The request is asynchronous and may
/// resolve to any of the three; every state must degrade without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotifyPermission {
    #[default]
    Default,
    Granted,
    Denied,
}
