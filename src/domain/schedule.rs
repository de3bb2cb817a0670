//! Pure scheduling rules: which medications are due on a tick, duplicate
//! alert suppression, and next-dose display.
//!
//! No I/O and no clocks here — callers pass the current time in, so these
//! rules are unit-testable without a runtime.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::domain::{Medication, MedicationId};

/// Deduplication key for a fired alert: one per medication per wall-clock
/// minute. A set of these (rather than a single "last fired" slot) lets two
/// medications due in the same minute each fire exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertKey {
    pub med_id: MedicationId,
    pub hour: u32,
    pub minute: u32,
}

impl AlertKey {
    pub fn new(med_id: MedicationId, hour: u32, minute: u32) -> Self {
        Self {
            med_id,
            hour,
            minute,
        }
    }
}

/// Fired-alert tracking for the reminder loop. Keys accumulate over the day
/// and are cleared when the date rolls over, so the set stays bounded by
/// (medications x minutes per day).
#[derive(Debug, Default)]
pub struct ReminderState {
    fired: HashSet<AlertKey>,
    last_prune: Option<NaiveDate>,
}

impl ReminderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear fired keys once per day. Idempotent within the same date, so a
    /// tick may call this unconditionally.
    pub fn prune(&mut self, today: NaiveDate) {
        if self.last_prune != Some(today) {
            self.fired.clear();
            self.last_prune = Some(today);
        }
    }

    /// Attempt to mark `key` as fired. Returns true exactly once per key;
    /// repeated ticks inside the same minute (timer drift, overlapping
    /// callbacks) see false and skip the alert.
    pub fn try_fire(&mut self, key: AlertKey) -> bool {
        self.fired.insert(key)
    }

    /// Number of alerts fired since the last prune. For logging.
    pub fn fired_count(&self) -> usize {
        self.fired.len()
    }
}

/// Medications whose stored `HH:MM` exactly equals the current hour and
/// minute. Entries with a missing or malformed time are skipped.
pub fn due_medications(medications: &[Medication], now: NaiveDateTime) -> Vec<&Medication> {
    let (h, m) = (now.hour(), now.minute());
    medications
        .iter()
        .filter(|med| {
            med.time_of_day()
                .is_some_and(|t| t.hour() == h && t.minute() == m)
        })
        .collect()
}

/// The next dose to display: name, dose, time and whether it falls today or
/// rolls over to tomorrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextDose {
    pub name: String,
    pub dose: String,
    /// `HH:MM` as stored.
    pub time: String,
    pub today: bool,
}

impl NextDose {
    /// User-facing one-liner, e.g. `Ben-u-ron • 500mg • às 09:00 (hoje)`.
    pub fn display(&self) -> String {
        let day = if self.today { "hoje" } else { "amanhã" };
        format!("{} • {} • às {} ({})", self.name, self.dose, self.time, day)
    }
}

/// Compute the next due medication relative to `now`.
///
/// Among times at or after the current minute, the earliest wins ("hoje").
/// When every time-of-day is strictly in the past, roll over to tomorrow and
/// pick the earliest time-of-day overall ("amanhã").
pub fn next_dose(medications: &[Medication], now: NaiveDateTime) -> Option<NextDose> {
    let now_minutes = now.hour() * 60 + now.minute();

    let timed = medications
        .iter()
        .filter_map(|med| med.time_of_day().map(|t| (med, t.hour() * 60 + t.minute())));

    let candidate = timed
        .clone()
        .filter(|(_, mins)| *mins >= now_minutes)
        .min_by_key(|(_, mins)| *mins)
        .map(|(med, _)| (med, true))
        .or_else(|| {
            timed
                .min_by_key(|(_, mins)| *mins)
                .map(|(med, _)| (med, false))
        });

    candidate.map(|(med, today)| NextDose {
        name: med.name.clone(),
        dose: med.dose.clone(),
        time: med.time.clone(),
        today,
    })
}
