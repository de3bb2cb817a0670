//! Reminder loop use case: poll wall-clock time once per tick and fire an
//! at-most-once-per-minute alert per medication due "now".
//!
//! Orchestrates MedicationApi, Clock, AlertSink and NotifierPort. Does not
//! block the main thread; `run_loop` is spawned and uses tokio::time.

use std::sync::Arc;
use std::time::Duration;

use chrono::Timelike;
use tracing::{debug, info, warn};

use crate::domain::schedule::{due_medications, next_dose, AlertKey, NextDose, ReminderState};
use crate::domain::{DomainError, Medication, MedicationId, NotifyPermission, TakeDraft};
use crate::ports::{AlertSink, Clock, MedicationApi, NotifierPort};

/// Scheduler state touched by ticks and by user actions from the menu.
#[derive(Default)]
struct ReminderInner {
    /// In-memory medication list; fully replaced on each successful poll.
    medications: Vec<Medication>,
    /// Fired-alert keys, pruned on date rollover.
    fired: ReminderState,
    /// At most one medication currently shown in the alert banner; cleared
    /// when the user dismisses it. Last due medication wins.
    pending: Option<Medication>,
}

/// Reminder scheduler. Owns the medication list and the fired-key set; the
/// tick body is idempotent with respect to already-fired keys, so an
/// overlapping or drifting timer callback cannot double-alert.
pub struct ReminderService {
    api: Arc<dyn MedicationApi>,
    clock: Arc<dyn Clock>,
    alert: Arc<dyn AlertSink>,
    notifier: Arc<dyn NotifierPort>,
    tick_period: Duration,
    inner: tokio::sync::RwLock<ReminderInner>,
}

impl ReminderService {
    pub fn new(
        api: Arc<dyn MedicationApi>,
        clock: Arc<dyn Clock>,
        alert: Arc<dyn AlertSink>,
        notifier: Arc<dyn NotifierPort>,
        tick_period: Duration,
    ) -> Self {
        Self {
            api,
            clock,
            alert,
            notifier,
            tick_period,
            inner: tokio::sync::RwLock::new(ReminderInner::default()),
        }
    }

    /// Run the reminder loop until the process exits. No error stops it:
    /// failed polls keep the last successfully loaded list, failed
    /// notifications are logged and dropped.
    pub async fn run_loop(&self) {
        info!(
            period_secs = self.tick_period.as_secs(),
            "reminder loop started"
        );
        let mut interval = tokio::time::interval(self.tick_period);
        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    /// One scheduler tick: refresh the list, prune fired keys on date
    /// rollover, then alert every due medication whose key has not fired yet.
    pub async fn tick(&self) {
        match self.api.list_medications().await {
            Ok(meds) => self.inner.write().await.medications = meds,
            Err(e) => warn!(error = %e, "medication poll failed; keeping last loaded list"),
        }

        let now = self.clock.now().naive_local();
        let to_alert: Vec<Medication> = {
            let mut guard = self.inner.write().await;
            let inner = &mut *guard;
            inner.fired.prune(now.date());
            // Mark keys fired before any side effect so a re-entrant tick
            // inside the same minute skips them.
            due_medications(&inner.medications, now)
                .into_iter()
                .filter(|med| {
                    inner
                        .fired
                        .try_fire(AlertKey::new(med.id, now.hour(), now.minute()))
                })
                .cloned()
                .collect()
        };

        if to_alert.is_empty() {
            debug!(at = %now.format("%H:%M"), "tick: nothing due");
            return;
        }

        for med in to_alert {
            info!(med_id = med.id, name = %med.name, time = %med.time, "dose due");
            self.alert.show_alert(&med).await;
            if self.notifier.permission().await == NotifyPermission::Granted {
                let body = format!("{} • {}", med.name, med.dose);
                if let Err(e) = self.notifier.notify("Hora do medicamento", &body).await {
                    warn!(error = %e, "platform notification failed");
                }
            }
            self.inner.write().await.pending = Some(med);
        }
    }

    /// Reload the medication list from the backend. Used by the UI; the tick
    /// path swallows this error instead.
    pub async fn refresh(&self) -> Result<usize, DomainError> {
        let meds = self.api.list_medications().await?;
        let count = meds.len();
        self.inner.write().await.medications = meds;
        Ok(count)
    }

    /// Snapshot of the current list, sorted by time-of-day for display.
    pub async fn medications(&self) -> Vec<Medication> {
        let mut meds = self.inner.read().await.medications.clone();
        meds.sort_by(|a, b| a.time.cmp(&b.time));
        meds
    }

    /// The medication currently shown in the alert banner, if any.
    pub async fn pending_alert(&self) -> Option<Medication> {
        self.inner.read().await.pending.clone()
    }

    /// Next due dose relative to the injected clock.
    pub async fn next_dose(&self) -> Option<NextDose> {
        let now = self.clock.now().naive_local();
        next_dose(&self.inner.read().await.medications, now)
    }

    /// Dismiss the pending alert, recording a take with an optional note.
    /// The medication stays in the active list; only the explicit take-now
    /// path removes it.
    pub async fn acknowledge(&self, note: &str) -> Result<Option<Medication>, DomainError> {
        let Some(med) = self.inner.write().await.pending.take() else {
            return Ok(None);
        };
        let take = TakeDraft {
            med_id: med.id,
            name: med.name.clone(),
            dose: med.dose.clone(),
            note: note.trim().to_string(),
        };
        self.api.record_take(&take).await?;
        info!(med_id = med.id, name = %med.name, "alert dismissed; take recorded");
        Ok(Some(med))
    }

    /// Explicit "tomei agora": the backend records the take and deletes the
    /// medication, so drop it from the in-memory list immediately.
    pub async fn take_now(
        &self,
        id: MedicationId,
        note: &str,
    ) -> Result<Option<Medication>, DomainError> {
        self.api.take_now(id, note.trim()).await?;
        let mut guard = self.inner.write().await;
        let removed = guard
            .medications
            .iter()
            .position(|m| m.id == id)
            .map(|i| guard.medications.remove(i));
        if guard.pending.as_ref().is_some_and(|m| m.id == id) {
            guard.pending = None;
        }
        drop(guard);
        if let Some(med) = &removed {
            info!(med_id = med.id, name = %med.name, "taken now; removed from active list");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::api::MockMedicationApi;
    use crate::domain::MedicationDraft;
    use chrono::{DateTime, Local, NaiveDate, TimeZone};

    /// Settable test clock.
    struct TestClock(std::sync::Mutex<DateTime<Local>>);

    impl TestClock {
        fn at(h: u32, m: u32) -> Arc<Self> {
            let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
            let dt = Local
                .from_local_datetime(&date.and_hms_opt(h, m, 0).unwrap())
                .unwrap();
            Arc::new(Self(std::sync::Mutex::new(dt)))
        }

        fn set(&self, h: u32, m: u32) {
            let mut guard = self.0.lock().unwrap();
            let dt = Local
                .from_local_datetime(&guard.date_naive().and_hms_opt(h, m, 0).unwrap())
                .unwrap();
            *guard = dt;
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> DateTime<Local> {
            *self.0.lock().unwrap()
        }
    }

    /// Counts alerts instead of drawing banners.
    #[derive(Default)]
    struct RecordingAlert(std::sync::Mutex<Vec<MedicationId>>);

    #[async_trait::async_trait]
    impl AlertSink for RecordingAlert {
        async fn show_alert(&self, medication: &Medication) {
            self.0.lock().unwrap().push(medication.id);
        }
    }

    struct RecordingNotifier {
        permission: NotifyPermission,
        sent: std::sync::Mutex<usize>,
    }

    impl RecordingNotifier {
        fn granted() -> Arc<Self> {
            Arc::new(Self {
                permission: NotifyPermission::Granted,
                sent: std::sync::Mutex::new(0),
            })
        }

        fn denied() -> Arc<Self> {
            Arc::new(Self {
                permission: NotifyPermission::Denied,
                sent: std::sync::Mutex::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl NotifierPort for RecordingNotifier {
        async fn permission(&self) -> NotifyPermission {
            self.permission
        }

        async fn request_permission(&self) -> Result<NotifyPermission, DomainError> {
            Ok(self.permission)
        }

        async fn notify(&self, _title: &str, _body: &str) -> Result<(), DomainError> {
            *self.sent.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn draft(name: &str, time: &str) -> MedicationDraft {
        MedicationDraft {
            name: name.to_string(),
            dose: "500mg".to_string(),
            time: time.to_string(),
            date: "2025-03-10".to_string(),
        }
    }

    struct Harness {
        service: ReminderService,
        api: Arc<MockMedicationApi>,
        clock: Arc<TestClock>,
        alert: Arc<RecordingAlert>,
        notifier: Arc<RecordingNotifier>,
    }

    async fn harness(
        meds: &[(&str, &str)],
        h: u32,
        m: u32,
        notifier: Arc<RecordingNotifier>,
    ) -> Harness {
        let api = Arc::new(MockMedicationApi::new());
        for (name, time) in meds {
            api.create_medication(&draft(name, time)).await.unwrap();
        }
        let clock = TestClock::at(h, m);
        let alert = Arc::new(RecordingAlert::default());
        let service = ReminderService::new(
            Arc::clone(&api) as Arc<dyn MedicationApi>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            Arc::clone(&alert) as Arc<dyn AlertSink>,
            Arc::clone(&notifier) as Arc<dyn NotifierPort>,
            Duration::from_secs(60),
        );
        Harness {
            service,
            api,
            clock,
            alert,
            notifier,
        }
    }

    #[tokio::test]
    async fn tick_alerts_due_medication_once_per_minute() {
        let h = harness(&[("Ben-u-ron", "09:00")], 9, 0, RecordingNotifier::granted()).await;

        h.service.tick().await;
        h.service.tick().await; // drifted repeat inside the same minute

        assert_eq!(h.alert.0.lock().unwrap().len(), 1);
        assert_eq!(*h.notifier.sent.lock().unwrap(), 1);
        assert!(h.service.pending_alert().await.is_some());
    }

    #[tokio::test]
    async fn two_medications_same_minute_both_alert() {
        let h = harness(
            &[("A", "14:30"), ("B", "14:30")],
            14,
            30,
            RecordingNotifier::granted(),
        )
        .await;

        h.service.tick().await;
        h.service.tick().await;

        let fired = h.alert.0.lock().unwrap().clone();
        assert_eq!(fired.len(), 2, "each medication fires exactly once");
    }

    #[tokio::test]
    async fn denied_permission_skips_platform_notification() {
        let h = harness(&[("A", "09:00")], 9, 0, RecordingNotifier::denied()).await;

        h.service.tick().await;

        assert_eq!(h.alert.0.lock().unwrap().len(), 1, "banner still shows");
        assert_eq!(*h.notifier.sent.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn acknowledge_records_take_but_keeps_medication() {
        let h = harness(&[("A", "09:00")], 9, 0, RecordingNotifier::granted()).await;

        h.service.tick().await;
        let med = h.service.acknowledge("com comida").await.unwrap().unwrap();

        assert_eq!(med.name, "A");
        assert!(h.service.pending_alert().await.is_none());
        assert_eq!(h.service.medications().await.len(), 1, "stays in the list");
        let takes = h.api.recorded_takes().await;
        assert_eq!(takes.len(), 1);
        assert_eq!(takes[0].note.as_deref(), Some("com comida"));
    }

    #[tokio::test]
    async fn acknowledge_without_pending_is_a_noop() {
        let h = harness(&[("A", "09:00")], 8, 0, RecordingNotifier::granted()).await;

        h.service.tick().await;
        assert!(h.service.acknowledge("").await.unwrap().is_none());
        assert!(h.api.recorded_takes().await.is_empty());
    }

    #[tokio::test]
    async fn take_now_removes_medication_immediately() {
        let h = harness(
            &[("A", "09:00"), ("B", "10:00")],
            8,
            0,
            RecordingNotifier::granted(),
        )
        .await;
        h.service.refresh().await.unwrap();
        let id = h.service.medications().await[0].id;

        let removed = h.service.take_now(id, "").await.unwrap().unwrap();

        assert_eq!(removed.name, "A");
        assert_eq!(h.service.medications().await.len(), 1);
        assert_eq!(h.api.recorded_takes().await.len(), 1);
        assert_eq!(h.api.list_medications().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn poll_failure_keeps_last_loaded_list_and_still_alerts() {
        let h = harness(&[("A", "09:00")], 8, 59, RecordingNotifier::granted()).await;

        h.service.tick().await; // loads the list at 08:59
        h.api.set_offline(true).await;
        h.clock.set(9, 0);
        h.service.tick().await;

        assert_eq!(h.alert.0.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn next_day_same_time_alerts_again() {
        let h = harness(&[("A", "09:00")], 9, 0, RecordingNotifier::granted()).await;

        h.service.tick().await;
        {
            // Roll the clock forward one day, same minute.
            let mut guard = h.clock.0.lock().unwrap();
            *guard += chrono::Duration::days(1);
        }
        h.service.tick().await;

        assert_eq!(h.alert.0.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn next_dose_scenarios() {
        let h = harness(
            &[("med1", "09:00"), ("med2", "14:00")],
            8,
            30,
            RecordingNotifier::granted(),
        )
        .await;
        h.service.refresh().await.unwrap();

        let next = h.service.next_dose().await.unwrap();
        assert_eq!(next.time, "09:00");
        assert!(next.today);

        h.clock.set(15, 0);
        let next = h.service.next_dose().await.unwrap();
        assert_eq!(next.time, "09:00");
        assert!(!next.today, "both past; earliest rolls to tomorrow");
    }
}
