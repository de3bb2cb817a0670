//! Mock backend for running without a server and for use case tests.
//!
//! Mirrors the real backend's behavior: ids are assigned sequentially,
//! take-now records a take and deletes the medication, takes filter by month
//! prefix or date range.

use chrono::Local;
use tokio::sync::Mutex;

use crate::domain::{
    DomainError, HistoryFilter, Medication, MedicationDraft, MedicationId, TakeDraft, TakeRecord,
};
use crate::ports::MedicationApi;

#[derive(Default)]
struct MockState {
    medications: Vec<Medication>,
    takes: Vec<TakeRecord>,
    next_id: i64,
    requests: usize,
    offline: bool,
}

/// In-memory MedicationApi. `set_offline(true)` makes every call fail with a
/// network error, for exercising the scheduler's swallow-and-continue path.
pub struct MockMedicationApi {
    state: Mutex<MockState>,
}

impl MockMedicationApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                next_id: 1,
                ..MockState::default()
            }),
        }
    }

    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
    }

    /// Calls that reached the mock (validation rejections never get here).
    pub async fn request_count(&self) -> usize {
        self.state.lock().await.requests
    }

    pub async fn recorded_takes(&self) -> Vec<TakeRecord> {
        self.state.lock().await.takes.clone()
    }

    async fn begin(&self) -> Result<tokio::sync::MutexGuard<'_, MockState>, DomainError> {
        let mut state = self.state.lock().await;
        if state.offline {
            return Err(DomainError::Network("mock offline".into()));
        }
        state.requests += 1;
        Ok(state)
    }
}

impl Default for MockMedicationApi {
    fn default() -> Self {
        Self::new()
    }
}

fn take_record(state: &mut MockState, med_id: MedicationId, name: &str, dose: &str, note: &str) {
    let now = Local::now();
    let id = state.next_id;
    state.next_id += 1;
    state.takes.push(TakeRecord {
        id: Some(id),
        med_id: Some(med_id),
        name: name.to_string(),
        dose: dose.to_string(),
        note: if note.is_empty() {
            None
        } else {
            Some(note.to_string())
        },
        date: now.format("%Y-%m-%d").to_string(),
        time: now.format("%H:%M:%S").to_string(),
    });
}

#[async_trait::async_trait]
impl MedicationApi for MockMedicationApi {
    async fn list_medications(&self) -> Result<Vec<Medication>, DomainError> {
        Ok(self.begin().await?.medications.clone())
    }

    async fn create_medication(
        &self,
        draft: &MedicationDraft,
    ) -> Result<MedicationId, DomainError> {
        let mut state = self.begin().await?;
        let id = state.next_id;
        state.next_id += 1;
        state.medications.push(Medication {
            id,
            name: draft.name.trim().to_string(),
            dose: draft.dose.trim().to_string(),
            time: draft.time.clone(),
            date: Some(draft.date.clone()),
        });
        Ok(id)
    }

    async fn update_medication(
        &self,
        id: MedicationId,
        draft: &MedicationDraft,
    ) -> Result<(), DomainError> {
        let mut state = self.begin().await?;
        let med = state
            .medications
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| DomainError::Api("Medicamento não encontrado".into()))?;
        med.name = draft.name.trim().to_string();
        med.dose = draft.dose.trim().to_string();
        med.time = draft.time.clone();
        med.date = Some(draft.date.clone());
        Ok(())
    }

    async fn delete_medication(&self, id: MedicationId) -> Result<(), DomainError> {
        let mut state = self.begin().await?;
        let before = state.medications.len();
        state.medications.retain(|m| m.id != id);
        if state.medications.len() == before {
            return Err(DomainError::Api("Medicamento não encontrado".into()));
        }
        Ok(())
    }

    async fn take_now(&self, id: MedicationId, note: &str) -> Result<(), DomainError> {
        let mut state = self.begin().await?;
        let med = state
            .medications
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| DomainError::Api("Medicamento não encontrado".into()))?;
        take_record(&mut state, med.id, &med.name, &med.dose, note);
        state.medications.retain(|m| m.id != id);
        Ok(())
    }

    async fn record_take(&self, take: &TakeDraft) -> Result<(), DomainError> {
        let mut state = self.begin().await?;
        take_record(&mut state, take.med_id, &take.name, &take.dose, &take.note);
        Ok(())
    }

    async fn list_takes(&self, filter: &HistoryFilter) -> Result<Vec<TakeRecord>, DomainError> {
        let state = self.begin().await?;
        let mut takes: Vec<TakeRecord> = state
            .takes
            .iter()
            .filter(|t| {
                filter
                    .month
                    .as_ref()
                    .is_none_or(|m| t.date.starts_with(m.as_str()))
                    && filter.start.as_ref().is_none_or(|s| t.date >= *s)
                    && filter.end.as_ref().is_none_or(|e| t.date <= *e)
            })
            .cloned()
            .collect();
        takes.sort_by(|a, b| (&b.date, &b.time).cmp(&(&a.date, &a.time)));
        Ok(takes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> MedicationDraft {
        MedicationDraft {
            name: name.to_string(),
            dose: "1x".to_string(),
            time: "09:00".to_string(),
            date: "2025-03-10".to_string(),
        }
    }

    #[tokio::test]
    async fn take_now_records_and_deletes() {
        let mock = MockMedicationApi::new();
        let id = mock.create_medication(&draft("A")).await.unwrap();

        mock.take_now(id, "nota").await.unwrap();

        assert!(mock.list_medications().await.unwrap().is_empty());
        let takes = mock.recorded_takes().await;
        assert_eq!(takes.len(), 1);
        assert_eq!(takes[0].med_id, Some(id));
        assert_eq!(takes[0].note.as_deref(), Some("nota"));
    }

    #[tokio::test]
    async fn offline_fails_every_call() {
        let mock = MockMedicationApi::new();
        mock.set_offline(true).await;
        assert!(matches!(
            mock.list_medications().await.unwrap_err(),
            DomainError::Network(_)
        ));
    }

    #[tokio::test]
    async fn takes_filter_by_range() {
        let mock = MockMedicationApi::new();
        let id = mock.create_medication(&draft("A")).await.unwrap();
        mock.take_now(id, "").await.unwrap();

        let today = Local::now().format("%Y-%m-%d").to_string();
        let hit = mock
            .list_takes(&HistoryFilter::range(Some(today.clone()), Some(today)))
            .await
            .unwrap();
        assert_eq!(hit.len(), 1);

        let miss = mock
            .list_takes(&HistoryFilter::range(None, Some("1999-01-01".to_string())))
            .await
            .unwrap();
        assert!(miss.is_empty());
    }
}
