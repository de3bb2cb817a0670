//! Medication CRUD use case: validate client-side, then call the backend.
//!
//! Validation failures never reach the network; backend `ok:false` messages
//! are surfaced verbatim by the adapter.

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, MedicationDraft, MedicationId};
use crate::ports::{Clock, MedicationApi};

pub struct MedicationService {
    api: Arc<dyn MedicationApi>,
    clock: Arc<dyn Clock>,
}

impl MedicationService {
    pub fn new(api: Arc<dyn MedicationApi>, clock: Arc<dyn Clock>) -> Self {
        Self { api, clock }
    }

    /// Create a medication. Returns the backend-assigned id.
    pub async fn create(&self, draft: &MedicationDraft) -> Result<MedicationId, DomainError> {
        draft.validate(self.clock.now().date_naive())?;
        let id = self.api.create_medication(draft).await?;
        info!(med_id = id, name = %draft.name, "medication created");
        Ok(id)
    }

    /// Update all fields of an existing medication.
    pub async fn update(&self, id: MedicationId, draft: &MedicationDraft) -> Result<(), DomainError> {
        draft.validate(self.clock.now().date_naive())?;
        self.api.update_medication(id, draft).await?;
        info!(med_id = id, name = %draft.name, "medication updated");
        Ok(())
    }

    pub async fn delete(&self, id: MedicationId) -> Result<(), DomainError> {
        self.api.delete_medication(id).await?;
        info!(med_id = id, "medication deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::api::MockMedicationApi;
    use crate::adapters::clock::SystemClock;
    use chrono::{Duration, Local};

    fn service() -> (MedicationService, Arc<MockMedicationApi>) {
        let api = Arc::new(MockMedicationApi::new());
        let svc = MedicationService::new(
            Arc::clone(&api) as Arc<dyn MedicationApi>,
            Arc::new(SystemClock) as Arc<dyn Clock>,
        );
        (svc, api)
    }

    fn draft(date: String) -> MedicationDraft {
        MedicationDraft {
            name: "Ben-u-ron".to_string(),
            dose: "500mg".to_string(),
            time: "09:00".to_string(),
            date,
        }
    }

    #[tokio::test]
    async fn create_accepts_today() {
        let (svc, api) = service();
        let today = Local::now().format("%Y-%m-%d").to_string();

        let id = svc.create(&draft(today)).await.unwrap();

        assert!(id > 0);
        assert_eq!(api.request_count().await, 1);
    }

    #[tokio::test]
    async fn past_date_rejected_without_network_call() {
        let (svc, api) = service();
        let yesterday = (Local::now() - Duration::days(1))
            .format("%Y-%m-%d")
            .to_string();

        let err = svc.create(&draft(yesterday)).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(api.request_count().await, 0, "rejected client-side");
    }

    #[tokio::test]
    async fn blank_fields_rejected() {
        let (svc, api) = service();
        let today = Local::now().format("%Y-%m-%d").to_string();
        let mut d = draft(today);
        d.dose = "   ".to_string();

        assert!(matches!(
            svc.create(&d).await.unwrap_err(),
            DomainError::Validation(_)
        ));
        assert_eq!(api.request_count().await, 0);
    }

    #[tokio::test]
    async fn update_validates_like_create() {
        let (svc, api) = service();
        let today = Local::now().format("%Y-%m-%d").to_string();
        let id = svc.create(&draft(today)).await.unwrap();

        let mut d = draft("1999-01-01".to_string());
        d.name = "Renamed".to_string();
        assert!(svc.update(id, &d).await.is_err());

        let meds = api.list_medications().await.unwrap();
        assert_eq!(meds[0].name, "Ben-u-ron", "update never sent");
    }
}
