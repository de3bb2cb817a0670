//! HTTP adapter for the medication backend.
//!
//! JSON over a cookie-based session: `/auth/*` for login, `/api/medicamentos`
//! and `/api/tomas` for data. A 401 on any route maps to `DomainError::Auth`;
//! transport failures map to `DomainError::Network` (generic connectivity
//! message, no retry).

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::domain::{
    DomainError, HistoryFilter, Medication, MedicationDraft, MedicationId, TakeDraft, TakeRecord,
};
use crate::ports::{AuthPort, MedicationApi};

/// Response envelope for mutating routes: `{ok, message?, id?}`.
#[derive(Debug, Deserialize)]
struct Ack {
    ok: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    id: Option<i64>,
}

/// Backend gateway over HTTP. One reqwest client with a cookie store, so the
/// login session carries across all calls.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// # Errors
    /// Fails only if the TLS backend cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| DomainError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check the session-expiry signal before interpreting a body.
    fn check_auth(res: &Response) -> Result<(), DomainError> {
        if res.status() == StatusCode::UNAUTHORIZED {
            return Err(DomainError::Auth("sessão expirada".into()));
        }
        Ok(())
    }

    /// Parse an `{ok, message?, id?}` envelope, surfacing the backend
    /// message verbatim when `ok` is false.
    async fn ack(res: Response, fallback: &str) -> Result<Ack, DomainError> {
        Self::check_auth(&res)?;
        let ack: Ack = res
            .json()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;
        if !ack.ok {
            return Err(DomainError::Api(
                ack.message.unwrap_or_else(|| fallback.to_string()),
            ));
        }
        Ok(ack)
    }
}

#[async_trait::async_trait]
impl MedicationApi for HttpBackend {
    async fn list_medications(&self) -> Result<Vec<Medication>, DomainError> {
        let res = self
            .client
            .get(self.url("/api/medicamentos"))
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;
        Self::check_auth(&res)?;
        let meds: Vec<Medication> = res
            .json()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;
        debug!(count = meds.len(), "medication list loaded");
        Ok(meds)
    }

    async fn create_medication(
        &self,
        draft: &MedicationDraft,
    ) -> Result<MedicationId, DomainError> {
        let res = self
            .client
            .post(self.url("/api/medicamentos"))
            .json(draft)
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;
        let ack = Self::ack(res, "Erro ao guardar").await?;
        ack.id
            .ok_or_else(|| DomainError::Api("Resposta sem id".into()))
    }

    async fn update_medication(
        &self,
        id: MedicationId,
        draft: &MedicationDraft,
    ) -> Result<(), DomainError> {
        let res = self
            .client
            .put(self.url(&format!("/api/medicamentos/{id}")))
            .json(draft)
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;
        Self::ack(res, "Erro ao atualizar").await.map(|_| ())
    }

    async fn delete_medication(&self, id: MedicationId) -> Result<(), DomainError> {
        let res = self
            .client
            .delete(self.url(&format!("/api/medicamentos/{id}")))
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;
        Self::ack(res, "Erro ao apagar").await.map(|_| ())
    }

    async fn take_now(&self, id: MedicationId, note: &str) -> Result<(), DomainError> {
        let res = self
            .client
            .post(self.url(&format!("/api/medicamentos/{id}/take")))
            .json(&serde_json::json!({ "nota": note }))
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;
        Self::ack(res, "Erro ao registar toma").await.map(|_| ())
    }

    async fn record_take(&self, take: &TakeDraft) -> Result<(), DomainError> {
        let res = self
            .client
            .post(self.url("/api/tomas"))
            .json(take)
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;
        Self::ack(res, "Erro ao registar toma").await.map(|_| ())
    }

    async fn list_takes(&self, filter: &HistoryFilter) -> Result<Vec<TakeRecord>, DomainError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(m) = &filter.month {
            query.push(("month", m));
        }
        if let Some(s) = &filter.start {
            query.push(("start", s));
        }
        if let Some(e) = &filter.end {
            query.push(("end", e));
        }
        let res = self
            .client
            .get(self.url("/api/tomas"))
            .query(&query)
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;
        Self::check_auth(&res)?;
        res.json()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))
    }
}

#[async_trait::async_trait]
impl AuthPort for HttpBackend {
    async fn login(&self, email: &str, password: &str) -> Result<(), DomainError> {
        let res = self
            .client
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;
        Self::ack(res, "Erro ao entrar").await.map(|_| ())
    }

    async fn logout(&self) -> Result<(), DomainError> {
        // Best-effort, like the original client: a failed logout still ends
        // the local session.
        self.client
            .post(self.url("/auth/logout"))
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;
        Ok(())
    }
}
