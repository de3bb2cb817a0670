//! Take-history use case: month/range queries, the calendar grid, and CSV
//! export matching the backend's own export format.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::adapters::export::takes_to_csv;
use crate::domain::{month_grid, CalendarCell, DomainError, HistoryFilter, TakeRecord};
use crate::ports::{Clock, MedicationApi};

pub struct HistoryService {
    api: Arc<dyn MedicationApi>,
    clock: Arc<dyn Clock>,
}

impl HistoryService {
    pub fn new(api: Arc<dyn MedicationApi>, clock: Arc<dyn Clock>) -> Self {
        Self { api, clock }
    }

    /// The current `YYYY-MM` month key.
    pub fn current_month(&self) -> String {
        self.clock.now().format("%Y-%m").to_string()
    }

    /// Fetch take records for the filter; a filter with neither month nor
    /// range set falls back to the current month, like the original view.
    pub async fn load(&self, filter: &HistoryFilter) -> Result<Vec<TakeRecord>, DomainError> {
        let filter = if filter.month.is_none() && filter.start.is_none() && filter.end.is_none() {
            HistoryFilter::month(self.current_month())
        } else {
            filter.clone()
        };
        self.api.list_takes(&filter).await
    }

    /// Calendar cells for `year`/`month`, with take days marked.
    pub fn calendar(&self, year: i32, month: u32, takes: &[TakeRecord]) -> Vec<CalendarCell> {
        let marked: HashSet<String> = takes.iter().map(|t| t.date.clone()).collect();
        month_grid(year, month, &marked)
    }

    /// Export the filtered history as CSV to `path`. Returns the number of
    /// records written.
    pub async fn export_csv(
        &self,
        filter: &HistoryFilter,
        path: &Path,
    ) -> Result<usize, DomainError> {
        let takes = self.load(filter).await?;
        let csv = takes_to_csv(&takes)
            .map_err(|e| DomainError::State(format!("CSV serialization: {e}")))?;
        tokio::fs::write(path, csv)
            .await
            .map_err(|e| DomainError::State(format!("write {}: {e}", path.display())))?;
        info!(path = %path.display(), count = takes.len(), "history exported");
        Ok(takes.len())
    }
}
