//! The application-side wrapper around [`LeadStore`].
//!
//! [`LeadConsole`] opens the SQLite-backed store, loads it, and adds the
//! behavior a front end expects around the pure store operations:
//!
//! - update, convert and revert raise the loading flag, wait for the
//!   configured latency, run, and lower the flag again;
//! - CSV import reads a file and refuses anything without a `.csv`
//!   extension;
//! - CSV export writes the filtered view to a file.
//!
//! Operations run to completion; there is no cancellation.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use sqlx::SqlitePool;

use leads_console_core::persist::PersistenceAdapter;
use leads_console_core::{
    ConversionRequest, ImportSummary, Lead, LeadStore, LeadUpdate, Opportunity, StoreError,
};

use crate::config::Config;
use crate::db;
use crate::migrate;
use crate::sqlite_store::SqliteKeyValueStore;

pub const NOT_CSV_MESSAGE: &str = "Please select a CSV file";

/// A loaded store plus its latency policy and database handle.
pub struct LeadConsole {
    store: LeadStore,
    latency: Duration,
    pool: Option<SqlitePool>,
}

impl LeadConsole {
    /// Wrap an already-constructed store. Call [`LeadStore::load`] first.
    pub fn new(store: LeadStore, latency: Duration) -> Self {
        Self {
            store,
            latency,
            pool: None,
        }
    }

    /// Open the configured database, ensure the schema, and load state.
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = db::connect(config).await?;
        migrate::ensure_schema(&pool).await?;

        let backend = Arc::new(SqliteKeyValueStore::new(pool.clone()));
        let mut store = LeadStore::new(PersistenceAdapter::new(backend));
        store.load().await;

        Ok(Self {
            store,
            latency: config.console.latency(),
            pool: Some(pool),
        })
    }

    pub fn store(&self) -> &LeadStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LeadStore {
        &mut self.store
    }

    pub async fn update_lead(
        &mut self,
        id: &str,
        update: &LeadUpdate,
    ) -> Result<Option<Lead>, StoreError> {
        self.begin().await;
        let result = self.store.update_lead(id, update).await;
        self.store.set_loading(false);
        result
    }

    pub async fn convert_to_opportunity(
        &mut self,
        lead_id: &str,
        request: &ConversionRequest,
    ) -> Result<Opportunity, StoreError> {
        self.begin().await;
        let result = self.store.convert_to_opportunity(lead_id, request).await;
        self.store.set_loading(false);
        result
    }

    pub async fn revert_to_lead(&mut self, opportunity_id: &str) -> Result<Lead, StoreError> {
        self.begin().await;
        let result = self.store.revert_to_lead(opportunity_id).await;
        self.store.set_loading(false);
        result
    }

    /// Import leads from a `.csv` file.
    pub async fn import_file(&mut self, path: &Path) -> Result<ImportSummary> {
        if !has_csv_extension(path) {
            self.store.set_error(Some(NOT_CSV_MESSAGE.to_string()));
            bail!("{}: {}", NOT_CSV_MESSAGE, path.display());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Error reading file: {}", path.display()))?;
        Ok(self.store.import_leads(&text).await?)
    }

    /// Write the filtered view to `path` as CSV. Returns the row count.
    pub fn export_file(&mut self, path: &Path) -> Result<usize> {
        let rows = self.store.filtered_leads().len();
        let csv = self.store.export_leads();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, csv)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(rows)
    }

    pub async fn close(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
        }
    }

    async fn begin(&mut self) {
        self.store.set_loading(true);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use leads_console_core::persist::memory::MemoryKeyValueStore;
    use leads_console_core::{LeadStatus, OpportunityStage};
    use tempfile::TempDir;

    async fn memory_console(latency: Duration) -> LeadConsole {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let mut store = LeadStore::new(PersistenceAdapter::new(backend));
        store.load().await;
        LeadConsole::new(store, latency)
    }

    #[test]
    fn test_csv_extension_check() {
        assert!(has_csv_extension(Path::new("leads.csv")));
        assert!(has_csv_extension(Path::new("dir/LEADS.CSV")));
        assert!(!has_csv_extension(Path::new("leads.txt")));
        assert!(!has_csv_extension(Path::new("leads")));
    }

    #[tokio::test]
    async fn test_loading_flag_is_raised_during_operation() {
        let mut console = memory_console(Duration::from_millis(5)).await;
        let rx = console.store_mut().subscribe();
        let id = console.store().all_leads()[0].id.clone();

        console
            .update_lead(&id, &LeadUpdate::status(LeadStatus::Won))
            .await
            .unwrap();

        let flags: Vec<bool> = rx.try_iter().map(|s| s.loading).collect();
        assert_eq!(flags.first(), Some(&true));
        assert_eq!(flags.last(), Some(&false));
        assert!(!console.store().loading());
    }

    #[tokio::test]
    async fn test_failed_convert_still_clears_loading() {
        let mut console = memory_console(Duration::ZERO).await;
        let req = ConversionRequest {
            stage: OpportunityStage::Prospecting,
            amount: None,
        };
        assert!(console.convert_to_opportunity("nope", &req).await.is_err());
        assert!(!console.store().loading());
        assert!(console.store().error().is_some());
    }

    #[tokio::test]
    async fn test_import_rejects_non_csv() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("leads.txt");
        std::fs::write(&path, "ID,Name\n").unwrap();

        let mut console = memory_console(Duration::ZERO).await;
        let err = console.import_file(&path).await.unwrap_err();
        assert!(err.to_string().contains(NOT_CSV_MESSAGE));
        assert_eq!(console.store().error(), Some(NOT_CSV_MESSAGE));
    }

    #[tokio::test]
    async fn test_export_then_import_round_trip_reports_duplicates() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out/leads.csv");

        let mut console = memory_console(Duration::ZERO).await;
        let total = console.store().all_leads().len();
        assert_eq!(console.export_file(&path).unwrap(), total);

        let err = console.import_file(&path).await.unwrap_err();
        let store_err = err.downcast_ref::<StoreError>().unwrap();
        assert_eq!(store_err, &StoreError::AllDuplicates(total));
    }
}
