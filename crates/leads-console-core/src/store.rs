//! The lead/opportunity store.
//!
//! [`LeadStore`] owns the canonical lead and opportunity collections, the
//! active [`LeadFilters`], the current selection, a loading flag and an
//! error slot. Every mutation is applied in memory first, then written
//! through the [`PersistenceAdapter`], then published as a
//! [`StoreSnapshot`] to subscribers.
//!
//! # Invariant
//!
//! The set of lead ids and the set of opportunity `lead_id`s are disjoint.
//! Conversion removes the lead as it adds the opportunity, revert does the
//! inverse, and [`LeadStore::load`] drops any persisted lead whose id is
//! already an opportunity's `lead_id`.
//!
//! # Failures
//!
//! An operation that returns [`StoreError`] has applied nothing; its
//! message is placed in the error slot until [`LeadStore::clear_error`].

use std::collections::HashSet;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::Serialize;

use crate::csv::{self, RejectedRow};
use crate::error::StoreError;
use crate::models::{
    ConversionRequest, Lead, LeadFilters, LeadSource, LeadStatus, LeadUpdate, Opportunity,
};
use crate::persist::{PersistenceAdapter, StorageKey};
use crate::seed;
use crate::validation::generate_id;
use crate::view::ViewCache;

/// Score given to a lead rebuilt from an opportunity.
pub const REVERTED_LEAD_SCORE: u8 = 75;

const LOAD_ERROR_MESSAGE: &str = "Error loading lead data";

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is a valid regex"));

/// Everything a front end needs to render the console.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSnapshot {
    /// The derived (filtered and sorted) lead view.
    pub leads: Vec<Lead>,
    pub opportunities: Vec<Opportunity>,
    pub selected: Option<Lead>,
    pub filters: LeadFilters,
    pub loading: bool,
    pub error: Option<String>,
}

/// Outcome of a successful [`LeadStore::import_leads`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported_count: usize,
    /// Rows skipped because their email already belongs to a lead.
    pub duplicate_count: usize,
    /// Rows the CSV parser refused.
    pub rejected: Vec<RejectedRow>,
}

/// Observable state container for leads and opportunities.
pub struct LeadStore {
    persistence: PersistenceAdapter,
    leads: Vec<Lead>,
    opportunities: Vec<Opportunity>,
    selected: Option<Lead>,
    filters: LeadFilters,
    loading: bool,
    error: Option<String>,
    initialized: bool,
    view: ViewCache,
    subscribers: Vec<Sender<StoreSnapshot>>,
}

impl LeadStore {
    /// Create an empty store. Call [`load`](Self::load) before use.
    pub fn new(persistence: PersistenceAdapter) -> Self {
        Self {
            persistence,
            leads: Vec::new(),
            opportunities: Vec::new(),
            selected: None,
            filters: LeadFilters::default(),
            loading: true,
            error: None,
            initialized: false,
            view: ViewCache::new(),
            subscribers: Vec::new(),
        }
    }

    // ── Loading ─────────────────────────────────────────────────────

    /// Load persisted state, seeding leads from the bundled dataset when
    /// none were saved.
    pub async fn load(&mut self) {
        self.load_with_seed(seed::default_leads).await
    }

    /// [`load`](Self::load) with a custom seed source.
    ///
    /// If the seed is needed and fails, the store starts empty and the
    /// error slot reports the failure.
    pub async fn load_with_seed<F>(&mut self, seed: F)
    where
        F: FnOnce() -> Result<Vec<Lead>>,
    {
        self.loading = true;
        self.publish();

        let opportunities = self
            .persistence
            .load_opportunities()
            .await
            .unwrap_or_default();

        let leads = match self.persistence.load_leads().await {
            Some(saved) => Ok(saved),
            None => seed(),
        };

        match leads {
            Ok(leads) => {
                let converted: HashSet<&str> =
                    opportunities.iter().map(|o| o.lead_id.as_str()).collect();
                let before = leads.len();
                let leads: Vec<Lead> = leads
                    .into_iter()
                    .filter(|l| !converted.contains(l.id.as_str()))
                    .collect();
                if leads.len() != before {
                    tracing::info!(
                        dropped = before - leads.len(),
                        "dropped leads that were already converted"
                    );
                }
                self.leads = leads;
                self.opportunities = opportunities;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("error loading lead data: {:#}", e);
                self.leads = Vec::new();
                self.opportunities = Vec::new();
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }

        if let Some(filters) = self.persistence.load_filters().await {
            self.filters = filters;
        }

        self.selected = None;
        self.loading = false;
        self.initialized = true;
        tracing::info!(
            leads = self.leads.len(),
            opportunities = self.opportunities.len(),
            "store loaded"
        );

        self.persist_collections().await;
        self.publish();
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// The derived lead view for the current filters.
    pub fn filtered_leads(&mut self) -> &[Lead] {
        self.view.get(&self.leads, &self.filters)
    }

    /// Every lead, unfiltered, in collection order.
    pub fn all_leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn lead(&self, id: &str) -> Option<&Lead> {
        self.leads.iter().find(|l| l.id == id)
    }

    pub fn opportunities(&self) -> &[Opportunity] {
        &self.opportunities
    }

    pub fn opportunity(&self, id: &str) -> Option<&Opportunity> {
        self.opportunities.iter().find(|o| o.id == id)
    }

    pub fn selected(&self) -> Option<&Lead> {
        self.selected.as_ref()
    }

    pub fn filters(&self) -> &LeadFilters {
        &self.filters
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn snapshot(&mut self) -> StoreSnapshot {
        StoreSnapshot {
            leads: self.filtered_leads().to_vec(),
            opportunities: self.opportunities.clone(),
            selected: self.selected.clone(),
            filters: self.filters.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }

    /// Receive a snapshot after every state change.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<StoreSnapshot> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    // ── Setters ─────────────────────────────────────────────────────

    /// Select a lead by id, or clear the selection with `None`.
    ///
    /// Returns `false` (and clears the selection) when the id is unknown.
    pub fn select_lead(&mut self, id: Option<&str>) -> bool {
        self.selected = id.and_then(|id| self.lead(id).cloned());
        let found = id.is_none() || self.selected.is_some();
        if !found {
            tracing::debug!(id = id.unwrap_or_default(), "select: no such lead");
        }
        self.publish();
        found
    }

    pub async fn set_filters(&mut self, filters: LeadFilters) {
        self.filters = filters;
        self.persistence.save_filters(&self.filters).await;
        self.publish();
    }

    pub async fn add_status_filter(&mut self, status: LeadStatus) {
        let mut filters = self.filters.clone();
        filters.add_status(status);
        self.set_filters(filters).await;
    }

    pub async fn remove_status_filter(&mut self, status: LeadStatus) {
        let mut filters = self.filters.clone();
        filters.remove_status(status);
        self.set_filters(filters).await;
    }

    pub async fn add_source_filter(&mut self, source: LeadSource) {
        let mut filters = self.filters.clone();
        filters.add_source(source);
        self.set_filters(filters).await;
    }

    pub async fn remove_source_filter(&mut self, source: LeadSource) {
        let mut filters = self.filters.clone();
        filters.remove_source(source);
        self.set_filters(filters).await;
    }

    /// Reset filters to their defaults and forget the saved preferences.
    pub async fn clear_filters(&mut self) {
        self.filters = LeadFilters::default();
        self.persistence.clear(StorageKey::Filters).await;
        self.publish();
    }

    pub fn set_error(&mut self, message: Option<String>) {
        self.error = message;
        self.publish();
    }

    pub fn clear_error(&mut self) {
        self.set_error(None);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.publish();
    }

    // ── Operations ──────────────────────────────────────────────────

    /// Merge `update` into the lead with `id`.
    ///
    /// An unknown id is ignored and yields `Ok(None)`. An invalid email or
    /// score rejects the whole update.
    pub async fn update_lead(
        &mut self,
        id: &str,
        update: &LeadUpdate,
    ) -> Result<Option<Lead>, StoreError> {
        if let Err(e) = update.validate() {
            return self.fail(e);
        }

        let Some(lead) = self.leads.iter_mut().find(|l| l.id == id) else {
            tracing::debug!(id, "update: no such lead, ignoring");
            return Ok(None);
        };
        update.apply_to(lead);
        let updated = lead.clone();

        if let Some(ref mut selected) = self.selected {
            if selected.id == id {
                update.apply_to(selected);
            }
        }

        self.error = None;
        self.persist_collections().await;
        self.publish();
        Ok(Some(updated))
    }

    /// Turn the lead with `lead_id` into an opportunity.
    ///
    /// The lead is removed and the opportunity appended before anything is
    /// persisted or published.
    pub async fn convert_to_opportunity(
        &mut self,
        lead_id: &str,
        request: &ConversionRequest,
    ) -> Result<Opportunity, StoreError> {
        let Some(pos) = self.leads.iter().position(|l| l.id == lead_id) else {
            return self.fail(StoreError::NoLead);
        };
        if let Some(amount) = request.amount {
            if !amount.is_finite() || amount < 0.0 {
                return self.fail(StoreError::InvalidAmount(amount));
            }
        }

        let lead = self.leads.remove(pos);
        let opportunity = Opportunity {
            id: generate_id(),
            name: format!("{} - {}", lead.name, lead.company),
            stage: request.stage,
            amount: request.amount,
            account_name: lead.company.clone(),
            lead_id: lead.id.clone(),
        };
        self.opportunities.push(opportunity.clone());

        if self.selected.as_ref().is_some_and(|s| s.id == lead.id) {
            self.selected = None;
        }

        tracing::debug!(lead = %lead.id, opportunity = %opportunity.id, "converted lead");
        self.error = None;
        self.persist_collections().await;
        self.publish();
        Ok(opportunity)
    }

    /// Rebuild a lead from the opportunity with `opportunity_id` and remove
    /// the opportunity.
    ///
    /// This is lossy: email, source, score and status are fabricated, not
    /// restored.
    pub async fn revert_to_lead(&mut self, opportunity_id: &str) -> Result<Lead, StoreError> {
        let Some(pos) = self
            .opportunities
            .iter()
            .position(|o| o.id == opportunity_id)
        else {
            return self.fail(StoreError::OpportunityNotFound(opportunity_id.to_string()));
        };

        let opportunity = self.opportunities.remove(pos);
        let mut lead = lead_from_opportunity(&opportunity);
        if self.lead(&lead.id).is_some() {
            let fresh = generate_id();
            tracing::debug!(old = %lead.id, new = %fresh, "reverted lead id already in use");
            lead.id = fresh;
        }
        self.leads.push(lead.clone());

        self.error = None;
        self.persist_collections().await;
        self.publish();
        Ok(lead)
    }

    /// Import leads from CSV text.
    ///
    /// Rows whose email (case-insensitive) already belongs to a lead are
    /// counted as duplicates and skipped. Imported rows whose id is already
    /// taken get a fresh one.
    pub async fn import_leads(&mut self, text: &str) -> Result<ImportSummary, StoreError> {
        let parsed = match csv::parse_leads(text) {
            Ok(parsed) => parsed,
            Err(e) => return self.fail(e.into()),
        };
        if parsed.leads.is_empty() {
            return self.fail(StoreError::NoValidLeads);
        }

        let existing_emails: HashSet<String> =
            self.leads.iter().map(|l| l.email.to_lowercase()).collect();
        let (novel, duplicates): (Vec<Lead>, Vec<Lead>) = parsed
            .leads
            .into_iter()
            .partition(|l| !existing_emails.contains(&l.email.to_lowercase()));

        if novel.is_empty() {
            return self.fail(StoreError::AllDuplicates(duplicates.len()));
        }

        let mut taken: HashSet<String> = self
            .leads
            .iter()
            .map(|l| l.id.clone())
            .chain(self.opportunities.iter().map(|o| o.lead_id.clone()))
            .collect();
        let summary = ImportSummary {
            imported_count: novel.len(),
            duplicate_count: duplicates.len(),
            rejected: parsed.rejected,
        };
        for mut lead in novel {
            if taken.contains(&lead.id) {
                lead.id = generate_id();
            }
            taken.insert(lead.id.clone());
            self.leads.push(lead);
        }

        tracing::info!(
            imported = summary.imported_count,
            duplicates = summary.duplicate_count,
            rejected = summary.rejected.len(),
            "imported leads"
        );
        self.error = None;
        self.persist_collections().await;
        self.publish();
        Ok(summary)
    }

    /// CSV text of the current filtered and sorted view.
    pub fn export_leads(&mut self) -> String {
        csv::export_leads(self.filtered_leads())
    }

    // ── Internals ───────────────────────────────────────────────────

    fn fail<T>(&mut self, err: StoreError) -> Result<T, StoreError> {
        tracing::debug!("operation failed: {}", err);
        self.error = Some(err.to_string());
        self.publish();
        Err(err)
    }

    async fn persist_collections(&self) {
        if !self.initialized {
            return;
        }
        let converted: HashSet<&str> = self
            .opportunities
            .iter()
            .map(|o| o.lead_id.as_str())
            .collect();
        let leads: Vec<Lead> = self
            .leads
            .iter()
            .filter(|l| !converted.contains(l.id.as_str()))
            .cloned()
            .collect();
        self.persistence.save_leads(&leads).await;
        self.persistence
            .save_opportunities(&self.opportunities)
            .await;
    }

    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        self.subscribers
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

/// Build the lead a reverted opportunity turns back into.
///
/// The email's local part is the whole opportunity name, lowercased, with
/// each whitespace run replaced by `.`; the domain is the account name
/// without whitespace.
fn lead_from_opportunity(opportunity: &Opportunity) -> Lead {
    let name = match opportunity.name.split(" - ").next() {
        Some(first) if !first.is_empty() => first.to_string(),
        _ => opportunity.name.clone(),
    };
    let local = WHITESPACE_RUN
        .replace_all(&opportunity.name.to_lowercase(), ".")
        .into_owned();
    let domain = opportunity
        .account_name
        .split_whitespace()
        .collect::<String>()
        .to_lowercase();

    Lead {
        id: opportunity.lead_id.clone(),
        email: format!("{}@{}.com", local, domain),
        name,
        company: opportunity.account_name.clone(),
        source: LeadSource::ConvertedBack,
        score: REVERTED_LEAD_SCORE,
        status: LeadStatus::Qualified,
    }
}
