//! # Leads Console Core
//!
//! Shared, runtime-agnostic logic for Leads Console: data models, validation, the
//! CSV codec, the derived lead view, the persistence port, and the
//! lead/opportunity store.
//!
//! This crate contains no tokio, sqlx, filesystem I/O, or other
//! native-only dependencies. Storage backends plug in through
//! [`persist::KeyValueStore`].

pub mod csv;
pub mod error;
pub mod models;
pub mod persist;
pub mod seed;
pub mod store;
pub mod validation;
pub mod view;

pub use error::{CsvError, StoreError};
pub use models::{
    ConversionRequest, Lead, LeadFilters, LeadSource, LeadStatus, LeadUpdate, Opportunity,
    OpportunityStage, SortBy, SortOrder,
};
pub use store::{ImportSummary, LeadStore, StoreSnapshot};
