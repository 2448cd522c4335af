//! Error types for store operations and the CSV codec.

use thiserror::Error;

/// Whole-operation failures of the CSV parser.
///
/// Individual bad rows are not errors: they are skipped and reported in
/// [`ParsedLeads::rejected`](crate::csv::ParsedLeads::rejected).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsvError {
    #[error("CSV file must contain at least a header and one data row")]
    MissingRows,
}

/// User-visible failure of a store operation.
///
/// When an operation returns one of these, none of its in-memory effects
/// have been applied and the message is placed in the store's error slot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("no lead selected")]
    NoLead,
    #[error("opportunity not found: {0}")]
    OpportunityNotFound(String),
    #[error("invalid email: {0}")]
    InvalidEmail(String),
    #[error("invalid score: {0} (must be 0-100)")]
    InvalidScore(u8),
    #[error("invalid amount: {0} (must be a non-negative number)")]
    InvalidAmount(f64),
    #[error("no valid leads found in the file")]
    NoValidLeads,
    #[error("all {0} leads in the file already exist")]
    AllDuplicates(usize),
    #[error(transparent)]
    Csv(#[from] CsvError),
}
