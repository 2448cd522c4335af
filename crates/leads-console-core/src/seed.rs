//! Bundled default lead dataset.
//!
//! Loaded when no lead collection has been persisted yet. The JSON is
//! compiled into the binary and only ever read.

use anyhow::{Context, Result};

use crate::models::Lead;

const SEED_JSON: &str = include_str!("../data/leads.json");

/// Decode the bundled leads.
pub fn default_leads() -> Result<Vec<Lead>> {
    serde_json::from_str(SEED_JSON).context("Failed to parse bundled lead dataset")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_email;
    use std::collections::HashSet;

    #[test]
    fn test_seed_is_valid() {
        let leads = default_leads().unwrap();
        assert!(!leads.is_empty());

        let ids: HashSet<&str> = leads.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids.len(), leads.len(), "seed ids must be unique");

        for lead in &leads {
            assert!(validate_email(&lead.email), "bad seed email: {}", lead.email);
            assert!(lead.score <= 100);
        }
    }
}
