//! Lead and opportunity listings (`leads list`, `leads opportunities`).
//!
//! `list` starts from the saved filters and applies any command-line
//! overrides for this invocation only; use `leads filters set` to change
//! the saved preferences.

use anyhow::Result;

use leads_console_core::view::derive_view;
use leads_console_core::{Lead, LeadFilters, LeadSource, LeadStatus, Opportunity, SortBy, SortOrder};

use crate::config::Config;
use crate::console::LeadConsole;

/// Per-invocation overrides for the saved filters.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub search: Option<String>,
    pub statuses: Vec<LeadStatus>,
    pub sources: Vec<LeadSource>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub json: bool,
}

impl ListOptions {
    /// Layer the overrides on top of `saved`.
    pub fn apply(&self, saved: &LeadFilters) -> LeadFilters {
        let mut filters = saved.clone();
        if let Some(ref search) = self.search {
            filters.search = search.clone();
        }
        if !self.statuses.is_empty() {
            filters.statuses = self.statuses.clone();
        }
        if !self.sources.is_empty() {
            filters.sources = self.sources.clone();
        }
        if let Some(sort_by) = self.sort_by {
            filters.sort_by = sort_by;
        }
        if let Some(sort_order) = self.sort_order {
            filters.sort_order = sort_order;
        }
        filters
    }
}

pub async fn run_list(config: &Config, options: &ListOptions) -> Result<()> {
    let console = LeadConsole::open(config).await?;
    let filters = options.apply(console.store().filters());
    let view = derive_view(console.store().all_leads(), &filters);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_leads(&view, &filters, console.store().all_leads().len());
    }

    console.close().await;
    Ok(())
}

pub async fn run_opportunities(config: &Config, json: bool) -> Result<()> {
    let console = LeadConsole::open(config).await?;
    let opportunities = console.store().opportunities();

    if json {
        println!("{}", serde_json::to_string_pretty(opportunities)?);
    } else {
        print_opportunities(opportunities);
    }

    console.close().await;
    Ok(())
}

fn print_leads(view: &[Lead], filters: &LeadFilters, total: usize) {
    if view.is_empty() {
        println!("No leads match the current filters.");
        return;
    }

    println!(
        "{:<16} {:<22} {:<22} {:<34} {:<15} {:>5}  {}",
        "ID", "NAME", "COMPANY", "EMAIL", "SOURCE", "SCORE", "STATUS"
    );
    println!("{}", "-".repeat(128));
    for lead in view {
        println!(
            "{:<16} {:<22} {:<22} {:<34} {:<15} {:>5}  {}",
            truncate(&lead.id, 16),
            truncate(&lead.name, 22),
            truncate(&lead.company, 22),
            truncate(&lead.email, 34),
            lead.source.label(),
            lead.score,
            lead.status.label()
        );
    }
    println!();

    let mut summary = format!(
        "{} of {} leads, {}",
        view.len(),
        total,
        filters.sort_description()
    );
    if filters.has_active_filters() {
        summary.push_str(&format!(
            " ({} filter{} active)",
            filters.active_filter_count(),
            if filters.active_filter_count() == 1 { "" } else { "s" }
        ));
    }
    println!("{}", summary);
}

fn print_opportunities(opportunities: &[Opportunity]) {
    if opportunities.is_empty() {
        println!("No opportunities yet.");
        return;
    }

    println!(
        "{:<16} {:<36} {:<22} {:<14} {:>12}  {}",
        "ID", "NAME", "ACCOUNT", "STAGE", "AMOUNT", "LEAD"
    );
    println!("{}", "-".repeat(116));
    for opp in opportunities {
        let amount = opp
            .amount
            .map(|a| format!("{:.2}", a))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<16} {:<36} {:<22} {:<14} {:>12}  {}",
            truncate(&opp.id, 16),
            truncate(&opp.name, 36),
            truncate(&opp.account_name, 22),
            opp.stage.label(),
            amount,
            opp.lead_id
        );
    }
    println!();
    println!("{} opportunities", opportunities.len());
}

/// Cut `s` to at most `max` characters, marking the cut with `…`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_overrides_replace_saved_fields() {
        let saved = LeadFilters {
            search: "acme".to_string(),
            statuses: vec![LeadStatus::New],
            ..Default::default()
        };
        let options = ListOptions {
            statuses: vec![LeadStatus::Won, LeadStatus::Lost],
            sort_by: Some(SortBy::Name),
            ..Default::default()
        };
        let filters = options.apply(&saved);
        assert_eq!(filters.search, "acme");
        assert_eq!(filters.statuses, vec![LeadStatus::Won, LeadStatus::Lost]);
        assert_eq!(filters.sort_by, SortBy::Name);
        assert_eq!(filters.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Felipe Araújo", 8), "Felipe …");
    }
}
