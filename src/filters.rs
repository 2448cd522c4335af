//! Saved filter preferences (`leads filters show|set|clear`).

use anyhow::Result;

use leads_console_core::{LeadFilters, LeadSource, LeadStatus};

use crate::config::Config;
use crate::console::LeadConsole;
use crate::list::ListOptions;

/// How `filters set` treats the existing preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterEdit {
    /// Replace only the fields given on the command line.
    Merge,
    /// Start from the defaults.
    Replace,
}

pub async fn run_show(config: &Config, json: bool) -> Result<()> {
    let console = LeadConsole::open(config).await?;
    let filters = console.store().filters().clone();
    console.close().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&filters)?);
    } else {
        print_filters(&filters);
    }
    Ok(())
}

pub async fn run_set(config: &Config, options: &ListOptions, edit: FilterEdit) -> Result<()> {
    let mut console = LeadConsole::open(config).await?;
    let base = match edit {
        FilterEdit::Merge => console.store().filters().clone(),
        FilterEdit::Replace => LeadFilters::default(),
    };
    let filters = options.apply(&base);
    console.store_mut().set_filters(filters.clone()).await;
    console.close().await;

    print_filters(&filters);
    Ok(())
}

pub async fn run_clear(config: &Config) -> Result<()> {
    let mut console = LeadConsole::open(config).await?;
    console.store_mut().clear_filters().await;
    console.close().await;

    println!("Filters cleared.");
    Ok(())
}

fn print_filters(filters: &LeadFilters) {
    let join = |items: Vec<&str>| {
        if items.is_empty() {
            "(any)".to_string()
        } else {
            items.join(", ")
        }
    };

    println!(
        "search:   {}",
        if filters.search.is_empty() {
            "(none)"
        } else {
            filters.search.as_str()
        }
    );
    println!(
        "statuses: {}",
        join(filters.statuses.iter().map(|s| s.as_str()).collect())
    );
    println!(
        "sources:  {}",
        join(filters.sources.iter().map(|s| s.as_str()).collect())
    );
    println!("sort:     {}", filters.sort_description());
}

/// A single filter chip toggled from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chip {
    Status(LeadStatus),
    Source(LeadSource),
}

/// Add or remove one status/source chip on the saved filters.
pub async fn run_toggle(config: &Config, chip: Chip, add: bool) -> Result<()> {
    let mut console = LeadConsole::open(config).await?;
    let store = console.store_mut();
    match (chip, add) {
        (Chip::Status(status), true) => store.add_status_filter(status).await,
        (Chip::Status(status), false) => store.remove_status_filter(status).await,
        (Chip::Source(source), true) => store.add_source_filter(source).await,
        (Chip::Source(source), false) => store.remove_source_filter(source).await,
    }
    let filters = console.store().filters().clone();
    console.close().await;

    print_filters(&filters);
    Ok(())
}
