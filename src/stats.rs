//! Collection overview (`leads stats`).
//!
//! Counts leads by status and source, and opportunities by stage, with
//! the pipeline value of opportunities that carry an amount.

use anyhow::Result;
use std::collections::BTreeMap;

use leads_console_core::{LeadSource, LeadStatus, OpportunityStage};

use crate::config::Config;
use crate::console::LeadConsole;

/// Aggregated counts over the whole (unfiltered) collections.
#[derive(Debug, Default, PartialEq)]
pub struct Stats {
    pub lead_count: usize,
    pub opportunity_count: usize,
    pub by_status: Vec<(LeadStatus, usize)>,
    pub by_source: Vec<(LeadSource, usize)>,
    pub by_stage: Vec<(OpportunityStage, usize)>,
    pub average_score: Option<f64>,
    pub pipeline_value: f64,
}

pub fn collect(console: &LeadConsole) -> Stats {
    let leads = console.store().all_leads();
    let opportunities = console.store().opportunities();

    let by_status = LeadStatus::ALL
        .into_iter()
        .map(|s| (s, leads.iter().filter(|l| l.status == s).count()))
        .filter(|(_, n)| *n > 0)
        .collect();

    let mut sources: BTreeMap<&'static str, (LeadSource, usize)> = BTreeMap::new();
    for lead in leads {
        sources.entry(lead.source.as_str()).or_insert((lead.source, 0)).1 += 1;
    }

    let by_stage = OpportunityStage::ALL
        .into_iter()
        .map(|s| (s, opportunities.iter().filter(|o| o.stage == s).count()))
        .filter(|(_, n)| *n > 0)
        .collect();

    let average_score = if leads.is_empty() {
        None
    } else {
        Some(leads.iter().map(|l| l.score as f64).sum::<f64>() / leads.len() as f64)
    };

    Stats {
        lead_count: leads.len(),
        opportunity_count: opportunities.len(),
        by_status,
        by_source: sources.into_values().collect(),
        by_stage,
        average_score,
        pipeline_value: opportunities.iter().filter_map(|o| o.amount).sum(),
    }
}

pub async fn run_stats(config: &Config) -> Result<()> {
    let console = LeadConsole::open(config).await?;
    let stats = collect(&console);
    console.close().await;

    println!("Leads Console — Stats");
    println!("=====================");
    println!();
    println!("  Database:       {}", config.db.path.display());
    println!();
    println!("  Leads:          {}", stats.lead_count);
    println!("  Opportunities:  {}", stats.opportunity_count);
    if let Some(avg) = stats.average_score {
        println!("  Average score:  {:.1}", avg);
    }
    println!("  Pipeline value: {:.2}", stats.pipeline_value);

    if !stats.by_status.is_empty() {
        println!();
        println!("  By status:");
        for (status, n) in &stats.by_status {
            println!("    {:<16} {:>5}", status.label(), n);
        }
    }
    if !stats.by_source.is_empty() {
        println!();
        println!("  By source:");
        for (source, n) in &stats.by_source {
            println!("    {:<16} {:>5}", source.label(), n);
        }
    }
    if !stats.by_stage.is_empty() {
        println!();
        println!("  By stage:");
        for (stage, n) in &stats.by_stage {
            println!("    {:<16} {:>5}", stage.label(), n);
        }
    }
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use leads_console_core::persist::memory::MemoryKeyValueStore;
    use leads_console_core::persist::PersistenceAdapter;
    use leads_console_core::{ConversionRequest, LeadStore};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_collect_counts_everything() {
        let mut store = LeadStore::new(PersistenceAdapter::new(Arc::new(
            MemoryKeyValueStore::new(),
        )));
        store.load().await;
        let total = store.all_leads().len();
        let mut console = crate::console::LeadConsole::new(store, Duration::ZERO);

        let id = console.store().all_leads()[0].id.clone();
        console
            .convert_to_opportunity(
                &id,
                &ConversionRequest {
                    stage: OpportunityStage::Negotiation,
                    amount: Some(2500.0),
                },
            )
            .await
            .unwrap();

        let stats = collect(&console);
        assert_eq!(stats.lead_count, total - 1);
        assert_eq!(stats.opportunity_count, 1);
        assert_eq!(stats.by_stage, vec![(OpportunityStage::Negotiation, 1)]);
        assert_eq!(
            stats.by_status.iter().map(|(_, n)| n).sum::<usize>(),
            total - 1
        );
        assert!((stats.pipeline_value - 2500.0).abs() < 1e-9);
    }
}
