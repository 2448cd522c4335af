//! Lead edits and the lead ↔ opportunity transitions
//! (`leads update`, `leads convert`, `leads revert`).

use anyhow::{bail, Result};

use leads_console_core::{ConversionRequest, LeadUpdate, OpportunityStage};

use crate::config::Config;
use crate::console::LeadConsole;

pub async fn run_update(config: &Config, id: &str, update: LeadUpdate) -> Result<()> {
    if update.is_empty() {
        bail!("nothing to update: pass at least one field (e.g. --status won)");
    }

    let mut console = LeadConsole::open(config).await?;
    let result = console.update_lead(id, &update).await;
    console.close().await;

    match result? {
        Some(lead) => println!(
            "Updated lead {} ({}): status={}, email={}, score={}",
            lead.id, lead.name, lead.status, lead.email, lead.score
        ),
        None => println!("No lead with id {}; nothing changed.", id),
    }
    Ok(())
}

pub async fn run_convert(
    config: &Config,
    lead_id: &str,
    stage: OpportunityStage,
    amount: Option<f64>,
) -> Result<()> {
    let mut console = LeadConsole::open(config).await?;
    let request = ConversionRequest { stage, amount };
    let result = console.convert_to_opportunity(lead_id, &request).await;
    console.close().await;

    let opp = result?;
    println!(
        "Converted lead {} to opportunity {} ({}, {})",
        opp.lead_id,
        opp.id,
        opp.name,
        opp.stage.label()
    );
    Ok(())
}

pub async fn run_revert(config: &Config, opportunity_id: &str) -> Result<()> {
    let mut console = LeadConsole::open(config).await?;
    let result = console.revert_to_lead(opportunity_id).await;
    console.close().await;

    let lead = result?;
    println!(
        "Reverted opportunity {} to lead {} ({} <{}>)",
        opportunity_id, lead.id, lead.name, lead.email
    );
    Ok(())
}
