//! Lead retrieval by ID (`leads show <id>`).

use anyhow::{bail, Result};

use leads_console_core::Lead;

use crate::config::Config;
use crate::console::LeadConsole;

/// Look up a lead, or the lead an opportunity was converted from.
pub async fn get_lead(config: &Config, id: &str) -> Result<Lead> {
    let console = LeadConsole::open(config).await?;
    let lead = console.store().lead(id).cloned();
    let converted = console
        .store()
        .opportunities()
        .iter()
        .find(|o| o.lead_id == id)
        .map(|o| o.id.clone());
    console.close().await;

    match (lead, converted) {
        (Some(lead), _) => Ok(lead),
        (None, Some(opp_id)) => bail!(
            "lead {} was converted to opportunity {}; use `leads revert {}` to restore it",
            id,
            opp_id,
            opp_id
        ),
        (None, None) => bail!("lead not found: {}", id),
    }
}

/// CLI entry point for `leads show <id>`.
pub async fn run_show(config: &Config, id: &str, json: bool) -> Result<()> {
    let lead = get_lead(config, id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&lead)?);
        return Ok(());
    }

    println!("--- Lead ---");
    println!("id:       {}", lead.id);
    println!("name:     {}", lead.name);
    println!("company:  {}", lead.company);
    println!("email:    {}", lead.email);
    println!("source:   {} ({})", lead.source.label(), lead.source);
    println!("score:    {}", lead.score);
    println!("status:   {} ({})", lead.status.label(), lead.status);

    Ok(())
}
