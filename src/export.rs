//! Export the filtered lead view as CSV (`leads export`).
//!
//! The saved filters and sort order apply, so the file matches what
//! `leads list` shows without overrides. Writes to `--output`, else to
//! `[export].path` (default `leads.csv`), or to stdout with `--stdout`.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::console::LeadConsole;

pub async fn run_export(config: &Config, output: Option<&Path>, stdout: bool) -> Result<()> {
    let mut console = LeadConsole::open(config).await?;

    let result = if stdout {
        println!("{}", console.store_mut().export_leads());
        Ok(())
    } else {
        let path = output.unwrap_or(config.export.path.as_path());
        console.export_file(path).map(|rows| {
            eprintln!("Exported {} leads to {}", rows, path.display());
        })
    };

    console.close().await;
    result
}
