//! CSV import (`leads import <file.csv>`).

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::console::LeadConsole;

pub async fn run_import(config: &Config, path: &Path) -> Result<()> {
    let mut console = LeadConsole::open(config).await?;
    let result = console.import_file(path).await;
    console.close().await;

    let summary = result?;
    println!("imported: {}", summary.imported_count);
    println!("duplicates: {}", summary.duplicate_count);
    if !summary.rejected.is_empty() {
        println!("rejected: {}", summary.rejected.len());
        for row in &summary.rejected {
            println!("  line {}: {}", row.line, row.reason);
        }
    }
    Ok(())
}
