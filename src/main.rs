//! # Leads Console CLI (`leads`)
//!
//! ## Usage
//!
//! ```bash
//! leads --config ./config/leads.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `leads init` | Create the SQLite database and schema |
//! | `leads list` | Show the filtered, sorted lead list |
//! | `leads show <id>` | Show one lead |
//! | `leads update <id>` | Edit status, email, or other fields |
//! | `leads convert <id>` | Convert a lead to an opportunity |
//! | `leads revert <opportunity-id>` | Turn an opportunity back into a lead |
//! | `leads opportunities` | List opportunities |
//! | `leads import <file.csv>` | Import leads, skipping duplicate emails |
//! | `leads export` | Write the filtered lead list as CSV |
//! | `leads filters show\|set\|clear\|add\|remove` | Manage saved filters |
//! | `leads stats` | Counts by status, source and stage |
//!
//! If the config file does not exist, defaults are used
//! (database at `./data/leads.sqlite`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use leads_console::filters::{Chip, FilterEdit};
use leads_console::list::ListOptions;
use leads_console::{
    config, export, filters, get, import, lifecycle, list, logging, migrate, stats,
};
use leads_console_core::{
    LeadSource, LeadStatus, LeadUpdate, OpportunityStage, SortBy, SortOrder,
};

/// Leads Console: score, filter, and convert sales leads from the terminal.
#[derive(Parser)]
#[command(name = "leads", version)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/leads.toml`. A missing file means defaults.
    #[arg(long, global = true, default_value = "./config/leads.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Filter and sort flags shared by `list` and `filters set`.
#[derive(clap::Args, Debug, Default)]
struct FilterArgs {
    /// Case-insensitive substring match on name or company.
    #[arg(long)]
    search: Option<String>,

    /// Keep leads with this status (repeatable; any match).
    #[arg(long = "status")]
    statuses: Vec<LeadStatus>,

    /// Keep leads from this source (repeatable; any match).
    #[arg(long = "source")]
    sources: Vec<LeadSource>,

    /// Sort field: `name`, `company`, or `score`.
    #[arg(long)]
    sort_by: Option<SortBy>,

    /// Sort direction: `asc` or `desc`.
    #[arg(long = "order")]
    sort_order: Option<SortOrder>,
}

impl FilterArgs {
    fn into_options(self, json: bool) -> ListOptions {
        ListOptions {
            search: self.search,
            statuses: self.statuses,
            sources: self.sources,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema. Safe to run repeatedly.
    Init,

    /// List leads using the saved filters plus any overrides given here.
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show one lead.
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Edit a lead. Only the given fields change.
    Update {
        id: String,

        #[arg(long)]
        status: Option<LeadStatus>,

        /// Must look like `local@domain.tld`.
        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        company: Option<String>,

        /// 0 to 100.
        #[arg(long)]
        score: Option<u8>,

        #[arg(long)]
        source: Option<LeadSource>,
    },

    /// Convert a lead into an opportunity. The lead is removed.
    Convert {
        id: String,

        /// Pipeline stage, e.g. `prospecting` or `closed-won`.
        #[arg(long, default_value = "prospecting")]
        stage: OpportunityStage,

        /// Deal amount. Omit when unknown.
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<f64>,
    },

    /// Turn an opportunity back into a qualified lead.
    Revert { opportunity_id: String },

    /// List opportunities.
    Opportunities {
        #[arg(long)]
        json: bool,
    },

    /// Import leads from a CSV file. Rows whose email already exists are skipped.
    Import { path: PathBuf },

    /// Export the filtered lead list as CSV.
    Export {
        /// Output file. Defaults to `[export].path` from config.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Print to stdout instead of writing a file.
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Manage the saved filter and sort preferences.
    Filters {
        #[command(subcommand)]
        action: FiltersAction,
    },

    /// Summary counts by status, source and stage.
    Stats,
}

#[derive(Subcommand)]
enum FiltersAction {
    /// Print the saved filters.
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Change the saved filters. Unset flags keep their saved values.
    Set {
        #[command(flatten)]
        filters: FilterArgs,

        /// Start from the defaults instead of the saved values.
        #[arg(long)]
        replace: bool,
    },
    /// Add one status or source chip.
    Add {
        #[arg(long, conflicts_with = "source", required_unless_present = "source")]
        status: Option<LeadStatus>,
        #[arg(long)]
        source: Option<LeadSource>,
    },
    /// Remove one status or source chip.
    Remove {
        #[arg(long, conflicts_with = "source", required_unless_present = "source")]
        status: Option<LeadStatus>,
        #[arg(long)]
        source: Option<LeadSource>,
    },
    /// Reset to defaults and delete the saved record.
    Clear,
}

fn chip(status: Option<LeadStatus>, source: Option<LeadSource>) -> anyhow::Result<Chip> {
    match (status, source) {
        (Some(status), None) => Ok(Chip::Status(status)),
        (None, Some(source)) => Ok(Chip::Source(source)),
        _ => anyhow::bail!("pass exactly one of --status or --source"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_or_default(&cli.config)?;
    logging::init(&cfg.logging.level);

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::List { filters: args, json } => {
            list::run_list(&cfg, &args.into_options(json)).await?;
        }
        Commands::Show { id, json } => {
            get::run_show(&cfg, &id, json).await?;
        }
        Commands::Update {
            id,
            status,
            email,
            name,
            company,
            score,
            source,
        } => {
            let update = LeadUpdate {
                name,
                company,
                email,
                source,
                score,
                status,
            };
            lifecycle::run_update(&cfg, &id, update).await?;
        }
        Commands::Convert { id, stage, amount } => {
            lifecycle::run_convert(&cfg, &id, stage, amount).await?;
        }
        Commands::Revert { opportunity_id } => {
            lifecycle::run_revert(&cfg, &opportunity_id).await?;
        }
        Commands::Opportunities { json } => {
            list::run_opportunities(&cfg, json).await?;
        }
        Commands::Import { path } => {
            import::run_import(&cfg, &path).await?;
        }
        Commands::Export { output, stdout } => {
            export::run_export(&cfg, output.as_deref(), stdout).await?;
        }
        Commands::Filters { action } => match action {
            FiltersAction::Show { json } => {
                filters::run_show(&cfg, json).await?;
            }
            FiltersAction::Set { filters: args, replace } => {
                let edit = if replace {
                    FilterEdit::Replace
                } else {
                    FilterEdit::Merge
                };
                filters::run_set(&cfg, &args.into_options(false), edit).await?;
            }
            FiltersAction::Add { status, source } => {
                filters::run_toggle(&cfg, chip(status, source)?, true).await?;
            }
            FiltersAction::Remove { status, source } => {
                filters::run_toggle(&cfg, chip(status, source)?, false).await?;
            }
            FiltersAction::Clear => {
                filters::run_clear(&cfg).await?;
            }
        },
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
