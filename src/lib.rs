//! # Leads Console
//!
//! A local lead and opportunity console. Leads are scored, filtered and
//! sorted; a lead can be converted to an opportunity and back; the lead
//! list can be imported from and exported to CSV. Everything is kept in a
//! small SQLite key-value table so state survives between runs.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  CLI (leads) │──▶│  LeadConsole │──▶│  LeadStore   │
//! │  commands    │   │  latency/io  │   │  (core)      │
//! └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                              │ KeyValueStore
//!                                              ▼
//!                                       ┌──────────────┐
//!                                       │ SQLite kv    │
//!                                       └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! leads init
//! leads list --status qualified --sort-by name --order asc
//! leads convert 3 --stage proposal --amount 12000
//! leads import contacts.csv
//! leads export --output pipeline.csv
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |
//! | [`sqlite_store`] | SQLite-backed key-value store |
//! | [`console`] | Store wrapper with latency and file I/O |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`list`] | `leads list`, `leads opportunities` |
//! | [`get`] | `leads show` |
//! | [`lifecycle`] | `leads update`, `leads convert`, `leads revert` |
//! | [`import`] | `leads import` |
//! | [`export`] | `leads export` |
//! | [`filters`] | `leads filters` |
//! | [`stats`] | `leads stats` |

pub mod config;
pub mod console;
pub mod db;
pub mod export;
pub mod filters;
pub mod get;
pub mod import;
pub mod lifecycle;
pub mod list;
pub mod logging;
pub mod migrate;
pub mod sqlite_store;
pub mod stats;
