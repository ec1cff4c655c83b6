//! # CLI
//!
//! An operator client for the portfolio data layer. The only place that
//! knows about terminal I/O, exit codes and output formatting.
//!
//! Running `portico` with no arguments lists the active projects.
//!
//! ## Offline behavior
//!
//! Read commands fall back to the local mirror when the remote store cannot
//! be reached and say so. Write commands fail instead. `social`, `mode` and
//! `categories` never touch the network.
//!
//! ## Module Structure
//!
//! - `setup`: argument parsing via clap, grouped help
//! - `commands`: context setup and per-command handlers
//! - `print`: tables, detail views and colored messages
//! - `logging`: tracing subscriber for `-v`

mod commands;
mod logging;
mod print;
pub mod setup;

pub use commands::run;
