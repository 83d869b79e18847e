//! Embeddable core library for ledgerfix.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for linking into another host
//! process.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`InputSource`](ports::InputSource): read the ledger table or the reference ordering
//! - [`WritePort`](ports::WritePort): write the corrected ledger and the JSON report
//!
//! The [`adapters`] module provides default filesystem-backed implementations.
//!
//! # Entry points
//!
//! - [`run_check`](pipeline::run_check): validate a ledger and build the reports
//! - [`write_check_artifacts`](pipeline::write_check_artifacts): persist the optional outputs

pub mod adapters;
pub mod orchestrator;
pub mod pipeline;
pub mod ports;
pub mod settings;

pub use orchestrator::Orchestrator;
pub use pipeline::{CheckOutcome, ToolError, run_check, write_check_artifacts};
pub use settings::CheckSettings;

// Re-export the configurable domain types so callers don't need ledgerfix-domain directly.
pub use ledgerfix_domain::{AmountConvention, BalanceEffect, BalancePolicy, BalanceRule};
pub use ledgerfix_parse::ColumnMap;
