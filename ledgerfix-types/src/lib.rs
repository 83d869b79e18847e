//! Shared DTOs for the ledgerfix workspace.
//!
//! # Design constraints
//! - Ledger rows are owned by exactly one validation run; nothing here is shared across runs.
//! - Severity is an explicit field on every diagnostic and is never derived from message text.
//! - The report types are serialized to disk; prefer adding optional fields over changing
//!   semantics.

pub mod diagnostic;
pub mod ledger;
pub mod report;
pub mod run;

/// Schema identifiers.
pub mod schema {
    pub const LEDGERFIX_REPORT_V1: &str = "ledgerfix.report.v1";
}
