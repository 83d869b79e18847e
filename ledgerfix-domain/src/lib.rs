//! Domain logic: decide whether a ledger is consistent and in the right order.
//!
//! This crate owns *what* is wrong with a ledger and which repairs are allowed. It does not own
//! reading inputs or sequencing the run; that's `ledgerfix-core`.

mod corrector;
mod policy;
mod row;
mod sequence;

pub use corrector::{Correction, attempt_fix};
pub use policy::{BalanceEffect, BalancePolicy, BalanceRule};
pub use row::{RowCheck, Violation, check_row_date, expected_balance, validate_row};
pub use sequence::{AmountConvention, check_against_reference, check_chain};
