//! Input parsing for ledgerfix.
//!
//! Everything here is tolerant: malformed amounts read as zero, unparseable dates are kept as text
//! and left for the validator to flag, and ragged table records are accepted. Only I/O failures are
//! surfaced as errors.

mod amount;
mod date;
mod reference;
mod table;

pub use amount::parse_amount;
pub use date::{DateParseError, ERA_TABLE, Era, parse_date};
pub use reference::{
    ReferenceFormat, ReferenceLoadError, ReferenceSet, SkippedLine, parse_reference,
};
pub use table::{ColumnMap, LedgerReadError, ParsedLedger, read_ledger, write_ledger};
