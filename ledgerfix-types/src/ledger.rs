use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One transaction row of a bank-statement ledger.
///
/// `balance` is the account balance immediately after this row is applied. The flow fields are
/// signed because the amount parser is lenient; the row validator rejects negative flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Record number in the input table, counting the header as 1.
    pub line: u64,

    /// Normalized calendar date, `None` when the date text could not be parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Date as it appeared in the input.
    pub date_text: String,

    pub description: String,
    pub withdrawal: i64,
    pub deposit: i64,
    pub balance: i64,

    /// Set when a single-digit repair replaced one of the flow fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<CorrectionNote>,

    #[serde(skip)]
    pub source: SourceCells,
}

/// Amount cells as they appeared in the input.
///
/// Output writes these back verbatim; a `None` cell is rendered from the parsed value instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceCells {
    pub withdrawal: Option<String>,
    pub deposit: Option<String>,
    pub balance: Option<String>,
}

/// Ordered transaction rows. Order is significant.
pub type Ledger = Vec<LedgerRow>;

impl LedgerRow {
    /// The single nonzero flow, positive for deposits and negative for withdrawals.
    ///
    /// Rows that violate mutual exclusivity report `deposit - withdrawal`.
    pub fn signed_amount(&self) -> i64 {
        self.deposit.saturating_sub(self.withdrawal)
    }

    /// Unsigned flow: the deposit when one was recorded, otherwise the withdrawal.
    pub fn flow_magnitude(&self) -> i64 {
        if self.deposit > 0 {
            self.deposit
        } else {
            self.withdrawal
        }
    }

    pub fn flow(&self, field: FlowField) -> i64 {
        match field {
            FlowField::Withdrawal => self.withdrawal,
            FlowField::Deposit => self.deposit,
        }
    }

    /// Replace one flow value. The input cell is dropped so output renders the new value.
    pub fn set_flow(&mut self, field: FlowField, value: i64) {
        match field {
            FlowField::Withdrawal => {
                self.withdrawal = value;
                self.source.withdrawal = None;
            }
            FlowField::Deposit => {
                self.deposit = value;
                self.source.deposit = None;
            }
        }
    }
}

/// One of the two mutually exclusive per-row amount fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowField {
    Withdrawal,
    Deposit,
}

impl FlowField {
    pub fn as_str(self) -> &'static str {
        match self {
            FlowField::Withdrawal => "withdrawal",
            FlowField::Deposit => "deposit",
        }
    }
}

/// Record of a single-digit repair applied to one flow field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionNote {
    pub field: FlowField,
    pub from: i64,
    pub to: i64,
}

impl fmt::Display for CorrectionNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} corrected: {} -> {}", self.field.as_str(), self.from, self.to)
    }
}

/// Ground-truth row extracted independently of the ledger, used for positional comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub date: String,
    pub description: String,
    pub amount: i64,
}
