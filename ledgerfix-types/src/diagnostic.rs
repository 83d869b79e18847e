use serde::{Deserialize, Serialize};
use std::fmt;

/// How much a diagnostic counts against the run verdict.
///
/// Ordered so that `Fatal` compares greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Cosmetic or explanatory.
    Info,
    /// A correction was applied or a minor mismatch was found.
    Warning,
    /// An invariant was violated and not repaired; the run fails.
    Fatal,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which check produced a diagnostic. Selects the report section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Per-row field invariants and the balance recurrence.
    Basic,
    /// Positional comparison against a reference ordering.
    Reference,
    /// Recurrence walk used as an order heuristic.
    Chain,
}

/// Stable machine-readable identifier for each kind of finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    InvalidDate,
    DateRegression,
    NegativeAmount,
    DualDirection,
    BalanceMismatch,
    NegativeBalance,
    DigitCorrected,
    MissingColumn,
    RowCountMismatch,
    OrderMismatch,
    ReferenceLineSkipped,
    ReferenceUnreadable,
    ChainBreak,
}

impl DiagnosticCode {
    pub const ALL: &'static [DiagnosticCode] = &[
        DiagnosticCode::InvalidDate,
        DiagnosticCode::DateRegression,
        DiagnosticCode::NegativeAmount,
        DiagnosticCode::DualDirection,
        DiagnosticCode::BalanceMismatch,
        DiagnosticCode::NegativeBalance,
        DiagnosticCode::DigitCorrected,
        DiagnosticCode::MissingColumn,
        DiagnosticCode::RowCountMismatch,
        DiagnosticCode::OrderMismatch,
        DiagnosticCode::ReferenceLineSkipped,
        DiagnosticCode::ReferenceUnreadable,
        DiagnosticCode::ChainBreak,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::InvalidDate => "invalid_date",
            DiagnosticCode::DateRegression => "date_regression",
            DiagnosticCode::NegativeAmount => "negative_amount",
            DiagnosticCode::DualDirection => "dual_direction",
            DiagnosticCode::BalanceMismatch => "balance_mismatch",
            DiagnosticCode::NegativeBalance => "negative_balance",
            DiagnosticCode::DigitCorrected => "digit_corrected",
            DiagnosticCode::MissingColumn => "missing_column",
            DiagnosticCode::RowCountMismatch => "row_count_mismatch",
            DiagnosticCode::OrderMismatch => "order_mismatch",
            DiagnosticCode::ReferenceLineSkipped => "reference_line_skipped",
            DiagnosticCode::ReferenceUnreadable => "reference_unreadable",
            DiagnosticCode::ChainBreak => "chain_break",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Zero-based ledger position, absent for whole-ledger findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,

    /// Input record number (header is 1), absent for whole-ledger findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,

    pub severity: Severity,
    pub check: CheckKind,
    pub code: DiagnosticCode,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        check: CheckKind,
        code: DiagnosticCode,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row: None,
            line: None,
            severity,
            check,
            code,
            message: message.into(),
        }
    }

    /// Attach the ledger position and input record number.
    pub fn at(mut self, row: usize, line: u64) -> Self {
        self.row = Some(row);
        self.line = Some(line);
        self
    }

    /// Attach an input line without a ledger position (reference file lines).
    pub fn at_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}
