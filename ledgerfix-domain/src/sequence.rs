//! Ordering checks over a whole ledger.
//!
//! Two complementary checks:
//! - the chain walk replays the balance recurrence in stored order; a break hints that rows were
//!   transcribed out of order, but swaps of identical amounts are invisible to it;
//! - the reference comparison matches each position against an independently extracted ordering.

use crate::row::expected_balance;
use ledgerfix_types::diagnostic::{CheckKind, Diagnostic, DiagnosticCode, Severity};
use ledgerfix_types::ledger::{LedgerRow, ReferenceEntry};
use serde::{Deserialize, Serialize};

/// How reference amounts are expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountConvention {
    /// Deposits positive, withdrawals negative.
    #[default]
    Signed,
    /// The nonzero flow without a direction.
    Unsigned,
}

impl AmountConvention {
    pub fn amount_of(self, row: &LedgerRow) -> i64 {
        match self {
            AmountConvention::Signed => row.signed_amount(),
            AmountConvention::Unsigned => row.flow_magnitude(),
        }
    }
}

/// Replay the balance recurrence in stored order. One diagnostic per break, at `severity`.
pub fn check_chain(ledger: &[LedgerRow], severity: Severity) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for (i, pair) in ledger.windows(2).enumerate() {
        let (prev, row) = (&pair[0], &pair[1]);
        let expected = expected_balance(prev.balance, row.withdrawal, row.deposit);
        if expected == i128::from(row.balance) {
            continue;
        }
        out.push(
            Diagnostic::new(
                CheckKind::Chain,
                DiagnosticCode::ChainBreak,
                severity,
                format!(
                    "balance chain broken (possible order error): \
                     previous={}, deposit={}, withdrawal={}, expected={}, actual={}",
                    prev.balance, row.deposit, row.withdrawal, expected, row.balance
                ),
            )
            .at(i + 1, row.line),
        );
    }
    out
}

/// Compare the ledger position by position against a reference ordering.
///
/// Dates must match as written (after trimming); amounts follow `convention`. A length mismatch
/// is reported once and the common prefix is still compared. All field mismatches at one position
/// fold into a single diagnostic.
pub fn check_against_reference(
    ledger: &[LedgerRow],
    reference: &[ReferenceEntry],
    convention: AmountConvention,
) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    if ledger.len() != reference.len() {
        out.push(Diagnostic::new(
            CheckKind::Reference,
            DiagnosticCode::RowCountMismatch,
            Severity::Fatal,
            format!(
                "row count mismatch: ledger={}, reference={}",
                ledger.len(),
                reference.len()
            ),
        ));
    }

    for (i, (row, entry)) in ledger.iter().zip(reference).enumerate() {
        let mut mismatches = Vec::new();

        if row.date_text.trim() != entry.date.trim() {
            mismatches.push(format!(
                "date: ledger={}, reference={}",
                row.date_text.trim(),
                entry.date.trim()
            ));
        }

        let amount = convention.amount_of(row);
        if amount != entry.amount {
            mismatches.push(format!(
                "amount: ledger={}, reference={}",
                amount, entry.amount
            ));
        }

        if !descriptions_match(&row.description, &entry.description) {
            mismatches.push(format!(
                "description: ledger={}, reference={}",
                row.description.trim(),
                entry.description.trim()
            ));
        }

        if !mismatches.is_empty() {
            out.push(
                Diagnostic::new(
                    CheckKind::Reference,
                    DiagnosticCode::OrderMismatch,
                    Severity::Fatal,
                    format!("order mismatch: {}", mismatches.join("; ")),
                )
                .at(i, row.line),
            );
        }
    }

    out
}

/// OCR often truncates or pads descriptions, so containment either way counts as a match.
fn descriptions_match(ledger: &str, reference: &str) -> bool {
    let (a, b) = (ledger.trim(), reference.trim());
    a.contains(b) || b.contains(a)
}
