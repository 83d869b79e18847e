//! Single-digit repair of OCR misreads in a flow field.
//!
//! A repair is accepted only when the replacement value has the same number of decimal digits as
//! the original and differs from it in exactly one position. Anything larger is left for a human.

use ledgerfix_types::ledger::{CorrectionNote, FlowField, LedgerRow};
use tracing::debug;

/// A repair that makes the balance recurrence hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correction {
    pub field: FlowField,
    pub from: i64,
    pub to: i64,

    /// Flow values after the repair.
    pub withdrawal: i64,
    pub deposit: i64,
}

impl Correction {
    pub fn note(&self) -> CorrectionNote {
        CorrectionNote {
            field: self.field,
            from: self.from,
            to: self.to,
        }
    }

    /// Human-readable summary, e.g. `withdrawal corrected: 300 -> 200`.
    pub fn description(&self) -> String {
        self.note().to_string()
    }

    /// Replace the flow field and stamp the correction note.
    pub fn apply(&self, row: &mut LedgerRow) {
        row.set_flow(self.field, self.to);
        row.correction = Some(self.note());
    }
}

/// Try to explain a balance mismatch as a single-digit misread of the one nonzero flow field.
///
/// Returns `None` when the recurrence already holds, when the row has no flow or both flows, or
/// when the only candidate repair is not a single-digit substitution.
pub fn attempt_fix(
    previous_balance: i64,
    withdrawal: i64,
    deposit: i64,
    observed_balance: i64,
) -> Option<Correction> {
    let expected = previous_balance.checked_add(deposit)?.checked_sub(withdrawal)?;
    let diff = observed_balance.checked_sub(expected)?;
    if diff == 0 {
        return None;
    }

    let (field, from, to) = match (withdrawal, deposit) {
        (0, 0) => return None,
        (0, d) => (FlowField::Deposit, d, d.checked_add(diff)?),
        (w, 0) => (FlowField::Withdrawal, w, w.checked_sub(diff)?),
        _ => return None,
    };

    if to < 0 || !is_single_digit_substitution(from, to) {
        debug!(field = field.as_str(), from, to, "rejected repair candidate");
        return None;
    }

    let (withdrawal, deposit) = match field {
        FlowField::Withdrawal => (to, deposit),
        FlowField::Deposit => (withdrawal, to),
    };
    Some(Correction {
        field,
        from,
        to,
        withdrawal,
        deposit,
    })
}

fn is_single_digit_substitution(from: i64, to: i64) -> bool {
    let (a, b) = (from.to_string(), to.to_string());
    a.len() == b.len() && a.bytes().zip(b.bytes()).filter(|(x, y)| x != y).count() == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerfix_types::ledger::SourceCells;
    use pretty_assertions::assert_eq;

    #[test]
    fn repairs_withdrawal_misread() {
        let fix = attempt_fix(5000, 300, 0, 4800).expect("repair");
        assert_eq!(
            fix,
            Correction {
                field: FlowField::Withdrawal,
                from: 300,
                to: 200,
                withdrawal: 200,
                deposit: 0,
            }
        );
        assert_eq!(fix.description(), "withdrawal corrected: 300 -> 200");
    }

    #[test]
    fn repairs_deposit_misread() {
        let fix = attempt_fix(1000, 0, 10, 1020).expect("repair");
        assert_eq!(fix.field, FlowField::Deposit);
        assert_eq!((fix.withdrawal, fix.deposit), (0, 20));
        assert_eq!(fix.description(), "deposit corrected: 10 -> 20");
    }

    #[test]
    fn consistent_row_needs_no_repair() {
        assert_eq!(attempt_fix(5000, 300, 0, 4700), None);
    }

    #[test]
    fn length_change_is_rejected() {
        // 150 -> 1050 would need an inserted digit.
        assert_eq!(attempt_fix(1000, 0, 150, 2050), None);
    }

    #[test]
    fn two_digit_change_is_rejected() {
        // 300 -> 210 changes two positions.
        assert_eq!(attempt_fix(5000, 300, 0, 4790), None);
    }

    #[test]
    fn no_flow_or_both_flows_are_rejected() {
        assert_eq!(attempt_fix(1000, 0, 0, 1100), None);
        assert_eq!(attempt_fix(1000, 100, 200, 1300), None);
    }

    #[test]
    fn negative_candidate_is_rejected() {
        // 5 - 10 would be -5.
        assert_eq!(attempt_fix(100, 5, 0, 105), None);
    }

    #[test]
    fn overflow_is_not_a_repair() {
        assert_eq!(attempt_fix(i64::MAX, 0, 1, 0), None);
    }

    #[test]
    fn apply_stamps_note() {
        let mut row = LedgerRow {
            line: 3,
            date: None,
            date_text: "R6.1.15".to_string(),
            description: "ATM".to_string(),
            withdrawal: 300,
            deposit: 0,
            balance: 4800,
            correction: None,
            source: SourceCells {
                withdrawal: Some("300".to_string()),
                deposit: Some(String::new()),
                balance: Some("4,800".to_string()),
            },
        };
        let fix = attempt_fix(5000, 300, 0, 4800).expect("repair");
        fix.apply(&mut row);
        assert_eq!(row.withdrawal, 200);
        assert_eq!(row.correction, Some(fix.note()));

        // Only the repaired cell is re-rendered on output.
        assert_eq!(row.source.withdrawal, None);
        assert_eq!(row.source.deposit.as_deref(), Some(""));
        assert_eq!(row.source.balance.as_deref(), Some("4,800"));
    }
}
