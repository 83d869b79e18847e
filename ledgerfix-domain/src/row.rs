use crate::policy::BalancePolicy;
use chrono::NaiveDate;
use ledgerfix_types::diagnostic::DiagnosticCode;
use ledgerfix_types::ledger::{FlowField, LedgerRow};
use std::fmt;

/// One broken per-row invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    NegativeAmount { field: FlowField, value: i64 },
    DualDirection { withdrawal: i64, deposit: i64 },
    BalanceMismatch { expected: i128, actual: i64 },
    NegativeBalance { balance: i64 },
    InvalidDate { text: String },
    DateRegression { date: NaiveDate, previous: NaiveDate },
}

impl Violation {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Violation::NegativeAmount { .. } => DiagnosticCode::NegativeAmount,
            Violation::DualDirection { .. } => DiagnosticCode::DualDirection,
            Violation::BalanceMismatch { .. } => DiagnosticCode::BalanceMismatch,
            Violation::NegativeBalance { .. } => DiagnosticCode::NegativeBalance,
            Violation::InvalidDate { .. } => DiagnosticCode::InvalidDate,
            Violation::DateRegression { .. } => DiagnosticCode::DateRegression,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NegativeAmount { field, value } => {
                write!(f, "{} is negative: {}", field.as_str(), value)
            }
            Violation::DualDirection { withdrawal, deposit } => write!(
                f,
                "withdrawal and deposit both set: withdrawal={}, deposit={}",
                withdrawal, deposit
            ),
            Violation::BalanceMismatch { expected, actual } => {
                write!(f, "balance mismatch: expected={}, actual={}", expected, actual)
            }
            Violation::NegativeBalance { balance } => write!(f, "balance is negative: {}", balance),
            Violation::InvalidDate { text } => write!(f, "unrecognized date: {:?}", text),
            Violation::DateRegression { date, previous } => {
                write!(f, "date goes backwards: {} after {}", date, previous)
            }
        }
    }
}

/// Result of validating one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCheck {
    pub valid: bool,
    pub violations: Vec<Violation>,

    /// Always the observed balance, so a mismatch stays local to the row that caused it.
    pub computed_balance: i64,
}

impl RowCheck {
    /// `(expected, actual)` when the balance recurrence failed.
    pub fn balance_mismatch(&self) -> Option<(i128, i64)> {
        self.violations.iter().find_map(|v| match v {
            Violation::BalanceMismatch { expected, actual } => Some((*expected, *actual)),
            _ => None,
        })
    }
}

/// `previous + deposit - withdrawal`, computed exactly.
///
/// Three `i64` terms always fit in `i128`, so a sum outside the `i64` range still compares unequal
/// to any observed balance.
pub fn expected_balance(previous: i64, withdrawal: i64, deposit: i64) -> i128 {
    i128::from(previous) + i128::from(deposit) - i128::from(withdrawal)
}

/// Check the per-row invariants. Every check runs; all violations are reported.
///
/// The recurrence is only checked when `previous_balance` is known (every row but the first).
pub fn validate_row(
    row: &LedgerRow,
    previous_balance: Option<i64>,
    policy: &BalancePolicy,
) -> RowCheck {
    let mut violations = Vec::new();

    for field in [FlowField::Withdrawal, FlowField::Deposit] {
        let value = row.flow(field);
        if value < 0 {
            violations.push(Violation::NegativeAmount { field, value });
        }
    }

    if row.withdrawal > 0 && row.deposit > 0 {
        violations.push(Violation::DualDirection {
            withdrawal: row.withdrawal,
            deposit: row.deposit,
        });
    }

    if let Some(prev) = previous_balance {
        let expected = expected_balance(prev, row.withdrawal, row.deposit);
        if expected != i128::from(row.balance) {
            violations.push(Violation::BalanceMismatch {
                expected,
                actual: row.balance,
            });
        }
    }

    if row.balance < 0 && !policy.allows_negative(&row.description) {
        violations.push(Violation::NegativeBalance {
            balance: row.balance,
        });
    }

    RowCheck {
        valid: violations.is_empty(),
        violations,
        computed_balance: row.balance,
    }
}

/// Date checks for one row: unparseable text, or a date earlier than the last parsed one.
pub fn check_row_date(row: &LedgerRow, previous: Option<NaiveDate>) -> Option<Violation> {
    match (row.date, previous) {
        (None, _) => Some(Violation::InvalidDate {
            text: row.date_text.clone(),
        }),
        (Some(date), Some(previous)) if date < previous => {
            Some(Violation::DateRegression { date, previous })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerfix_types::ledger::SourceCells;
    use pretty_assertions::assert_eq;

    fn row(withdrawal: i64, deposit: i64, balance: i64) -> LedgerRow {
        LedgerRow {
            line: 2,
            date: NaiveDate::from_ymd_opt(2024, 1, 15),
            date_text: "2024/01/15".to_string(),
            description: "振込".to_string(),
            withdrawal,
            deposit,
            balance,
            correction: None,
            source: SourceCells::default(),
        }
    }

    #[test]
    fn consistent_row_is_valid() {
        let check = validate_row(&row(300, 0, 4700), Some(5000), &BalancePolicy::default());
        assert!(check.valid);
        assert!(check.violations.is_empty());
        assert_eq!(check.computed_balance, 4700);
    }

    #[test]
    fn first_row_skips_recurrence() {
        let check = validate_row(&row(300, 0, 123), None, &BalancePolicy::default());
        assert!(check.valid);
    }

    #[test]
    fn mismatch_reports_expected_and_keeps_observed_balance() {
        let check = validate_row(&row(300, 0, 4800), Some(5000), &BalancePolicy::default());
        assert!(!check.valid);
        assert_eq!(
            check.violations,
            vec![Violation::BalanceMismatch {
                expected: 4700,
                actual: 4800
            }]
        );
        assert_eq!(check.balance_mismatch(), Some((4700, 4800)));
        assert_eq!(check.computed_balance, 4800);
    }

    #[test]
    fn all_violations_are_collected() {
        let check = validate_row(&row(5, 10, -20), Some(0), &BalancePolicy::strict());
        let codes: Vec<DiagnosticCode> = check.violations.iter().map(|v| v.code()).collect();
        assert_eq!(
            codes,
            vec![
                DiagnosticCode::DualDirection,
                DiagnosticCode::BalanceMismatch,
                DiagnosticCode::NegativeBalance,
            ]
        );
    }

    #[test]
    fn negative_flow_is_not_a_second_direction() {
        let check = validate_row(&row(-5, 10, 15), Some(0), &BalancePolicy::default());
        let codes: Vec<DiagnosticCode> = check.violations.iter().map(|v| v.code()).collect();
        assert_eq!(codes, vec![DiagnosticCode::NegativeAmount]);
    }

    #[test]
    fn negative_balance_exempt_by_policy() {
        let mut r = row(1000, 0, -500);
        r.description = "当座貸越".to_string();
        assert!(validate_row(&r, Some(500), &BalancePolicy::default()).valid);
        assert!(!validate_row(&r, Some(500), &BalancePolicy::strict()).valid);
    }

    #[test]
    fn messages_name_the_numbers() {
        let v = Violation::BalanceMismatch {
            expected: 4700,
            actual: 4800,
        };
        assert_eq!(v.to_string(), "balance mismatch: expected=4700, actual=4800");
        let v = Violation::NegativeAmount {
            field: FlowField::Deposit,
            value: -3,
        };
        assert_eq!(v.to_string(), "deposit is negative: -3");
    }

    #[test]
    fn date_checks() {
        let r = row(0, 0, 0);
        assert_eq!(check_row_date(&r, None), None);
        assert_eq!(check_row_date(&r, NaiveDate::from_ymd_opt(2024, 1, 15)), None);
        assert!(matches!(
            check_row_date(&r, NaiveDate::from_ymd_opt(2024, 2, 1)),
            Some(Violation::DateRegression { .. })
        ));

        let mut undated = row(0, 0, 0);
        undated.date = None;
        undated.date_text = "??".to_string();
        assert_eq!(
            check_row_date(&undated, None),
            Some(Violation::InvalidDate {
                text: "??".to_string()
            })
        );
    }

    #[test]
    fn expected_balance_is_exact_beyond_i64() {
        assert_eq!(expected_balance(i64::MAX, 0, 1), i128::from(i64::MAX) + 1);
        assert_eq!(expected_balance(i64::MIN, 1, 0), i128::from(i64::MIN) - 1);
    }

    #[test]
    fn overflowing_recurrence_is_a_mismatch() {
        let check = validate_row(&row(0, 1, i64::MAX), Some(i64::MAX), &BalancePolicy::default());
        assert!(!check.valid);
        assert_eq!(check.balance_mismatch(), Some((i128::from(i64::MAX) + 1, i64::MAX)));
        assert_eq!(
            check.violations[0].to_string(),
            "balance mismatch: expected=9223372036854775808, actual=9223372036854775807"
        );
    }
}
