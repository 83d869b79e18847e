//! Worked scenarios for the validator, corrector and ordering checks.

use ledgerfix_domain::{
    AmountConvention, BalancePolicy, Violation, attempt_fix, check_against_reference, check_chain,
    validate_row,
};
use ledgerfix_parse::parse_date;
use ledgerfix_types::diagnostic::{DiagnosticCode, Severity};
use ledgerfix_types::ledger::{FlowField, LedgerRow, ReferenceEntry, SourceCells};
use pretty_assertions::assert_eq;

fn row(
    line: u64,
    date: &str,
    description: &str,
    withdrawal: i64,
    deposit: i64,
    balance: i64,
) -> LedgerRow {
    LedgerRow {
        line,
        date: parse_date(date).ok(),
        date_text: date.to_string(),
        description: description.to_string(),
        withdrawal,
        deposit,
        balance,
        correction: None,
        source: SourceCells::default(),
    }
}

fn reference_of(ledger: &[LedgerRow]) -> Vec<ReferenceEntry> {
    ledger
        .iter()
        .map(|r| ReferenceEntry {
            date: r.date_text.clone(),
            description: r.description.clone(),
            amount: r.signed_amount(),
        })
        .collect()
}

#[test]
fn zero_flow_row_keeps_chain_intact() {
    let ledger = vec![
        row(2, "2025/11/01", "繰越", 0, 1000, 1000),
        row(3, "2025/11/02", "記帳", 0, 0, 1000),
    ];
    assert!(check_chain(&ledger, Severity::Fatal).is_empty());
    assert!(validate_row(&ledger[1], Some(1000), &BalancePolicy::default()).valid);
}

#[test]
fn withdrawal_misread_is_flagged_then_repaired() {
    let mut r = row(3, "R7.11.4", "ATM", 300, 0, 4800);
    let check = validate_row(&r, Some(5000), &BalancePolicy::default());
    assert_eq!(
        check.violations,
        vec![Violation::BalanceMismatch {
            expected: 4700,
            actual: 4800
        }]
    );

    let fix = attempt_fix(5000, r.withdrawal, r.deposit, r.balance).expect("single-digit repair");
    assert_eq!(fix.field, FlowField::Withdrawal);
    assert_eq!((fix.withdrawal, fix.deposit), (200, 0));
    assert_eq!(fix.description(), "withdrawal corrected: 300 -> 200");

    fix.apply(&mut r);
    assert!(validate_row(&r, Some(5000), &BalancePolicy::default()).valid);
    assert_eq!(attempt_fix(5000, r.withdrawal, r.deposit, r.balance), None);
}

#[test]
fn identical_amount_swap_needs_the_reference() {
    let truth = vec![
        row(2, "2025/11/04", "AD", 0, 500, 1500),
        row(3, "2025/11/05", "ﾌﾘｺﾐ ﾀﾅｶ", 0, 500, 2000),
    ];
    // Transcribed with the two rows swapped; balances were copied positionally.
    let transcribed = vec![
        row(2, "2025/11/05", "ﾌﾘｺﾐ ﾀﾅｶ", 0, 500, 1500),
        row(3, "2025/11/04", "AD", 0, 500, 2000),
    ];

    assert!(check_chain(&transcribed, Severity::Fatal).is_empty());

    let ds = check_against_reference(&transcribed, &reference_of(&truth), AmountConvention::Signed);
    assert_eq!(ds.len(), 2);
    assert_eq!(ds[0].code, DiagnosticCode::OrderMismatch);
    assert_eq!(ds[0].row, Some(0));
    assert!(ds[0].message.contains("date:"));
    assert!(ds[0].message.contains("description:"));
    assert!(!ds[0].message.contains("amount:"));
}

#[test]
fn length_changing_discrepancy_is_not_repaired() {
    let r = row(3, "2025/11/04", "入金", 0, 150, 2050);
    let check = validate_row(&r, Some(1000), &BalancePolicy::default());
    assert!(!check.valid);
    assert_eq!(attempt_fix(1000, r.withdrawal, r.deposit, r.balance), None);
}

#[test]
fn adjacent_swap_with_different_amounts_is_caught_at_first_position() {
    let truth = vec![
        row(2, "2025/11/04", "AD", 0, 1000, 1000),
        row(3, "2025/11/04", "ATM", 300, 0, 700),
        row(4, "2025/11/04", "ﾃﾞﾝｷ", 200, 0, 500),
    ];
    let mut swapped = truth.clone();
    swapped.swap(1, 2);

    let ds = check_against_reference(&swapped, &reference_of(&truth), AmountConvention::Signed);
    assert!(!ds.is_empty());
    assert_eq!(ds[0].row, Some(1));
    assert!(ds[0].message.contains("amount: ledger=-200, reference=-300"));
}
