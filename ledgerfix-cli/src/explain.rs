//! Diagnostic explanations for the `ledgerfix explain` command.
//!
//! Each entry covers one diagnostic code:
//! - What the finding means
//! - How its severity is decided
//! - What to do about it

use ledgerfix_types::diagnostic::{CheckKind, DiagnosticCode};

/// Information about one diagnostic code.
#[derive(Debug, Clone)]
pub struct CodeExplanation {
    /// The code as it appears in reports (e.g., "balance_mismatch").
    pub code: DiagnosticCode,
    /// Human-readable title.
    pub title: &'static str,
    /// Which report section lists it.
    pub check: CheckKind,
    /// How the severity is chosen.
    pub severity: &'static str,
    /// What the finding means.
    pub description: &'static str,
    /// What to do about it.
    pub remediation: &'static str,
}

/// Registry of all diagnostic explanations.
pub static CODE_REGISTRY: &[CodeExplanation] = &[
    CodeExplanation {
        code: DiagnosticCode::InvalidDate,
        title: "Unparseable Date",
        check: CheckKind::Basic,
        severity: "fatal",
        description: r#"The date cell could not be read as a calendar date.

Accepted shapes are `YYYY/MM/DD`, `YYYY-MM-DD`, `YYYY.MM.DD`, `YYYY年MM月DD日`
and era notation such as `R6.1.15` (R = Reiwa, H = Heisei, S = Showa)."#,
        remediation: r#"Correct the date cell in the ledger. OCR often drops the separator or
turns a digit into a letter (`O` for `0`, `l` for `1`)."#,
    },
    CodeExplanation {
        code: DiagnosticCode::DateRegression,
        title: "Date Goes Backwards",
        check: CheckKind::Basic,
        severity: "fatal",
        description: r#"The row's date is earlier than the last parseable date above it.

Statements list transactions in non-decreasing date order. A regression means
either a misread date or rows out of order."#,
        remediation: r#"Compare the row with the statement. If the date is right, the row is in the
wrong place; move it."#,
    },
    CodeExplanation {
        code: DiagnosticCode::NegativeAmount,
        title: "Negative Flow Amount",
        check: CheckKind::Basic,
        severity: "fatal",
        description: r#"A withdrawal or deposit cell holds a negative number.

Direction is carried by the column, so both flow amounts must be zero or
positive."#,
        remediation: r#"Drop the sign or move the amount to the other column."#,
    },
    CodeExplanation {
        code: DiagnosticCode::DualDirection,
        title: "Withdrawal And Deposit On One Row",
        check: CheckKind::Basic,
        severity: "fatal",
        description: r#"Both the withdrawal and the deposit of a row are nonzero.

A statement row moves money in one direction only."#,
        remediation: r#"Check which column the amount belongs to and clear the other one. OCR
sometimes copies an amount into the neighbouring column."#,
    },
    CodeExplanation {
        code: DiagnosticCode::BalanceMismatch,
        title: "Balance Mismatch",
        check: CheckKind::Basic,
        severity: "fatal (reported as digit_corrected instead when --fix repairs it)",
        description: r#"The row's balance does not equal the previous balance plus the deposit
minus the withdrawal.

The first row has no previous balance and is never checked."#,
        remediation: r#"Run with `--fix` to repair single-digit misreads of the flow amount.
If the mismatch is marked "not auto-repairable", more than one digit differs or
the balance itself is misread; correct it by hand."#,
    },
    CodeExplanation {
        code: DiagnosticCode::NegativeBalance,
        title: "Negative Balance",
        check: CheckKind::Basic,
        severity: "fatal",
        description: r#"The balance is negative on a row whose description matches no
allow-negative rule.

By default only descriptions containing `当座` (overdraft accounts) may go
negative."#,
        remediation: r#"Correct the balance, or add a rule to `ledgerfix.toml`:

    [[balance.rules]]
    pattern = "overdraft"
    effect = "allow_negative""#,
    },
    CodeExplanation {
        code: DiagnosticCode::DigitCorrected,
        title: "Single-Digit Repair Applied",
        check: CheckKind::Basic,
        severity: "warning",
        description: r#"`--fix` rewrote one digit of the row's flow amount so that the balance
recurrence holds.

A repair is only applied when exactly one of withdrawal or deposit is nonzero
and the implied amount differs from the observed one in a single digit at the
same length."#,
        remediation: r#"Review the repaired value against the statement. The corrected ledger is
written to the `--output` path."#,
    },
    CodeExplanation {
        code: DiagnosticCode::MissingColumn,
        title: "Required Column Missing",
        check: CheckKind::Basic,
        severity: "fatal",
        description: r#"The ledger header lacks one of the five required columns: date,
description, withdrawal, deposit, balance.

Cells of a missing column read as empty, so other findings on the same run
are often side effects of this one."#,
        remediation: r#"Rename the header, or map your header names in `ledgerfix.toml`:

    [columns]
    date = "Date"
    withdrawal = "Out""#,
    },
    CodeExplanation {
        code: DiagnosticCode::RowCountMismatch,
        title: "Row Count Differs From Reference",
        check: CheckKind::Reference,
        severity: "fatal",
        description: r#"The ledger and the reference ordering have a different number of entries.

Rows up to the shorter length are still compared position by position."#,
        remediation: r#"Look for a dropped or duplicated row in the ledger, or an incomplete
reference file."#,
    },
    CodeExplanation {
        code: DiagnosticCode::OrderMismatch,
        title: "Row Differs From Reference",
        check: CheckKind::Reference,
        severity: "fatal",
        description: r#"The ledger row disagrees with the reference entry at the same position.

Dates compare as calendar dates, amounts by the configured sign convention, and
descriptions match when either contains the other."#,
        remediation: r#"Check whether the rows are swapped. Set `[reference] amounts = "unsigned"`
when the reference lists magnitudes only."#,
    },
    CodeExplanation {
        code: DiagnosticCode::ReferenceLineSkipped,
        title: "Reference Line Skipped",
        check: CheckKind::Reference,
        severity: "warning",
        description: r#"A line of a text reference file did not have date, description and
amount fields. The line was left out."#,
        remediation: r#"Fix the line in the reference file. Text lines are
`date,description,amount`; commas inside the description are kept.
Blank lines and lines starting with `#` are ignored."#,
    },
    CodeExplanation {
        code: DiagnosticCode::ReferenceUnreadable,
        title: "Reference Unreadable",
        check: CheckKind::Reference,
        severity: "fatal",
        description: r#"The reference file exists but could not be parsed.

The positional comparison is skipped."#,
        remediation: r#"Check the file format. A `.json` reference must be an array of objects
with `date`, `description` and `amount`; anything else is read as text."#,
    },
    CodeExplanation {
        code: DiagnosticCode::ChainBreak,
        title: "Balance Chain Broken",
        check: CheckKind::Chain,
        severity: "info (fatal with --strict-order)",
        description: r#"Walking the ledger top to bottom, the balance recurrence fails between
this row and the one above it.

This is a heuristic for rows that are out of order. It runs on the corrected
ledger, so repaired misreads do not show up here."#,
        remediation: r#"Compare the order with the statement. Pass `--strict-order` to make chain
breaks fail the run."#,
    },
];

/// Look up an explanation by code.
///
/// Case-insensitive; hyphens and underscores are interchangeable.
pub fn lookup_code(query: &str) -> Option<&'static CodeExplanation> {
    let normalized = query.trim().to_lowercase().replace('-', "_");
    CODE_REGISTRY.iter().find(|e| e.code.as_str() == normalized)
}

/// Get all registered code names.
pub fn list_code_keys() -> Vec<&'static str> {
    CODE_REGISTRY.iter().map(|e| e.code.as_str()).collect()
}

/// Format a check kind for display.
pub fn format_check(check: CheckKind) -> &'static str {
    match check {
        CheckKind::Basic => "basic validation",
        CheckKind::Reference => "reference-order validation",
        CheckKind::Chain => "chain-order validation",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_code() {
        let e = lookup_code("balance_mismatch").expect("should find balance_mismatch");
        assert_eq!(e.code, DiagnosticCode::BalanceMismatch);
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let e = lookup_code("CHAIN_BREAK").expect("should find case insensitive");
        assert_eq!(e.code, DiagnosticCode::ChainBreak);
    }

    #[test]
    fn test_lookup_hyphens() {
        let e = lookup_code("digit-corrected").expect("should find with hyphens");
        assert_eq!(e.code, DiagnosticCode::DigitCorrected);
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup_code("balance-drift").is_none());
    }

    #[test]
    fn test_all_codes_registered() {
        assert_eq!(CODE_REGISTRY.len(), DiagnosticCode::ALL.len());
        for code in DiagnosticCode::ALL {
            assert!(lookup_code(code.as_str()).is_some(), "{} missing", code);
        }
    }

    #[test]
    fn test_list_keys_in_registry_order() {
        let keys = list_code_keys();
        assert_eq!(keys.first(), Some(&"invalid_date"));
        assert_eq!(keys.last(), Some(&"chain_break"));
    }
}
