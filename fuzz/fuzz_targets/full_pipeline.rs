#![no_main]

//! Fuzz target for the whole check pipeline.
//!
//! Builds a small ledger from structured input, runs it and checks that the verdict agrees with
//! the diagnostics.

use ledgerfix_core::adapters::InMemoryInputSource;
use ledgerfix_core::ports::InputSource;
use ledgerfix_core::{CheckSettings, run_check};
use ledgerfix_types::diagnostic::Severity;
use ledgerfix_types::report::ReportToolInfo;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, arbitrary::Arbitrary)]
struct PipelineInput {
    rows: Vec<RowInput>,
    fix: bool,
    strict_order: bool,
    with_reference: bool,
}

#[derive(Debug, arbitrary::Arbitrary)]
struct RowInput {
    day: u8,
    description: String,
    withdrawal: u32,
    deposit: u32,
    balance: i32,
}

fuzz_target!(|input: PipelineInput| {
    let mut csv = String::from("日付,摘要,出金額,入金額,残高\n");
    let mut reference = String::new();
    for row in input.rows.iter().take(64) {
        let description: String = row
            .description
            .chars()
            .filter(|c| !matches!(c, ',' | '"' | '\n' | '\r'))
            .collect();
        let date = format!("2025/01/{:02}", row.day % 31 + 1);
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            date, description, row.withdrawal, row.deposit, row.balance
        ));
        reference.push_str(&format!(
            "{},{},{}\n",
            date,
            description,
            i64::from(row.deposit) - i64::from(row.withdrawal)
        ));
    }

    let mut settings = CheckSettings::new("statement.csv");
    settings.fix = input.fix;
    settings.strict_order = input.strict_order;
    settings.output = Some("fixed.csv".into());

    let ledger = InMemoryInputSource::new("statement.csv", csv);
    let reference = InMemoryInputSource::new("order.txt", reference);
    let reference: Option<&dyn InputSource> = if input.with_reference {
        Some(&reference)
    } else {
        None
    };

    let tool = ReportToolInfo {
        name: "ledgerfix".to_string(),
        version: "fuzz".to_string(),
    };
    let Ok(outcome) = run_check(&settings, &ledger, reference, tool) else {
        return;
    };

    let any_fatal = outcome
        .result
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Fatal);
    assert_eq!(outcome.result.verdict, !any_fatal);
    assert!(outcome.corrected_csv.is_some());
    if !input.fix {
        assert_eq!(outcome.result.corrected_rows().count(), 0);
    }
});
