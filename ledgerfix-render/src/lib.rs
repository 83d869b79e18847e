//! Rendering helpers (plain text) for human-readable reports.

use ledgerfix_types::diagnostic::{CheckKind, Diagnostic};
use ledgerfix_types::run::RunResult;

pub fn render_text_report(result: &RunResult) -> String {
    let mut out = String::new();

    render_section(
        &mut out,
        "basic validation",
        result.diagnostics_for(CheckKind::Basic).collect(),
        "basic validation OK: every row is consistent",
    );

    if result.reference_checked {
        out.push('\n');
        render_section(
            &mut out,
            "reference-order validation",
            result.diagnostics_for(CheckKind::Reference).collect(),
            "reference-order validation OK: ledger matches the reference ordering",
        );
    }

    out.push('\n');
    let chain: Vec<&Diagnostic> = result.diagnostics_for(CheckKind::Chain).collect();
    let breaks = !chain.is_empty();
    render_section(
        &mut out,
        "chain-order validation",
        chain,
        "chain-order validation OK: the balance recurrence holds on every row",
    );
    if breaks {
        out.push_str(
            "\nA broken balance chain usually means rows are out of order. \
             Recheck the order against the statement.\n",
        );
        if !result.strict_order {
            out.push_str("(informational; pass --strict-order to fail on chain breaks)\n");
        }
    }

    let counts = result.counts();
    out.push_str(&format!(
        "\nfindings: {} fatal, {} warning, {} info\n",
        counts.fatal, counts.warning, counts.info
    ));
    out.push_str(&format!(
        "result: {}\n",
        if result.verdict { "OK" } else { "NG" }
    ));
    out
}

fn render_section(out: &mut String, heading: &str, diagnostics: Vec<&Diagnostic>, ok_line: &str) {
    out.push_str(&format!("=== {} ===\n", heading));
    if diagnostics.is_empty() {
        out.push_str(ok_line);
        out.push('\n');
        return;
    }
    for d in diagnostics {
        out.push_str(&format!("  {}\n", diagnostic_line(d)));
    }
}

/// `[severity] line N: message`, without the location for whole-ledger findings.
pub fn diagnostic_line(d: &Diagnostic) -> String {
    match d.line {
        Some(line) => format!("[{}] line {}: {}", d.severity, line, d.message),
        None => format!("[{}] {}", d.severity, d.message),
    }
}
