//! Check pipeline, extracted from the CLI.
//!
//! The entry points are I/O-agnostic: inputs are read through [`InputSource`] and outputs are
//! written through [`WritePort`].

use crate::orchestrator::Orchestrator;
use crate::ports::{InputSource, WritePort};
use crate::settings::CheckSettings;
use anyhow::Context;
use chrono::{DateTime, Utc};
use ledgerfix_parse::write_ledger;
use ledgerfix_render::render_text_report;
use ledgerfix_types::diagnostic::Diagnostic;
use ledgerfix_types::report::{
    LedgerfixReport, ReportArtifacts, ReportCorrection, ReportRunInfo, ReportStatus,
    ReportToolInfo, ReportVerdict,
};
use ledgerfix_types::run::RunResult;
use std::collections::BTreeSet;
use tracing::debug;

/// Error type for pipeline results. A failed verdict is not an error; see [`CheckOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{role} not found: {path}")]
    Resource { role: &'static str, path: String },
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Outcome of `run_check`.
pub struct CheckOutcome {
    pub result: RunResult,
    pub text_report: String,
    pub report: LedgerfixReport,

    /// The (possibly corrected) ledger as CSV, present when an output path is configured.
    pub corrected_csv: Option<Vec<u8>>,
}

impl CheckOutcome {
    /// `true` when any fatal diagnostic was produced.
    pub fn verdict_failed(&self) -> bool {
        !self.result.verdict
    }
}

/// Run the check pipeline. Returns the run result and rendered reports.
///
/// The caller is responsible for writing artifacts to disk (via `WritePort`) or the convenience
/// `write_check_artifacts` helper.
pub fn run_check(
    settings: &CheckSettings,
    ledger: &dyn InputSource,
    reference: Option<&dyn InputSource>,
    tool: ReportToolInfo,
) -> Result<CheckOutcome, ToolError> {
    let started_at = Utc::now();
    let result = Orchestrator::new(settings, ledger, reference).run()?;

    let corrected_csv = match &settings.output {
        Some(path) => {
            let mut buf = Vec::new();
            write_ledger(&mut buf, &result.ledger, &settings.columns)
                .with_context(|| format!("serialize corrected ledger for {}", path))?;
            Some(buf)
        }
        None => None,
    };

    let text_report = render_text_report(&result);
    let report = report_from_run(
        &result,
        tool,
        started_at,
        settings.output.as_ref().map(|p| p.to_string()),
    );
    debug!(verdict = result.verdict, "check complete");

    Ok(CheckOutcome {
        result,
        text_report,
        report,
        corrected_csv,
    })
}

/// Write the corrected ledger and the JSON report, whichever are configured.
pub fn write_check_artifacts(
    outcome: &CheckOutcome,
    settings: &CheckSettings,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    if let (Some(path), Some(bytes)) = (&settings.output, &outcome.corrected_csv) {
        writer.write_file(path, bytes)?;
    }

    if let Some(path) = &settings.report_json {
        let json = serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
        writer.write_file(path, json.as_bytes())?;
    }

    Ok(())
}

// ── report helpers ───────────────────────────────────────────────────────

pub(crate) fn report_from_run(
    result: &RunResult,
    tool: ReportToolInfo,
    started_at: DateTime<Utc>,
    corrected_ledger: Option<String>,
) -> LedgerfixReport {
    let ended_at = Utc::now();
    let duration_ms = (ended_at - started_at).num_milliseconds().max(0) as u64;

    let status = if result.verdict {
        ReportStatus::Pass
    } else {
        ReportStatus::Fail
    };

    // Distinct fatal codes, sorted for stable output.
    let reasons: BTreeSet<&str> = result
        .diagnostics
        .iter()
        .filter(|d| d.is_fatal())
        .map(|d| d.code.as_str())
        .collect();

    let corrections: Vec<ReportCorrection> = result
        .corrected_rows()
        .filter_map(|row| {
            row.correction.map(|note| ReportCorrection {
                line: row.line,
                field: note.field,
                from: note.from,
                to: note.to,
            })
        })
        .collect();

    let findings: Vec<Diagnostic> = result.diagnostics.clone();

    LedgerfixReport {
        schema: ledgerfix_types::schema::LEDGERFIX_REPORT_V1.to_string(),
        tool,
        run: ReportRunInfo {
            started_at: started_at.to_rfc3339(),
            ended_at: Some(ended_at.to_rfc3339()),
            duration_ms: Some(duration_ms),
            states: result.states.clone(),
        },
        verdict: ReportVerdict {
            status,
            counts: result.counts(),
            reasons: reasons.into_iter().map(str::to_string).collect(),
        },
        inputs: result.inputs.clone(),
        findings,
        data: Some(serde_json::json!({
            "ledgerfix": {
                "rows": result.ledger.len(),
                "rows_corrected": corrections.len(),
                "reference_checked": result.reference_checked,
                "strict_order": result.strict_order,
            }
        })),
        corrections,
        artifacts: corrected_ledger.map(|path| ReportArtifacts {
            corrected_ledger: Some(path),
        }),
    }
}
