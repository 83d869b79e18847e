//! The validation run as an explicit state machine.
//!
//! ```text
//! Idle -> Parsing -> RowByRowValidating -> [Correcting] -> SequenceChecking -> Reported
//! ```
//!
//! `Correcting` is visited only in fix mode and only when some row has a balance mismatch against
//! a known previous balance. Missing inputs abort in `Idle`; every other problem becomes a
//! diagnostic and the run continues.

use crate::pipeline::ToolError;
use crate::ports::InputSource;
use crate::settings::CheckSettings;
use anyhow::Context;
use chrono::NaiveDate;
use ledgerfix_domain::{
    Correction, RowCheck, Violation, attempt_fix, check_against_reference, check_chain,
    check_row_date, validate_row,
};
use ledgerfix_parse::{ReferenceFormat, parse_reference, read_ledger};
use ledgerfix_types::diagnostic::{CheckKind, Diagnostic, DiagnosticCode, Severity};
use ledgerfix_types::ledger::{Ledger, ReferenceEntry};
use ledgerfix_types::run::{InputRole, InputSummary, RunResult, RunState};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

/// Basic-pass findings for one row, held until the pass is complete.
#[derive(Debug)]
struct RowOutcome {
    previous_balance: Option<i64>,
    date: Option<Violation>,
    check: RowCheck,
    repaired: Option<Repair>,
}

#[derive(Debug)]
struct Repair {
    correction: Correction,
    expected: i128,
    actual: i64,
}

impl RowOutcome {
    fn repairable(&self) -> bool {
        self.previous_balance.is_some() && self.check.balance_mismatch().is_some()
    }
}

pub struct Orchestrator<'a> {
    settings: &'a CheckSettings,
    ledger_source: &'a dyn InputSource,
    reference_source: Option<&'a dyn InputSource>,

    state: RunState,
    visited: Vec<RunState>,

    ledger: Ledger,
    reference: Option<Vec<ReferenceEntry>>,
    outcomes: Vec<RowOutcome>,
    inputs: Vec<InputSummary>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        settings: &'a CheckSettings,
        ledger_source: &'a dyn InputSource,
        reference_source: Option<&'a dyn InputSource>,
    ) -> Self {
        Self {
            settings,
            ledger_source,
            reference_source,
            state: RunState::Idle,
            visited: vec![RunState::Idle],
            ledger: Vec::new(),
            reference: None,
            outcomes: Vec::new(),
            inputs: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Drive the machine to `Reported`.
    pub fn run(mut self) -> Result<RunResult, ToolError> {
        while self.state != RunState::Reported {
            self.advance()?;
        }
        Ok(self.into_result())
    }

    /// Perform the work of the current state and move to the next one.
    pub fn advance(&mut self) -> Result<RunState, ToolError> {
        let next = match self.state {
            RunState::Idle => {
                self.check_resources()?;
                RunState::Parsing
            }
            RunState::Parsing => {
                self.parse_inputs()?;
                RunState::RowByRowValidating
            }
            RunState::RowByRowValidating => {
                self.validate_rows();
                if self.settings.fix && self.outcomes.iter().any(RowOutcome::repairable) {
                    RunState::Correcting
                } else {
                    RunState::SequenceChecking
                }
            }
            RunState::Correcting => {
                self.correct_rows();
                RunState::SequenceChecking
            }
            RunState::SequenceChecking => {
                self.flush_basic_diagnostics();
                self.check_sequence();
                RunState::Reported
            }
            RunState::Reported => return Ok(RunState::Reported),
        };
        debug!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
        self.visited.push(next);
        Ok(next)
    }

    fn check_resources(&self) -> Result<(), ToolError> {
        if !self.ledger_source.exists() {
            return Err(ToolError::Resource {
                role: "ledger",
                path: self.ledger_source.label().to_string(),
            });
        }
        if let Some(reference) = self.reference_source
            && !reference.exists()
        {
            return Err(ToolError::Resource {
                role: "reference",
                path: reference.label().to_string(),
            });
        }
        Ok(())
    }

    fn parse_inputs(&mut self) -> Result<(), ToolError> {
        let bytes = self.ledger_source.read_bytes()?;
        let parsed = read_ledger(bytes.as_slice(), &self.settings.columns)
            .with_context(|| format!("read ledger {}", self.ledger_source.label()))?;

        for column in &parsed.missing_columns {
            self.diagnostics.push(Diagnostic::new(
                CheckKind::Basic,
                DiagnosticCode::MissingColumn,
                Severity::Fatal,
                format!("missing column: {}", column),
            ));
        }
        self.inputs.push(summarize(
            InputRole::Ledger,
            self.ledger_source.label(),
            &bytes,
            parsed.rows.len(),
        ));
        self.ledger = parsed.rows;

        if let Some(source) = self.reference_source {
            let bytes = source.read_bytes()?;
            let text = String::from_utf8_lossy(&bytes);
            let text = text.trim_start_matches('\u{feff}');
            let format = ReferenceFormat::from_path(source.label());

            let records = match parse_reference(text, format) {
                Ok(set) => {
                    for skipped in &set.skipped {
                        warn!(line = skipped.line, "skipping malformed reference line");
                        self.diagnostics.push(
                            Diagnostic::new(
                                CheckKind::Reference,
                                DiagnosticCode::ReferenceLineSkipped,
                                Severity::Warning,
                                format!(
                                    "reference line skipped (expected date,description,amount): {}",
                                    skipped.content
                                ),
                            )
                            .at_line(skipped.line),
                        );
                    }
                    let n = set.entries.len();
                    self.reference = Some(set.entries);
                    n
                }
                Err(e) => {
                    self.diagnostics.push(Diagnostic::new(
                        CheckKind::Reference,
                        DiagnosticCode::ReferenceUnreadable,
                        Severity::Fatal,
                        format!("reference {} unreadable: {}", source.label(), e),
                    ));
                    0
                }
            };
            self.inputs
                .push(summarize(InputRole::Reference, source.label(), &bytes, records));
        }

        debug!(rows = self.ledger.len(), "parsed inputs");
        Ok(())
    }

    fn validate_rows(&mut self) {
        let settings = self.settings;
        let mut previous_balance: Option<i64> = None;
        let mut previous_date: Option<NaiveDate> = None;

        self.outcomes = self
            .ledger
            .iter()
            .map(|row| {
                let date = check_row_date(row, previous_date);
                if row.date.is_some() {
                    previous_date = row.date;
                }
                let check = validate_row(row, previous_balance, &settings.balance_policy);
                let outcome = RowOutcome {
                    previous_balance,
                    date,
                    check,
                    repaired: None,
                };
                previous_balance = Some(outcome.check.computed_balance);
                outcome
            })
            .collect();
    }

    fn correct_rows(&mut self) {
        let settings = self.settings;
        for (outcome, row) in self.outcomes.iter_mut().zip(self.ledger.iter_mut()) {
            let (Some(prev), Some((expected, actual))) =
                (outcome.previous_balance, outcome.check.balance_mismatch())
            else {
                continue;
            };
            let Some(correction) = attempt_fix(prev, row.withdrawal, row.deposit, row.balance)
            else {
                continue;
            };

            correction.apply(row);
            warn!(line = row.line, "{}", correction.description());
            outcome.check = validate_row(row, Some(prev), &settings.balance_policy);
            outcome.repaired = Some(Repair {
                correction,
                expected,
                actual,
            });
        }
    }

    /// Append the basic-pass diagnostics in row order.
    fn flush_basic_diagnostics(&mut self) {
        let fix = self.settings.fix;
        for (i, (outcome, row)) in self.outcomes.iter().zip(&self.ledger).enumerate() {
            let basic = |code: DiagnosticCode, severity: Severity, message: String| {
                Diagnostic::new(CheckKind::Basic, code, severity, message).at(i, row.line)
            };

            if let Some(v) = &outcome.date {
                self.diagnostics
                    .push(basic(v.code(), Severity::Fatal, v.to_string()));
            }

            if let Some(repair) = &outcome.repaired {
                self.diagnostics.push(basic(
                    DiagnosticCode::DigitCorrected,
                    Severity::Warning,
                    format!(
                        "{} (balance mismatch: expected={}, actual={})",
                        repair.correction.description(),
                        repair.expected,
                        repair.actual
                    ),
                ));
            }

            for v in &outcome.check.violations {
                let mut message = v.to_string();
                if fix
                    && outcome.previous_balance.is_some()
                    && matches!(v, Violation::BalanceMismatch { .. })
                {
                    message.push_str(" (not auto-repairable)");
                }
                self.diagnostics
                    .push(basic(v.code(), Severity::Fatal, message));
            }
        }
    }

    fn check_sequence(&mut self) {
        if let Some(reference) = &self.reference {
            let found =
                check_against_reference(&self.ledger, reference, self.settings.reference_amounts);
            debug!(mismatches = found.len(), "reference comparison done");
            self.diagnostics.extend(found);
        }

        let severity = if self.settings.strict_order {
            Severity::Fatal
        } else {
            Severity::Info
        };
        let breaks = check_chain(&self.ledger, severity);
        debug!(breaks = breaks.len(), "chain walk done");
        self.diagnostics.extend(breaks);
    }

    fn into_result(self) -> RunResult {
        let verdict = !self.diagnostics.iter().any(Diagnostic::is_fatal);
        RunResult {
            ledger: self.ledger,
            diagnostics: self.diagnostics,
            verdict,
            reference_checked: self.reference_source.is_some(),
            strict_order: self.settings.strict_order,
            inputs: self.inputs,
            states: self.visited,
        }
    }
}

fn summarize(role: InputRole, label: &str, bytes: &[u8], records: usize) -> InputSummary {
    InputSummary {
        role,
        label: label.to_string(),
        sha256: sha256_hex(bytes),
        bytes: bytes.len() as u64,
        records: records as u64,
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
