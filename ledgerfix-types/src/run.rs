use crate::diagnostic::{CheckKind, Diagnostic, Severity};
use crate::ledger::Ledger;
use serde::{Deserialize, Serialize};

/// Orchestrator states, in the only order they may be visited.
///
/// `Correcting` is optional; every other state is always visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Parsing,
    RowByRowValidating,
    Correcting,
    SequenceChecking,
    Reported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputRole {
    Ledger,
    Reference,
}

/// Fingerprint of one input consumed by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSummary {
    pub role: InputRole,
    pub label: String,
    pub sha256: String,
    pub bytes: u64,
    pub records: u64,
}

/// Diagnostic totals per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub info: u64,
    pub warning: u64,
    pub fatal: u64,
}

impl SeverityCounts {
    pub fn tally<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> Self {
        let mut counts = Self::default();
        for d in diagnostics {
            match d.severity {
                Severity::Info => counts.info += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Fatal => counts.fatal += 1,
            }
        }
        counts
    }
}

/// Everything one validation run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// The ledger after any corrections.
    pub ledger: Ledger,

    pub diagnostics: Vec<Diagnostic>,

    /// `true` when no fatal diagnostic was produced.
    pub verdict: bool,

    /// Whether a reference ordering was supplied and compared.
    pub reference_checked: bool,

    /// Whether chain breaks count as fatal.
    pub strict_order: bool,

    #[serde(default)]
    pub inputs: Vec<InputSummary>,

    /// States visited, in order.
    #[serde(default)]
    pub states: Vec<RunState>,
}

impl RunResult {
    pub fn diagnostics_for(&self, check: CheckKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.check == check)
    }

    pub fn counts(&self) -> SeverityCounts {
        SeverityCounts::tally(&self.diagnostics)
    }

    /// Rows that carry a correction note.
    pub fn corrected_rows(&self) -> impl Iterator<Item = &crate::ledger::LedgerRow> {
        self.ledger.iter().filter(|r| r.correction.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticCode;

    #[test]
    fn tally_counts_each_severity() {
        let d = |kind, code, severity| Diagnostic::new(kind, code, severity, "x");
        let ds = vec![
            d(CheckKind::Basic, DiagnosticCode::DigitCorrected, Severity::Warning),
            d(CheckKind::Chain, DiagnosticCode::ChainBreak, Severity::Info),
            d(CheckKind::Basic, DiagnosticCode::BalanceMismatch, Severity::Fatal),
            d(CheckKind::Reference, DiagnosticCode::OrderMismatch, Severity::Fatal),
        ];
        let counts = SeverityCounts::tally(&ds);
        assert_eq!(counts, SeverityCounts { info: 1, warning: 1, fatal: 2 });
    }

    #[test]
    fn states_order_matches_lifecycle() {
        assert!(RunState::Idle < RunState::Parsing);
        assert!(RunState::RowByRowValidating < RunState::Correcting);
        assert!(RunState::Correcting < RunState::SequenceChecking);
        assert!(RunState::SequenceChecking < RunState::Reported);
    }
}
