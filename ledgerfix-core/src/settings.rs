//! Clap-free settings for the check pipeline.

use camino::Utf8PathBuf;
use ledgerfix_domain::{AmountConvention, BalancePolicy};
use ledgerfix_parse::ColumnMap;

/// Settings for one validation run.
#[derive(Debug, Clone)]
pub struct CheckSettings {
    pub ledger: Utf8PathBuf,
    pub reference: Option<Utf8PathBuf>,

    // Outputs
    pub output: Option<Utf8PathBuf>,
    pub report_json: Option<Utf8PathBuf>,

    // Behaviour
    pub fix: bool,
    pub strict_order: bool,

    // Input shape and policy
    pub columns: ColumnMap,
    pub reference_amounts: AmountConvention,
    pub balance_policy: BalancePolicy,
}

impl CheckSettings {
    pub fn new(ledger: impl Into<Utf8PathBuf>) -> Self {
        Self {
            ledger: ledger.into(),
            ..Self::default()
        }
    }
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            ledger: Utf8PathBuf::from("statement.csv"),
            reference: None,
            output: None,
            report_json: None,
            fix: false,
            strict_order: false,
            columns: ColumnMap::default(),
            reference_amounts: AmountConvention::default(),
            balance_policy: BalancePolicy::default(),
        }
    }
}
