//! Configuration file loading for ledgerfix.
//!
//! Discovers and loads `ledgerfix.toml` from the working directory, or from an explicit
//! `--config` path. Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use ledgerfix_core::{AmountConvention, BalancePolicy, CheckSettings, ColumnMap};
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "ledgerfix.toml";

/// Top-level configuration from ledgerfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LedgerfixConfig {
    /// Defaults for the `check` command.
    pub check: CheckConfig,

    /// Ledger header names.
    pub columns: ColumnMap,

    /// How the reference ordering is read.
    pub reference: ReferenceConfig,

    /// Negative balance exemptions.
    pub balance: BalancePolicy,
}

/// Check section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Attempt single-digit repairs.
    pub fix: bool,

    /// Treat balance chain breaks as fatal.
    pub strict_order: bool,

    /// Where to write the (possibly corrected) ledger.
    pub output: Option<Utf8PathBuf>,

    /// Reference ordering to compare against.
    pub reference: Option<Utf8PathBuf>,

    /// Where to write the JSON report.
    pub report_json: Option<Utf8PathBuf>,
}

/// Reference section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// `signed` (deposits positive, withdrawals negative) or `unsigned`.
    pub amounts: AmountConvention,
}

/// Discover the ledgerfix.toml config file.
///
/// Returns `None` if no config file is found in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a ledgerfix.toml config file.
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<LedgerfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<LedgerfixConfig> {
    let config: LedgerfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `dir`, or return default if not found.
pub fn load_or_default(dir: &Utf8Path) -> anyhow::Result<LedgerfixConfig> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(LedgerfixConfig::default()),
    }
}

/// An explicit path must exist; otherwise fall back to discovery in `dir`.
pub fn resolve_config(
    explicit: Option<&Utf8Path>,
    dir: &Utf8Path,
) -> anyhow::Result<LedgerfixConfig> {
    match explicit {
        Some(path) => load_config(path),
        None => load_or_default(dir),
    }
}

/// `check` flags as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CheckOverrides {
    pub fix: bool,
    pub strict_order: bool,
    pub output: Option<Utf8PathBuf>,
    pub reference: Option<Utf8PathBuf>,
    pub report_json: Option<Utf8PathBuf>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: LedgerfixConfig,
}

impl ConfigMerger {
    /// Create a new merger from a loaded config.
    pub fn new(config: LedgerfixConfig) -> Self {
        Self { config }
    }

    /// Merge with check command CLI arguments.
    ///
    /// CLI boolean flags enable a setting when set; they cannot turn off a config file `true`.
    /// CLI paths replace config file paths.
    pub fn merge_check_args(self, ledger: Utf8PathBuf, cli: CheckOverrides) -> CheckSettings {
        let check = self.config.check;
        CheckSettings {
            ledger,
            reference: cli.reference.or(check.reference),
            output: cli.output.or(check.output),
            report_json: cli.report_json.or(check.report_json),
            fix: cli.fix || check.fix,
            strict_order: cli.strict_order || check.strict_order,
            columns: self.config.columns,
            reference_amounts: self.config.reference.amounts,
            balance_policy: self.config.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerfix_core::BalanceEffect;
    use tempfile::TempDir;

    #[test]
    fn test_parse_example_config() {
        let contents = r#"
[check]
fix = true
strict_order = false
output = "fixed.csv"
reference = "order.json"
report_json = "report.json"

[columns]
date = "Date"
description = "Memo"
withdrawal = "Out"
deposit = "In"
balance = "Balance"

[reference]
amounts = "unsigned"

[[balance.rules]]
pattern = "当座"
effect = "allow_negative"

[[balance.rules]]
pattern = "overdraft"
"#;

        let config = parse_config(contents).unwrap();
        assert!(config.check.fix);
        assert!(!config.check.strict_order);
        assert_eq!(config.check.output.as_deref(), Some(Utf8Path::new("fixed.csv")));
        assert_eq!(config.columns.withdrawal, "Out");
        assert_eq!(config.reference.amounts, AmountConvention::Unsigned);
        assert_eq!(config.balance.rules.len(), 2);
        assert_eq!(config.balance.rules[1].effect, BalanceEffect::AllowNegative);
    }

    #[test]
    fn test_parse_minimal_config() {
        let contents = r#"
[columns]
date = "Date"
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(config.columns.date, "Date");
        // Defaults
        assert_eq!(config.columns.balance, "残高");
        assert!(!config.check.fix);
        assert_eq!(config.reference.amounts, AmountConvention::Signed);
        assert_eq!(config.balance, BalancePolicy::default());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.check.reference.is_none());
        assert_eq!(config.columns, ColumnMap::default());
    }

    #[test]
    fn test_parse_invalid_convention() {
        let err = parse_config("[reference]\namounts = \"sideways\"\n").unwrap_err();
        assert!(format!("{:#}", err).contains("invalid TOML"));
    }

    #[test]
    fn test_merge_check_args_cli_overrides_paths() {
        let config = LedgerfixConfig {
            check: CheckConfig {
                output: Some("config.csv".into()),
                reference: Some("config.json".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = ConfigMerger::new(config).merge_check_args(
            "statement.csv".into(),
            CheckOverrides {
                output: Some("cli.csv".into()),
                ..Default::default()
            },
        );

        assert_eq!(merged.ledger, "statement.csv");
        assert_eq!(merged.output.as_deref(), Some(Utf8Path::new("cli.csv")));
        assert_eq!(merged.reference.as_deref(), Some(Utf8Path::new("config.json")));
        assert!(merged.report_json.is_none());
    }

    #[test]
    fn test_merge_check_args_booleans_or() {
        let config = LedgerfixConfig {
            check: CheckConfig {
                fix: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = ConfigMerger::new(config).merge_check_args(
            "statement.csv".into(),
            CheckOverrides {
                strict_order: true,
                ..Default::default()
            },
        );

        assert!(merged.fix);
        assert!(merged.strict_order);
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        assert!(discover_config(&root).is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "").expect("write config");
        assert!(discover_config(&root).is_some());
    }

    #[test]
    fn test_load_or_default_returns_default_when_missing() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let cfg = load_or_default(&root).expect("load default");
        assert!(!cfg.check.fix);
        assert_eq!(cfg.balance, BalancePolicy::default());
    }

    #[test]
    fn test_resolve_config_explicit_path_must_exist() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let missing = root.join("custom.toml");
        assert!(resolve_config(Some(&missing), &root).is_err());

        std::fs::write(&missing, "[check]\nstrict_order = true\n").expect("write config");
        let cfg = resolve_config(Some(&missing), &root).expect("load explicit");
        assert!(cfg.check.strict_order);
    }
}
