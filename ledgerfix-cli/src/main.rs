mod config;
mod explain;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use config::{CheckOverrides, ConfigMerger};
use ledgerfix_core::adapters::{FsInputSource, FsWritePort};
use ledgerfix_core::ports::InputSource;
use ledgerfix_core::{run_check, write_check_artifacts};
use ledgerfix_types::report::ReportToolInfo;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Exit status when the run completed but produced fatal findings.
const EXIT_VERDICT_FAILED: u8 = 2;
/// Exit status for missing inputs, unreadable files and other tool errors.
const EXIT_TOOL_ERROR: u8 = 1;

#[derive(Debug, Parser)]
#[command(
    name = "ledgerfix",
    version,
    about = "Consistency and order validator for OCR-transcribed bank statement ledgers."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a ledger CSV and optionally repair single-digit misreads.
    Check(CheckArgs),
    /// Explain what a diagnostic code means and how to resolve it.
    Explain(ExplainArgs),
    /// List all diagnostic codes.
    ListCodes(ListCodesArgs),
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Ledger CSV to validate.
    ledger: Utf8PathBuf,

    /// Attempt single-digit repairs of flow amounts.
    #[arg(long, default_value_t = false)]
    fix: bool,

    /// Write the (possibly corrected) ledger to this path.
    #[arg(short, long)]
    output: Option<Utf8PathBuf>,

    /// Reference ordering (`.json` or comma-separated text) to compare row by row.
    #[arg(long, visible_alias = "check-order")]
    reference: Option<Utf8PathBuf>,

    /// Fail the run when the balance chain breaks.
    #[arg(long, default_value_t = false)]
    strict_order: bool,

    /// Write a machine-readable JSON report to this path.
    #[arg(long)]
    report_json: Option<Utf8PathBuf>,

    /// Config file (default: ./ledgerfix.toml when present).
    #[arg(long)]
    config: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Diagnostic code to explain (e.g., "balance_mismatch", "chain-break").
    code: String,
}

#[derive(Debug, Parser)]
struct ListCodesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_TOOL_ERROR)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Explain(args) => cmd_explain(args).map(|()| ExitCode::SUCCESS),
        Command::ListCodes(args) => cmd_list_codes(args).map(|()| ExitCode::SUCCESS),
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    // Load config file and merge with CLI arguments
    let cwd = Utf8PathBuf::from(".");
    let file_config = config::resolve_config(args.config.as_deref(), &cwd)
        .context("load ledgerfix.toml config")?;
    let settings = ConfigMerger::new(file_config).merge_check_args(
        args.ledger,
        CheckOverrides {
            fix: args.fix,
            strict_order: args.strict_order,
            output: args.output,
            reference: args.reference,
            report_json: args.report_json,
        },
    );

    debug!(
        "merged config: fix={}, strict_order={}, reference={:?}, output={:?}",
        settings.fix, settings.strict_order, settings.reference, settings.output
    );

    let ledger = FsInputSource::new(settings.ledger.clone());
    let reference = settings.reference.clone().map(FsInputSource::new);
    let outcome = run_check(
        &settings,
        &ledger,
        reference.as_ref().map(|r| r as &dyn InputSource),
        tool_info(),
    )?;

    print!("{}", outcome.text_report);
    write_check_artifacts(&outcome, &settings, &FsWritePort).context("write artifacts")?;

    if let Some(path) = &settings.output {
        info!("wrote ledger to {}", path);
    }
    if let Some(path) = &settings.report_json {
        info!("wrote report to {}", path);
    }

    if outcome.verdict_failed() {
        Ok(ExitCode::from(EXIT_VERDICT_FAILED))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn tool_info() -> ReportToolInfo {
    ReportToolInfo {
        name: "ledgerfix".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    use explain::{format_check, list_code_keys, lookup_code};

    let Some(entry) = lookup_code(&args.code) else {
        let available = list_code_keys().join(", ");
        anyhow::bail!(
            "Unknown diagnostic code: '{}'\n\nAvailable codes: {}",
            args.code,
            available
        );
    };

    println!("================================================================================");
    println!("CODE: {}", entry.title);
    println!("================================================================================");
    println!();
    println!("Code:     {}", entry.code);
    println!("Check:    {}", format_check(entry.check));
    println!("Severity: {}", entry.severity);
    println!();

    println!("DESCRIPTION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", entry.description);
    println!();

    println!("REMEDIATION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", entry.remediation);
    println!();

    Ok(())
}

fn cmd_list_codes(args: ListCodesArgs) -> anyhow::Result<()> {
    use explain::{CODE_REGISTRY, format_check};

    match args.format {
        OutputFormat::Text => {
            println!("Diagnostic codes:\n");
            println!("  {:<24} {:<28} TITLE", "CODE", "CHECK");
            println!("  {:<24} {:<28} -----", "----", "-----");
            for entry in CODE_REGISTRY {
                println!(
                    "  {:<24} {:<28} {}",
                    entry.code.as_str(),
                    format_check(entry.check),
                    entry.title
                );
            }
            println!();
            println!("Use 'ledgerfix explain <code>' for details.");
        }
        OutputFormat::Json => {
            let codes: Vec<_> = CODE_REGISTRY
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "code": e.code,
                        "title": e.title,
                        "check": e.check,
                        "severity": e.severity,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&codes)?);
        }
    }
    Ok(())
}
