//! Five-column ledger tables: `date, description, withdrawal, deposit, balance`.
//!
//! Column names are configuration. The defaults are the headers used by Japanese bank statement
//! exports.

use crate::amount::parse_amount;
use crate::date::parse_date;
use csv::{ReaderBuilder, WriterBuilder};
use ledgerfix_types::ledger::{Ledger, LedgerRow, SourceCells};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use thiserror::Error;
use tracing::debug;

/// Header names for each ledger field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub date: String,
    pub description: String,
    pub withdrawal: String,
    pub deposit: String,
    pub balance: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            date: "日付".to_string(),
            description: "摘要".to_string(),
            withdrawal: "出金額".to_string(),
            deposit: "入金額".to_string(),
            balance: "残高".to_string(),
        }
    }
}

impl ColumnMap {
    /// Header names in output order.
    pub fn headers(&self) -> [&str; 5] {
        [
            self.date.as_str(),
            self.description.as_str(),
            self.withdrawal.as_str(),
            self.deposit.as_str(),
            self.balance.as_str(),
        ]
    }
}

#[derive(Debug, Error)]
pub enum LedgerReadError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Rows read from a ledger table plus structural problems found in its header.
#[derive(Debug, Clone, Default)]
pub struct ParsedLedger {
    pub rows: Ledger,

    /// Configured header names that were not present. Their cells read as empty.
    pub missing_columns: Vec<String>,
}

struct ColumnIndex {
    date: Option<usize>,
    description: Option<usize>,
    withdrawal: Option<usize>,
    deposit: Option<usize>,
    balance: Option<usize>,
}

/// Read a ledger table. The first record is the header and is not validated.
///
/// Cells are decoded lossily so a stray invalid byte never aborts the run; the affected row is left
/// for the validator to flag.
pub fn read_ledger<R: Read>(
    reader: R,
    columns: &ColumnMap,
) -> Result<ParsedLedger, LedgerReadError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| {
            String::from_utf8_lossy(h)
                .trim_start_matches('\u{feff}')
                .trim()
                .to_string()
        })
        .collect();
    let find = |name: &str| headers.iter().position(|h| h == name);

    let index = ColumnIndex {
        date: find(&columns.date),
        description: find(&columns.description),
        withdrawal: find(&columns.withdrawal),
        deposit: find(&columns.deposit),
        balance: find(&columns.balance),
    };
    let missing_columns: Vec<String> = columns
        .headers()
        .into_iter()
        .filter(|name| find(name).is_none())
        .map(|name| name.to_string())
        .collect();

    let mut rows = Vec::new();
    for (n, record) in rdr.byte_records().enumerate() {
        let record = record?;
        let cell = |i: Option<usize>| {
            i.and_then(|i| record.get(i))
                .map(|b| String::from_utf8_lossy(b).trim().to_string())
                .unwrap_or_default()
        };

        let date_text = cell(index.date);
        let (withdrawal, deposit, balance) = (
            cell(index.withdrawal),
            cell(index.deposit),
            cell(index.balance),
        );
        rows.push(LedgerRow {
            line: n as u64 + 2,
            date: parse_date(&date_text).ok(),
            date_text,
            description: cell(index.description),
            withdrawal: parse_amount(&withdrawal),
            deposit: parse_amount(&deposit),
            balance: parse_amount(&balance),
            correction: None,
            source: SourceCells {
                withdrawal: Some(withdrawal),
                deposit: Some(deposit),
                balance: Some(balance),
            },
        });
    }

    debug!(rows = rows.len(), missing = ?missing_columns, "read ledger table");
    Ok(ParsedLedger {
        rows,
        missing_columns,
    })
}

/// Write a ledger in the same five-column shape it was read in.
///
/// Cells read from the input are written back as they were, so an unparseable amount keeps its
/// text. Only a cell without source text, such as a repaired flow, is rendered from its value;
/// zero flows render empty, matching how statements leave the unused direction blank.
pub fn write_ledger<W: Write>(
    writer: W,
    ledger: &[LedgerRow],
    columns: &ColumnMap,
) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(columns.headers())?;
    for row in ledger {
        let source = &row.source;
        wtr.write_record([
            row.date_text.clone(),
            row.description.clone(),
            source
                .withdrawal
                .clone()
                .unwrap_or_else(|| flow_cell(row.withdrawal)),
            source
                .deposit
                .clone()
                .unwrap_or_else(|| flow_cell(row.deposit)),
            source
                .balance
                .clone()
                .unwrap_or_else(|| row.balance.to_string()),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn flow_cell(value: i64) -> String {
    if value == 0 {
        String::new()
    } else {
        value.to_string()
    }
}
