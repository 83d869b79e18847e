//! Reference orderings: ground truth extracted independently of the ledger (for example from the
//! scanned statement image).
//!
//! Two formats are accepted:
//! - JSON: an array of `{ "date", "description", "amount" }` objects. The keys `日付`, `摘要` and
//!   `金額` are accepted as aliases.
//! - Text: one `date,description,amount` entry per line. Blank lines and lines starting with `#`
//!   are ignored. The first field is the date and the last is the amount; anything between is the
//!   description, so amounts in this format must not use grouping commas.

use crate::amount::parse_amount;
use ledgerfix_types::ledger::ReferenceEntry;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceFormat {
    Json,
    Text,
}

impl ReferenceFormat {
    /// `.json` (any case) selects JSON; everything else is line text.
    pub fn from_path(path: &str) -> Self {
        if path.to_ascii_lowercase().ends_with(".json") {
            ReferenceFormat::Json
        } else {
            ReferenceFormat::Text
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ReferenceLoadError {
    #[error("json parse error: {message}")]
    Json { message: String },

    #[error("entry {index}: amount {value} is not a whole number")]
    FractionalAmount { index: usize, value: f64 },
}

/// A text line that could not be read as an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: u64,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    pub entries: Vec<ReferenceEntry>,
    pub skipped: Vec<SkippedLine>,
}

#[derive(Deserialize)]
struct JsonEntry {
    #[serde(default, alias = "日付")]
    date: JsonScalar,

    #[serde(default, alias = "摘要")]
    description: JsonScalar,

    #[serde(default, alias = "金額")]
    amount: JsonScalar,
}

#[derive(Deserialize, Default)]
#[serde(untagged)]
enum JsonScalar {
    Int(i64),
    Float(f64),
    Text(String),
    #[default]
    Null,
}

impl JsonScalar {
    fn into_text(self) -> String {
        match self {
            JsonScalar::Int(n) => n.to_string(),
            JsonScalar::Float(n) => n.to_string(),
            JsonScalar::Text(s) => s.trim().to_string(),
            JsonScalar::Null => String::new(),
        }
    }

    /// Fails with the float itself when it has a fractional part or is outside the `i64` range.
    fn into_amount(self) -> Result<i64, f64> {
        match self {
            JsonScalar::Int(n) => Ok(n),
            JsonScalar::Float(n) => {
                // i64::MIN as f64 is exactly -2^63 and i64::MAX as f64 rounds up to 2^63.
                let in_range = n >= i64::MIN as f64 && n < i64::MAX as f64;
                if n.fract() == 0.0 && in_range {
                    Ok(n as i64)
                } else {
                    Err(n)
                }
            }
            JsonScalar::Text(s) => Ok(parse_amount(&s)),
            JsonScalar::Null => Ok(0),
        }
    }
}

pub fn parse_reference(
    text: &str,
    format: ReferenceFormat,
) -> Result<ReferenceSet, ReferenceLoadError> {
    let set = match format {
        ReferenceFormat::Json => parse_json(text)?,
        ReferenceFormat::Text => parse_text(text),
    };
    debug!(
        entries = set.entries.len(),
        skipped = set.skipped.len(),
        "parsed reference ordering"
    );
    Ok(set)
}

fn parse_json(text: &str) -> Result<ReferenceSet, ReferenceLoadError> {
    let raw: Vec<JsonEntry> = serde_json::from_str(text).map_err(|e| ReferenceLoadError::Json {
        message: e.to_string(),
    })?;
    let mut entries = Vec::with_capacity(raw.len());
    for (index, e) in raw.into_iter().enumerate() {
        let amount = e
            .amount
            .into_amount()
            .map_err(|value| ReferenceLoadError::FractionalAmount { index, value })?;
        entries.push(ReferenceEntry {
            date: e.date.into_text(),
            description: e.description.into_text(),
            amount,
        });
    }
    Ok(ReferenceSet {
        entries,
        skipped: vec![],
    })
}

fn parse_text(text: &str) -> ReferenceSet {
    let mut set = ReferenceSet::default();
    for (n, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        match fields.as_slice() {
            [date, middle @ .., amount] if !middle.is_empty() => {
                set.entries.push(ReferenceEntry {
                    date: date.trim().to_string(),
                    description: middle.join(",").trim().to_string(),
                    amount: parse_amount(amount),
                });
            }
            _ => set.skipped.push(SkippedLine {
                line: n as u64 + 1,
                content: line.to_string(),
            }),
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(date: &str, description: &str, amount: i64) -> ReferenceEntry {
        ReferenceEntry {
            date: date.to_string(),
            description: description.to_string(),
            amount,
        }
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ReferenceFormat::from_path("order.json"), ReferenceFormat::Json);
        assert_eq!(ReferenceFormat::from_path("ORDER.JSON"), ReferenceFormat::Json);
        assert_eq!(ReferenceFormat::from_path("order.txt"), ReferenceFormat::Text);
        assert_eq!(ReferenceFormat::from_path("order"), ReferenceFormat::Text);
    }

    #[test]
    fn text_skips_blank_and_comment_lines() {
        let text = "# extracted from page 1\n\n2025/11/04,AD,71770\n  \n2025/11/05,ATM,-3000\n";
        let set = parse_reference(text, ReferenceFormat::Text).unwrap();
        assert_eq!(
            set.entries,
            vec![entry("2025/11/04", "AD", 71770), entry("2025/11/05", "ATM", -3000)]
        );
        assert!(set.skipped.is_empty());
    }

    #[test]
    fn text_keeps_commas_inside_description() {
        let set = parse_reference("2025/11/04, ﾌﾘｺﾐ,ﾀﾅｶ ,500\n", ReferenceFormat::Text).unwrap();
        assert_eq!(set.entries, vec![entry("2025/11/04", "ﾌﾘｺﾐ,ﾀﾅｶ", 500)]);
    }

    #[test]
    fn text_short_lines_are_skipped_with_line_number() {
        let set = parse_reference("2025/11/04,AD,1\nbroken,line\n", ReferenceFormat::Text).unwrap();
        assert_eq!(set.entries.len(), 1);
        assert_eq!(
            set.skipped,
            vec![SkippedLine {
                line: 2,
                content: "broken,line".to_string()
            }]
        );
    }

    #[test]
    fn json_with_english_keys() {
        let text = r#"[{"date": "2025/11/04", "description": "AD", "amount": 71770}]"#;
        let set = parse_reference(text, ReferenceFormat::Json).unwrap();
        assert_eq!(set.entries, vec![entry("2025/11/04", "AD", 71770)]);
    }

    #[test]
    fn json_with_japanese_keys_and_string_amount() {
        let text = r#"[{"日付": "R7.11.4", "摘要": "AD", "金額": "71,770"}]"#;
        let set = parse_reference(text, ReferenceFormat::Json).unwrap();
        assert_eq!(set.entries, vec![entry("R7.11.4", "AD", 71770)]);
    }

    #[test]
    fn json_missing_fields_default() {
        let set = parse_reference(r#"[{"date": "2025/11/04"}]"#, ReferenceFormat::Json).unwrap();
        assert_eq!(set.entries, vec![entry("2025/11/04", "", 0)]);
    }

    #[test]
    fn json_whole_float_amounts_are_accepted() {
        let text = r#"[{"日付": "2025/11/04", "摘要": "AD", "金額": 71770.0},
                       {"日付": "2025/11/05", "摘要": "ATM", "金額": -3000.0}]"#;
        let set = parse_reference(text, ReferenceFormat::Json).unwrap();
        assert_eq!(
            set.entries,
            vec![entry("2025/11/04", "AD", 71770), entry("2025/11/05", "ATM", -3000)]
        );
    }

    #[test]
    fn json_fractional_amount_is_an_error() {
        let text = r#"[
            {"date": "2025/11/04", "amount": 1},
            {"date": "2025/11/05", "amount": 10.5}
        ]"#;
        let err = parse_reference(text, ReferenceFormat::Json).unwrap_err();
        assert_eq!(err.to_string(), "entry 1: amount 10.5 is not a whole number");
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = parse_reference("{not json", ReferenceFormat::Json).unwrap_err();
        assert!(err.to_string().contains("json parse error"));
    }
}
