use chrono::NaiveDate;
use thiserror::Error;

/// A calendar era whose year 1 is `base_year + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Era {
    pub tag: char,
    pub base_year: i32,
}

/// Supported eras, matched by leading letter. Adding an era is one entry here.
pub const ERA_TABLE: &[Era] = &[
    // Reiwa
    Era {
        tag: 'R',
        base_year: 2018,
    },
    // Heisei
    Era {
        tag: 'H',
        base_year: 1988,
    },
    // Showa
    Era {
        tag: 'S',
        base_year: 1925,
    },
];

/// Standard formats, tried in this order after era notation.
const STANDARD_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d", "%Y.%m.%d", "%Y年%m月%d日"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("unrecognized date: {0:?}")]
    Unrecognized(String),

    #[error("date out of calendar range: {0:?}")]
    OutOfRange(String),
}

/// Parse a statement date into a calendar date.
///
/// Era notation (`R6.1.15`) is tried first, then each of the standard formats. The first rule that
/// matches wins.
pub fn parse_date(text: &str) -> Result<NaiveDate, DateParseError> {
    let text = text.trim();
    let mut out_of_range = false;

    if let Some((era, rest)) = split_era(text)
        && let Some((era_year, month, day)) = parse_era_fields(rest)
    {
        let date = era
            .base_year
            .checked_add(era_year)
            .and_then(|year| NaiveDate::from_ymd_opt(year, month, day));
        match date {
            Some(d) => return Ok(d),
            None => out_of_range = true,
        }
    }

    for fmt in STANDARD_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return Ok(d);
        }
    }

    if out_of_range {
        Err(DateParseError::OutOfRange(text.to_string()))
    } else {
        Err(DateParseError::Unrecognized(text.to_string()))
    }
}

fn split_era(text: &str) -> Option<(&'static Era, &str)> {
    let mut chars = text.chars();
    let first = chars.next()?;
    let era = ERA_TABLE.iter().find(|e| e.tag == first)?;
    Some((era, chars.as_str()))
}

/// `<era-year>.<month>.<day>`; each field a plain integer.
fn parse_era_fields(rest: &str) -> Option<(i32, u32, u32)> {
    let parts: Vec<&str> = rest.split('.').collect();
    let [year, month, day] = parts.as_slice() else {
        return None;
    };
    Some((
        year.trim().parse().ok()?,
        month.trim().parse().ok()?,
        day.trim().parse().ok()?,
    ))
}
