#![no_main]

//! Fuzz target for cell-level parsing: amounts, dates and whole ledger tables.

use ledgerfix_parse::{ColumnMap, parse_amount, parse_date, read_ledger};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Tables are read from raw bytes; invalid UTF-8 must not abort the read.
    if let Ok(parsed) = read_ledger(data, &ColumnMap::default()) {
        for (i, row) in parsed.rows.iter().enumerate() {
            assert_eq!(row.line, i as u64 + 2);
        }
    }

    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let _ = parse_amount(s);
    let _ = parse_date(s);
});
