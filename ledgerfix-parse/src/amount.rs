/// Characters treated as grouping separators or padding inside an amount.
const IGNORED: &[char] = &[',', '，', ' ', '\u{3000}'];

/// Parse a whole-unit monetary amount.
///
/// Grouping separators and spaces are removed. Empty or unparseable input reads as `0`, since an
/// empty flow-direction cell is the common case rather than an error.
pub fn parse_amount(text: &str) -> i64 {
    let cleaned: String = text.trim().chars().filter(|c| !IGNORED.contains(c)).collect();
    if cleaned.is_empty() {
        return 0;
    }
    cleaned.parse::<i64>().unwrap_or(0)
}
