use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Drops every character that is not a digit, `.` or `-`.
/// `"₹1,250.50"` becomes `"1250.50"`.
pub fn strip_non_numeric(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Parses the longest leading decimal number of `s`, ignoring whatever
/// follows it. Returns `None` when no digit is found at the start.
///
/// # Examples
/// - `"12.5.3"` → `Some(12.5)`
/// - `"1-2"` → `Some(1.0)`
/// - `"-"` → `None`
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        let mut frac_digits = 0;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            frac_digits += 1;
        }
        if digits + frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }

    if digits == 0 {
        return None;
    }

    s[..end].parse::<f64>().ok()
}

/// Cleans a spreadsheet cell down to a number, e.g. `"₹ 75,000"` → `75000.0`.
pub fn parse_money(raw: &str) -> Option<f64> {
    parse_leading_float(&strip_non_numeric(raw))
}

/// Truncates to at most `max_units` UTF-16 code units without splitting a
/// character.
pub fn truncate_utf16(s: &str, max_units: usize) -> String {
    let mut units = 0;
    let mut out = String::new();
    for c in s.chars() {
        units += c.len_utf16();
        if units > max_units {
            break;
        }
        out.push(c);
    }
    out
}

/// First `n` characters of `s`.
pub fn take_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Best-effort date parse over the formats bank exports commonly use.
pub fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Short month + day, e.g. `"Dec 1"`.
pub fn short_month_day(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Case-insensitive check for any of `needles` inside `haystack`.
/// `needles` must already be lowercase.
pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    needles.iter().any(|needle| lower.contains(needle))
}

/// First header (in table order) whose lowercased name contains any keyword.
pub fn find_header<'a>(headers: &'a [String], keywords: &[&str]) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| contains_any(h, keywords))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_non_numeric() {
        assert_eq!(strip_non_numeric("₹890"), "890");
        assert_eq!(strip_non_numeric("$1,250.50"), "1250.50");
        assert_eq!(strip_non_numeric("(45.00) DR"), "45.00");
        assert_eq!(strip_non_numeric("abc"), "");
    }

    #[test]
    fn test_parse_leading_float_prefix_semantics() {
        assert_eq!(parse_leading_float("12.5.3"), Some(12.5));
        assert_eq!(parse_leading_float("1-2"), Some(1.0));
        assert_eq!(parse_leading_float("-45"), Some(-45.0));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("5."), Some(5.0));
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float("--5"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float(""), None);
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("₹ 75,000"), Some(75000.0));
        assert_eq!(parse_money("-2,450.00"), Some(-2450.0));
        assert_eq!(parse_money("n/a"), None);
    }

    #[test]
    fn test_truncate_utf16_keeps_surrogate_pairs_whole() {
        assert_eq!(truncate_utf16("abcdef", 4), "abcd");
        assert_eq!(truncate_utf16("short", 50), "short");
        // "😀" is two UTF-16 code units
        assert_eq!(truncate_utf16("ab😀", 3), "ab");
        assert_eq!(truncate_utf16("ab😀", 4), "ab😀");
        assert_eq!(truncate_utf16("₹890", 2), "₹8");
    }

    #[test]
    fn test_parse_loose_date_formats() {
        let dec1 = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(parse_loose_date("2024-12-01"), Some(dec1));
        assert_eq!(parse_loose_date("12/01/2024"), Some(dec1));
        assert_eq!(parse_loose_date("2024/12/01"), Some(dec1));
        assert_eq!(parse_loose_date("01-Dec-2024"), Some(dec1));
        assert_eq!(parse_loose_date("Dec 01, 2024"), Some(dec1));
        assert_eq!(parse_loose_date("2024-12-01T09:30:00Z"), Some(dec1));
        assert_eq!(parse_loose_date("2024-12-01 09:30:00"), Some(dec1));
        assert_eq!(parse_loose_date("yesterday"), None);
        assert_eq!(parse_loose_date("   "), None);
    }

    #[test]
    fn test_short_month_day_has_no_padding() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(short_month_day(date), "Dec 1");
        let date = NaiveDate::from_ymd_opt(2024, 3, 22).unwrap();
        assert_eq!(short_month_day(date), "Mar 22");
    }

    #[test]
    fn test_find_header_is_case_insensitive_and_ordered() {
        let headers = vec![
            "Txn Date".to_string(),
            "Narration".to_string(),
            "Value Date".to_string(),
        ];
        assert_eq!(find_header(&headers, &["date"]), Some("Txn Date"));
        assert_eq!(
            find_header(&headers, &["description", "narration"]),
            Some("Narration")
        );
        assert_eq!(find_header(&headers, &["amount"]), None);
    }
}
