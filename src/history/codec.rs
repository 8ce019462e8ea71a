//! Comma-separated text form of the session history.

use log::debug;

pub const SEPARATOR: char = ',';

/// Parses one stored field. Anything that is not a non-negative integer is rejected.
pub fn parse_field(field: &str) -> Option<u64> {
    field.parse::<u64>().ok()
}

/// Splits `raw` on commas and keeps the fields that parse, in order.
pub fn parse_history(raw: &str) -> Vec<u64> {
    raw.split(SEPARATOR)
        .filter_map(|field| {
            let parsed = parse_field(field);
            if parsed.is_none() && !field.is_empty() {
                debug!("Discarding unparseable history field {field:?}");
            }
            parsed
        })
        .collect()
}

pub fn join_history(entries: &[u64]) -> String {
    entries
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_is_empty_history() {
        assert!(parse_history("").is_empty());
        assert_eq!(join_history(&[]), "");
    }

    #[test]
    fn test_parse_keeps_order_and_duplicates() {
        assert_eq!(parse_history("5,120,5,3600"), vec![5, 120, 5, 3600]);
    }

    #[test]
    fn test_parse_discards_bad_fields() {
        assert_eq!(parse_history("5,abc,,-3,7, 9,12"), vec![5, 7, 12]);
    }

    #[test]
    fn test_negative_field_is_rejected() {
        assert_eq!(parse_field("-3"), None);
        assert_eq!(parse_field("+3"), Some(3));
        assert_eq!(parse_field("0"), Some(0));
    }

    #[test]
    fn test_join() {
        assert_eq!(join_history(&[5]), "5");
        assert_eq!(join_history(&[5, 0, 42]), "5,0,42");
    }

    #[test]
    fn test_join_then_parse_is_identity() {
        let entries = vec![0, 1, 59, 60, 3600, 359_999, 360_000, 1, 1];
        assert_eq!(parse_history(&join_history(&entries)), entries);
    }
}
