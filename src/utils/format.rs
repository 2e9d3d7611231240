//! Number and text formatting utilities.
//!
//! This module provides common formatting functions used across commands
//! for consistent output presentation.

/// Formats a number with comma separators for thousands.
///
/// # Examples
///
/// ```
/// use access_audit::utils::format::format_number;
///
/// assert_eq!(format_number(1234), "1,234");
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Counted noun for report headings.
///
/// A count of one keeps the number only for "user"; "the last day" reads
/// better than "the last 1 day".
///
/// ```
/// use access_audit::utils::format::pluralise;
///
/// assert_eq!(pluralise("user", 1), "1 user");
/// assert_eq!(pluralise("day", 1), "day");
/// assert_eq!(pluralise("day", 30), "30 days");
/// ```
pub fn pluralise(word: &str, count: usize) -> String {
    match count {
        1 if word == "user" => "1 user".to_string(),
        1 => word.to_string(),
        _ => format!("{} {}s", count, word),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(123_456), "123,456");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_pluralise() {
        assert_eq!(pluralise("user", 0), "0 users");
        assert_eq!(pluralise("user", 1), "1 user");
        assert_eq!(pluralise("user", 2), "2 users");
        assert_eq!(pluralise("day", 1), "day");
        assert_eq!(pluralise("day", 7), "7 days");
    }
}
