//! Hymn number parsing
//!
//! Turns free-form user text such as `"1-3, 8; 12-10 20"` into an ordered
//! list of hymn numbers. Parsing is best-effort: tokens that are not a
//! number or a range are dropped rather than reported as errors.

use std::sync::LazyLock;

use regex::Regex;

/// A hymn number (0 to 9999, at most four decimal digits)
pub type ItemNumber = u32;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,;]+").expect("separator pattern is valid"));

static RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,4})-([0-9]{1,4})$").expect("range pattern is valid")
});

static SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,4}$").expect("number pattern is valid"));

/// A single token of user input after splitting on separators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeToken {
    /// A lone number, e.g. `42`
    Single(ItemNumber),
    /// An inclusive range, ascending or descending, e.g. `12-5`
    Range { start: ItemNumber, end: ItemNumber },
}

impl RangeToken {
    /// Parse one token, returning `None` for anything that is not a
    /// 1-4 digit number or a `<digits>-<digits>` range
    pub fn parse(token: &str) -> Option<Self> {
        if let Some(caps) = RANGE.captures(token) {
            let start = caps[1].parse().ok()?;
            let end = caps[2].parse().ok()?;
            return Some(RangeToken::Range { start, end });
        }

        if SINGLE.is_match(token) {
            return token.parse().ok().map(RangeToken::Single);
        }

        None
    }

    /// Append the numbers this token stands for, in stepped order
    fn expand_into(self, out: &mut Vec<ItemNumber>) {
        match self {
            RangeToken::Single(n) => out.push(n),
            RangeToken::Range { start, end } if start <= end => out.extend(start..=end),
            RangeToken::Range { start, end } => out.extend((end..=start).rev()),
        }
    }
}

/// Result of parsing with the dropped tokens kept for reporting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Parsed numbers in input order, duplicates preserved
    pub numbers: Vec<ItemNumber>,
    /// Tokens that were ignored because they were not numbers or ranges
    pub rejected: Vec<String>,
}

/// Parse hymn numbers from user input
///
/// Accepted forms, separated by any mix of whitespace, commas and semicolons:
/// - `7` → a single number
/// - `1-5` → 1, 2, 3, 4, 5
/// - `5-1` → 5, 4, 3, 2, 1
///
/// Order and duplicates are preserved. Anything else is silently skipped.
///
/// # Example
///
/// ```
/// use hymn_combiner::numbers::parse_item_numbers;
///
/// assert_eq!(parse_item_numbers("1-3, 8;10"), vec![1, 2, 3, 8, 10]);
/// assert_eq!(parse_item_numbers("5-3 abc"), vec![5, 4, 3]);
/// ```
pub fn parse_item_numbers(raw: &str) -> Vec<ItemNumber> {
    parse_item_numbers_verbose(raw).numbers
}

/// Like [`parse_item_numbers`], but also returns the tokens that were dropped
pub fn parse_item_numbers_verbose(raw: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    let raw = raw.trim();
    if raw.is_empty() {
        return outcome;
    }

    for token in SEPARATORS.split(raw).filter(|t| !t.is_empty()) {
        match RangeToken::parse(token) {
            Some(parsed) => parsed.expand_into(&mut outcome.numbers),
            None => outcome.rejected.push(token.to_string()),
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_order_and_duplicates() {
        assert_eq!(parse_item_numbers("3 1 3"), vec![3, 1, 3]);
    }

    #[test]
    fn test_ascending_range() {
        assert_eq!(parse_item_numbers("1-3"), vec![1, 2, 3]);
    }

    #[test]
    fn test_descending_range() {
        assert_eq!(parse_item_numbers("5-3"), vec![5, 4, 3]);
        assert_eq!(
            parse_item_numbers("12-5"),
            vec![12, 11, 10, 9, 8, 7, 6, 5]
        );
    }

    #[test]
    fn test_degenerate_range() {
        assert_eq!(parse_item_numbers("4-4"), vec![4]);
    }

    #[test]
    fn test_mixed_separators() {
        let expected = vec![1, 2, 3];
        assert_eq!(parse_item_numbers("1,2;3"), expected);
        assert_eq!(parse_item_numbers("1 2 3"), expected);
        assert_eq!(parse_item_numbers(" ,1 ,; 2\t\n3;; "), expected);
        assert_eq!(parse_item_numbers("1, 2;3   4-5"), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_garbage_tokens_dropped() {
        assert_eq!(parse_item_numbers("1 abc 2-x 3"), vec![1, 3]);
        assert_eq!(parse_item_numbers("1--3 -2 4- 5-6-7"), Vec::<ItemNumber>::new());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_item_numbers("").is_empty());
        assert!(parse_item_numbers("   \t ").is_empty());
        assert!(parse_item_numbers(",;,").is_empty());
    }

    #[test]
    fn test_digit_count_bound() {
        assert_eq!(parse_item_numbers("9999 10000 0"), vec![9999, 0]);
        assert_eq!(parse_item_numbers("1-10000"), Vec::<ItemNumber>::new());
        assert_eq!(parse_item_numbers("0007"), vec![7]);
    }

    #[test]
    fn test_verbose_reports_rejected_tokens() {
        let outcome = parse_item_numbers_verbose("1 abc 2-x 3");
        assert_eq!(outcome.numbers, vec![1, 3]);
        assert_eq!(outcome.rejected, vec!["abc".to_string(), "2-x".to_string()]);
    }

    #[test]
    fn test_range_token_parse() {
        assert_eq!(RangeToken::parse("42"), Some(RangeToken::Single(42)));
        assert_eq!(
            RangeToken::parse("12-5"),
            Some(RangeToken::Range { start: 12, end: 5 })
        );
        assert_eq!(RangeToken::parse("12345"), None);
        assert_eq!(RangeToken::parse("+4"), None);
        assert_eq!(RangeToken::parse(""), None);
    }
}
