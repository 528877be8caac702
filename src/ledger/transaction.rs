//! Transaction record type and free-text parsing.
//!
//! A recordable message looks like `<owner> <sum> <comment...> <purpose>`,
//! e.g. `Alice 50usd lunch with team Food`. The comment part is optional.

use std::fmt;

/// Currency class inferred from the sum token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    /// Dollar amounts: sum token contains `$` or `usd`.
    Usd,
    /// Everything else is treated as so'm.
    Som,
}

impl Currency {
    /// Marker text used in replies and as the stored value.
    pub fn marker(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Som => "so'm",
        }
    }

    /// Inverse of [`Currency::marker`] for rows read back from the store.
    pub fn from_marker(s: &str) -> Self {
        if s == "$" { Currency::Usd } else { Currency::Som }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// One parsed ledger entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub owner: String,
    pub sum: f64,
    pub currency: Currency,
    pub purpose: String,
    pub comment: String,
}

/// Parse a free-text message into a [`Transaction`].
///
/// Tokens are split on single spaces. The first token is the owner, the
/// second the sum, the last the purpose; everything in between is the
/// comment. Returns `None` for fewer than 3 tokens, or when the sum token
/// carries no parseable number (a `NaN` row helps nobody).
pub fn parse_message(text: &str) -> Option<Transaction> {
    let parts: Vec<&str> = text.split(' ').collect();
    if parts.len() < 3 {
        return None;
    }

    let owner = parts[0].to_string();
    let sum_token = parts[1];
    let purpose = parts[parts.len() - 1].to_string();
    let comment = parts[2..parts.len() - 1].join(" ");

    let numeric: String = sum_token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let sum: f64 = numeric.parse().ok().filter(|s: &f64| s.is_finite())?;

    let currency = if sum_token.to_lowercase().contains("usd") || sum_token.contains('$') {
        Currency::Usd
    } else {
        Currency::Som
    };

    Some(Transaction { owner, sum, currency, purpose, comment })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_message() {
        let tx = parse_message("Alice 50usd lunch with team Food").unwrap();
        assert_eq!(tx.owner, "Alice");
        assert_eq!(tx.sum, 50.0);
        assert_eq!(tx.currency, Currency::Usd);
        assert_eq!(tx.comment, "lunch with team");
        assert_eq!(tx.purpose, "Food");
    }

    #[test]
    fn test_local_currency_default() {
        let tx = parse_message("Bob 100000 groceries Food").unwrap();
        assert_eq!(tx.owner, "Bob");
        assert_eq!(tx.sum, 100000.0);
        assert_eq!(tx.currency, Currency::Som);
        assert_eq!(tx.comment, "groceries");
        assert_eq!(tx.purpose, "Food");
    }

    #[test]
    fn test_too_few_tokens() {
        assert!(parse_message("").is_none());
        assert!(parse_message("Alice").is_none());
        assert!(parse_message("Alice 50").is_none());
    }

    #[test]
    fn test_minimum_tokens_has_empty_comment() {
        let tx = parse_message("Alice 50 Food").unwrap();
        assert_eq!(tx.comment, "");
        assert_eq!(tx.purpose, "Food");
    }

    #[test]
    fn test_multi_word_comment_rejoined() {
        let tx = parse_message("Alice 50 a b c Food").unwrap();
        assert_eq!(tx.comment, "a b c");
    }

    #[test]
    fn test_dollar_sign_marks_usd() {
        let tx = parse_message("Alice $50 taxi Transport").unwrap();
        assert_eq!(tx.currency, Currency::Usd);
        assert_eq!(tx.sum, 50.0);
    }

    #[test]
    fn test_usd_marker_is_case_insensitive() {
        assert_eq!(parse_message("A 50USD x P").unwrap().currency, Currency::Usd);
        assert_eq!(parse_message("A 50Usd x P").unwrap().currency, Currency::Usd);
    }

    #[test]
    fn test_usd_inside_larger_token() {
        assert_eq!(parse_message("A 50usd. x P").unwrap().currency, Currency::Usd);
    }

    #[test]
    fn test_decimal_and_negative_sums() {
        assert_eq!(parse_message("A 12.5 x P").unwrap().sum, 12.5);
        assert_eq!(parse_message("A -300 refund P").unwrap().sum, -300.0);
    }

    #[test]
    fn test_digit_free_sum_is_rejected() {
        assert!(parse_message("Alice abc lunch Food").is_none());
        assert!(parse_message("Alice $ lunch Food").is_none());
        assert!(parse_message("Alice - lunch Food").is_none());
    }

    #[test]
    fn test_mangled_sum_is_rejected() {
        assert!(parse_message("Alice 1.2.3 lunch Food").is_none());
        assert!(parse_message("Alice 5-3 lunch Food").is_none());
    }

    #[test]
    fn test_double_space_yields_empty_sum_token() {
        // split(' ') keeps empty tokens, so "Alice  50 Food" puts "" in the
        // sum slot and the message is malformed.
        assert!(parse_message("Alice  50 Food").is_none());
    }

    #[test]
    fn test_currency_marker_roundtrip() {
        assert_eq!(Currency::from_marker(Currency::Usd.marker()), Currency::Usd);
        assert_eq!(Currency::from_marker(Currency::Som.marker()), Currency::Som);
        assert_eq!(Currency::from_marker("anything else"), Currency::Som);
    }

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Usd.to_string(), "$");
        assert_eq!(Currency::Som.to_string(), "so'm");
    }
}
