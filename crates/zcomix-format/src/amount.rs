//! Contribution amount validation

use crate::error::FormatError;
use once_cell::sync::OnceCell;
use regex::Regex;

/// An amount that passed validation, always ending in exactly two decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAmount(String);

impl NormalizedAmount {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NormalizedAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate a contribution amount and pad its decimals to two digits.
///
/// Accepts one or more digits, at most one `,ddd` group, and an optional
/// point followed by up to two digits. Signs are not part of the grammar.
pub fn validate_amount(raw: &str) -> Result<NormalizedAmount, FormatError> {
    static AMOUNT_PATTERN: OnceCell<Regex> = OnceCell::new();
    let amount_regex = AMOUNT_PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9]+(?:,[0-9]{3})?(?:\.[0-9]{0,2})?$").unwrap()
    });

    if !amount_regex.is_match(raw) {
        return Err(FormatError::InvalidAmount { input: raw.to_string() });
    }

    let normalized = match raw.split_once('.') {
        Some((_, decimals)) if decimals.len() == 2 => raw.to_string(),
        Some((_, decimals)) if decimals.len() == 1 => format!("{}0", raw),
        Some(_) => format!("{}00", raw),
        None => format!("{}.00", raw),
    };

    Ok(NormalizedAmount(normalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(raw: &str) -> String {
        validate_amount(raw).unwrap().into_string()
    }

    #[test]
    fn test_pads_decimals() {
        assert_eq!(ok("10"), "10.00");
        assert_eq!(ok("10."), "10.00");
        assert_eq!(ok("10.5"), "10.50");
        assert_eq!(ok("10.55"), "10.55");
        assert_eq!(ok("0"), "0.00");
    }

    #[test]
    fn test_single_group() {
        assert_eq!(ok("1,234"), "1,234.00");
        assert_eq!(ok("1,234.5"), "1,234.50");
        assert_eq!(ok("12,345.67"), "12,345.67");
    }

    #[test]
    fn test_rejects_invalid() {
        for raw in [
            "", "abc", "-5", "+5", "12.345", "1,234,567", "1,23", ".5", "1.2.3",
            " 10", "10 ", "10a", "1,2345", "١٢",
        ] {
            assert_eq!(
                validate_amount(raw),
                Err(FormatError::InvalidAmount { input: raw.to_string() }),
                "{:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_only_pads() {
        for raw in ["7", "7.", "7.1", "7.12", "007", "9,999.9"] {
            let normalized = ok(raw);
            assert!(normalized.starts_with(raw));
            let (_, decimals) = normalized.split_once('.').unwrap();
            assert_eq!(decimals.len(), 2);
        }
    }

    #[test]
    fn test_display() {
        let amount = validate_amount("3.5").unwrap();
        assert_eq!(amount.to_string(), "3.50");
        assert_eq!(amount.as_str(), "3.50");
    }
}
