//! Number formatting for numeric input fields

use once_cell::sync::OnceCell;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use zcomix_config::FormatSettings;

/// A number read from the start of some field text
#[derive(Debug, Clone, PartialEq)]
struct LeadingNumber {
    negative: bool,
    /// Unsigned numeric text, e.g. `1234.5` or `1.5e3`
    text: String,
}

/// Format `num` according to `settings`.
///
/// Numeric input is rounded to `settings.places` (half away from zero),
/// gets `settings.point` as decimal separator and `settings.group` between
/// runs of three digits. Non-numeric input yields the `nan` fallback, or the
/// input itself when the fallback is `None`.
///
/// Re-formatting a formatted value returns it unchanged.
pub fn format_number(num: &str, settings: &FormatSettings) -> String {
    let Some(number) = read_leading_number(num, settings) else {
        log::debug!("format_number: {:?} is not numeric, using fallback", num);
        return match &settings.nan {
            Some(fallback) => fallback.clone(),
            None => num.to_string(),
        };
    };

    let Some((digits, is_zero)) = fixed_digits(&number.text, settings.places) else {
        log::debug!("format_number: {:?} is out of range, using fallback", num);
        return settings.nan.clone().unwrap_or_else(|| num.to_string());
    };

    let mut result = if settings.point == "." {
        digits
    } else {
        digits.replacen('.', &settings.point, 1)
    };

    if groupable(&settings.group) {
        let run = group_pattern();
        while run.is_match(&result) {
            result = run
                .replacen(&result, 1, |caps: &regex::Captures| {
                    format!("{}{}{}", &caps[1], settings.group, &caps[2])
                })
                .into_owned();
        }
    }

    // A value that rounds to zero prints unsigned so "-0.00" cannot appear
    // and re-formatting stays stable.
    let sign = if number.negative && !is_zero { "-" } else { "" };
    format!("{}{}{}{}", sign, settings.prefix, result, settings.suffix)
}

fn group_pattern() -> &'static Regex {
    static GROUP_RUN: OnceCell<Regex> = OnceCell::new();
    GROUP_RUN.get_or_init(|| Regex::new(r"([0-9]+)([0-9]{3})").unwrap())
}

/// A separator containing digits would feed the grouping loop forever.
fn groupable(group: &str) -> bool {
    !group.is_empty() && !group.chars().any(|c| c.is_ascii_digit())
}

/// Read the numeric prefix of `num`, ignoring the decorations `settings`
/// itself adds so that formatted values read back as the same number.
fn read_leading_number(num: &str, settings: &FormatSettings) -> Option<LeadingNumber> {
    static NUMBER_PREFIX: OnceCell<Regex> = OnceCell::new();
    let number_regex = NUMBER_PREFIX.get_or_init(|| {
        Regex::new(r"^(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?").unwrap()
    });

    let mut rest = num.trim();
    let mut negative = false;
    if let Some(stripped) = rest.strip_prefix('-') {
        negative = true;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }
    if !settings.prefix.is_empty() {
        rest = rest.strip_prefix(settings.prefix.as_str()).unwrap_or(rest);
    }
    if !settings.suffix.is_empty() {
        rest = rest.strip_suffix(settings.suffix.as_str()).unwrap_or(rest);
    }

    let mut plain = rest.to_string();
    if groupable(&settings.group) {
        plain = plain.replace(settings.group.as_str(), "");
    }
    if settings.point != "." && !settings.point.is_empty() {
        plain = plain.replace(settings.point.as_str(), ".");
    }

    let found = number_regex.find(&plain)?;
    Some(LeadingNumber {
        negative,
        text: found.as_str().to_string(),
    })
}

/// Fixed-point rendering of the unsigned numeric text with `places` decimals.
/// Also reports whether the rounded value is zero.
fn fixed_digits(text: &str, places: u32) -> Option<(String, bool)> {
    let mut mantissa = text.to_ascii_lowercase();
    if mantissa.starts_with('.') {
        mantissa.insert(0, '0');
    }
    let mantissa = mantissa.replace(".e", "e");
    let mantissa = mantissa.trim_end_matches('.');

    let parsed = if mantissa.contains('e') {
        Decimal::from_scientific(mantissa).ok()
    } else {
        Decimal::from_str(mantissa).ok()
    };

    match parsed {
        Some(value) => {
            let mut rounded =
                value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(places);
            // rescale stops short once the mantissa is full; the missing
            // digits are trailing zeros.
            let mut digits = rounded.to_string();
            let missing = places.saturating_sub(rounded.scale());
            if missing > 0 {
                if rounded.scale() == 0 {
                    digits.push('.');
                }
                digits.push_str(&"0".repeat(missing as usize));
            }
            Some((digits, rounded.is_zero()))
        }
        None => {
            // Beyond Decimal's range; fall back to binary floating point.
            let value = f64::from_str(mantissa).ok().filter(|v| v.is_finite())?;
            log::debug!("fixed_digits: {} exceeds decimal range", mantissa);
            let digits = format!("{:.*}", places as usize, value);
            Some((digits, value == 0.0))
        }
    }
}
