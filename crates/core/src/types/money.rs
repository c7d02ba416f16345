//! Ruble amount formatting.
//!
//! Amounts travel as JSON numbers and are held as [`Decimal`] so sums and
//! averages never pick up binary floating point noise on screen.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency sign prefixed to every rendered amount.
pub const CURRENCY_SIGN: &str = "₽";

/// Format an amount with thousands separators (e.g. `₽12,000`, `₽1,234.50`).
///
/// Whole amounts are printed without a fractional part.
#[must_use]
pub fn format_rub(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();

    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(format!("{frac:0<2}"))),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + 8);
    if negative {
        out.push('-');
    }
    out.push_str(CURRENCY_SIGN);
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Format an amount in compact form for dashboard cards (`₽189K`, `₽2.4M`).
#[must_use]
pub fn format_rub_compact(amount: Decimal) -> String {
    let thousand = Decimal::from(1_000);
    let million = Decimal::from(1_000_000);
    let abs = amount.abs();

    let (scaled, suffix) = if abs >= million {
        (amount / million, "M")
    } else if abs >= thousand {
        (amount / thousand, "K")
    } else {
        return format_rub(amount);
    };

    let scaled = scaled
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("{CURRENCY_SIGN}{scaled}{suffix}")
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
