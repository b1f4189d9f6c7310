//! Conversion between major-unit decimal amounts and integer minor units.

/// Converts a major-unit amount (`315.00`) to minor units (`31500`), rounding half away from zero.
///
/// Accepts JSON numbers and numeric strings. Rounding works on the decimal digits, so `0.285`
/// becomes `29` even though the nearest `f64` sits just below it. Returns `None` for anything
/// else, or when the amount does not fit in an `i64`.
pub fn to_minor_units(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(number) => decimal_to_minor_units(&number.to_string()),
        serde_json::Value::String(text) => decimal_to_minor_units(text),
        _ => None,
    }
}

/// Shifts the decimal point of `[+-]digits[.digits][e[+-]digits]` two places right and rounds.
fn decimal_to_minor_units(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], unsigned[at + 1..].parse::<i32>().ok()?),
        None => (unsigned, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = format!("{}{}", whole, fraction);
    let significant = digits.trim_start_matches('0');
    // Index into `significant` where the minor-unit integer part ends.
    let point = whole.len() as i64 - (digits.len() - significant.len()) as i64
        + i64::from(exponent)
        + 2;

    if significant.is_empty() || point < 0 {
        return Some(0);
    }
    if point > 19 {
        return None;
    }

    let point = point as usize;
    let mut minor: i64 = 0;
    for position in 0..point {
        let digit = significant.as_bytes().get(position).map_or(0, |b| b - b'0');
        minor = minor.checked_mul(10)?.checked_add(i64::from(digit))?;
    }
    if significant.as_bytes().get(point).is_some_and(|b| *b >= b'5') {
        minor = minor.checked_add(1)?;
    }

    Some(if negative { -minor } else { minor })
}

/// Formats minor units as a two-decimal amount with thousands grouping: `123456` -> `1,234.56`.
pub fn format_minor_units(minor: i64) -> String {
    let negative = minor < 0;
    let magnitude = minor.unsigned_abs();
    let whole = (magnitude / 100).to_string();
    let fraction = magnitude % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!(
        "{}{}.{:02}",
        if negative { "-" } else { "" },
        grouped,
        fraction
    )
}
