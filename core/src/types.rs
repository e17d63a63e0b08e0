//! Shared primitive types used across the exchange.

/// A point amount. Signed so that callers may pass through
/// unvalidated input; every operation treats values <= 0 explicitly.
pub type Points = i64;

/// A stable user identifier, owned by the external account system.
pub type UserId = String;

/// A stable, unique identifier for a persisted record.
pub type EntityId = String;

/// Round a dollar figure to whole cents, half away from zero.
pub fn round_cents(dollars: f64) -> f64 {
    (dollars * 100.0).round() / 100.0
}

/// Round a fractional point amount to whole points, half away from zero.
/// The single rounding rule for every point computation in the crate.
pub fn round_points(points: f64) -> Points {
    points.round() as Points
}

/// Format a dollar figure the way it is shown to users: `$1,234.56`.
pub fn format_dollars(dollars: f64) -> String {
    let cents = (round_cents(dollars.abs()) * 100.0).round() as i64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if dollars < 0.0 && cents != 0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_points(1249.5), 1250);
        assert_eq!(round_points(1249.49), 1249);
        assert_eq!(round_cents(18.756), 18.76);
    }

    #[test]
    fn dollars_are_grouped_and_padded() {
        assert_eq!(format_dollars(18.75), "$18.75");
        assert_eq!(format_dollars(1234567.8), "$1,234,567.80");
        assert_eq!(format_dollars(0.0), "$0.00");
        assert_eq!(format_dollars(-5.5), "-$5.50");
    }
}
