//! Money helpers
//!
//! Amounts travel as f64 euros in the backend rows; arithmetic that must be
//! exact goes through cents.

/// Euros to cents (rounded).
pub fn eur_to_cents(eur: f64) -> i64 {
    (eur * 100.0).round() as i64
}

/// Cents to euros.
pub fn cents_to_eur(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Format an amount the way Spanish tickets print it: thousands separated
/// with '.', decimals with ',', trailing euro sign.
///
/// # Examples
///
/// ```
/// use shared::money::format_eur;
///
/// assert_eq!(format_eur(12.5), "12,50 €");
/// assert_eq!(format_eur(1234567.891), "1.234.567,89 €");
/// ```
pub fn format_eur(amount: f64) -> String {
    let cents = eur_to_cents(amount);
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    let digits = whole.as_bytes();
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*digit as char);
    }

    format!("{sign}{grouped},{frac:02} €")
}

/// Share of `part` in `total` as a percentage. Zero when the total is zero.
pub fn pct(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eur_to_cents() {
        assert_eq!(eur_to_cents(12.50), 1250);
        assert_eq!(eur_to_cents(0.01), 1);
        assert_eq!(eur_to_cents(100.00), 10000);
        assert_eq!(eur_to_cents(0.00), 0);
        assert_eq!(eur_to_cents(-5.25), -525);
    }

    #[test]
    fn test_round_trip() {
        for price in [0.01, 0.99, 1.00, 12.50, 99.99, 100.00, 999.99] {
            let cents = eur_to_cents(price);
            let back = cents_to_eur(cents);
            assert!((back - price).abs() < 0.001, "Failed for {}", price);
        }
    }

    #[test]
    fn test_format_eur_zero() {
        assert_eq!(format_eur(0.0), "0,00 €");
        // Rounds away before the sign is decided
        assert_eq!(format_eur(-0.004), "0,00 €");
    }

    #[test]
    fn test_format_eur_negative() {
        assert_eq!(format_eur(-12.5), "-12,50 €");
        assert_eq!(format_eur(-1234.56), "-1.234,56 €");
    }

    #[test]
    fn test_format_eur_large() {
        assert_eq!(format_eur(1000.0), "1.000,00 €");
        assert_eq!(format_eur(12345.6), "12.345,60 €");
        assert_eq!(format_eur(1234567.891), "1.234.567,89 €");
    }

    #[test]
    fn test_format_eur_small() {
        assert_eq!(format_eur(0.01), "0,01 €");
        assert_eq!(format_eur(12.5), "12,50 €");
        assert_eq!(format_eur(999.99), "999,99 €");
    }

    #[test]
    fn test_pct() {
        assert!((pct(25.0, 100.0) - 25.0).abs() < 1e-9);
        assert!((pct(1.0, 3.0) - 33.333333).abs() < 0.001);
        assert_eq!(pct(10.0, 0.0), 0.0);
    }
}
