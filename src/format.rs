//! Display formatting for scaled ingredient quantities.
//!
//! Output never depends on the process locale: fractions use `/`, decimals use `.`.

/// How far a value may sit from a rational approximation and still be shown as one
const FRACTION_TOLERANCE: f64 = 0.02;

/// Values at or above this are always shown as decimals
const FRACTION_LIMIT: f64 = 10.0;

const MAX_FRACTION_DIGITS: usize = 2;

/// Shown for positive quantities too small for `MAX_FRACTION_DIGITS`
const SMALLEST_DECIMAL: &str = "0.01";

const FRACTIONS: [(u32, u32); 5] = [(1, 4), (1, 3), (1, 2), (2, 3), (3, 4)];

/// Render a quantity for display, e.g. `0.5 -> "1/2"`, `2.25 -> "2 1/4"`, `12.5 -> "12.5"`.
pub fn format_quantity(quantity: f64) -> String {
    if !quantity.is_finite() || quantity <= 0.0 {
        return "0".to_string();
    }

    let whole = quantity.trunc();
    let fraction = quantity - whole;

    if whole > 0.0 && fraction < FRACTION_TOLERANCE {
        return format!("{:.0}", whole);
    }
    if 1.0 - fraction < FRACTION_TOLERANCE {
        return format!("{:.0}", whole + 1.0);
    }

    if quantity < FRACTION_LIMIT {
        for (numerator, denominator) in FRACTIONS {
            let value = numerator as f64 / denominator as f64;
            if (fraction - value).abs() < FRACTION_TOLERANCE {
                return if whole == 0.0 {
                    format!("{numerator}/{denominator}")
                } else {
                    format!("{:.0} {numerator}/{denominator}", whole)
                };
            }
        }
    }

    let decimal = format!("{:.*}", MAX_FRACTION_DIGITS, quantity);
    match decimal.trim_end_matches('0').trim_end_matches('.') {
        "0" => SMALLEST_DECIMAL.to_string(),
        trimmed => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_numbers() {
        assert_eq!(format_quantity(1.0), "1");
        assert_eq!(format_quantity(400.0), "400");
        assert_eq!(format_quantity(2.999), "3");
        assert_eq!(format_quantity(3.004), "3");
    }

    #[test]
    fn test_common_fractions() {
        assert_eq!(format_quantity(0.5), "1/2");
        assert_eq!(format_quantity(0.25), "1/4");
        assert_eq!(format_quantity(0.75), "3/4");
        assert_eq!(format_quantity(1.0 / 3.0), "1/3");
        assert_eq!(format_quantity(2.0 / 3.0), "2/3");
        assert_eq!(format_quantity(1.5), "1 1/2");
        assert_eq!(format_quantity(2.0 + 1.0 / 3.0), "2 1/3");
    }

    #[test]
    fn test_decimals_when_no_fraction_fits() {
        assert_eq!(format_quantity(0.1), "0.1");
        assert_eq!(format_quantity(1.4), "1.4");
        assert_eq!(format_quantity(2.8), "2.8");
    }

    #[test]
    fn test_large_values_stay_decimal() {
        assert_eq!(format_quantity(12.5), "12.5");
        assert_eq!(format_quantity(33.75), "33.75");
        assert_eq!(format_quantity(133.3333), "133.33");
    }

    #[test]
    fn test_small_quantities_never_vanish() {
        assert_eq!(format_quantity(0.01), "0.01");
        assert_eq!(format_quantity(0.015), "0.01");
        assert_eq!(format_quantity(0.0125), "0.01");
        assert_eq!(format_quantity(0.004), "0.01");
        assert_eq!(format_quantity(1e-9), "0.01");
        assert_eq!(format_quantity(0.99), "1");
    }

    #[test]
    fn test_huge_values_are_not_clamped() {
        assert_eq!(format_quantity(1e20), "100000000000000000000");
        assert_eq!(format_quantity(1e25), format!("{:.0}", 1e25_f64));
        assert_ne!(format_quantity(1e25), u64::MAX.to_string());
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(format_quantity(0.0), "0");
        assert_eq!(format_quantity(-2.0), "0");
        assert_eq!(format_quantity(f64::NAN), "0");
        assert_eq!(format_quantity(f64::INFINITY), "0");
    }
}
