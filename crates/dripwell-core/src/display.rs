//! Human-readable amount rendering.

use crate::constants::UNIT;
use crate::types::Amount;

/// Render an amount as a decimal unit quantity, trimming trailing zeros.
///
/// Integer-exact for the full u128 range (f64 cannot represent 18-decimal
/// amounts). `1_500_000_000_000_000_000` renders as `"1.5"`, `UNIT / 100`
/// as `"0.01"`, zero as `"0"`.
///
/// # Examples
///
/// ```
/// use dripwell_core::constants::UNIT;
/// use dripwell_core::display::format_units;
/// assert_eq!(format_units(3 * UNIT / 2), "1.5");
/// assert_eq!(format_units(0), "0");
/// ```
pub fn format_units(amount: Amount) -> String {
    let whole = amount / UNIT;
    let frac = amount % UNIT;
    if frac == 0 {
        return whole.to_string();
    }
    let frac_digits = format!("{frac:018}");
    format!("{whole}.{}", frac_digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MIN_CLAIM;

    #[test]
    fn whole_amounts_have_no_point() {
        assert_eq!(format_units(0), "0");
        assert_eq!(format_units(UNIT), "1");
        assert_eq!(format_units(42 * UNIT), "42");
    }

    #[test]
    fn fractions_trim_trailing_zeros() {
        assert_eq!(format_units(UNIT / 2), "0.5");
        assert_eq!(format_units(UNIT + UNIT / 4), "1.25");
        assert_eq!(format_units(MIN_CLAIM), "0.01");
    }

    #[test]
    fn wei_precision_survives() {
        assert_eq!(format_units(1), "0.000000000000000001");
        assert_eq!(format_units(UNIT + 1), "1.000000000000000001");
    }

    #[test]
    fn huge_amounts_do_not_panic() {
        let rendered = format_units(Amount::MAX);
        assert!(rendered.contains('.'));
    }
}
