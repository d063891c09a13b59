//! Indonesian Rupiah display formatting.

use num_format::{Locale, ToFormattedString};

const MAX_FRACTION_DIGITS: u32 = 3;

/// Render an amount the way `id-ID` locale formatting does, without currency prefix.
///
/// Exactly zero is shown as `-` on slips, so callers can print `"Rp -"` for empty figures.
pub fn format_rupiah(amount: f64) -> String {
    if amount == 0.0 || amount.is_nan() {
        return "-".to_string();
    }
    if amount.is_infinite() {
        return if amount > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    // scale only the fractional part so large amounts keep their integer digits
    let scale = 10u128.pow(MAX_FRACTION_DIGITS);
    let abs = amount.abs();
    let whole = abs.trunc();
    let mut integer = whole as u128;
    let mut fraction = ((abs - whole) * scale as f64).round() as u128;
    if fraction >= scale {
        integer += 1;
        fraction -= scale;
    }

    let mut out = String::new();
    if amount < 0.0 {
        out.push('-');
    }
    out.push_str(&integer.to_formatted_string(&Locale::id));

    if fraction > 0 {
        let digits = format!("{:0width$}", fraction, width = MAX_FRACTION_DIGITS as usize);
        out.push(',');
        out.push_str(digits.trim_end_matches('0'));
    }

    out
}

/// `"Rp "` followed by [`format_rupiah`].
pub fn display_rupiah(amount: f64) -> String {
    format!("Rp {}", format_rupiah(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_renders_dash() {
        assert_eq!(format_rupiah(0.0), "-");
        assert_eq!(format_rupiah(-0.0), "-");
        assert_eq!(display_rupiah(0.0), "Rp -");
    }

    #[test]
    fn test_large_amounts_keep_integer_digits() {
        assert_eq!(format_rupiah(1e20), "100.000.000.000.000.000.000");
        assert_eq!(format_rupiah(-1e18), "-1.000.000.000.000.000.000");
        assert_eq!(format_rupiah(9_999.9999), "10.000");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(format_rupiah(5_000_000.0), "5.000.000");
        assert_eq!(format_rupiah(950.0), "950");
        assert_eq!(format_rupiah(1_234_567_890.0), "1.234.567.890");
        assert_eq!(display_rupiah(5_000_000.0), "Rp 5.000.000");
    }

    #[test]
    fn test_negative_and_fraction() {
        assert_eq!(format_rupiah(-150_000.0), "-150.000");
        assert_eq!(format_rupiah(1500.5), "1.500,5");
        assert_eq!(format_rupiah(0.1234), "0,123");
    }

    #[test]
    fn test_tiny_nonzero_never_renders_dash() {
        assert_eq!(format_rupiah(0.0001), "0");
        assert_ne!(format_rupiah(-0.0001), "-");
    }
}
