//! Display formatting for report cells.
//!
//! These feed the export table shaper and the CLI summary printer.
//! Percentages are printed as received (no clamping); currency values
//! drop the fractional part when it is zero.

use chrono::NaiveDateTime;

/// "₹1,234,567.89" or "₹1,234,567" when the paise are zero.
pub fn currency(v: f64) -> String {
    let mut whole = v.trunc() as i64;
    let mut frac = (v.fract().abs() * 100.0).round() as u32;
    // Paise can round up to a full rupee; carry it into the whole part.
    if frac == 100 {
        whole += if v < 0.0 { -1 } else { 1 };
        frac = 0;
    }
    if frac == 0 {
        format!("₹{}", group_thousands(whole))
    } else {
        format!("₹{}.{frac:02}", group_thousands(whole))
    }
}

/// "87.5%": one decimal place, value passed through as-is.
pub fn percent(v: f64) -> String {
    format!("{v:.1}%")
}

/// Grouped integer count: 1234567 -> "1,234,567".
pub fn count(v: f64) -> String {
    group_thousands(v.round() as i64)
}

/// "17/06/2024", day-first.
pub fn date(d: NaiveDateTime) -> String {
    d.format("%d/%m/%Y").to_string()
}

/// "17/06/2024 14:05", for generated-at stamps.
pub fn date_time(d: NaiveDateTime) -> String {
    d.format("%d/%m/%Y %H:%M").to_string()
}

fn group_thousands(v: i64) -> String {
    let digits = v.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if v < 0 {
        out.push('-');
    }
    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn currency_drops_zero_paise() {
        assert_eq!(currency(1500000.0), "₹1,500,000");
        assert_eq!(currency(999.5), "₹999.50");
        assert_eq!(currency(0.0), "₹0");
    }

    /// Paise that round to 100 carry into the rupee, they never print
    /// as a third digit.
    #[test]
    fn currency_carries_rounded_paise() {
        assert_eq!(currency(1.999), "₹2");
        assert_eq!(currency(1.994), "₹1.99");
        assert_eq!(currency(999.999), "₹1,000");
        assert_eq!(currency(-1.999), "₹-2");
    }

    #[test]
    fn counts_group_thousands() {
        assert_eq!(count(0.0), "0");
        assert_eq!(count(999.0), "999");
        assert_eq!(count(1000.0), "1,000");
        assert_eq!(count(1234567.0), "1,234,567");
        assert_eq!(count(-45678.0), "-45,678");
    }

    #[test]
    fn percent_is_not_clamped() {
        assert_eq!(percent(87.46), "87.5%");
        assert_eq!(percent(120.0), "120.0%");
        assert_eq!(percent(0.0), "0.0%");
    }

    #[test]
    fn dates_print_day_first() {
        let d = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_hms_opt(9, 30, 0).unwrap();
        assert_eq!(date(d), "03/06/2024");
    }
}
