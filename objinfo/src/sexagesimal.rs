//! Sexagesimal angle formatting.
//!
//! Integer arithmetic on rounded sub-units so a value like 59.96 seconds
//! carries into the next minute instead of printing "60.0".

/// Format an angle in degrees as signed `+DD MM SS.S`.
pub fn degrees(value_deg: f64) -> String {
    let sign = if value_deg < 0.0 { '-' } else { '+' };
    let tenths = (value_deg.abs() * 36_000.0).round() as i64;
    let (d, m, s10) = split_units(tenths, 36_000, 600);
    format!("{}{:02} {:02} {:04.1}", sign, d, m, s10 as f64 / 10.0)
}

/// Format an angle in degrees as sexagesimal hours `HH MM SS.SS`,
/// normalized to [0h, 24h).
pub fn hours(value_deg: f64) -> String {
    let hours = (value_deg.rem_euclid(360.0)) / 15.0;
    let hundredths = (hours * 360_000.0).round() as i64;
    // 24h rolls over to 00h after rounding
    let hundredths = hundredths % (24 * 360_000);
    let (h, m, s100) = split_units(hundredths, 360_000, 6_000);
    format!("{:02} {:02} {:05.2}", h, m, s100 as f64 / 100.0)
}

/// Format an angle in degrees as signed sexagesimal hours `+HH MM SS.S`.
pub fn hours_signed(value_deg: f64) -> String {
    let sign = if value_deg < 0.0 { '-' } else { '+' };
    let hours = value_deg.abs() / 15.0;
    let tenths = (hours * 36_000.0).round() as i64;
    let (h, m, s10) = split_units(tenths, 36_000, 600);
    format!("{}{:02} {:02} {:04.1}", sign, h, m, s10 as f64 / 10.0)
}

/// Split a count of fractional seconds into (whole units, minutes,
/// remaining fractional seconds).
fn split_units(total: i64, per_unit: i64, per_minute: i64) -> (i64, i64, i64) {
    let units = total / per_unit;
    let minutes = (total % per_unit) / per_minute;
    let seconds = total % per_minute;
    (units, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_signed() {
        assert_eq!(degrees(41.269167), "+41 16 09.0");
        assert_eq!(degrees(-5.5), "-05 30 00.0");
        assert_eq!(degrees(0.0), "+00 00 00.0");
    }

    #[test]
    fn test_degrees_rounding_carries() {
        // 29' 59.96" rounds into 30' 00.0"
        assert_eq!(degrees(10.0 + 29.0 / 60.0 + 59.96 / 3600.0), "+10 30 00.0");
    }

    #[test]
    fn test_hours_from_ra_degrees() {
        // M31: RA 10.684708 deg = 00h 42m 44.33s
        assert_eq!(hours(10.684708), "00 42 44.33");
        assert_eq!(hours(0.0), "00 00 00.00");
        // Normalized into [0h, 24h)
        assert_eq!(hours(-15.0), "23 00 00.00");
    }

    #[test]
    fn test_hours_rollover_at_24h() {
        assert_eq!(hours(359.9999999), "00 00 00.00");
    }

    #[test]
    fn test_hours_signed_for_hour_angle() {
        assert_eq!(hours_signed(-51.2966667), "-03 25 11.2");
        assert_eq!(hours_signed(15.0), "+01 00 00.0");
    }
}
