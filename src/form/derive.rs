//! Derived form fields
//!
//! Course fee fields are kept consistent with the duration: editing one of
//! `totalFee`/`feePerDuration` recomputes the other, rounded to a whole
//! amount. The enrolled-student count gets a short display label.

/// Parse numeric form input; empty or non-numeric input is `None`.
fn parse_input(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_duration(value: &str) -> Option<f64> {
    parse_input(value).filter(|d| *d > 0.0)
}

/// Render a number the way a numeric input shows it: no trailing ".0".
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

fn format_rounded(value: f64) -> String {
    let rounded = value.round();
    // avoid "-0"
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{:.0}", rounded)
    }
}

/// `round(total / duration)`, or empty when either input is unusable.
pub fn fee_per_duration(total_fee: &str, duration: &str) -> String {
    match (parse_input(total_fee), parse_duration(duration)) {
        (Some(total), Some(duration)) => format_rounded(total / duration),
        _ => String::new(),
    }
}

/// `round(fee_per_duration * duration)`, or empty when either input is unusable.
pub fn total_fee(fee_per_duration: &str, duration: &str) -> String {
    match (parse_input(fee_per_duration), parse_duration(duration)) {
        (Some(fee), Some(duration)) => format_rounded(fee * duration),
        _ => String::new(),
    }
}

/// Short human-readable count: `1200 -> "1.2k"`, `1200000 -> "1.2M"`.
///
/// One decimal, rounded half up.
pub fn short_count(count: u64) -> String {
    if count >= 1_000_000 {
        let tenths = round_div(count, 100_000);
        format!("{}.{}M", tenths / 10, tenths % 10)
    } else if count >= 1_000 {
        let tenths = round_div(count, 100);
        format!("{}.{}k", tenths / 10, tenths % 10)
    } else {
        count.to_string()
    }
}

/// `count / divisor` rounded half up, without overflowing near `u64::MAX`
fn round_div(count: u64, divisor: u64) -> u64 {
    count / divisor + u64::from(count % divisor >= divisor / 2)
}

/// Short label for raw `students` input; empty, zero or invalid input clears it.
pub fn short_count_input(value: &str) -> String {
    match parse_input(value) {
        // `as` saturates, so anything past u64::MAX is labelled as u64::MAX
        Some(n) if n >= 1.0 => short_count(n.round() as u64),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_count_examples() {
        assert_eq!(short_count(999), "999");
        assert_eq!(short_count(1000), "1.0k");
        assert_eq!(short_count(1200), "1.2k");
        assert_eq!(short_count(1500), "1.5k");
        assert_eq!(short_count(1_000_000), "1.0M");
        assert_eq!(short_count(1_200_000), "1.2M");
    }

    #[test]
    fn test_short_count_rounds_half_up() {
        assert_eq!(short_count(1250), "1.3k");
        assert_eq!(short_count(1249), "1.2k");
    }

    #[test]
    fn test_short_count_handles_largest_counts() {
        assert_eq!(short_count(u64::MAX), "18446744073709.6M");
        assert_eq!(short_count(u64::MAX - 60_000), "18446744073709.5M");
        assert_eq!(short_count_input("1e20"), "18446744073709.6M");
    }

    #[test]
    fn test_short_count_input() {
        assert_eq!(short_count_input("1500"), "1.5k");
        assert_eq!(short_count_input(""), "");
        assert_eq!(short_count_input("0"), "");
        assert_eq!(short_count_input("lots"), "");
    }

    #[test]
    fn test_fee_per_duration() {
        assert_eq!(fee_per_duration("9000", "3"), "3000");
        assert_eq!(fee_per_duration("10000", "3"), "3333");
        assert_eq!(fee_per_duration("9000", ""), "");
        assert_eq!(fee_per_duration("9000", "0"), "");
        assert_eq!(fee_per_duration("", "3"), "");
    }

    #[test]
    fn test_total_fee() {
        assert_eq!(total_fee("3000", "3"), "9000");
        assert_eq!(total_fee("2.5", "3"), "8");
        assert_eq!(total_fee("3000", "week"), "");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(9000.0), "9000");
        assert_eq!(format_number(4.6), "4.6");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Editing the total fee yields round(total / duration).
        #[test]
        fn total_fee_edit_divides(total in 0u64..10_000_000, duration in 1u32..120) {
            let derived = fee_per_duration(&total.to_string(), &duration.to_string());
            let expected = (total as f64 / duration as f64).round() as u64;
            prop_assert_eq!(derived, expected.to_string());
        }

        /// Editing the fee per duration yields round(fee * duration).
        #[test]
        fn fee_per_duration_edit_multiplies(fee in 0u64..1_000_000, duration in 1u32..120) {
            let derived = total_fee(&fee.to_string(), &duration.to_string());
            prop_assert_eq!(derived, (fee * duration as u64).to_string());
        }

        /// Alternating the two derivations is stable after one round.
        #[test]
        fn alternating_derivations_converge(total in 0u64..10_000_000, duration in 1u32..120) {
            let duration = duration.to_string();
            let fee = fee_per_duration(&total.to_string(), &duration);
            let total_again = total_fee(&fee, &duration);
            let fee_again = fee_per_duration(&total_again, &duration);
            let total_third = total_fee(&fee_again, &duration);

            prop_assert_eq!(&fee, &fee_again);
            prop_assert_eq!(&total_again, &total_third);
        }

        /// Larger counts never get a label of smaller magnitude.
        #[test]
        fn short_count_is_monotonic(a in any::<u64>(), b in any::<u64>()) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(label_magnitude(&short_count(lo)) <= label_magnitude(&short_count(hi)));
        }
    }

    fn label_magnitude(label: &str) -> f64 {
        if let Some(m) = label.strip_suffix('M') {
            m.parse::<f64>().unwrap() * 1_000_000.0
        } else if let Some(k) = label.strip_suffix('k') {
            k.parse::<f64>().unwrap() * 1_000.0
        } else {
            label.parse::<f64>().unwrap()
        }
    }
}
