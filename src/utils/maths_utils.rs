/// Rounds to `decimals` places (half away from zero).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Percentage change of `value` relative to `reference`.
/// Returns `None` when the reference is zero or not finite.
pub fn percent_change(value: f64, reference: f64) -> Option<f64> {
    if reference == 0.0 || !reference.is_finite() {
        return None;
    }
    Some((value - reference) / reference * 100.0)
}

/// `value` as a percentage of `max`, for relative bar widths.
pub fn share_of(value: f64, max: f64) -> f64 {
    if max <= f64::EPSILON {
        return 0.0;
    }
    value / max * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert_eq!(round_to(33.333, 1), 33.3);
        assert_eq!(round_to(0.25, 1), 0.3);
        assert_eq!(round_to(100.0, 1), 100.0);
    }

    #[test]
    fn percent_change_vs_reference() {
        assert_eq!(percent_change(3000.0, 1500.0), Some(100.0));
        assert_eq!(percent_change(1.0, 0.0), None);
        let below = percent_change(2000.0, 2181.0).unwrap();
        assert_eq!(round_to(below, 1), -8.3);
    }

    #[test]
    fn bar_share() {
        assert_eq!(share_of(1500.0, 3000.0), 50.0);
        assert_eq!(share_of(5.0, 0.0), 0.0);
    }
}
