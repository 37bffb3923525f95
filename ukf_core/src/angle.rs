//! Heading/bearing renormalization.

use std::f64::consts::PI;

/// Wrap an angle into (-π, π].
///
/// Every heading or bearing *difference* computed by the filter must pass
/// through this before entering an outer product or innovation; covariances
/// get corrupted otherwise whenever headings straddle ±π.
pub fn normalize_angle(x: f64) -> f64 {
    let mut a = (x + PI) % (2.0 * PI);
    if a <= 0.0 {
        a += 2.0 * PI;
    }
    a - PI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(PI) - PI).abs() < 1e-12);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-12);
        assert!(normalize_angle(2.0 * PI).abs() < 1e-12);
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert!((normalize_angle(-0.5) + 0.5).abs() < 1e-12);
    }

    #[test]
    fn in_range_and_idempotent() {
        let mut x = -25.0;
        while x < 25.0 {
            let a = normalize_angle(x);
            assert!(a > -PI && a <= PI, "{x} -> {a} out of range");
            assert!((normalize_angle(a) - a).abs() < 1e-12, "not idempotent at {x}");
            x += 0.137;
        }
    }
}
