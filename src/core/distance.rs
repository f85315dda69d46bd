use crate::core::codec::{self, ColorError, Rgb};

/// Euclidean distance over the three 8-bit channels.
pub fn between(a: Rgb, b: Rgb) -> f64 {
    let dr = a.r as f64 - b.r as f64;
    let dg = a.g as f64 - b.g as f64;
    let db = a.b as f64 - b.b as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

pub fn try_distance(a: &str, b: &str) -> Result<f64, ColorError> {
    Ok(between(codec::decode(a)?, codec::decode(b)?))
}

/// Distance between two hex colors; `f64::INFINITY` when either is malformed.
pub fn distance(a: &str, b: &str) -> f64 {
    match try_distance(a, b) {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!("Color distance calculation error: {}", e);
            f64::INFINITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_zero() {
        for hex in ["#000000", "#FF3366", "#abc", "#E0D8FF"] {
            assert_eq!(distance(hex, hex), 0.0);
        }
    }

    #[test]
    fn test_symmetric() {
        let pairs = [("#FF3366", "#C0244B"), ("#000", "#FFFFFF"), ("#14B8A6", "#3b82f6")];
        for (a, b) in pairs {
            assert_eq!(distance(a, b), distance(b, a));
        }
    }

    #[test]
    fn test_black_to_white() {
        let expected = (3.0f64 * 255.0 * 255.0).sqrt();
        assert!((distance("#000000", "#FFFFFF") - expected).abs() < 1e-9);
    }

    #[test]
    fn test_short_form_is_expanded() {
        assert_eq!(distance("#F36", "#FF3366"), 0.0);
        assert_eq!(distance("#000", "#000003"), 3.0);
    }

    #[test]
    fn test_malformed_input_is_unbounded() {
        assert_eq!(distance("#FF3366", "red"), f64::INFINITY);
        assert_eq!(distance("", "#FFFFFF"), f64::INFINITY);
        assert!(try_distance("#12345", "#123456").is_err());
    }
}
