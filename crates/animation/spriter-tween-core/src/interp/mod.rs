//! Timing curves and interpolation helpers.
//!
//! A [`Curve`] remaps the normalized progress between two timeline keys before
//! the transform components are blended.

pub mod functions;

use serde::{Deserialize, Serialize};

use self::functions::{bezier_ease_t, cubic_bezier, quadratic};

/// Timing curve applied between a key and its successor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Curve {
    /// Hold the left key until the next one is reached.
    Instant,
    #[default]
    Linear,
    Quadratic {
        c1: f32,
    },
    Cubic {
        c1: f32,
        c2: f32,
    },
    /// CSS-style cubic-bezier timing with control points (x1, y1) and (x2, y2).
    Bezier {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
}

impl Curve {
    /// Map a progress value in `[0, 1]` through the curve.
    #[inline]
    pub fn apply(&self, t: f32) -> f32 {
        match *self {
            Curve::Instant => 0.0,
            Curve::Linear => t,
            Curve::Quadratic { c1 } => quadratic(c1, t),
            Curve::Cubic { c1, c2 } => cubic_bezier(0.0, c1, c2, 1.0, t),
            Curve::Bezier { x1, y1, x2, y2 } => bezier_ease_t(t, x1, y1, x2, y2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_holds_left_key() {
        assert_eq!(Curve::Instant.apply(0.0), 0.0);
        assert_eq!(Curve::Instant.apply(0.99), 0.0);
    }

    #[test]
    fn linear_is_identity() {
        assert_eq!(Curve::Linear.apply(0.3), 0.3);
    }

    #[test]
    fn quadratic_bends_towards_control_point() {
        // c1 = 0 eases in: slower than linear at the start
        let eased = Curve::Quadratic { c1: 0.0 }.apply(0.5);
        assert!(eased < 0.5, "ease-in should lag linear, got {eased}");
        let eased = Curve::Quadratic { c1: 1.0 }.apply(0.5);
        assert!(eased > 0.5, "ease-out should lead linear, got {eased}");
    }

    #[test]
    fn curve_deserializes_from_tagged_json() {
        let c: Curve = serde_json::from_str(r#"{"type":"cubic","c1":0.1,"c2":0.9}"#).unwrap();
        assert_eq!(c, Curve::Cubic { c1: 0.1, c2: 0.9 });
        let c: Curve = serde_json::from_str(r#"{"type":"instant"}"#).unwrap();
        assert_eq!(c, Curve::Instant);
    }
}
