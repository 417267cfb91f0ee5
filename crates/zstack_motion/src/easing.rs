//! Easing functions for timed animations

/// An easing curve mapping linear progress to eased progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Arbitrary CSS-style cubic bezier with control points
    /// `(x1, y1, x2, y2)`
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// The navigation curve shared by the slide and modal presets:
    /// fast start, long settle.
    pub fn nav() -> Self {
        Easing::CubicBezier(0.2, 0.9, 0.3, 1.0)
    }

    /// Evaluate the curve at `t`, clamped to `0.0..=1.0`.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Linear
    }
}

/// One-dimensional cubic bezier through (0, 0) and (1, 1) with control
/// values `a` and `b`.
fn bezier_1d(a: f32, b: f32, t: f32) -> f32 {
    let inv = 1.0 - t;
    3.0 * inv * inv * t * a + 3.0 * inv * t * t * b + t * t * t
}

fn bezier_1d_derivative(a: f32, b: f32, t: f32) -> f32 {
    let inv = 1.0 - t;
    3.0 * inv * inv * a + 6.0 * inv * t * (b - a) + 3.0 * t * t * (1.0 - b)
}

/// CSS timing-function evaluation: solve the parametric t where the x
/// component equals `progress`, then sample the y component there.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    // Newton-Raphson, falling back to bisection when the derivative
    // flattens out
    let mut t = progress;
    for _ in 0..8 {
        let x = bezier_1d(x1, x2, t) - progress;
        if x.abs() < 1e-5 {
            return bezier_1d(y1, y2, t);
        }
        let dx = bezier_1d_derivative(x1, x2, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t -= x / dx;
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    t = progress;
    while hi - lo > 1e-5 {
        if bezier_1d(x1, x2, t) < progress {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) / 2.0;
    }
    bezier_1d(y1, y2, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_is_identity() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((Easing::Linear.apply(t) - t).abs() < 1e-6);
        }
    }

    #[test]
    fn test_endpoints_are_fixed() {
        let curves = [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::nav(),
        ];
        for curve in curves {
            assert_eq!(curve.apply(0.0), 0.0);
            assert_eq!(curve.apply(1.0), 1.0);
        }
    }

    #[test]
    fn test_clamps_out_of_range_input() {
        assert_eq!(Easing::nav().apply(-0.5), 0.0);
        assert_eq!(Easing::nav().apply(1.5), 1.0);
    }

    #[test]
    fn test_ease_in_starts_slow() {
        assert!(Easing::EaseIn.apply(0.25) < 0.25);
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
    }

    #[test]
    fn test_nav_curve_overshoots_midpoint() {
        // The navigation curve front-loads most of the motion
        let mid = Easing::nav().apply(0.5);
        assert!(mid > 0.8, "expected fast start, got {mid}");
    }

    #[test]
    fn test_monotonic_for_css_curves() {
        let curve = Easing::EaseInOut;
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = curve.apply(i as f32 / 100.0);
            assert!(v >= prev - 1e-4);
            prev = v;
        }
    }
}
