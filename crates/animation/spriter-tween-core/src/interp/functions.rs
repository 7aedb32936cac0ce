//! Interpolation helpers:
//! - lerp_f32 / lerp_vec2 (endpoint-exact linear blend)
//! - angle interpolation with Spriter spin semantics and shortest-arc blending
//! - quadratic / cubic / bezier timing curves

/// Full turn in degrees.
pub const FULL_TURN: f32 = 360.0;

/// Linear interpolation of scalars.
///
/// Written as `a * (1 - t) + b * t` so that `t == 0` returns `a` and `t == 1`
/// returns `b` bit for bit. Values of `t` outside `[0, 1]` extrapolate.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

#[inline]
pub fn lerp_vec2(a: [f32; 2], b: [f32; 2], t: f32) -> [f32; 2] {
    [lerp_f32(a[0], b[0], t), lerp_f32(a[1], b[1], t)]
}

/// Keyframe angle interpolation.
///
/// `spin > 0` turns counter clockwise, `spin < 0` clockwise and `spin == 0`
/// holds `a` for the whole segment.
#[inline]
pub fn lerp_angle_spin(a: f32, mut b: f32, spin: i8, t: f32) -> f32 {
    if spin == 0 {
        return a;
    }
    if spin > 0 && b - a < 0.0 {
        b += FULL_TURN;
    }
    if spin < 0 && b - a > 0.0 {
        b -= FULL_TURN;
    }
    lerp_f32(a, b, t)
}

/// Blend two angles along the shortest arc.
///
/// `t == 0` returns `a` and `t == 1` returns `b` bit for bit. When the arc
/// crosses the 0/360 seam, `a` is shifted by a whole turn towards `b` so the
/// blend never takes the long way round.
#[inline]
pub fn lerp_angle_shortest(a: f32, b: f32, t: f32) -> f32 {
    if t == 0.0 {
        return a;
    }
    let mut delta = (b - a) % FULL_TURN;
    if delta > 180.0 {
        delta -= FULL_TURN;
    } else if delta < -180.0 {
        delta += FULL_TURN;
    }
    if (b - a - delta).abs() <= f32::EPSILON * b.abs().max(1.0) {
        lerp_f32(a, b, t)
    } else {
        lerp_f32(b - delta, b, t)
    }
}

/// Quadratic bezier through `(0, c1, 1)`.
#[inline]
pub fn quadratic(c1: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    2.0 * u * t * c1 + t * t
}

/// Cubic Bezier basis function
#[inline]
pub fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given control points (x1, y1, x2, y2) and an input t in [0,1],
/// compute the eased y by inverting the x bezier via binary search.
#[inline]
pub fn bezier_ease_t(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    // Bezier(0,0,1,1) is exactly linear
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}
