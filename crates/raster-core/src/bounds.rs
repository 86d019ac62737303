//! Outline bounds computation: cheap control boxes and exact tight bounds.
//!
//! Grounded in the general shape of AGG's `bounding_rect` helpers combined
//! with this crate's explicit requirement that tight bounds solve the
//! Bézier derivative for interior extrema rather than just bounding the
//! control polygon.

use crate::outline::{Bounds, Outline, PathCommand};

/// Bounding box of the control polygon: every on-curve and off-curve point,
/// with no curve-extrema refinement. Always contains the true outline but
/// may be looser than necessary — this is the cheap O(n) variant.
pub fn compute_control_box(outline: &Outline) -> Bounds {
    let mut bounds = Bounds::empty();
    for cmd in &outline.commands {
        for (x, y) in cmd.coords() {
            bounds.include(x, y);
        }
    }
    bounds
}

/// Exact tight bounds: for each Bézier segment, also includes the points
/// where its derivative is zero (the curve's local extrema), not just its
/// endpoints and control points.
pub fn compute_tight_bounds(outline: &Outline) -> Bounds {
    let mut bounds = Bounds::empty();
    let mut cursor = (0.0f64, 0.0f64);
    let mut start = (0.0f64, 0.0f64);

    for cmd in &outline.commands {
        match *cmd {
            PathCommand::MoveTo { x, y } => {
                bounds.include(x, y);
                cursor = (x, y);
                start = (x, y);
            }
            PathCommand::LineTo { x, y } => {
                bounds.include(x, y);
                cursor = (x, y);
            }
            PathCommand::QuadTo { cx, cy, x, y } => {
                include_quad_extrema(&mut bounds, cursor, (cx, cy), (x, y));
                bounds.include(x, y);
                cursor = (x, y);
            }
            PathCommand::CubicTo { cx1, cy1, cx2, cy2, x, y } => {
                include_cubic_extrema(&mut bounds, cursor, (cx1, cy1), (cx2, cy2), (x, y));
                bounds.include(x, y);
                cursor = (x, y);
            }
            PathCommand::Close => {
                cursor = start;
            }
        }
    }
    bounds
}

/// Quadratic Bézier `B(t) = (1-t)^2 P0 + 2(1-t)t P1 + t^2 P2`. Its derivative
/// is linear, so there is at most one extremum per axis:
/// `t* = (P0 - P1) / (P0 - 2 P1 + P2)`.
fn include_quad_extrema(bounds: &mut Bounds, p0: (f64, f64), p1: (f64, f64), p2: (f64, f64)) {
    for axis in 0..2 {
        let (a0, a1, a2) = (axis_of(p0, axis), axis_of(p1, axis), axis_of(p2, axis));
        let denom = a0 - 2.0 * a1 + a2;
        if denom.abs() < f64::EPSILON {
            continue;
        }
        let t = (a0 - a1) / denom;
        if t > 0.0 && t < 1.0 {
            let (x, y) = eval_quad(p0, p1, p2, t);
            bounds.include(x, y);
        }
    }
}

/// Cubic Bézier derivative is quadratic in `t`; solve `A t^2 + B t + C = 0`
/// per axis for up to two interior extrema.
fn include_cubic_extrema(
    bounds: &mut Bounds,
    p0: (f64, f64),
    p1: (f64, f64),
    p2: (f64, f64),
    p3: (f64, f64),
) {
    for axis in 0..2 {
        let (a0, a1, a2, a3) =
            (axis_of(p0, axis), axis_of(p1, axis), axis_of(p2, axis), axis_of(p3, axis));
        // B'(t)/3 = (1-t)^2 (P1-P0) + 2(1-t)t (P2-P1) + t^2 (P3-P2)
        let c0 = a1 - a0;
        let c1 = a2 - a1;
        let c2 = a3 - a2;
        let a = c0 - 2.0 * c1 + c2;
        let b = 2.0 * (c1 - c0);
        let c = c0;
        for t in solve_quadratic(a, b, c) {
            if t > 0.0 && t < 1.0 {
                let (x, y) = eval_cubic(p0, p1, p2, p3, t);
                bounds.include(x, y);
            }
        }
    }
}

fn axis_of(p: (f64, f64), axis: u8) -> f64 {
    if axis == 0 { p.0 } else { p.1 }
}

fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < f64::EPSILON {
        if b.abs() < f64::EPSILON {
            return vec![];
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return vec![];
    }
    let sqrt_disc = disc.sqrt();
    vec![(-b + sqrt_disc) / (2.0 * a), (-b - sqrt_disc) / (2.0 * a)]
}

fn eval_quad(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), t: f64) -> (f64, f64) {
    let mt = 1.0 - t;
    let x = mt * mt * p0.0 + 2.0 * mt * t * p1.0 + t * t * p2.0;
    let y = mt * mt * p0.1 + 2.0 * mt * t * p1.1 + t * t * p2.1;
    (x, y)
}

fn eval_cubic(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), t: f64) -> (f64, f64) {
    let mt = 1.0 - t;
    let x = mt * mt * mt * p0.0
        + 3.0 * mt * mt * t * p1.0
        + 3.0 * mt * t * t * p2.0
        + t * t * t * p3.0;
    let y = mt * mt * mt * p0.1
        + 3.0 * mt * mt * t * p1.1
        + 3.0 * mt * t * t * p2.1
        + t * t * t * p3.1;
    (x, y)
}

/// Bounds of a path in fixed-point subpixel units, for callers that want to
/// size a bitmap without first rasterizing. `pad` widens the box by that
/// many whole pixels on every side (for blur/embolden headroom).
pub fn get_path_bounds(outline: &Outline, tight: bool, pad_pixels: i32) -> Bounds {
    let mut bounds = if tight { compute_tight_bounds(outline) } else { compute_control_box(outline) };
    if bounds.is_empty() {
        return bounds;
    }
    let pad = pad_pixels as f64;
    bounds.min_x -= pad;
    bounds.min_y -= pad;
    bounds.max_x += pad;
    bounds.max_y += pad;
    bounds
}
