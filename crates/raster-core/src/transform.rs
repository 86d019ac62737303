//! Outline transforms: general affine/perspective mapping plus the fast
//! paths this contract calls out explicitly (rotate-90, power-of-two scale).

use crate::matrix::{Matrix2D, Matrix3x3};
use crate::outline::{Bounds, Outline, PathCommand};

/// Envelope of `bounds`' four corners after mapping each through `f` — the
/// transformed bounding box, not the (possibly larger) bounds of the
/// transformed shape, but exact for any affine or perspective map applied to
/// an axis-aligned box's corners.
fn transform_bounds(bounds: &Bounds, f: impl Fn(f64, f64) -> (f64, f64)) -> Bounds {
    let corners = [
        (bounds.min_x, bounds.min_y),
        (bounds.max_x, bounds.min_y),
        (bounds.max_x, bounds.max_y),
        (bounds.min_x, bounds.max_y),
    ];
    let mut out = Bounds::empty();
    for (x, y) in corners {
        let (tx, ty) = f(x, y);
        out.include(tx, ty);
    }
    out
}

/// Apply a 2D affine transform to every coordinate in `outline`, returning a
/// new outline. Command structure (which points are on-curve vs control
/// points) is preserved exactly; only coordinates change.
pub fn transform_outline_2d(outline: &Outline, m: &Matrix2D) -> Outline {
    let commands = outline
        .commands
        .iter()
        .map(|cmd| map_command(cmd, |x, y| m.apply(x, y)))
        .collect();
    let bounds = outline.bounds.as_ref().map(|b| transform_bounds(b, |x, y| m.apply(x, y)));
    Outline { commands, bounds, flags: outline.flags }
}

/// Apply a 3x3 homogeneous transform with perspective division to every
/// coordinate in `outline`.
pub fn transform_outline_3d(outline: &Outline, m: &Matrix3x3, clamp_floor: Option<f64>) -> Outline {
    let commands = outline
        .commands
        .iter()
        .map(|cmd| map_command(cmd, |x, y| m.apply_perspective(x, y, clamp_floor)))
        .collect();
    let bounds = outline.bounds.as_ref().map(|b| transform_bounds(b, |x, y| m.apply_perspective(x, y, clamp_floor)));
    Outline { commands, bounds, flags: outline.flags }
}

fn map_command(cmd: &PathCommand, f: impl Fn(f64, f64) -> (f64, f64)) -> PathCommand {
    match *cmd {
        PathCommand::MoveTo { x, y } => {
            let (x, y) = f(x, y);
            PathCommand::MoveTo { x, y }
        }
        PathCommand::LineTo { x, y } => {
            let (x, y) = f(x, y);
            PathCommand::LineTo { x, y }
        }
        PathCommand::QuadTo { cx, cy, x, y } => {
            let (cx, cy) = f(cx, cy);
            let (x, y) = f(x, y);
            PathCommand::QuadTo { cx, cy, x, y }
        }
        PathCommand::CubicTo { cx1, cy1, cx2, cy2, x, y } => {
            let (cx1, cy1) = f(cx1, cy1);
            let (cx2, cy2) = f(cx2, cy2);
            let (x, y) = f(x, y);
            PathCommand::CubicTo { cx1, cy1, cx2, cy2, x, y }
        }
        PathCommand::Close => PathCommand::Close,
    }
}

/// Direction for the rotate-90 fast path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    Deg90,
    Deg180,
    Deg270,
}

/// Rotate an outline by a multiple of 90 degrees using pure swap/negate
/// arithmetic, skipping the trig and rounding error of the general 2D path.
pub fn rotate_outline_90(outline: &Outline, quadrant: Quadrant) -> Outline {
    let f = move |x: f64, y: f64| -> (f64, f64) {
        match quadrant {
            Quadrant::Deg90 => (-y, x),
            Quadrant::Deg180 => (-x, -y),
            Quadrant::Deg270 => (y, -x),
        }
    };
    let commands = outline.commands.iter().map(|cmd| map_command(cmd, f)).collect();
    Outline { commands, bounds: None, flags: outline.flags }
}

/// Scale an outline by a power-of-two factor (`2^exp`, `exp` may be
/// negative) using multiplication by an exact binary power rather than a
/// general float multiply — avoids accumulating scale-related rounding
/// error across repeated up/downscales.
pub fn scale_outline_pow2(outline: &Outline, exp: i32) -> Outline {
    let factor = 2f64.powi(exp);
    let f = move |x: f64, y: f64| (x * factor, y * factor);
    let commands = outline.commands.iter().map(|cmd| map_command(cmd, f)).collect();
    Outline { commands, bounds: None, flags: outline.flags }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Outline {
        Outline::with_commands(vec![
            PathCommand::MoveTo { x: 1.0, y: 0.0 },
            PathCommand::LineTo { x: 2.0, y: 0.0 },
            PathCommand::LineTo { x: 2.0, y: 2.0 },
            PathCommand::Close,
        ])
    }

    #[test]
    fn affine_translation_matches_matrix() {
        let m = Matrix2D::translation(10.0, 5.0);
        let out = transform_outline_2d(&square(), &m);
        assert_eq!(out.commands[0], PathCommand::MoveTo { x: 11.0, y: 5.0 });
    }

    #[test]
    fn rotate_90_round_trip_is_identity() {
        let original = square();
        let rotated = rotate_outline_90(&original, Quadrant::Deg90);
        let rotated = rotate_outline_90(&rotated, Quadrant::Deg90);
        let rotated = rotate_outline_90(&rotated, Quadrant::Deg90);
        let rotated = rotate_outline_90(&rotated, Quadrant::Deg90);
        for (a, b) in original.commands.iter().zip(rotated.commands.iter()) {
            match (a, b) {
                (PathCommand::MoveTo { x: x1, y: y1 }, PathCommand::MoveTo { x: x2, y: y2 })
                | (PathCommand::LineTo { x: x1, y: y1 }, PathCommand::LineTo { x: x2, y: y2 }) => {
                    assert!((x1 - x2).abs() < 1e-9);
                    assert!((y1 - y2).abs() < 1e-9);
                }
                (PathCommand::Close, PathCommand::Close) => {}
                _ => panic!("command shape changed"),
            }
        }
    }

    #[test]
    fn rotate_90_matches_general_matrix() {
        let m = Matrix2D::rotation(std::f64::consts::FRAC_PI_2);
        let via_matrix = transform_outline_2d(&square(), &m);
        let via_fast_path = rotate_outline_90(&square(), Quadrant::Deg90);
        for (a, b) in via_matrix.commands.iter().zip(via_fast_path.commands.iter()) {
            if let (PathCommand::LineTo { x: x1, y: y1 }, PathCommand::LineTo { x: x2, y: y2 }) = (a, b) {
                assert!((x1 - x2).abs() < 1e-9);
                assert!((y1 - y2).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn scale_pow2_doubles_coordinates() {
        let out = scale_outline_pow2(&square(), 1);
        assert_eq!(out.commands[0], PathCommand::MoveTo { x: 2.0, y: 0.0 });
    }

    #[test]
    fn scale_pow2_negative_exponent_halves() {
        let out = scale_outline_pow2(&square(), -1);
        assert_eq!(out.commands[0], PathCommand::MoveTo { x: 0.5, y: 0.0 });
    }
}
