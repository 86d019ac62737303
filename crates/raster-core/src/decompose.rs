//! Outline-to-rasterizer decomposition: walks a [`PathCommand`] stream,
//! converts device-space coordinates to subpixel fixed point, and feeds the
//! result into a [`Rasterizer`].

use crate::cell::PoolOverflow;
use crate::fixed::scale_to_subpixel;
use crate::outline::{Outline, PathCommand};
use crate::raster::Rasterizer;

/// Feed every command of `outline` into `rasterizer`, scaling coordinates
/// by `scale` (device pixels per outline unit) on the way in. Implicit
/// closing of the final contour is the rasterizer's responsibility
/// ([`Rasterizer::finish`]) — call it once decomposition completes.
pub fn decompose(outline: &Outline, scale: f64, rasterizer: &mut Rasterizer) -> Result<(), PoolOverflow> {
    let sp = |v: f64| scale_to_subpixel(v, scale);

    for cmd in &outline.commands {
        match *cmd {
            PathCommand::MoveTo { x, y } => rasterizer.move_to(sp(x), sp(y))?,
            PathCommand::LineTo { x, y } => rasterizer.line_to(sp(x), sp(y))?,
            PathCommand::QuadTo { cx, cy, x, y } => {
                rasterizer.quad_to(sp(cx), sp(cy), sp(x), sp(y), default_curve_depth())?
            }
            PathCommand::CubicTo { cx1, cy1, cx2, cy2, x, y } => rasterizer.cubic_to(
                sp(cx1),
                sp(cy1),
                sp(cx2),
                sp(cy2),
                sp(x),
                sp(y),
                default_curve_depth(),
            )?,
            PathCommand::Close => rasterizer.close()?,
        }
    }
    rasterizer.finish()
}

fn default_curve_depth() -> u32 {
    crate::config::RasterizerConfig::default().max_curve_depth
}
