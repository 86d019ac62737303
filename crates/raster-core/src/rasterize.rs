//! Top-level rasterization flow: validate, size, band-bisect on pool
//! overflow, and sweep to a finished [`RasterizedGlyph`].

use crate::bitmap::{Bitmap, PixelMode, RasterizedGlyph};
use crate::bounds::get_path_bounds;
use crate::cascade::adaptive_blur;
use crate::config::RasterizerConfig;
use crate::decompose::decompose;
use crate::error::{RasterError, Result};
use crate::matrix::Matrix2D;
use crate::outline::{FillRule, Outline, OutlineValidation};
use crate::raster::Rasterizer;
use crate::sdf::render_sdf;
use crate::transform::transform_outline_2d;
use crate::{outline::validate_outline, scratch::with_coverage_row};

/// The affine map `(x, y) -> (x*scale + offsetX, ±y*scale + offsetY)` used
/// at every rasterize/SDF entry point.
fn device_transform(scale: f64, offset_x: f64, offset_y: f64, flip_y: bool) -> Matrix2D {
    Matrix2D { a: scale, b: 0.0, c: 0.0, d: if flip_y { -scale } else { scale }, tx: offset_x, ty: offset_y }
}

/// Options controlling how an outline becomes a coverage bitmap
/// (`{width, height, scale, offsetX, offsetY, pixelMode, fillRule,
/// flipY}`, auto-size variant defaults `padding=1, flipY=true`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterizeOptions {
    /// Device pixels per outline unit (e.g. font-units-per-em scale).
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Negate Y during decomposition so font Y-up becomes bitmap Y-down.
    pub flip_y: bool,
    /// Use exact curve-extrema bounds rather than the control polygon when
    /// auto-sizing the output bitmap.
    pub tight_bounds: bool,
    /// Extra whole pixels of margin on every side, for blur/embolden
    /// headroom.
    pub pad_pixels: i32,
}

impl Default for RasterizeOptions {
    fn default() -> Self {
        RasterizeOptions { scale: 1.0, offset_x: 0.0, offset_y: 0.0, flip_y: true, tight_bounds: true, pad_pixels: 1 }
    }
}

/// Options for [`rasterize_sdf`] (`{width, height, scale,
/// offsetX, offsetY, flipY=false, spread}`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SdfOptions {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub flip_y: bool,
    pub spread_pixels: f64,
    pub pad_pixels: i32,
}

impl Default for SdfOptions {
    fn default() -> Self {
        SdfOptions {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            flip_y: false,
            spread_pixels: 8.0,
            pad_pixels: 4,
        }
    }
}

/// Options for applying a post-rasterization blur.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurOptions {
    pub sigma: f64,
}

/// Rasterize `outline` into a coverage bitmap, automatically sizing the
/// bitmap to the outline's bounds and computing glyph-origin bearings.
pub fn rasterize(outline: &Outline, options: &RasterizeOptions, config: &RasterizerConfig) -> Result<RasterizedGlyph> {
    match validate_outline(outline, true) {
        OutlineValidation::Ok => {}
        OutlineValidation::EmptyOutline => return Err(RasterError::EmptyOutline),
        OutlineValidation::InvalidOutline(msg) => return Err(RasterError::InvalidOutline(msg)),
    }
    if outline.is_empty() {
        return Err(RasterError::EmptyOutline);
    }

    let m = device_transform(options.scale, options.offset_x, options.offset_y, options.flip_y);
    let device_outline = transform_outline_2d(outline, &m);
    let bounds = get_path_bounds(&device_outline, options.tight_bounds, options.pad_pixels);

    let bearing_x = bounds.min_x.floor() as i32;
    let bearing_y = bounds.min_y.floor() as i32;
    let width = (bounds.max_x.ceil() as i32 - bearing_x).max(1) as u32;
    let height = (bounds.max_y.ceil() as i32 - bearing_y).max(1) as u32;

    let local_outline =
        transform_outline_2d(&device_outline, &Matrix2D::translation(-bearing_x as f64, -bearing_y as f64));
    let rule = FillRule::from_flags(outline.flags);

    let mut bitmap = Bitmap::new(width, height, PixelMode::Gray);
    rasterize_in_bands(&local_outline, 0, width, height as i32, rule, config, &mut bitmap)?;

    Ok(RasterizedGlyph { bitmap, bearing_x, bearing_y })
}

/// Rasterize into a caller-provided, fixed-size bitmap at a caller-chosen
/// origin rather than sizing to the outline's own bounds. Coverage outside
/// `[0, width) x [0, height)` is silently clipped.
pub fn rasterize_to_size(
    outline: &Outline,
    width: u32,
    height: u32,
    options: &RasterizeOptions,
    config: &RasterizerConfig,
) -> Result<Bitmap> {
    match validate_outline(outline, true) {
        OutlineValidation::Ok => {}
        OutlineValidation::EmptyOutline => return Err(RasterError::EmptyOutline),
        OutlineValidation::InvalidOutline(msg) => return Err(RasterError::InvalidOutline(msg)),
    }

    let m = device_transform(options.scale, options.offset_x, options.offset_y, options.flip_y);
    let device_outline = transform_outline_2d(outline, &m);
    let rule = FillRule::from_flags(outline.flags);

    let mut bitmap = Bitmap::new(width, height, PixelMode::Gray);
    if !device_outline.is_empty() {
        rasterize_in_bands(&device_outline, 0, width, height as i32, rule, config, &mut bitmap)?;
    }
    Ok(bitmap)
}

/// Rasterize, then apply an adaptive blur to the resulting coverage bitmap.
pub fn rasterize_blurred(
    outline: &Outline,
    options: &RasterizeOptions,
    blur: &BlurOptions,
    config: &RasterizerConfig,
) -> Result<RasterizedGlyph> {
    let mut glyph = rasterize(outline, options, config)?;
    glyph.bitmap = adaptive_blur(&glyph.bitmap, blur.sigma);
    Ok(glyph)
}

/// Render a signed distance field for `outline`, auto-sized from its
/// bounds plus `spread_pixels` of padding so the field has room to encode
/// distance past the outline's edge.
pub fn rasterize_sdf(outline: &Outline, options: &SdfOptions) -> Result<RasterizedGlyph> {
    match validate_outline(outline, false) {
        OutlineValidation::Ok => {}
        OutlineValidation::EmptyOutline => return Err(RasterError::EmptyOutline),
        OutlineValidation::InvalidOutline(msg) => return Err(RasterError::InvalidOutline(msg)),
    }

    let m = device_transform(options.scale, options.offset_x, options.offset_y, options.flip_y);
    let device_outline = transform_outline_2d(outline, &m);
    let pad = options.pad_pixels.max(options.spread_pixels.ceil() as i32);
    let bounds = get_path_bounds(&device_outline, true, pad);

    let bearing_x = bounds.min_x.floor() as i32;
    let bearing_y = bounds.min_y.floor() as i32;
    let width = (bounds.max_x.ceil() as i32 - bearing_x).max(1) as u32;
    let height = (bounds.max_y.ceil() as i32 - bearing_y).max(1) as u32;

    let local_outline =
        transform_outline_2d(&device_outline, &Matrix2D::translation(-bearing_x as f64, -bearing_y as f64));
    let bitmap = render_sdf(&local_outline, width, height, options.spread_pixels);

    Ok(RasterizedGlyph { bitmap, bearing_x, bearing_y })
}

/// Render a signed distance field into a caller-sized, caller-positioned
/// bitmap, mirroring [`rasterize_to_size`] for the SDF path.
pub fn rasterize_sdf_to_size(outline: &Outline, width: u32, height: u32, options: &SdfOptions) -> Result<Bitmap> {
    match validate_outline(outline, true) {
        OutlineValidation::Ok => {}
        OutlineValidation::EmptyOutline => return Err(RasterError::EmptyOutline),
        OutlineValidation::InvalidOutline(msg) => return Err(RasterError::InvalidOutline(msg)),
    }
    let m = device_transform(options.scale, options.offset_x, options.offset_y, options.flip_y);
    let device_outline = transform_outline_2d(outline, &m);
    Ok(render_sdf(&device_outline, width, height, options.spread_pixels))
}

/// Proactively split `[0, total_height)` into `config.band_threshold`-tall
/// chunks before decomposing, rather than always decomposing the full
/// outline against one band and relying solely on reactive bisection. Each
/// chunk still bisects further on its own `PoolOverflow` via
/// [`rasterize_band`].
#[allow(clippy::too_many_arguments)]
fn rasterize_in_bands(
    outline: &Outline,
    x_min: i32,
    width: u32,
    total_height: i32,
    rule: FillRule,
    config: &RasterizerConfig,
    out: &mut Bitmap,
) -> Result<()> {
    let step = if config.band_threshold > 0 { config.band_threshold } else { total_height.max(1) };
    let mut y0 = 0;
    while y0 < total_height {
        let h = step.min(total_height - y0);
        rasterize_band(outline, x_min, width, y0, h, rule, config, 0, out)?;
        y0 += h;
    }
    Ok(())
}

/// Rasterize one rectangular band `[x_min, x_min + width) x [y0, y0 +
/// height)`, recursing via 2D bisection when the cell pool overflows: x is
/// split first, and only once the band is a single column does bisection
/// fall through to y. This keeps the per-band cell pool bounded without
/// ever re-decomposing the whole outline against a larger pool.
///
/// If even a single-pixel band still overflows at `max_bisect_depth`, this
/// degrades rather than fails: it sweeps whatever cells were accumulated
/// before the overflow and logs a warning, yielding a well-formed but
/// possibly incomplete bitmap instead of a caller-facing error.
#[allow(clippy::too_many_arguments)]
fn rasterize_band(
    outline: &Outline,
    x_min: i32,
    width: u32,
    y0: i32,
    height: i32,
    rule: FillRule,
    config: &RasterizerConfig,
    depth: u32,
    out: &mut Bitmap,
) -> Result<()> {
    if height <= 0 || width == 0 {
        return Ok(());
    }

    let mut rasterizer = Rasterizer::new_windowed(y0, height, config, x_min, width as i32);
    match decompose(outline, 1.0, &mut rasterizer) {
        Ok(()) => {
            sweep_band(&rasterizer, x_min, width, y0, height, rule, out);
            Ok(())
        }
        Err(_overflow) => {
            if depth < config.max_bisect_depth && width > 1 {
                tracing::debug!(x_min, width, y0, height, depth, "cell pool overflow; bisecting band in x");
                let half = width / 2;
                rasterize_band(outline, x_min, half, y0, height, rule, config, depth + 1, out)?;
                return rasterize_band(outline, x_min + half as i32, width - half, y0, height, rule, config, depth + 1, out);
            }
            if depth < config.max_bisect_depth && height > 1 {
                tracing::debug!(x_min, width, y0, height, depth, "cell pool overflow; bisecting band in y");
                let half = height / 2;
                rasterize_band(outline, x_min, width, y0, half, rule, config, depth + 1, out)?;
                return rasterize_band(outline, x_min, width, y0 + half, height - half, rule, config, depth + 1, out);
            }
            tracing::warn!(
                x_min,
                width,
                y0,
                height,
                depth,
                "cell pool exhausted at minimum band size; degrading to partial coverage"
            );
            sweep_band(&rasterizer, x_min, width, y0, height, rule, out);
            Ok(())
        }
    }
}

/// Sweep `rasterizer`'s accumulated cells for `[y0, y0 + height)` into
/// `out`, writing only the `[x_min, x_min + width)` slice of each output
/// row — the band may cover less than the bitmap's full width once x
/// bisection has split it.
fn sweep_band(rasterizer: &Rasterizer, x_min: i32, width: u32, y0: i32, height: i32, rule: FillRule, out: &mut Bitmap) {
    let start = x_min as usize;
    let end = start + width as usize;
    for y in y0..y0 + height {
        with_coverage_row(width as usize, |row| {
            rasterizer.sweep_scanline_row(y, x_min, rule, row);
            out.row_mut(y as u32)[start..end].copy_from_slice(row);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::PathCommand;

    fn unit_square() -> Outline {
        Outline::with_commands(vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 10.0, y: 0.0 },
            PathCommand::LineTo { x: 10.0, y: 10.0 },
            PathCommand::LineTo { x: 0.0, y: 10.0 },
            PathCommand::Close,
        ])
    }

    fn no_flip() -> RasterizeOptions {
        RasterizeOptions { flip_y: false, pad_pixels: 0, ..Default::default() }
    }

    #[test]
    fn rasterize_auto_sizes_to_bounds() {
        let config = RasterizerConfig::default();
        let glyph = rasterize(&unit_square(), &no_flip(), &config).unwrap();
        assert_eq!(glyph.bitmap.width, 10);
        assert_eq!(glyph.bitmap.height, 10);
        assert_eq!(glyph.bearing_x, 0);
        assert_eq!(glyph.bearing_y, 0);
        assert_eq!(glyph.bitmap.pixel(5, 5), 255);
    }

    #[test]
    fn rasterize_empty_outline_is_an_error() {
        let config = RasterizerConfig::default();
        let err = rasterize(&Outline::new(), &no_flip(), &config).unwrap_err();
        assert_eq!(err, RasterError::EmptyOutline);
    }

    #[test]
    fn rasterize_respects_padding() {
        let config = RasterizerConfig::default();
        let options = RasterizeOptions { pad_pixels: 2, ..no_flip() };
        let glyph = rasterize(&unit_square(), &options, &config).unwrap();
        assert_eq!(glyph.bitmap.width, 14);
        assert_eq!(glyph.bearing_x, -2);
    }

    #[test]
    fn rasterize_scales_coordinates() {
        let config = RasterizerConfig::default();
        let options = RasterizeOptions { scale: 2.0, ..no_flip() };
        let glyph = rasterize(&unit_square(), &options, &config).unwrap();
        assert_eq!(glyph.bitmap.width, 20);
        assert_eq!(glyph.bitmap.height, 20);
    }

    #[test]
    fn flip_y_negates_vertical_placement() {
        let config = RasterizerConfig::default();
        let flipped = rasterize(&unit_square(), &RasterizeOptions { pad_pixels: 0, ..Default::default() }, &config).unwrap();
        // Under flip_y the square's device-space y range becomes [-10, 0],
        // so bearing_y (its floor) must be negative.
        assert_eq!(flipped.bearing_y, -10);
    }

    #[test]
    fn offset_translates_bearings() {
        let config = RasterizerConfig::default();
        let options = RasterizeOptions { offset_x: 100.0, offset_y: 50.0, ..no_flip() };
        let glyph = rasterize(&unit_square(), &options, &config).unwrap();
        assert_eq!(glyph.bearing_x, 100);
        assert_eq!(glyph.bearing_y, 50);
    }

    #[test]
    fn rasterize_blurred_softens_edges() {
        let config = RasterizerConfig::default();
        let options = RasterizeOptions { pad_pixels: 4, ..no_flip() };
        let glyph = rasterize_blurred(&unit_square(), &options, &BlurOptions { sigma: 1.5 }, &config).unwrap();
        assert!(glyph.bitmap.pixel(2, 7) > 0);
    }

    #[test]
    fn rasterize_sdf_produces_midlevel_edge() {
        let options = SdfOptions::default();
        let glyph = rasterize_sdf(&unit_square(), &options).unwrap();
        assert!(glyph.bitmap.pixel(glyph.bitmap.width / 2, glyph.bitmap.height / 2) > 200);
    }

    #[test]
    fn rasterize_forces_bisection_with_tiny_pool() {
        let mut config = RasterizerConfig::default();
        config.cell_pool_capacity = 4;
        let glyph = rasterize(&unit_square(), &no_flip(), &config).unwrap();
        assert_eq!(glyph.bitmap.pixel(5, 5), 255);
    }

    #[test]
    fn rasterize_forces_bisection_with_tiny_pool_on_wide_shape() {
        // A wide, short outline forces the band rasterizer through its x
        // bisection path (not just y) before the pool overflow resolves.
        let wide = Outline::with_commands(vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 40.0, y: 0.0 },
            PathCommand::LineTo { x: 40.0, y: 3.0 },
            PathCommand::LineTo { x: 0.0, y: 3.0 },
            PathCommand::Close,
        ]);
        let mut config = RasterizerConfig::default();
        config.cell_pool_capacity = 4;
        let glyph = rasterize(&wide, &no_flip(), &config).unwrap();
        assert_eq!(glyph.bitmap.pixel(20, 1), 255);
        assert_eq!(glyph.bitmap.pixel(0, 1), 255);
        assert_eq!(glyph.bitmap.pixel(39, 1), 255);
    }

    #[test]
    fn rasterize_degrades_to_partial_coverage_instead_of_erroring() {
        // At max_bisect_depth=0 a single-pixel band pool overflow can no
        // longer split further and must degrade rather than error.
        let mut config = RasterizerConfig::default();
        config.cell_pool_capacity = 1;
        config.max_bisect_depth = 0;
        let result = rasterize(&unit_square(), &no_flip(), &config);
        assert!(result.is_ok(), "pool exhaustion must degrade to partial coverage, not error");
    }

    #[test]
    fn rasterize_to_size_clips_to_target() {
        let config = RasterizerConfig::default();
        let bitmap = rasterize_to_size(&unit_square(), 5, 5, &no_flip(), &config).unwrap();
        assert_eq!((bitmap.width, bitmap.height), (5, 5));
        assert_eq!(bitmap.pixel(3, 3), 255);
    }
}
