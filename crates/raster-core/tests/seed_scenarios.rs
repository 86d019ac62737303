//! The six literal-value seed scenarios used to pin down this crate's
//! numeric contracts across the rasterizer, transform, SDF, and blur
//! subsystems.

use raster_core::bitmap::PixelMode;
use raster_core::bitmap_ops::resize_nearest;
use raster_core::blur::gaussian_blur;
use raster_core::cascade::cascade_blur;
use raster_core::config::RasterizerConfig;
use raster_core::outline::PathCommand;
use raster_core::transform::{rotate_outline_90, Quadrant};
use raster_core::{rasterize, rasterize_sdf, rasterize_to_size, Outline, RasterizeOptions, SdfOptions};

fn no_flip() -> RasterizeOptions {
    RasterizeOptions { flip_y: false, pad_pixels: 0, ..Default::default() }
}

#[test]
fn unit_square() {
    let outline = Outline::with_commands(vec![
        PathCommand::MoveTo { x: 10.0, y: 10.0 },
        PathCommand::LineTo { x: 20.0, y: 10.0 },
        PathCommand::LineTo { x: 20.0, y: 20.0 },
        PathCommand::LineTo { x: 10.0, y: 20.0 },
        PathCommand::Close,
    ]);
    let config = RasterizerConfig::default();
    let bitmap = rasterize_to_size(&outline, 30, 30, &no_flip(), &config).unwrap();

    for y in 0..30u32 {
        for x in 0..30u32 {
            let expected = if (10..20).contains(&x) && (10..20).contains(&y) { 255 } else { 0 };
            assert_eq!(bitmap.pixel(x, y), expected, "mismatch at ({x},{y})");
        }
    }
}

#[test]
fn quadratic_bulge() {
    let outline = Outline::with_commands(vec![
        PathCommand::MoveTo { x: 0.0, y: 30.0 },
        PathCommand::QuadTo { cx: 30.0, cy: 0.0, x: 60.0, y: 30.0 },
        PathCommand::LineTo { x: 60.0, y: 40.0 },
        PathCommand::LineTo { x: 0.0, y: 40.0 },
        PathCommand::Close,
    ]);
    let config = RasterizerConfig::default();
    let bitmap = rasterize_to_size(&outline, 80, 80, &no_flip(), &config).unwrap();

    assert!(bitmap.pixel(30, 20) > 128, "inside the closed region under the curve's peak");
    assert_eq!(bitmap.pixel(30, 5), 0, "above the curve's peak there is no coverage");
}

#[test]
fn rotate_90_four_times_is_identity() {
    let outline = Outline::with_commands(vec![
        PathCommand::MoveTo { x: 3.0, y: 7.0 },
        PathCommand::LineTo { x: 11.0, y: 2.0 },
        PathCommand::QuadTo { cx: 15.0, cy: 15.0, x: 5.0, y: 20.0 },
        PathCommand::Close,
    ]);
    let mut rotated = outline.clone();
    for _ in 0..4 {
        rotated = rotate_outline_90(&rotated, Quadrant::Deg90);
    }

    let original_box = raster_core::bounds::compute_control_box(&outline);
    let rotated_box = raster_core::bounds::compute_control_box(&rotated);
    assert!((original_box.min_x - rotated_box.min_x).abs() < 1e-9);
    assert!((original_box.min_y - rotated_box.min_y).abs() < 1e-9);
    assert!((original_box.max_x - rotated_box.max_x).abs() < 1e-9);
    assert!((original_box.max_y - rotated_box.max_y).abs() < 1e-9);
}

#[test]
fn sdf_square() {
    let outline = Outline::with_commands(vec![
        PathCommand::MoveTo { x: 20.0, y: 20.0 },
        PathCommand::LineTo { x: 80.0, y: 20.0 },
        PathCommand::LineTo { x: 80.0, y: 80.0 },
        PathCommand::LineTo { x: 20.0, y: 80.0 },
        PathCommand::Close,
    ]);
    let options = SdfOptions { pad_pixels: 0, spread_pixels: 20.0, ..Default::default() };
    let glyph = rasterize_sdf(&outline, &options).unwrap();
    assert_eq!(glyph.bitmap.mode, PixelMode::Gray);

    // The SDF bitmap is auto-sized and bearing-shifted; recover outline
    // coordinates by subtracting the bearing.
    let to_local = |x: i32, y: i32| ((x - glyph.bearing_x) as u32, (y - glyph.bearing_y) as u32);

    let (cx, cy) = to_local(50, 50);
    assert!(glyph.bitmap.pixel(cx, cy) >= 200);

    let (ox, oy) = to_local(10, 10);
    assert!(glyph.bitmap.pixel(ox, oy) <= 80);

    let (ex, ey) = to_local(20, 50);
    let edge_value = glyph.bitmap.pixel(ex, ey);
    assert!((120..=136).contains(&edge_value), "got {edge_value}");
}

#[test]
fn cascade_vs_gaussian_both_spread_impulse_mass_comparably() {
    let mut impulse = raster_core::Bitmap::new(21, 21, PixelMode::Gray);
    impulse.set_pixel(10, 10, 255);

    let gaussian = gaussian_blur(&impulse, 1.5);
    let cascade = cascade_blur(&impulse, 1.5);

    let sum = |b: &raster_core::Bitmap| -> u64 {
        (0..b.height).flat_map(|y| (0..b.width).map(move |x| (x, y))).map(|(x, y)| b.pixel(x, y) as u64).sum()
    };
    let gs = sum(&gaussian) as f64;
    let cs = sum(&cascade) as f64;
    let rel_diff = (gs - cs).abs() / gs.max(cs).max(1.0);
    assert!(rel_diff <= 0.05, "byte sums differ by {}%", rel_diff * 100.0);

    let center_diff = (gaussian.pixel(10, 10) as i32 - cascade.pixel(10, 10) as i32).abs();
    assert!(center_diff <= 30, "center pixels differ by {center_diff}");

    assert!(gaussian.pixel(10, 10) < 255, "gaussian blur must soften the impulse center");
    assert!(cascade.pixel(10, 10) < 255, "cascade blur must soften the impulse center");
    assert!(gaussian.pixel(10, 10) >= gaussian.pixel(5, 10), "gaussian falls off away from center");
    assert!(cascade.pixel(10, 10) >= cascade.pixel(5, 10), "cascade falls off away from center");
}

#[test]
fn empty_outline_to_sdf_is_all_zero() {
    let outline = Outline::new();
    let options = SdfOptions { pad_pixels: 0, ..Default::default() };
    // An empty outline renders as all-zero coverage via the fixed-size
    // path since there are no bounds to auto-size against.
    let bitmap = raster_core::rasterize_sdf_to_size(&outline, 10, 10, &options).unwrap();
    for y in 0..10u32 {
        for x in 0..10u32 {
            assert_eq!(bitmap.pixel(x, y), 0);
        }
    }
}

#[test]
fn resize_nearest_is_available_for_bitmap_post_processing() {
    // Smoke-test the public bitmap_ops surface alongside the seed
    // scenarios above, since it backs the blur pipeline's working-size
    // downsampling in real callers.
    let mut b = raster_core::Bitmap::new(2, 2, PixelMode::Gray);
    b.set_pixel(0, 0, 10);
    let resized = resize_nearest(&b, 4, 4);
    assert_eq!(resized.width, 4);
}
