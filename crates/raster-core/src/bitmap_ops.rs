//! Bitmap transforms: pixel-mode conversion, geometric resampling, and
//! compositing.

use crate::bitmap::{Bitmap, PixelMode};
use crate::fill::FillProducer;

/// Convert a `Gray` coverage bitmap into an `Rgba` bitmap by sampling
/// `fill` for color and using the coverage byte as alpha.
pub fn gray_to_rgba(src: &Bitmap, fill: &dyn FillProducer) -> Bitmap {
    assert_eq!(src.mode, PixelMode::Gray);
    let mut out = Bitmap::new(src.width, src.height, PixelMode::Rgba);
    for y in 0..src.height {
        let src_row = src.row(y);
        let dst_row = out.row_mut(y);
        for x in 0..src.width {
            let coverage = src_row[x as usize];
            let [r, g, b, a] = fill.sample(x, y);
            let alpha = ((a as u32 * coverage as u32) / 255) as u8;
            let base = x as usize * 4;
            dst_row[base] = r;
            dst_row[base + 1] = g;
            dst_row[base + 2] = b;
            dst_row[base + 3] = alpha;
        }
    }
    out
}

/// Convert a `Gray` coverage bitmap into a horizontal `Lcd` triad bitmap by
/// replicating the same coverage into all three subpixel channels — an
/// equal-coverage-per-channel simplification rather than a true
/// per-channel filter kernel with inter-channel leakage compensation (see
/// `DESIGN.md`'s Open Question log).
pub fn gray_to_lcd(src: &Bitmap) -> Bitmap {
    assert_eq!(src.mode, PixelMode::Gray);
    let mut out = Bitmap::new(src.width, src.height, PixelMode::Lcd);
    for y in 0..src.height {
        let src_row = src.row(y);
        let dst_row = out.row_mut(y);
        for x in 0..src.width {
            let coverage = src_row[x as usize];
            let base = x as usize * 3;
            dst_row[base] = coverage;
            dst_row[base + 1] = coverage;
            dst_row[base + 2] = coverage;
        }
    }
    out
}

/// Threshold a `Gray` bitmap into a `Mono` bitmap at the given coverage
/// cutoff (pixels `>= threshold` are set).
pub fn gray_to_mono(src: &Bitmap, threshold: u8) -> Bitmap {
    assert_eq!(src.mode, PixelMode::Gray);
    let mut out = Bitmap::new(src.width, src.height, PixelMode::Mono);
    for y in 0..src.height {
        let src_row = src.row(y);
        let dst_row = out.row_mut(y);
        for x in 0..src.width {
            if src_row[x as usize] >= threshold {
                dst_row[x as usize / 8] |= 0x80 >> (x % 8);
            }
        }
    }
    out
}

/// Convert a `Mono` bitmap into an 8-bit `Gray` bitmap: a set bit becomes
/// `255`, a clear bit becomes `0`. This is the entry point every per-channel
/// pixel operation (blur, cascade) funnels `Mono` input through, since a
/// bit-packed row has no per-pixel byte to convolve.
pub fn mono_to_gray(src: &Bitmap) -> Bitmap {
    assert_eq!(src.mode, PixelMode::Mono);
    let mut out = Bitmap::new(src.width, src.height, PixelMode::Gray);
    for y in 0..src.height {
        let src_row = src.row(y);
        let dst_row = out.row_mut(y);
        for x in 0..src.width {
            let bit = src_row[x as usize / 8] & (0x80 >> (x % 8));
            dst_row[x as usize] = if bit != 0 { 255 } else { 0 };
        }
    }
    out
}

/// Pad a `Gray` bitmap with `pad` pixels of zero coverage on every side.
pub fn pad(src: &Bitmap, pad: u32) -> Bitmap {
    assert_eq!(src.mode, PixelMode::Gray);
    let mut out = Bitmap::new(src.width + 2 * pad, src.height + 2 * pad, PixelMode::Gray);
    for y in 0..src.height {
        let dst_row = out.row_mut(y + pad);
        dst_row[pad as usize..pad as usize + src.width as usize].copy_from_slice(src.row(y));
    }
    out
}

/// Shift a `Gray` bitmap by `(dx, dy)` whole pixels, filling uncovered
/// area with zero. Positive `dx`/`dy` move content right/down.
pub fn shift(src: &Bitmap, dx: i32, dy: i32) -> Bitmap {
    assert_eq!(src.mode, PixelMode::Gray);
    let mut out = Bitmap::new(src.width, src.height, PixelMode::Gray);
    for y in 0..src.height {
        let sy = y as i64 - dy as i64;
        if sy < 0 || sy >= src.height as i64 {
            continue;
        }
        let src_row = src.row(sy as u32);
        let dst_row = out.row_mut(y);
        for x in 0..src.width {
            let sx = x as i64 - dx as i64;
            if sx >= 0 && sx < src.width as i64 {
                dst_row[x as usize] = src_row[sx as usize];
            }
        }
    }
    out
}

/// Shear a `Gray` bitmap horizontally: row `y` is shifted by
/// `round(factor * y)` pixels.
pub fn shear_x(src: &Bitmap, factor: f64) -> Bitmap {
    assert_eq!(src.mode, PixelMode::Gray);
    let mut out = Bitmap::new(src.width, src.height, PixelMode::Gray);
    for y in 0..src.height {
        let dx = (factor * y as f64).round() as i32;
        let src_row = src.row(y);
        let dst_row = out.row_mut(y);
        for x in 0..src.width {
            let sx = x as i64 - dx as i64;
            if sx >= 0 && sx < src.width as i64 {
                dst_row[x as usize] = src_row[sx as usize];
            }
        }
    }
    out
}

/// Nearest-neighbor resize of a `Gray` bitmap to `(new_w, new_h)`.
pub fn resize_nearest(src: &Bitmap, new_w: u32, new_h: u32) -> Bitmap {
    assert_eq!(src.mode, PixelMode::Gray);
    let mut out = Bitmap::new(new_w, new_h, PixelMode::Gray);
    if new_w == 0 || new_h == 0 || src.width == 0 || src.height == 0 {
        return out;
    }
    for y in 0..new_h {
        let sy = (y as u64 * src.height as u64 / new_h as u64) as u32;
        let src_row = src.row(sy.min(src.height - 1));
        let dst_row = out.row_mut(y);
        for x in 0..new_w {
            let sx = (x as u64 * src.width as u64 / new_w as u64) as u32;
            dst_row[x as usize] = src_row[sx.min(src.width - 1) as usize];
        }
    }
    out
}

/// Bilinear resize of a `Gray` bitmap to `(new_w, new_h)`.
pub fn resize_bilinear(src: &Bitmap, new_w: u32, new_h: u32) -> Bitmap {
    assert_eq!(src.mode, PixelMode::Gray);
    let mut out = Bitmap::new(new_w, new_h, PixelMode::Gray);
    if new_w == 0 || new_h == 0 || src.width < 2 || src.height < 2 {
        return resize_nearest(src, new_w, new_h);
    }
    let scale_x = (src.width - 1) as f64 / (new_w.max(1) - 1).max(1) as f64;
    let scale_y = (src.height - 1) as f64 / (new_h.max(1) - 1).max(1) as f64;
    for y in 0..new_h {
        let fy = y as f64 * scale_y;
        let y0 = fy.floor() as u32;
        let y1 = (y0 + 1).min(src.height - 1);
        let ty = fy - y0 as f64;
        let row0 = src.row(y0);
        let row1 = src.row(y1);
        let dst_row = out.row_mut(y);
        for x in 0..new_w {
            let fx = x as f64 * scale_x;
            let x0 = fx.floor() as u32;
            let x1 = (x0 + 1).min(src.width - 1);
            let tx = fx - x0 as f64;
            let a = row0[x0 as usize] as f64;
            let b = row0[x1 as usize] as f64;
            let c = row1[x0 as usize] as f64;
            let d = row1[x1 as usize] as f64;
            let top = a + (b - a) * tx;
            let bottom = c + (d - c) * tx;
            dst_row[x as usize] = (top + (bottom - top) * ty).round() as u8;
        }
    }
    out
}

/// Compositing operators for combining coverage bitmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeMode {
    Over,
    Additive,
    Subtractive,
    Multiplicative,
    Max,
}

/// Composite `src` over `dst` in place (both `Gray`, same dimensions).
pub fn composite(dst: &mut Bitmap, src: &Bitmap, mode: CompositeMode) {
    assert_eq!(dst.mode, PixelMode::Gray);
    assert_eq!(src.mode, PixelMode::Gray);
    assert_eq!((dst.width, dst.height), (src.width, src.height));
    let width = dst.width;
    for y in 0..dst.height {
        let src_row = src.row(y).to_vec();
        let dst_row = dst.row_mut(y);
        for x in 0..width as usize {
            let s = src_row[x] as u32;
            let d = dst_row[x] as u32;
            dst_row[x] = match mode {
                CompositeMode::Over => (s + d * (255 - s) / 255).min(255) as u8,
                CompositeMode::Additive => (s + d).min(255) as u8,
                CompositeMode::Subtractive => d.saturating_sub(s) as u8,
                CompositeMode::Multiplicative => (s * d / 255) as u8,
                CompositeMode::Max => s.max(d) as u8,
            };
        }
    }
}
