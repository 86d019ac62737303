//! Separable blur kernels: two-pass Gaussian and running-sum box blur.
//!
//! Both passes work per-channel so they apply unmodified to `Gray`(1),
//! `Lcd`/`LcdV`(3), and `Rgba`(4) bitmaps — the channel stride is just
//! `mode.bytes_per_pixel()`. `Mono` has no per-channel byte to convolve, so
//! it is converted to `Gray` first.

use crate::bitmap::{Bitmap, PixelMode};
use crate::bitmap_ops::mono_to_gray;

/// Build a normalized 1D Gaussian kernel with standard deviation `sigma`,
/// truncated at `radius` samples on either side of center.
fn gaussian_kernel(sigma: f64, radius: usize) -> Vec<f64> {
    let mut kernel = Vec::with_capacity(2 * radius + 1);
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut sum = 0.0;
    for i in 0..=2 * radius {
        let x = i as f64 - radius as f64;
        let v = (-x * x / two_sigma_sq).exp();
        kernel.push(v);
        sum += v;
    }
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

/// Half-width in samples: kernel size is `2 * ceil(2 * sigma) + 1`.
fn radius_for_sigma(sigma: f64) -> usize {
    (2.0 * sigma).ceil().max(1.0) as usize
}

/// Convolve one channel of a row, reading/writing every `channels`-th byte
/// starting at `channel`. Out-of-bounds samples clamp to the edge pixel
/// ("out-of-bounds samples use clamp-to-edge, not zero-fill, so blurred
/// glyphs don't darken at their own boundary").
fn convolve_row_channel(src: &[u8], dst: &mut [u8], kernel: &[f64], channels: usize, channel: usize) {
    let radius = kernel.len() / 2;
    let width = src.len() / channels;
    for x in 0..width {
        let mut acc = 0.0;
        for (k, &weight) in kernel.iter().enumerate() {
            let offset = k as i64 - radius as i64;
            let sx = (x as i64 + offset).clamp(0, width as i64 - 1) as usize;
            acc += src[sx * channels + channel] as f64 * weight;
        }
        dst[x * channels + channel] = acc.round().clamp(0.0, 255.0) as u8;
    }
}

/// Two-pass separable Gaussian blur: horizontal pass then vertical pass,
/// applied independently to each color channel.
pub fn gaussian_blur(src: &Bitmap, sigma: f64) -> Bitmap {
    if src.mode == PixelMode::Mono {
        return gaussian_blur(&mono_to_gray(src), sigma);
    }
    if sigma <= 0.0 {
        return src.clone();
    }
    let radius = radius_for_sigma(sigma);
    let kernel = gaussian_kernel(sigma, radius);
    let channels = src.mode.bytes_per_pixel();

    let mut horizontal = Bitmap::new(src.width, src.height, src.mode);
    for y in 0..src.height {
        let src_row = src.row(y);
        let dst_row = horizontal.row_mut(y);
        for c in 0..channels {
            convolve_row_channel(src_row, dst_row, &kernel, channels, c);
        }
    }

    let mut out = Bitmap::new(src.width, src.height, src.mode);
    let mut column = vec![0u8; src.height as usize * channels];
    let mut column_out = vec![0u8; src.height as usize * channels];
    for x in 0..src.width as usize {
        for y in 0..src.height as usize {
            let row = horizontal.row(y as u32);
            column[y * channels..(y + 1) * channels].copy_from_slice(&row[x * channels..(x + 1) * channels]);
        }
        for c in 0..channels {
            convolve_row_channel(&column, &mut column_out, &kernel, channels, c);
        }
        for y in 0..src.height as usize {
            let row = out.row_mut(y as u32);
            row[x * channels..(x + 1) * channels].copy_from_slice(&column_out[y * channels..(y + 1) * channels]);
        }
    }
    out
}

/// Box blur via a sliding running sum, with the averaging denominator
/// shrinking near the edges rather than including phantom zero samples.
fn box_blur_1d_channel(src: &[u8], dst: &mut [u8], radius: usize, channels: usize, channel: usize) {
    let width = src.len() / channels;
    if width == 0 {
        return;
    }
    let r = radius as i64;
    let mut sum: i64 = 0;
    let mut count: i64 = 0;
    for k in 0..=r.min(width as i64 - 1) {
        sum += src[k as usize * channels + channel] as i64;
        count += 1;
    }
    for x in 0..width as i64 {
        dst[x as usize * channels + channel] = (sum / count.max(1)) as u8;

        let enter = x + r + 1;
        let leave = x - r;
        if enter < width as i64 {
            sum += src[enter as usize * channels + channel] as i64;
            count += 1;
        }
        if leave >= 0 {
            sum -= src[leave as usize * channels + channel] as i64;
            count -= 1;
        }
    }
}

/// Two-pass separable box blur with the given box `radius` in pixels,
/// applied independently to each color channel.
pub fn box_blur(src: &Bitmap, radius: usize) -> Bitmap {
    if src.mode == PixelMode::Mono {
        return box_blur(&mono_to_gray(src), radius);
    }
    if radius == 0 {
        return src.clone();
    }
    let channels = src.mode.bytes_per_pixel();

    let mut horizontal = Bitmap::new(src.width, src.height, src.mode);
    for y in 0..src.height {
        let src_row = src.row(y);
        let dst_row = horizontal.row_mut(y);
        for c in 0..channels {
            box_blur_1d_channel(src_row, dst_row, radius, channels, c);
        }
    }

    let mut out = Bitmap::new(src.width, src.height, src.mode);
    let mut column = vec![0u8; src.height as usize * channels];
    let mut column_out = vec![0u8; src.height as usize * channels];
    for x in 0..src.width as usize {
        for y in 0..src.height as usize {
            let row = horizontal.row(y as u32);
            column[y * channels..(y + 1) * channels].copy_from_slice(&row[x * channels..(x + 1) * channels]);
        }
        for c in 0..channels {
            box_blur_1d_channel(&column, &mut column_out, radius, channels, c);
        }
        for y in 0..src.height as usize {
            let row = out.row_mut(y as u32);
            row[x * channels..(x + 1) * channels].copy_from_slice(&column_out[y * channels..(y + 1) * channels]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse(w: u32, h: u32, x: u32, y: u32) -> Bitmap {
        let mut b = Bitmap::new(w, h, PixelMode::Gray);
        b.set_pixel(x, y, 255);
        b
    }

    #[test]
    fn gaussian_blur_spreads_impulse_and_preserves_mass_roughly() {
        let src = impulse(9, 9, 4, 4);
        let blurred = gaussian_blur(&src, 1.5);
        assert!(blurred.pixel(4, 4) < 255);
        assert!(blurred.pixel(4, 4) > blurred.pixel(0, 0));
        assert!(blurred.pixel(3, 4) > 0);
    }

    #[test]
    fn gaussian_blur_zero_sigma_is_identity() {
        let src = impulse(5, 5, 2, 2);
        let blurred = gaussian_blur(&src, 0.0);
        assert_eq!(blurred.pixel(2, 2), 255);
    }

    #[test]
    fn box_blur_flattens_impulse_within_radius() {
        let src = impulse(5, 5, 2, 2);
        let blurred = box_blur(&src, 1);
        // All 9 cells in the 3x3 neighborhood average 255/9.
        let expected = 255 / 9;
        assert_eq!(blurred.pixel(2, 2), expected as u8);
    }

    #[test]
    fn box_blur_edge_uses_adaptive_denominator() {
        // Corner pixel's neighborhood is clipped to a 2x2 block, not 3x3,
        // so the average should be higher than dividing by 9.
        let src = impulse(5, 5, 0, 0);
        let blurred = box_blur(&src, 1);
        assert_eq!(blurred.pixel(0, 0), (255 / 4) as u8);
    }

    #[test]
    fn gaussian_blur_handles_rgba_per_channel() {
        let mut src = Bitmap::new(5, 5, PixelMode::Rgba);
        let row = src.row_mut(2);
        row[2 * 4..2 * 4 + 4].copy_from_slice(&[200, 100, 50, 255]);
        let blurred = gaussian_blur(&src, 1.0);
        let center = &blurred.row(2)[2 * 4..2 * 4 + 4];
        assert!(center[0] < 200 && center[0] > 0);
        assert!(center[1] < 100 && center[1] > 0);
        assert!(center[2] < 50);
        assert!(center[3] < 255 && center[3] > 0);
    }

    #[test]
    fn gaussian_blur_converts_mono_to_gray() {
        let mut src = Bitmap::new(9, 1, PixelMode::Mono);
        src.row_mut(0)[0] = 0x08; // bit 4 set, matching a Gray impulse at x=4
        let blurred = gaussian_blur(&src, 1.0);
        assert_eq!(blurred.mode, PixelMode::Gray);
        assert!(blurred.pixel(4, 0) < 255 && blurred.pixel(4, 0) > 0);
    }

    #[test]
    fn box_blur_handles_lcd_per_channel() {
        let mut src = Bitmap::new(5, 1, PixelMode::Lcd);
        src.row_mut(0)[2 * 3..2 * 3 + 3].copy_from_slice(&[255, 0, 0]);
        let blurred = box_blur(&src, 1);
        let center = &blurred.row(0)[2 * 3..2 * 3 + 3];
        assert!(center[0] > 0 && center[0] < 255);
        assert_eq!(center[1], 0);
        assert_eq!(center[2], 0);
    }
}
