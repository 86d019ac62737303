//! Signed distance field rendering.
//!
//! No corpus file implements an SDF renderer directly; this module follows
//! this crate's written contract in the idiom established by the rest
//! of this crate — plain free functions over [`Outline`]/[`Bitmap`], no
//! renderer object, mirroring [`crate::raster`]'s style.

use crate::bitmap::{Bitmap, PixelMode};
use crate::outline::{Outline, PathCommand};

/// Number of samples used to flatten a curve segment for distance
/// evaluation ("sample curves at no fewer than 32 points when
/// computing nearest-edge distance").
const DISTANCE_SAMPLES: usize = 32;

/// Number of samples used to flatten a curve segment for the inside/outside
/// ray-casting test ("a coarser 16-sample polyline suffices for
/// the winding test").
const INSIDE_TEST_SAMPLES: usize = 16;

#[derive(Debug, Clone, Copy)]
struct Segment {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

/// Shortest distance from `(px, py)` to the segment, and the signed area of
/// the triangle `(p0, p1, point)` (used by callers that need orientation,
/// none here — kept simple: distance only).
fn point_segment_distance(px: f64, py: f64, seg: Segment) -> f64 {
    let dx = seg.x1 - seg.x0;
    let dy = seg.y1 - seg.y0;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq < f64::EPSILON {
        0.0
    } else {
        (((px - seg.x0) * dx + (py - seg.y0) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let cx = seg.x0 + dx * t;
    let cy = seg.y0 + dy * t;
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

fn eval_quad(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), t: f64) -> (f64, f64) {
    let mt = 1.0 - t;
    (
        mt * mt * p0.0 + 2.0 * mt * t * p1.0 + t * t * p2.0,
        mt * mt * p0.1 + 2.0 * mt * t * p1.1 + t * t * p2.1,
    )
}

fn eval_cubic(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), t: f64) -> (f64, f64) {
    let mt = 1.0 - t;
    (
        mt * mt * mt * p0.0 + 3.0 * mt * mt * t * p1.0 + 3.0 * mt * t * t * p2.0 + t * t * t * p3.0,
        mt * mt * mt * p0.1 + 3.0 * mt * mt * t * p1.1 + 3.0 * mt * t * t * p2.1 + t * t * t * p3.1,
    )
}

/// Flatten `outline` into one or more closed polylines at `samples` points
/// per curve segment.
fn flatten_contours(outline: &Outline, samples: usize) -> Vec<Vec<(f64, f64)>> {
    let mut contours: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    let mut cursor = (0.0, 0.0);
    let mut start = (0.0, 0.0);

    for cmd in &outline.commands {
        match *cmd {
            PathCommand::MoveTo { x, y } => {
                if current.len() > 1 {
                    contours.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
                current.push((x, y));
                cursor = (x, y);
                start = (x, y);
            }
            PathCommand::LineTo { x, y } => {
                current.push((x, y));
                cursor = (x, y);
            }
            PathCommand::QuadTo { cx, cy, x, y } => {
                for i in 1..=samples {
                    let t = i as f64 / samples as f64;
                    current.push(eval_quad(cursor, (cx, cy), (x, y), t));
                }
                cursor = (x, y);
            }
            PathCommand::CubicTo { cx1, cy1, cx2, cy2, x, y } => {
                for i in 1..=samples {
                    let t = i as f64 / samples as f64;
                    current.push(eval_cubic(cursor, (cx1, cy1), (cx2, cy2), (x, y), t));
                }
                cursor = (x, y);
            }
            PathCommand::Close => {
                if cursor != start {
                    current.push(start);
                }
                cursor = start;
            }
        }
    }
    if current.len() > 1 {
        contours.push(current);
    }
    contours
}

fn segments_of(contour: &[(f64, f64)]) -> Vec<Segment> {
    let mut segs = Vec::with_capacity(contour.len());
    for i in 0..contour.len() {
        let (x0, y0) = contour[i];
        let (x1, y1) = contour[(i + 1) % contour.len()];
        segs.push(Segment { x0, y0, x1, y1 });
    }
    segs
}

/// Even-odd ray-casting inside test against a flattened polygon.
fn point_is_inside(px: f64, py: f64, contours: &[Vec<(f64, f64)>]) -> bool {
    let mut inside = false;
    for contour in contours {
        let n = contour.len();
        for i in 0..n {
            let (x0, y0) = contour[i];
            let (x1, y1) = contour[(i + 1) % n];
            if (y0 > py) != (y1 > py) {
                let x_cross = x0 + (py - y0) / (y1 - y0) * (x1 - x0);
                if px < x_cross {
                    inside = !inside;
                }
            }
        }
    }
    inside
}

/// Render a signed distance field for `outline` into a `Gray` bitmap of
/// `width x height` pixels, with `spread` pixels of distance mapped to the
/// `[0, 255]` coverage range.
///
/// Encoding: `128 + 127 * clamp(signed_distance / spread, -1, 1)`, so 128 is
/// exactly on the edge, 255 deep inside, 0 deep outside.
pub fn render_sdf(outline: &Outline, width: u32, height: u32, spread: f64) -> Bitmap {
    let mut bitmap = Bitmap::new(width, height, PixelMode::Gray);
    if outline.is_empty() {
        return bitmap;
    }

    let distance_contours = flatten_contours(outline, DISTANCE_SAMPLES);
    let inside_contours = flatten_contours(outline, INSIDE_TEST_SAMPLES);
    let segments: Vec<Segment> = distance_contours.iter().flat_map(|c| segments_of(c)).collect();
    if segments.is_empty() {
        return bitmap;
    }

    for y in 0..height {
        let py = y as f64 + 0.5;
        let row = bitmap.row_mut(y);
        for x in 0..width {
            let px = x as f64 + 0.5;
            let mut min_dist = f64::INFINITY;
            for seg in &segments {
                let d = point_segment_distance(px, py, *seg);
                if d < min_dist {
                    min_dist = d;
                }
            }
            let signed = if point_is_inside(px, py, &inside_contours) { min_dist } else { -min_dist };
            let normalized = (signed / spread).clamp(-1.0, 1.0);
            row[x as usize] = (128.0 + 127.0 * normalized).round().clamp(0.0, 255.0) as u8;
        }
    }
    bitmap
}
