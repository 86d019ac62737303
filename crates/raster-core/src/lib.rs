//! Glyph rasterization core: a scanline anti-aliased rasterizer, signed
//! distance field renderer, separable/cascade blur pipeline, and outline
//! geometry services shared by every caller that turns a vector outline
//! into pixels.
//!
//! The crate has no I/O, no font parsing, and no text shaping — callers
//! hand it an already-resolved [`Outline`] in font or device units and get
//! back a [`bitmap::RasterizedGlyph`] or a signed distance field.

pub mod bitmap;
pub mod bitmap_ops;
pub mod blur;
pub mod bounds;
pub mod cascade;
pub mod cell;
pub mod config;
pub mod decompose;
pub mod error;
pub mod fill;
pub mod fixed;
pub mod matrix;
pub mod outline;
pub mod raster;
pub mod rasterize;
pub mod scratch;
pub mod sdf;
pub mod transform;

pub use bitmap::{Bitmap, PixelMode, RasterizedGlyph};
pub use config::RasterizerConfig;
pub use error::{RasterError, Result};
pub use matrix::{Matrix2D, Matrix3x3};
pub use outline::{Bounds, FillRule, Outline, OutlineFlags, OutlineValidation, PathCommand};
pub use rasterize::{
    rasterize, rasterize_blurred, rasterize_sdf, rasterize_sdf_to_size, rasterize_to_size, BlurOptions,
    RasterizeOptions, SdfOptions,
};
