//! Root crate: thin re-export over [`raster_core`], the glyph rasterization
//! engine. Downstream consumers (font-table parsers, shapers, atlas packers)
//! depend on this crate; everything here is a pass-through.

pub use raster_core::*;
