//! Error types for the rasterization core.
//!
//! Mirrors the `thiserror`-based error enums elsewhere in this workspace
//! (compare the CEF renderer's `CefError`): one variant per externally
//! visible failure mode, human-readable `#[error("...")]` messages, and a
//! crate-local `Result` alias.

use thiserror::Error;

/// Result type for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, RasterError>;

/// Errors surfaced to callers of the rasterization core.
///
/// `PoolOverflow` (cell-pool exhaustion) is deliberately absent here: it is
/// an internal signal recovered by band bisection and never reaches this
/// enum. See [`crate::cell::PoolOverflow`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RasterError {
    /// Structural or numeric garbage in the input outline: a non-finite
    /// coordinate, a draw command before the first `MoveTo`, or an
    /// unrecognized command tag.
    #[error("invalid outline: {0}")]
    InvalidOutline(String),

    /// The outline is well-formed but contains no drawable commands.
    /// Equivalent to success with a zero-coverage bitmap; kept as a distinct
    /// variant so callers can special-case it without inspecting pixels.
    #[error("outline is empty")]
    EmptyOutline,
}
