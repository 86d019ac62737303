//! Tunable limits for the rasterization core.
//!
//! There is no file- or environment-variable-based configuration surface in
//! this crate (see "no wire protocol, CLI, environment-variable
//! surface, or persisted state in the core") — [`RasterizerConfig`] is the
//! in-process configuration a caller threads through constructors, with
//! `Default` matching the literal defaults called out by this contract.

/// Tunable limits controlling memory bounds and termination guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterizerConfig {
    /// Number of cells in the [`crate::cell::CellBuffer`] pool, including
    /// the null-cell sentinel. Default: 2048.
    pub cell_pool_capacity: usize,
    /// Target height above which rasterization switches to band processing.
    /// Default: 256.
    pub band_threshold: i32,
    /// Maximum recursion depth for band bisection (x then y) on
    /// `PoolOverflow` before the band degrades to whatever partial coverage
    /// had already accumulated, logged as a warning. Default: 32.
    pub max_bisect_depth: u32,
    /// Maximum recursion depth for quadratic/cubic curve flattening before
    /// falling back to a straight line. Default: 16.
    pub max_curve_depth: u32,
}

impl Default for RasterizerConfig {
    fn default() -> Self {
        Self {
            cell_pool_capacity: 2048,
            band_threshold: 256,
            max_bisect_depth: 32,
            max_curve_depth: 16,
        }
    }
}
