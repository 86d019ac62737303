//! Thread-local reusable scratch buffers.
//!
//! Mirrors `engine-core::text::GlyphRunCache`'s process-wide
//! `OnceLock<Mutex<HashMap<...>>>` reuse pattern, but scoped per-thread with
//! `thread_local!` + `RefCell` instead of a shared mutex: rasterization is
//! CPU-bound, single-threaded-per-call work, so a per-thread cache avoids
//! lock contention the process-wide cache would otherwise serialize on.

use std::cell::RefCell;

thread_local! {
    static COVERAGE_ROW: RefCell<Vec<u8>> = const { RefCell::new(Vec::new()) };
}

/// Borrow the thread-local coverage-row scratch buffer, resized to at
/// least `len` and zero-filled, for the duration of `f`.
pub fn with_coverage_row<R>(len: usize, f: impl FnOnce(&mut [u8]) -> R) -> R {
    COVERAGE_ROW.with(|cell| {
        let mut row = cell.borrow_mut();
        if row.len() < len {
            row.resize(len, 0);
        }
        let slice = &mut row[..len];
        slice.fill(0);
        f(slice)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_row_is_reused_and_zeroed_between_calls() {
        with_coverage_row(4, |row| row.fill(7));
        with_coverage_row(4, |row| {
            assert_eq!(row, &[0, 0, 0, 0]);
        });
    }

    #[test]
    fn scratch_row_grows_to_fit_larger_requests() {
        with_coverage_row(2, |row| assert_eq!(row.len(), 2));
        with_coverage_row(10, |row| assert_eq!(row.len(), 10));
    }
}
