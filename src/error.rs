//! Unified error types for pathspline.
//!
//! This module provides [`SplineError`], the error type returned by the
//! public boundary of [`CubicSpline`](crate::CubicSpline). It uses the
//! `thiserror` crate for ergonomic error handling.
//!
//! The numeric kernel ([`BandedSystem`](crate::BandedSystem)) deliberately
//! performs no runtime error checking; its preconditions are caller
//! obligations, validated once at the spline boundary. Only the calls an
//! external caller can realistically get wrong are represented here.
//!
//! # Example
//!
//! ```rust
//! use pathspline::{CubicSpline, SplineError};
//! use glam::DVec2;
//!
//! let mut spline = CubicSpline::new();
//! let err = spline.set_conditions(DVec2::ZERO, DVec2::ONE, 0).unwrap_err();
//! assert_eq!(err, SplineError::InvalidPieceCount(0));
//! ```

use thiserror::Error;

/// Errors returned by the [`CubicSpline`](crate::CubicSpline) boundary.
///
/// Numeric failure (a near-singular pivot producing an extreme or
/// non-finite result) is intentionally *not* detected: the natural-spline
/// systems this crate assembles are always diagonally dominant, hence
/// always invertible without pivoting. That is a structural assumption,
/// not a runtime check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplineError {
    /// The requested piece count is below the structural minimum of 1.
    #[error("Piece count must be >= 1, got {0}")]
    InvalidPieceCount(usize),

    /// The interior point list does not match `piece_num - 1`.
    ///
    /// A spline over `N` pieces has `N + 1` points, of which the head and
    /// tail are fixed by [`set_conditions`](crate::CubicSpline::set_conditions),
    /// leaving exactly `N - 1` free interior points.
    #[error("Inner point count mismatch: expected {expected}, got {got}")]
    InnerPointCountMismatch {
        /// Expected number of interior points (`piece_num - 1`).
        expected: usize,
        /// Number of interior points actually supplied.
        got: usize,
    },

    /// A fit or accessor was called before `set_conditions`.
    #[error("Spline not configured: call set_conditions first")]
    NotConfigured,

    /// An accessor was called before `set_inner_points` solved the fit.
    #[error("Spline not solved: call set_inner_points first")]
    NotSolved,
}

/// Result type alias for pathspline operations.
pub type SplineResult<T> = Result<T, SplineError>;

impl SplineError {
    /// Creates an inner point count mismatch error.
    pub fn inner_point_count_mismatch(expected: usize, got: usize) -> Self {
        SplineError::InnerPointCountMismatch { expected, got }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_piece_count_message() {
        let err = SplineError::InvalidPieceCount(0);
        assert!(err.to_string().contains(">= 1"));
        assert!(err.to_string().contains('0'));
    }

    #[test]
    fn test_inner_point_count_mismatch() {
        let err = SplineError::inner_point_count_mismatch(4, 2);
        let msg = err.to_string();
        assert!(msg.contains("expected 4"));
        assert!(msg.contains("got 2"));
    }

    #[test]
    fn test_state_errors_are_distinct() {
        assert_ne!(SplineError::NotConfigured, SplineError::NotSolved);
    }
}
