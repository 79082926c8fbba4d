//! # pathspline - Cubic Spline Path Fitting
//!
//! Smooth interpolating curves through 2-D waypoints, built for use as
//! reference paths in a motion-planning pipeline.
//!
//! ## Architecture
//! - [`BandedSystem`]: banded storage with in-place, pivot-free LU and
//!   direct/adjoint solves over multi-column right-hand sides
//! - [`CubicSpline`]: reduces "curve through N + 1 points" to one
//!   tridiagonal solve per fit, shared by both coordinate axes
//! - [`CubicCurve`]: the resulting polyline-of-polynomials, plus the
//!   analytic bending energy and its waypoint gradient for upstream
//!   optimizers
//!
//! ## Usage
//! ```rust
//! use pathspline::CubicSpline;
//! use glam::DVec2;
//!
//! let mut spline = CubicSpline::new();
//! spline.set_conditions(DVec2::ZERO, DVec2::new(3.0, 0.0), 3)?;
//! spline.set_inner_points(&[DVec2::new(1.0, 1.0), DVec2::new(2.0, -1.0)])?;
//!
//! let curve = spline.curve()?;
//! let energy = spline.stretch_energy()?;
//! # Ok::<(), pathspline::SplineError>(())
//! ```

pub mod banded;
pub mod curve;
pub mod error;
pub mod spline;

// Re-exports
pub use banded::{BandedSystem, SolveRow};
pub use curve::{CubicCurve, CubicPolynomial};
pub use error::{SplineError, SplineResult};
pub use spline::CubicSpline;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
