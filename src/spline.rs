//! Cubic spline fitting through 2-D waypoints.
//!
//! [`CubicSpline`] interpolates a head point, an ordered set of interior
//! waypoints, and a tail point with a piecewise cubic curve that is C1
//! (and, through the solved system, C2) at every interior joint, with
//! zero first derivative at both endpoints. Fitting reduces to one
//! tridiagonal banded solve shared by both coordinate axes, followed by a
//! closed-form expansion into per-segment Hermite coefficients.
//!
//! The fit also exposes the curve's *stretch energy* — the integral of
//! the squared second derivative, evaluated analytically — and its
//! gradient with respect to the interior waypoints, which is what an
//! upstream path optimizer iterates on. The gradient reuses the fit's LU
//! factorization through the adjoint solve.
//!
//! # Lifecycle
//!
//! `Unconfigured -> Configured -> Solved`:
//!
//! 1. [`set_conditions`](CubicSpline::set_conditions) fixes head, tail
//!    and piece count, and sizes the banded system (`Configured`).
//! 2. [`set_inner_points`](CubicSpline::set_inner_points) runs the full
//!    assemble-solve-expand cycle (`Solved`).
//! 3. [`curve`](CubicSpline::curve), [`stretch_energy`](CubicSpline::stretch_energy),
//!    [`coeffs`](CubicSpline::coeffs) and
//!    [`grad_by_points`](CubicSpline::grad_by_points) read the result any
//!    number of times until the spline is reconfigured.
//!
//! # Example
//!
//! ```rust
//! use pathspline::CubicSpline;
//! use glam::DVec2;
//!
//! let mut spline = CubicSpline::new();
//! spline
//!     .set_conditions(DVec2::new(0.0, 0.0), DVec2::new(3.0, 0.0), 3)
//!     .unwrap();
//! spline
//!     .set_inner_points(&[DVec2::new(1.0, 1.0), DVec2::new(2.0, -1.0)])
//!     .unwrap();
//!
//! let curve = spline.curve().unwrap();
//! assert_eq!(curve.len(), 3);
//! assert!(spline.stretch_energy().unwrap() > 0.0);
//! ```

use glam::DVec2;
use log::{debug, trace};

use crate::banded::BandedSystem;
use crate::curve::{CubicCurve, CubicPolynomial};
use crate::error::{SplineError, SplineResult};

/// Fit lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FitState {
    Unconfigured,
    Configured,
    Solved,
}

/// Natural cubic spline through 2-D waypoints with fixed endpoints.
///
/// Owns its banded system and coefficient buffers exclusively; instances
/// are independent, so batching many splines across workers needs no
/// synchronization.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    /// Segment count `N`: `N + 1` points, `N - 1` free interior points.
    piece_num: usize,
    head: DVec2,
    tail: DVec2,
    /// Tridiagonal system of order `N - 1`; topology fixed by `piece_num`.
    system: BandedSystem,
    /// Full point list `X[0..=N]`: head, interiors, tail.
    points: Vec<DVec2>,
    /// First derivatives `D[0..=N]` at the knots, `D[0] = D[N] = 0`.
    derivatives: Vec<DVec2>,
    /// Per-segment coefficient rows, `4 * N` total. Block `i` (rows
    /// `4i..4i + 3`) holds segment `i` in ascending degree
    /// `{constant, linear, quadratic, cubic}`, both axes per row, on the
    /// unit-normalized local parameter.
    coeffs: Vec<DVec2>,
    state: FitState,
}

impl Default for CubicSpline {
    fn default() -> Self {
        Self::new()
    }
}

impl CubicSpline {
    /// Creates an unconfigured spline.
    pub fn new() -> Self {
        Self {
            piece_num: 0,
            head: DVec2::ZERO,
            tail: DVec2::ZERO,
            system: BandedSystem::default(),
            points: Vec::new(),
            derivatives: Vec::new(),
            coeffs: Vec::new(),
            state: FitState::Unconfigured,
        }
    }

    /// Fixes the boundary conditions: head point, tail point and the
    /// number of cubic pieces.
    ///
    /// Sizes the tridiagonal system of order `piece_num - 1` (bandwidth
    /// 1/1) and the point/derivative/coefficient buffers; any previous
    /// fit is invalidated. `piece_num = 1` is the degenerate two-point
    /// case with no free interior points.
    ///
    /// # Errors
    ///
    /// [`SplineError::InvalidPieceCount`] if `piece_num < 1`.
    pub fn set_conditions(
        &mut self,
        head: DVec2,
        tail: DVec2,
        piece_num: usize,
    ) -> SplineResult<()> {
        if piece_num < 1 {
            return Err(SplineError::InvalidPieceCount(piece_num));
        }
        debug!(
            "spline conditions: head ({}, {}), tail ({}, {}), {} pieces",
            head.x, head.y, tail.x, tail.y, piece_num
        );

        self.piece_num = piece_num;
        self.head = head;
        self.tail = tail;
        self.system.create(piece_num - 1, 1, 1);

        self.points.clear();
        self.points.resize(piece_num + 1, DVec2::ZERO);
        self.derivatives.clear();
        self.derivatives.resize(piece_num + 1, DVec2::ZERO);
        self.coeffs.clear();
        self.coeffs.resize(4 * piece_num, DVec2::ZERO);

        self.state = FitState::Configured;
        Ok(())
    }

    /// Fits the spline through `inner` (the `piece_num - 1` free interior
    /// waypoints, in path order).
    ///
    /// Runs the full cycle: assemble the continuity system, factorize and
    /// solve for the interior knot derivatives, expand into per-segment
    /// coefficients. May be called repeatedly with new interior points
    /// under the same conditions.
    ///
    /// # Errors
    ///
    /// [`SplineError::NotConfigured`] before
    /// [`set_conditions`](Self::set_conditions);
    /// [`SplineError::InnerPointCountMismatch`] if
    /// `inner.len() != piece_num - 1`.
    pub fn set_inner_points(&mut self, inner: &[DVec2]) -> SplineResult<()> {
        if self.state == FitState::Unconfigured {
            return Err(SplineError::NotConfigured);
        }
        let unknowns = self.piece_num - 1;
        if inner.len() != unknowns {
            return Err(SplineError::inner_point_count_mismatch(
                unknowns,
                inner.len(),
            ));
        }

        // X = head, interiors in order, tail.
        self.points[0] = self.head;
        self.points[1..=unknowns].copy_from_slice(inner);
        self.points[self.piece_num] = self.tail;

        self.assemble_and_solve_derivatives();
        self.expand_coefficients();

        self.state = FitState::Solved;
        trace!("spline solved over {} pieces", self.piece_num);
        Ok(())
    }

    /// Assembles the tridiagonal continuity system and solves it for the
    /// interior first derivatives `D[1..=N-1]`.
    ///
    /// Row `i` relates the derivative unknowns at three consecutive
    /// interior knots: `D[i] + 4 D[i+1] + D[i+2] = 3 (X[i+2] - X[i])`,
    /// with the endpoint derivatives `D[0] = D[N] = 0` encoded
    /// structurally (their columns simply never appear). The matrix is
    /// strictly diagonally dominant, so the pivot-free LU is safe.
    fn assemble_and_solve_derivatives(&mut self) {
        let unknowns = self.piece_num - 1;
        self.derivatives[0] = DVec2::ZERO;
        self.derivatives[self.piece_num] = DVec2::ZERO;
        if unknowns == 0 {
            // Two-point case: direct boundary solve, nothing to eliminate.
            return;
        }

        self.system.reset();
        let mut rhs = vec![DVec2::ZERO; unknowns];
        for i in 0..unknowns {
            self.system.set(i, i, 4.0);
            if i > 0 {
                self.system.set(i, i - 1, 1.0);
            }
            if i + 1 < unknowns {
                self.system.set(i, i + 1, 1.0);
            }
            rhs[i] = 3.0 * (self.points[i + 2] - self.points[i]);
        }

        self.system.factorize_lu();
        self.system.solve(&mut rhs);
        self.derivatives[1..=unknowns].copy_from_slice(&rhs);
    }

    /// Expands the solved knot derivatives into per-segment Hermite-form
    /// coefficients on the unit-normalized local parameter.
    fn expand_coefficients(&mut self) {
        for i in 0..self.piece_num {
            let x0 = self.points[i];
            let x1 = self.points[i + 1];
            let d0 = self.derivatives[i];
            let d1 = self.derivatives[i + 1];

            let block = &mut self.coeffs[4 * i..4 * i + 4];
            block[0] = x0;
            block[1] = d0;
            block[2] = 3.0 * (x1 - x0) - 2.0 * d0 - d1;
            block[3] = 2.0 * (x0 - x1) + d0 + d1;
        }
    }

    fn require_solved(&self) -> SplineResult<()> {
        match self.state {
            FitState::Unconfigured => Err(SplineError::NotConfigured),
            FitState::Configured => Err(SplineError::NotSolved),
            FitState::Solved => Ok(()),
        }
    }

    /// Number of cubic pieces, once configured.
    pub fn piece_num(&self) -> usize {
        self.piece_num
    }

    /// Clears `curve` and rebuilds it with one unit-duration segment per
    /// piece, in path order.
    pub fn get_curve(&self, curve: &mut CubicCurve) -> SplineResult<()> {
        self.require_solved()?;
        curve.clear();
        for i in 0..self.piece_num {
            let block = &self.coeffs[4 * i..4 * i + 4];
            curve.push(CubicPolynomial::new(
                1.0,
                [block[0], block[1], block[2], block[3]],
            ));
        }
        Ok(())
    }

    /// The fitted curve as a fresh [`CubicCurve`].
    pub fn curve(&self) -> SplineResult<CubicCurve> {
        let mut curve = CubicCurve::new();
        self.get_curve(&mut curve)?;
        Ok(curve)
    }

    /// Read-only access to the coefficient rows (`4 * piece_num` of
    /// them; see the layout on [`CubicSpline`]).
    pub fn coeffs(&self) -> SplineResult<&[DVec2]> {
        self.require_solved()?;
        Ok(&self.coeffs)
    }

    /// Bending energy of the fitted curve: the integral of the squared
    /// second derivative over every unit segment, in closed form.
    ///
    /// With quadratic row `c` and cubic row `d`, each segment contributes
    /// `4 |c|^2 + 12 |d|^2 + 12 (c . d)` — the exact value of
    /// `int_0^1 |p''(s)|^2 ds` for `p'' = 2c + 6ds`. Non-negative for any
    /// input and invariant under reversing the waypoint order.
    pub fn stretch_energy(&self) -> SplineResult<f64> {
        self.require_solved()?;
        let mut energy = 0.0;
        for i in 0..self.piece_num {
            let c = self.coeffs[4 * i + 2];
            let d = self.coeffs[4 * i + 3];
            energy += 4.0 * c.length_squared() + 12.0 * d.length_squared() + 12.0 * c.dot(d);
        }
        Ok(energy)
    }

    /// Gradient of [`stretch_energy`](Self::stretch_energy) with respect
    /// to the interior waypoints, one row per interior point.
    ///
    /// The energy depends on the interior points both directly (through
    /// the Hermite expansion) and indirectly (the knot derivatives solve
    /// a system whose right-hand side is built from them). The indirect
    /// term back-propagates through the fit by solving the transposed
    /// tridiagonal system against the energy's derivative sensitivities,
    /// reusing the factorization from
    /// [`set_inner_points`](Self::set_inner_points) via
    /// [`BandedSystem::solve_adj`].
    pub fn grad_by_points(&self) -> SplineResult<Vec<DVec2>> {
        self.require_solved()?;
        let n = self.piece_num;
        let unknowns = n - 1;

        // Energy sensitivities per segment:
        //   dE/dc = 8c + 12d, dE/dd = 24d + 12c.
        let mut grad_c = vec![DVec2::ZERO; n];
        let mut grad_d = vec![DVec2::ZERO; n];
        for i in 0..n {
            let c = self.coeffs[4 * i + 2];
            let d = self.coeffs[4 * i + 3];
            grad_c[i] = 8.0 * c + 12.0 * d;
            grad_d[i] = 24.0 * d + 12.0 * c;
        }

        if unknowns == 0 {
            return Ok(Vec::new());
        }

        // Sensitivity w.r.t. each interior knot derivative D[k]:
        // segment k sees D[k] with weights (-2, +1) in (c, d), segment
        // k - 1 sees it with (-1, +1).
        let mut lambda = vec![DVec2::ZERO; unknowns];
        for k in 1..=unknowns {
            lambda[k - 1] = -2.0 * grad_c[k] + grad_d[k] - grad_c[k - 1] + grad_d[k - 1];
        }
        // lambda := A^-T (dE/dD); the rhs rows are 3 (X[i+2] - X[i]), so
        // each lambda row feeds +/-3 into the two points it references.
        self.system.solve_adj(&mut lambda);

        let mut grad = vec![DVec2::ZERO; unknowns];
        for k in 1..=unknowns {
            // Direct term: X[k] enters segment k - 1 as its end point and
            // segment k as its start point.
            let mut g = 3.0 * grad_c[k - 1] - 2.0 * grad_d[k - 1] - 3.0 * grad_c[k]
                + 2.0 * grad_d[k];
            // Indirect term through the solved system.
            if k >= 2 {
                g += 3.0 * lambda[k - 2];
            }
            if k <= unknowns.saturating_sub(1) {
                g -= 3.0 * lambda[k];
            }
            grad[k - 1] = g;
        }
        Ok(grad)
    }
}
