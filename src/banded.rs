//! Banded linear system storage and in-place LU solver.
//!
//! This module provides [`BandedSystem`], the numeric kernel underneath
//! the cubic spline fit: an `N x N` matrix with `p` populated
//! sub-diagonals and `q` populated super-diagonals, factorized in place
//! and solved against multi-column right-hand sides.
//!
//! # Banded Storage
//!
//! Only the band is stored. A logical entry `(i, j)` lives at the physical
//! offset `(i + q - j) * N + j` in a flat buffer of `N * (p + q + 1)`
//! elements, the layout suggested in *Matrix Computations*. Any `(i, j)`
//! with `j > i + q` or `i > j + p` is implicitly zero and must never be
//! written: an out-of-band write wraps into an adjacent diagonal's storage
//! and silently corrupts it. Release builds do not validate this;
//! `debug_assert!` catches it in tests.
//!
//! # No Pivoting
//!
//! [`factorize_lu`](BandedSystem::factorize_lu) performs Doolittle-style
//! LU decomposition *without row exchanges*. This keeps factorization
//! O(N * (p + q)^2) — linear in `N` for fixed bandwidth — but is only
//! valid for matrices that are non-singular in their given row order,
//! e.g. diagonally dominant ones. The cubic-spline continuity systems
//! assembled by [`CubicSpline`](crate::CubicSpline) always are.
//!
//! # Preconditions Are Caller Obligations
//!
//! This is a performance-critical kernel validated once by its sole
//! in-crate caller, not a defensively-checked general solver:
//!
//! - [`solve`](BandedSystem::solve) and [`solve_adj`](BandedSystem::solve_adj)
//!   require a prior `factorize_lu` on the same matrix; solving an
//!   unfactorized matrix silently produces garbage.
//! - Band occupancy and non-singularity are never checked at runtime.
//!
//! # Example
//!
//! ```rust
//! use pathspline::BandedSystem;
//!
//! // Tridiagonal [[2, 1, 0], [1, 2, 1], [0, 1, 2]]
//! let mut a = BandedSystem::new(3, 1, 1);
//! for i in 0..3 {
//!     a.set(i, i, 2.0);
//! }
//! a.set(0, 1, 1.0);
//! a.set(1, 0, 1.0);
//! a.set(1, 2, 1.0);
//! a.set(2, 1, 1.0);
//!
//! let mut b = [4.0f64, 8.0, 8.0];
//! a.factorize_lu();
//! a.solve(&mut b);
//! assert!((b[0] - 1.0).abs() < 1e-12);
//! assert!((b[1] - 2.0).abs() < 1e-12);
//! assert!((b[2] - 3.0).abs() < 1e-12);
//! ```

use core::ops::{Div, Mul, Sub};

/// A right-hand-side row that the banded solver can substitute over.
///
/// Implemented for anything that behaves like a fixed-width row of `f64`
/// columns under scaling and subtraction — in particular `f64` itself
/// (single-column systems) and `glam::DVec2` (the two coordinate axes of
/// a planar spline solved in one pass).
pub trait SolveRow:
    Copy + Sub<Output = Self> + Mul<f64, Output = Self> + Div<f64, Output = Self>
{
}

impl<T> SolveRow for T where
    T: Copy + Sub<Output = T> + Mul<f64, Output = T> + Div<f64, Output = T>
{
}

/// Banded `N x N` matrix with in-place LU factorization and solve.
///
/// Storage is owned by the system and released automatically; the
/// explicit [`create`](Self::create) / [`reset`](Self::reset) lifecycle is
/// kept so a spline can be reconfigured without reallocating on every
/// fit. The matrix is mutated element-by-element during assembly,
/// factorized once (destructively — the original entries are not
/// recoverable), then solved any number of times against different
/// right-hand sides.
#[derive(Debug, Clone, Default)]
pub struct BandedSystem {
    n: usize,
    lower_bw: usize,
    upper_bw: usize,
    data: Vec<f64>,
}

impl BandedSystem {
    /// Creates a zero-filled banded system of order `n` with `lower_bw`
    /// sub-diagonals and `upper_bw` super-diagonals.
    pub fn new(n: usize, lower_bw: usize, upper_bw: usize) -> Self {
        let mut system = Self::default();
        system.create(n, lower_bw, upper_bw);
        system
    }

    /// Reconfigures the system to order `n` with bandwidths
    /// `lower_bw` / `upper_bw`, dropping any prior storage.
    ///
    /// Safe to call repeatedly; the previous buffer is released first.
    pub fn create(&mut self, n: usize, lower_bw: usize, upper_bw: usize) {
        self.n = n;
        self.lower_bw = lower_bw;
        self.upper_bw = upper_bw;
        self.data.clear();
        self.data.resize(n * (lower_bw + upper_bw + 1), 0.0);
    }

    /// Zero-fills the band without reallocating.
    pub fn reset(&mut self) {
        self.data.fill(0.0);
    }

    /// Matrix order `N`.
    #[inline]
    pub fn order(&self) -> usize {
        self.n
    }

    /// Number of populated sub-diagonals.
    #[inline]
    pub fn lower_bandwidth(&self) -> usize {
        self.lower_bw
    }

    /// Number of populated super-diagonals.
    #[inline]
    pub fn upper_bandwidth(&self) -> usize {
        self.upper_bw
    }

    /// Physical offset of logical entry `(i, j)`.
    ///
    /// Caller must guarantee `(i, j)` is inside the band. Checked only in
    /// debug builds; an out-of-band offset in release wraps into another
    /// diagonal's storage (undefined behavior by contract).
    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.n && j < self.n, "index ({i}, {j}) outside matrix");
        debug_assert!(
            j <= i + self.upper_bw && i <= j + self.lower_bw,
            "index ({i}, {j}) outside band {}/{}",
            self.lower_bw,
            self.upper_bw
        );
        (i + self.upper_bw - j) * self.n + j
    }

    /// Reads entry `(i, j)`. Must be inside the band.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.offset(i, j)]
    }

    /// Writes entry `(i, j)`. Must be inside the band.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        let offset = self.offset(i, j);
        self.data[offset] = value;
    }

    /// In-place banded LU factorization, Doolittle style, **no pivoting**.
    ///
    /// After this call the band holds the `L` multipliers below the
    /// diagonal and `U` on and above it; the original matrix is gone.
    /// Multiplications and divisions with an exactly-zero operand are
    /// skipped — a banded sparsity optimization, not a correctness
    /// shortcut.
    ///
    /// Valid only for matrices non-singular without row exchange
    /// (diagonal dominance suffices). Not checked.
    pub fn factorize_lu(&mut self) {
        let n = self.n;
        for k in 0..n.saturating_sub(1) {
            let i_max = (k + self.lower_bw).min(n - 1);
            let pivot = self.get(k, k);
            for i in (k + 1)..=i_max {
                if self.get(i, k) != 0.0 {
                    let scaled = self.get(i, k) / pivot;
                    self.set(i, k, scaled);
                }
            }
            let j_max = (k + self.upper_bw).min(n - 1);
            for j in (k + 1)..=j_max {
                let upper = self.get(k, j);
                if upper != 0.0 {
                    for i in (k + 1)..=i_max {
                        let multiplier = self.get(i, k);
                        if multiplier != 0.0 {
                            let updated = self.get(i, j) - multiplier * upper;
                            self.set(i, j, updated);
                        }
                    }
                }
            }
        }
    }

    /// Solves `A * X = B` for a multi-column right-hand side, overwriting
    /// `b` with the solution.
    ///
    /// `b` holds one row per matrix row ([`SolveRow`] carries the
    /// columns). Requires a prior [`factorize_lu`](Self::factorize_lu);
    /// solving an unfactorized matrix silently produces garbage.
    pub fn solve<T: SolveRow>(&self, b: &mut [T]) {
        let n = self.n;
        debug_assert_eq!(b.len(), n, "rhs row count must equal matrix order");

        // Forward substitution with the unit-diagonal L factor.
        for j in 0..n {
            let i_max = (j + self.lower_bw).min(n.saturating_sub(1));
            for i in (j + 1)..=i_max {
                let multiplier = self.get(i, j);
                if multiplier != 0.0 {
                    let bj = b[j];
                    b[i] = b[i] - bj * multiplier;
                }
            }
        }
        // Back substitution with U.
        for j in (0..n).rev() {
            b[j] = b[j] / self.get(j, j);
            let i_min = j.saturating_sub(self.upper_bw);
            for i in i_min..j {
                let upper = self.get(i, j);
                if upper != 0.0 {
                    let bj = b[j];
                    b[i] = b[i] - bj * upper;
                }
            }
        }
    }

    /// Solves the transposed system `A^T * X = B`, overwriting `b` with
    /// the solution.
    ///
    /// Reuses the same factorization as [`solve`](Self::solve)
    /// (`A^T = U^T * L^T`), which is what gradient back-propagation
    /// through the spline fit needs. Same preconditions as `solve`.
    pub fn solve_adj<T: SolveRow>(&self, b: &mut [T]) {
        let n = self.n;
        debug_assert_eq!(b.len(), n, "rhs row count must equal matrix order");

        // Forward substitution with U^T (non-unit diagonal).
        for j in 0..n {
            b[j] = b[j] / self.get(j, j);
            let i_max = (j + self.upper_bw).min(n.saturating_sub(1));
            for i in (j + 1)..=i_max {
                let upper = self.get(j, i);
                if upper != 0.0 {
                    let bj = b[j];
                    b[i] = b[i] - bj * upper;
                }
            }
        }
        // Back substitution with L^T (unit diagonal).
        for j in (0..n).rev() {
            let i_min = j.saturating_sub(self.lower_bw);
            for i in i_min..j {
                let multiplier = self.get(j, i);
                if multiplier != 0.0 {
                    let bj = b[j];
                    b[i] = b[i] - bj * multiplier;
                }
            }
        }
    }
}
