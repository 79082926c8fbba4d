//! Piecewise cubic curve representation.
//!
//! The output side of the spline fit: an ordered sequence of
//! [`CubicPolynomial`] segments, each evaluated on a unit-normalized
//! local parameter. [`CubicCurve`] additionally exposes a global
//! parameter that runs across the accumulated segment durations, for
//! consumers that want to sample the whole path.
//!
//! Coefficients are stored in ascending degree per axis:
//! `p(s) = a + b*s + c*s^2 + d*s^3` with each coefficient a [`DVec2`]
//! carrying both coordinate columns.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One cubic segment over a local parameter `s in [0, duration]`.
///
/// The fit always emits unit-duration segments; other durations are
/// accepted so callers can re-time a curve without touching the
/// coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CubicPolynomial {
    duration: f64,
    /// Ascending degree: `[constant, linear, quadratic, cubic]`.
    coeffs: [DVec2; 4],
}

impl CubicPolynomial {
    /// Creates a segment from its duration and ascending-degree
    /// coefficient rows.
    pub fn new(duration: f64, coeffs: [DVec2; 4]) -> Self {
        debug_assert!(duration > 0.0, "segment duration must be positive");
        Self { duration, coeffs }
    }

    /// Segment duration.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Coefficient rows, ascending degree.
    #[inline]
    pub fn coeffs(&self) -> &[DVec2; 4] {
        &self.coeffs
    }

    /// Position at local parameter `s`.
    #[inline]
    pub fn position(&self, s: f64) -> DVec2 {
        let [a, b, c, d] = self.coeffs;
        let s2 = s * s;
        let s3 = s2 * s;
        a + b * s + c * s2 + d * s3
    }

    /// First derivative at local parameter `s`.
    #[inline]
    pub fn velocity(&self, s: f64) -> DVec2 {
        let [_, b, c, d] = self.coeffs;
        b + c * (2.0 * s) + d * (3.0 * s * s)
    }

    /// Second derivative at local parameter `s`.
    #[inline]
    pub fn acceleration(&self, s: f64) -> DVec2 {
        let [_, _, c, d] = self.coeffs;
        c * 2.0 + d * (6.0 * s)
    }
}

/// Ordered piecewise cubic curve.
///
/// Built segment-by-segment via [`push`](Self::push) (or rebuilt through
/// [`clear`](Self::clear)); sampled either per segment or through the
/// global parameter `t in [0, total_duration]`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CubicCurve {
    pieces: Vec<CubicPolynomial>,
}

impl CubicCurve {
    /// Creates an empty curve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all segments, keeping the allocation.
    pub fn clear(&mut self) {
        self.pieces.clear();
    }

    /// Appends a segment at the end of the curve.
    pub fn push(&mut self, piece: CubicPolynomial) {
        self.pieces.push(piece);
    }

    /// Number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// True if the curve has no segments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Segments in path order.
    #[inline]
    pub fn pieces(&self) -> &[CubicPolynomial] {
        &self.pieces
    }

    /// Iterates over segments in path order.
    pub fn iter(&self) -> core::slice::Iter<'_, CubicPolynomial> {
        self.pieces.iter()
    }

    /// Sum of segment durations.
    pub fn total_duration(&self) -> f64 {
        self.pieces.iter().map(CubicPolynomial::duration).sum()
    }

    /// Locates the segment containing global parameter `t`, returning the
    /// segment index and the local parameter within it.
    ///
    /// `t` is clamped to `[0, total_duration]`; an exact segment boundary
    /// resolves to the start of the following segment (except the curve
    /// end, which resolves to the last segment's end).
    fn locate(&self, t: f64) -> Option<(usize, f64)> {
        let last = self.pieces.len().checked_sub(1)?;
        let mut remaining = t.max(0.0);
        for (index, piece) in self.pieces.iter().enumerate() {
            if remaining < piece.duration() || index == last {
                return Some((index, remaining.min(piece.duration())));
            }
            remaining -= piece.duration();
        }
        unreachable!("loop returns at the last segment");
    }

    /// Position at global parameter `t`. `None` on an empty curve.
    pub fn position(&self, t: f64) -> Option<DVec2> {
        self.locate(t).map(|(i, s)| self.pieces[i].position(s))
    }

    /// First derivative at global parameter `t`. `None` on an empty curve.
    pub fn velocity(&self, t: f64) -> Option<DVec2> {
        self.locate(t).map(|(i, s)| self.pieces[i].velocity(s))
    }
}

impl<'a> IntoIterator for &'a CubicCurve {
    type Item = &'a CubicPolynomial;
    type IntoIter = core::slice::Iter<'a, CubicPolynomial>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
