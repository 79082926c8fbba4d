//! Spline Interpolation Correctness
//!
//! The fitted curve must pass through every waypoint exactly, be C1 and
//! C2 continuous at interior joints, hold zero derivative at both
//! endpoints, and reproduce results bit-for-bit for identical inputs.

use approx::assert_relative_eq;
use glam::DVec2;
use pathspline::{CubicCurve, CubicSpline};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Interpolation at the knots holds identically in the Hermite
/// expansion, so only floating-point roundoff remains.
const KNOT_TOLERANCE: f64 = 1e-12;

/// Derivative continuity across joints goes through the solved system;
/// allow a little accumulation on longer paths.
const JOINT_TOLERANCE: f64 = 1e-9;

fn fit(head: DVec2, tail: DVec2, inner: &[DVec2]) -> CubicSpline {
    let mut spline = CubicSpline::new();
    spline
        .set_conditions(head, tail, inner.len() + 1)
        .expect("valid piece count");
    spline.set_inner_points(inner).expect("valid inner points");
    spline
}

fn seeded_waypoints(count: usize, seed: u64) -> Vec<DVec2> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|_| DVec2::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0)))
        .collect()
}

#[test]
fn test_concrete_three_piece_scenario() {
    let head = DVec2::new(0.0, 0.0);
    let tail = DVec2::new(3.0, 0.0);
    let inner = [DVec2::new(1.0, 1.0), DVec2::new(2.0, -1.0)];
    let spline = fit(head, tail, &inner);

    let curve = spline.curve().unwrap();
    assert_eq!(curve.len(), 3);

    let pieces = curve.pieces();
    let start = pieces[0].position(0.0);
    assert_relative_eq!(start.x, 0.0, epsilon = KNOT_TOLERANCE);
    assert_relative_eq!(start.y, 0.0, epsilon = KNOT_TOLERANCE);

    let end = pieces[2].position(1.0);
    assert_relative_eq!(end.x, 3.0, epsilon = KNOT_TOLERANCE);
    assert_relative_eq!(end.y, 0.0, epsilon = KNOT_TOLERANCE);

    // Segment boundaries land on the interior waypoints exactly.
    for (i, p) in inner.iter().enumerate() {
        let joint = pieces[i].position(1.0);
        assert_relative_eq!(joint.x, p.x, epsilon = KNOT_TOLERANCE);
        assert_relative_eq!(joint.y, p.y, epsilon = KNOT_TOLERANCE);
        let next = pieces[i + 1].position(0.0);
        assert_relative_eq!(next.x, p.x, epsilon = KNOT_TOLERANCE);
        assert_relative_eq!(next.y, p.y, epsilon = KNOT_TOLERANCE);
    }

    let energy = spline.stretch_energy().unwrap();
    assert!(energy.is_finite() && energy > 0.0, "energy {energy}");
}

#[test]
fn test_interpolates_seeded_waypoints() {
    let inner = seeded_waypoints(7, 42);
    let head = DVec2::new(-6.0, 0.0);
    let tail = DVec2::new(6.0, 1.0);
    let spline = fit(head, tail, &inner);

    let curve = spline.curve().unwrap();
    assert_eq!(curve.len(), 8);
    let pieces = curve.pieces();

    let mut waypoints = vec![head];
    waypoints.extend_from_slice(&inner);
    waypoints.push(tail);

    for i in 0..pieces.len() {
        let at_start = pieces[i].position(0.0);
        let at_end = pieces[i].position(1.0);
        assert!(
            (at_start - waypoints[i]).length() < KNOT_TOLERANCE,
            "segment {i} start off waypoint: {at_start} vs {}",
            waypoints[i]
        );
        assert!(
            (at_end - waypoints[i + 1]).length() < KNOT_TOLERANCE,
            "segment {i} end off waypoint: {at_end} vs {}",
            waypoints[i + 1]
        );
    }
}

#[test]
fn test_first_derivative_continuity() {
    let inner = seeded_waypoints(5, 7);
    let spline = fit(DVec2::ZERO, DVec2::new(10.0, -2.0), &inner);
    let curve = spline.curve().unwrap();
    let pieces = curve.pieces();

    for i in 0..pieces.len() - 1 {
        let out_vel = pieces[i].velocity(1.0);
        let in_vel = pieces[i + 1].velocity(0.0);
        assert!(
            (out_vel - in_vel).length() < JOINT_TOLERANCE,
            "joint {i}: {out_vel} vs {in_vel}"
        );
    }
}

#[test]
fn test_second_derivative_continuity() {
    // C2 at the joints is exactly what the tridiagonal system encodes,
    // so this validates the assemble-solve path end to end.
    let inner = seeded_waypoints(9, 1234);
    let spline = fit(DVec2::new(1.0, 1.0), DVec2::new(-3.0, 4.0), &inner);
    let curve = spline.curve().unwrap();
    let pieces = curve.pieces();

    for i in 0..pieces.len() - 1 {
        let out_acc = pieces[i].acceleration(1.0);
        let in_acc = pieces[i + 1].acceleration(0.0);
        assert!(
            (out_acc - in_acc).length() < JOINT_TOLERANCE,
            "joint {i}: {out_acc} vs {in_acc}"
        );
    }
}

#[test]
fn test_endpoint_derivatives_are_zero() {
    let inner = seeded_waypoints(4, 99);
    let spline = fit(DVec2::new(2.0, 2.0), DVec2::new(-2.0, -2.0), &inner);
    let curve = spline.curve().unwrap();
    let pieces = curve.pieces();

    let head_vel = pieces[0].velocity(0.0);
    assert!(head_vel.length() < KNOT_TOLERANCE, "head velocity {head_vel}");
    // Tail derivative is pinned by the same boundary handling; it shows
    // up through the last segment's expansion rather than a stored row.
    let tail_vel = pieces[pieces.len() - 1].velocity(1.0);
    assert!(tail_vel.length() < JOINT_TOLERANCE, "tail velocity {tail_vel}");
}

#[test]
fn test_bitwise_determinism() {
    let inner = seeded_waypoints(6, 2024);
    let head = DVec2::new(0.25, -0.5);
    let tail = DVec2::new(7.75, 3.5);

    let first = fit(head, tail, &inner);
    let second = fit(head, tail, &inner);

    // Coefficients and energy reproduce bit-for-bit: no randomness, no
    // uninitialized reads.
    assert_eq!(first.coeffs().unwrap(), second.coeffs().unwrap());
    assert_eq!(
        first.stretch_energy().unwrap().to_bits(),
        second.stretch_energy().unwrap().to_bits()
    );
}

#[test]
fn test_get_curve_clears_destination() {
    let spline = fit(DVec2::ZERO, DVec2::ONE, &[DVec2::new(0.5, 0.7)]);

    let mut curve = CubicCurve::new();
    spline.get_curve(&mut curve).unwrap();
    let first_len = curve.len();
    // Rebuild into the same destination: cleared, not appended.
    spline.get_curve(&mut curve).unwrap();
    assert_eq!(curve.len(), first_len);
}
