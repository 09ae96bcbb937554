//! Coordinate-frame transforms for electrode point sets.
//!
//! Two reorientations are supported: the fixed display-convention swap
//! (`x' = -y, y' = x, z' = z`) and a general rotation composed from three
//! elementary rotations `R = Rz · Ry · Rx`, applied once as a single matrix.

use montage_types::{ElectrodeSet, MontageResult, Point3, PointSet, RotationSpec};
use nalgebra::Rotation3;

/// Builds `Rz · Ry · Rx` from angles in degrees.
///
/// `Rotation3::from_euler_angles(roll, pitch, yaw)` already composes the
/// elementary rotations in that order.
pub fn rotation_matrix(spec: &RotationSpec) -> MontageResult<Rotation3<f64>> {
    spec.validate()?;
    Ok(Rotation3::from_euler_angles(
        spec.rx.to_radians(),
        spec.ry.to_radians(),
        spec.rz.to_radians(),
    ))
}

pub fn apply_rotation(points: &PointSet, r: &Rotation3<f64>) -> PointSet {
    points.iter().map(|p| Point3::from(r * p.to_na())).collect()
}

/// Display-convention axis swap for a single point.
pub fn transpose_point(p: &Point3) -> Point3 {
    Point3::new(-p.y, p.x, p.z)
}

/// Applies the display-convention swap to every point.
pub fn transpose(points: &PointSet) -> PointSet {
    points.iter().map(transpose_point).collect()
}

/// Applies the display-convention swap, keeping indices, labels and unit.
pub fn transpose_set(set: &ElectrodeSet) -> MontageResult<ElectrodeSet> {
    ElectrodeSet::with_points(set, &transpose(&set.to_point_set()))
}

/// Rotates every point by `R = Rz · Ry · Rx` built from `spec`.
pub fn rotate(points: &PointSet, spec: &RotationSpec) -> MontageResult<PointSet> {
    let r = rotation_matrix(spec)?;
    Ok(apply_rotation(points, &r))
}

/// Rotates untyped coordinate rows; every row must have three values.
pub fn rotate_rows<R: AsRef<[f64]>>(rows: &[R], spec: &RotationSpec) -> MontageResult<PointSet> {
    let points = PointSet::from_rows(rows)?;
    rotate(&points, spec)
}

/// Rotates an electrode set, keeping indices, labels and unit.
pub fn rotate_set(set: &ElectrodeSet, spec: &RotationSpec) -> MontageResult<ElectrodeSet> {
    let rotated = rotate(&set.to_point_set(), spec)?;
    ElectrodeSet::with_points(set, &rotated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use montage_types::{ElectrodePosition, MontageError, Unit};
    use nalgebra::Matrix3;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn close(a: &Point3, b: &Point3) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS && (a.z - b.z).abs() < EPS
    }

    #[test]
    fn test_transpose_single_and_double() {
        let p = PointSet::new(vec![Point3::new(1.0, 2.0, 3.0)]);

        let once = transpose(&p);
        assert_eq!(once.points()[0], Point3::new(-2.0, 1.0, 3.0));

        // Not an involution: two swaps negate x and y.
        let twice = transpose(&once);
        assert_eq!(twice.points()[0], Point3::new(-1.0, -2.0, 3.0));
    }

    #[test]
    fn test_transpose_set_keeps_metadata() {
        let set = ElectrodeSet::new(
            Unit::Centimeters,
            vec![ElectrodePosition::new(1, 0.5, 0.0, 0.0).with_label("Fp1-F3")],
        )
        .unwrap();
        let out = transpose_set(&set).unwrap();

        let pos = &out.positions()[0];
        assert_eq!(pos.index, 1);
        assert_eq!(pos.label.as_deref(), Some("Fp1-F3"));
        assert_eq!(pos.x, -0.0);
        assert_eq!(pos.y, 0.5);
        assert_eq!(out.unit(), Unit::Centimeters);
    }

    #[test]
    fn test_rotate_set_keeps_metadata() {
        let set = ElectrodeSet::new(
            Unit::Meters,
            vec![
                ElectrodePosition::new(1, 1.0, 0.0, 0.0).with_label("T7"),
                ElectrodePosition::new(2, 0.0, 0.0, 2.0),
            ],
        )
        .unwrap();
        let out = rotate_set(&set, &RotationSpec::new(0.0, 90.0, 0.0)).unwrap();

        assert_eq!(out.unit(), Unit::Meters);
        assert_eq!(out.positions()[0].label.as_deref(), Some("T7"));
        assert_eq!(out.positions()[1].index, 2);
        assert!(close(&out.positions()[1].point(), &Point3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_rotate_identity() {
        let p = PointSet::new(vec![Point3::new(1.5, -2.0, 7.25), Point3::new(0.0, 3.0, -1.0)]);
        let out = rotate(&p, &RotationSpec::identity()).unwrap();
        for (a, b) in p.iter().zip(out.iter()) {
            assert!(close(a, b));
        }
    }

    #[test]
    fn test_rotate_z_quarter_turn() {
        let p = PointSet::new(vec![Point3::new(1.0, 0.0, 0.0)]);
        let out = rotate(&p, &RotationSpec::new(0.0, 0.0, 90.0)).unwrap();
        assert!(close(&out.points()[0], &Point3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_rotate_applies_x_before_z() {
        // X by 90 takes +y to +z; Z by 90 then leaves +z alone.
        let p = PointSet::new(vec![Point3::new(0.0, 1.0, 0.0)]);
        let out = rotate(&p, &RotationSpec::new(90.0, 0.0, 90.0)).unwrap();
        assert!(close(&out.points()[0], &Point3::new(0.0, 0.0, 1.0)));

        // +x: X leaves it, Z takes it to +y.
        let p = PointSet::new(vec![Point3::new(1.0, 0.0, 0.0)]);
        let out = rotate(&p, &RotationSpec::new(90.0, 0.0, 90.0)).unwrap();
        assert!(close(&out.points()[0], &Point3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_rotate_y_quarter_turn_signs() {
        // Ry(90): +x goes to -z and +z goes to +x.
        let spec = RotationSpec::new(0.0, 90.0, 0.0);
        let p = PointSet::new(vec![Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 0.0, 1.0)]);
        let out = rotate(&p, &spec).unwrap();
        assert!(close(&out.points()[0], &Point3::new(0.0, 0.0, -1.0)));
        assert!(close(&out.points()[1], &Point3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_rotation_matrix_is_z_y_x_product() {
        let (rx, ry, rz) = (30.0f64, -45.0f64, 60.0f64);
        let (sa, ca) = rx.to_radians().sin_cos();
        let (sb, cb) = ry.to_radians().sin_cos();
        let (sc, cc) = rz.to_radians().sin_cos();
        let mx = Matrix3::new(1.0, 0.0, 0.0, 0.0, ca, -sa, 0.0, sa, ca);
        let my = Matrix3::new(cb, 0.0, sb, 0.0, 1.0, 0.0, -sb, 0.0, cb);
        let mz = Matrix3::new(cc, -sc, 0.0, sc, cc, 0.0, 0.0, 0.0, 1.0);
        let expected = mz * my * mx;

        let r = rotation_matrix(&RotationSpec::new(rx, ry, rz)).unwrap();
        for (a, b) in r.matrix().iter().zip(expected.iter()) {
            assert!((a - b).abs() < EPS, "{a} != {b}");
        }

        let p = PointSet::new(vec![Point3::new(2.0, -1.0, 0.5)]);
        let out = rotate(&p, &RotationSpec::new(rx, ry, rz)).unwrap();
        let want = Point3::from(nalgebra::Point3::from(expected * p.points()[0].to_na().coords));
        assert!(close(&out.points()[0], &want));
    }

    #[test]
    fn test_rotate_round_trip_about_z() {
        let p = PointSet::new(vec![Point3::new(3.0, -4.0, 5.0), Point3::new(-1.0, 0.5, 2.0)]);
        let there = rotate(&p, &RotationSpec::new(0.0, 0.0, 90.0)).unwrap();
        let back = rotate(&there, &RotationSpec::new(0.0, 0.0, -90.0)).unwrap();
        for (a, b) in p.iter().zip(back.iter()) {
            assert!(close(a, b));
        }
    }

    #[test]
    fn test_rotate_rejects_non_finite_angle() {
        let p = PointSet::new(vec![Point3::new(1.0, 0.0, 0.0)]);
        let err = rotate(&p, &RotationSpec::new(f64::NAN, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, MontageError::InvalidRotationSpec { axis: 'x', .. }));
    }

    #[test]
    fn test_rotate_rows_rejects_bad_dimension() {
        let rows = vec![vec![1.0, 0.0, 0.0], vec![1.0, 0.0, 0.0, 1.0]];
        let err = rotate_rows(&rows, &RotationSpec::identity()).unwrap_err();
        assert_eq!(err, MontageError::DimensionMismatch { point: 1, found: 4 });
    }

    #[test]
    fn test_rotate_preserves_count_and_input() {
        let p = PointSet::new(vec![Point3::new(1.0, 2.0, 3.0); 5]);
        let before = p.clone();
        let out = rotate(&p, &RotationSpec::new(10.0, 20.0, 30.0)).unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(p, before);
    }

    proptest! {
        #[test]
        fn prop_rotation_preserves_norm(
            x in -500.0f64..500.0, y in -500.0f64..500.0, z in -500.0f64..500.0,
            rx in -360.0f64..360.0, ry in -360.0f64..360.0, rz in -360.0f64..360.0,
        ) {
            let p = Point3::new(x, y, z);
            let r = rotation_matrix(&RotationSpec::new(rx, ry, rz)).unwrap();
            let q = Point3::from(r * p.to_na());
            prop_assert!((q.norm() - p.norm()).abs() < 1e-7);
        }

        #[test]
        fn prop_inverse_undoes_rotation(
            x in -500.0f64..500.0, y in -500.0f64..500.0, z in -500.0f64..500.0,
            rx in -180.0f64..180.0, ry in -180.0f64..180.0, rz in -180.0f64..180.0,
        ) {
            let p = Point3::new(x, y, z);
            let r = rotation_matrix(&RotationSpec::new(rx, ry, rz)).unwrap();
            let back = Point3::from(r.inverse() * (r * p.to_na()));
            prop_assert!((back.x - p.x).abs() < 1e-7);
            prop_assert!((back.y - p.y).abs() < 1e-7);
            prop_assert!((back.z - p.z).abs() < 1e-7);
        }

        #[test]
        fn prop_four_swaps_are_identity(x in -1e3f64..1e3, y in -1e3f64..1e3, z in -1e3f64..1e3) {
            let p = Point3::new(x, y, z);
            let q = transpose_point(&transpose_point(&transpose_point(&transpose_point(&p))));
            prop_assert_eq!(q, p);
        }
    }
}
