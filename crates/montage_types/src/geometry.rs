//! Bare 3D geometry: points, point sets and rotation specifications.

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::error::{MontageError, MontageResult};

/// A single point in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise arithmetic mean of two points.
    pub fn midpoint(&self, other: &Point3) -> Self {
        na::center(&self.to_na(), &other.to_na()).into()
    }

    /// Distance from the origin.
    pub fn norm(&self) -> f64 {
        self.to_na().coords.norm()
    }

    pub fn to_na(&self) -> na::Point3<f64> {
        na::Point3::new(self.x, self.y, self.z)
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<na::Point3<f64>> for Point3 {
    fn from(p: na::Point3<f64>) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl From<Point3> for na::Point3<f64> {
    fn from(p: Point3) -> Self {
        p.to_na()
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// An ordered sequence of points without indices or labels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointSet {
    points: Vec<Point3>,
}

impl PointSet {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Builds a point set from untyped coordinate rows.
    ///
    /// Every row must hold exactly three values; the first offending row is
    /// reported as `DimensionMismatch` with its zero-based position.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> MontageResult<Self> {
        let points = rows
            .iter()
            .enumerate()
            .map(|(point, row)| match row.as_ref() {
                [x, y, z] => Ok(Point3::new(*x, *y, *z)),
                other => Err(MontageError::DimensionMismatch {
                    point,
                    found: other.len(),
                }),
            })
            .collect::<MontageResult<Vec<_>>>()?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point3> {
        self.points.iter()
    }

    pub fn into_inner(self) -> Vec<Point3> {
        self.points
    }
}

impl FromIterator<Point3> for PointSet {
    fn from_iter<T: IntoIterator<Item = Point3>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point3;
    type IntoIter = std::slice::Iter<'a, Point3>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Rotation angles in degrees about the X, Y and Z axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RotationSpec {
    #[serde(default)]
    pub rx: f64,
    #[serde(default)]
    pub ry: f64,
    #[serde(default)]
    pub rz: f64,
}

impl RotationSpec {
    pub fn new(rx: f64, ry: f64, rz: f64) -> Self {
        Self { rx, ry, rz }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    /// Rejects NaN and infinite angles.
    pub fn validate(&self) -> MontageResult<()> {
        for (axis, value) in [('x', self.rx), ('y', self.ry), ('z', self.rz)] {
            if !value.is_finite() {
                return Err(MontageError::InvalidRotationSpec { axis, value });
            }
        }
        Ok(())
    }
}
