//! Electrode positions, electrode sets and bipolar pairing tables.

use serde::{Deserialize, Serialize};

use crate::error::{MontageError, MontageResult};
use crate::geometry::{Point3, PointSet};

/// Length unit shared by every position in one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "mm")]
    Millimeters,
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "m")]
    Meters,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Millimeters => "mm",
            Unit::Centimeters => "cm",
            Unit::Meters => "m",
        }
    }
}

/// A single electrode location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectrodePosition {
    /// 1-based index, unique within the owning set.
    pub index: u32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Optional channel name (e.g. `Fp1`, or `Fp1-F3` for a bipolar channel).
    #[serde(default)]
    pub label: Option<String>,
}

impl ElectrodePosition {
    pub fn new(index: u32, x: f64, y: f64, z: f64) -> Self {
        Self {
            index,
            x,
            y,
            z,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn point(&self) -> Point3 {
        Point3::new(self.x, self.y, self.z)
    }
}

/// An ordered electrode set with contiguous indices `1..=N`.
///
/// Sets are never mutated in place; transforms build a new set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectrodeSet {
    unit: Unit,
    positions: Vec<ElectrodePosition>,
}

/// Physical cap locations.
pub type UnipolarSet = ElectrodeSet;
/// Positions derived one-to-one from a pairing table.
pub type BipolarSet = ElectrodeSet;

impl ElectrodeSet {
    /// Creates a set, checking that indices run `1, 2, ..., N` in order.
    pub fn new(unit: Unit, positions: Vec<ElectrodePosition>) -> MontageResult<Self> {
        for (i, pos) in positions.iter().enumerate() {
            let expected = i as u32 + 1;
            if pos.index != expected {
                return Err(MontageError::NonContiguousIndex {
                    expected,
                    found: pos.index,
                });
            }
        }
        Ok(Self { unit, positions })
    }

    /// Rebuilds a set from bare points, carrying over indices and labels
    /// from `template`. Both must have the same length.
    pub fn with_points(template: &ElectrodeSet, points: &PointSet) -> MontageResult<Self> {
        if template.len() != points.len() {
            return Err(MontageError::LengthMismatch {
                expected: template.len(),
                found: points.len(),
            });
        }
        let positions = template
            .positions
            .iter()
            .zip(points.iter())
            .map(|(pos, p)| ElectrodePosition {
                index: pos.index,
                x: p.x,
                y: p.y,
                z: p.z,
                label: pos.label.clone(),
            })
            .collect();
        Ok(Self {
            unit: template.unit,
            positions,
        })
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn positions(&self) -> &[ElectrodePosition] {
        &self.positions
    }

    /// Looks up a position by its 1-based index.
    pub fn get(&self, index: u32) -> Option<&ElectrodePosition> {
        if index == 0 {
            return None;
        }
        self.positions.get(index as usize - 1)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Strips indices and labels.
    pub fn to_point_set(&self) -> PointSet {
        self.positions.iter().map(ElectrodePosition::point).collect()
    }
}

/// One row of a pairing table: the two source indices of a bipolar channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub channel1: u32,
    pub channel2: u32,
}

impl Pair {
    pub fn new(channel1: u32, channel2: u32) -> Self {
        Self { channel1, channel2 }
    }
}

/// Ordered list of bipolar pairs, 1-based.
///
/// Indices above the deriver's `max_direct_index` refer to rows of the
/// derived set itself (index `max_direct_index + j` is derived row `j`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairingTable {
    rows: Vec<Pair>,
}

impl PairingTable {
    pub fn new(rows: Vec<Pair>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Pair] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<(u32, u32)>> for PairingTable {
    fn from(rows: Vec<(u32, u32)>) -> Self {
        Self::new(rows.into_iter().map(|(a, b)| Pair::new(a, b)).collect())
    }
}
