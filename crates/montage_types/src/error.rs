//! Error types for montage coordinate operations

use serde::{Deserialize, Serialize};

/// Represents errors raised while validating or transforming electrode
/// coordinates.
///
/// Every variant carries the offending row, index or value so the caller can
/// report exactly which input was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum MontageError {
    /// A chained index points at a derived row that has not been produced yet.
    #[error("row {row}: index {index} refers to a derived row that is not computed yet")]
    UnresolvedReference { row: usize, index: u32 },

    /// An index is zero or lies beyond both the unipolar and the derived set.
    #[error("row {row}: index {index} is out of range")]
    IndexOutOfRange { row: usize, index: u32 },

    /// A rotation angle is NaN or infinite.
    #[error("rotation angle {axis} is not finite: {value}")]
    InvalidRotationSpec { axis: char, value: f64 },

    /// A point does not have exactly three coordinates.
    #[error("point {point} has {found} coordinates, expected 3")]
    DimensionMismatch { point: usize, found: usize },

    #[error("pairing table is empty")]
    EmptyPairingTable,

    #[error("unipolar set has {available} electrodes, at least {required} required")]
    InsufficientElectrodes { required: usize, available: usize },

    #[error("electrode indices must be contiguous from 1: expected {expected}, found {found}")]
    NonContiguousIndex { expected: u32, found: u32 },

    #[error("expected {expected} points to match the electrode set, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}

/// Result type for montage operations
pub type MontageResult<T> = Result<T, MontageError>;
