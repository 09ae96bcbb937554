//! Shared types for the montage coordinate system
//!
//! This crate contains the data model used throughout the workspace:
//! electrode positions and sets, bipolar pairing tables, bare point sets,
//! rotation specifications and the error type raised when any of them is
//! malformed.

pub mod electrode;
pub mod error;
pub mod geometry;

// Re-export commonly used types
pub use electrode::*;
pub use error::*;
pub use geometry::*;
