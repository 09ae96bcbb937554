//! Coordinate pipeline for EEG electrode montages
//!
//! The core is two pure transforms: [`bipolar::derive`] computes bipolar
//! channel positions as midpoints of their source electrodes, and [`frame`]
//! re-orients point sets (fixed display-convention swap or an `Rz·Ry·Rx`
//! rotation). Around them sits a small stage graph that wires the
//! transforms to CSV and JSON sinks from a JSON configuration.

pub mod bipolar;
pub mod config;
pub mod data;
pub mod error;
pub mod event;
pub mod frame;
pub mod graph;
pub mod registry;
pub mod runtime;
pub mod stage;
pub mod stages;


// Re-export commonly used types
pub use config::*;
pub use data::*;
pub use error::*;
pub use event::*;
pub use graph::*;
pub use registry::*;
pub use runtime::*;
pub use stage::*;
pub use stages::*;
