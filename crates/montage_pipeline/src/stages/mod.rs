//! Built-in pipeline stages

pub mod bipolar_derive;
pub mod csv_sink;
pub mod json_sink;
pub mod rotate;
pub mod transpose;

// Re-export stage implementations
pub use bipolar_derive::*;
pub use csv_sink::*;
pub use json_sink::*;
pub use rotate::*;
pub use transpose::*;

use crate::registry::StageRegistry;

/// Register all built-in stages with the registry
pub fn register_builtin_stages(registry: &mut StageRegistry) {
    registry.register("bipolar_derive", BipolarDeriveFactory);
    registry.register("transpose", TransposeFactory);
    registry.register("rotate", RotateFactory);
    registry.register("csv_sink", CsvSinkFactory);
    registry.register("json_sink", JsonSinkFactory);
}
