//! Events emitted by stages while a pipeline runs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// A stage produced an output set with `electrodes` entries.
    StageCompleted { stage: String, electrodes: usize },
    /// A sink wrote its output file.
    OutputWritten { stage: String, path: PathBuf },
}
