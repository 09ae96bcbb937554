//! Pipeline runtime for executing pipeline graphs.

use crate::data::MontageData;
use crate::error::PipelineError;
use crate::graph::{PipelineGraph, StageId};
use montage_types::ElectrodeSet;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Outputs of a finished run.
#[derive(Debug)]
pub struct RunReport {
    /// Each stage's output, keyed by stage name.
    pub outputs: HashMap<StageId, MontageData>,
}

impl RunReport {
    /// The electrode set a stage produced, if it produced one.
    pub fn electrodes(&self, stage: &str) -> Option<&Arc<ElectrodeSet>> {
        self.outputs.get(stage).map(MontageData::electrodes)
    }
}

/// Runs one input through the graph and flushes all sinks.
///
/// Stage events are delivered through the graph's `StageContext`.
pub fn run(graph: &mut PipelineGraph, input: MontageData) -> Result<RunReport, PipelineError> {
    let topo = graph.topology_sort()?;
    info!("Running pipeline with {} stages: {}", topo.len(), topo.join(" -> "));

    let outputs = graph.push(input, &topo)?;

    info!("All stages complete. Flushing sinks...");
    graph.flush()?;

    Ok(RunReport { outputs })
}
