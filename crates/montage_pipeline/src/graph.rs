//! Pipeline graph construction and management.

use crate::config::{StageConfig, SystemConfig};
use crate::data::MontageData;
use crate::error::PipelineError;
use crate::event::PipelineEvent;
use crate::registry::StageRegistry;
use crate::stage::{Stage, StageContext};
use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use std::collections::HashMap;
use tracing::{debug, info};

pub type StageId = String;

/// Represents a node in the pipeline graph.
pub struct PipelineNode {
    pub name: StageId,
    pub stage: Box<dyn Stage>,
    pub input_source: Option<StageId>,
}

/// Represents the entire pipeline as a graph of connected stages.
pub struct PipelineGraph {
    pub nodes: HashMap<StageId, PipelineNode>,
    pub context: StageContext,
    config: SystemConfig,
}

impl PipelineGraph {
    /// Builds a new `PipelineGraph` from a configuration and a stage registry.
    pub fn build(
        config: &SystemConfig,
        registry: &StageRegistry,
        context: StageContext,
    ) -> Result<Self, PipelineError> {
        config.validate()?;

        let mut nodes = HashMap::new();
        for stage_config in &config.stages {
            let stage = registry
                .create_stage(stage_config)
                .map_err(|source| PipelineError::Stage {
                    stage_name: stage_config.name.clone(),
                    source,
                })?;
            debug!("Created stage '{}' of type '{}'", stage_config.name, stage_config.stage_type);

            let node = PipelineNode {
                name: stage_config.name.clone(),
                stage,
                input_source: stage_config.inputs.first().cloned(),
            };
            nodes.insert(stage_config.name.clone(), node);
        }

        Ok(Self {
            nodes,
            context,
            config: config.clone(),
        })
    }

    /// Computes a topological sort of the stage graph for execution order.
    pub fn topology_sort(&self) -> Result<Vec<StageId>, PipelineError> {
        let mut graph = DiGraph::<&StageConfig, ()>::new();
        let mut node_map = HashMap::new();

        for stage_config in &self.config.stages {
            let idx = graph.add_node(stage_config);
            node_map.insert(&stage_config.name, idx);
        }

        for stage_config in &self.config.stages {
            if let Some(input_name) = stage_config.inputs.first() {
                if let (Some(&from_idx), Some(&to_idx)) =
                    (node_map.get(input_name), node_map.get(&stage_config.name))
                {
                    graph.add_edge(from_idx, to_idx, ());
                }
            }
        }

        match toposort(&graph, None) {
            Ok(nodes) => Ok(nodes
                .into_iter()
                .map(|idx| graph[idx].name.clone())
                .collect()),
            Err(cycle) => Err(PipelineError::CircularDependency {
                name: graph[cycle.node_id()].name.clone(),
            }),
        }
    }

    /// Pushes one input through the pipeline in topological order.
    ///
    /// Source stages (no inputs) each receive a clone of `data`. Returns every
    /// stage's output keyed by stage name. The first failing stage aborts the
    /// push.
    pub fn push(
        &mut self,
        data: MontageData,
        topo: &[StageId],
    ) -> Result<HashMap<StageId, MontageData>, PipelineError> {
        let mut outputs: HashMap<StageId, MontageData> = HashMap::new();

        for stage_id in topo {
            let Some(node) = self.nodes.get_mut(stage_id) else {
                return Err(PipelineError::StageNotFound {
                    name: stage_id.clone(),
                });
            };

            let input = match &node.input_source {
                Some(source_id) => match outputs.get(source_id) {
                    Some(upstream) => upstream.clone(),
                    // Upstream ended its branch.
                    None => continue,
                },
                None => data.clone(),
            };

            info!("Running stage '{}' on {} input", node.stage.id(), input.kind());
            let result = node
                .stage
                .process(input, &mut self.context)
                .map_err(|source| PipelineError::Stage {
                    stage_name: node.name.clone(),
                    source,
                })?;

            if let Some(out) = result {
                self.context.emit(PipelineEvent::StageCompleted {
                    stage: node.name.clone(),
                    electrodes: out.electrodes().len(),
                });
                outputs.insert(stage_id.clone(), out);
            }
        }
        Ok(outputs)
    }

    /// Flushes all sink stages that implement the `Drains` trait.
    pub fn flush(&mut self) -> Result<(), PipelineError> {
        for node in self.nodes.values_mut() {
            if let Some(drains) = node.stage.as_drains() {
                drains.flush().map_err(|e| PipelineError::RuntimeError {
                    stage_name: node.name.clone(),
                    message: format!("IO error during flush: {}", e),
                })?;
            }
        }
        Ok(())
    }
}
