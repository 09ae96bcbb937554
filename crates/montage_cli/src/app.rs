//! Runs a configured montage pipeline end to end.

use anyhow::{Context, Result};
use montage_pipeline::{
    register_builtin_stages, run, MontageData, PipelineEvent, PipelineGraph, StageContext,
    StageRegistry,
};
use montage_types::PairingTable;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::cache::outputs_fresh;
use crate::config::AppConfig;
use crate::loader::{load_pairs, load_unipolar};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Recompute even when cached outputs are fresh.
    pub force: bool,
    /// Load inputs and build the graph, but do not run it.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Outputs were already up to date.
    Cached { outputs: Vec<PathBuf> },
    /// The graph was built but not run.
    DryRun { stages: Vec<String> },
    /// The pipeline ran and wrote these files.
    Completed { written: Vec<PathBuf> },
}

pub fn execute(config: &AppConfig, options: RunOptions) -> Result<RunOutcome> {
    let mut registry = StageRegistry::new();
    register_builtin_stages(&mut registry);

    let outputs = registry
        .output_paths(&config.pipeline)
        .context("Failed to collect output paths")?;
    if !options.force && !options.dry_run && outputs_fresh(&outputs, &config.input_paths()) {
        info!("Outputs are up to date, skipping run ({} files)", outputs.len());
        return Ok(RunOutcome::Cached { outputs });
    }
    if options.force {
        warn!("Ignoring cached outputs");
    }

    let unipolar = load_unipolar(&config.unipolar, config.unit)?;
    let pairs = match &config.pairs {
        Some(path) => load_pairs(path)?,
        None => PairingTable::default(),
    };
    info!(
        "Loaded {} electrodes and {} pairs",
        unipolar.len(),
        pairs.len()
    );

    let (event_tx, event_rx) = flume::unbounded();
    let mut graph = PipelineGraph::build(&config.pipeline, &registry, StageContext::new(event_tx))
        .context("Failed to build pipeline")?;

    if options.dry_run {
        let stages = graph.topology_sort()?;
        info!("Dry run, pipeline order: {}", stages.join(" -> "));
        return Ok(RunOutcome::DryRun { stages });
    }

    run(&mut graph, MontageData::source(unipolar, pairs)).context("Pipeline failed")?;

    let written = event_rx
        .try_iter()
        .filter_map(|event| match event {
            PipelineEvent::OutputWritten { path, .. } => Some(path),
            PipelineEvent::StageCompleted { .. } => None,
        })
        .collect();
    Ok(RunOutcome::Completed { written })
}
