//! Stage registry for creating pipeline stage instances.

use crate::config::{StageConfig, SystemConfig};
use crate::error::{PipelineError, StageError};
use crate::stage::Stage;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// A factory for creating instances of a specific stage type.
pub trait StageFactory: Send + Sync {
    /// Creates a new stage instance from a config.
    fn create(&self, config: &StageConfig) -> Result<Box<dyn Stage>, StageError>;

    /// The file a stage built from `config` writes, if any.
    fn output_path(&self, _config: &StageConfig) -> Result<Option<PathBuf>, StageError> {
        Ok(None)
    }
}

/// A registry for stage factories.
#[derive(Default)]
pub struct StageRegistry {
    factories: HashMap<String, Arc<dyn StageFactory>>,
}

impl StageRegistry {
    /// Creates a new, empty stage registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new stage factory.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: StageFactory + 'static,
    {
        self.factories.insert(name.to_string(), Arc::new(factory));
    }

    /// Creates a new stage instance from a config.
    pub fn create_stage(&self, config: &StageConfig) -> Result<Box<dyn Stage>, StageError> {
        self.factories
            .get(&config.stage_type)
            .ok_or_else(|| StageError::NotFound(config.stage_type.clone()))?
            .create(config)
    }

    /// Files written by the stages of `config`, in declaration order.
    pub fn output_paths(&self, config: &SystemConfig) -> Result<Vec<PathBuf>, PipelineError> {
        let mut paths = Vec::new();
        for stage in &config.stages {
            let path = self
                .factories
                .get(&stage.stage_type)
                .ok_or_else(|| StageError::NotFound(stage.stage_type.clone()))
                .and_then(|factory| factory.output_path(stage))
                .map_err(|source| PipelineError::Stage {
                    stage_name: stage.name.clone(),
                    source,
                })?;
            paths.extend(path);
        }
        Ok(paths)
    }

    /// Get all registered stage types
    pub fn stage_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        types.sort_unstable();
        types
    }
}
