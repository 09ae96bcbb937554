use anyhow::{Context, Result};
use montage_pipeline::config::SystemConfig;
use montage_types::Unit;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration for one montage run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// CSV with `index,label,x,y,z` rows describing the unipolar cap
    pub unipolar: PathBuf,
    /// CSV with `channel1,channel2` rows; optional for pipelines without a
    /// bipolar derivation
    #[serde(default)]
    pub pairs: Option<PathBuf>,
    /// Unit of the unipolar coordinates
    #[serde(default)]
    pub unit: Unit,
    /// Stage graph to run
    pub pipeline: SystemConfig,
    /// File this configuration was loaded from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl AppConfig {
    /// Resolves relative input and output paths against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let join = |p: &Path| if p.is_relative() { base.join(p) } else { p.to_path_buf() };

        self.unipolar = join(&self.unipolar);
        self.pairs = self.pairs.as_deref().map(join);
        for stage in &mut self.pipeline.stages {
            if let Some(path) = stage.params.get("path").and_then(|p| p.as_str()) {
                let resolved = join(Path::new(path));
                stage.params.insert(
                    "path".to_string(),
                    serde_json::Value::String(resolved.to_string_lossy().into_owned()),
                );
            }
        }
    }

    /// Every file the run reads, including the configuration itself.
    pub fn input_paths(&self) -> Vec<PathBuf> {
        let mut inputs = vec![self.unipolar.clone()];
        inputs.extend(self.pairs.clone());
        inputs.extend(self.source.clone());
        inputs
    }
}

/// Load the run configuration from a JSON file.
///
/// Relative paths inside the file are taken relative to the file's directory.
pub fn load_config(config_path: &Path) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(config_path).with_context(|| {
        format!("Could not read configuration file at '{}'", config_path.display())
    })?;

    let mut config: AppConfig = serde_json::from_str(&contents).with_context(|| {
        format!("Could not parse configuration file at '{}'", config_path.display())
    })?;
    config
        .pipeline
        .validate()
        .with_context(|| format!("Invalid pipeline in '{}'", config_path.display()))?;

    if let Some(base) = config_path.parent() {
        config.resolve_paths(base);
    }
    config.source = Some(config_path.to_path_buf());

    info!("Loaded configuration from {}", config_path.display());
    Ok(config)
}
