//! Pipeline configuration types and serialization

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{PipelineError, PipelineResult, StageError};

/// Stage parameters as a flexible key-value map
pub type StageParams = HashMap<String, serde_json::Value>;

/// Complete pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Configuration format version
    #[serde(default = "default_version")]
    pub version: String,
    /// Stage definitions
    pub stages: Vec<StageConfig>,
}

/// Individual stage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    /// Unique stage name within the pipeline
    pub name: String,
    /// Stage type identifier
    #[serde(rename = "type")]
    pub stage_type: String,
    /// Stage parameters
    #[serde(default)]
    pub params: StageParams,
    /// Input stage names this stage depends on
    #[serde(default)]
    pub inputs: Vec<String>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl SystemConfig {
    pub fn new(stages: Vec<StageConfig>) -> Self {
        Self {
            version: default_version(),
            stages,
        }
    }

    /// Get a stage by name
    pub fn get_stage(&self, name: &str) -> Option<&StageConfig> {
        self.stages.iter().find(|s| s.name == name)
    }

    /// Validate the pipeline configuration
    pub fn validate(&self) -> PipelineResult<()> {
        if self.stages.is_empty() {
            return Err(PipelineError::InvalidConfiguration {
                message: "Pipeline must contain at least one stage".to_string(),
            });
        }

        let mut names = HashSet::new();
        for stage in &self.stages {
            if !names.insert(stage.name.as_str()) {
                return Err(PipelineError::InvalidConfiguration {
                    message: format!("Stage name '{}' already exists", stage.name),
                });
            }
        }

        for stage in &self.stages {
            if stage.inputs.len() > 1 {
                return Err(PipelineError::InvalidConfiguration {
                    message: format!("Stage '{}' has more than one input", stage.name),
                });
            }
            for input in &stage.inputs {
                if self.get_stage(input).is_none() {
                    return Err(PipelineError::InvalidConfiguration {
                        message: format!(
                            "Stage '{}' references non-existent input '{}'",
                            stage.name, input
                        ),
                    });
                }
            }
        }

        self.check_circular_dependencies()
    }

    /// Check for circular dependencies using depth-first search
    fn check_circular_dependencies(&self) -> PipelineResult<()> {
        let mut visited = HashMap::new();
        let mut rec_stack = HashMap::new();

        for stage in &self.stages {
            if !visited.get(stage.name.as_str()).unwrap_or(&false)
                && self.has_cycle(&stage.name, &mut visited, &mut rec_stack)
            {
                return Err(PipelineError::CircularDependency {
                    name: stage.name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Recursive helper for cycle detection
    fn has_cycle<'a>(
        &'a self,
        stage_name: &'a str,
        visited: &mut HashMap<&'a str, bool>,
        rec_stack: &mut HashMap<&'a str, bool>,
    ) -> bool {
        visited.insert(stage_name, true);
        rec_stack.insert(stage_name, true);

        if let Some(stage) = self.get_stage(stage_name) {
            for input in &stage.inputs {
                if !visited.get(input.as_str()).unwrap_or(&false) {
                    if self.has_cycle(input, visited, rec_stack) {
                        return true;
                    }
                } else if *rec_stack.get(input.as_str()).unwrap_or(&false) {
                    return true;
                }
            }
        }

        rec_stack.insert(stage_name, false);
        false
    }

    /// Load pipeline configuration from JSON
    pub fn from_json(json: &str) -> PipelineResult<Self> {
        let config: SystemConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

impl StageConfig {
    /// Create a new stage configuration
    pub fn new(name: impl Into<String>, stage_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stage_type: stage_type.into(),
            params: HashMap::new(),
            inputs: vec![],
        }
    }

    /// Set a parameter
    pub fn with_param(mut self, key: &str, value: serde_json::Value) -> Self {
        self.params.insert(key.to_string(), value);
        self
    }

    /// Set the input stage
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        let input = input.into();
        if !self.inputs.contains(&input) {
            self.inputs.push(input);
        }
        self
    }

    /// Deserializes the parameter map into a typed parameter struct.
    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, StageError> {
        serde_json::from_value(serde_json::Value::Object(
            self.params.clone().into_iter().collect(),
        ))
        .map_err(|e| StageError::BadConfig(format!("stage '{}': {}", self.name, e)))
    }
}
