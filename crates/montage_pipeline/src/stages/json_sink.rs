//! JSON sink stage: writes an electrode set with its montage metadata.

use crate::config::StageConfig;
use crate::data::MontageData;
use crate::error::StageError;
use crate::event::PipelineEvent;
use crate::registry::StageFactory;
use crate::stage::{Drains, Stage, StageContext};
use chrono::{DateTime, Utc};
use montage_types::{ElectrodePosition, Unit};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// The structured export format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MontageDocument {
    pub montage: String,
    pub kind: String,
    pub unit: Unit,
    pub generated_at: DateTime<Utc>,
    pub electrodes: Vec<ElectrodePosition>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JsonSinkParams {
    pub path: PathBuf,
    #[serde(default = "default_montage")]
    pub montage: String,
    /// Free-form description of the set, e.g. `bipolar` or `unipolar`.
    #[serde(default = "default_kind")]
    pub kind: String,
}

fn default_montage() -> String {
    "montage".to_string()
}

fn default_kind() -> String {
    "electrodes".to_string()
}

#[derive(Default)]
pub struct JsonSinkFactory;

impl StageFactory for JsonSinkFactory {
    fn create(&self, config: &StageConfig) -> Result<Box<dyn Stage>, StageError> {
        let params: JsonSinkParams = config.params_as()?;
        Ok(Box::new(JsonSink {
            id: config.name.clone(),
            params,
            writer: None,
        }))
    }

    fn output_path(&self, config: &StageConfig) -> Result<Option<PathBuf>, StageError> {
        let params: JsonSinkParams = config.params_as()?;
        Ok(Some(params.path))
    }
}

pub struct JsonSink {
    id: String,
    params: JsonSinkParams,
    writer: Option<BufWriter<File>>,
}

impl Stage for JsonSink {
    fn id(&self) -> &str {
        &self.id
    }

    fn process(
        &mut self,
        data: MontageData,
        ctx: &mut StageContext,
    ) -> Result<Option<MontageData>, StageError> {
        let set = data.electrodes();
        let doc = MontageDocument {
            montage: self.params.montage.clone(),
            kind: self.params.kind.clone(),
            unit: set.unit(),
            generated_at: Utc::now(),
            electrodes: set.positions().to_vec(),
        };

        if let Some(parent) = self.params.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                create_dir_all(parent)?;
            }
        }
        let file = File::create(&self.params.path).map_err(|e| {
            StageError::Io(format!("Failed to create JSON file {:?}: {}", self.params.path, e))
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &doc)?;
        writeln!(writer)?;
        self.writer = Some(writer);

        info!("Wrote {} positions to {:?}", doc.electrodes.len(), self.params.path);
        ctx.emit(PipelineEvent::OutputWritten {
            stage: self.id.clone(),
            path: self.params.path.clone(),
        });
        Ok(None)
    }

    fn as_drains(&mut self) -> Option<&mut dyn Drains> {
        Some(self)
    }
}

impl Drains for JsonSink {
    fn flush(&mut self) -> std::io::Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}
