//! CSV sink stage: writes an electrode set as a plain numeric table.

use crate::config::StageConfig;
use crate::data::MontageData;
use crate::error::StageError;
use crate::event::PipelineEvent;
use crate::registry::StageFactory;
use crate::stage::{Drains, Stage, StageContext};
use montage_types::{ElectrodePosition, ElectrodeSet};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

/// One row of the location table: `index,label,x,y,z`.
///
/// The same layout is used to load unipolar caps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub index: u32,
    #[serde(default)]
    pub label: Option<String>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<&ElectrodePosition> for LocationRecord {
    fn from(pos: &ElectrodePosition) -> Self {
        Self {
            index: pos.index,
            label: pos.label.clone(),
            x: pos.x,
            y: pos.y,
            z: pos.z,
        }
    }
}

impl From<LocationRecord> for ElectrodePosition {
    fn from(rec: LocationRecord) -> Self {
        ElectrodePosition {
            index: rec.index,
            x: rec.x,
            y: rec.y,
            z: rec.z,
            label: rec.label.filter(|l| !l.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CsvSinkParams {
    pub path: PathBuf,
}

/// A factory for creating `CsvSink` stages.
#[derive(Default)]
pub struct CsvSinkFactory;

impl StageFactory for CsvSinkFactory {
    fn create(&self, config: &StageConfig) -> Result<Box<dyn Stage>, StageError> {
        let params: CsvSinkParams = config.params_as()?;
        Ok(Box::new(CsvSink::new(config.name.clone(), params)))
    }

    fn output_path(&self, config: &StageConfig) -> Result<Option<PathBuf>, StageError> {
        let params: CsvSinkParams = config.params_as()?;
        Ok(Some(params.path))
    }
}

/// A sink stage that writes incoming electrode sets to a CSV file.
pub struct CsvSink {
    id: String,
    params: CsvSinkParams,
    writer: Option<csv::Writer<BufWriter<File>>>,
}

impl CsvSink {
    pub fn new(id: String, params: CsvSinkParams) -> Self {
        Self {
            id,
            params,
            writer: None,
        }
    }

    fn write_set(&mut self, set: &ElectrodeSet) -> Result<(), StageError> {
        if let Some(parent) = self.params.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                create_dir_all(parent)?;
            }
        }

        let file = File::create(&self.params.path).map_err(|e| {
            StageError::Io(format!("Failed to create CSV file {:?}: {}", self.params.path, e))
        })?;
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));
        for pos in set.positions() {
            writer.serialize(LocationRecord::from(pos))?;
        }
        self.writer = Some(writer);
        Ok(())
    }
}

impl Stage for CsvSink {
    fn id(&self) -> &str {
        &self.id
    }

    fn process(
        &mut self,
        data: MontageData,
        ctx: &mut StageContext,
    ) -> Result<Option<MontageData>, StageError> {
        let set = data.electrodes().clone();
        self.write_set(&set)?;
        info!("Wrote {} positions to {:?}", set.len(), self.params.path);
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

impl Drains for CsvSink {
    fn flush(&mut self) -> std::io::Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}
