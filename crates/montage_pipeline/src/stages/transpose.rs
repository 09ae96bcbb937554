//! Display-convention axis swap stage.

use crate::config::StageConfig;
use crate::data::MontageData;
use crate::error::StageError;
use crate::frame;
use crate::registry::StageFactory;
use crate::stage::{Stage, StageContext};
use std::sync::Arc;
use tracing::debug;

#[derive(Default)]
pub struct TransposeFactory;

impl StageFactory for TransposeFactory {
    fn create(&self, config: &StageConfig) -> Result<Box<dyn Stage>, StageError> {
        Ok(Box::new(Transpose {
            id: config.name.clone(),
        }))
    }
}

pub struct Transpose {
    id: String,
}

impl Stage for Transpose {
    fn id(&self) -> &str {
        &self.id
    }

    fn process(
        &mut self,
        data: MontageData,
        _ctx: &mut StageContext,
    ) -> Result<Option<MontageData>, StageError> {
        let swapped = frame::transpose_set(data.electrodes())?;
        debug!("Transposed {} positions", swapped.len());
        Ok(Some(MontageData::Electrodes(Arc::new(swapped))))
    }
}
