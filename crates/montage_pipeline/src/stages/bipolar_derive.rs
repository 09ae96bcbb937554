//! Bipolar derivation stage.

use crate::bipolar;
use crate::config::StageConfig;
use crate::data::MontageData;
use crate::error::StageError;
use crate::registry::StageFactory;
use crate::stage::{Stage, StageContext};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BipolarDeriveParams {
    /// Highest index that resolves to the unipolar cap. Defaults to the
    /// size of the unipolar set.
    #[serde(default)]
    pub max_direct_index: Option<u32>,
}

/// A factory for creating `BipolarDerive` stages.
#[derive(Default)]
pub struct BipolarDeriveFactory;

impl StageFactory for BipolarDeriveFactory {
    fn create(&self, config: &StageConfig) -> Result<Box<dyn Stage>, StageError> {
        let params: BipolarDeriveParams = config.params_as()?;
        Ok(Box::new(BipolarDerive::new(config.name.clone(), params)))
    }
}

/// Turns a `Source` (cap + pairing table) into the bipolar electrode set.
pub struct BipolarDerive {
    id: String,
    params: BipolarDeriveParams,
}

impl BipolarDerive {
    pub fn new(id: String, params: BipolarDeriveParams) -> Self {
        Self { id, params }
    }
}

impl Stage for BipolarDerive {
    fn id(&self) -> &str {
        &self.id
    }

    fn process(
        &mut self,
        data: MontageData,
        _ctx: &mut StageContext,
    ) -> Result<Option<MontageData>, StageError> {
        let MontageData::Source { unipolar, pairs } = data else {
            return Err(StageError::BadInput(format!(
                "{} expects a unipolar set with a pairing table",
                self.id
            )));
        };

        let max_direct_index = self
            .params
            .max_direct_index
            .unwrap_or(unipolar.len() as u32);
        let bipolar = bipolar::derive(&unipolar, &pairs, max_direct_index)?;
        info!(
            "Derived {} bipolar positions from {} electrodes (max direct index {})",
            bipolar.len(),
            unipolar.len(),
            max_direct_index
        );
        Ok(Some(MontageData::Electrodes(Arc::new(bipolar))))
    }
}
