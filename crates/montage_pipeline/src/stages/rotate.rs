//! Rotation stage.

use crate::config::StageConfig;
use crate::data::MontageData;
use crate::error::StageError;
use crate::frame;
use crate::registry::StageFactory;
use crate::stage::{Stage, StageContext};
use montage_types::{ElectrodeSet, RotationSpec};
use nalgebra::Rotation3;
use std::sync::Arc;
use tracing::debug;

/// A factory for creating `Rotate` stages. Parameters are `rx`, `ry`, `rz`
/// in degrees, each defaulting to 0.
#[derive(Default)]
pub struct RotateFactory;

impl StageFactory for RotateFactory {
    fn create(&self, config: &StageConfig) -> Result<Box<dyn Stage>, StageError> {
        let spec: RotationSpec = config.params_as()?;
        // Angles are checked when the stage is built.
        let rotation = frame::rotation_matrix(&spec)?;
        Ok(Box::new(Rotate {
            id: config.name.clone(),
            spec,
            rotation,
        }))
    }
}

pub struct Rotate {
    id: String,
    spec: RotationSpec,
    rotation: Rotation3<f64>,
}

impl Stage for Rotate {
    fn id(&self) -> &str {
        &self.id
    }

    fn process(
        &mut self,
        data: MontageData,
        _ctx: &mut StageContext,
    ) -> Result<Option<MontageData>, StageError> {
        let set = data.electrodes();
        let points = frame::apply_rotation(&set.to_point_set(), &self.rotation);
        let rotated = ElectrodeSet::with_points(set, &points)?;
        debug!(
            rx = self.spec.rx,
            ry = self.spec.ry,
            rz = self.spec.rz,
            "Rotated {} positions",
            rotated.len()
        );
        Ok(Some(MontageData::Electrodes(Arc::new(rotated))))
    }
}
