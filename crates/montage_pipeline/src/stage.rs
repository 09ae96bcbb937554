//! Core pipeline stage trait and types

use flume::Sender;
use tracing::warn;

use crate::data::MontageData;
use crate::error::StageError;
use crate::event::PipelineEvent;

/// Shared context handed to every stage call.
#[derive(Clone)]
pub struct StageContext {
    pub event_tx: Sender<PipelineEvent>,
}

impl StageContext {
    pub fn new(event_tx: Sender<PipelineEvent>) -> Self {
        Self { event_tx }
    }

    /// Emits an event. A dropped receiver is not an error for the stage.
    pub fn emit(&self, event: PipelineEvent) {
        if self.event_tx.send(event).is_err() {
            warn!("Pipeline event receiver dropped");
        }
    }
}

/// A single processing step of the montage pipeline.
pub trait Stage: Send {
    /// The stage's name within the pipeline.
    fn id(&self) -> &str;

    /// Processes one input. Returning `None` ends this branch of the graph.
    fn process(
        &mut self,
        data: MontageData,
        ctx: &mut StageContext,
    ) -> Result<Option<MontageData>, StageError>;

    /// Sinks that buffer output expose it here so the runtime can flush them.
    fn as_drains(&mut self) -> Option<&mut dyn Drains> {
        None
    }
}

/// Implemented by stages that buffer output.
pub trait Drains {
    fn flush(&mut self) -> std::io::Result<()>;
}
