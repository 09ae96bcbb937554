//! Data types passed between pipeline stages

use std::sync::Arc;

use montage_types::{ElectrodeSet, PairingTable};

/// Data that flows between stages.
#[derive(Debug, Clone)]
pub enum MontageData {
    /// Loaded cap positions and the pairing table to derive from.
    Source {
        unipolar: Arc<ElectrodeSet>,
        pairs: Arc<PairingTable>,
    },
    /// A finished electrode set (unipolar, bipolar or re-oriented).
    Electrodes(Arc<ElectrodeSet>),
}

impl MontageData {
    pub fn source(unipolar: ElectrodeSet, pairs: PairingTable) -> Self {
        MontageData::Source {
            unipolar: Arc::new(unipolar),
            pairs: Arc::new(pairs),
        }
    }

    /// The electrode set a frame transform or sink should act on.
    ///
    /// For `Source` this is the unipolar set.
    pub fn electrodes(&self) -> &Arc<ElectrodeSet> {
        match self {
            MontageData::Source { unipolar, .. } => unipolar,
            MontageData::Electrodes(set) => set,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MontageData::Source { .. } => "source",
            MontageData::Electrodes(_) => "electrodes",
        }
    }
}
