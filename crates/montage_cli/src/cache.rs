//! Skips recomputation when exported coordinates are already up to date.

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// True when every output exists and none is older than any input.
///
/// An empty output list is never fresh.
pub fn outputs_fresh(outputs: &[PathBuf], inputs: &[PathBuf]) -> bool {
    if outputs.is_empty() {
        return false;
    }

    let newest_input = inputs.iter().filter_map(|p| modified(p)).max();
    for output in outputs {
        let Some(out_time) = modified(output) else {
            debug!("Cached output {} is missing", output.display());
            return false;
        };
        if let Some(input_time) = newest_input {
            if out_time < input_time {
                debug!("Cached output {} is stale", output.display());
                return false;
            }
        }
    }
    true
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
