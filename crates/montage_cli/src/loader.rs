//! Reads unipolar caps and pairing tables from CSV.

use anyhow::{Context, Result};
use montage_pipeline::stages::LocationRecord;
use montage_types::{ElectrodePosition, ElectrodeSet, Pair, PairingTable, Unit};
use std::path::Path;
use tracing::debug;

/// Loads a cap from a CSV with an `index,label,x,y,z` header.
pub fn load_unipolar(path: &Path, unit: Unit) -> Result<ElectrodeSet> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Could not open electrode file '{}'", path.display()))?;

    let mut positions = Vec::new();
    for (line, record) in reader.deserialize::<LocationRecord>().enumerate() {
        let record = record.with_context(|| {
            format!("Bad electrode row {} in '{}'", line + 1, path.display())
        })?;
        positions.push(ElectrodePosition::from(record));
    }

    debug!("Read {} electrodes from {}", positions.len(), path.display());
    ElectrodeSet::new(unit, positions)
        .with_context(|| format!("Invalid electrode set in '{}'", path.display()))
}

/// Loads a pairing table from a CSV with a `channel1,channel2` header.
pub fn load_pairs(path: &Path) -> Result<PairingTable> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Could not open pairing file '{}'", path.display()))?;

    let rows = reader
        .deserialize::<Pair>()
        .enumerate()
        .map(|(line, row)| {
            row.with_context(|| format!("Bad pairing row {} in '{}'", line + 1, path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Read {} pairs from {}", rows.len(), path.display());
    Ok(PairingTable::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_unipolar_with_optional_labels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cap.csv");
        std::fs::write(&path, "index,label,x,y,z\n1,Fp1,-27.0,83.9,-3.0\n2,,27.0,83.9,-3.0\n").unwrap();

        let set = load_unipolar(&path, Unit::Millimeters).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.positions()[0].label.as_deref(), Some("Fp1"));
        assert_eq!(set.positions()[1].label, None);
        assert_eq!(set.positions()[1].x, 27.0);
    }

    #[test]
    fn test_load_unipolar_rejects_gaps() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cap.csv");
        std::fs::write(&path, "index,label,x,y,z\n1,A,0,0,0\n3,B,1,0,0\n").unwrap();

        let err = load_unipolar(&path, Unit::Millimeters).unwrap_err();
        assert!(err.to_string().contains("Invalid electrode set"));
    }

    #[test]
    fn test_load_unipolar_rejects_missing_coordinate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cap.csv");
        std::fs::write(&path, "index,label,x,y,z\n1,A,0,0\n").unwrap();

        let err = load_unipolar(&path, Unit::Millimeters).unwrap_err();
        assert!(err.to_string().contains("Bad electrode row 1"));
    }

    #[test]
    fn test_load_pairs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pairs.csv");
        std::fs::write(&path, "channel1,channel2\n1,2\n2,3\n20,3\n").unwrap();

        let table = load_pairs(&path).unwrap();
        assert_eq!(table.rows(), &[Pair::new(1, 2), Pair::new(2, 3), Pair::new(20, 3)]);
    }
}
