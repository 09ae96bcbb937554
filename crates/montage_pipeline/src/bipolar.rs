//! Bipolar montage coordinate derivation.
//!
//! A bipolar channel is plotted at the midpoint of its two source electrodes.
//! Sources are resolved with a two-tier rule: indices up to
//! `max_direct_index` address the unipolar cap, larger indices address rows
//! of the bipolar set being built (`max_direct_index + j` is row `j`), which
//! lets a montage chain derivations off earlier derived channels.

use montage_types::{
    BipolarSet, ElectrodePosition, ElectrodeSet, MontageError, MontageResult, PairingTable,
    UnipolarSet,
};
use tracing::debug;

/// Derives one position per pairing-table row as the mean of its two sources.
///
/// Rows are processed in ascending order. A chained reference must point at a
/// row strictly before the current one, otherwise the row fails with
/// `UnresolvedReference`.
pub fn derive(
    unipolar: &UnipolarSet,
    pairs: &PairingTable,
    max_direct_index: u32,
) -> MontageResult<BipolarSet> {
    if pairs.is_empty() {
        return Err(MontageError::EmptyPairingTable);
    }
    if unipolar.len() < max_direct_index as usize {
        return Err(MontageError::InsufficientElectrodes {
            required: max_direct_index as usize,
            available: unipolar.len(),
        });
    }

    let mut derived: Vec<ElectrodePosition> = Vec::with_capacity(pairs.len());
    let mut chained = 0usize;

    for (i, pair) in pairs.rows().iter().enumerate() {
        let row = i + 1;
        let a = resolve(unipolar, &derived, pairs.len(), max_direct_index, row, pair.channel1)?;
        let b = resolve(unipolar, &derived, pairs.len(), max_direct_index, row, pair.channel2)?;
        if pair.channel1 > max_direct_index || pair.channel2 > max_direct_index {
            chained += 1;
        }

        let mid = a.point().midpoint(&b.point());
        let label = match (&a.label, &b.label) {
            (Some(l1), Some(l2)) => Some(format!("{}-{}", l1, l2)),
            _ => None,
        };
        derived.push(ElectrodePosition {
            index: row as u32,
            x: mid.x,
            y: mid.y,
            z: mid.z,
            label,
        });
    }

    debug!(
        rows = derived.len(),
        chained, "Derived bipolar positions"
    );
    ElectrodeSet::new(unipolar.unit(), derived)
}

/// Resolves one referenced index for the row `row` (1-based).
fn resolve<'a>(
    unipolar: &'a UnipolarSet,
    derived: &'a [ElectrodePosition],
    total_rows: usize,
    max_direct_index: u32,
    row: usize,
    index: u32,
) -> MontageResult<&'a ElectrodePosition> {
    if index == 0 {
        return Err(MontageError::IndexOutOfRange { row, index });
    }
    if index <= max_direct_index {
        return unipolar
            .get(index)
            .ok_or(MontageError::IndexOutOfRange { row, index });
    }

    let j = (index - max_direct_index) as usize;
    if j > total_rows {
        return Err(MontageError::IndexOutOfRange { row, index });
    }
    if j >= row {
        return Err(MontageError::UnresolvedReference { row, index });
    }
    Ok(&derived[j - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use montage_types::Unit;

    fn cap(points: &[(f64, f64, f64)]) -> UnipolarSet {
        let positions = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y, z))| ElectrodePosition::new(i as u32 + 1, x, y, z))
            .collect();
        ElectrodeSet::new(Unit::Millimeters, positions).unwrap()
    }

    #[test]
    fn test_midpoint_of_two_electrodes() {
        let u = cap(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)]);
        let out = derive(&u, &PairingTable::from(vec![(1, 2)]), 2).unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out.positions()[0], ElectrodePosition::new(1, 0.5, 0.0, 0.0));
    }

    #[test]
    fn test_output_follows_pairing_order() {
        let u = cap(&[(2.0, 4.0, 6.0), (-2.0, 0.0, 1.0), (10.0, -10.0, 3.5)]);
        let pairs = PairingTable::from(vec![(3, 1), (1, 2), (2, 3), (3, 2)]);
        let out = derive(&u, &pairs, 3).unwrap();

        assert_eq!(out.len(), pairs.len());
        for (i, (pair, pos)) in pairs.rows().iter().zip(out.positions()).enumerate() {
            let a = u.get(pair.channel1).unwrap();
            let b = u.get(pair.channel2).unwrap();
            assert_eq!(pos.index, i as u32 + 1);
            assert_eq!(pos.x, (a.x + b.x) / 2.0);
            assert_eq!(pos.y, (a.y + b.y) / 2.0);
            assert_eq!(pos.z, (a.z + b.z) / 2.0);
        }
    }

    #[test]
    fn test_chained_reference_uses_earlier_row() {
        let u = cap(&[(0.0, 0.0, 0.0), (4.0, 0.0, 0.0), (0.0, 8.0, 0.0)]);
        // Row 3 averages derived row 1 (index 4) with electrode 3.
        let pairs = PairingTable::from(vec![(1, 2), (2, 3), (4, 3)]);
        let out = derive(&u, &pairs, 3).unwrap();

        assert_eq!(out.positions()[0].point().to_array(), [2.0, 0.0, 0.0]);
        assert_eq!(out.positions()[2].point().to_array(), [1.0, 4.0, 0.0]);
    }

    #[test]
    fn test_self_reference_is_unresolved() {
        let u = cap(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)]);
        let err = derive(&u, &PairingTable::from(vec![(3, 1)]), 2).unwrap_err();
        assert_eq!(err, MontageError::UnresolvedReference { row: 1, index: 3 });
    }

    #[test]
    fn test_forward_reference_is_unresolved() {
        let u = cap(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)]);
        let pairs = PairingTable::from(vec![(1, 2), (4, 1), (1, 2)]);
        let err = derive(&u, &pairs, 2).unwrap_err();
        assert_eq!(err, MontageError::UnresolvedReference { row: 2, index: 4 });
    }

    #[test]
    fn test_index_out_of_range() {
        let u = cap(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)]);

        let err = derive(&u, &PairingTable::from(vec![(0, 1)]), 2).unwrap_err();
        assert_eq!(err, MontageError::IndexOutOfRange { row: 1, index: 0 });

        // Beyond both the cap and the derived set.
        let err = derive(&u, &PairingTable::from(vec![(1, 2), (1, 9)]), 2).unwrap_err();
        assert_eq!(err, MontageError::IndexOutOfRange { row: 2, index: 9 });
    }

    #[test]
    fn test_input_validation() {
        let u = cap(&[(0.0, 0.0, 0.0)]);
        assert_eq!(
            derive(&u, &PairingTable::default(), 1).unwrap_err(),
            MontageError::EmptyPairingTable
        );
        assert_eq!(
            derive(&u, &PairingTable::from(vec![(1, 1)]), 2).unwrap_err(),
            MontageError::InsufficientElectrodes { required: 2, available: 1 }
        );
    }

    #[test]
    fn test_labels_are_joined() {
        let u = ElectrodeSet::new(
            Unit::Millimeters,
            vec![
                ElectrodePosition::new(1, 0.0, 0.0, 0.0).with_label("Fp1"),
                ElectrodePosition::new(2, 1.0, 0.0, 0.0).with_label("F3"),
                ElectrodePosition::new(3, 2.0, 0.0, 0.0),
            ],
        )
        .unwrap();
        let out = derive(&u, &PairingTable::from(vec![(1, 2), (2, 3)]), 3).unwrap();

        assert_eq!(out.positions()[0].label.as_deref(), Some("Fp1-F3"));
        assert_eq!(out.positions()[1].label, None);
    }

    #[test]
    fn test_inputs_are_untouched() {
        let u = cap(&[(0.0, 0.0, 0.0), (1.0, 1.0, 1.0)]);
        let before = u.clone();
        let _ = derive(&u, &PairingTable::from(vec![(1, 2)]), 2).unwrap();
        assert_eq!(u, before);
    }
}
