// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — Tile Write-Back
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Copy caller-owned per-tile data into engine views.
//!
//! Every tile is checked against its destination before anything is
//! written, so a shape mismatch leaves the engine untouched.

use ndarray::{ArrayView1, ArrayViewMut1};

use pic_engine::tile::StructViewMut;
use pic_types::error::{PicError, PicResult};

/// Replacement struct data for one tile.
#[derive(Debug, Clone)]
pub struct TileStructs<'a> {
    /// One array per position slot, in slot order.
    pub pos: Vec<ArrayView1<'a, f64>>,
    /// `None` keeps the stored idcpu words.
    pub idcpu: Option<ArrayView1<'a, u64>>,
}

/// Replacement values for one scraped component.
#[derive(Debug, Clone)]
pub enum TileValues<'a> {
    Real(Vec<ArrayView1<'a, f64>>),
    Int(Vec<ArrayView1<'a, i32>>),
}

fn check_len(field: impl Into<String>, len: usize, expected: usize) -> PicResult<()> {
    if len != expected {
        return Err(PicError::ShapeMismatch {
            field: field.into(),
            len,
            expected,
        });
    }
    Ok(())
}

pub fn copy_tiles<T: Clone>(
    field: &str,
    dst: &mut [ArrayViewMut1<'_, T>],
    src: &[ArrayView1<'_, T>],
) -> PicResult<()> {
    check_len(format!("{field} tiles"), src.len(), dst.len())?;
    for (i, (tile, values)) in dst.iter().zip(src).enumerate() {
        check_len(format!("{field}[{i}]"), values.len(), tile.len())?;
    }
    for (tile, values) in dst.iter_mut().zip(src) {
        tile.assign(values);
    }
    Ok(())
}

pub fn write_structs(dst: &mut [StructViewMut<'_>], src: &[TileStructs<'_>]) -> PicResult<()> {
    check_len("struct tiles", src.len(), dst.len())?;
    for (i, (tile, values)) in dst.iter().zip(src).enumerate() {
        check_len(format!("pos slots[{i}]"), values.pos.len(), tile.pos.len())?;
        for (k, slot) in values.pos.iter().enumerate() {
            check_len(format!("pos[{i}][{k}]"), slot.len(), tile.len())?;
        }
        if let Some(idcpu) = &values.idcpu {
            check_len(format!("idcpu[{i}]"), idcpu.len(), tile.len())?;
        }
    }
    for (tile, values) in dst.iter_mut().zip(src) {
        for (slot, new) in tile.pos.iter_mut().zip(&values.pos) {
            slot.assign(new);
        }
        if let Some(idcpu) = &values.idcpu {
            tile.idcpu.assign(idcpu);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn test_copy_tiles_overwrites_each_tile() {
        let mut a = array![1.0, 2.0];
        let mut b = array![3.0];
        {
            let mut dst = vec![a.view_mut(), b.view_mut()];
            let (na, nb) = (array![9.0, 8.0], array![7.0]);
            copy_tiles("w", &mut dst, &[na.view(), nb.view()]).unwrap();
        }
        assert_eq!(a.to_vec(), vec![9.0, 8.0]);
        assert_eq!(b.to_vec(), vec![7.0]);
    }

    #[test]
    fn test_copy_tiles_mismatch_writes_nothing() {
        let mut a = array![1, 2];
        let mut b = array![3];
        {
            let mut dst = vec![a.view_mut(), b.view_mut()];
            let (na, nb) = (array![5, 6], array![7, 8]);
            match copy_tiles("step", &mut dst, &[na.view(), nb.view()]) {
                Err(PicError::ShapeMismatch { field, len, expected }) => {
                    assert_eq!(field, "step[1]");
                    assert_eq!((len, expected), (2, 1));
                }
                other => panic!("Unexpected result: {other:?}"),
            }
            let one = [na.view()];
            assert!(matches!(
                copy_tiles("step", &mut dst, &one),
                Err(PicError::ShapeMismatch { .. })
            ));
        }
        assert_eq!(a.to_vec(), vec![1, 2]);
        assert_eq!(b.to_vec(), vec![3]);
    }

    #[test]
    fn test_write_structs_positions_and_optional_idcpu() {
        let mut x = array![0.0, 1.0];
        let mut z = array![2.0, 3.0];
        let mut ids: Array1<u64> = array![10, 11];
        {
            let mut dst = vec![StructViewMut {
                pos: vec![x.view_mut(), z.view_mut()],
                idcpu: ids.view_mut(),
            }];
            let (nx, nz) = (array![5.0, 6.0], array![7.0, 8.0]);
            let src = [TileStructs {
                pos: vec![nx.view(), nz.view()],
                idcpu: None,
            }];
            write_structs(&mut dst, &src).unwrap();

            let nids: Array1<u64> = array![20, 21];
            let src = [TileStructs {
                pos: vec![nx.view(), nz.view()],
                idcpu: Some(nids.view()),
            }];
            write_structs(&mut dst, &src).unwrap();
        }
        assert_eq!(x.to_vec(), vec![5.0, 6.0]);
        assert_eq!(z.to_vec(), vec![7.0, 8.0]);
        assert_eq!(ids.to_vec(), vec![20, 21]);
    }

    #[test]
    fn test_write_structs_rejects_wrong_slot_count() {
        let mut x = array![0.0];
        let mut ids: Array1<u64> = array![1];
        {
            let mut dst = vec![StructViewMut {
                pos: vec![x.view_mut()],
                idcpu: ids.view_mut(),
            }];
            let (a, b) = (array![4.0], array![5.0]);
            let src = [TileStructs {
                pos: vec![a.view(), b.view()],
                idcpu: None,
            }];
            match write_structs(&mut dst, &src) {
                Err(PicError::ShapeMismatch { field, .. }) => assert_eq!(field, "pos slots[0]"),
                other => panic!("Unexpected result: {other:?}"),
            }
        }
        assert_eq!(x.to_vec(), vec![0.0]);
    }
}
