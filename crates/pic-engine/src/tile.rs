// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — Particle Tiles
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Tile storage and the borrowed views handed out to accessors.
//!
//! A tile is structure-of-arrays: one position slot per geometry axis, the
//! packed `idcpu` word, and real/integer component columns. Views borrow
//! the tile directly; nothing is copied.

use ndarray::{ArrayView1, ArrayViewMut1};

use pic_types::error::{PicError, PicResult};

/// Read-only struct data of one tile: position slots and idcpu.
#[derive(Debug, Clone)]
pub struct StructView<'a> {
    pub pos: Vec<ArrayView1<'a, f64>>,
    pub idcpu: ArrayView1<'a, u64>,
}

impl<'a> StructView<'a> {
    pub fn len(&self) -> usize {
        self.idcpu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idcpu.is_empty()
    }

    pub fn slot(&self, i: usize) -> ArrayView1<'a, f64> {
        self.pos[i]
    }
}

/// Writable struct data of one tile.
#[derive(Debug)]
pub struct StructViewMut<'a> {
    pub pos: Vec<ArrayViewMut1<'a, f64>>,
    pub idcpu: ArrayViewMut1<'a, u64>,
}

impl StructViewMut<'_> {
    pub fn len(&self) -> usize {
        self.idcpu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idcpu.is_empty()
    }
}

/// One particle's worth of data, used when moving particles between containers.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleRecord {
    pub pos: Vec<f64>,
    pub idcpu: u64,
    pub real: Vec<f64>,
    pub int: Vec<i32>,
}

#[derive(Debug, Clone)]
pub struct ParticleTile {
    pos: Vec<Vec<f64>>,
    idcpu: Vec<u64>,
    real: Vec<Vec<f64>>,
    int: Vec<Vec<i32>>,
}

impl ParticleTile {
    pub fn new(num_pos: usize, num_real: usize, num_int: usize) -> Self {
        ParticleTile {
            pos: vec![Vec::new(); num_pos],
            idcpu: Vec::new(),
            real: vec![Vec::new(); num_real],
            int: vec![Vec::new(); num_int],
        }
    }

    pub fn len(&self) -> usize {
        self.idcpu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idcpu.is_empty()
    }

    pub fn num_real(&self) -> usize {
        self.real.len()
    }

    pub fn num_int(&self) -> usize {
        self.int.len()
    }

    /// Append one particle. Missing trailing components are zero-filled.
    pub fn push(&mut self, record: &ParticleRecord) {
        for (slot, value) in self.pos.iter_mut().zip(&record.pos) {
            slot.push(*value);
        }
        self.idcpu.push(record.idcpu);
        for (k, column) in self.real.iter_mut().enumerate() {
            column.push(record.real.get(k).copied().unwrap_or(0.0));
        }
        for (k, column) in self.int.iter_mut().enumerate() {
            column.push(record.int.get(k).copied().unwrap_or(0));
        }
    }

    pub fn record(&self, i: usize) -> ParticleRecord {
        ParticleRecord {
            pos: self.pos.iter().map(|slot| slot[i]).collect(),
            idcpu: self.idcpu[i],
            real: self.real.iter().map(|c| c[i]).collect(),
            int: self.int.iter().map(|c| c[i]).collect(),
        }
    }

    /// Remove particles matching `pred`, returning them in tile order.
    pub fn drain_where<F>(&mut self, mut pred: F) -> Vec<ParticleRecord>
    where
        F: FnMut(&ParticleRecord) -> bool,
    {
        let mut removed = Vec::new();
        let mut kept = ParticleTile::new(self.pos.len(), self.real.len(), self.int.len());
        for i in 0..self.len() {
            let record = self.record(i);
            if pred(&record) {
                removed.push(record);
            } else {
                kept.push(&record);
            }
        }
        *self = kept;
        removed
    }

    pub fn add_real_comp(&mut self) {
        self.real.push(vec![0.0; self.len()]);
    }

    pub fn clear(&mut self) {
        for slot in &mut self.pos {
            slot.clear();
        }
        self.idcpu.clear();
        for column in &mut self.real {
            column.clear();
        }
        for column in &mut self.int {
            column.clear();
        }
    }

    pub fn struct_view(&self) -> StructView<'_> {
        StructView {
            pos: self
                .pos
                .iter()
                .map(|slot| ArrayView1::from(slot.as_slice()))
                .collect(),
            idcpu: ArrayView1::from(self.idcpu.as_slice()),
        }
    }

    pub fn struct_view_mut(&mut self) -> StructViewMut<'_> {
        StructViewMut {
            pos: self
                .pos
                .iter_mut()
                .map(|slot| ArrayViewMut1::from(slot.as_mut_slice()))
                .collect(),
            idcpu: ArrayViewMut1::from(self.idcpu.as_mut_slice()),
        }
    }

    pub fn real_view(&self, comp: usize) -> PicResult<ArrayView1<'_, f64>> {
        let column = self.real.get(comp).ok_or_else(|| real_out_of_range(comp, self.real.len()))?;
        Ok(ArrayView1::from(column.as_slice()))
    }

    pub fn real_view_mut(&mut self, comp: usize) -> PicResult<ArrayViewMut1<'_, f64>> {
        let n = self.real.len();
        let column = self.real.get_mut(comp).ok_or_else(|| real_out_of_range(comp, n))?;
        Ok(ArrayViewMut1::from(column.as_mut_slice()))
    }

    pub fn int_view(&self, comp: usize) -> PicResult<ArrayView1<'_, i32>> {
        let column = self.int.get(comp).ok_or_else(|| int_out_of_range(comp, self.int.len()))?;
        Ok(ArrayView1::from(column.as_slice()))
    }

    pub fn int_view_mut(&mut self, comp: usize) -> PicResult<ArrayViewMut1<'_, i32>> {
        let n = self.int.len();
        let column = self.int.get_mut(comp).ok_or_else(|| int_out_of_range(comp, n))?;
        Ok(ArrayViewMut1::from(column.as_mut_slice()))
    }
}

fn real_out_of_range(comp: usize, num_real: usize) -> PicError {
    PicError::UnknownComponent(format!("real component {comp} (num_real_comps={num_real})"))
}

fn int_out_of_range(comp: usize, num_int: usize) -> PicError {
    PicError::UnknownComponent(format!("int component {comp} (num_int_comps={num_int})"))
}

/// Per-level list of tiles sharing one component layout.
#[derive(Debug, Clone)]
pub struct TileSet {
    num_pos: usize,
    num_real: usize,
    num_int: usize,
    tile_capacity: usize,
    levels: Vec<Vec<ParticleTile>>,
}

impl TileSet {
    pub fn new(
        num_pos: usize,
        num_real: usize,
        num_int: usize,
        tile_capacity: usize,
        num_levels: usize,
    ) -> Self {
        TileSet {
            num_pos,
            num_real,
            num_int,
            tile_capacity: tile_capacity.max(1),
            levels: vec![Vec::new(); num_levels],
        }
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn num_real(&self) -> usize {
        self.num_real
    }

    pub fn num_int(&self) -> usize {
        self.num_int
    }

    pub fn len(&self) -> usize {
        self.levels.iter().flatten().map(ParticleTile::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn level(&self, level: usize) -> PicResult<&[ParticleTile]> {
        self.levels
            .get(level)
            .map(Vec::as_slice)
            .ok_or(PicError::LevelOutOfRange {
                level,
                num_levels: self.levels.len(),
            })
    }

    pub fn level_mut(&mut self, level: usize) -> PicResult<&mut [ParticleTile]> {
        let num_levels = self.levels.len();
        self.levels
            .get_mut(level)
            .map(Vec::as_mut_slice)
            .ok_or(PicError::LevelOutOfRange { level, num_levels })
    }

    /// Append a particle to the last tile of `level`, opening a new tile when it is full.
    pub fn push(&mut self, level: usize, record: &ParticleRecord) -> PicResult<()> {
        let num_levels = self.levels.len();
        let (num_pos, num_real, num_int, capacity) =
            (self.num_pos, self.num_real, self.num_int, self.tile_capacity);
        let tiles = self
            .levels
            .get_mut(level)
            .ok_or(PicError::LevelOutOfRange { level, num_levels })?;
        if tiles.last().map_or(true, |t| t.len() >= capacity) {
            tiles.push(ParticleTile::new(num_pos, num_real, num_int));
        }
        if let Some(tile) = tiles.last_mut() {
            tile.push(record);
        }
        Ok(())
    }

    pub fn add_real_comp(&mut self) {
        self.num_real += 1;
        for tile in self.levels.iter_mut().flatten() {
            tile.add_real_comp();
        }
    }

    /// Grow the real layout to at least `num_real` components.
    pub fn ensure_real_comps(&mut self, num_real: usize) {
        while self.num_real < num_real {
            self.add_real_comp();
        }
    }

    /// Drop all particles, keeping the component layout.
    pub fn clear(&mut self) {
        for tiles in &mut self.levels {
            tiles.clear();
        }
    }

    pub fn struct_views(&self, level: usize) -> PicResult<Vec<StructView<'_>>> {
        Ok(self.level(level)?.iter().map(ParticleTile::struct_view).collect())
    }

    pub fn struct_views_mut(&mut self, level: usize) -> PicResult<Vec<StructViewMut<'_>>> {
        Ok(self
            .level_mut(level)?
            .iter_mut()
            .map(ParticleTile::struct_view_mut)
            .collect())
    }

    pub fn real_views(&self, comp: usize, level: usize) -> PicResult<Vec<ArrayView1<'_, f64>>> {
        if comp >= self.num_real {
            return Err(real_out_of_range(comp, self.num_real));
        }
        self.level(level)?.iter().map(|t| t.real_view(comp)).collect()
    }

    pub fn real_views_mut(
        &mut self,
        comp: usize,
        level: usize,
    ) -> PicResult<Vec<ArrayViewMut1<'_, f64>>> {
        if comp >= self.num_real {
            return Err(real_out_of_range(comp, self.num_real));
        }
        self.level_mut(level)?
            .iter_mut()
            .map(|t| t.real_view_mut(comp))
            .collect()
    }

    pub fn int_views(&self, comp: usize, level: usize) -> PicResult<Vec<ArrayView1<'_, i32>>> {
        if comp >= self.num_int {
            return Err(int_out_of_range(comp, self.num_int));
        }
        self.level(level)?.iter().map(|t| t.int_view(comp)).collect()
    }

    pub fn int_views_mut(
        &mut self,
        comp: usize,
        level: usize,
    ) -> PicResult<Vec<ArrayViewMut1<'_, i32>>> {
        if comp >= self.num_int {
            return Err(int_out_of_range(comp, self.num_int));
        }
        self.level_mut(level)?
            .iter_mut()
            .map(|t| t.int_view_mut(comp))
            .collect()
    }
}
