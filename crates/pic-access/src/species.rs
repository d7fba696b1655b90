// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — Species Accessor
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Query and mutate the particles of one species.
//!
//! Per-tile results borrow the store. Stored quantities come back as
//! borrowed views; quantities derived from the stored ones (x and y in RZ,
//! r and theta in 3D) are computed into owned arrays.

use ndarray::{Array1, ArrayView1, ArrayViewMut1, CowArray, Ix1, Zip};
use tracing::debug;

use pic_engine::idcpu;
use pic_engine::store::{Engine, ParticleStore};
use pic_engine::tile::{StructView, StructViewMut};
use pic_types::error::{PicError, PicResult};
use pic_types::geometry::GeometryMode;

use crate::ingest::ParticleInput;
use crate::writeback::{self, TileStructs};

/// Per-tile coordinate arrays.
pub type TileArrays<'a> = Vec<CowArray<'a, f64, Ix1>>;

/// Fields that could be gathered at particle positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleField {
    Ex,
    Ey,
    Ez,
    Bx,
    By,
    Bz,
}

impl ParticleField {
    pub fn as_str(self) -> &'static str {
        match self {
            ParticleField::Ex => "ex",
            ParticleField::Ey => "ey",
            ParticleField::Ez => "ez",
            ParticleField::Bx => "bx",
            ParticleField::By => "by",
            ParticleField::Bz => "bz",
        }
    }
}

pub struct SpeciesAccessor<'s, S: ParticleStore> {
    store: &'s mut S,
    geometry: GeometryMode,
}

impl<'s, S: ParticleStore> SpeciesAccessor<'s, S> {
    /// Wrap `store`; `geometry` must be the layout the store was built for.
    pub fn new(store: &'s mut S, geometry: GeometryMode) -> PicResult<Self> {
        let store_geometry = store.registry().geometry();
        if store_geometry != geometry {
            return Err(PicError::ConfigError(format!(
                "species {} was built for {store_geometry} geometry, accessor requested {geometry}",
                store.name()
            )));
        }
        Ok(SpeciesAccessor { store, geometry })
    }

    pub fn name(&self) -> &str {
        self.store.name()
    }

    pub fn geometry(&self) -> GeometryMode {
        self.geometry
    }

    /// Broadcast `input` and insert it at level 0. Returns the number of particles added.
    pub fn add_particles(
        &mut self,
        input: &ParticleInput,
        unique_particles: bool,
    ) -> PicResult<usize> {
        let batch = input.to_batch(self.store.registry(), unique_particles)?;
        self.store.add_n_particles(0, &batch)?;
        debug!(species = self.store.name(), count = batch.len(), "add_particles");
        Ok(batch.len())
    }

    pub fn particle_count(&self, local: bool) -> usize {
        self.store.total_number_of_particles(local)
    }

    /// Register a new real component, returning its storage index.
    pub fn add_real_comp(&mut self, name: &str, communicate: bool) -> PicResult<usize> {
        self.store.add_real_comp(name, communicate)
    }

    pub fn comp_index(&self, name: &str) -> PicResult<usize> {
        self.store.comp_index(name)
    }

    /// Writable struct data (position slots and idcpu) of every tile at `level`.
    pub fn particle_structs(&mut self, level: usize) -> PicResult<Vec<StructViewMut<'_>>> {
        self.store.struct_views_mut(level)
    }

    /// Writable per-tile arrays of the named real component.
    pub fn particle_arrays(
        &mut self,
        comp: &str,
        level: usize,
    ) -> PicResult<Vec<ArrayViewMut1<'_, f64>>> {
        let idx = self.store.comp_index(comp)?;
        self.store.real_views_mut(idx, level)
    }

    /// Overwrite the named real component tile by tile.
    pub fn set_particle_arrays(
        &mut self,
        comp: &str,
        level: usize,
        values: &[ArrayView1<'_, f64>],
    ) -> PicResult<()> {
        let mut tiles = self.particle_arrays(comp, level)?;
        writeback::copy_tiles(comp, &mut tiles, values)
    }

    /// Overwrite position slots (and idcpu where given) tile by tile.
    pub fn set_particle_structs(
        &mut self,
        level: usize,
        values: &[TileStructs<'_>],
    ) -> PicResult<()> {
        let mut tiles = self.particle_structs(level)?;
        writeback::write_structs(&mut tiles, values)?;
        debug!(species = self.store.name(), level, tiles = values.len(), "wrote particle structs");
        Ok(())
    }

    /// Real component names in storage order.
    pub fn real_comp_names(&self) -> Vec<&str> {
        self.store.registry().names()
    }

    /// Read-only per-tile arrays of the named real component.
    pub fn component(&self, comp: &str, level: usize) -> PicResult<TileArrays<'_>> {
        let idx = self.store.comp_index(comp)?;
        Ok(self
            .store
            .real_views(idx, level)?
            .into_iter()
            .map(CowArray::from)
            .collect())
    }

    pub fn particle_ids(&self, level: usize) -> PicResult<Vec<Array1<u64>>> {
        Ok(self
            .structs(level)?
            .iter()
            .map(|s| idcpu::unpack_ids(s.idcpu))
            .collect())
    }

    pub fn particle_cpus(&self, level: usize) -> PicResult<Vec<Array1<u32>>> {
        Ok(self
            .structs(level)?
            .iter()
            .map(|s| idcpu::unpack_cpus(s.idcpu))
            .collect())
    }

    pub fn particle_x(&self, level: usize) -> PicResult<TileArrays<'_>> {
        match self.geometry {
            GeometryMode::ThreeD | GeometryMode::TwoD => self.slot(0, level),
            GeometryMode::Rz => self.rz_projected(level, f64::cos),
            GeometryMode::OneD => Err(no_coordinate("x", self.geometry)),
        }
    }

    pub fn particle_y(&self, level: usize) -> PicResult<TileArrays<'_>> {
        match self.geometry {
            GeometryMode::ThreeD => self.slot(1, level),
            GeometryMode::Rz => self.rz_projected(level, f64::sin),
            GeometryMode::TwoD | GeometryMode::OneD => Err(no_coordinate("y", self.geometry)),
        }
    }

    pub fn particle_r(&self, level: usize) -> PicResult<TileArrays<'_>> {
        match self.geometry {
            GeometryMode::Rz => self.slot(0, level),
            GeometryMode::ThreeD => Ok(self
                .structs(level)?
                .iter()
                .map(|s| {
                    CowArray::from(
                        Zip::from(s.slot(0))
                            .and(s.slot(1))
                            .map_collect(|&x, &y| x.hypot(y)),
                    )
                })
                .collect()),
            GeometryMode::TwoD | GeometryMode::OneD => Err(no_coordinate("r", self.geometry)),
        }
    }

    pub fn particle_theta(&self, level: usize) -> PicResult<TileArrays<'_>> {
        match self.geometry {
            GeometryMode::Rz => self.component("theta", level),
            GeometryMode::ThreeD => Ok(self
                .structs(level)?
                .iter()
                .map(|s| {
                    CowArray::from(
                        Zip::from(s.slot(1))
                            .and(s.slot(0))
                            .map_collect(|&y, &x| y.atan2(x)),
                    )
                })
                .collect()),
            GeometryMode::TwoD | GeometryMode::OneD => {
                Err(no_coordinate("theta", self.geometry))
            }
        }
    }

    pub fn particle_z(&self, level: usize) -> PicResult<TileArrays<'_>> {
        match self.geometry {
            GeometryMode::ThreeD => self.slot(2, level),
            GeometryMode::Rz | GeometryMode::TwoD => self.slot(1, level),
            GeometryMode::OneD => self.slot(0, level),
        }
    }

    pub fn particle_weight(&mut self, level: usize) -> PicResult<Vec<ArrayViewMut1<'_, f64>>> {
        self.particle_arrays("w", level)
    }

    pub fn particle_ux(&mut self, level: usize) -> PicResult<Vec<ArrayViewMut1<'_, f64>>> {
        self.particle_arrays("ux", level)
    }

    pub fn particle_uy(&mut self, level: usize) -> PicResult<Vec<ArrayViewMut1<'_, f64>>> {
        self.particle_arrays("uy", level)
    }

    pub fn particle_uz(&mut self, level: usize) -> PicResult<Vec<ArrayViewMut1<'_, f64>>> {
        self.particle_arrays("uz", level)
    }

    pub fn species_charge_sum(&self, _local: bool) -> PicResult<f64> {
        Err(PicError::NotImplemented(format!(
            "species charge sum for {}",
            self.store.name()
        )))
    }

    pub fn particle_field(
        &self,
        field: ParticleField,
        _level: usize,
    ) -> PicResult<Vec<Array1<f64>>> {
        let kind = match field {
            ParticleField::Ex | ParticleField::Ey | ParticleField::Ez => "E",
            ParticleField::Bx | ParticleField::By | ParticleField::Bz => "B",
        };
        Err(PicError::NotImplemented(format!(
            "particle {kind} fields not supported ({})",
            field.as_str()
        )))
    }

    fn structs(&self, level: usize) -> PicResult<Vec<StructView<'_>>> {
        self.store.struct_views(level)
    }

    fn slot(&self, slot: usize, level: usize) -> PicResult<TileArrays<'_>> {
        Ok(self
            .structs(level)?
            .iter()
            .map(|s| CowArray::from(s.slot(slot)))
            .collect())
    }

    /// `r * f(theta)` per tile, for Cartesian projections in RZ.
    fn rz_projected(&self, level: usize, f: fn(f64) -> f64) -> PicResult<TileArrays<'_>> {
        let theta_idx = self.store.comp_index("theta")?;
        let thetas = self.store.real_views(theta_idx, level)?;
        Ok(self
            .structs(level)?
            .iter()
            .zip(thetas)
            .map(|(s, theta)| {
                CowArray::from(
                    Zip::from(s.slot(0))
                        .and(theta)
                        .map_collect(|&r, &t| r * f(t)),
                )
            })
            .collect())
    }
}

impl<'e, S: ParticleStore> SpeciesAccessor<'e, S> {
    /// Accessor for species `name` of `engine`, using the engine's geometry.
    pub fn from_engine<E>(engine: &'e mut E, name: &str) -> PicResult<Self>
    where
        E: Engine<Store = S>,
    {
        let geometry = engine.geometry();
        SpeciesAccessor::new(engine.species_mut(name)?, geometry)
    }
}

fn no_coordinate(coord: &str, geometry: GeometryMode) -> PicError {
    PicError::UnsupportedOperation(format!(
        "get_particle_{coord}: there is no {coord} coordinate in {geometry} geometry"
    ))
}
