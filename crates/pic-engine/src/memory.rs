// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — In-Memory Particle Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Single-rank, in-memory implementation of the engine traits.
//!
//! Stores particles in fixed-capacity tiles per AMR level and keeps one
//! scrape container per (species, boundary). It never moves particles on
//! its own: scraping happens only through [`MemoryEngine::scrape_particles`].

use ndarray::{ArrayView1, ArrayViewMut1};
use tracing::{debug, info};

use pic_types::boundary::{num_boundaries, Boundary, Side};
use pic_types::config::{EngineConfig, SpeciesConfig};
use pic_types::error::{PicError, PicResult};
use pic_types::geometry::GeometryMode;

use crate::batch::ParticleBatch;
use crate::idcpu;
use crate::registry::{ComponentRegistry, RealComponent};
use crate::store::{Engine, ParticleStore, ScrapeBuffer, TileSource};
use crate::tile::{ParticleRecord, StructView, StructViewMut, TileSet};

macro_rules! delegate_tile_source {
    ($ty:ty, $field:ident) => {
        impl TileSource for $ty {
            fn num_levels(&self) -> usize {
                self.$field.num_levels()
            }

            fn num_real_comps(&self) -> usize {
                self.$field.num_real()
            }

            fn num_int_comps(&self) -> usize {
                self.$field.num_int()
            }

            fn total_number_of_particles(&self, _local: bool) -> usize {
                // Single rank: local and global counts coincide.
                self.$field.len()
            }

            fn struct_views(&self, level: usize) -> PicResult<Vec<StructView<'_>>> {
                self.$field.struct_views(level)
            }

            fn struct_views_mut(&mut self, level: usize) -> PicResult<Vec<StructViewMut<'_>>> {
                self.$field.struct_views_mut(level)
            }

            fn real_views(
                &self,
                comp: usize,
                level: usize,
            ) -> PicResult<Vec<ArrayView1<'_, f64>>> {
                self.$field.real_views(comp, level)
            }

            fn real_views_mut(
                &mut self,
                comp: usize,
                level: usize,
            ) -> PicResult<Vec<ArrayViewMut1<'_, f64>>> {
                self.$field.real_views_mut(comp, level)
            }

            fn int_views(
                &self,
                comp: usize,
                level: usize,
            ) -> PicResult<Vec<ArrayView1<'_, i32>>> {
                self.$field.int_views(comp, level)
            }

            fn int_views_mut(
                &mut self,
                comp: usize,
                level: usize,
            ) -> PicResult<Vec<ArrayViewMut1<'_, i32>>> {
                self.$field.int_views_mut(comp, level)
            }
        }
    };
}

/// Particle container of one species.
#[derive(Debug, Clone)]
pub struct MemorySpecies {
    name: String,
    registry: ComponentRegistry,
    tiles: TileSet,
    rank: u32,
    next_id: u64,
}

impl MemorySpecies {
    pub fn new(species: &SpeciesConfig, config: &EngineConfig) -> PicResult<Self> {
        let geometry = config.geometry;
        let mut registry = ComponentRegistry::new(geometry);
        for comp in &species.extra_real_comps {
            registry.register(comp, true)?;
        }
        let tiles = TileSet::new(
            geometry.num_axes(),
            registry.num_real(),
            species.extra_int_comps.len(),
            config.tile_capacity,
            config.levels,
        );
        Ok(MemorySpecies {
            name: species.name.clone(),
            registry,
            tiles,
            rank: config.rank,
            next_id: 1,
        })
    }

    pub fn geometry(&self) -> GeometryMode {
        self.registry.geometry()
    }

    fn record_from_batch(&self, batch: &ParticleBatch, i: usize, id: u64) -> ParticleRecord {
        let (x, y, z) = (batch.x[i], batch.y[i], batch.z[i]);
        let geometry = self.geometry();
        let pos = match geometry {
            GeometryMode::ThreeD => vec![x, y, z],
            GeometryMode::TwoD => vec![x, z],
            GeometryMode::Rz => vec![x.hypot(y), z],
            GeometryMode::OneD => vec![z],
        };

        let mut real = vec![0.0; self.registry.num_real()];
        real[self.registry.index(RealComponent::Weight)] = batch.attr[[i, 0]];
        real[self.registry.index(RealComponent::Ux)] = batch.ux[i];
        real[self.registry.index(RealComponent::Uy)] = batch.uy[i];
        real[self.registry.index(RealComponent::Uz)] = batch.uz[i];
        if geometry.has_azimuthal() {
            real[self.registry.index(RealComponent::Theta)] = y.atan2(x);
        }
        for k in 0..self.registry.runtime_components().len() {
            let comp = RealComponent::Runtime(k);
            real[self.registry.index(comp)] = batch.attr[[i, 1 + k]];
        }

        let mut int = vec![0; self.tiles.num_int()];
        for (k, slot) in int.iter_mut().enumerate().take(batch.nattr_int()) {
            *slot = batch.attr_int[[i, k]];
        }

        ParticleRecord {
            pos,
            idcpu: idcpu::pack(id, self.rank),
            real,
            int,
        }
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut TileSet {
        &mut self.tiles
    }
}

delegate_tile_source!(MemorySpecies, tiles);

impl ParticleStore for MemorySpecies {
    fn name(&self) -> &str {
        &self.name
    }

    fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    fn add_real_comp(&mut self, name: &str, communicate: bool) -> PicResult<usize> {
        let comp = self.registry.register(name, communicate)?;
        self.tiles.add_real_comp();
        let index = self.registry.index(comp);
        debug!(species = %self.name, comp = name, index, "registered real component");
        Ok(index)
    }

    fn add_n_particles(&mut self, level: usize, batch: &ParticleBatch) -> PicResult<()> {
        batch.validate()?;
        let expected = self.registry.num_attr_columns();
        if batch.nattr() != expected {
            return Err(PicError::ShapeMismatch {
                field: "attr columns".to_string(),
                len: batch.nattr(),
                expected,
            });
        }
        if batch.nattr_int() > self.tiles.num_int() {
            return Err(PicError::ShapeMismatch {
                field: "attr_int columns".to_string(),
                len: batch.nattr_int(),
                expected: self.tiles.num_int(),
            });
        }
        if level >= self.tiles.num_levels() {
            return Err(PicError::LevelOutOfRange {
                level,
                num_levels: self.tiles.num_levels(),
            });
        }
        let n = batch.len() as u64;
        if self.next_id.saturating_add(n) > idcpu::MAX_ID + 1 {
            return Err(PicError::UnsupportedOperation(format!(
                "particle id space exhausted for species {}",
                self.name
            )));
        }

        // A single rank owns the whole domain, so duplicated submissions are kept as-is.
        for i in 0..batch.len() {
            let record = self.record_from_batch(batch, i, self.next_id);
            self.tiles.push(level, &record)?;
            self.next_id += 1;
        }
        debug!(
            species = %self.name,
            level,
            count = batch.len(),
            unique = batch.unique_particles,
            "added particles"
        );
        Ok(())
    }
}

/// Scraped particles of one (species, boundary) pair. The last integer
/// component is the step at which the particle was scraped.
#[derive(Debug, Clone)]
pub struct ScrapedContainer {
    tiles: TileSet,
}

impl ScrapedContainer {
    pub fn step_scraped_comp(&self) -> usize {
        self.tiles.num_int() - 1
    }
}

delegate_tile_source!(ScrapedContainer, tiles);

#[derive(Debug, Clone)]
pub struct MemoryScrapeBuffer {
    geometry: GeometryMode,
    containers: Vec<(String, Vec<ScrapedContainer>)>,
}

impl MemoryScrapeBuffer {
    fn new(config: &EngineConfig, species: &[MemorySpecies]) -> Self {
        let nbound = num_boundaries(config.geometry);
        let containers: Vec<(String, Vec<ScrapedContainer>)> = species
            .iter()
            .map(|s| {
                let per_boundary: Vec<ScrapedContainer> = (0..nbound)
                    .map(|_| ScrapedContainer {
                        tiles: TileSet::new(
                            config.geometry.num_axes(),
                            s.num_real_comps(),
                            s.num_int_comps() + 1,
                            config.tile_capacity,
                            config.levels,
                        ),
                    })
                    .collect();
                (s.name.clone(), per_boundary)
            })
            .collect();
        MemoryScrapeBuffer {
            geometry: config.geometry,
            containers,
        }
    }

}

fn boundary_out_of_range(geometry: GeometryMode, boundary: usize) -> PicError {
    PicError::ConfigError(format!(
        "boundary index {boundary} out of range for {geometry} geometry (num_boundaries={})",
        num_boundaries(geometry)
    ))
}

impl ScrapeBuffer for MemoryScrapeBuffer {
    type Container = ScrapedContainer;

    fn num_particles_in_container(
        &self,
        species: &str,
        boundary: usize,
        local: bool,
    ) -> PicResult<usize> {
        Ok(self
            .container(species, boundary)?
            .total_number_of_particles(local))
    }

    fn container(&self, species: &str, boundary: usize) -> PicResult<&ScrapedContainer> {
        let (_, per_boundary) = self
            .containers
            .iter()
            .find(|(name, _)| name == species)
            .ok_or_else(|| PicError::UnknownSpecies(species.to_string()))?;
        per_boundary
            .get(boundary)
            .ok_or_else(|| boundary_out_of_range(self.geometry, boundary))
    }

    fn container_mut(
        &mut self,
        species: &str,
        boundary: usize,
    ) -> PicResult<&mut ScrapedContainer> {
        let geometry = self.geometry;
        let (_, per_boundary) = self
            .containers
            .iter_mut()
            .find(|(name, _)| name == species)
            .ok_or_else(|| PicError::UnknownSpecies(species.to_string()))?;
        per_boundary
            .get_mut(boundary)
            .ok_or_else(|| boundary_out_of_range(geometry, boundary))
    }

    fn clear_particles(&mut self) {
        for (_, per_boundary) in &mut self.containers {
            for container in per_boundary {
                container.tiles.clear();
            }
        }
        info!("cleared particle boundary buffer");
    }
}

#[derive(Debug, Clone)]
pub struct MemoryEngine {
    config: EngineConfig,
    species: Vec<MemorySpecies>,
    buffer: MemoryScrapeBuffer,
}

impl MemoryEngine {
    pub fn new(config: EngineConfig) -> PicResult<Self> {
        config.validate()?;
        let species = config
            .species
            .iter()
            .map(|s| MemorySpecies::new(s, &config))
            .collect::<PicResult<Vec<_>>>()?;
        let buffer = MemoryScrapeBuffer::new(&config, &species);
        info!(
            geometry = %config.geometry,
            species = species.len(),
            levels = config.levels,
            "created in-memory particle engine"
        );
        Ok(MemoryEngine {
            config,
            species,
            buffer,
        })
    }

    pub fn from_file(path: &str) -> PicResult<Self> {
        Self::new(EngineConfig::from_file(path)?)
    }

    /// Move every particle of `species` matching `pred` into the scrape
    /// container for `boundary`, stamping `step` as its scrape step.
    /// Returns the number of particles moved.
    pub fn scrape_particles<F>(
        &mut self,
        species: &str,
        boundary: usize,
        step: i32,
        mut pred: F,
    ) -> PicResult<usize>
    where
        F: FnMut(&ParticleRecord) -> bool,
    {
        let store = self
            .species
            .iter_mut()
            .find(|s| s.name == species)
            .ok_or_else(|| PicError::UnknownSpecies(species.to_string()))?;
        let num_real = store.num_real_comps();
        let container = self.buffer.container_mut(species, boundary)?;
        container.tiles.ensure_real_comps(num_real);

        let mut moved = 0usize;
        let tiles = store.tiles_mut();
        for level in 0..tiles.num_levels() {
            for tile in tiles.level_mut(level)?.iter_mut() {
                for mut record in tile.drain_where(&mut pred) {
                    record.int.push(step);
                    container.tiles.push(level, &record)?;
                    moved += 1;
                }
            }
        }
        info!(species, boundary, step, moved, "scraped particles");
        Ok(moved)
    }

    /// Scrape the particles of `species` lying beyond `position` along the
    /// axis of a domain boundary (below it for `lo`, above it for `hi`).
    pub fn scrape_beyond(
        &mut self,
        species: &str,
        boundary: Boundary,
        position: f64,
        step: i32,
    ) -> PicResult<usize> {
        let geometry = self.config.geometry;
        let index = boundary.index(geometry)?;
        let (slot, side) = match boundary {
            Boundary::Domain { axis, side } => match geometry.axis_index(axis) {
                Some(slot) => (slot, side),
                None => return Err(boundary_out_of_range(geometry, index)),
            },
            Boundary::Embedded => {
                return Err(PicError::UnsupportedOperation(
                    "embedded boundary has no position to scrape beyond".to_string(),
                ))
            }
        };
        self.scrape_particles(species, index, step, |p| match side {
            Side::Lo => p.pos[slot] < position,
            Side::Hi => p.pos[slot] > position,
        })
    }
}

impl Engine for MemoryEngine {
    type Store = MemorySpecies;
    type Buffer = MemoryScrapeBuffer;

    fn geometry(&self) -> GeometryMode {
        self.config.geometry
    }

    fn species_names(&self) -> Vec<&str> {
        self.species.iter().map(|s| s.name.as_str()).collect()
    }

    fn species(&self, name: &str) -> PicResult<&MemorySpecies> {
        self.species
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| PicError::UnknownSpecies(name.to_string()))
    }

    fn species_mut(&mut self, name: &str) -> PicResult<&mut MemorySpecies> {
        self.species
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| PicError::UnknownSpecies(name.to_string()))
    }

    fn boundary_buffer(&self) -> &MemoryScrapeBuffer {
        &self.buffer
    }

    fn boundary_buffer_mut(&mut self) -> &mut MemoryScrapeBuffer {
        &mut self.buffer
    }
}
