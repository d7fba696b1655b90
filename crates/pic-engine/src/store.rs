// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — Engine Traits
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The particle engine as seen by the accessor layer.
//!
//! Every view returned here borrows engine-owned memory; its lifetime is
//! tied to the borrow of the store that produced it.

use ndarray::{ArrayView1, ArrayViewMut1};

use pic_types::error::PicResult;
use pic_types::geometry::GeometryMode;

use crate::batch::ParticleBatch;
use crate::registry::ComponentRegistry;
use crate::tile::{StructView, StructViewMut};

/// Per-level, per-tile access to particle data.
pub trait TileSource {
    fn num_levels(&self) -> usize;
    fn num_real_comps(&self) -> usize;
    fn num_int_comps(&self) -> usize;

    /// Particle count; `local` restricts it to this rank.
    fn total_number_of_particles(&self, local: bool) -> usize;

    fn struct_views(&self, level: usize) -> PicResult<Vec<StructView<'_>>>;
    fn struct_views_mut(&mut self, level: usize) -> PicResult<Vec<StructViewMut<'_>>>;
    fn real_views(&self, comp: usize, level: usize) -> PicResult<Vec<ArrayView1<'_, f64>>>;
    fn real_views_mut(
        &mut self,
        comp: usize,
        level: usize,
    ) -> PicResult<Vec<ArrayViewMut1<'_, f64>>>;
    fn int_views(&self, comp: usize, level: usize) -> PicResult<Vec<ArrayView1<'_, i32>>>;
    fn int_views_mut(
        &mut self,
        comp: usize,
        level: usize,
    ) -> PicResult<Vec<ArrayViewMut1<'_, i32>>>;
}

/// Particle container of one species.
pub trait ParticleStore: TileSource {
    fn name(&self) -> &str;
    fn registry(&self) -> &ComponentRegistry;

    fn comp_index(&self, name: &str) -> PicResult<usize> {
        self.registry().index_of(name)
    }

    /// Register a runtime real component, returning its storage index.
    fn add_real_comp(&mut self, name: &str, communicate: bool) -> PicResult<usize>;

    /// Insert a broadcast batch at `level`.
    fn add_n_particles(&mut self, level: usize, batch: &ParticleBatch) -> PicResult<()>;
}

/// Particles scraped at domain/embedded boundaries, keyed by species and boundary index.
pub trait ScrapeBuffer {
    type Container: TileSource;

    fn num_particles_in_container(
        &self,
        species: &str,
        boundary: usize,
        local: bool,
    ) -> PicResult<usize>;
    fn container(&self, species: &str, boundary: usize) -> PicResult<&Self::Container>;
    fn container_mut(&mut self, species: &str, boundary: usize)
        -> PicResult<&mut Self::Container>;
    fn clear_particles(&mut self);
}

pub trait Engine {
    type Store: ParticleStore;
    type Buffer: ScrapeBuffer;

    fn geometry(&self) -> GeometryMode;
    fn species_names(&self) -> Vec<&str>;
    fn species(&self, name: &str) -> PicResult<&Self::Store>;
    fn species_mut(&mut self, name: &str) -> PicResult<&mut Self::Store>;
    fn boundary_buffer(&self) -> &Self::Buffer;
    fn boundary_buffer_mut(&mut self) -> &mut Self::Buffer;
}
