// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — Boundary Buffer Accessor
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Read, overwrite and clear particles scraped at domain and embedded
//! boundaries.
//!
//! Boundaries are addressed by token (`"x_lo"`, `"z_hi"`, `"eb"`); the
//! accessor translates tokens to engine indices and forwards every call.

use ndarray::ArrayViewMut1;
use tracing::debug;

use pic_engine::store::{Engine, ParticleStore, ScrapeBuffer, TileSource};
use pic_engine::tile::StructViewMut;
use pic_types::boundary;
use pic_types::error::{PicError, PicResult};
use pic_types::geometry::GeometryMode;

use crate::writeback::{self, TileStructs, TileValues};

/// Name of the integer component holding the step a particle was scraped at.
pub const STEP_SCRAPED: &str = "step_scraped";

/// Per-tile arrays of one scraped component.
#[derive(Debug)]
pub enum ScrapedArrays<'a> {
    Real(Vec<ArrayViewMut1<'a, f64>>),
    Int(Vec<ArrayViewMut1<'a, i32>>),
}

impl ScrapedArrays<'_> {
    /// Number of tiles.
    pub fn len(&self) -> usize {
        match self {
            ScrapedArrays::Real(tiles) => tiles.len(),
            ScrapedArrays::Int(tiles) => tiles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            ScrapedArrays::Real(tiles) => tiles.iter().flat_map(|t| t.iter().copied()).collect(),
            ScrapedArrays::Int(tiles) => tiles
                .iter()
                .flat_map(|t| t.iter().map(|&v| f64::from(v)))
                .collect(),
        }
    }
}

pub struct BoundaryBufferAccessor<'e, E: Engine> {
    engine: &'e mut E,
    geometry: GeometryMode,
}

impl<'e, E: Engine> BoundaryBufferAccessor<'e, E> {
    pub fn new(engine: &'e mut E, geometry: GeometryMode) -> PicResult<Self> {
        if engine.geometry() != geometry {
            return Err(PicError::ConfigError(format!(
                "engine runs in {} geometry, accessor requested {geometry}",
                engine.geometry()
            )));
        }
        Ok(BoundaryBufferAccessor { engine, geometry })
    }

    pub fn geometry(&self) -> GeometryMode {
        self.geometry
    }

    pub fn boundary_index(&self, boundary: &str) -> PicResult<usize> {
        boundary::boundary_index(boundary, self.geometry)
    }

    pub fn buffer_size(&self, species: &str, boundary: &str, local: bool) -> PicResult<usize> {
        let index = self.boundary_index(boundary)?;
        self.engine
            .boundary_buffer()
            .num_particles_in_container(species, index, local)
    }

    /// Struct data of the non-empty scraped tiles at `level`.
    pub fn buffer_structs(
        &mut self,
        species: &str,
        boundary: &str,
        level: usize,
    ) -> PicResult<Vec<StructViewMut<'_>>> {
        let index = self.boundary_index(boundary)?;
        let container = self
            .engine
            .boundary_buffer_mut()
            .container_mut(species, index)?;
        Ok(container
            .struct_views_mut(level)?
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect())
    }

    /// Per-tile arrays of `comp` for scraped particles.
    ///
    /// [`STEP_SCRAPED`] maps to the container's last integer component; any
    /// other name is looked up in the species' current real-component schema.
    pub fn buffer_component(
        &mut self,
        species: &str,
        boundary: &str,
        comp: &str,
        level: usize,
    ) -> PicResult<ScrapedArrays<'_>> {
        let index = self.boundary_index(boundary)?;
        if comp == STEP_SCRAPED {
            return self
                .buffer_step_scraped_at(species, index, level)
                .map(ScrapedArrays::Int);
        }
        let real = self.engine.species(species)?.comp_index(comp)?;
        let container = self
            .engine
            .boundary_buffer_mut()
            .container_mut(species, index)?;
        if real >= container.num_real_comps() {
            // Registered after the last scrape; nothing stored for it yet.
            debug!(species, comp, "component not present in scraped container");
            return Ok(ScrapedArrays::Real(Vec::new()));
        }
        Ok(ScrapedArrays::Real(container.real_views_mut(real, level)?))
    }

    pub fn buffer_step_scraped(
        &mut self,
        species: &str,
        boundary: &str,
        level: usize,
    ) -> PicResult<Vec<ArrayViewMut1<'_, i32>>> {
        let index = self.boundary_index(boundary)?;
        self.buffer_step_scraped_at(species, index, level)
    }

    /// Overwrite position slots (and idcpu where given) of the non-empty
    /// scraped tiles, in the order [`Self::buffer_structs`] returns them.
    pub fn set_buffer_structs(
        &mut self,
        species: &str,
        boundary: &str,
        level: usize,
        values: &[TileStructs<'_>],
    ) -> PicResult<()> {
        let mut tiles = self.buffer_structs(species, boundary, level)?;
        writeback::write_structs(&mut tiles, values)
    }

    /// Overwrite a scraped component tile by tile. `values` must be
    /// [`TileValues::Int`] for [`STEP_SCRAPED`] and real otherwise.
    pub fn set_buffer_component(
        &mut self,
        species: &str,
        boundary: &str,
        comp: &str,
        level: usize,
        values: &TileValues<'_>,
    ) -> PicResult<()> {
        match (self.buffer_component(species, boundary, comp, level)?, values) {
            (ScrapedArrays::Real(mut tiles), TileValues::Real(src)) => {
                writeback::copy_tiles(comp, &mut tiles, src)
            }
            (ScrapedArrays::Int(mut tiles), TileValues::Int(src)) => {
                writeback::copy_tiles(comp, &mut tiles, src)
            }
            (ScrapedArrays::Real(_), TileValues::Int(_)) => Err(PicError::ConfigError(format!(
                "{comp} holds real values, got integer tiles"
            ))),
            (ScrapedArrays::Int(_), TileValues::Real(_)) => Err(PicError::ConfigError(format!(
                "{comp} holds integer values, got real tiles"
            ))),
        }
    }

    /// Drop every scraped particle of every species.
    pub fn clear(&mut self) {
        self.engine.boundary_buffer_mut().clear_particles();
    }

    fn buffer_step_scraped_at(
        &mut self,
        species: &str,
        index: usize,
        level: usize,
    ) -> PicResult<Vec<ArrayViewMut1<'_, i32>>> {
        let container = self
            .engine
            .boundary_buffer_mut()
            .container_mut(species, index)?;
        let step = container
            .num_int_comps()
            .checked_sub(1)
            .ok_or_else(|| PicError::UnknownComponent(STEP_SCRAPED.to_string()))?;
        container.int_views_mut(step, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ParticleInput;
    use crate::species::SpeciesAccessor;
    use pic_engine::memory::MemoryEngine;
    use pic_types::config::{EngineConfig, SpeciesConfig};

    fn scraped_engine(geometry: GeometryMode) -> MemoryEngine {
        let mut config = EngineConfig::new(
            geometry,
            vec![
                SpeciesConfig::new("electrons").with_real_comps(["orig_z"]),
                SpeciesConfig::new("ions"),
            ],
        );
        config.tile_capacity = 2;
        let mut eng = MemoryEngine::new(config).unwrap();
        let input = ParticleInput::new()
            .z(vec![-1.0, 0.5, 2.0, 3.0])
            .w(1.0)
            .attr("orig_z", vec![-1.0, 0.5, 2.0, 3.0]);
        SpeciesAccessor::from_engine(&mut eng, "electrons")
            .unwrap()
            .add_particles(&input, true)
            .unwrap();
        eng
    }

    #[test]
    fn test_size_and_step_scraped() {
        let mut eng = scraped_engine(GeometryMode::ThreeD);
        let z_hi = boundary::boundary_index("z_hi", GeometryMode::ThreeD).unwrap();
        eng.scrape_particles("electrons", z_hi, 17, |r| r.pos[2] > 1.0)
            .unwrap();

        let mut acc = BoundaryBufferAccessor::new(&mut eng, GeometryMode::ThreeD).unwrap();
        assert_eq!(acc.buffer_size("electrons", "z_hi", false).unwrap(), 2);
        assert_eq!(acc.buffer_size("electrons", "z_lo", true).unwrap(), 0);
        assert_eq!(acc.buffer_size("ions", "z_hi", false).unwrap(), 0);

        let step = acc
            .buffer_component("electrons", "z_hi", STEP_SCRAPED, 0)
            .unwrap();
        assert_eq!(step.to_f64_vec(), vec![17.0, 17.0]);
        let orig = acc.buffer_component("electrons", "z_hi", "orig_z", 0).unwrap();
        assert!(matches!(orig, ScrapedArrays::Real(_)));
        assert_eq!(orig.to_f64_vec(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_buffer_write_back() {
        let mut eng = scraped_engine(GeometryMode::OneD);
        eng.scrape_particles("electrons", 1, 5, |r| r.pos[0] > 1.0)
            .unwrap();
        let mut acc = BoundaryBufferAccessor::new(&mut eng, GeometryMode::OneD).unwrap();

        let z = ndarray::array![20.0, 30.0];
        let ids: ndarray::Array1<u64> = ndarray::array![7, 8];
        let values = [TileStructs {
            pos: vec![z.view()],
            idcpu: Some(ids.view()),
        }];
        acc.set_buffer_structs("electrons", "z_hi", 0, &values)
            .unwrap();
        let structs = acc.buffer_structs("electrons", "z_hi", 0).unwrap();
        assert_eq!(structs[0].pos[0].to_vec(), vec![20.0, 30.0]);
        assert_eq!(structs[0].idcpu.to_vec(), vec![7, 8]);
        drop(structs);

        let orig = ndarray::array![-4.0, -5.0];
        acc.set_buffer_component(
            "electrons",
            "z_hi",
            "orig_z",
            0,
            &TileValues::Real(vec![orig.view()]),
        )
        .unwrap();
        let steps = ndarray::array![40, 41];
        acc.set_buffer_component(
            "electrons",
            "z_hi",
            STEP_SCRAPED,
            0,
            &TileValues::Int(vec![steps.view()]),
        )
        .unwrap();
        assert_eq!(
            acc.buffer_component("electrons", "z_hi", "orig_z", 0)
                .unwrap()
                .to_f64_vec(),
            vec![-4.0, -5.0]
        );
        assert_eq!(
            acc.buffer_component("electrons", "z_hi", STEP_SCRAPED, 0)
                .unwrap()
                .to_f64_vec(),
            vec![40.0, 41.0]
        );
    }

    #[test]
    fn test_buffer_write_back_rejects_bad_input() {
        let mut eng = scraped_engine(GeometryMode::OneD);
        eng.scrape_particles("electrons", 1, 5, |r| r.pos[0] > 1.0)
            .unwrap();
        let mut acc = BoundaryBufferAccessor::new(&mut eng, GeometryMode::OneD).unwrap();

        let steps = ndarray::array![1, 2];
        assert!(matches!(
            acc.set_buffer_component(
                "electrons",
                "z_hi",
                "orig_z",
                0,
                &TileValues::Int(vec![steps.view()]),
            ),
            Err(PicError::ConfigError(_))
        ));
        let short = ndarray::array![9.0];
        let values = [TileStructs {
            pos: vec![short.view()],
            idcpu: None,
        }];
        assert!(matches!(
            acc.set_buffer_structs("electrons", "z_hi", 0, &values),
            Err(PicError::ShapeMismatch { .. })
        ));
        let structs = acc.buffer_structs("electrons", "z_hi", 0).unwrap();
        assert_eq!(structs[0].pos[0].to_vec(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_structs_skip_empty_tiles() {
        let mut eng = scraped_engine(GeometryMode::OneD);
        eng.scrape_particles("electrons", 2, 3, |r| r.pos[0] < 0.0)
            .unwrap();
        let mut acc = BoundaryBufferAccessor::new(&mut eng, GeometryMode::OneD).unwrap();
        let structs = acc.buffer_structs("electrons", "eb", 0).unwrap();
        assert_eq!(structs.len(), 1);
        assert_eq!(structs[0].pos[0].to_vec(), vec![-1.0]);
        assert!(acc.buffer_structs("electrons", "z_lo", 0).unwrap().is_empty());
    }

    #[test]
    fn test_clear_then_count_is_zero() {
        let mut eng = scraped_engine(GeometryMode::TwoD);
        eng.scrape_particles("electrons", 4, 1, |_| true).unwrap();
        let mut acc = BoundaryBufferAccessor::new(&mut eng, GeometryMode::TwoD).unwrap();
        assert_eq!(acc.buffer_size("electrons", "eb", false).unwrap(), 4);
        acc.clear();
        assert_eq!(acc.buffer_size("electrons", "eb", false).unwrap(), 0);
        let step = acc.buffer_step_scraped("electrons", "eb", 0).unwrap();
        assert!(step.is_empty());
    }

    #[test]
    fn test_component_added_after_scrape_is_empty() {
        let mut eng = scraped_engine(GeometryMode::ThreeD);
        eng.scrape_particles("electrons", 6, 1, |_| true).unwrap();
        SpeciesAccessor::from_engine(&mut eng, "electrons")
            .unwrap()
            .add_real_comp("late", false)
            .unwrap();
        let mut acc = BoundaryBufferAccessor::new(&mut eng, GeometryMode::ThreeD).unwrap();
        let late = acc.buffer_component("electrons", "eb", "late", 0).unwrap();
        assert!(late.is_empty());
    }

    #[test]
    fn test_bad_tokens_and_names() {
        let mut eng = scraped_engine(GeometryMode::Rz);
        let mut acc = BoundaryBufferAccessor::new(&mut eng, GeometryMode::Rz).unwrap();
        match acc.buffer_size("electrons", "y_lo", false) {
            Err(PicError::ConfigError(msg)) => assert!(msg.contains("y_lo")),
            other => panic!("Unexpected result: {other:?}"),
        }
        assert!(matches!(
            acc.buffer_size("electrons", "x-lo", false),
            Err(PicError::ConfigError(_))
        ));
        assert!(matches!(
            acc.buffer_component("electrons", "eb", "nope", 0),
            Err(PicError::UnknownComponent(_))
        ));
        assert!(matches!(
            acc.buffer_size("photons", "eb", false),
            Err(PicError::UnknownSpecies(_))
        ));
    }

    #[test]
    fn test_geometry_mismatch_rejected() {
        let mut eng = scraped_engine(GeometryMode::ThreeD);
        assert!(matches!(
            BoundaryBufferAccessor::new(&mut eng, GeometryMode::OneD),
            Err(PicError::ConfigError(_))
        ));
    }
}
