// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — PIC Python
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! PyO3 Python bindings for the SCPN PIC accessor layer.
//!
//! Exposes a simulation handle, per-species particle containers and the
//! boundary buffer. Per-tile data comes back as lists of numpy copies;
//! the `set_*` methods write edited copies back into the engine.

use ndarray::Array1;
use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::exceptions::{
    PyIOError, PyIndexError, PyKeyError, PyNotImplementedError, PyRuntimeError, PyValueError,
};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use tracing::info;

use pic_access::{
    BoundaryBufferAccessor, Column, ParticleField, ParticleInput, ScrapedArrays, SpeciesAccessor,
    TileStructs, TileValues, STEP_SCRAPED,
};
use pic_engine::memory::{MemoryEngine, MemorySpecies};
use pic_engine::store::Engine;
use pic_types::boundary::Boundary;
use pic_types::config::{EngineConfig, SpeciesConfig};
use pic_types::error::PicError;
use pic_types::geometry::GeometryMode;

fn py_err(err: PicError) -> PyErr {
    let msg = err.to_string();
    match err {
        PicError::ShapeMismatch { .. } | PicError::ConfigError(_) | PicError::Json(_) => {
            PyValueError::new_err(msg)
        }
        PicError::UnknownComponent(_) | PicError::UnknownSpecies(_) => PyKeyError::new_err(msg),
        PicError::LevelOutOfRange { .. } => PyIndexError::new_err(msg),
        PicError::UnsupportedOperation(_) => PyRuntimeError::new_err(msg),
        PicError::NotImplemented(_) => PyNotImplementedError::new_err(msg),
        PicError::Io(_) => PyIOError::new_err(msg),
    }
}

/// Accept a float, a 1-D float numpy array, or a sequence of floats.
fn extract_column(name: &str, obj: &Bound<'_, PyAny>) -> PyResult<Column> {
    if let Ok(v) = obj.extract::<f64>() {
        return Ok(Column::Scalar(v));
    }
    if let Ok(arr) = obj.extract::<PyReadonlyArray1<'_, f64>>() {
        return Ok(Column::from(arr.as_array()));
    }
    obj.extract::<Vec<f64>>().map(Column::from).map_err(|_| {
        PyValueError::new_err(format!(
            "{name} must be a float, a 1-D float array or a sequence of floats"
        ))
    })
}

fn to_numpy<'py, T: numpy::Element>(
    py: Python<'py>,
    tiles: impl IntoIterator<Item = Array1<T>>,
) -> Vec<Bound<'py, PyArray1<T>>> {
    tiles.into_iter().map(|t| t.into_pyarray(py)).collect()
}

/// Per-tile struct data from Python: (position slot arrays, optional idcpu).
type StructTiles<'py> = Vec<(
    Vec<PyReadonlyArray1<'py, f64>>,
    Option<PyReadonlyArray1<'py, u64>>,
)>;

fn struct_views<'a>(tiles: &'a StructTiles<'_>) -> Vec<TileStructs<'a>> {
    tiles
        .iter()
        .map(|(pos, idcpu)| TileStructs {
            pos: pos.iter().map(|p| p.as_array()).collect(),
            idcpu: idcpu.as_ref().map(|a| a.as_array()),
        })
        .collect()
}

// ─── Simulation ───

/// In-memory particle engine holding every species and the boundary buffer.
#[pyclass(name = "Simulation")]
struct PySimulation {
    inner: MemoryEngine,
}

#[pymethods]
impl PySimulation {
    /// Load engine configuration from a JSON file.
    #[new]
    fn new(config_path: &str) -> PyResult<Self> {
        let inner = MemoryEngine::from_file(config_path).map_err(py_err)?;
        info!(path = config_path, "loaded simulation config");
        Ok(PySimulation { inner })
    }

    /// Build an engine directly from a geometry name and species names.
    #[staticmethod]
    #[pyo3(signature = (geometry, species, tile_capacity=256, rank=0))]
    fn from_geometry(
        geometry: &str,
        species: Vec<String>,
        tile_capacity: usize,
        rank: u32,
    ) -> PyResult<Self> {
        let geometry: GeometryMode = geometry.parse().map_err(py_err)?;
        let mut config = EngineConfig::new(
            geometry,
            species.into_iter().map(SpeciesConfig::new).collect(),
        );
        config.tile_capacity = tile_capacity;
        config.rank = rank;
        let inner = MemoryEngine::new(config).map_err(py_err)?;
        Ok(PySimulation { inner })
    }

    #[getter]
    fn geometry(&self) -> &'static str {
        self.inner.geometry().as_str()
    }

    fn species_names(&self) -> Vec<String> {
        self.inner
            .species_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Container handle for one species.
    fn particle_container(slf: &Bound<'_, Self>, species: &str) -> PyResult<PyParticleContainer> {
        slf.borrow().inner.species(species).map_err(py_err)?;
        Ok(PyParticleContainer {
            sim: slf.clone().unbind(),
            species: species.to_string(),
        })
    }

    fn particle_boundary_buffer(slf: &Bound<'_, Self>) -> PyParticleBoundaryBuffer {
        PyParticleBoundaryBuffer {
            sim: slf.clone().unbind(),
        }
    }

    /// Move particles beyond `position` on a domain boundary into the buffer.
    /// Returns the number of particles moved.
    fn scrape_beyond(
        &mut self,
        species: &str,
        boundary: &str,
        position: f64,
        step: i32,
    ) -> PyResult<usize> {
        let boundary: Boundary = boundary.parse().map_err(py_err)?;
        self.inner
            .scrape_beyond(species, boundary, position, step)
            .map_err(py_err)
    }

    fn __repr__(&self) -> String {
        format!(
            "Simulation(geometry={}, species={:?})",
            self.inner.geometry(),
            self.inner.species_names()
        )
    }
}

// ─── Particle container ───

/// Particle container of one species.
#[pyclass(name = "ParticleContainer")]
struct PyParticleContainer {
    sim: Py<PySimulation>,
    species: String,
}

impl PyParticleContainer {
    fn with_species<R>(
        &self,
        py: Python<'_>,
        f: impl FnOnce(&mut SpeciesAccessor<'_, MemorySpecies>) -> Result<R, PicError>,
    ) -> PyResult<R> {
        let mut sim = self.sim.bind(py).try_borrow_mut()?;
        let mut acc = SpeciesAccessor::from_engine(&mut sim.inner, &self.species).map_err(py_err)?;
        f(&mut acc).map_err(py_err)
    }
}

#[pymethods]
impl PyParticleContainer {
    #[getter]
    fn name(&self) -> &str {
        &self.species
    }

    /// Add particles; every column may be a scalar or a 1-D array, and
    /// extra keyword arguments name runtime real components.
    #[pyo3(signature = (
        x=None, y=None, z=None, ux=None, uy=None, uz=None, w=None,
        unique_particles=true, **kwargs
    ))]
    #[allow(clippy::too_many_arguments)]
    fn add_particles(
        &self,
        py: Python<'_>,
        x: Option<&Bound<'_, PyAny>>,
        y: Option<&Bound<'_, PyAny>>,
        z: Option<&Bound<'_, PyAny>>,
        ux: Option<&Bound<'_, PyAny>>,
        uy: Option<&Bound<'_, PyAny>>,
        uz: Option<&Bound<'_, PyAny>>,
        w: Option<&Bound<'_, PyAny>>,
        unique_particles: bool,
        kwargs: Option<&Bound<'_, PyDict>>,
    ) -> PyResult<usize> {
        let mut input = ParticleInput::new();
        for (name, obj, slot) in [
            ("x", x, &mut input.x),
            ("y", y, &mut input.y),
            ("z", z, &mut input.z),
            ("ux", ux, &mut input.ux),
            ("uy", uy, &mut input.uy),
            ("uz", uz, &mut input.uz),
            ("w", w, &mut input.w),
        ] {
            if let Some(obj) = obj {
                *slot = Some(extract_column(name, obj)?);
            }
        }
        if let Some(kwargs) = kwargs {
            for (key, value) in kwargs.iter() {
                let name: String = key.extract()?;
                let col = extract_column(&name, &value)?;
                input.set_attr(name, col);
            }
        }
        self.with_species(py, |acc| acc.add_particles(&input, unique_particles))
    }

    #[pyo3(signature = (local=false))]
    fn get_particle_count(&self, py: Python<'_>, local: bool) -> PyResult<usize> {
        self.with_species(py, |acc| Ok(acc.particle_count(local)))
    }

    #[pyo3(signature = (name, comm=true))]
    fn add_real_comp(&self, py: Python<'_>, name: &str, comm: bool) -> PyResult<usize> {
        self.with_species(py, |acc| acc.add_real_comp(name, comm))
    }

    fn get_comp_index(&self, py: Python<'_>, name: &str) -> PyResult<usize> {
        self.with_species(py, |acc| acc.comp_index(name))
    }

    /// Per tile: (list of position slot arrays, idcpu array).
    #[pyo3(signature = (level=0))]
    #[allow(clippy::type_complexity)]
    fn get_particle_structs<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<(Vec<Bound<'py, PyArray1<f64>>>, Bound<'py, PyArray1<u64>>)>> {
        let tiles = self.with_species(py, |acc| {
            Ok(acc
                .particle_structs(level)?
                .into_iter()
                .map(|s| {
                    let pos: Vec<Array1<f64>> = s.pos.iter().map(|p| p.to_owned()).collect();
                    (pos, s.idcpu.to_owned())
                })
                .collect::<Vec<_>>())
        })?;
        Ok(tiles
            .into_iter()
            .map(|(pos, idcpu)| (to_numpy(py, pos), idcpu.into_pyarray(py)))
            .collect())
    }

    #[pyo3(signature = (comp_name, level=0))]
    fn get_particle_arrays<'py>(
        &self,
        py: Python<'py>,
        comp_name: &str,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        let tiles = self.with_species(py, |acc| {
            Ok(acc
                .particle_arrays(comp_name, level)?
                .into_iter()
                .map(|t| t.to_owned())
                .collect::<Vec<_>>())
        })?;
        Ok(to_numpy(py, tiles))
    }

    /// Overwrite a real component tile by tile; `values` must match the tile layout.
    #[pyo3(signature = (comp_name, values, level=0))]
    fn set_particle_arrays<'py>(
        &self,
        py: Python<'py>,
        comp_name: &str,
        values: Vec<PyReadonlyArray1<'py, f64>>,
        level: usize,
    ) -> PyResult<()> {
        let views: Vec<_> = values.iter().map(|v| v.as_array()).collect();
        self.with_species(py, |acc| acc.set_particle_arrays(comp_name, level, &views))
    }

    /// Overwrite positions tile by tile. `values` mirrors `get_particle_structs`:
    /// per tile, (list of position slot arrays, idcpu array or None).
    #[pyo3(signature = (values, level=0))]
    fn set_particle_structs<'py>(
        &self,
        py: Python<'py>,
        values: StructTiles<'py>,
        level: usize,
    ) -> PyResult<()> {
        let views = struct_views(&values);
        self.with_species(py, |acc| acc.set_particle_structs(level, &views))
    }

    /// Real component names in storage order.
    #[getter]
    fn real_comp_names(&self, py: Python<'_>) -> PyResult<Vec<String>> {
        self.with_species(py, |acc| {
            Ok(acc.real_comp_names().into_iter().map(str::to_string).collect())
        })
    }

    #[pyo3(signature = (level=0))]
    fn get_particle_id<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<u64>>>> {
        let tiles = self.with_species(py, |acc| acc.particle_ids(level))?;
        Ok(to_numpy(py, tiles))
    }

    #[pyo3(signature = (level=0))]
    fn get_particle_cpu<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<u32>>>> {
        let tiles = self.with_species(py, |acc| acc.particle_cpus(level))?;
        Ok(to_numpy(py, tiles))
    }

    #[pyo3(signature = (level=0))]
    fn get_particle_x<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.coordinate(py, level, Coordinate::X)
    }

    #[pyo3(signature = (level=0))]
    fn get_particle_y<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.coordinate(py, level, Coordinate::Y)
    }

    #[pyo3(signature = (level=0))]
    fn get_particle_z<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.coordinate(py, level, Coordinate::Z)
    }

    #[pyo3(signature = (level=0))]
    fn get_particle_r<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.coordinate(py, level, Coordinate::R)
    }

    #[pyo3(signature = (level=0))]
    fn get_particle_theta<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.coordinate(py, level, Coordinate::Theta)
    }

    #[pyo3(signature = (level=0))]
    fn get_particle_weight<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.get_particle_arrays(py, "w", level)
    }

    #[pyo3(signature = (level=0))]
    fn get_particle_ux<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.get_particle_arrays(py, "ux", level)
    }

    #[pyo3(signature = (level=0))]
    fn get_particle_uy<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.get_particle_arrays(py, "uy", level)
    }

    #[pyo3(signature = (level=0))]
    fn get_particle_uz<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.get_particle_arrays(py, "uz", level)
    }

    #[pyo3(signature = (local=false))]
    fn get_species_charge_sum(&self, py: Python<'_>, local: bool) -> PyResult<f64> {
        self.with_species(py, |acc| acc.species_charge_sum(local))
    }

    /// Field components at particle positions: "ex", "ey", "ez", "bx", "by" or "bz".
    #[pyo3(signature = (field, level=0))]
    fn get_particle_field<'py>(
        &self,
        py: Python<'py>,
        field: &str,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        let field = match field {
            "ex" => ParticleField::Ex,
            "ey" => ParticleField::Ey,
            "ez" => ParticleField::Ez,
            "bx" => ParticleField::Bx,
            "by" => ParticleField::By,
            "bz" => ParticleField::Bz,
            other => return Err(PyKeyError::new_err(format!("unknown field: {other}"))),
        };
        self.field(py, field, level)
    }

    #[pyo3(signature = (level=0))]
    fn getex<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.field(py, ParticleField::Ex, level)
    }

    #[pyo3(signature = (level=0))]
    fn getey<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.field(py, ParticleField::Ey, level)
    }

    #[pyo3(signature = (level=0))]
    fn getez<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.field(py, ParticleField::Ez, level)
    }

    #[pyo3(signature = (level=0))]
    fn getbx<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.field(py, ParticleField::Bx, level)
    }

    #[pyo3(signature = (level=0))]
    fn getby<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.field(py, ParticleField::By, level)
    }

    #[pyo3(signature = (level=0))]
    fn getbz<'py>(
        &self,
        py: Python<'py>,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.field(py, ParticleField::Bz, level)
    }

    #[getter]
    fn ex<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.getex(py, 0)
    }

    #[getter]
    fn ey<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.getey(py, 0)
    }

    #[getter]
    fn ez<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.getez(py, 0)
    }

    #[getter]
    fn bx<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.getbx(py, 0)
    }

    #[getter]
    fn by<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.getby(py, 0)
    }

    #[getter]
    fn bz<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.getbz(py, 0)
    }

    // Level-0 shortcuts.

    #[getter]
    fn nps(&self, py: Python<'_>) -> PyResult<usize> {
        self.get_particle_count(py, false)
    }

    #[getter]
    fn xp<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.get_particle_x(py, 0)
    }

    #[getter]
    fn yp<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.get_particle_y(py, 0)
    }

    #[getter]
    fn zp<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.get_particle_z(py, 0)
    }

    #[getter]
    fn rp<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.get_particle_r(py, 0)
    }

    #[getter]
    fn thetap<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.get_particle_theta(py, 0)
    }

    #[getter]
    fn wp<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.get_particle_weight(py, 0)
    }

    #[getter]
    fn uxp<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.get_particle_ux(py, 0)
    }

    #[getter]
    fn uyp<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.get_particle_uy(py, 0)
    }

    #[getter]
    fn uzp<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        self.get_particle_uz(py, 0)
    }
}

#[derive(Clone, Copy)]
enum Coordinate {
    X,
    Y,
    Z,
    R,
    Theta,
}

impl PyParticleContainer {
    fn field<'py>(
        &self,
        py: Python<'py>,
        field: ParticleField,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        let tiles = self.with_species(py, |acc| acc.particle_field(field, level))?;
        Ok(to_numpy(py, tiles))
    }

    fn coordinate<'py>(
        &self,
        py: Python<'py>,
        level: usize,
        coord: Coordinate,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        let tiles = self.with_species(py, |acc| {
            let tiles = match coord {
                Coordinate::X => acc.particle_x(level)?,
                Coordinate::Y => acc.particle_y(level)?,
                Coordinate::Z => acc.particle_z(level)?,
                Coordinate::R => acc.particle_r(level)?,
                Coordinate::Theta => acc.particle_theta(level)?,
            };
            Ok(tiles.into_iter().map(|t| t.into_owned()).collect::<Vec<_>>())
        })?;
        Ok(to_numpy(py, tiles))
    }
}

// ─── Boundary buffer ───

/// Particles scraped at domain and embedded boundaries.
#[pyclass(name = "ParticleBoundaryBuffer")]
struct PyParticleBoundaryBuffer {
    sim: Py<PySimulation>,
}

impl PyParticleBoundaryBuffer {
    fn with_buffer<R>(
        &self,
        py: Python<'_>,
        f: impl FnOnce(&mut BoundaryBufferAccessor<'_, MemoryEngine>) -> Result<R, PicError>,
    ) -> PyResult<R> {
        let mut sim = self.sim.bind(py).try_borrow_mut()?;
        let geometry = sim.inner.geometry();
        let mut acc = BoundaryBufferAccessor::new(&mut sim.inner, geometry).map_err(py_err)?;
        f(&mut acc).map_err(py_err)
    }
}

#[pymethods]
impl PyParticleBoundaryBuffer {
    #[pyo3(signature = (species_name, boundary, local=false))]
    fn get_particle_boundary_buffer_size(
        &self,
        py: Python<'_>,
        species_name: &str,
        boundary: &str,
        local: bool,
    ) -> PyResult<usize> {
        self.with_buffer(py, |acc| acc.buffer_size(species_name, boundary, local))
    }

    /// Per non-empty tile: (list of position slot arrays, idcpu array).
    #[pyo3(signature = (species_name, boundary, level=0))]
    #[allow(clippy::type_complexity)]
    fn get_particle_boundary_buffer_structs<'py>(
        &self,
        py: Python<'py>,
        species_name: &str,
        boundary: &str,
        level: usize,
    ) -> PyResult<Vec<(Vec<Bound<'py, PyArray1<f64>>>, Bound<'py, PyArray1<u64>>)>> {
        let tiles = self.with_buffer(py, |acc| {
            Ok(acc
                .buffer_structs(species_name, boundary, level)?
                .into_iter()
                .map(|s| {
                    let pos: Vec<Array1<f64>> = s.pos.iter().map(|p| p.to_owned()).collect();
                    (pos, s.idcpu.to_owned())
                })
                .collect::<Vec<_>>())
        })?;
        Ok(tiles
            .into_iter()
            .map(|(pos, idcpu)| (to_numpy(py, pos), idcpu.into_pyarray(py)))
            .collect())
    }

    /// Per-tile arrays of a real component, or of "step_scraped" (int32).
    #[pyo3(signature = (species_name, boundary, comp_name, level=0))]
    fn get_particle_boundary_buffer<'py>(
        &self,
        py: Python<'py>,
        species_name: &str,
        boundary: &str,
        comp_name: &str,
        level: usize,
    ) -> PyResult<Vec<Bound<'py, PyAny>>> {
        enum Owned {
            Real(Vec<Array1<f64>>),
            Int(Vec<Array1<i32>>),
        }
        let tiles = self.with_buffer(py, |acc| {
            Ok(
                match acc.buffer_component(species_name, boundary, comp_name, level)? {
                    ScrapedArrays::Real(t) => Owned::Real(t.iter().map(|a| a.to_owned()).collect()),
                    ScrapedArrays::Int(t) => Owned::Int(t.iter().map(|a| a.to_owned()).collect()),
                },
            )
        })?;
        Ok(match tiles {
            Owned::Real(t) => to_numpy(py, t).into_iter().map(Bound::into_any).collect(),
            Owned::Int(t) => to_numpy(py, t).into_iter().map(Bound::into_any).collect(),
        })
    }

    /// Overwrite scraped positions; `values` mirrors
    /// `get_particle_boundary_buffer_structs`.
    #[pyo3(signature = (species_name, boundary, values, level=0))]
    fn set_particle_boundary_buffer_structs<'py>(
        &self,
        py: Python<'py>,
        species_name: &str,
        boundary: &str,
        values: StructTiles<'py>,
        level: usize,
    ) -> PyResult<()> {
        let views = struct_views(&values);
        self.with_buffer(py, |acc| {
            acc.set_buffer_structs(species_name, boundary, level, &views)
        })
    }

    /// Overwrite a scraped component; "step_scraped" takes int32 arrays.
    #[pyo3(signature = (species_name, boundary, comp_name, values, level=0))]
    fn set_particle_boundary_buffer(
        &self,
        py: Python<'_>,
        species_name: &str,
        boundary: &str,
        comp_name: &str,
        values: &Bound<'_, PyAny>,
        level: usize,
    ) -> PyResult<()> {
        if comp_name == STEP_SCRAPED {
            let tiles: Vec<PyReadonlyArray1<'_, i32>> = values.extract()?;
            let views = TileValues::Int(tiles.iter().map(|t| t.as_array()).collect());
            self.with_buffer(py, |acc| {
                acc.set_buffer_component(species_name, boundary, comp_name, level, &views)
            })
        } else {
            let tiles: Vec<PyReadonlyArray1<'_, f64>> = values.extract()?;
            let views = TileValues::Real(tiles.iter().map(|t| t.as_array()).collect());
            self.with_buffer(py, |acc| {
                acc.set_buffer_component(species_name, boundary, comp_name, level, &views)
            })
        }
    }

    fn clear_buffer(&self, py: Python<'_>) -> PyResult<()> {
        self.with_buffer(py, |acc| {
            acc.clear();
            Ok(())
        })
    }
}

// ─── Module registration ───

#[pymodule]
fn pic_access_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySimulation>()?;
    m.add_class::<PyParticleContainer>()?;
    m.add_class::<PyParticleBoundaryBuffer>()?;
    Ok(())
}
