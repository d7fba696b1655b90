// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — Accessor Layer
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Species and boundary-buffer accessors over a particle engine.
//!
//! [`SpeciesAccessor`] ingests particles from mixed scalar/array columns and
//! answers per-tile coordinate and component queries. [`BoundaryBufferAccessor`]
//! exposes particles scraped at named boundaries. Both accept per-tile
//! replacement data through [`writeback`].

pub mod boundary;
pub mod ingest;
pub mod species;
pub mod writeback;

pub use boundary::{BoundaryBufferAccessor, ScrapedArrays, STEP_SCRAPED};
pub use ingest::{Column, ParticleInput};
pub use species::{ParticleField, SpeciesAccessor, TileArrays};
pub use writeback::{TileStructs, TileValues};
