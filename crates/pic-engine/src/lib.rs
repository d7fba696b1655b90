// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — PIC Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Particle store seam for the accessor layer.
//!
//! `store` defines what the accessors need from a particle engine;
//! `memory` is the single-rank reference implementation.

pub mod batch;
pub mod idcpu;
pub mod memory;
pub mod registry;
pub mod store;
pub mod tile;
