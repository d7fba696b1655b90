// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — Particle Batch
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::{Array1, Array2};

use pic_types::error::{PicError, PicResult};

/// Fully broadcast structure-of-arrays batch submitted to a particle store.
///
/// Positions are Cartesian regardless of geometry; the store maps them onto
/// its own position slots. `attr` holds the weight in column 0 followed by
/// runtime components; `attr_int` may have fewer columns than the store has
/// integer components (the rest are zero-filled).
#[derive(Debug, Clone)]
pub struct ParticleBatch {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    pub z: Array1<f64>,
    pub ux: Array1<f64>,
    pub uy: Array1<f64>,
    pub uz: Array1<f64>,
    pub attr: Array2<f64>,
    pub attr_int: Array2<i32>,
    /// False when the same particles are submitted on several ranks.
    pub unique_particles: bool,
}

impl ParticleBatch {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn nattr(&self) -> usize {
        self.attr.ncols()
    }

    pub fn nattr_int(&self) -> usize {
        self.attr_int.ncols()
    }

    /// Check every column against `len()`.
    pub fn validate(&self) -> PicResult<()> {
        let n = self.len();
        let columns = [
            ("y", self.y.len()),
            ("z", self.z.len()),
            ("ux", self.ux.len()),
            ("uy", self.uy.len()),
            ("uz", self.uz.len()),
            ("attr", self.attr.nrows()),
            ("attr_int", self.attr_int.nrows()),
        ];
        for (field, len) in columns {
            if len != n {
                return Err(PicError::ShapeMismatch {
                    field: field.to_string(),
                    len,
                    expected: n,
                });
            }
        }
        Ok(())
    }
}
