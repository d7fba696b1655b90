// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — Boundary Tokens
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Symbolic boundary names and their scrape-buffer indices.
//!
//! Domain boundaries are written `<axis>_<side>` (`x_lo`, `z_hi`, ...);
//! the embedded boundary is `eb`. The buffer index for a domain boundary is
//! `2 * axis_slot + side`, and the embedded boundary follows the last domain
//! boundary at `2 * num_axes`.

use std::fmt;
use std::str::FromStr;

use crate::error::{PicError, PicResult};
use crate::geometry::{Axis, GeometryMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Lo,
    Hi,
}

impl Side {
    pub fn offset(self) -> usize {
        match self {
            Side::Lo => 0,
            Side::Hi => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    Domain { axis: Axis, side: Side },
    Embedded,
}

impl Boundary {
    /// Scrape-buffer index of this boundary under `geometry`.
    pub fn index(self, geometry: GeometryMode) -> PicResult<usize> {
        match self {
            Boundary::Domain { axis, side } => {
                let slot = geometry.axis_index(axis).ok_or_else(|| {
                    PicError::ConfigError(format!(
                        "Boundary {self} does not exist in {geometry} geometry"
                    ))
                })?;
                Ok(2 * slot + side.offset())
            }
            Boundary::Embedded => Ok(2 * geometry.num_axes()),
        }
    }
}

impl FromStr for Boundary {
    type Err = PicError;

    fn from_str(s: &str) -> PicResult<Self> {
        if s == "eb" {
            return Ok(Boundary::Embedded);
        }
        let malformed = || PicError::ConfigError(format!("Unknown boundary specified: {s}"));
        let (axis, side) = s.split_once('_').ok_or_else(malformed)?;
        let axis = axis.parse::<Axis>().map_err(|_| malformed())?;
        let side = match side {
            "lo" => Side::Lo,
            "hi" => Side::Hi,
            _ => return Err(malformed()),
        };
        Ok(Boundary::Domain { axis, side })
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Domain { axis, side } => {
                let side = match side {
                    Side::Lo => "lo",
                    Side::Hi => "hi",
                };
                write!(f, "{axis}_{side}")
            }
            Boundary::Embedded => f.write_str("eb"),
        }
    }
}

/// Parse a boundary token and resolve its buffer index in one step.
pub fn boundary_index(token: &str, geometry: GeometryMode) -> PicResult<usize> {
    token.parse::<Boundary>()?.index(geometry)
}

/// Number of scrape buffers per species: two per axis plus the embedded boundary.
pub fn num_boundaries(geometry: GeometryMode) -> usize {
    2 * geometry.num_axes() + 1
}
