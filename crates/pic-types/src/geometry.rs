// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — Geometry Mode
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Simulation geometry modes and their coordinate axes.
//!
//! The geometry is an explicit value handed to every accessor instead of a
//! process-wide setting. It decides how many position slots a particle
//! carries and which symbolic axis each slot stores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PicError, PicResult};

/// Cartesian axis name as used in boundary tokens and coordinate queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl FromStr for Axis {
    type Err = PicError;

    fn from_str(s: &str) -> PicResult<Self> {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(PicError::ConfigError(format!("Unknown axis: {other}"))),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dimensionality/coordinate system of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryMode {
    #[serde(rename = "3d")]
    ThreeD,
    #[serde(rename = "2d")]
    TwoD,
    /// Cylindrical; slot 0 holds r and `theta` is a real component.
    #[serde(rename = "rz")]
    Rz,
    #[serde(rename = "1d")]
    OneD,
}

const AXES_3D: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
const AXES_2D: [Axis; 2] = [Axis::X, Axis::Z];
const AXES_1D: [Axis; 1] = [Axis::Z];

impl GeometryMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryMode::ThreeD => "3d",
            GeometryMode::TwoD => "2d",
            GeometryMode::Rz => "rz",
            GeometryMode::OneD => "1d",
        }
    }

    /// Axes in position-slot order.
    pub fn axes(self) -> &'static [Axis] {
        match self {
            GeometryMode::ThreeD => &AXES_3D,
            GeometryMode::TwoD | GeometryMode::Rz => &AXES_2D,
            GeometryMode::OneD => &AXES_1D,
        }
    }

    pub fn num_axes(self) -> usize {
        self.axes().len()
    }

    /// Position slot that stores `axis`, if the geometry resolves it.
    pub fn axis_index(self, axis: Axis) -> Option<usize> {
        self.axes().iter().position(|&a| a == axis)
    }

    /// True when particles carry an azimuthal angle (`theta`).
    pub fn has_azimuthal(self) -> bool {
        matches!(self, GeometryMode::Rz)
    }

    /// Built-in real components other than the weight: ux, uy, uz (+ theta in RZ).
    pub fn built_in_non_weight_attrs(self) -> usize {
        if self.has_azimuthal() {
            4
        } else {
            3
        }
    }
}

impl FromStr for GeometryMode {
    type Err = PicError;

    fn from_str(s: &str) -> PicResult<Self> {
        match s {
            "3d" => Ok(GeometryMode::ThreeD),
            "2d" => Ok(GeometryMode::TwoD),
            "rz" => Ok(GeometryMode::Rz),
            "1d" => Ok(GeometryMode::OneD),
            other => Err(PicError::ConfigError(format!(
                "Unknown simulation geometry: {other}"
            ))),
        }
    }
}

impl fmt::Display for GeometryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
