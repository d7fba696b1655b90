// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — Particle Ingestion
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Scalar/array broadcasting for new particles.
//!
//! Every supplied column must have length 1 or N, where N is the longest
//! supplied column. Length-1 columns are broadcast to N and omitted columns
//! become N zeros. The weight lands in column 0 of the attribute table and
//! each extra attribute at its schema index minus the built-in non-weight
//! component count.

use ndarray::{Array1, Array2, ArrayView1};

use pic_engine::batch::ParticleBatch;
use pic_engine::registry::ComponentRegistry;
use pic_types::error::{PicError, PicResult};

/// A particle column: one value for every particle, or one per particle.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Scalar(f64),
    Array(Array1<f64>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Scalar(_) => 1,
            Column::Array(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn broadcast(&self, n: usize) -> Array1<f64> {
        match self {
            Column::Scalar(v) => Array1::from_elem(n, *v),
            Column::Array(values) if values.len() == 1 => Array1::from_elem(n, values[0]),
            Column::Array(values) => values.clone(),
        }
    }
}

impl From<f64> for Column {
    fn from(v: f64) -> Self {
        Column::Scalar(v)
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Array(Array1::from(values))
    }
}

impl From<&[f64]> for Column {
    fn from(values: &[f64]) -> Self {
        Column::Array(Array1::from(values.to_vec()))
    }
}

impl From<Array1<f64>> for Column {
    fn from(values: Array1<f64>) -> Self {
        Column::Array(values)
    }
}

impl From<ArrayView1<'_, f64>> for Column {
    fn from(values: ArrayView1<'_, f64>) -> Self {
        Column::Array(values.to_owned())
    }
}

/// Description of new particles before broadcasting.
#[derive(Debug, Clone, Default)]
pub struct ParticleInput {
    pub x: Option<Column>,
    pub y: Option<Column>,
    pub z: Option<Column>,
    pub ux: Option<Column>,
    pub uy: Option<Column>,
    pub uz: Option<Column>,
    pub w: Option<Column>,
    extra: Vec<(String, Column)>,
}

impl ParticleInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(mut self, values: impl Into<Column>) -> Self {
        self.x = Some(values.into());
        self
    }

    pub fn y(mut self, values: impl Into<Column>) -> Self {
        self.y = Some(values.into());
        self
    }

    pub fn z(mut self, values: impl Into<Column>) -> Self {
        self.z = Some(values.into());
        self
    }

    pub fn ux(mut self, values: impl Into<Column>) -> Self {
        self.ux = Some(values.into());
        self
    }

    pub fn uy(mut self, values: impl Into<Column>) -> Self {
        self.uy = Some(values.into());
        self
    }

    pub fn uz(mut self, values: impl Into<Column>) -> Self {
        self.uz = Some(values.into());
        self
    }

    pub fn w(mut self, values: impl Into<Column>) -> Self {
        self.w = Some(values.into());
        self
    }

    /// Set an extra (runtime) attribute; a repeated name replaces the earlier column.
    pub fn attr(mut self, name: impl Into<String>, values: impl Into<Column>) -> Self {
        self.set_attr(name, values);
        self
    }

    pub fn set_attr(&mut self, name: impl Into<String>, values: impl Into<Column>) {
        let name = name.into();
        let values = values.into();
        match self.extra.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = values,
            None => self.extra.push((name, values)),
        }
    }

    pub fn extra_attrs(&self) -> &[(String, Column)] {
        &self.extra
    }

    fn builtin(&self) -> [(&'static str, Option<&Column>); 7] {
        [
            ("x", self.x.as_ref()),
            ("y", self.y.as_ref()),
            ("z", self.z.as_ref()),
            ("ux", self.ux.as_ref()),
            ("uy", self.uy.as_ref()),
            ("uz", self.uz.as_ref()),
            ("w", self.w.as_ref()),
        ]
    }

    /// N: the longest supplied column, 0 when nothing is supplied.
    pub fn batch_len(&self) -> usize {
        let builtin = self.builtin();
        builtin
            .iter()
            .filter_map(|(_, col)| col.map(Column::len))
            .chain(self.extra.iter().map(|(_, col)| col.len()))
            .max()
            .unwrap_or(0)
    }

    /// Check every supplied column against N and return N.
    pub fn validate(&self) -> PicResult<usize> {
        let n = self.batch_len();
        let builtin = self.builtin();
        let mut supplied: Vec<(&str, &Column)> = builtin
            .iter()
            .filter_map(|(name, col)| col.map(|c| (*name, c)))
            .collect();
        supplied.extend(self.extra.iter().map(|(name, col)| (name.as_str(), col)));
        for (field, col) in supplied {
            let len = col.len();
            if len != 1 && len != n {
                return Err(PicError::ShapeMismatch {
                    field: field.to_string(),
                    len,
                    expected: n,
                });
            }
        }
        Ok(n)
    }

    /// Broadcast into a batch laid out for `registry`.
    pub fn to_batch(
        &self,
        registry: &ComponentRegistry,
        unique_particles: bool,
    ) -> PicResult<ParticleBatch> {
        let n = self.validate()?;
        let column = |col: &Option<Column>| match col {
            Some(c) => c.broadcast(n),
            None => Array1::zeros(n),
        };

        let built_in = registry.geometry().built_in_non_weight_attrs();
        let mut attr = Array2::zeros((n, registry.num_attr_columns()));
        attr.column_mut(0).assign(&column(&self.w));
        for (name, values) in &self.extra {
            let comp = registry.resolve(name)?;
            if !comp.is_runtime() {
                return Err(PicError::ConfigError(format!(
                    "{name} is a built-in component and cannot be passed as an extra attribute"
                )));
            }
            let col = registry.index(comp) - built_in;
            attr.column_mut(col).assign(&values.broadcast(n));
        }

        Ok(ParticleBatch {
            x: column(&self.x),
            y: column(&self.y),
            z: column(&self.z),
            ux: column(&self.ux),
            uy: column(&self.uy),
            uz: column(&self.uz),
            attr,
            attr_int: Array2::zeros((n, 0)),
            unique_particles,
        })
    }
}
