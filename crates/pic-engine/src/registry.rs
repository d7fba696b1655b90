// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — Component Registry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Enum-keyed registry of a species' real components.
//!
//! Storage order is fixed when the species is built:
//! `w, ux, uy, uz[, theta]`, then runtime components in registration order.
//! Names are resolved to a [`RealComponent`] once; indices are derived
//! from the key, never looked up again by string.

use std::collections::HashMap;

use pic_types::error::{PicError, PicResult};
use pic_types::geometry::GeometryMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RealComponent {
    Weight,
    Ux,
    Uy,
    Uz,
    /// Azimuthal angle, RZ only.
    Theta,
    /// k-th runtime component.
    Runtime(usize),
}

impl RealComponent {
    pub fn is_runtime(self) -> bool {
        matches!(self, RealComponent::Runtime(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeComponent {
    pub name: String,
    /// Whether the engine moves this component with particles between ranks.
    pub communicate: bool,
}

#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    geometry: GeometryMode,
    runtime: Vec<RuntimeComponent>,
    lookup: HashMap<String, RealComponent>,
}

impl ComponentRegistry {
    pub fn new(geometry: GeometryMode) -> Self {
        let mut lookup = HashMap::new();
        lookup.insert("w".to_string(), RealComponent::Weight);
        lookup.insert("ux".to_string(), RealComponent::Ux);
        lookup.insert("uy".to_string(), RealComponent::Uy);
        lookup.insert("uz".to_string(), RealComponent::Uz);
        if geometry.has_azimuthal() {
            lookup.insert("theta".to_string(), RealComponent::Theta);
        }
        ComponentRegistry {
            geometry,
            runtime: Vec::new(),
            lookup,
        }
    }

    pub fn geometry(&self) -> GeometryMode {
        self.geometry
    }

    /// Register a runtime component; fails if the name is already taken.
    pub fn register(&mut self, name: &str, communicate: bool) -> PicResult<RealComponent> {
        if name.is_empty() {
            return Err(PicError::ConfigError(
                "component name must be non-empty".to_string(),
            ));
        }
        if self.lookup.contains_key(name) {
            return Err(PicError::ConfigError(format!(
                "component {name} is already registered"
            )));
        }
        let key = RealComponent::Runtime(self.runtime.len());
        self.runtime.push(RuntimeComponent {
            name: name.to_string(),
            communicate,
        });
        self.lookup.insert(name.to_string(), key);
        Ok(key)
    }

    pub fn resolve(&self, name: &str) -> PicResult<RealComponent> {
        self.lookup
            .get(name)
            .copied()
            .ok_or_else(|| PicError::UnknownComponent(name.to_string()))
    }

    /// Storage index of a component.
    pub fn index(&self, comp: RealComponent) -> usize {
        let built_in = self.geometry.built_in_non_weight_attrs();
        match comp {
            RealComponent::Weight => 0,
            RealComponent::Ux => 1,
            RealComponent::Uy => 2,
            RealComponent::Uz => 3,
            RealComponent::Theta => 4,
            RealComponent::Runtime(k) => built_in + 1 + k,
        }
    }

    pub fn index_of(&self, name: &str) -> PicResult<usize> {
        Ok(self.index(self.resolve(name)?))
    }

    pub fn num_real(&self) -> usize {
        1 + self.geometry.built_in_non_weight_attrs() + self.runtime.len()
    }

    /// Columns of the ingestion attribute table: the weight plus every runtime component.
    pub fn num_attr_columns(&self) -> usize {
        1 + self.runtime.len()
    }

    /// Attribute-table column of a component, `None` for momenta and theta.
    pub fn attr_column(&self, comp: RealComponent) -> Option<usize> {
        match comp {
            RealComponent::Weight => Some(0),
            RealComponent::Runtime(k) => Some(1 + k),
            _ => None,
        }
    }

    pub fn runtime_components(&self) -> &[RuntimeComponent] {
        &self.runtime
    }

    /// Component names in storage order.
    pub fn names(&self) -> Vec<&str> {
        let mut names = vec!["w", "ux", "uy", "uz"];
        if self.geometry.has_azimuthal() {
            names.push("theta");
        }
        names.extend(self.runtime.iter().map(|c| c.name.as_str()));
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_layout_3d() {
        let reg = ComponentRegistry::new(GeometryMode::ThreeD);
        assert_eq!(reg.num_real(), 4);
        assert_eq!(reg.index_of("w").unwrap(), 0);
        assert_eq!(reg.index_of("uz").unwrap(), 3);
        assert!(matches!(
            reg.resolve("theta"),
            Err(PicError::UnknownComponent(_))
        ));
    }

    #[test]
    fn test_builtin_layout_rz_has_theta() {
        let reg = ComponentRegistry::new(GeometryMode::Rz);
        assert_eq!(reg.num_real(), 5);
        assert_eq!(reg.index_of("theta").unwrap(), 4);
        assert_eq!(reg.names(), vec!["w", "ux", "uy", "uz", "theta"]);
    }

    #[test]
    fn test_runtime_components_follow_builtins() {
        let mut reg = ComponentRegistry::new(GeometryMode::Rz);
        let a = reg.register("orig_x", false).unwrap();
        let b = reg.register("orig_z", true).unwrap();
        assert_eq!(reg.index(a), 5);
        assert_eq!(reg.index(b), 6);
        assert_eq!(reg.attr_column(a), Some(1));
        assert_eq!(reg.attr_column(b), Some(2));
        assert_eq!(reg.num_attr_columns(), 3);
        // Attribute column == storage index minus the built-in non-weight count.
        let built_in = GeometryMode::Rz.built_in_non_weight_attrs();
        assert_eq!(reg.index(b) - built_in, reg.attr_column(b).unwrap());
        assert!(reg.runtime_components()[1].communicate);
    }

    #[test]
    fn test_duplicate_and_empty_names_rejected() {
        let mut reg = ComponentRegistry::new(GeometryMode::ThreeD);
        reg.register("age", true).unwrap();
        assert!(matches!(
            reg.register("age", true),
            Err(PicError::ConfigError(_))
        ));
        assert!(matches!(reg.register("ux", true), Err(PicError::ConfigError(_))));
        assert!(matches!(reg.register("", true), Err(PicError::ConfigError(_))));
    }

    #[test]
    fn test_momenta_have_no_attr_column() {
        let reg = ComponentRegistry::new(GeometryMode::ThreeD);
        assert_eq!(reg.attr_column(RealComponent::Ux), None);
        assert_eq!(reg.attr_column(RealComponent::Weight), Some(0));
    }
}
