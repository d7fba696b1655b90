// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — Property-Based Tests (proptest) for pic-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for pic-types using proptest.
//!
//! Covers: boundary index layout per geometry, token parsing,
//! configuration serialization roundtrip.

use pic_types::boundary::{boundary_index, num_boundaries, Boundary, Side};
use pic_types::config::{EngineConfig, SpeciesConfig};
use pic_types::geometry::{Axis, GeometryMode};
use proptest::prelude::*;
use std::collections::HashSet;

const GEOMETRIES: [GeometryMode; 4] = [
    GeometryMode::ThreeD,
    GeometryMode::TwoD,
    GeometryMode::Rz,
    GeometryMode::OneD,
];

fn geometry() -> impl Strategy<Value = GeometryMode> {
    prop::sample::select(GEOMETRIES.to_vec())
}

// ── Boundary Index Layout ────────────────────────────────────────────

proptest! {
    /// Every domain boundary of a geometry maps to a distinct index below eb.
    #[test]
    fn domain_indices_distinct_and_below_eb(geom in geometry()) {
        let eb = boundary_index("eb", geom).expect("eb always exists");
        prop_assert_eq!(eb, 2 * geom.num_axes());
        prop_assert_eq!(num_boundaries(geom), eb + 1);

        let mut seen = HashSet::new();
        for &axis in geom.axes() {
            for side in [Side::Lo, Side::Hi] {
                let idx = Boundary::Domain { axis, side }.index(geom).expect("axis in geometry");
                prop_assert!(idx < eb);
                prop_assert!(seen.insert(idx), "duplicate index {}", idx);
            }
        }
        prop_assert_eq!(seen.len(), eb);
    }

    /// Tokens built from an axis of the geometry parse to 2*axis + side.
    #[test]
    fn token_index_formula(geom in geometry(), hi in any::<bool>()) {
        for (pos, axis) in geom.axes().iter().enumerate() {
            let token = format!("{}_{}", axis.as_str(), if hi { "hi" } else { "lo" });
            let idx = boundary_index(&token, geom).expect("valid token");
            prop_assert_eq!(idx, 2 * pos + usize::from(hi));
        }
    }

    /// Axes absent from the geometry are rejected.
    #[test]
    fn missing_axis_rejected(geom in geometry()) {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            if geom.axis_index(axis).is_none() {
                let token = format!("{}_lo", axis.as_str());
                prop_assert!(boundary_index(&token, geom).is_err());
            }
        }
    }

    /// Arbitrary strings never panic; only well-formed tokens succeed.
    #[test]
    fn arbitrary_tokens_never_panic(token in "[a-z_]{0,8}", geom in geometry()) {
        if let Ok(idx) = boundary_index(&token, geom) {
            prop_assert!(idx < num_boundaries(geom));
        }
    }
}

// ── Configuration Roundtrip ──────────────────────────────────────────

proptest! {
    /// EngineConfig survives a JSON roundtrip.
    #[test]
    fn config_json_roundtrip(
        geom in geometry(),
        tile_capacity in 1usize..4096,
        levels in 1usize..4,
        rank in 0u32..1024,
        comps in prop::collection::hash_set("[a-z]{1,6}", 0..4),
    ) {
        let mut cfg = EngineConfig::new(
            geom,
            vec![SpeciesConfig::new("electrons").with_real_comps(comps.iter().cloned())],
        );
        cfg.tile_capacity = tile_capacity;
        cfg.levels = levels;
        cfg.rank = rank;

        let json = serde_json::to_string(&cfg).expect("serialize");
        let back = EngineConfig::from_json(&json).expect("roundtrip");
        prop_assert_eq!(back.geometry, geom);
        prop_assert_eq!(back.tile_capacity, tile_capacity);
        prop_assert_eq!(back.levels, levels);
        prop_assert_eq!(back.rank, rank);
        prop_assert_eq!(&back.species[0].extra_real_comps, &cfg.species[0].extra_real_comps);
    }

    /// Geometry names parse back to themselves.
    #[test]
    fn geometry_name_roundtrip(geom in geometry()) {
        let parsed: GeometryMode = geom.as_str().parse().expect("known name");
        prop_assert_eq!(parsed, geom);
    }
}
