// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — End-to-End Accessor Workflow
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Inject, scrape, inspect and clear, driven from a JSON engine config.

use pic_access::{BoundaryBufferAccessor, ParticleInput, SpeciesAccessor, STEP_SCRAPED};
use pic_engine::memory::MemoryEngine;
use pic_engine::store::Engine;
use pic_types::boundary::boundary_index;
use pic_types::config::EngineConfig;
use pic_types::error::PicError;
use pic_types::geometry::GeometryMode;

const CONFIG: &str = r#"{
    "geometry": "rz",
    "tile_capacity": 3,
    "rank": 2,
    "species": [
        { "name": "electrons", "extra_real_comps": ["orig_z"] },
        { "name": "protons" }
    ]
}"#;

fn engine() -> MemoryEngine {
    let config = EngineConfig::from_json(CONFIG).expect("valid config");
    MemoryEngine::new(config).expect("engine")
}

#[test]
fn inject_scrape_inspect_clear() {
    let mut eng = engine();
    let geometry = eng.geometry();
    assert_eq!(geometry, GeometryMode::Rz);

    {
        let mut electrons = SpeciesAccessor::from_engine(&mut eng, "electrons").expect("species");
        let z = vec![-2.0, -1.0, 0.0, 1.0, 2.0];
        let input = ParticleInput::new()
            .x(vec![1.0, 2.0, 3.0, 4.0, 5.0])
            .z(z.clone())
            .uz(3.0e7)
            .w(1.0e9)
            .attr("orig_z", z);
        assert_eq!(electrons.add_particles(&input, true).expect("ingest"), 5);
        assert_eq!(electrons.particle_count(true), 5);
        let cpus: Vec<u32> = electrons
            .particle_cpus(0)
            .expect("cpus")
            .iter()
            .flat_map(|t| t.to_vec())
            .collect();
        assert_eq!(cpus, vec![2; 5]);
    }

    let z_lo = boundary_index("z_lo", geometry).expect("rz has z");
    assert_eq!(z_lo, 2);
    let moved = eng
        .scrape_particles("electrons", z_lo, 11, |p| p.pos[1] < 0.0)
        .expect("scrape");
    assert_eq!(moved, 2);

    let mut buffer = BoundaryBufferAccessor::new(&mut eng, geometry).expect("buffer");
    assert_eq!(buffer.buffer_size("electrons", "z_lo", false).expect("size"), 2);
    assert_eq!(buffer.buffer_size("protons", "z_lo", false).expect("size"), 0);

    let structs = buffer.buffer_structs("electrons", "z_lo", 0).expect("structs");
    let radii: Vec<f64> = structs.iter().flat_map(|s| s.pos[0].to_vec()).collect();
    assert_eq!(radii, vec![1.0, 2.0]);
    drop(structs);

    let orig = buffer
        .buffer_component("electrons", "z_lo", "orig_z", 0)
        .expect("orig_z");
    assert_eq!(orig.to_f64_vec(), vec![-2.0, -1.0]);
    let step = buffer
        .buffer_component("electrons", "z_lo", STEP_SCRAPED, 0)
        .expect("step");
    assert_eq!(step.to_f64_vec(), vec![11.0, 11.0]);

    buffer.clear();
    assert_eq!(buffer.buffer_size("electrons", "z_lo", false).expect("size"), 0);

    let electrons = SpeciesAccessor::from_engine(&mut eng, "electrons").expect("species");
    assert_eq!(electrons.particle_count(false), 3);
}

#[test]
fn rz_has_no_y_boundary() {
    let mut eng = engine();
    let buffer = BoundaryBufferAccessor::new(&mut eng, GeometryMode::Rz).expect("buffer");
    match buffer.buffer_size("electrons", "y_hi", false) {
        Err(PicError::ConfigError(msg)) => assert!(msg.contains("rz")),
        other => panic!("Unexpected result: {other:?}"),
    }
    assert_eq!(buffer.boundary_index("eb").expect("eb"), 4);
}

#[test]
fn unknown_species_is_reported() {
    let mut eng = engine();
    assert!(matches!(
        SpeciesAccessor::from_engine(&mut eng, "positrons"),
        Err(PicError::UnknownSpecies(_))
    ));
}
