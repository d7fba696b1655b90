// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — Property-Based Tests (proptest) for pic-engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for pic-engine using proptest.
//!
//! Covers: idcpu packing, tile capacity layout, scrape conservation.

use pic_engine::idcpu;
use pic_engine::tile::{ParticleRecord, TileSet};
use proptest::prelude::*;

fn record(v: f64) -> ParticleRecord {
    ParticleRecord {
        pos: vec![v],
        idcpu: idcpu::pack(1, 0),
        real: vec![v],
        int: vec![],
    }
}

// ── idcpu Packing ────────────────────────────────────────────────────

proptest! {
    /// Packing keeps id and cpu recoverable across their full ranges.
    #[test]
    fn idcpu_pack_unpack(
        id in 0u64..=idcpu::MAX_ID,
        cpu in 0u32..(1 << idcpu::CPU_BITS),
    ) {
        let word = idcpu::pack(id, cpu);
        prop_assert_eq!(idcpu::unpack_id(word), id);
        prop_assert_eq!(idcpu::unpack_cpu(word), cpu);
    }
}

// ── Tile Layout ──────────────────────────────────────────────────────

proptest! {
    /// Tiles fill to capacity in order; only the last may be partial.
    #[test]
    fn tiles_fill_in_order(
        n in 0usize..300,
        cap in 1usize..40,
    ) {
        let mut tiles = TileSet::new(1, 1, 0, cap, 1);
        for i in 0..n {
            tiles.push(0, &record(i as f64)).expect("level 0 exists");
        }
        prop_assert_eq!(tiles.len(), n);

        let level = tiles.level(0).expect("level 0 exists");
        prop_assert_eq!(level.len(), n.div_ceil(cap));
        for (k, tile) in level.iter().enumerate() {
            if k + 1 < level.len() {
                prop_assert_eq!(tile.len(), cap);
            } else {
                prop_assert!(tile.len() >= 1 && tile.len() <= cap);
            }
        }

        let flat: Vec<f64> = tiles
            .struct_views(0)
            .expect("level 0 exists")
            .iter()
            .flat_map(|s| s.slot(0).to_vec())
            .collect();
        let expected: Vec<f64> = (0..n).map(|i| i as f64).collect();
        prop_assert_eq!(flat, expected);
    }

    /// Draining moves exactly the matching particles and keeps the rest.
    #[test]
    fn drain_conserves_particles(
        values in prop::collection::vec(-10.0f64..10.0, 0..100),
        cut in -10.0f64..10.0,
    ) {
        let mut tiles = TileSet::new(1, 1, 0, 8, 1);
        for &v in &values {
            tiles.push(0, &record(v)).expect("level 0 exists");
        }
        let mut drained = 0usize;
        for tile in tiles.level_mut(0).expect("level 0 exists").iter_mut() {
            let moved = tile.drain_where(|r| r.pos[0] > cut);
            prop_assert!(moved.iter().all(|r| r.pos[0] > cut));
            drained += moved.len();
        }
        let expected = values.iter().filter(|&&v| v > cut).count();
        prop_assert_eq!(drained, expected);
        prop_assert_eq!(tiles.len(), values.len() - expected);
    }
}
