// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — Particle id/cpu Packing
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! 64-bit `idcpu` word: particle id in the upper 40 bits, owning cpu in
//! the lower 24.

use ndarray::{Array1, ArrayView1};

pub const CPU_BITS: u32 = 24;
pub const CPU_MASK: u64 = (1 << CPU_BITS) - 1;
/// Largest id representable in the 40-bit id field.
pub const MAX_ID: u64 = (1 << (64 - CPU_BITS)) - 1;

pub fn pack(id: u64, cpu: u32) -> u64 {
    ((id & MAX_ID) << CPU_BITS) | (u64::from(cpu) & CPU_MASK)
}

pub fn unpack_id(idcpu: u64) -> u64 {
    idcpu >> CPU_BITS
}

pub fn unpack_cpu(idcpu: u64) -> u32 {
    (idcpu & CPU_MASK) as u32
}

pub fn unpack_ids(idcpu: ArrayView1<'_, u64>) -> Array1<u64> {
    idcpu.mapv(unpack_id)
}

pub fn unpack_cpus(idcpu: ArrayView1<'_, u64>) -> Array1<u32> {
    idcpu.mapv(unpack_cpu)
}
