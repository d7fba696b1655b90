// ─────────────────────────────────────────────────────────────────────
// SCPN PIC Access — Error Types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PicError {
    #[error("Shape mismatch: length of {field} ({len}) doesn't match len of others ({expected})")]
    ShapeMismatch {
        field: String,
        len: usize,
        expected: usize,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Unknown particle component: {0}")]
    UnknownComponent(String),

    #[error("Unknown species: {0}")]
    UnknownSpecies(String),

    #[error("AMR level {level} out of range (num_levels={num_levels})")]
    LevelOutOfRange { level: usize, num_levels: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PicResult<T> = Result<T, PicError>;
