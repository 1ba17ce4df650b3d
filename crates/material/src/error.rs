//! Error types for material assembly and texture naming.
//!
//! Every error here is fatal to a conversion run.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::keys::{SlotKind, TextureKey};
use crate::modulate::ModulateError;
use crate::source::SourceError;

/// Malformed override records.
#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("unknown overrides in {context}: {}", .keys.join(", "))]
    UnknownKeys {
        context: &'static str,
        keys: Vec<String>,
    },
    #[error("override `{key}` in {context} must be {expected}, found {found}")]
    InvalidValue {
        context: &'static str,
        key: &'static str,
        expected: &'static str,
        found: Value,
    },
    #[error("overrides {} in {context} set the same field", .keys.join(" and "))]
    ConflictingAliases {
        context: &'static str,
        keys: Vec<&'static str>,
    },
    #[error("cannot apply `{key}` in {context}: {error}")]
    Modulate {
        context: &'static str,
        key: &'static str,
        #[source]
        error: ModulateError,
    },
    #[error("unknown blend mode `{0}`, expected OPAQUE, MASK or BLEND")]
    UnknownBlendMode(String),
}

/// Failures while building the material database.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("error while creating material `{material}`: {error}")]
    Override {
        material: String,
        #[source]
        error: OverrideError,
    },
    #[error("error while creating material `{material}`: {error}")]
    Source {
        material: String,
        #[source]
        error: SourceError,
    },
    #[error("not all material overrides consumed, unknown materials: {}", .0.join(", "))]
    UnconsumedOverrides(Vec<String>),
}

/// Failures while folding texture keys into output names.
#[derive(Debug, Error)]
pub enum FoldError {
    #[error("cannot fold {slot} texture {key}: it packs channels from {} different files", .paths.len())]
    CrossFilePacking {
        slot: SlotKind,
        key: TextureKey,
        paths: Vec<PathBuf>,
    },
    #[error("cannot fold {slot} texture {key}: `{}` has no file name", .path.display())]
    NoFileStem {
        slot: SlotKind,
        key: TextureKey,
        path: PathBuf,
    },
    #[error("{slot} output name `{name}` already belongs to {existing}, cannot reuse it for {key}")]
    NameCollision {
        slot: SlotKind,
        name: String,
        existing: TextureKey,
        key: TextureKey,
    },
    #[error("{slot} texture {key} is already registered as `{name}`")]
    DuplicateKey {
        slot: SlotKind,
        key: TextureKey,
        name: String,
    },
}
