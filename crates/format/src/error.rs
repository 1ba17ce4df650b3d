//! Error types for building output documents.

use dxtf_material::{SlotKind, TextureFormat};

/// Errors that can occur while building output documents.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Material `{material}` has no {slot} texture")]
    MissingTexture { material: String, slot: SlotKind },

    #[error("Texture `{name}` packs {found} channels but {format} holds {expected}")]
    TooManyChannels {
        name: String,
        format: TextureFormat,
        expected: usize,
        found: usize,
    },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}
