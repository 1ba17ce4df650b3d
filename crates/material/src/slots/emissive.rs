//! Emissive slot. Only present when the source or the override asks for it.

use crate::constants::WHITE_RGB;
use crate::error::OverrideError;
use crate::format::TextureFormat;
use crate::overrides::OverrideRecord;
use crate::slots::{TextureRef, apply_slot_override};
use crate::source::{MaterialSource, SourceError, SourceMaterial};
use crate::swizzle::{SWIZZLE_111, SWIZZLE_RGB};

pub const EMISSIVE_FORMAT: TextureFormat = TextureFormat::Bc6hUf16;

#[derive(Debug, Clone, PartialEq)]
pub struct EmissiveSlot {
    pub texture: TextureRef,
    pub factor: [f32; 3],
}

/// `None` unless the material declares an emissive texture or factor, or
/// `overridden` is set.
pub fn derive(
    material: &SourceMaterial,
    overridden: bool,
    source: &dyn MaterialSource,
) -> Result<Option<EmissiveSlot>, SourceError> {
    let texture = match &material.emissive_texture {
        Some(info) => TextureRef::from_source(source, info.index, SWIZZLE_RGB)?,
        None if material.emissive_factor.is_some() || overridden => TextureRef::constant(SWIZZLE_111),
        None => return Ok(None),
    };
    Ok(Some(EmissiveSlot {
        texture,
        factor: material.emissive_factor.unwrap_or(WHITE_RGB),
    }))
}

pub fn apply_override(
    slot: &mut EmissiveSlot,
    raw: Option<&OverrideRecord>,
    source: &dyn MaterialSource,
) -> Result<(), OverrideError> {
    apply_slot_override("emissive", raw, source, &mut slot.texture, SWIZZLE_RGB, "factor", &mut slot.factor)
}
