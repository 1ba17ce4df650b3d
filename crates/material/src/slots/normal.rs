//! Normal map slot. Without a texture the flat normal `hh` is packed.

use crate::constants::UNIT_STRENGTH;
use crate::error::OverrideError;
use crate::format::TextureFormat;
use crate::overrides::OverrideRecord;
use crate::slots::{TextureRef, apply_slot_override};
use crate::source::{MaterialSource, NormalTextureInfo, SourceError};
use crate::swizzle::{SWIZZLE_HH, SWIZZLE_RG};

pub const NORMAL_FORMAT: TextureFormat = TextureFormat::Bc5Unorm;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalSlot {
    pub texture: TextureRef,
    pub scale: f32,
}

pub fn derive(info: Option<&NormalTextureInfo>, source: &dyn MaterialSource) -> Result<NormalSlot, SourceError> {
    match info {
        Some(info) => Ok(NormalSlot {
            texture: TextureRef::from_source(source, info.index, SWIZZLE_RG)?,
            scale: info.scale,
        }),
        None => Ok(NormalSlot {
            texture: TextureRef::constant(SWIZZLE_HH),
            scale: UNIT_STRENGTH,
        }),
    }
}

pub fn apply_override(
    slot: &mut NormalSlot,
    raw: Option<&OverrideRecord>,
    source: &dyn MaterialSource,
) -> Result<(), OverrideError> {
    apply_slot_override("normal", raw, source, &mut slot.texture, SWIZZLE_RG, "scale", &mut slot.scale)
}
