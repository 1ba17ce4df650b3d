//! Diffuse (base color) slot.

use crate::constants::WHITE_RGBA;
use crate::error::OverrideError;
use crate::format::TextureFormat;
use crate::material::BlendMode;
use crate::overrides::OverrideRecord;
use crate::slots::{TextureRef, apply_slot_override};
use crate::source::{MaterialSource, PbrMetallicRoughness, SourceError};
use crate::swizzle::{Channel, SWIZZLE_1111, SWIZZLE_RGB1, SWIZZLE_RGBA};

#[derive(Debug, Clone, PartialEq)]
pub struct DiffuseSlot {
    pub texture: TextureRef,
    pub strength: [f32; 4],
}

impl DiffuseSlot {
    /// BC1 when alpha is constant one, BC3 otherwise.
    pub fn format(&self) -> TextureFormat {
        match self.texture.swizzle.last() {
            Some(Channel::One) => TextureFormat::Bc1UnormSrgb,
            _ => TextureFormat::Bc3UnormSrgb,
        }
    }
}

/// Opaque materials drop the alpha channel of their base color texture.
fn textured_swizzle(blend_mode: BlendMode) -> &'static [Channel] {
    match blend_mode {
        BlendMode::Opaque => SWIZZLE_RGB1,
        BlendMode::Mask | BlendMode::Blend => SWIZZLE_RGBA,
    }
}

pub fn derive(
    pbr: Option<&PbrMetallicRoughness>,
    blend_mode: BlendMode,
    source: &dyn MaterialSource,
) -> Result<DiffuseSlot, SourceError> {
    let Some(pbr) = pbr else {
        return Ok(DiffuseSlot {
            texture: TextureRef::constant(SWIZZLE_1111),
            strength: WHITE_RGBA,
        });
    };

    let texture = match &pbr.base_color_texture {
        Some(info) => TextureRef::from_source(source, info.index, textured_swizzle(blend_mode))?,
        None => TextureRef::constant(SWIZZLE_1111),
    };
    Ok(DiffuseSlot {
        texture,
        strength: pbr.base_color_factor,
    })
}

pub fn apply_override(
    slot: &mut DiffuseSlot,
    blend_mode: BlendMode,
    raw: Option<&OverrideRecord>,
    source: &dyn MaterialSource,
) -> Result<(), OverrideError> {
    apply_slot_override(
        "diffuse",
        raw,
        source,
        &mut slot.texture,
        textured_swizzle(blend_mode),
        "strength",
        &mut slot.strength,
    )
}
