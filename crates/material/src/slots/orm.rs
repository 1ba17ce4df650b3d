//! Occlusion, roughness and metalness, derived independently and packed
//! together in that channel order.
//!
//! glTF stores roughness in G and metalness in B of the metallic-roughness
//! texture, so both sub-slots read the same file through different swizzles.

use crate::constants::{DEFAULT_METALNESS, UNIT_STRENGTH};
use crate::error::OverrideError;
use crate::format::TextureFormat;
use crate::overrides::OverrideRecord;
use crate::slots::{TextureRef, apply_slot_override};
use crate::source::{MaterialSource, OcclusionTextureInfo, PbrMetallicRoughness, SourceError, SourceMaterial};
use crate::swizzle::{Channel, SWIZZLE_1, SWIZZLE_B, SWIZZLE_G, SWIZZLE_R};

pub const ORM_FORMAT: TextureFormat = TextureFormat::Bc7Unorm;

#[derive(Debug, Clone, PartialEq)]
pub struct OcclusionSlot {
    pub texture: TextureRef,
    pub strength: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoughnessSlot {
    pub texture: TextureRef,
    pub strength: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetalnessSlot {
    pub texture: TextureRef,
    pub strength: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrmSlot {
    pub occlusion: OcclusionSlot,
    pub roughness: RoughnessSlot,
    pub metalness: MetalnessSlot,
}

impl OrmSlot {
    /// Sub-slot textures in packing order.
    pub fn textures(&self) -> [&TextureRef; 3] {
        [
            &self.occlusion.texture,
            &self.roughness.texture,
            &self.metalness.texture,
        ]
    }
}

/// Slot-level override records for the three sub-slots.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrmOverrides<'a> {
    pub occlusion: Option<&'a OverrideRecord>,
    pub roughness: Option<&'a OverrideRecord>,
    pub metalness: Option<&'a OverrideRecord>,
}

pub fn derive_occlusion(
    info: Option<&OcclusionTextureInfo>,
    source: &dyn MaterialSource,
) -> Result<OcclusionSlot, SourceError> {
    match info {
        Some(info) => Ok(OcclusionSlot {
            texture: TextureRef::from_source(source, info.index, SWIZZLE_R)?,
            strength: info.strength,
        }),
        None => Ok(OcclusionSlot {
            texture: TextureRef::constant(SWIZZLE_1),
            strength: UNIT_STRENGTH,
        }),
    }
}

/// Shared rule of roughness and metalness: the metallic-roughness texture
/// read through `channel`, or a constant with `factor` (or `default`).
fn derive_metallic_roughness(
    pbr: Option<&PbrMetallicRoughness>,
    factor: impl Fn(&PbrMetallicRoughness) -> Option<f32>,
    channel: &[Channel],
    default: f32,
    source: &dyn MaterialSource,
) -> Result<(TextureRef, f32), SourceError> {
    let Some(pbr) = pbr else {
        return Ok((TextureRef::constant(SWIZZLE_1), default));
    };
    match &pbr.metallic_roughness_texture {
        Some(info) => Ok((
            TextureRef::from_source(source, info.index, channel)?,
            factor(pbr).unwrap_or(UNIT_STRENGTH),
        )),
        None => Ok((TextureRef::constant(SWIZZLE_1), factor(pbr).unwrap_or(default))),
    }
}

pub fn derive_roughness(
    pbr: Option<&PbrMetallicRoughness>,
    source: &dyn MaterialSource,
) -> Result<RoughnessSlot, SourceError> {
    let (texture, strength) =
        derive_metallic_roughness(pbr, |pbr| pbr.roughness_factor, SWIZZLE_G, UNIT_STRENGTH, source)?;
    Ok(RoughnessSlot { texture, strength })
}

pub fn derive_metalness(
    pbr: Option<&PbrMetallicRoughness>,
    source: &dyn MaterialSource,
) -> Result<MetalnessSlot, SourceError> {
    let (texture, strength) =
        derive_metallic_roughness(pbr, |pbr| pbr.metallic_factor, SWIZZLE_B, DEFAULT_METALNESS, source)?;
    Ok(MetalnessSlot { texture, strength })
}

pub fn derive(material: &SourceMaterial, source: &dyn MaterialSource) -> Result<OrmSlot, SourceError> {
    let pbr = material.pbr_metallic_roughness.as_ref();
    Ok(OrmSlot {
        occlusion: derive_occlusion(material.occlusion_texture.as_ref(), source)?,
        roughness: derive_roughness(pbr, source)?,
        metalness: derive_metalness(pbr, source)?,
    })
}

pub fn apply_override(
    slot: &mut OrmSlot,
    overrides: OrmOverrides<'_>,
    source: &dyn MaterialSource,
) -> Result<(), OverrideError> {
    let OrmSlot {
        occlusion,
        roughness,
        metalness,
    } = slot;
    apply_slot_override(
        "occlusion",
        overrides.occlusion,
        source,
        &mut occlusion.texture,
        SWIZZLE_R,
        "strength",
        &mut occlusion.strength,
    )?;
    apply_slot_override(
        "roughness",
        overrides.roughness,
        source,
        &mut roughness.texture,
        SWIZZLE_G,
        "strength",
        &mut roughness.strength,
    )?;
    apply_slot_override(
        "metalness",
        overrides.metalness,
        source,
        &mut metalness.texture,
        SWIZZLE_B,
        "strength",
        &mut metalness.strength,
    )
}
