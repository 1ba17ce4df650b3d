//! Texture slot derivation.
//!
//! Each slot is a plain data record with two free functions in its module:
//! `derive` builds the record from source data and `apply_override` routes a
//! slot-level override record into it.
//!
//! - [`diffuse`] - base color, 4 channels
//! - [`normal`] - tangent-space normal, 2 channels
//! - [`orm`] - occlusion, roughness and metalness packed into one texture
//! - [`emissive`] - emissive color, 3 channels

pub mod diffuse;
pub mod emissive;
pub mod normal;
pub mod orm;

use std::path::PathBuf;

use crate::error::OverrideError;
use crate::modulate::NumericValue;
use crate::overrides::{OverrideFields, OverrideRecord};
use crate::source::{MaterialSource, SourceError};
use crate::swizzle::{Channel, Swizzle};

pub use diffuse::DiffuseSlot;
pub use emissive::EmissiveSlot;
pub use normal::NormalSlot;
pub use orm::{MetalnessSlot, OcclusionSlot, OrmSlot, RoughnessSlot};

/// Source file (if any) and swizzle of one slot texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRef {
    pub uri: Option<PathBuf>,
    pub swizzle: Swizzle,
}

impl TextureRef {
    /// A texture made only of constant channels.
    pub fn constant(swizzle: &[Channel]) -> Self {
        Self {
            uri: None,
            swizzle: Swizzle::new(swizzle),
        }
    }

    /// Resolve texture `index` of `source` and read it through `swizzle`.
    pub fn from_source(source: &dyn MaterialSource, index: usize, swizzle: &[Channel]) -> Result<Self, SourceError> {
        Ok(Self {
            uri: Some(source.texture_path(index)?),
            swizzle: Swizzle::new(swizzle),
        })
    }
}

/// Apply a slot override record shared by every slot kind.
///
/// `uri` replaces the texture path, resolved through `source`, and forces
/// `textured` as swizzle; `value_key` is modulated into `value`. Any other
/// key is an error.
pub(crate) fn apply_slot_override<T: NumericValue>(
    context: &'static str,
    raw: Option<&OverrideRecord>,
    source: &dyn MaterialSource,
    texture: &mut TextureRef,
    textured: &[Channel],
    value_key: &'static str,
    value: &mut T,
) -> Result<(), OverrideError> {
    let mut fields = OverrideFields::new(context, raw);
    if let Some(uri) = fields.uri()? {
        texture.uri = Some(source.override_path(&uri));
        texture.swizzle = Swizzle::new(textured);
    }
    fields.modulate(value_key, value)?;
    fields.finish()
}
