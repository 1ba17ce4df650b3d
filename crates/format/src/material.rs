//! Per-material documents.

use dxtf_material::{BlendMode, MaterialRecord, MaterialTextureTable, SlotKind};
use serde::Serialize;

use crate::error::FormatError;

/// Extension of material documents
pub const MATERIAL_EXTENSION: &str = "dxtf_mat";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DxtfDiffuse {
    pub texture: String,
    pub strength: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DxtfNormal {
    pub texture: String,
    pub strength: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DxtfOrm {
    pub texture: String,
    pub occlusion_strength: f32,
    pub roughness_strength: f32,
    pub metalness_strength: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DxtfEmissive {
    pub texture: String,
    pub strength: [f32; 3],
}

/// A material as the runtime reads it.
///
/// The name is carried by the file name, not the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DxtfMaterial {
    #[serde(skip)]
    pub name: String,
    pub diffuse: DxtfDiffuse,
    pub normal: DxtfNormal,
    pub orm: DxtfOrm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissive: Option<DxtfEmissive>,
    pub blend_mode: BlendMode,
    /// Only written for MASK materials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_cutoff: Option<f32>,
    pub double_sided: bool,
}

impl DxtfMaterial {
    /// Combine a material record with its output texture names.
    pub fn new(record: &MaterialRecord, textures: &MaterialTextureTable) -> Result<Self, FormatError> {
        let texture = |slot: SlotKind| {
            textures
                .texture(&record.name, slot)
                .map(str::to_string)
                .ok_or_else(|| FormatError::MissingTexture {
                    material: record.name.clone(),
                    slot,
                })
        };

        let emissive = match &record.emissive {
            Some(emissive) => Some(DxtfEmissive {
                texture: texture(SlotKind::Emissive)?,
                strength: emissive.factor,
            }),
            None => None,
        };

        Ok(Self {
            name: record.name.clone(),
            diffuse: DxtfDiffuse {
                texture: texture(SlotKind::Diffuse)?,
                strength: record.diffuse.strength,
            },
            normal: DxtfNormal {
                texture: texture(SlotKind::Normal)?,
                strength: record.normal.scale,
            },
            orm: DxtfOrm {
                texture: texture(SlotKind::Orm)?,
                occlusion_strength: record.orm.occlusion.strength,
                roughness_strength: record.orm.roughness.strength,
                metalness_strength: record.orm.metalness.strength,
            },
            emissive,
            blend_mode: record.blend_mode,
            alpha_cutoff: match record.blend_mode {
                BlendMode::Mask => record.alpha_cutoff,
                BlendMode::Opaque | BlendMode::Blend => None,
            },
            double_sided: record.double_sided,
        })
    }

    /// `<name>.dxtf_mat`
    pub fn file_name(&self) -> String {
        format!("{}.{MATERIAL_EXTENSION}", self.name)
    }

    pub fn to_json(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
