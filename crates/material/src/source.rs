//! Source material model.
//!
//! Mirrors the material entries of a glTF 2.0 document closely enough to tell
//! "not declared" apart from "declared with the default value", which the
//! slot derivation rules depend on.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::constants::{UNIT_STRENGTH, WHITE_RGBA};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("texture {index} of `{label}` cannot be resolved: {reason}")]
    UnresolvedTexture {
        label: String,
        index: usize,
        reason: String,
    },
}

/// Reference to a texture by index into the document's texture list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextureInfo {
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NormalTextureInfo {
    pub index: usize,
    #[serde(default = "unit_strength")]
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OcclusionTextureInfo {
    pub index: usize,
    #[serde(default = "unit_strength")]
    pub strength: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    #[serde(default = "white")]
    pub base_color_factor: [f32; 4],
    pub base_color_texture: Option<TextureInfo>,
    pub metallic_factor: Option<f32>,
    pub roughness_factor: Option<f32>,
    pub metallic_roughness_texture: Option<TextureInfo>,
}

impl Default for PbrMetallicRoughness {
    fn default() -> Self {
        Self {
            base_color_factor: WHITE_RGBA,
            base_color_texture: None,
            metallic_factor: None,
            roughness_factor: None,
            metallic_roughness_texture: None,
        }
    }
}

/// One material entry of a source document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMaterial {
    pub name: String,
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,
    pub normal_texture: Option<NormalTextureInfo>,
    pub occlusion_texture: Option<OcclusionTextureInfo>,
    pub emissive_texture: Option<TextureInfo>,
    pub emissive_factor: Option<[f32; 3]>,
    #[serde(default = "opaque")]
    pub alpha_mode: String,
    pub alpha_cutoff: Option<f32>,
    #[serde(default)]
    pub double_sided: bool,
}

impl SourceMaterial {
    /// A material declaring nothing but its name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pbr_metallic_roughness: None,
            normal_texture: None,
            occlusion_texture: None,
            emissive_texture: None,
            emissive_factor: None,
            alpha_mode: opaque(),
            alpha_cutoff: None,
            double_sided: false,
        }
    }
}

fn unit_strength() -> f32 {
    UNIT_STRENGTH
}

fn white() -> [f32; 4] {
    WHITE_RGBA
}

fn opaque() -> String {
    "OPAQUE".to_string()
}

/// A document that provides materials and resolves their texture indices.
pub trait MaterialSource {
    /// Name used in diagnostics, usually the source file.
    fn label(&self) -> &str;

    fn materials(&self) -> &[SourceMaterial];

    /// File path of the image behind texture `index`.
    fn texture_path(&self, index: usize) -> Result<PathBuf, SourceError>;

    /// Path of a texture named by an override `uri`, in the same form as
    /// [`MaterialSource::texture_path`] returns.
    fn override_path(&self, uri: &Path) -> PathBuf {
        uri.to_path_buf()
    }
}

/// A source whose texture paths are already known.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub label: String,
    pub materials: Vec<SourceMaterial>,
    pub textures: Vec<PathBuf>,
}

impl MaterialSource for MemorySource {
    fn label(&self) -> &str {
        &self.label
    }

    fn materials(&self) -> &[SourceMaterial] {
        &self.materials
    }

    fn texture_path(&self, index: usize) -> Result<PathBuf, SourceError> {
        self.textures
            .get(index)
            .cloned()
            .ok_or_else(|| SourceError::UnresolvedTexture {
                label: self.label.clone(),
                index,
                reason: format!("only {} textures declared", self.textures.len()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gltf_material_defaults() {
        let material: SourceMaterial = serde_json::from_value(json!({
            "name": "Plain",
            "pbrMetallicRoughness": {},
            "normalTexture": {"index": 2},
            "extensions": {"KHR_materials_emissive_strength": {}}
        }))
        .unwrap();

        assert_eq!(material.alpha_mode, "OPAQUE");
        assert!(!material.double_sided);
        assert_eq!(material.normal_texture.unwrap().scale, 1.0);
        let pbr = material.pbr_metallic_roughness.unwrap();
        assert_eq!(pbr.base_color_factor, WHITE_RGBA);
        assert_eq!(pbr.roughness_factor, None);
        assert_eq!(material.emissive_factor, None);
    }

    #[test]
    fn test_memory_source_resolves_indices() {
        let source = MemorySource {
            label: "scene".to_string(),
            materials: vec![],
            textures: vec![PathBuf::from("tex/a.png")],
        };

        assert_eq!(source.texture_path(0).unwrap(), PathBuf::from("tex/a.png"));
        assert!(matches!(
            source.texture_path(3),
            Err(SourceError::UnresolvedTexture { index: 3, .. })
        ));
    }
}
