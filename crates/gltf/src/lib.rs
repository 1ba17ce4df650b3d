//! Compressed glTF source documents
//!
//! A [`GltfSource`] is one `<src_dir>/<file>.comp.gltf` document. It feeds its
//! material entries to the material engine and turns itself into the DXTF
//! mesh-structure document once textures live elsewhere.

use std::path::{Path, PathBuf};

use dxtf_config::{ConvSpec, SourceSpec};
use dxtf_format::MESH_BINARY_EXTENSION;
use dxtf_material::{MaterialSource, SourceError, SourceMaterial};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Buffer suffix written by the mesh compressor
pub const COMPRESSED_BINARY_SUFFIX: &str = ".comp.bin";

/// Top-level keys dropped from the mesh-structure document
const TEXTURE_KEYS: [&str; 3] = ["textures", "images", "samplers"];

#[derive(Debug, Error)]
pub enum GltfError {
    #[error("Failed to read `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse glTF document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid glTF document `{file}`: {reason}")]
    Invalid { file: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
struct GltfTexture {
    source: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
struct GltfImage {
    uri: Option<String>,
}

/// The parts of a glTF document the converter reads.
#[derive(Debug, Clone, Default, Deserialize)]
struct GltfTables {
    #[serde(default)]
    materials: Vec<SourceMaterial>,
    #[serde(default)]
    textures: Vec<GltfTexture>,
    #[serde(default)]
    images: Vec<GltfImage>,
}

/// One loaded source document.
#[derive(Debug, Clone)]
pub struct GltfSource {
    /// Source file stem, without the `.comp.gltf` suffix
    pub file: String,
    /// Display name of the model
    pub name: String,
    /// Directory image URIs are relative to
    pub src_dir: PathBuf,
    /// Directory override URIs are relative to
    pub base_dir: PathBuf,
    document: Value,
    tables: GltfTables,
}

impl GltfSource {
    /// Load the compressed document of `src`.
    pub fn load(spec: &ConvSpec, src: &SourceSpec) -> Result<Self, GltfError> {
        let path = spec.source_document(src);
        debug!("Loading glTF document {}", path.display());
        let text = std::fs::read_to_string(&path).map_err(|source| GltfError::Read { path, source })?;
        Self::from_spec_json(&text, spec, src)
    }

    /// Parse the document text of `src`, with paths resolved the way `spec` does.
    pub fn from_spec_json(text: &str, spec: &ConvSpec, src: &SourceSpec) -> Result<Self, GltfError> {
        let mut source = Self::from_json(text, spec.source_dir(), src)?;
        source.base_dir = spec.base_dir.clone();
        Ok(source)
    }

    pub fn from_json(text: &str, src_dir: impl Into<PathBuf>, src: &SourceSpec) -> Result<Self, GltfError> {
        let document: Value = serde_json::from_str(text)?;
        if !document.is_object() {
            return Err(GltfError::Invalid {
                file: src.file.clone(),
                reason: "document is not a JSON object".to_string(),
            });
        }
        let tables = GltfTables::deserialize(&document)?;

        Ok(Self {
            file: src.file.clone(),
            name: src.display_name().to_string(),
            src_dir: src_dir.into(),
            base_dir: PathBuf::new(),
            document,
            tables,
        })
    }

    /// The parsed document as loaded.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// The mesh-structure document: texture tables removed, buffers pointed
    /// at the mesh binaries and materials reduced to their names.
    pub fn as_dxtf(&self) -> Result<Value, GltfError> {
        let mut dxtf = self.document.clone();
        let Some(root) = dxtf.as_object_mut() else {
            return Err(self.invalid("document is not a JSON object"));
        };

        for key in TEXTURE_KEYS {
            root.remove(key);
        }

        if let Some(buffers) = root.get_mut("buffers") {
            let Some(buffers) = buffers.as_array_mut() else {
                return Err(self.invalid("`buffers` is not an array"));
            };
            for buffer in buffers {
                if let Some(Value::String(uri)) = buffer.get_mut("uri") {
                    *uri = uri.replace(COMPRESSED_BINARY_SUFFIX, &format!(".{MESH_BINARY_EXTENSION}"));
                }
            }
        }

        if let Some(materials) = root.get_mut("materials") {
            let Some(materials) = materials.as_array_mut() else {
                return Err(self.invalid("`materials` is not an array"));
            };
            for material in materials.iter_mut().filter_map(Value::as_object_mut) {
                material.retain(|key, _| key == "name");
            }
        }

        Ok(dxtf)
    }

    fn invalid(&self, reason: &str) -> GltfError {
        GltfError::Invalid {
            file: self.file.clone(),
            reason: reason.to_string(),
        }
    }

    fn unresolved(&self, index: usize, reason: String) -> SourceError {
        SourceError::UnresolvedTexture {
            label: self.file.clone(),
            index,
            reason,
        }
    }
}

impl MaterialSource for GltfSource {
    fn label(&self) -> &str {
        &self.file
    }

    fn materials(&self) -> &[SourceMaterial] {
        &self.tables.materials
    }

    fn texture_path(&self, index: usize) -> Result<PathBuf, SourceError> {
        let texture = self
            .tables
            .textures
            .get(index)
            .ok_or_else(|| self.unresolved(index, format!("only {} textures", self.tables.textures.len())))?;
        let image_index = texture
            .source
            .ok_or_else(|| self.unresolved(index, "texture has no image source".to_string()))?;
        let image = self
            .tables
            .images
            .get(image_index)
            .ok_or_else(|| self.unresolved(index, format!("image {image_index} does not exist")))?;
        let uri = image
            .uri
            .as_deref()
            .ok_or_else(|| self.unresolved(index, format!("image {image_index} has no uri")))?;

        Ok(self.src_dir.join(Path::new(uri)))
    }

    fn override_path(&self, uri: &Path) -> PathBuf {
        self.base_dir.join(uri)
    }
}
