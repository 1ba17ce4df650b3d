//! Conversion configuration for DXTF
//!
//! A conversion is described by one JSON document naming the source glTF
//! files, the output directory, per-slot texture compression settings and the
//! per-material override table. Unknown fields are rejected.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Default output subdirectory for packed textures
pub const DEFAULT_TEXTURES_SUBDIR: &str = "textures";

/// Default output subdirectory for material documents
pub const DEFAULT_MATERIALS_SUBDIR: &str = "materials";

/// Default mesh simplification error bound
pub const DEFAULT_SIMPLIFY_ERROR: f32 = 0.01;

/// Default mesh simplification ratio (1.0 = keep every triangle)
pub const DEFAULT_SIMPLIFY_RATIO: f32 = 1.0;

/// Suffix of the compressed glTF document next to each source
pub const COMPRESSED_DOCUMENT_SUFFIX: &str = ".comp.gltf";

/// Errors while loading a conversion configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid conversion configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Conversion configuration lists no sources")]
    NoSources,

    #[error("Source file `{0}` is listed more than once")]
    DuplicateSource(String),
}

/// One source model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSpec {
    /// File stem, relative to the source directory
    pub file: String,
    /// Display name, defaults to `file`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Simplification error bound
    #[serde(default = "default_simplify_error")]
    pub se: f32,
    /// Simplification ratio
    #[serde(default = "default_simplify_ratio")]
    pub si: f32,
}

impl SourceSpec {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name: None,
            se: DEFAULT_SIMPLIFY_ERROR,
            si: DEFAULT_SIMPLIFY_RATIO,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.file)
    }
}

/// Compression settings of one texture slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextureSlotSettings {
    /// Color-space mode, passed through to the texture compressor
    pub srgb: String,
}

/// Compression settings of all four texture slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tex2DdsSettings {
    pub diffuse: TextureSlotSettings,
    pub normal: TextureSlotSettings,
    pub orm: TextureSlotSettings,
    pub emissive: TextureSlotSettings,
}

/// Complete conversion configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvSpec {
    /// Name of the converted set, used for the manifest
    pub name: String,
    pub src_dir: PathBuf,
    pub srcs: Vec<SourceSpec>,
    pub out_dir: PathBuf,
    pub tex2dds_settings: Tex2DdsSettings,
    #[serde(default = "default_textures_subdir")]
    pub dx_textures_subdir: String,
    #[serde(default = "default_materials_subdir")]
    pub dx_materials_subdir: String,
    /// Material name (or `*` for every material) to override record
    #[serde(default)]
    pub material_spec_overrides: BTreeMap<String, Map<String, Value>>,
    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl ConvSpec {
    /// Parse a configuration; relative paths resolve against the working directory.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let spec: ConvSpec = serde_json::from_str(text)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Load a configuration file; relative paths resolve against its directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut spec = Self::from_json(&text)?;
        spec.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        debug!(
            "Loaded conversion `{}` with {} sources from {}",
            spec.name,
            spec.srcs.len(),
            path.display()
        );
        Ok(spec)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.srcs.is_empty() {
            return Err(ConfigError::NoSources);
        }
        let mut seen = std::collections::BTreeSet::new();
        for src in &self.srcs {
            if !seen.insert(src.file.as_str()) {
                return Err(ConfigError::DuplicateSource(src.file.clone()));
            }
        }
        Ok(())
    }

    /// Source directory, resolved against `base_dir`
    pub fn source_dir(&self) -> PathBuf {
        self.base_dir.join(&self.src_dir)
    }

    /// Output directory, resolved against `base_dir`
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.out_dir)
    }

    /// Texture directory under [`ConvSpec::output_dir`], with forward slashes
    pub fn dx_textures_path(&self) -> String {
        forward_slashes(&self.output_dir().join(&self.dx_textures_subdir))
    }

    /// Material directory under [`ConvSpec::output_dir`], with forward slashes
    pub fn dx_materials_path(&self) -> String {
        forward_slashes(&self.output_dir().join(&self.dx_materials_subdir))
    }

    /// Compressed glTF document of `src`
    pub fn source_document(&self, src: &SourceSpec) -> PathBuf {
        self.source_dir()
            .join(format!("{}{COMPRESSED_DOCUMENT_SUFFIX}", src.file))
    }
}

/// Render a path with `/` separators on every platform.
pub fn forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn default_simplify_error() -> f32 {
    DEFAULT_SIMPLIFY_ERROR
}

fn default_simplify_ratio() -> f32 {
    DEFAULT_SIMPLIFY_RATIO
}

fn default_textures_subdir() -> String {
    DEFAULT_TEXTURES_SUBDIR.to_string()
}

fn default_materials_subdir() -> String {
    DEFAULT_MATERIALS_SUBDIR.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "name": "sponza",
            "src_dir": "gltf",
            "srcs": [{"file": "main"}, {"file": "curtains", "name": "Curtains", "se": 0.001}],
            "out_dir": "out",
            "tex2dds_settings": {
                "diffuse": {"srgb": "force"},
                "normal": {"srgb": "none"},
                "orm": {"srgb": "none"},
                "emissive": {"srgb": "none"}
            }
        })
    }

    #[test]
    fn test_defaults() {
        let spec = ConvSpec::from_json(&minimal().to_string()).unwrap();

        assert_eq!(spec.dx_textures_subdir, DEFAULT_TEXTURES_SUBDIR);
        assert_eq!(spec.dx_materials_subdir, DEFAULT_MATERIALS_SUBDIR);
        assert!(spec.material_spec_overrides.is_empty());
        assert_eq!(spec.srcs[0].se, DEFAULT_SIMPLIFY_ERROR);
        assert_eq!(spec.srcs[0].si, DEFAULT_SIMPLIFY_RATIO);
        assert!((spec.srcs[1].se - 0.001).abs() < 1e-6);
        assert_eq!(spec.tex2dds_settings.diffuse.srgb, "force");
    }

    #[test]
    fn test_paths() {
        let mut spec = ConvSpec::from_json(&minimal().to_string()).unwrap();
        assert_eq!(spec.dx_textures_path(), "out/textures");
        assert_eq!(spec.dx_materials_path(), "out/materials");
        assert_eq!(spec.source_document(&spec.srcs[0]), PathBuf::from("gltf/main.comp.gltf"));

        spec.base_dir = PathBuf::from("project");
        assert_eq!(
            spec.source_document(&spec.srcs[1]),
            PathBuf::from("project/gltf/curtains.comp.gltf")
        );
        assert_eq!(spec.output_dir(), PathBuf::from("project/out"));
        assert_eq!(spec.dx_textures_path(), "project/out/textures");
        assert_eq!(spec.dx_materials_path(), "project/out/materials");
    }

    #[test]
    fn test_display_name() {
        let spec = ConvSpec::from_json(&minimal().to_string()).unwrap();
        assert_eq!(spec.srcs[0].display_name(), "main");
        assert_eq!(spec.srcs[1].display_name(), "Curtains");
    }

    #[test]
    fn test_overrides_are_kept_raw() {
        let mut value = minimal();
        value["material_spec_overrides"] = json!({
            "*": {"resolution": [512, 512]},
            "Fabric": {"diffuse": {"strength": {"op": "mult", "value": 0.5}}}
        });
        let spec = ConvSpec::from_json(&value.to_string()).unwrap();

        assert_eq!(spec.material_spec_overrides.len(), 2);
        assert_eq!(spec.material_spec_overrides["*"]["resolution"], json!([512, 512]));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let mut value = minimal();
        value["texture_dir"] = json!("tex");
        assert!(matches!(
            ConvSpec::from_json(&value.to_string()),
            Err(ConfigError::Parse(_))
        ));

        let mut value = minimal();
        value["srcs"][0]["lod"] = json!(2);
        assert!(matches!(
            ConvSpec::from_json(&value.to_string()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_source_list_is_validated() {
        let mut value = minimal();
        value["srcs"] = json!([]);
        assert!(matches!(
            ConvSpec::from_json(&value.to_string()),
            Err(ConfigError::NoSources)
        ));

        value["srcs"] = json!([{"file": "main"}, {"file": "main"}]);
        assert!(matches!(
            ConvSpec::from_json(&value.to_string()),
            Err(ConfigError::DuplicateSource(file)) if file == "main"
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ConvSpec::from_file("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
