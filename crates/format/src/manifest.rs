//! Conversion manifest.

use dxtf_config::ConvSpec;
use serde::Serialize;

use crate::error::FormatError;

/// Extension of the manifest document
pub const MANIFEST_EXTENSION: &str = "dxtf_mdm";

/// Extension of mesh structure documents
pub const MESH_STRUCTURE_EXTENSION: &str = "dxtf_mds";

/// Extension of mesh binaries
pub const MESH_BINARY_EXTENSION: &str = "dxtf_mdl";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestModel {
    pub name: String,
    pub file: String,
}

/// Index of a converted set: where its textures and materials live and which
/// models it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub name: String,
    pub textures_path: String,
    pub materials_path: String,
    pub models: Vec<ManifestModel>,
}

impl Manifest {
    pub fn new(spec: &ConvSpec) -> Self {
        Self {
            name: spec.name.clone(),
            textures_path: spec.dx_textures_subdir.clone(),
            materials_path: spec.dx_materials_subdir.clone(),
            models: spec
                .srcs
                .iter()
                .map(|src| ManifestModel {
                    name: src.display_name().to_string(),
                    file: format!("{}.{MESH_STRUCTURE_EXTENSION}", src.file),
                })
                .collect(),
        }
    }

    /// `<name>.dxtf_mdm`
    pub fn file_name(&self) -> String {
        format!("{}.{MANIFEST_EXTENSION}", self.name)
    }

    pub fn to_json(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
