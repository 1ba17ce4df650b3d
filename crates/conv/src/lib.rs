//! glTF to DXTF conversion pipeline
//!
//! [`convert`] runs every stage in order over already loaded sources:
//! material records, texture keys, output names, the material to texture
//! table, and finally the output documents. Nothing is written to disk; the
//! caller decides what to do with [`ConversionOutput::documents`].

use std::path::{Path, PathBuf};

use dxtf_config::{ConfigError, ConvSpec};
use dxtf_format::{DxtfMaterial, FormatError, MESH_STRUCTURE_EXTENSION, Manifest, Tex2DdsJob};
use dxtf_gltf::{GltfError, GltfSource};
use dxtf_material::{
    ConversionEvent, FoldError, MaterialDatabase, MaterialError, MaterialTextureTable, OutputNames, OverrideTable,
    Reporter, SlotKind, TextureKeyGroups,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConvError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Gltf(#[from] GltfError),

    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error(transparent)]
    Fold(#[from] FoldError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Failed to serialize `{file}`: {source}")]
    Serialize {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Mesh-structure document of one source.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshDocument {
    /// Source file stem
    pub file: String,
    pub document: Value,
}

impl MeshDocument {
    /// `<file>.dxtf_mds`
    pub fn file_name(&self) -> String {
        format!("{}.{MESH_STRUCTURE_EXTENSION}", self.file)
    }
}

/// Everything a conversion run produces.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// In material name order
    pub materials: Vec<DxtfMaterial>,
    /// Diffuse, normal, orm then emissive jobs, each in output name order
    pub texture_jobs: Vec<Tex2DdsJob>,
    /// In source order
    pub meshes: Vec<MeshDocument>,
    pub manifest: Manifest,
}

impl ConversionOutput {
    /// Destination path and serialized text of every document.
    ///
    /// Material documents land in the materials directory, mesh documents
    /// and the manifest in the output directory. Texture jobs are not files.
    pub fn documents(&self, spec: &ConvSpec) -> Result<Vec<(PathBuf, String)>, ConvError> {
        let out_dir = spec.output_dir();
        let materials_dir = PathBuf::from(spec.dx_materials_path());

        let mut documents = Vec::with_capacity(self.materials.len() + self.meshes.len() + 1);
        for material in &self.materials {
            documents.push((materials_dir.join(material.file_name()), material.to_json()?));
        }
        for mesh in &self.meshes {
            let text = serde_json::to_string(&mesh.document).map_err(|source| ConvError::Serialize {
                file: mesh.file_name(),
                source,
            })?;
            documents.push((out_dir.join(mesh.file_name()), text));
        }
        documents.push((out_dir.join(self.manifest.file_name()), self.manifest.to_json()?));
        Ok(documents)
    }
}

/// Load the compressed document of every source, in configuration order.
pub fn load_sources(spec: &ConvSpec) -> Result<Vec<GltfSource>, ConvError> {
    spec.srcs
        .iter()
        .map(|src| GltfSource::load(spec, src).map_err(ConvError::from))
        .collect()
}

/// Load the configuration at `path` and its sources, then convert them.
///
/// Relative paths in the configuration resolve against its directory.
pub fn convert_file(
    path: impl AsRef<Path>,
    reporter: &dyn Reporter,
) -> Result<(ConvSpec, ConversionOutput), ConvError> {
    let spec = ConvSpec::from_file(path)?;
    let sources = load_sources(&spec)?;
    let output = convert(&spec, &sources, reporter)?;
    Ok((spec, output))
}

/// Convert `sources` under `spec`.
///
/// The first fatal error aborts the run. Warnings go to `reporter`.
pub fn convert(spec: &ConvSpec, sources: &[GltfSource], reporter: &dyn Reporter) -> Result<ConversionOutput, ConvError> {
    info!("Converting {} ({} sources)", spec.name, sources.len());

    let overrides = OverrideTable::new(spec.material_spec_overrides.clone());
    let database = MaterialDatabase::build(sources, overrides, reporter)?;

    let groups = TextureKeyGroups::build(&database);
    let names = OutputNames::build(&groups)?;
    for slot in SlotKind::ALL {
        reporter.report(ConversionEvent::OutputTexturesNamed {
            slot,
            count: names.get(slot).len(),
        });
    }

    let table = MaterialTextureTable::build(&groups, &names);
    let materials = database
        .records()
        .map(|record| DxtfMaterial::new(record, &table))
        .collect::<Result<Vec<_>, _>>()?;

    let texture_jobs = Tex2DdsJob::build_all(&names, &spec.dx_textures_path(), &spec.tex2dds_settings, reporter)?;

    let meshes = sources
        .iter()
        .map(|source| {
            debug!("Building mesh structure of {}", source.name);
            Ok(MeshDocument {
                file: source.file.clone(),
                document: source.as_dxtf()?,
            })
        })
        .collect::<Result<Vec<_>, ConvError>>()?;

    let manifest = Manifest::new(spec);

    reporter.report(ConversionEvent::DocumentsBuilt {
        materials: materials.len(),
        textures: texture_jobs.len(),
        models: meshes.len(),
    });

    Ok(ConversionOutput {
        materials,
        texture_jobs,
        meshes,
        manifest,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use dxtf_config::SourceSpec;
    use dxtf_material::{FoldError, OverrideError, RecordingReporter, TextureFormat};
    use serde_json::json;

    use super::*;

    fn spec(overrides: Value) -> ConvSpec {
        ConvSpec::from_json(
            &json!({
                "name": "sponza",
                "src_dir": "gltf",
                "srcs": [{"file": "main"}, {"file": "curtains", "name": "Curtains"}],
                "out_dir": "out",
                "tex2dds_settings": {
                    "diffuse": {"srgb": "force"},
                    "normal": {"srgb": "none"},
                    "orm": {"srgb": "none"},
                    "emissive": {"srgb": "none"}
                },
                "material_spec_overrides": overrides
            })
            .to_string(),
        )
        .unwrap()
    }

    fn sources(spec: &ConvSpec) -> Vec<GltfSource> {
        let main = json!({
            "asset": {"version": "2.0"},
            "buffers": [{"uri": "main.comp.bin", "byteLength": 64}],
            "materials": [
                {
                    "name": "Brick",
                    "pbrMetallicRoughness": {"baseColorTexture": {"index": 0}},
                    "normalTexture": {"index": 1}
                },
                {"name": "Floor"}
            ],
            "textures": [{"source": 0}, {"source": 1}],
            "images": [{"uri": "tex/brick.png"}, {"uri": "tex/brick_n.png"}]
        });
        let curtains = json!({
            "asset": {"version": "2.0"},
            "buffers": [{"uri": "curtains.comp.bin", "byteLength": 32}],
            "materials": [
                {"name": "Brick"},
                {
                    "name": "Curtain",
                    "alphaMode": "MASK",
                    "pbrMetallicRoughness": {"baseColorTexture": {"index": 0}}
                }
            ],
            "textures": [{"source": 0}],
            "images": [{"uri": "tex/curtain.png"}]
        });

        [main, curtains]
            .iter()
            .zip(&spec.srcs)
            .map(|(document, src)| GltfSource::from_spec_json(&document.to_string(), spec, src).unwrap())
            .collect()
    }

    #[test]
    fn test_convert() {
        let spec = spec(json!({"Floor": {"double_sided": true}}));
        let reporter = RecordingReporter::new();

        let output = convert(&spec, &sources(&spec), &reporter).unwrap();

        let names: Vec<&str> = output.materials.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Brick", "Curtain", "Floor"]);
        assert_eq!(output.materials[0].diffuse.texture, "brick.dds");
        assert_eq!(output.materials[0].normal.texture, "brick_n.dds");
        assert_eq!(output.materials[1].diffuse.texture, "curtain.dds");
        assert_eq!(output.materials[1].alpha_cutoff, Some(0.5));
        assert_eq!(output.materials[2].diffuse.texture, "$DEFAULT_DIFFUSE");
        assert!(output.materials[2].double_sided);

        let jobs: Vec<(&str, TextureFormat)> = output
            .texture_jobs
            .iter()
            .map(|job| (job.output_path.as_str(), job.format))
            .collect();
        assert_eq!(
            jobs,
            vec![
                ("out/textures/brick.dds", TextureFormat::Bc1UnormSrgb),
                ("out/textures/curtain.dds", TextureFormat::Bc3UnormSrgb),
                ("out/textures/brick_n.dds", TextureFormat::Bc5Unorm),
            ]
        );
        assert_eq!(
            output.texture_jobs[0].channels[0].file.as_deref(),
            Some("gltf/tex/brick.png")
        );

        assert_eq!(output.meshes.len(), 2);
        assert_eq!(output.meshes[1].file_name(), "curtains.dxtf_mds");
        assert_eq!(output.meshes[1].document["buffers"][0]["uri"], "curtains.dxtf_mdl");
        assert_eq!(output.manifest.models[1].name, "Curtains");
    }

    #[test]
    fn test_convert_reports_progress() {
        let spec = spec(json!({}));
        let reporter = RecordingReporter::new();

        convert(&spec, &sources(&spec), &reporter).unwrap();

        let events = reporter.events();
        assert!(events.contains(&ConversionEvent::DuplicateMaterial {
            material: "Brick".to_string(),
            kept_from: "main".to_string(),
            skipped_from: "curtains".to_string(),
        }));
        assert!(events.contains(&ConversionEvent::OutputTexturesNamed {
            slot: SlotKind::Diffuse,
            count: 3,
        }));
        assert_eq!(
            events.last(),
            Some(&ConversionEvent::DocumentsBuilt {
                materials: 3,
                textures: 3,
                models: 2,
            })
        );
    }

    #[test]
    fn test_unknown_override_aborts() {
        let spec = spec(json!({"Ghost": {"double_sided": true}}));

        let result = convert(&spec, &sources(&spec), &RecordingReporter::new());

        assert!(matches!(
            result,
            Err(ConvError::Material(MaterialError::UnconsumedOverrides(names))) if names == vec!["Ghost".to_string()]
        ));
    }

    #[test]
    fn test_malformed_override_aborts() {
        let spec = spec(json!({"Brick": {"blend_mode": "ADDITIVE"}}));

        let result = convert(&spec, &sources(&spec), &RecordingReporter::new());

        assert!(matches!(
            result,
            Err(ConvError::Material(MaterialError::Override {
                error: OverrideError::UnknownBlendMode(_),
                ..
            }))
        ));
    }

    #[test]
    fn test_conflicting_output_names_abort() {
        // BLEND keeps alpha, so the same file is wanted as both BC1 and BC3
        let spec = spec(json!({"Floor": {"blend_mode": "BLEND", "diffuse": {"uri": "gltf/tex/brick.png"}}}));

        let result = convert(&spec, &sources(&spec), &RecordingReporter::new());

        assert!(matches!(
            result,
            Err(ConvError::Fold(FoldError::NameCollision { slot: SlotKind::Diffuse, .. }))
        ));
    }

    #[test]
    fn test_documents() {
        let spec = spec(json!({}));
        let output = convert(&spec, &sources(&spec), &RecordingReporter::new()).unwrap();

        let documents = output.documents(&spec).unwrap();
        let paths: Vec<&Path> = documents.iter().map(|(path, _)| path.as_path()).collect();

        assert_eq!(
            paths,
            vec![
                Path::new("out/materials/Brick.dxtf_mat"),
                Path::new("out/materials/Curtain.dxtf_mat"),
                Path::new("out/materials/Floor.dxtf_mat"),
                Path::new("out/main.dxtf_mds"),
                Path::new("out/curtains.dxtf_mds"),
                Path::new("out/sponza.dxtf_mdm"),
            ]
        );
        let manifest: Value = serde_json::from_str(&documents[5].1).unwrap();
        assert_eq!(manifest["materials_path"], "materials");
    }

    #[test]
    fn test_paths_follow_the_config_directory() {
        // Floor names Brick's image relative to the configuration
        let mut spec = spec(json!({"Floor": {"diffuse": {"uri": "gltf/tex/brick.png"}}}));
        spec.base_dir = PathBuf::from("project");

        let output = convert(&spec, &sources(&spec), &RecordingReporter::new()).unwrap();

        assert_eq!(output.materials[0].diffuse.texture, "brick.dds");
        assert_eq!(output.materials[2].diffuse.texture, "brick.dds");
        let brick = &output.texture_jobs[0];
        assert_eq!(brick.output_path, "project/out/textures/brick.dds");
        assert_eq!(brick.channels[0].file.as_deref(), Some("project/gltf/tex/brick.png"));

        let documents = output.documents(&spec).unwrap();
        let material_dir = documents[0].0.parent().unwrap();
        let texture_dir = Path::new(&brick.output_path).parent().unwrap();
        assert_eq!(material_dir, Path::new("project/out/materials"));
        assert_eq!(material_dir.parent(), texture_dir.parent());
    }

    #[test]
    fn test_convert_file() {
        let dir = std::env::temp_dir().join(format!("dxtf-conv-{}", std::process::id()));
        fs::create_dir_all(dir.join("gltf")).unwrap();
        fs::write(
            dir.join("gltf/main.comp.gltf"),
            json!({
                "asset": {"version": "2.0"},
                "buffers": [{"uri": "main.comp.bin", "byteLength": 64}],
                "materials": [
                    {"name": "Brick", "pbrMetallicRoughness": {"baseColorTexture": {"index": 0}}},
                    {"name": "Floor"}
                ],
                "textures": [{"source": 0}],
                "images": [{"uri": "tex/brick.png"}]
            })
            .to_string(),
        )
        .unwrap();
        let config = dir.join("sponza.json");
        fs::write(
            &config,
            json!({
                "name": "sponza",
                "src_dir": "gltf",
                "srcs": [{"file": "main"}],
                "out_dir": "out",
                "tex2dds_settings": {
                    "diffuse": {"srgb": "force"},
                    "normal": {"srgb": "none"},
                    "orm": {"srgb": "none"},
                    "emissive": {"srgb": "none"}
                },
                "material_spec_overrides": {"Floor": {"diffuse": {"uri": "gltf/tex/brick.png"}}}
            })
            .to_string(),
        )
        .unwrap();

        let result = convert_file(&config, &RecordingReporter::new());
        fs::remove_dir_all(&dir).ok();
        let (spec, output) = result.unwrap();

        assert_eq!(spec.base_dir, dir);
        assert_eq!(output.texture_jobs.len(), 1);
        assert_eq!(
            output.texture_jobs[0].channels[0].file,
            Some(dxtf_config::forward_slashes(&dir.join("gltf").join("tex/brick.png")))
        );
        assert_eq!(output.materials[1].diffuse.texture, "brick.dds");
    }

    #[test]
    fn test_convert_file_missing_config() {
        assert!(matches!(
            convert_file("/nonexistent/dxtf/sponza.json", &RecordingReporter::new()),
            Err(ConvError::Config(ConfigError::Read { .. }))
        ));
    }

    #[test]
    fn test_load_sources_missing_file() {
        let mut spec = spec(json!({}));
        spec.base_dir = PathBuf::from("/nonexistent/dxtf");
        spec.srcs = vec![SourceSpec::new("main")];

        assert!(matches!(load_sources(&spec), Err(ConvError::Gltf(GltfError::Read { .. }))));
    }
}
