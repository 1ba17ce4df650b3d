//! Canonical material records.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::constants::DEFAULT_ALPHA_CUTOFF;
use crate::error::{MaterialError, OverrideError};
use crate::overrides::{OverrideFields, OverrideRecord};
use crate::slots::orm::OrmOverrides;
use crate::slots::{DiffuseSlot, EmissiveSlot, NormalSlot, OrmSlot, diffuse, emissive, normal, orm};
use crate::source::{MaterialSource, SourceMaterial};

/// How the renderer treats a material's alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlendMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

impl BlendMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BlendMode::Opaque => "OPAQUE",
            BlendMode::Mask => "MASK",
            BlendMode::Blend => "BLEND",
        }
    }
}

impl FromStr for BlendMode {
    type Err = OverrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OPAQUE" => Ok(BlendMode::Opaque),
            "MASK" => Ok(BlendMode::Mask),
            "BLEND" => Ok(BlendMode::Blend),
            _ => Err(OverrideError::UnknownBlendMode(s.to_string())),
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target texture resolution; serializes as `[width, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Resolution(pub i32, pub i32);

impl Resolution {
    /// Keep the source texture's own size.
    pub const NATIVE: Resolution = Resolution(-1, -1);

    pub fn width(self) -> i32 {
        self.0
    }

    pub fn height(self) -> i32 {
        self.1
    }

    pub fn is_native(self) -> bool {
        self == Self::NATIVE
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::NATIVE
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.0, self.1)
    }
}

/// One fully resolved material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRecord {
    pub name: String,
    /// Label of the source the material was taken from.
    pub source: String,
    pub diffuse: DiffuseSlot,
    pub normal: NormalSlot,
    pub orm: OrmSlot,
    pub emissive: Option<EmissiveSlot>,
    pub blend_mode: BlendMode,
    /// Only set for [`BlendMode::Mask`].
    pub alpha_cutoff: Option<f32>,
    pub double_sided: bool,
    pub resolution: Resolution,
}

impl MaterialRecord {
    /// Build the record for `material`, consuming every key of `overrides`.
    pub fn assemble(
        material: &SourceMaterial,
        source: &dyn MaterialSource,
        overrides: &OverrideRecord,
    ) -> Result<Self, MaterialError> {
        let name = &material.name;
        let override_error = |error: OverrideError| MaterialError::Override {
            material: name.clone(),
            error,
        };
        let source_error = |error| MaterialError::Source {
            material: name.clone(),
            error,
        };

        let mut fields = OverrideFields::new("material", Some(overrides));

        let blend_mode = match fields.string(&["blend_mode", "blendMode"]).map_err(override_error)? {
            Some(mode) => mode.parse::<BlendMode>(),
            None => material.alpha_mode.parse::<BlendMode>(),
        }
        .map_err(override_error)?;

        let alpha_cutoff = fields
            .nullable_number(&["alpha_cutoff", "alphaCutoff"])
            .map_err(override_error)?
            .unwrap_or(material.alpha_cutoff);
        let alpha_cutoff = match blend_mode {
            BlendMode::Mask => Some(alpha_cutoff.unwrap_or(DEFAULT_ALPHA_CUTOFF)),
            BlendMode::Opaque | BlendMode::Blend => None,
        };

        let double_sided = fields
            .bool(&["double_sided", "doubleSided"])
            .map_err(override_error)?
            .unwrap_or(material.double_sided);

        let resolution = fields
            .int_pair(&["resolution"])
            .map_err(override_error)?
            .map_or(Resolution::NATIVE, |[w, h]| Resolution(w, h));

        let mut slot_override = |key: &'static str| fields.record(&[key]).map_err(override_error);
        let diffuse_override = slot_override("diffuse")?;
        let normal_override = slot_override("normal")?;
        let orm_overrides = OrmOverrides {
            occlusion: slot_override("occlusion")?,
            roughness: slot_override("roughness")?,
            metalness: slot_override("metalness")?,
        };
        let emissive_override = slot_override("emissive")?;

        let pbr = material.pbr_metallic_roughness.as_ref();

        let mut diffuse = diffuse::derive(pbr, blend_mode, source).map_err(source_error)?;
        diffuse::apply_override(&mut diffuse, blend_mode, diffuse_override, source).map_err(override_error)?;

        let mut normal = normal::derive(material.normal_texture.as_ref(), source).map_err(source_error)?;
        normal::apply_override(&mut normal, normal_override, source).map_err(override_error)?;

        let mut orm = orm::derive(material, source).map_err(source_error)?;
        orm::apply_override(&mut orm, orm_overrides, source).map_err(override_error)?;

        let mut emissive =
            emissive::derive(material, emissive_override.is_some(), source).map_err(source_error)?;
        if let Some(slot) = emissive.as_mut() {
            emissive::apply_override(slot, emissive_override, source).map_err(override_error)?;
        }

        fields.finish().map_err(override_error)?;

        Ok(Self {
            name: name.clone(),
            source: source.label().to_string(),
            diffuse,
            normal,
            orm,
            emissive,
            blend_mode,
            alpha_cutoff,
            double_sided,
            resolution,
        })
    }
}
