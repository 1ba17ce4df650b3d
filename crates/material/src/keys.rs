//! Structural texture keys and per-slot grouping.
//!
//! Two materials share an output texture exactly when their keys are equal:
//! same channel sources in the same order, same format, same resolution.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::database::MaterialDatabase;
use crate::format::TextureFormat;
use crate::material::{MaterialRecord, Resolution};
use crate::slots::TextureRef;
use crate::slots::emissive::EMISSIVE_FORMAT;
use crate::slots::normal::NORMAL_FORMAT;
use crate::slots::orm::ORM_FORMAT;
use crate::swizzle::Channel;

/// The four packed textures of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Diffuse,
    Normal,
    Orm,
    Emissive,
}

impl SlotKind {
    pub const ALL: [SlotKind; 4] = [SlotKind::Diffuse, SlotKind::Normal, SlotKind::Orm, SlotKind::Emissive];

    pub fn as_str(self) -> &'static str {
        match self {
            SlotKind::Diffuse => "diffuse",
            SlotKind::Normal => "normal",
            SlotKind::Orm => "orm",
            SlotKind::Emissive => "emissive",
        }
    }

    /// Output name of a key that reads no file.
    pub fn default_name(self) -> &'static str {
        match self {
            SlotKind::Diffuse => "$DEFAULT_DIFFUSE",
            SlotKind::Normal => "$DEFAULT_NORMAL",
            SlotKind::Orm => "$DEFAULT_ORM",
            SlotKind::Emissive => "$DEFAULT_EMISSIVE",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One destination channel: a channel of a source file, or a constant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureChannelSource {
    /// Always `None` for constant channels.
    pub path: Option<PathBuf>,
    pub channel: Channel,
}

impl TextureChannelSource {
    pub fn new(path: Option<&Path>, channel: Channel) -> Self {
        Self {
            path: if channel.is_constant() { None } else { path.map(Path::to_path_buf) },
            channel,
        }
    }
}

impl fmt::Display for TextureChannelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}:{}", path.display(), self.channel.as_char()),
            None => write!(f, "{}", self.channel.as_char()),
        }
    }
}

/// Identity of a packed output texture.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureKey {
    pub channels: Vec<TextureChannelSource>,
    pub format: TextureFormat,
    pub resolution: Resolution,
}

impl TextureKey {
    fn from_textures<'a>(
        textures: impl IntoIterator<Item = &'a TextureRef>,
        format: TextureFormat,
        resolution: Resolution,
    ) -> Self {
        let channels = textures
            .into_iter()
            .flat_map(|texture| {
                texture
                    .swizzle
                    .channels()
                    .iter()
                    .map(|channel| TextureChannelSource::new(texture.uri.as_deref(), *channel))
            })
            .collect();
        Self {
            channels,
            format,
            resolution,
        }
    }

    /// Distinct files read by the key.
    pub fn paths(&self) -> BTreeSet<&Path> {
        self.channels
            .iter()
            .filter_map(|source| source.path.as_deref())
            .collect()
    }
}

impl fmt::Display for TextureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, source) in self.channels.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{source}")?;
        }
        write!(f, "] {}", self.format)?;
        if !self.resolution.is_native() {
            write!(f, " @ {}", self.resolution)?;
        }
        Ok(())
    }
}

impl MaterialRecord {
    /// Key of the texture backing `slot`; `None` for an absent emissive slot.
    pub fn texture_key(&self, slot: SlotKind) -> Option<TextureKey> {
        let resolution = self.resolution;
        match slot {
            SlotKind::Diffuse => Some(TextureKey::from_textures(
                [&self.diffuse.texture],
                self.diffuse.format(),
                resolution,
            )),
            SlotKind::Normal => Some(TextureKey::from_textures(
                [&self.normal.texture],
                NORMAL_FORMAT,
                resolution,
            )),
            SlotKind::Orm => Some(TextureKey::from_textures(self.orm.textures(), ORM_FORMAT, resolution)),
            SlotKind::Emissive => self
                .emissive
                .as_ref()
                .map(|emissive| TextureKey::from_textures([&emissive.texture], EMISSIVE_FORMAT, resolution)),
        }
    }
}

/// Materials grouped by shared key, for one slot kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureKeyGroup {
    /// Key -> materials using it, in name order.
    pub materials_by_key: BTreeMap<TextureKey, Vec<String>>,
    /// Material -> its key.
    pub key_by_material: BTreeMap<String, TextureKey>,
}

impl TextureKeyGroup {
    fn insert(&mut self, material: &str, key: TextureKey) {
        self.materials_by_key
            .entry(key.clone())
            .or_default()
            .push(material.to_string());
        self.key_by_material.insert(material.to_string(), key);
    }

    pub fn keys(&self) -> impl Iterator<Item = &TextureKey> {
        self.materials_by_key.keys()
    }
}

/// Key groups of all four slot kinds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureKeyGroups {
    pub diffuse: TextureKeyGroup,
    pub normal: TextureKeyGroup,
    pub orm: TextureKeyGroup,
    pub emissive: TextureKeyGroup,
}

impl TextureKeyGroups {
    pub fn build(database: &MaterialDatabase) -> Self {
        let mut groups = Self::default();
        for record in database.records() {
            for slot in SlotKind::ALL {
                if let Some(key) = record.texture_key(slot) {
                    groups.get_mut(slot).insert(&record.name, key);
                }
            }
        }
        groups
    }

    pub fn get(&self, slot: SlotKind) -> &TextureKeyGroup {
        match slot {
            SlotKind::Diffuse => &self.diffuse,
            SlotKind::Normal => &self.normal,
            SlotKind::Orm => &self.orm,
            SlotKind::Emissive => &self.emissive,
        }
    }

    fn get_mut(&mut self, slot: SlotKind) -> &mut TextureKeyGroup {
        match slot {
            SlotKind::Diffuse => &mut self.diffuse,
            SlotKind::Normal => &mut self.normal,
            SlotKind::Orm => &mut self.orm,
            SlotKind::Emissive => &mut self.emissive,
        }
    }
}
