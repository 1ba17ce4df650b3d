//! Output texture naming.
//!
//! Every unique key of a slot kind is folded to one file name. Keys reading a
//! single file take that file's stem; keys reading no file take the slot's
//! `$DEFAULT_*` name. Packing channels of several files into one texture is
//! not supported and fails.

use std::collections::BTreeMap;

use crate::constants::PACKED_TEXTURE_EXTENSION;
use crate::error::FoldError;
use crate::keys::{SlotKind, TextureKey, TextureKeyGroups};

/// Fold `key` to its output texture name.
///
/// Keys with an explicit resolution get a `_<w>x<h>` suffix so they never
/// collide with the native-resolution key of the same file.
pub fn fold_name(slot: SlotKind, key: &TextureKey) -> Result<String, FoldError> {
    let paths = key.paths();
    let suffix = if key.resolution.is_native() {
        String::new()
    } else {
        format!("_{}", key.resolution)
    };

    let mut paths = paths.into_iter();
    match (paths.next(), paths.next()) {
        (None, _) => Ok(format!("{}{suffix}", slot.default_name())),
        (Some(path), None) => {
            let stem = path.file_stem().ok_or_else(|| FoldError::NoFileStem {
                slot,
                key: key.clone(),
                path: path.to_path_buf(),
            })?;
            Ok(format!(
                "{}{suffix}.{PACKED_TEXTURE_EXTENSION}",
                stem.to_string_lossy()
            ))
        }
        (Some(_), Some(_)) => Err(FoldError::CrossFilePacking {
            slot,
            key: key.clone(),
            paths: key.paths().into_iter().map(|p| p.to_path_buf()).collect(),
        }),
    }
}

/// Bijective key <-> output name map of one slot kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputNameMap {
    name_by_key: BTreeMap<TextureKey, String>,
    key_by_name: BTreeMap<String, TextureKey>,
}

impl OutputNameMap {
    /// Register `key` under `name`. Neither may already be registered.
    pub fn register(&mut self, slot: SlotKind, key: TextureKey, name: String) -> Result<(), FoldError> {
        if let Some(existing) = self.key_by_name.get(&name) {
            return Err(FoldError::NameCollision {
                slot,
                name,
                existing: existing.clone(),
                key,
            });
        }
        if let Some(existing) = self.name_by_key.get(&key) {
            return Err(FoldError::DuplicateKey {
                slot,
                key,
                name: existing.clone(),
            });
        }
        self.key_by_name.insert(name.clone(), key.clone());
        self.name_by_key.insert(key, name);
        Ok(())
    }

    pub fn name(&self, key: &TextureKey) -> Option<&str> {
        self.name_by_key.get(key).map(String::as_str)
    }

    pub fn key(&self, name: &str) -> Option<&TextureKey> {
        self.key_by_name.get(name)
    }

    /// Output names with their keys, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TextureKey)> {
        self.key_by_name.iter().map(|(name, key)| (name.as_str(), key))
    }

    pub fn len(&self) -> usize {
        self.key_by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_by_name.is_empty()
    }
}

/// Output name maps of all four slot kinds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputNames {
    pub diffuse: OutputNameMap,
    pub normal: OutputNameMap,
    pub orm: OutputNameMap,
    pub emissive: OutputNameMap,
}

impl OutputNames {
    pub fn build(groups: &TextureKeyGroups) -> Result<Self, FoldError> {
        let mut names = Self::default();
        for slot in SlotKind::ALL {
            let map = names.get_mut(slot);
            for key in groups.get(slot).keys() {
                map.register(slot, key.clone(), fold_name(slot, key)?)?;
            }
        }
        Ok(names)
    }

    pub fn get(&self, slot: SlotKind) -> &OutputNameMap {
        match slot {
            SlotKind::Diffuse => &self.diffuse,
            SlotKind::Normal => &self.normal,
            SlotKind::Orm => &self.orm,
            SlotKind::Emissive => &self.emissive,
        }
    }

    fn get_mut(&mut self, slot: SlotKind) -> &mut OutputNameMap {
        match slot {
            SlotKind::Diffuse => &mut self.diffuse,
            SlotKind::Normal => &mut self.normal,
            SlotKind::Orm => &mut self.orm,
            SlotKind::Emissive => &mut self.emissive,
        }
    }
}
