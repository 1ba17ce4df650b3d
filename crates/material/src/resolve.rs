//! Material -> output texture lookup.

use std::collections::BTreeMap;

use crate::fold::OutputNames;
use crate::keys::{SlotKind, TextureKeyGroups};

/// Output texture name of every slot of every material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialTextureTable {
    textures: BTreeMap<String, BTreeMap<SlotKind, String>>,
}

impl MaterialTextureTable {
    /// Compose material -> key and key -> name.
    pub fn build(groups: &TextureKeyGroups, names: &OutputNames) -> Self {
        let mut textures: BTreeMap<String, BTreeMap<SlotKind, String>> = BTreeMap::new();
        for slot in SlotKind::ALL {
            let names = names.get(slot);
            for (material, key) in &groups.get(slot).key_by_material {
                if let Some(name) = names.name(key) {
                    textures
                        .entry(material.clone())
                        .or_default()
                        .insert(slot, name.to_string());
                }
            }
        }
        Self { textures }
    }

    pub fn texture(&self, material: &str, slot: SlotKind) -> Option<&str> {
        self.textures
            .get(material)
            .and_then(|slots| slots.get(&slot))
            .map(String::as_str)
    }

    /// All slots of `material`.
    pub fn material(&self, material: &str) -> Option<&BTreeMap<SlotKind, String>> {
        self.textures.get(material)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<SlotKind, String>)> {
        self.textures.iter().map(|(name, slots)| (name.as_str(), slots))
    }
}
