//! Override table and exhaustive override-record reading.
//!
//! Override records stay raw JSON objects until a consumer reads them through
//! [`OverrideFields`]. Each read marks a key as recognised; [`OverrideFields::finish`]
//! then diffs the record's key set against the recognised keys, so unknown
//! overrides are reported without mutating the record.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::constants::GLOBAL_OVERRIDE_KEY;
use crate::error::{MaterialError, OverrideError};
use crate::material::MaterialRecord;
use crate::merge::recursive_overwrite;
use crate::modulate::{Modifier, ModulateError, NumericValue, modulate_value};
use crate::source::{MemorySource, SourceMaterial};

/// A single (material or slot level) override record.
pub type OverrideRecord = Map<String, Value>;

/// Per-material override table with the global `*` entry split out.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    named: BTreeMap<String, OverrideRecord>,
    global: OverrideRecord,
    taken: bool,
}

impl OverrideTable {
    /// Split the global entry off a raw `material name -> record` table.
    pub fn new(mut raw: BTreeMap<String, OverrideRecord>) -> Self {
        let global = raw.remove(GLOBAL_OVERRIDE_KEY).unwrap_or_default();
        Self {
            named: raw,
            global,
            taken: false,
        }
    }

    /// Take the override for `material`, with the global entry merged on top.
    ///
    /// The global entry is the overlay, so on conflicting paths its value wins
    /// over the material's own.
    pub fn take(&mut self, material: &str) -> OverrideRecord {
        self.taken = true;
        let mut record = self.named.remove(material).unwrap_or_default();
        recursive_overwrite(&mut record, &self.global);
        record
    }

    /// Fail if any per-material entry was never taken.
    ///
    /// A global entry no material took is still read against a bare
    /// material, so a malformed one fails even for an empty set.
    pub fn finish(self) -> Result<(), MaterialError> {
        if !self.named.is_empty() {
            return Err(MaterialError::UnconsumedOverrides(
                self.named.into_keys().collect(),
            ));
        }
        if !self.taken && !self.global.is_empty() {
            MaterialRecord::assemble(
                &SourceMaterial::named(GLOBAL_OVERRIDE_KEY),
                &MemorySource::default(),
                &self.global,
            )?;
        }
        Ok(())
    }
}

/// Typed, exhaustiveness-checked reader over one override record.
#[derive(Debug)]
pub struct OverrideFields<'a> {
    context: &'static str,
    raw: Option<&'a OverrideRecord>,
    recognised: BTreeSet<&'static str>,
}

impl<'a> OverrideFields<'a> {
    /// `context` names the record in errors (`material`, `diffuse`, ...).
    pub fn new(context: &'static str, raw: Option<&'a OverrideRecord>) -> Self {
        Self {
            context,
            raw,
            recognised: BTreeSet::new(),
        }
    }

    /// Whether a record was supplied at all.
    pub fn is_present(&self) -> bool {
        self.raw.is_some()
    }

    /// Look up a field stored under any of `aliases`.
    pub fn get(&mut self, aliases: &[&'static str]) -> Result<Option<(&'static str, &'a Value)>, OverrideError> {
        self.recognised.extend(aliases.iter().copied());
        let Some(raw) = self.raw else {
            return Ok(None);
        };

        let present: Vec<&'static str> = aliases
            .iter()
            .copied()
            .filter(|alias| raw.contains_key(*alias))
            .collect();

        match present.as_slice() {
            [] => Ok(None),
            [key] => Ok(raw.get(*key).map(|value| (*key, value))),
            _ => Err(OverrideError::ConflictingAliases {
                context: self.context,
                keys: present,
            }),
        }
    }

    /// Nested override record, e.g. a slot record inside a material record.
    pub fn record(&mut self, aliases: &[&'static str]) -> Result<Option<&'a OverrideRecord>, OverrideError> {
        match self.get(aliases)? {
            None => Ok(None),
            Some((_, Value::Object(record))) => Ok(Some(record)),
            Some((key, other)) => Err(self.invalid(key, "an object", other)),
        }
    }

    /// Replacement texture path.
    pub fn uri(&mut self) -> Result<Option<PathBuf>, OverrideError> {
        match self.get(&["uri"])? {
            None => Ok(None),
            Some((_, Value::String(uri))) => Ok(Some(PathBuf::from(uri))),
            Some((key, other)) => Err(self.invalid(key, "a path string", other)),
        }
    }

    pub fn string(&mut self, aliases: &[&'static str]) -> Result<Option<&'a str>, OverrideError> {
        match self.get(aliases)? {
            None => Ok(None),
            Some((_, Value::String(s))) => Ok(Some(s.as_str())),
            Some((key, other)) => Err(self.invalid(key, "a string", other)),
        }
    }

    pub fn bool(&mut self, aliases: &[&'static str]) -> Result<Option<bool>, OverrideError> {
        match self.get(aliases)? {
            None => Ok(None),
            Some((_, Value::Bool(b))) => Ok(Some(*b)),
            Some((key, other)) => Err(self.invalid(key, "a boolean", other)),
        }
    }

    /// A nullable number: `Some(None)` when the override explicitly clears it.
    pub fn nullable_number(&mut self, aliases: &[&'static str]) -> Result<Option<Option<f32>>, OverrideError> {
        match self.get(aliases)? {
            None => Ok(None),
            Some((_, Value::Null)) => Ok(Some(None)),
            Some((key, value)) => match value.as_f64() {
                Some(n) => Ok(Some(Some(n as f32))),
                None => Err(self.invalid(key, "a number or null", value)),
            },
        }
    }

    /// A `[width, height]` integer pair.
    pub fn int_pair(&mut self, aliases: &[&'static str]) -> Result<Option<[i32; 2]>, OverrideError> {
        let Some((key, value)) = self.get(aliases)? else {
            return Ok(None);
        };
        let pair = value.as_array().and_then(|items| match items.as_slice() {
            [w, h] => Some([
                i32::try_from(w.as_i64()?).ok()?,
                i32::try_from(h.as_i64()?).ok()?,
            ]),
            _ => None,
        });
        pair.map(Some)
            .ok_or_else(|| self.invalid(key, "a pair of integers", value))
    }

    /// Apply the modifier stored under `key`, if any, to `value`.
    pub fn modulate<T: NumericValue>(&mut self, key: &'static str, value: &mut T) -> Result<(), OverrideError> {
        let Some((key, raw)) = self.get(&[key])? else {
            return Ok(());
        };
        let context = self.context;
        let error = move |error: ModulateError| OverrideError::Modulate {
            context,
            key,
            error,
        };
        let modifier = Modifier::parse(raw).map_err(error)?;
        *value = modulate_value(*value, &modifier).map_err(error)?;
        Ok(())
    }

    /// Fail with every key of the record that was never asked for.
    pub fn finish(self) -> Result<(), OverrideError> {
        let Some(raw) = self.raw else {
            return Ok(());
        };
        let unknown: Vec<String> = raw
            .keys()
            .filter(|key| !self.recognised.contains(key.as_str()))
            .cloned()
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(OverrideError::UnknownKeys {
                context: self.context,
                keys: unknown,
            })
        }
    }

    fn invalid(&self, key: &'static str, expected: &'static str, found: &Value) -> OverrideError {
        OverrideError::InvalidValue {
            context: self.context,
            key,
            expected,
            found: found.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> OverrideRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn table(value: Value) -> OverrideTable {
        let raw = record(value)
            .into_iter()
            .map(|(k, v)| (k, record(v)))
            .collect();
        OverrideTable::new(raw)
    }

    #[test]
    fn test_global_entry_wins_over_material_entry() {
        let mut overrides = table(json!({
            "*": {"normal": {"scale": 0.5}},
            "Brick": {"normal": {"scale": 2.0, "uri": "brick_n.png"}}
        }));

        let brick = overrides.take("Brick");
        assert_eq!(brick["normal"], json!({"scale": 0.5, "uri": "brick_n.png"}));

        // Materials without their own entry still get the global one
        let other = overrides.take("Stone");
        assert_eq!(other["normal"], json!({"scale": 0.5}));

        assert!(overrides.finish().is_ok());
    }

    #[test]
    fn test_unconsumed_entries_are_listed() {
        let mut overrides = table(json!({"Ghost": {}, "Phantom": {}, "Real": {}}));
        overrides.take("Real");

        match overrides.finish() {
            Err(MaterialError::UnconsumedOverrides(names)) => {
                assert_eq!(names, vec!["Ghost".to_string(), "Phantom".to_string()]);
            }
            other => panic!("expected unconsumed overrides, got {other:?}"),
        }
    }

    #[test]
    fn test_untaken_global_entry_is_checked() {
        let overrides = table(json!({"*": {"double_sided": true, "shininess": 3}}));

        match overrides.finish() {
            Err(MaterialError::Override {
                material,
                error: OverrideError::UnknownKeys { keys, .. },
            }) => {
                assert_eq!(material, "*");
                assert_eq!(keys, vec!["shininess".to_string()]);
            }
            other => panic!("expected unknown keys, got {other:?}"),
        }

        let overrides = table(json!({"*": {"normal": {"scale": {"op": "mult", "value": 0.5}}}}));
        assert!(overrides.finish().is_ok());
    }

    #[test]
    fn test_unknown_keys_are_named() {
        let raw = record(json!({"uri": "a.png", "strenght": 2.0, "tint": 1}));
        let mut fields = OverrideFields::new("diffuse", Some(&raw));
        fields.uri().unwrap();
        fields.get(&["strength"]).unwrap();

        match fields.finish() {
            Err(OverrideError::UnknownKeys { context, keys }) => {
                assert_eq!(context, "diffuse");
                assert_eq!(keys, vec!["strenght".to_string(), "tint".to_string()]);
            }
            other => panic!("expected unknown keys, got {other:?}"),
        }
    }

    #[test]
    fn test_aliases() {
        let raw = record(json!({"doubleSided": true}));
        let mut fields = OverrideFields::new("material", Some(&raw));
        assert_eq!(fields.bool(&["double_sided", "doubleSided"]).unwrap(), Some(true));
        assert!(fields.finish().is_ok());

        let raw = record(json!({"double_sided": true, "doubleSided": false}));
        let mut fields = OverrideFields::new("material", Some(&raw));
        assert!(matches!(
            fields.bool(&["double_sided", "doubleSided"]),
            Err(OverrideError::ConflictingAliases { .. })
        ));
    }

    #[test]
    fn test_typed_reads() {
        let raw = record(json!({
            "resolution": [1024, 512],
            "alpha_cutoff": null,
            "blend_mode": 3
        }));
        let mut fields = OverrideFields::new("material", Some(&raw));

        assert_eq!(fields.int_pair(&["resolution"]).unwrap(), Some([1024, 512]));
        assert_eq!(fields.nullable_number(&["alpha_cutoff"]).unwrap(), Some(None));
        assert!(matches!(
            fields.string(&["blend_mode"]),
            Err(OverrideError::InvalidValue { key: "blend_mode", .. })
        ));
    }

    #[test]
    fn test_modulate_field() {
        let raw = record(json!({"strength": {"op": "mult", "value": 0.5}}));
        let mut fields = OverrideFields::new("occlusion", Some(&raw));
        let mut strength = 0.8_f32;
        fields.modulate("strength", &mut strength).unwrap();
        assert_eq!(strength, 0.4);
        assert!(fields.finish().is_ok());
    }

    #[test]
    fn test_missing_record_reads_nothing() {
        let mut fields = OverrideFields::new("emissive", None);
        assert!(!fields.is_present());
        assert_eq!(fields.uri().unwrap(), None);
        assert!(fields.finish().is_ok());
    }
}
