//! Recursive merge of nested override records.

use serde_json::{Map, Value};

/// Overwrite `base` with the keys of `overlay`, recursing into nested objects.
///
/// When both sides hold an object under the same key the objects are merged;
/// otherwise `overlay`'s value replaces `base`'s. Keys only present in `base`
/// are left untouched.
pub fn recursive_overwrite(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(Value::Object(inner)), Value::Object(overlay_inner)) => {
                recursive_overwrite(inner, overlay_inner);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}
