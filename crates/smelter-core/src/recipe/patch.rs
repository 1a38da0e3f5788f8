// crates/smelter-core/src/recipe/patch.rs

use serde_json::Value;

use crate::error::{Result, SmeltError};

/// The two ordered ingredient lists every recipe document carries.
const INGREDIENT_LISTS: [&str; 2] = ["input", "output"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PatchStats {
    /// Ingredient entries that now carry `byproduct: false`.
    pub flagged: usize,
    /// Entries that already had a `byproduct` value (of any type) before the patch.
    pub overwritten: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VerifyStats {
    pub entries: usize,
    pub missing: usize,
    pub non_bool: usize,
}

impl VerifyStats {
    pub fn is_clean(&self) -> bool {
        self.missing == 0 && self.non_bool == 0
    }
}

/// Set `byproduct: false` on every entry of the `input` and `output` lists.
/// Existing `byproduct` values are overwritten unconditionally; every other
/// key keeps its value and its position. New keys land at the end of the
/// entry, matching insertion order elsewhere in the document.
///
/// Errors when the document root is not an object, when either list is
/// missing or not an array, or when a list element is not an object. The
/// document may be partially modified in that case; callers decide whether
/// to write it back.
pub fn flag_byproducts(doc: &mut Value) -> Result<PatchStats> {
    let Some(obj) = doc.as_object_mut() else {
        return Err(SmeltError::RecipeDoc("document root is not an object".into()));
    };

    let mut stats = PatchStats::default();
    for key in INGREDIENT_LISTS {
        let field = obj
            .get_mut(key)
            .ok_or_else(|| SmeltError::RecipeDoc(format!("missing `{key}` list")))?;
        let entries = field
            .as_array_mut()
            .ok_or_else(|| SmeltError::RecipeDoc(format!("`{key}` is not a list")))?;

        for (idx, entry) in entries.iter_mut().enumerate() {
            let Some(map) = entry.as_object_mut() else {
                return Err(SmeltError::RecipeDoc(format!("`{key}[{idx}]` is not an object")));
            };
            if map.insert("byproduct".to_string(), Value::Bool(false)).is_some() {
                stats.overwritten += 1;
            }
            stats.flagged += 1;
        }
    }

    Ok(stats)
}

/// Count ingredient entries whose `byproduct` flag is absent or non-boolean.
/// Shares the structural requirements of `flag_byproducts`; a document the
/// patch would reject fails verification the same way.
pub fn verify_byproducts(doc: &Value) -> Result<VerifyStats> {
    let Some(obj) = doc.as_object() else {
        return Err(SmeltError::RecipeDoc("document root is not an object".into()));
    };

    let mut stats = VerifyStats::default();
    for key in INGREDIENT_LISTS {
        let field = obj
            .get(key)
            .ok_or_else(|| SmeltError::RecipeDoc(format!("missing `{key}` list")))?;
        let entries = field
            .as_array()
            .ok_or_else(|| SmeltError::RecipeDoc(format!("`{key}` is not a list")))?;

        for (idx, entry) in entries.iter().enumerate() {
            let Some(map) = entry.as_object() else {
                return Err(SmeltError::RecipeDoc(format!("`{key}[{idx}]` is not an object")));
            };
            stats.entries += 1;
            match map.get("byproduct") {
                None => stats.missing += 1,
                Some(Value::Bool(_)) => {}
                Some(_) => stats.non_bool += 1,
            }
        }
    }

    Ok(stats)
}
