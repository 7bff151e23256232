//! Structure extraction.
//!
//! Reduces one entity document to a [`StructureFragment`]. Only four levels
//! are inspected: the document's own keys and the entries of the `Actions`,
//! `Resources` and `ConditionKeys` collections. Anything nested deeper is
//! ignored.

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::document::Node;
use crate::model::fragment::{Category, CombinationContext, FieldCombination, StructureFragment};

pub const ACTIONS_KEY: &str = "Actions";
pub const RESOURCES_KEY: &str = "Resources";
pub const CONDITION_KEYS_KEY: &str = "ConditionKeys";
/// Value-type tags declared on a condition key entry
pub const TYPES_KEY: &str = "Types";

const COLLECTIONS: [(&str, CombinationContext); 3] = [
    (ACTIONS_KEY, CombinationContext::Action),
    (RESOURCES_KEY, CombinationContext::Resource),
    (CONDITION_KEYS_KEY, CombinationContext::ConditionKey),
];

/// Extract the structural fragment of one document.
///
/// Absent or empty collections contribute nothing. Collection entries that
/// are not mappings are skipped.
///
/// # Errors
///
/// - `MalformedDocument`: the document is not a mapping at the top level
pub fn extract(document: &Node) -> Result<StructureFragment> {
    let top = document.as_mapping().ok_or_else(|| {
        ExError::new(ExErrorKind::MalformedDocument)
            .with_op("extract")
            .with_message(format!(
                "document root must be a mapping, got {}",
                document.kind_name()
            ))
    })?;

    let mut fragment = StructureFragment {
        top_level_fields: top.keys().cloned().collect(),
        ..Default::default()
    };

    for (key, context) in COLLECTIONS {
        for entry in document.get(key).entries() {
            if entry.as_mapping().is_none() {
                continue;
            }
            record_entry(&mut fragment, context, entry);
        }
    }

    Ok(fragment)
}

/// Convenience wrapper for callers holding a `serde_json::Value`.
///
/// # Errors
///
/// See [`extract`].
pub fn extract_value(value: serde_json::Value) -> Result<StructureFragment> {
    extract(&Node::from(value))
}

fn record_entry(fragment: &mut StructureFragment, context: CombinationContext, entry: &Node) {
    fragment
        .fields_mut(Category::from(context))
        .extend(entry.keys().map(str::to_string));
    fragment
        .field_combinations
        .insert(FieldCombination::new(context, entry.keys()));

    if context == CombinationContext::ConditionKey {
        fragment.data_types.extend(
            entry
                .get(TYPES_KEY)
                .string_items()
                .into_iter()
                .map(str::to_string),
        );
    }
}
