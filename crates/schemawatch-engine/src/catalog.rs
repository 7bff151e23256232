//! Read-only lookups over entity documents.
//!
//! Used by the `lookup` and `list` subcommands. All queries are total:
//! absent or oddly-shaped collections read as empty.

use crate::source::EntitySource;
use schemawatch_core::errors::{ExError, ExErrorKind, Result};
use schemawatch_core::extract::{ACTIONS_KEY, CONDITION_KEYS_KEY, RESOURCES_KEY};
use schemawatch_core::model::Node;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

const NAME_KEY: &str = "Name";
const ACTION_CONDITION_KEYS_KEY: &str = "ActionConditionKeys";
const ARN_FORMATS_KEY: &str = "ARNFormats";
/// Prefix of catalog-wide keys shared by every entity
pub const GLOBAL_KEY_PREFIX: &str = "aws:";
/// Resource name returned for actions that do not scope to resources
pub const ALL_RESOURCES: &str = "*";

/// A resource with its ARN formats and resource-level condition keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDetail {
    pub name: String,
    pub arn_formats: Vec<String>,
    pub condition_keys: Vec<String>,
}

/// Context keys split by scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextKeySplit {
    pub global_keys: BTreeSet<String>,
    pub service_keys: BTreeSet<String>,
}

/// Counts describing one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySummary {
    pub name: String,
    pub actions: usize,
    pub resources: usize,
    pub condition_keys: usize,
    pub context_keys: usize,
    pub global_keys: usize,
    pub service_keys: usize,
}

/// One fetched entity document with lookup helpers.
#[derive(Debug, Clone)]
pub struct EntityDocument {
    name: String,
    root: Node,
}

fn name_of(node: &Node) -> Option<&str> {
    node.get(NAME_KEY).as_str()
}

impl EntityDocument {
    pub fn new(name: impl Into<String>, root: Node) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn actions(&self) -> impl Iterator<Item = &Node> {
        self.root.get(ACTIONS_KEY).entries()
    }

    fn resources(&self) -> impl Iterator<Item = &Node> {
        self.root.get(RESOURCES_KEY).entries()
    }

    fn action(&self, action: &str) -> Result<&Node> {
        self.actions()
            .find(|a| name_of(a) == Some(action))
            .ok_or_else(|| {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("lookup_action")
                    .with_entity(self.name.clone())
                    .with_message(format!("action `{}` not found", action))
            })
    }

    /// Action names in document order.
    pub fn action_names(&self) -> Vec<String> {
        self.actions()
            .filter_map(name_of)
            .map(str::to_string)
            .collect()
    }

    /// Resources an action applies to; `*` when it lists none.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the action does not exist.
    pub fn resources_for_action(&self, action: &str) -> Result<Vec<String>> {
        let resources = self.action(action)?.get(RESOURCES_KEY);
        if resources.is_missing() {
            return Ok(vec![ALL_RESOURCES.to_string()]);
        }
        Ok(resources
            .entries()
            .filter_map(name_of)
            .map(str::to_string)
            .collect())
    }

    /// Condition keys declared on one action.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the action does not exist.
    pub fn action_condition_keys(&self, action: &str) -> Result<Vec<String>> {
        Ok(self
            .action(action)?
            .get(ACTION_CONDITION_KEYS_KEY)
            .string_items()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Entity-level condition key names.
    pub fn condition_keys(&self) -> Vec<String> {
        self.root
            .get(CONDITION_KEYS_KEY)
            .entries()
            .filter_map(name_of)
            .map(str::to_string)
            .collect()
    }

    /// All resources with ARN formats normalized to a list.
    pub fn resource_details(&self) -> Vec<ResourceDetail> {
        self.resources()
            .filter(|r| r.as_mapping().is_some())
            .map(|r| ResourceDetail {
                name: name_of(r).unwrap_or("Unknown").to_string(),
                arn_formats: r
                    .get(ARN_FORMATS_KEY)
                    .string_items()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                condition_keys: r
                    .get(CONDITION_KEYS_KEY)
                    .string_items()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect()
    }

    pub fn resource_detail(&self, resource: &str) -> Option<ResourceDetail> {
        self.resource_details()
            .into_iter()
            .find(|r| r.name == resource)
    }

    /// Every condition key usable with this entity: entity, action and
    /// resource level combined.
    pub fn all_context_keys(&self) -> BTreeSet<String> {
        let mut keys: BTreeSet<String> = self.condition_keys().into_iter().collect();
        for action in self.actions() {
            keys.extend(
                action
                    .get(ACTION_CONDITION_KEYS_KEY)
                    .string_items()
                    .into_iter()
                    .map(str::to_string),
            );
        }
        for resource in self.resources() {
            keys.extend(
                resource
                    .get(CONDITION_KEYS_KEY)
                    .string_items()
                    .into_iter()
                    .map(str::to_string),
            );
        }
        keys
    }

    pub fn split_context_keys(&self) -> ContextKeySplit {
        split_keys(self.all_context_keys())
    }

    pub fn summary(&self) -> EntitySummary {
        let split = self.split_context_keys();
        EntitySummary {
            name: self.name.clone(),
            actions: self.action_names().len(),
            resources: self.resource_details().len(),
            condition_keys: self.condition_keys().len(),
            context_keys: split.global_keys.len() + split.service_keys.len(),
            global_keys: split.global_keys.len(),
            service_keys: split.service_keys.len(),
        }
    }
}

/// Split keys into global (`aws:` prefix) and service-specific.
pub fn split_keys(keys: impl IntoIterator<Item = String>) -> ContextKeySplit {
    let mut split = ContextKeySplit::default();
    for key in keys {
        if key.starts_with(GLOBAL_KEY_PREFIX) {
            split.global_keys.insert(key);
        } else {
            split.service_keys.insert(key);
        }
    }
    split
}

/// Context keys of every listed entity, by entity name.
///
/// Entities with no context keys are left out. An entity that cannot be
/// fetched or read is skipped with a warning, like a monitor sample.
///
/// # Errors
///
/// Returns the source error when it is not specific to one entity, such as
/// `ExternalService` for an unreachable index.
pub fn context_keys_by_entity(
    source: &dyn EntitySource,
    names: &[String],
) -> Result<BTreeMap<String, BTreeSet<String>>> {
    let mut by_entity = BTreeMap::new();
    for name in names {
        let root = match source.fetch_document(name) {
            Ok(root) => root,
            Err(err) if err.kind().is_per_entity() => {
                tracing::warn!(entity = %name, code = err.code(), "skipping entity: {}", err);
                continue;
            }
            Err(err) => return Err(err),
        };
        let keys = EntityDocument::new(name.as_str(), root).all_context_keys();
        if !keys.is_empty() {
            by_entity.insert(name.clone(), keys);
        }
    }
    Ok(by_entity)
}

/// Catalog names resembling `query`, for "did you mean" hints.
pub fn similar_names(catalog: &[String], query: &str, limit: usize) -> Vec<String> {
    let query = query.to_ascii_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    catalog
        .iter()
        .filter(|name| {
            let name = name.to_ascii_lowercase();
            name.contains(&query) || query.contains(&name)
        })
        .take(limit)
        .cloned()
        .collect()
}
