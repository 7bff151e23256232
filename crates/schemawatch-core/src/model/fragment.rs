//! Structural summary of one entity document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The closed set of levels whose field names are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TopLevel,
    Action,
    Resource,
    ConditionKey,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::TopLevel,
        Category::Action,
        Category::Resource,
        Category::ConditionKey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::TopLevel => "top_level",
            Category::Action => "action",
            Category::Resource => "resource",
            Category::ConditionKey => "condition_key",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collection an observed field combination came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationContext {
    Action,
    Resource,
    ConditionKey,
}

impl CombinationContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            CombinationContext::Action => "action",
            CombinationContext::Resource => "resource",
            CombinationContext::ConditionKey => "condition_key",
        }
    }
}

impl From<CombinationContext> for Category {
    fn from(context: CombinationContext) -> Self {
        match context {
            CombinationContext::Action => Category::Action,
            CombinationContext::Resource => Category::Resource,
            CombinationContext::ConditionKey => Category::ConditionKey,
        }
    }
}

/// The exact set of keys present together on one collection entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldCombination {
    pub context: CombinationContext,
    /// Sorted, deduplicated key names
    pub fields: Vec<String>,
}

impl FieldCombination {
    pub fn new<I, S>(context: CombinationContext, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: BTreeSet<String> = keys.into_iter().map(Into::into).collect();
        Self {
            context,
            fields: fields.into_iter().collect(),
        }
    }
}

impl fmt::Display for FieldCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.context.as_str(), self.fields.join(", "))
    }
}

/// Field-name sets, value-type tags and field combinations of one or more documents.
///
/// Produced per entity by the extractor and unioned by the aggregator. The
/// same shape is flattened into the on-disk fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureFragment {
    pub top_level_fields: BTreeSet<String>,
    pub action_fields: BTreeSet<String>,
    pub resource_fields: BTreeSet<String>,
    pub condition_key_fields: BTreeSet<String>,
    pub data_types: BTreeSet<String>,
    #[serde(default)]
    pub field_combinations: BTreeSet<FieldCombination>,
}

impl StructureFragment {
    pub fn fields(&self, category: Category) -> &BTreeSet<String> {
        match category {
            Category::TopLevel => &self.top_level_fields,
            Category::Action => &self.action_fields,
            Category::Resource => &self.resource_fields,
            Category::ConditionKey => &self.condition_key_fields,
        }
    }

    pub fn fields_mut(&mut self, category: Category) -> &mut BTreeSet<String> {
        match category {
            Category::TopLevel => &mut self.top_level_fields,
            Category::Action => &mut self.action_fields,
            Category::Resource => &mut self.resource_fields,
            Category::ConditionKey => &mut self.condition_key_fields,
        }
    }

    /// Union every set of `other` into `self`.
    pub fn merge(&mut self, other: &StructureFragment) {
        for category in Category::ALL {
            self.fields_mut(category)
                .extend(other.fields(category).iter().cloned());
        }
        self.data_types.extend(other.data_types.iter().cloned());
        self.field_combinations
            .extend(other.field_combinations.iter().cloned());
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.fields(*c).is_empty())
            && self.data_types.is_empty()
            && self.field_combinations.is_empty()
    }
}
