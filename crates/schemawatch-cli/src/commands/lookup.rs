//! Lookup command

use super::{CommandResult, SourceArgs};
use clap::{Args, ValueEnum};
use schemawatch_core::errors::{ExError, ExErrorKind};
use schemawatch_core::render::EXIT_OK;
use schemawatch_engine::catalog::{similar_names, ContextKeySplit, EntityDocument, ResourceDetail};
use schemawatch_engine::EntitySource;
use serde_json::{json, Value};
use std::collections::BTreeSet;

const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LookupFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Entity name
    pub entity: String,

    /// Show resources and condition keys of one action
    #[arg(long, conflicts_with_all = ["resources", "context_keys", "resource"])]
    pub action: Option<String>,

    /// Show one resource with its ARN formats and condition keys
    #[arg(long, value_name = "NAME", conflicts_with_all = ["resources", "context_keys", "count"])]
    pub resource: Option<String>,

    /// Show resources with ARN formats and condition keys
    #[arg(long, conflicts_with = "context_keys")]
    pub resources: bool,

    /// Show every context key usable with the entity
    #[arg(long)]
    pub context_keys: bool,

    /// Only global (`aws:`) context keys
    #[arg(long, requires = "context_keys", conflicts_with = "service_only")]
    pub global_only: bool,

    /// Only service-specific context keys
    #[arg(long, requires = "context_keys")]
    pub service_only: bool,

    /// Print only how many items the selected view lists
    #[arg(long)]
    pub count: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub format: LookupFormat,
}

/// Rendered forms of one lookup, plus the item count for `--count`.
struct View {
    text: String,
    value: Value,
    count: usize,
}

pub fn execute(source_args: &SourceArgs, args: LookupArgs) -> CommandResult {
    let source = source_args.build()?;
    let document = fetch_entity(source.as_ref(), &args.entity)?;

    let view = if let Some(action) = &args.action {
        let resources = document.resources_for_action(action)?;
        let condition_keys = document.action_condition_keys(action)?;
        let mut text = format!("{} {}\n", document.name(), action);
        text.push_str(&format!("  resources: {}\n", list_or_none(&resources)));
        text.push_str(&format!("  condition keys: {}\n", list_or_none(&condition_keys)));
        View {
            text,
            count: resources.len(),
            value: json!({"action": action, "resources": resources, "condition_keys": condition_keys}),
        }
    } else if let Some(resource) = &args.resource {
        let detail = document.resource_detail(resource).ok_or_else(|| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("lookup_resource")
                .with_entity(document.name())
                .with_message(format!("resource `{}` not found", resource))
        })?;
        View {
            text: resource_text(&detail),
            count: 1,
            value: serde_json::to_value(&detail)?,
        }
    } else if args.resources {
        let details = document.resource_details();
        View {
            text: details.iter().map(resource_text).collect(),
            count: details.len(),
            value: serde_json::to_value(&details)?,
        }
    } else if args.context_keys {
        let ContextKeySplit {
            global_keys,
            service_keys,
        } = document.split_context_keys();
        let keys: BTreeSet<String> = if args.global_only {
            global_keys
        } else if args.service_only {
            service_keys
        } else {
            global_keys.into_iter().chain(service_keys).collect()
        };
        View {
            text: keys.iter().map(|k| format!("{}\n", k)).collect(),
            count: keys.len(),
            value: serde_json::to_value(&keys)?,
        }
    } else {
        let summary = document.summary();
        let text = format!(
            "{}\n  actions: {}\n  resources: {}\n  condition keys: {}\n  context keys: {} ({} global, {} service-specific)\n",
            summary.name,
            summary.actions,
            summary.resources,
            summary.condition_keys,
            summary.context_keys,
            summary.global_keys,
            summary.service_keys
        );
        View {
            text,
            count: summary.actions,
            value: serde_json::to_value(&summary)?,
        }
    };

    match (args.format, args.count) {
        (LookupFormat::Text, true) => println!("{}", view.count),
        (LookupFormat::Json, true) => println!("{}", json!({"count": view.count})),
        (LookupFormat::Text, false) => print!("{}", view.text),
        (LookupFormat::Json, false) => println!("{}", serde_json::to_string_pretty(&view.value)?),
    }
    Ok(EXIT_OK)
}

fn resource_text(detail: &ResourceDetail) -> String {
    let arns = if detail.arn_formats.is_empty() {
        "N/A".to_string()
    } else {
        detail.arn_formats.join(", ")
    };
    format!(
        "{}\n  arn: {}\n  condition keys: {}\n",
        detail.name,
        arns,
        list_or_none(&detail.condition_keys)
    )
}

fn fetch_entity(source: &dyn EntitySource, name: &str) -> Result<EntityDocument, ExError> {
    match source.fetch_document(name) {
        Ok(root) => Ok(EntityDocument::new(name, root)),
        Err(err) if err.kind() == ExErrorKind::EntityNotFound => {
            let catalog = source.list_entities()?;
            let suggestions = similar_names(&catalog, name, SUGGESTION_LIMIT);
            let mut message = format!("entity `{}` not found", name);
            if !suggestions.is_empty() {
                message.push_str(&format!("; did you mean: {}", suggestions.join(", ")));
            }
            Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("lookup")
                .with_entity(name)
                .with_message(message))
        }
        Err(err) => Err(err),
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
