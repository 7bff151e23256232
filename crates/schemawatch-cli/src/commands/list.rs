//! List command

use super::{CommandResult, SourceArgs};
use clap::Args;
use schemawatch_core::render::EXIT_OK;
use schemawatch_engine::catalog::{context_keys_by_entity, split_keys};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only names containing this text (case-insensitive)
    #[arg(long)]
    pub filter: Option<String>,

    /// Print JSON instead of plain lines
    #[arg(long)]
    pub json: bool,

    /// List the context keys of every (filtered) entity instead of names
    #[arg(long)]
    pub context_keys: bool,

    /// Only global (`aws:`) context keys, flattened across entities
    #[arg(long, requires = "context_keys", conflicts_with = "service_only")]
    pub global_only: bool,

    /// Only service-specific context keys
    #[arg(long, requires = "context_keys")]
    pub service_only: bool,

    /// Print only the number of unique items
    #[arg(long)]
    pub count: bool,
}

pub fn execute(source_args: &SourceArgs, args: ListArgs) -> CommandResult {
    let source = source_args.build()?;
    let mut names = source.list_entities()?;

    if let Some(filter) = &args.filter {
        let filter = filter.to_ascii_lowercase();
        names.retain(|name| name.to_ascii_lowercase().contains(&filter));
    }

    if !args.context_keys {
        if args.count {
            print_count(names.len(), args.json);
        } else if args.json {
            println!("{}", serde_json::to_string_pretty(&names)?);
        } else {
            for name in &names {
                println!("{}", name);
            }
        }
        return Ok(EXIT_OK);
    }

    let mut by_entity = context_keys_by_entity(source.as_ref(), &names)?;
    if args.global_only {
        let global = split_keys(by_entity.into_values().flatten()).global_keys;
        if args.count {
            print_count(global.len(), args.json);
        } else if args.json {
            println!("{}", serde_json::to_string_pretty(&global)?);
        } else {
            for key in &global {
                println!("{}", key);
            }
        }
        return Ok(EXIT_OK);
    }

    if args.service_only {
        by_entity = by_entity
            .into_iter()
            .map(|(name, keys)| (name, split_keys(keys).service_keys))
            .filter(|(_, keys)| !keys.is_empty())
            .collect();
    }

    if args.count {
        let unique: BTreeSet<&String> = by_entity.values().flatten().collect();
        print_count(unique.len(), args.json);
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(&by_entity)?);
    } else {
        print!("{}", grouped_text(&by_entity));
    }
    Ok(EXIT_OK)
}

fn print_count(count: usize, json: bool) {
    if json {
        println!("{}", serde_json::json!({"count": count}));
    } else {
        println!("{}", count);
    }
}

fn grouped_text(by_entity: &BTreeMap<String, BTreeSet<String>>) -> String {
    let mut out = String::new();
    for (name, keys) in by_entity {
        out.push_str(&format!("{} ({}):\n", name, keys.len()));
        for key in keys {
            out.push_str(&format!("  {}\n", key));
        }
    }
    out
}
