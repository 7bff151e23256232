//! Sample selection.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;

pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Which catalog entities a run analyzes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplePolicy {
    /// Uniform sample without replacement, capped at the catalog size.
    /// The same seed over the same catalog selects the same entities.
    Random { size: usize, seed: Option<u64> },
    /// Exactly these entities, in this order, minus names not in the catalog
    Fixed(Vec<String>),
    /// The whole catalog
    All,
}

impl Default for SamplePolicy {
    fn default() -> Self {
        SamplePolicy::Random {
            size: DEFAULT_SAMPLE_SIZE,
            seed: None,
        }
    }
}

/// Select entity names from `catalog` according to `policy`.
pub fn select(catalog: &[String], policy: &SamplePolicy) -> Vec<String> {
    match policy {
        SamplePolicy::All => catalog.to_vec(),
        SamplePolicy::Random { size, seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(*seed),
                None => StdRng::from_entropy(),
            };
            catalog
                .choose_multiple(&mut rng, (*size).min(catalog.len()))
                .cloned()
                .collect()
        }
        SamplePolicy::Fixed(names) => {
            let known: BTreeSet<&str> = catalog.iter().map(String::as_str).collect();
            let mut seen = BTreeSet::new();
            let mut selected = Vec::with_capacity(names.len());
            for name in names {
                if !known.contains(name.as_str()) {
                    tracing::warn!(entity = %name, "requested entity not in catalog, ignoring");
                    continue;
                }
                if seen.insert(name.as_str()) {
                    selected.push(name.clone());
                }
            }
            selected
        }
    }
}
