//! Corpus-level profile: routes classified values to per-(field, type)
//! accumulators and exposes the finished, read-only report.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{
    accumulate::{FieldAccumulator, FieldStat},
    classify::{TypeTag, classify},
};

pub type FieldProfile = BTreeMap<String, BTreeMap<TypeTag, FieldStat>>;

/// Incremental profile over a bounded sequence of rows.
///
/// Ingestion within a field and merging across shards are commutative and
/// associative, so any partition of the row set into per-file or per-chunk
/// accumulators folds to the same result as a single sequential scan.
#[derive(Debug, Clone, Default)]
pub struct ProfileAccumulator {
    fields: BTreeMap<String, BTreeMap<TypeTag, FieldAccumulator>>,
}

impl ProfileAccumulator {
    /// Folds one row in. Each pair maps a field name to its raw value; missing
    /// values (empty or whitespace-only) contribute no observation. Fields
    /// absent from a row are simply not observed for that row.
    pub fn ingest_row<'a, I>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (field, raw) in row {
            let Some(observation) = classify(raw) else {
                continue;
            };
            let types = self.fields.entry(field.to_string()).or_default();
            match types.entry(observation.tag()) {
                Entry::Occupied(mut entry) => entry
                    .get_mut()
                    .observe(&observation)
                    .with_context(|| format!("Accumulating field '{field}'"))?,
                Entry::Vacant(entry) => {
                    entry.insert(FieldAccumulator::from_observation(&observation));
                }
            }
        }
        Ok(())
    }

    /// Merges another profile (typically one file's shard) into this one.
    /// Keys present on only one side pass through unchanged.
    pub fn merge(&mut self, other: ProfileAccumulator) -> Result<()> {
        for (field, types) in other.fields {
            let target = self.fields.entry(field.clone()).or_default();
            for (tag, accumulator) in types {
                match target.entry(tag) {
                    Entry::Occupied(mut entry) => entry
                        .get_mut()
                        .merge(accumulator)
                        .with_context(|| format!("Merging field '{field}'"))?,
                    Entry::Vacant(entry) => {
                        entry.insert(accumulator);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Finalizes the scan into an immutable [`Report`].
    pub fn finish(self) -> Report {
        let stats = self
            .fields
            .into_iter()
            .map(|(field, types)| {
                let snapshots = types
                    .into_iter()
                    .map(|(tag, accumulator)| (tag, accumulator.snapshot()))
                    .collect();
                (field, snapshots)
            })
            .collect();
        Report { stats }
    }
}

/// Read-only result of a completed scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Report {
    stats: FieldProfile,
}

impl Report {
    /// Full profile: every field, every type observed for it.
    pub fn stats(&self) -> &FieldProfile {
        &self.stats
    }

    /// The profile restricted to conflicting fields, meaning fields observed with
    /// more than one type across the corpus. Statistics are identical to the
    /// full profile; fields with a single type (or none) are excluded.
    pub fn conflicting_types(&self) -> FieldProfile {
        self.stats
            .iter()
            .filter(|(_, types)| types.len() > 1)
            .map(|(field, types)| (field.clone(), types.clone()))
            .collect()
    }
}
