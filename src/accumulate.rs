//! Per-(field, type) statistics accumulators.
//!
//! Each accumulator keeps a running aggregate (count, min, max, mean, and
//! type-specific extras) without retaining the observed values. `merge`
//! combines two accumulators of the same type so that independently profiled
//! shards (one per file, or per chunk) fold into the same result as a single
//! sequential scan.

use std::collections::BTreeSet;

use anyhow::{Result, bail};
use serde::Serialize;

use crate::classify::{Observation, TypeTag};

/// Upper bound on the distinct string values retained per field.
///
/// The sample keeps the lexicographically smallest distinct values on both
/// ingest and merge, which makes its membership independent of row order and
/// shard partitioning.
pub const SAMPLE_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldAccumulator {
    Bool(BoolStats),
    Int(IntStats),
    Float(FloatStats),
    Str(StrStats),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolStats {
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntStats {
    pub count: usize,
    pub min: i64,
    pub max: i64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub max_precision: u32,
    pub max_scale: u32,
    pub digit_length: DigitLength,
}

/// Tracks whether every observed value had the same total digit count.
///
/// The common length is carried, not just a flag: two shards that are each
/// internally fixed only stay fixed when their lengths agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitLength {
    Fixed(u32),
    Varied,
}

impl DigitLength {
    fn observe(&mut self, precision: u32) {
        if let DigitLength::Fixed(length) = *self
            && length != precision
        {
            *self = DigitLength::Varied;
        }
    }

    fn merge(&mut self, other: DigitLength) {
        *self = match (*self, other) {
            (DigitLength::Fixed(a), DigitLength::Fixed(b)) if a == b => DigitLength::Fixed(a),
            _ => DigitLength::Varied,
        };
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, DigitLength::Fixed(_))
    }
}

/// String statistics operate on character lengths: `min`/`max`/`mean` describe
/// the shortest, longest, and average observed value, which is what schema
/// width estimation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct StrStats {
    pub count: usize,
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub sample: BTreeSet<String>,
}

impl FieldAccumulator {
    /// Seeds an accumulator from the first observation of a (field, type) pair.
    pub fn from_observation(observation: &Observation) -> Self {
        match observation {
            Observation::Bool => FieldAccumulator::Bool(BoolStats { count: 1 }),
            Observation::Int(value) => FieldAccumulator::Int(IntStats {
                count: 1,
                min: *value,
                max: *value,
                mean: *value as f64,
            }),
            Observation::Float {
                value,
                precision,
                scale,
            } => FieldAccumulator::Float(FloatStats {
                count: 1,
                min: *value,
                max: *value,
                mean: *value,
                max_precision: *precision,
                max_scale: *scale,
                digit_length: DigitLength::Fixed(*precision),
            }),
            Observation::Str(value) => {
                let length = value.chars().count();
                let mut sample = BTreeSet::new();
                sample.insert(value.clone());
                FieldAccumulator::Str(StrStats {
                    count: 1,
                    min: length,
                    max: length,
                    mean: length as f64,
                    sample,
                })
            }
        }
    }

    pub fn tag(&self) -> TypeTag {
        match self {
            FieldAccumulator::Bool(_) => TypeTag::Bool,
            FieldAccumulator::Int(_) => TypeTag::Int,
            FieldAccumulator::Float(_) => TypeTag::Float,
            FieldAccumulator::Str(_) => TypeTag::Str,
        }
    }

    /// Folds one observation in. The observation's tag must match the
    /// accumulator's; a mismatch is an internal routing bug, not bad input.
    pub fn observe(&mut self, observation: &Observation) -> Result<()> {
        match (self, observation) {
            (FieldAccumulator::Bool(stats), Observation::Bool) => {
                stats.count += 1;
            }
            (FieldAccumulator::Int(stats), Observation::Int(value)) => {
                stats.count += 1;
                stats.min = stats.min.min(*value);
                stats.max = stats.max.max(*value);
                push_mean(&mut stats.mean, stats.count, *value as f64);
            }
            (
                FieldAccumulator::Float(stats),
                Observation::Float {
                    value,
                    precision,
                    scale,
                },
            ) => {
                stats.count += 1;
                stats.min = stats.min.min(*value);
                stats.max = stats.max.max(*value);
                push_mean(&mut stats.mean, stats.count, *value);
                stats.max_precision = stats.max_precision.max(*precision);
                stats.max_scale = stats.max_scale.max(*scale);
                stats.digit_length.observe(*precision);
            }
            (FieldAccumulator::Str(stats), Observation::Str(value)) => {
                let length = value.chars().count();
                stats.count += 1;
                stats.min = stats.min.min(length);
                stats.max = stats.max.max(length);
                push_mean(&mut stats.mean, stats.count, length as f64);
                insert_sample(&mut stats.sample, value);
            }
            (accumulator, observation) => bail!(
                "Observation {:?} incompatible with {} accumulator",
                observation.tag(),
                accumulator.tag()
            ),
        }
        Ok(())
    }

    /// Merges another accumulator of the same type into this one.
    pub fn merge(&mut self, other: FieldAccumulator) -> Result<()> {
        match (self, other) {
            (FieldAccumulator::Bool(a), FieldAccumulator::Bool(b)) => {
                a.count += b.count;
            }
            (FieldAccumulator::Int(a), FieldAccumulator::Int(b)) => {
                a.mean = merge_mean(a.mean, a.count, b.mean, b.count);
                a.count += b.count;
                a.min = a.min.min(b.min);
                a.max = a.max.max(b.max);
            }
            (FieldAccumulator::Float(a), FieldAccumulator::Float(b)) => {
                a.mean = merge_mean(a.mean, a.count, b.mean, b.count);
                a.count += b.count;
                a.min = a.min.min(b.min);
                a.max = a.max.max(b.max);
                a.max_precision = a.max_precision.max(b.max_precision);
                a.max_scale = a.max_scale.max(b.max_scale);
                a.digit_length.merge(b.digit_length);
            }
            (FieldAccumulator::Str(a), FieldAccumulator::Str(b)) => {
                a.mean = merge_mean(a.mean, a.count, b.mean, b.count);
                a.count += b.count;
                a.min = a.min.min(b.min);
                a.max = a.max.max(b.max);
                for value in b.sample {
                    insert_sample_owned(&mut a.sample, value);
                }
            }
            (a, b) => bail!(
                "Cannot merge {} accumulator into {} accumulator",
                b.tag(),
                a.tag()
            ),
        }
        Ok(())
    }

    /// Produces the immutable output record for this accumulator.
    pub fn snapshot(&self) -> FieldStat {
        match self {
            FieldAccumulator::Bool(stats) => FieldStat::Bool { count: stats.count },
            FieldAccumulator::Int(stats) => FieldStat::Int {
                count: stats.count,
                min: stats.min,
                max: stats.max,
                mean: stats.mean,
            },
            FieldAccumulator::Float(stats) => FieldStat::Float {
                count: stats.count,
                min: stats.min,
                max: stats.max,
                mean: stats.mean,
                max_precision: stats.max_precision,
                max_scale: stats.max_scale,
                fixed_length: stats.digit_length.is_fixed(),
            },
            FieldAccumulator::Str(stats) => FieldStat::Str {
                count: stats.count,
                min: stats.min,
                max: stats.max,
                mean: stats.mean,
                sample: stats.sample.iter().cloned().collect(),
            },
        }
    }
}

/// Read-only per-(field, type) statistics as exposed in reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldStat {
    Bool {
        count: usize,
    },
    Int {
        count: usize,
        min: i64,
        max: i64,
        mean: f64,
    },
    Float {
        count: usize,
        min: f64,
        max: f64,
        mean: f64,
        max_precision: u32,
        max_scale: u32,
        fixed_length: bool,
    },
    Str {
        count: usize,
        min: usize,
        max: usize,
        mean: f64,
        sample: Vec<String>,
    },
}

impl FieldStat {
    pub fn count(&self) -> usize {
        match self {
            FieldStat::Bool { count }
            | FieldStat::Int { count, .. }
            | FieldStat::Float { count, .. }
            | FieldStat::Str { count, .. } => *count,
        }
    }
}

fn push_mean(mean: &mut f64, count: usize, value: f64) {
    *mean += (value - *mean) / count as f64;
}

fn merge_mean(mean_a: f64, count_a: usize, mean_b: f64, count_b: usize) -> f64 {
    let total = count_a + count_b;
    if total == 0 {
        return 0.0;
    }
    (mean_a * count_a as f64 + mean_b * count_b as f64) / total as f64
}

fn insert_sample(sample: &mut BTreeSet<String>, value: &str) {
    if sample.contains(value) {
        return;
    }
    insert_sample_owned(sample, value.to_string());
}

fn insert_sample_owned(sample: &mut BTreeSet<String>, value: String) {
    sample.insert(value);
    while sample.len() > SAMPLE_LIMIT {
        sample.pop_last();
    }
}
