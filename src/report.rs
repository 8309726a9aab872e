//! Rendering of a finished profile as an elastic text table or JSON.

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::{accumulate::FieldStat, cli::OutputFormat, profile::FieldProfile, table};

pub fn emit(stats: &FieldProfile, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let headers = vec![
                "field".to_string(),
                "type".to_string(),
                "count".to_string(),
                "min".to_string(),
                "max".to_string(),
                "mean".to_string(),
                "details".to_string(),
            ];
            table::print_table(&headers, &render_rows(stats));
            Ok(())
        }
        OutputFormat::Json => {
            let rendered =
                serde_json::to_string_pretty(stats).context("Serializing profile to JSON")?;
            println!("{rendered}");
            Ok(())
        }
    }
}

pub fn render_rows(stats: &FieldProfile) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for (field, types) in stats {
        for (tag, stat) in types {
            let (min, max, mean, details) = match stat {
                FieldStat::Bool { .. } => {
                    (String::new(), String::new(), String::new(), String::new())
                }
                FieldStat::Int {
                    min, max, mean, ..
                } => (
                    min.to_string(),
                    max.to_string(),
                    format_number(*mean),
                    String::new(),
                ),
                FieldStat::Float {
                    min,
                    max,
                    mean,
                    max_precision,
                    max_scale,
                    fixed_length,
                    ..
                } => (
                    format_number(*min),
                    format_number(*max),
                    format_number(*mean),
                    format!(
                        "max_precision={max_precision} max_scale={max_scale} fixed_length={fixed_length}"
                    ),
                ),
                FieldStat::Str {
                    min,
                    max,
                    mean,
                    sample,
                    ..
                } => (
                    min.to_string(),
                    max.to_string(),
                    format_number(*mean),
                    format!("sample: {}", sample.iter().join(", ")),
                ),
            };
            rows.push(vec![
                field.clone(),
                tag.to_string(),
                stat.count().to_string(),
                min,
                max,
                mean,
                details,
            ]);
        }
    }
    rows
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.4}")
    }
}
