//! Output formatters

pub mod csv;
pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use anyhow::Result;
use biothings_core::{QueryManyReport, Records, Table};
use serde_json::Value;

/// Format a single JSON document (annotation, metadata, query response)
pub fn format_value(value: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(json::format_value(value)),
        OutputFormat::Csv => csv::format_hits(&hits_of(value)),
        OutputFormat::Cli => Ok(terminal::format_value(value)),
    }
}

/// Format a list of hits
pub fn format_hits(hits: &[Value], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(json::format_value(&Value::Array(hits.to_vec()))),
        OutputFormat::Csv => csv::format_hits(hits),
        OutputFormat::Cli => Ok(terminal::format_hits(hits)),
    }
}

/// Format one hit of a streamed result
pub fn format_hit_line(hit: &Value, format: OutputFormat) -> String {
    match format {
        OutputFormat::Cli => terminal::format_hits(std::slice::from_ref(hit)),
        _ => format!("{}\n", hit),
    }
}

pub fn format_table(table: &Table, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(json::format_value(&serde_json::to_value(table)?)),
        OutputFormat::Csv => csv::format_table(table),
        OutputFormat::Cli => Ok(terminal::format_table(table)),
    }
}

/// Format a query-many report with its duplicate and missing terms
pub fn format_report(report: &QueryManyReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(json::format_value(&report.to_json())),
        OutputFormat::Csv => match &report.out {
            Records::Rows(rows) => csv::format_hits(rows),
            Records::Table(table) => csv::format_table(table),
        },
        OutputFormat::Cli => {
            let mut output = match &report.out {
                Records::Rows(rows) => terminal::format_hits(rows),
                Records::Table(table) => terminal::format_table(table),
            };
            if !report.dup.is_empty() {
                output.push_str("\nduplicate hits:\n");
                output.push_str(&terminal::format_table(&report.dup_table()));
            }
            if !report.missing.is_empty() {
                output.push_str("\nno hit:\n");
                output.push_str(&terminal::format_table(&report.missing_table()));
            }
            Ok(output)
        }
    }
}

/// Hits of a query response, or the document itself
fn hits_of(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(map) => match map.get("hits") {
            Some(Value::Array(hits)) => hits.clone(),
            _ => vec![value.clone()],
        },
        other => vec![other.clone()],
    }
}
