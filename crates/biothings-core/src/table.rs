//! Tabular views of hit lists
//!
//! A [`Table`] is a plain column/row grid built from JSON hits, with an optional
//! `query` index column. It can be written as CSV.

use crate::error::{BiothingsError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;

/// Column name used as the row index for query-many results
pub const QUERY_COLUMN: &str = "query";

/// How hits are laid out as columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFrameMode {
    /// Nested objects flattened into dotted column names
    #[default]
    Normalize,
    /// Top-level keys only; nested values kept as JSON
    FromDict,
}

/// Row index taken out of the column set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Index {
    pub name: String,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub index: Option<Index>,
}

fn flatten_into(prefix: &str, value: &Value, out: &mut Map<String, Value>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{}.{}", prefix, k)
                };
                flatten_into(&key, v, out);
            }
        }
        other => {
            out.insert(prefix.to_string(), other.clone());
        }
    }
}

fn as_record(hit: &Value, mode: DataFrameMode) -> Map<String, Value> {
    match (hit, mode) {
        (Value::Object(_), DataFrameMode::Normalize) => {
            let mut out = Map::new();
            flatten_into("", hit, &mut out);
            out
        }
        (Value::Object(map), DataFrameMode::FromDict) => map.clone(),
        (other, _) => {
            let mut out = Map::new();
            out.insert("value".to_string(), other.clone());
            out
        }
    }
}

impl Table {
    /// Build a table from hits; with `index_by_query` the `query` column becomes the index
    pub fn from_hits(hits: &[Value], mode: DataFrameMode, index_by_query: bool) -> Result<Self> {
        let records: Vec<Map<String, Value>> = hits.iter().map(|h| as_record(h, mode)).collect();

        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|c| record.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        let table = Table {
            columns,
            rows,
            index: None,
        };

        if index_by_query && !hits.is_empty() {
            table.set_index(QUERY_COLUMN)
        } else {
            Ok(table)
        }
    }

    /// Build a table from pre-shaped rows
    pub fn from_rows(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            index: None,
        }
    }

    /// Move a column into the row index
    pub fn set_index(mut self, name: &str) -> Result<Self> {
        let pos = self
            .columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| {
                BiothingsError::InvalidInput(format!(
                    "cannot index table by '{}': no such column",
                    name
                ))
            })?;
        self.columns.remove(pos);
        let values = self.rows.iter_mut().map(|row| row.remove(pos)).collect();
        self.index = Some(Index {
            name: name.to_string(),
            values,
        });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let pos = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[pos]).collect())
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header: Vec<&str> = Vec::with_capacity(self.columns.len() + 1);
        if let Some(ref index) = self.index {
            header.push(&index.name);
        }
        header.extend(self.columns.iter().map(String::as_str));
        wtr.write_record(&header)?;

        for (i, row) in self.rows.iter().enumerate() {
            let mut record: Vec<String> = Vec::with_capacity(header.len());
            if let Some(ref index) = self.index {
                record.push(index.values.get(i).map(cell).unwrap_or_default());
            }
            record.extend(row.iter().map(cell));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| BiothingsError::InvalidInput(format!("non UTF-8 CSV output: {}", e)))
    }
}

/// CSV cell rendering: strings bare, null empty, everything else as JSON
pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
