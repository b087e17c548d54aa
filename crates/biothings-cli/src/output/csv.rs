//! CSV output formatter

use anyhow::Result;
use biothings_core::{DataFrameMode, Table};
use serde_json::Value;

pub fn format_hits(hits: &[Value]) -> Result<String> {
    let table = Table::from_hits(hits, DataFrameMode::Normalize, false)?;
    format_table(&table)
}

pub fn format_table(table: &Table) -> Result<String> {
    Ok(table.to_csv_string()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_fields_become_columns() {
        let hits = vec![json!({"_id": "1017", "genomic_pos": {"chr": "12"}})];
        let csv = format_hits(&hits).unwrap();
        assert!(csv.starts_with("_id,genomic_pos.chr\n"));
        assert!(csv.contains("1017,12"));
    }
}
