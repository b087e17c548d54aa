//! Terminal output formatter

use biothings_core::table::cell;
use biothings_core::Table;
use serde_json::Value;

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut output = String::new();
            for (key, v) in map {
                output.push_str(&format!("{}: {}\n", key, render(v)));
            }
            output
        }
        Value::Array(items) => format_hits(items),
        other => format!("{}\n", render(other)),
    }
}

/// One block per hit, headed by its id (or query term)
pub fn format_hits(hits: &[Value]) -> String {
    let mut output = String::new();
    for hit in hits {
        let heading = hit
            .get("_id")
            .or_else(|| hit.get("query"))
            .map(render)
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!("#{}\n", heading));
        if let Value::Object(map) = hit {
            for (key, v) in map.iter().filter(|(k, _)| k.as_str() != "_id") {
                output.push_str(&format!("  {}: {}\n", key, render(v)));
            }
        }
    }
    output
}

/// Column-aligned table
pub fn format_table(table: &Table) -> String {
    let mut headers: Vec<String> = Vec::new();
    if let Some(index) = &table.index {
        headers.push(index.name.clone());
    }
    headers.extend(table.columns.iter().cloned());

    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut cells = Vec::with_capacity(headers.len());
            if let Some(index) = &table.index {
                cells.push(index.values.get(i).map(cell).unwrap_or_default());
            }
            cells.extend(row.iter().map(cell));
            cells
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(c, h)| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|s| s.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(s, w)| format!("{:<width$}", s, width = *w))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut output = line(&headers);
    for row in &rows {
        output.push_str(&line(row));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hit_blocks() {
        let text = format_hits(&[json!({"_id": "1017", "symbol": "CDK2"})]);
        assert_eq!(text, "#1017\n  symbol: CDK2\n");
    }

    #[test]
    fn test_table_alignment() {
        let table = Table::from_rows(
            &["query", "duplicate hits"],
            vec![vec![json!("cdk2"), json!(3)]],
        );
        let text = format_table(&table);
        assert_eq!(text, "query  duplicate hits\ncdk2   3\n");
    }
}
