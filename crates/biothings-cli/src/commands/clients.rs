//! List built-in clients

use crate::app::OutputFormat;
use anyhow::Result;
use biothings_core::{EntitySettings, BUILTIN_CLIENTS};
use serde_json::json;

pub async fn run(format: OutputFormat) -> Result<()> {
    let clients: Vec<EntitySettings> = BUILTIN_CLIENTS
        .iter()
        .filter_map(|name| EntitySettings::builtin(name))
        .collect();

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = BUILTIN_CLIENTS
                .iter()
                .zip(&clients)
                .map(|(name, s)| {
                    json!({
                        "name": name,
                        "entity": s.entity,
                        "client": s.type_name,
                        "url": s.default_url,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            for (name, s) in BUILTIN_CLIENTS.iter().zip(&clients) {
                println!("{:<10} {:<15} {}", name, s.type_name, s.default_url);
            }
        }
    }
    Ok(())
}
