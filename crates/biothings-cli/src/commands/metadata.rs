//! Service metadata commands

use super::{client, ClientOptions};
use crate::app::{EntityArgs, FieldsArgs, OutputFormat};
use crate::output;
use anyhow::Result;
use serde_json::Value;

pub async fn run(args: EntityArgs, opts: &ClientOptions, format: OutputFormat) -> Result<()> {
    let client = client(&args.entity, opts).await?;
    let metadata = client.metadata().await?;
    print!("{}", output::format_value(&metadata, format)?);
    Ok(())
}

pub async fn run_fields(args: FieldsArgs, opts: &ClientOptions, format: OutputFormat) -> Result<()> {
    let client = client(&args.entity, opts).await?;
    let fields = client.get_fields(args.search.as_deref()).await?;

    match (format, &fields) {
        (OutputFormat::Cli, Value::Object(map)) => {
            for (name, description) in map {
                let kind = description
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("-");
                println!("{:<40} {}", name, kind);
            }
        }
        _ => print!("{}", output::format_value(&fields, format)?),
    }
    Ok(())
}
