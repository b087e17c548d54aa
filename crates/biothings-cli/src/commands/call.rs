//! Call a client method by name
//!
//! The method name goes through the entity's alias table, so `getgenes`,
//! `getvariant`, `findgenes` and the common names all resolve to an operation.

use super::{client, get::print_stream, query::print_query_many, ClientOptions};
use crate::app::{CallArgs, OutputFormat};
use crate::output;
use anyhow::{anyhow, bail, Result};
use biothings_core::{
    Annotations, BiothingsError, GetManyOptions, GetOptions, Operation, QueryManyOptions,
    QueryOptions, QueryOutput,
};
use std::path::Path;

fn arg<'a>(args: &'a [String], i: usize, name: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing argument <{}>", name))
}

pub async fn run(args: CallArgs, opts: &ClientOptions, format: OutputFormat, verbose: bool) -> Result<()> {
    let client = client(&args.entity, opts).await?;
    let alias = client
        .settings()
        .resolve_method(&args.method)
        .cloned()
        .ok_or_else(|| BiothingsError::UnknownMethod {
            entity: client.settings().entity.clone(),
            method: args.method.clone(),
        })?;
    if alias.deprecated {
        tracing::warn!("{} is deprecated", alias.name);
    }

    let values = &args.args;
    match alias.operation {
        Operation::GetAnnotation => {
            let id = arg(values, 0, "id")?;
            match client.get_annotation(id, &GetOptions::default()).await? {
                Some(hit) => print!("{}", output::format_value(&hit, format)?),
                None => bail!("'{}' not found", id),
            }
        }
        Operation::GetAnnotations => {
            let mut many = GetManyOptions::default();
            many.verbose = verbose;
            match client.get_annotations(values.clone(), &many).await? {
                Annotations::Rows(rows) => print!("{}", output::format_hits(&rows, format)?),
                Annotations::Table(table) => print!("{}", output::format_table(&table, format)?),
                Annotations::Lazy(stream) => print_stream(stream, format).await?,
                Annotations::Raw(raw) => {
                    for body in raw.bodies() {
                        println!("{}", body);
                    }
                }
            }
        }
        Operation::Query => {
            let q = arg(values, 0, "q")?;
            let mut query = QueryOptions::default();
            query.verbose = verbose;
            match client.query(q, &query).await? {
                QueryOutput::Response(response) => {
                    print!("{}", output::format_value(&response, format)?)
                }
                QueryOutput::Table(table) => print!("{}", output::format_table(&table, format)?),
                QueryOutput::Scroll(stream) => print_stream(stream, format).await?,
            }
        }
        Operation::QueryMany => {
            let mut many = QueryManyOptions::default();
            many.verbose = verbose;
            print_query_many(client.querymany(values.clone(), &many).await?, format)?;
        }
        Operation::Metadata => {
            print!("{}", output::format_value(&client.metadata().await?, format)?);
        }
        Operation::GetFields => {
            let fields = client.get_fields(values.first().map(String::as_str)).await?;
            print!("{}", output::format_value(&fields, format)?);
        }
        Operation::SetCaching => client.set_caching()?,
        Operation::StopCaching => client.stop_caching()?,
        Operation::ClearCache => client.clear_cache()?,
        Operation::HgvsFromVcf => {
            let path = arg(values, 0, "vcf")?;
            for id in client.get_hgvs_from_vcf(Path::new(path))? {
                println!("{}", id?);
            }
        }
        Operation::FormatHgvs => {
            let chrom = arg(values, 0, "chrom")?;
            let pos: u64 = arg(values, 1, "pos")?.parse()?;
            let ref_ = arg(values, 2, "ref")?;
            let alt = arg(values, 3, "alt")?;
            println!("{}", client.format_hgvs(chrom, pos, ref_, alt)?);
        }
    }
    Ok(())
}
