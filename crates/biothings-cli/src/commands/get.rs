//! Single and batch annotation commands

use super::{args_or_stdin, client, ClientOptions};
use crate::app::{split_list, GetArgs, GetManyArgs, OutputFormat};
use crate::output;
use anyhow::{bail, Result};
use biothings_core::{Annotations, GetManyOptions, GetOptions, HitStream};
use futures::StreamExt;

pub async fn run(args: GetArgs, opts: &ClientOptions, format: OutputFormat) -> Result<()> {
    let client = client(&args.entity, opts).await?;
    let get_opts = GetOptions::default().fields(split_list(args.fields.as_deref()));

    match client.get_annotation(&args.id, &get_opts).await? {
        Some(hit) => print!("{}", output::format_value(&hit, format)?),
        None => bail!("{} '{}' not found", client.settings().entity, args.id),
    }
    Ok(())
}

pub async fn run_many(
    args: GetManyArgs,
    opts: &ClientOptions,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let ids = args_or_stdin(args.ids)?;
    let opts = ClientOptions {
        step: args.step.or(opts.step),
        ..opts.clone()
    };
    let client = client(&args.entity, &opts).await?;

    let mut many = GetManyOptions::default().fields(split_list(args.fields.as_deref()));
    many.verbose = verbose;
    if args.stream {
        many = many.lazy();
    }

    match client.get_annotations(ids, &many).await? {
        Annotations::Lazy(stream) => print_stream(stream, format).await?,
        Annotations::Rows(rows) => print!("{}", output::format_hits(&rows, format)?),
        Annotations::Table(table) => print!("{}", output::format_table(&table, format)?),
        Annotations::Raw(raw) => {
            for body in raw.bodies() {
                println!("{}", body);
            }
        }
    }
    Ok(())
}

/// Print hits as they arrive; a failure stops the output
pub async fn print_stream(mut stream: HitStream<'_>, format: OutputFormat) -> Result<()> {
    let mut count = 0usize;
    while let Some(hit) = stream.next().await {
        print!("{}", output::format_hit_line(&hit?, format));
        count += 1;
    }
    tracing::info!("{} hits", count);
    Ok(())
}
