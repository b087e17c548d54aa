//! Query and query-many commands

use super::{args_or_stdin, client, get::print_stream, ClientOptions};
use crate::app::{split_list, OutputFormat, QueryArgs, QueryManyArgs};
use crate::output;
use anyhow::Result;
use biothings_core::{QueryMany, QueryManyOptions, QueryOptions, QueryOutput};

pub async fn run(args: QueryArgs, opts: &ClientOptions, format: OutputFormat, verbose: bool) -> Result<()> {
    let client = client(&args.entity, opts).await?;

    let mut query = QueryOptions::default().fields(split_list(args.fields.as_deref()));
    query.verbose = verbose;
    query.sort = split_list(args.sort.as_deref());
    if let Some(size) = args.size {
        query = query.size(size);
    }
    if let Some(skip) = args.skip {
        query = query.skip(skip);
    }
    if args.fetch_all {
        query = query.fetch_all();
    }

    match client.query(&args.q, &query).await? {
        QueryOutput::Scroll(stream) => print_stream(stream, format).await?,
        QueryOutput::Response(response) => print!("{}", output::format_value(&response, format)?),
        QueryOutput::Table(table) => print!("{}", output::format_table(&table, format)?),
    }
    Ok(())
}

pub async fn run_many(
    args: QueryManyArgs,
    opts: &ClientOptions,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let terms = args_or_stdin(args.terms)?;
    let client = client(&args.entity, opts).await?;

    let mut many = QueryManyOptions::default()
        .scopes(split_list(args.scopes.as_deref()))
        .fields(split_list(args.fields.as_deref()));
    many.verbose = verbose;
    if args.returnall {
        many = many.returnall();
    }

    print_query_many(client.querymany(terms, &many).await?, format)
}

pub fn print_query_many(result: QueryMany, format: OutputFormat) -> Result<()> {
    match result {
        QueryMany::Hits(hits) => print!("{}", output::format_hits(&hits, format)?),
        QueryMany::Table(table) => print!("{}", output::format_table(&table, format)?),
        QueryMany::Report(report) => print!("{}", output::format_report(&report, format)?),
        QueryMany::Raw(raw) => {
            for body in raw.bodies() {
                println!("{}", body);
            }
        }
    }
    Ok(())
}
