//! Request building and result shaping shared by the blocking and async clients

use crate::config::{ClientConfig, EntitySettings, Operation, MAX_PAGE_SIZE};
use crate::curie::CurieTransformer;
use crate::engine::{join_quoted, tally, IntoTerms, Params, ResponsePolicy, ScrollState, Terms};
use crate::error::{BiothingsError, Result};
use crate::options::{GetManyOptions, GetOptions, QueryManyOptions, QueryOptions};
use crate::output::{Annotations, QueryMany, QueryManyReport, QueryOutput, RawOutput, Records};
use crate::table::Table;
use crate::transport::Request;
use serde_json::Value;
use std::num::NonZeroUsize;

/// Entity settings plus validated runtime configuration
#[derive(Debug, Clone)]
pub(crate) struct ClientCore {
    pub settings: EntitySettings,
    pub config: ClientConfig,
    pub step: NonZeroUsize,
    curie: CurieTransformer,
}

impl ClientCore {
    pub fn new(settings: EntitySettings, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let step = config.effective_step()?;
        let curie = CurieTransformer::new(&settings.curie_prefixes)?;
        Ok(Self {
            settings,
            config,
            step,
            curie,
        })
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.url, endpoint)
    }

    pub fn policy(&self) -> ResponsePolicy {
        ResponsePolicy::json(self.config.raise_for_status)
    }

    pub fn label(&self) -> &str {
        &self.settings.plural_label
    }

    /// Switch the base URL scheme
    pub fn set_scheme(&mut self, https: bool) {
        let (from, to) = if https {
            ("http://", "https://")
        } else {
            ("https://", "http://")
        };
        if let Some(rest) = self.config.url.strip_prefix(from) {
            self.config.url = format!("{}{}", to, rest);
        }
    }

    pub fn require(&self, operation: Operation, method: &str) -> Result<()> {
        if self.settings.supports(operation) {
            Ok(())
        } else {
            Err(BiothingsError::UnknownMethod {
                entity: self.settings.entity.clone(),
                method: method.to_string(),
            })
        }
    }

    /// Identifier with any known CURIE prefix rewritten
    pub fn normalize_id(&self, id: &str) -> String {
        self.curie.transform(id)
    }

    /// Normalized, lazily rewritten annotation ids
    pub fn annotation_ids<'a>(&self, ids: impl IntoTerms<'a>) -> Terms<'a> {
        let terms = ids.into_terms();
        if self.curie.is_empty() {
            terms
        } else {
            let curie = self.curie.clone();
            terms.map_terms(move |id| curie.transform(&id))
        }
    }

    pub fn annotation_request(&self, id: &str, opts: &GetOptions) -> Request {
        let mut params = Params::new();
        params.set_list("fields", &opts.fields).extend(&opts.params);
        Request::get(self.url(&format!(
            "{}{}",
            self.settings.annotation_endpoint,
            self.normalize_id(id)
        )))
        .with_params(params.into_pairs())
    }

    pub fn annotations_request(&self, batch: &[String], opts: &GetManyOptions) -> Request {
        let mut params = Params::new();
        params
            .set("ids", join_quoted(batch))
            .set_list("fields", &opts.fields)
            .extend(&opts.params);
        Request::post(self.url(&self.settings.annotation_endpoint)).with_params(params.into_pairs())
    }

    pub fn query_request(&self, q: &str, opts: &QueryOptions) -> Request {
        let mut params = Params::new();
        params.set("q", q).set_list("fields", &opts.fields);
        if let Some(size) = opts.size {
            if size > MAX_PAGE_SIZE {
                tracing::warn!(
                    "size {} exceeds the maximum of {}; use fetch_all to retrieve every hit",
                    size,
                    MAX_PAGE_SIZE
                );
            }
            params.set("size", size.min(MAX_PAGE_SIZE).to_string());
        }
        if let Some(skip) = opts.skip {
            params.set("skip", skip.to_string());
        }
        params.set_list("sort", &opts.sort).extend(&opts.params);
        Request::get(self.url(&self.settings.query_endpoint)).with_params(params.into_pairs())
    }

    /// URL and initial state of a `fetch_all` scroll
    pub fn scroll(&self, q: &str, opts: &QueryOptions) -> (String, ScrollState) {
        if opts.as_dataframe.is_some() {
            tracing::warn!(
                "Ignored 'as_dataframe' because 'fetch_all' is specified. Too many documents to return as a table."
            );
        }
        let mut base = Params::new();
        base.set_list("fields", &opts.fields)
            .set("size", self.config.scroll_size.to_string())
            .extend(&opts.params);
        base.remove("q");
        base.remove("fetch_all");
        base.remove("scroll_id");
        let base = base.into_pairs();

        let mut first = vec![
            ("q".to_string(), q.to_string()),
            ("fetch_all".to_string(), "true".to_string()),
        ];
        first.extend(base.iter().cloned());

        let state = ScrollState::new(first, base, self.label(), opts.verbose);
        (self.url(&self.settings.query_endpoint), state)
    }

    pub fn querymany_request(&self, batch: &[String], opts: &QueryManyOptions) -> Request {
        let mut params = Params::new();
        params
            .set("q", join_quoted(batch))
            .set_list("scopes", &opts.scopes)
            .set_list("fields", &opts.fields)
            .extend(&opts.params);
        Request::post(self.url(&self.settings.query_endpoint)).with_params(params.into_pairs())
    }

    pub fn metadata_request(&self) -> Request {
        Request::get(self.url(&self.settings.metadata_endpoint))
    }

    pub fn fields_request(&self, search: Option<&str>) -> Request {
        let req = Request::get(self.url(&self.settings.metadata_fields_endpoint));
        match search {
            Some(term) if !term.is_empty() => {
                req.with_params(vec![("search".to_string(), term.to_string())])
            }
            _ => req,
        }
    }
}

/// Hits of one batch response; a non-list body counts as a single element
pub(crate) fn batch_hits(body: Value) -> Vec<Value> {
    match body {
        Value::Array(hits) => hits,
        other => vec![other],
    }
}

/// Drop the `notes` entry of every field description
pub(crate) fn strip_notes(mut fields: Value) -> Value {
    if let Value::Object(ref mut map) = fields {
        for description in map.values_mut() {
            if let Value::Object(desc) = description {
                desc.remove("notes");
            }
        }
    }
    fields
}

/// Entity type advertised by a service's metadata
pub(crate) fn discovered_type(metadata: &Value) -> Result<String> {
    match metadata.get("biothing_type") {
        Some(Value::String(t)) => Ok(t.clone()),
        Some(Value::Array(types)) if types.len() == 1 => match &types[0] {
            Value::String(t) => Ok(t.clone()),
            _ => Err(BiothingsError::Discovery(
                "biothing_type in metadata is not a valid string".to_string(),
            )),
        },
        Some(Value::Array(_)) => Err(BiothingsError::Discovery(
            "biothing_type in metadata is not unique".to_string(),
        )),
        _ => Err(BiothingsError::Discovery(
            "biothing_type in metadata is not a valid string".to_string(),
        )),
    }
}

/// Materialized annotation rows shaped per the options
pub(crate) fn finish_annotations<L>(rows: Vec<Value>, opts: &GetManyOptions) -> Result<Annotations<L>> {
    match opts.as_dataframe {
        Some(mode) => Ok(Annotations::Table(Table::from_hits(
            &rows,
            mode,
            opts.df_index,
        )?)),
        None => Ok(Annotations::Rows(rows)),
    }
}

pub(crate) fn finish_raw_annotations<L>(bodies: Vec<String>) -> Annotations<L> {
    Annotations::Raw(RawOutput::from_bodies(bodies))
}

pub(crate) fn finish_query<S>(response: Value, opts: &QueryOptions) -> Result<QueryOutput<S>> {
    match opts.as_dataframe {
        Some(mode) => {
            let hits = response
                .get("hits")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            Ok(QueryOutput::Table(Table::from_hits(&hits, mode, false)?))
        }
        None => Ok(QueryOutput::Response(response)),
    }
}

/// Tally and shape the accumulated query-many hits
pub(crate) fn finish_querymany(hits: Vec<Value>, opts: &QueryManyOptions) -> Result<QueryMany> {
    if opts.verbose {
        tracing::info!("Finished.");
    }
    let tally = tally::tally_hits(&hits);

    if opts.verbose {
        if !tally.dup.is_empty() {
            tracing::warn!(
                "{} input query terms found dup hits:\t{}",
                tally.dup.len(),
                tally::preview(&tally.dup)
            );
        }
        if !tally.missing.is_empty() {
            tracing::warn!(
                "{} input query terms found no hit:\t{}",
                tally.missing.len(),
                tally::preview(&tally.missing)
            );
        }
    }

    let out = match opts.as_dataframe {
        Some(mode) => Records::Table(Table::from_hits(&hits, mode, opts.df_index)?),
        None => Records::Rows(hits),
    };

    if opts.returnall {
        return Ok(QueryMany::Report(QueryManyReport {
            out,
            dup: tally.dup,
            missing: tally.missing,
        }));
    }

    if opts.verbose && !tally.is_clean() {
        tracing::info!(
            "Pass \"returnall\" to return complete lists of duplicate or missing query terms."
        );
    }
    Ok(match out {
        Records::Rows(hits) => QueryMany::Hits(hits),
        Records::Table(table) => QueryMany::Table(table),
    })
}
