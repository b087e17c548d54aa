use super::common::{batch_hits, finish_querymany};
use super::BiothingClient;
use crate::engine::{chunked, log_batch, IntoTerms, Pacer};
use crate::error::{BiothingsError, Result};
use crate::options::QueryManyOptions;
use crate::output::{QueryMany, RawOutput};
use crate::transport::Transport;

impl<T: Transport> BiothingClient<T> {
    /// Match many query terms in paced batches
    ///
    /// Hits come back in batch order, then service order; a term may produce
    /// zero, one or several hits. Always materialized.
    pub fn querymany<'a, I>(&self, terms: I, opts: &QueryManyOptions) -> Result<QueryMany>
    where
        I: IntoTerms<'a>,
    {
        let mut pacer = Pacer::new(self.core.config.delay());
        let mut hits = Vec::new();
        let mut bodies = Vec::new();

        for batch in chunked(terms.into_terms(), self.core.step) {
            pacer.wait();
            log_batch(&batch, opts.verbose);
            let request = self.core.querymany_request(&batch.items, opts);
            if opts.return_raw {
                let (from_cache, payload) = self.fetch(&request, self.core.policy().raw(true))?;
                pacer.record(from_cache);
                bodies.push(payload.map(|p| p.into_text()).unwrap_or_default());
            } else {
                let (from_cache, body) = self.fetch_json(&request)?;
                pacer.record(from_cache);
                hits.extend(batch_hits(body));
            }
        }

        if opts.return_raw {
            if opts.verbose {
                tracing::info!("Finished.");
            }
            return Ok(QueryMany::Raw(RawOutput::from_bodies(bodies)));
        }
        finish_querymany(hits, opts)
    }

    /// Deprecated name of [`querymany`](Self::querymany) kept by the gene client
    pub fn findgenes<'a, I>(&self, terms: I, opts: &QueryManyOptions) -> Result<QueryMany>
    where
        I: IntoTerms<'a>,
    {
        if self.core.settings.resolve_method("findgenes").is_none() {
            return Err(BiothingsError::UnknownMethod {
                entity: self.core.settings.entity.clone(),
                method: "findgenes".to_string(),
            });
        }
        tracing::warn!("findgenes is deprecated, use querymany instead");
        self.querymany(terms, opts)
    }
}
