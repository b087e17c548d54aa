use super::AsyncBiothingClient;
use crate::client::common::{batch_hits, finish_querymany};
use crate::engine::{chunked, log_batch, IntoTerms, Pacer};
use crate::error::{BiothingsError, Result};
use crate::options::QueryManyOptions;
use crate::output::{QueryMany, RawOutput};
use crate::transport::AsyncTransport;

impl<T: AsyncTransport> AsyncBiothingClient<T> {
    /// Match many query terms in paced batches
    pub async fn querymany<'a, I>(&self, terms: I, opts: &QueryManyOptions) -> Result<QueryMany>
    where
        I: IntoTerms<'a>,
    {
        let mut pacer = Pacer::new(self.core.config.delay());
        let mut hits = Vec::new();
        let mut bodies = Vec::new();

        for batch in chunked(terms.into_terms(), self.core.step) {
            pacer.wait_async().await;
            log_batch(&batch, opts.verbose);
            let request = self.core.querymany_request(&batch.items, opts);
            if opts.return_raw {
                let (from_cache, payload) = self
                    .fetch(&request, self.core.policy().raw(true))
                    .await?;
                pacer.record(from_cache);
                bodies.push(payload.map(|p| p.into_text()).unwrap_or_default());
            } else {
                let (from_cache, body) = self.fetch_json(&request).await?;
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

    pub async fn findgenes<'a, I>(&self, terms: I, opts: &QueryManyOptions) -> Result<QueryMany>
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
        self.querymany(terms, opts).await
    }
}
