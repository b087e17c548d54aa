use super::{AsyncBiothingClient, HitStream};
use crate::client::common::{batch_hits, finish_annotations, finish_raw_annotations};
use crate::engine::{chunked, log_batch, Chunked, IntoTerms, Pacer, Terms};
use crate::error::Result;
use crate::options::{GetManyOptions, GetOptions};
use crate::output::Annotations;
use crate::transport::AsyncTransport;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::collections::VecDeque;

impl<T: AsyncTransport> AsyncBiothingClient<T> {
    /// Fetch one entity by id; `None` when the service answers 404
    pub async fn get_annotation(&self, id: &str, opts: &GetOptions) -> Result<Option<Value>> {
        let request = self.core.annotation_request(id, opts);
        let (_, payload) = self
            .fetch(&request, self.core.policy().none_on_404())
            .await?;
        payload.map(|p| p.into_json(&request.url)).transpose()
    }

    pub async fn get_annotation_raw(&self, id: &str, opts: &GetOptions) -> Result<Option<String>> {
        let request = self.core.annotation_request(id, opts);
        let (_, payload) = self
            .fetch(&request, self.core.policy().none_on_404().raw(true))
            .await?;
        Ok(payload.map(|p| p.into_text()))
    }

    /// Fetch many entities in paced batches; lazy as a stream with `as_generator`
    pub async fn get_annotations<'a, I>(
        &'a self,
        ids: I,
        opts: &GetManyOptions,
    ) -> Result<Annotations<HitStream<'a>>>
    where
        I: IntoTerms<'a>,
    {
        let ids = self.core.annotation_ids(ids);

        if opts.as_generator {
            if opts.return_raw || opts.as_dataframe.is_some() {
                tracing::warn!("Ignored 'return_raw' and 'as_dataframe' for a lazy result");
            }
            return Ok(Annotations::Lazy(self.annotation_stream(ids, opts.clone())));
        }

        let mut pacer = Pacer::new(self.core.config.delay());

        if opts.return_raw {
            let mut bodies = Vec::new();
            for batch in chunked(ids, self.core.step) {
                pacer.wait_async().await;
                log_batch(&batch, opts.verbose);
                let request = self.core.annotations_request(&batch.items, opts);
                let (from_cache, payload) = self
                    .fetch(&request, self.core.policy().raw(true))
                    .await?;
                pacer.record(from_cache);
                bodies.push(payload.map(|p| p.into_text()).unwrap_or_default());
            }
            return Ok(finish_raw_annotations(bodies));
        }

        let mut rows = Vec::new();
        for batch in chunked(ids, self.core.step) {
            pacer.wait_async().await;
            log_batch(&batch, opts.verbose);
            let (from_cache, hits) = self.annotation_batch(&batch.items, opts).await?;
            pacer.record(from_cache);
            rows.extend(hits);
        }
        finish_annotations(rows, opts)
    }

    async fn annotation_batch(&self, batch: &[String], opts: &GetManyOptions) -> Result<(bool, Vec<Value>)> {
        let request = self.core.annotations_request(batch, opts);
        let (from_cache, body) = self.fetch_json(&request).await?;
        Ok((from_cache, batch_hits(body)))
    }

    fn annotation_stream<'a>(&'a self, ids: Terms<'a>, opts: GetManyOptions) -> HitStream<'a> {
        let state = LazyAnnotations {
            client: self,
            batches: chunked(ids, self.core.step),
            pacer: Pacer::new(self.core.config.delay()),
            opts,
            buffered: VecDeque::new(),
            done: false,
        };

        stream::unfold(state, |mut st| async move {
            loop {
                if let Some(hit) = st.buffered.pop_front() {
                    return Some((Ok(hit), st));
                }
                if st.done {
                    return None;
                }
                let batch = st.batches.next()?;
                st.pacer.wait_async().await;
                log_batch(&batch, st.opts.verbose);
                match st.client.annotation_batch(&batch.items, &st.opts).await {
                    Ok((from_cache, hits)) => {
                        st.pacer.record(from_cache);
                        st.buffered.extend(hits);
                    }
                    Err(e) => {
                        st.done = true;
                        return Some((Err(e), st));
                    }
                }
            }
        })
        .boxed()
    }
}

struct LazyAnnotations<'a, T> {
    client: &'a AsyncBiothingClient<T>,
    batches: Chunked<Terms<'a>>,
    opts: GetManyOptions,
    pacer: Pacer,
    buffered: VecDeque<Value>,
    done: bool,
}
