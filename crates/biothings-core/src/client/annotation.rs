//! Single and batch annotation lookups

use super::common::{batch_hits, finish_annotations, finish_raw_annotations};
use super::BiothingClient;
use crate::engine::{chunked, log_batch, Chunked, IntoTerms, Pacer, Terms};
use crate::error::Result;
use crate::options::{GetManyOptions, GetOptions};
use crate::output::Annotations;
use crate::transport::Transport;
use serde_json::Value;
use std::collections::VecDeque;

impl<T: Transport> BiothingClient<T> {
    /// Fetch one entity by id; `None` when the service answers 404
    pub fn get_annotation(&self, id: &str, opts: &GetOptions) -> Result<Option<Value>> {
        let request = self.core.annotation_request(id, opts);
        let (_, payload) = self.fetch(&request, self.core.policy().none_on_404())?;
        payload.map(|p| p.into_json(&request.url)).transpose()
    }

    /// Like [`get_annotation`](Self::get_annotation) but returns the body undecoded
    pub fn get_annotation_raw(&self, id: &str, opts: &GetOptions) -> Result<Option<String>> {
        let request = self.core.annotation_request(id, opts);
        let (_, payload) = self.fetch(&request, self.core.policy().none_on_404().raw(true))?;
        Ok(payload.map(|p| p.into_text()))
    }

    /// Fetch many entities in paced batches of `min(step, max_query)` ids
    ///
    /// Results follow input order. With `as_generator` the returned sequence is
    /// lazy and nothing is sent until it is first pulled.
    pub fn get_annotations<'a, I>(
        &'a self,
        ids: I,
        opts: &GetManyOptions,
    ) -> Result<Annotations<AnnotationIter<'a, T>>>
    where
        I: IntoTerms<'a>,
    {
        let ids = self.core.annotation_ids(ids);

        if opts.as_generator {
            if opts.return_raw || opts.as_dataframe.is_some() {
                tracing::warn!("Ignored 'return_raw' and 'as_dataframe' for a lazy result");
            }
            return Ok(Annotations::Lazy(AnnotationIter::new(self, ids, opts.clone())));
        }

        let mut pacer = Pacer::new(self.core.config.delay());

        if opts.return_raw {
            let mut bodies = Vec::new();
            for batch in chunked(ids, self.core.step) {
                pacer.wait();
                log_batch(&batch, opts.verbose);
                let request = self.core.annotations_request(&batch.items, opts);
                let (from_cache, payload) = self.fetch(&request, self.core.policy().raw(true))?;
                pacer.record(from_cache);
                bodies.push(payload.map(|p| p.into_text()).unwrap_or_default());
            }
            return Ok(finish_raw_annotations(bodies));
        }

        let mut rows = Vec::new();
        for batch in chunked(ids, self.core.step) {
            pacer.wait();
            log_batch(&batch, opts.verbose);
            let (from_cache, hits) = self.annotation_batch(&batch.items, opts)?;
            pacer.record(from_cache);
            rows.extend(hits);
        }
        finish_annotations(rows, opts)
    }

    fn annotation_batch(&self, batch: &[String], opts: &GetManyOptions) -> Result<(bool, Vec<Value>)> {
        let request = self.core.annotations_request(batch, opts);
        let (from_cache, body) = self.fetch_json(&request)?;
        Ok((from_cache, batch_hits(body)))
    }
}

/// Lazy batch annotation sequence
///
/// Yields hits one at a time, fetching the next batch only when the buffered
/// hits are used up. A failed batch yields one `Err` and ends the sequence.
pub struct AnnotationIter<'a, T> {
    client: &'a BiothingClient<T>,
    batches: Chunked<Terms<'a>>,
    opts: GetManyOptions,
    pacer: Pacer,
    buffered: VecDeque<Value>,
    done: bool,
}

impl<'a, T: Transport> AnnotationIter<'a, T> {
    fn new(client: &'a BiothingClient<T>, ids: Terms<'a>, opts: GetManyOptions) -> Self {
        Self {
            client,
            batches: chunked(ids, client.core.step),
            pacer: Pacer::new(client.core.config.delay()),
            opts,
            buffered: VecDeque::new(),
            done: false,
        }
    }
}

impl<T: Transport> Iterator for AnnotationIter<'_, T> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(hit) = self.buffered.pop_front() {
                return Some(Ok(hit));
            }
            if self.done {
                return None;
            }
            let Some(batch) = self.batches.next() else {
                self.done = true;
                return None;
            };
            self.pacer.wait();
            log_batch(&batch, self.opts.verbose);
            match self.client.annotation_batch(&batch.items, &self.opts) {
                Ok((from_cache, hits)) => {
                    self.pacer.record(from_cache);
                    self.buffered.extend(hits);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
