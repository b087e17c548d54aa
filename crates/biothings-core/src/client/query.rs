//! Search queries and `fetch_all` scrolling

use super::common::finish_query;
use super::BiothingClient;
use crate::cache::CachingGuard;
use crate::engine::ScrollState;
use crate::error::Result;
use crate::options::QueryOptions;
use crate::output::QueryOutput;
use crate::transport::{Request, Transport};
use serde_json::Value;

impl<T: Transport> BiothingClient<T> {
    /// Run a search query
    ///
    /// With `fetch_all` the result is a lazy [`ScrollIter`] over every hit;
    /// `size`, `skip` and `sort` are then ignored.
    pub fn query<'a>(&'a self, q: &str, opts: &QueryOptions) -> Result<QueryOutput<ScrollIter<'a, T>>> {
        if opts.fetch_all {
            let (url, state) = self.core.scroll(q, opts);
            return Ok(QueryOutput::Scroll(ScrollIter {
                client: self,
                url,
                state,
                guard: None,
                started: false,
            }));
        }
        let request = self.core.query_request(q, opts);
        let (_, response) = self.fetch_json(&request)?;
        finish_query(response, opts)
    }
}

/// Lazy, single-pass sequence of every hit of a `fetch_all` query
///
/// Response caching is suspended from the first pull until the sequence ends
/// or is dropped.
pub struct ScrollIter<'a, T> {
    client: &'a BiothingClient<T>,
    url: String,
    state: ScrollState,
    guard: Option<CachingGuard<'a>>,
    started: bool,
}

impl<'a, T: Transport + 'a> ScrollIter<'a, T> {
    fn fail(&mut self, e: crate::error::BiothingsError) -> Option<Result<Value>> {
        self.state.finish();
        self.guard = None;
        Some(Err(e))
    }
}

impl<'a, T: Transport + 'a> Iterator for ScrollIter<'a, T> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            let client: &'a BiothingClient<T> = self.client;
            match CachingGuard::suspend(&client.transport, &client.suspensions) {
                Ok(guard) => self.guard = Some(guard),
                Err(e) => return self.fail(e),
            }
        }

        loop {
            if let Some(hit) = self.state.pop_hit() {
                return Some(Ok(hit));
            }
            let Some(params) = self.state.next_params() else {
                self.guard = None;
                return None;
            };
            let request = Request::get(self.url.clone()).with_params(params);
            match self.client.fetch_json(&request) {
                Ok((_, page)) => self.state.absorb(page),
                Err(e) => return self.fail(e),
            }
        }
    }
}
