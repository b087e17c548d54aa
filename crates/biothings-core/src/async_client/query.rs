use super::{AsyncBiothingClient, HitStream};
use crate::cache::CachingGuard;
use crate::client::common::finish_query;
use crate::engine::ScrollState;
use crate::error::Result;
use crate::options::QueryOptions;
use crate::output::QueryOutput;
use crate::transport::{AsyncTransport, Request};
use futures::stream::{self, StreamExt};

struct Scroll<'a, T> {
    client: &'a AsyncBiothingClient<T>,
    url: String,
    state: ScrollState,
    guard: Option<CachingGuard<'a>>,
    started: bool,
}

impl<T: AsyncTransport> AsyncBiothingClient<T> {
    /// Run a search query; with `fetch_all` every hit is streamed lazily
    pub async fn query<'a>(&'a self, q: &str, opts: &QueryOptions) -> Result<QueryOutput<HitStream<'a>>> {
        if opts.fetch_all {
            let (url, state) = self.core.scroll(q, opts);
            return Ok(QueryOutput::Scroll(self.scroll_stream(url, state)));
        }
        let request = self.core.query_request(q, opts);
        let (_, response) = self.fetch_json(&request).await?;
        finish_query(response, opts)
    }

    fn scroll_stream<'a>(&'a self, url: String, state: ScrollState) -> HitStream<'a> {
        let scroll = Scroll {
            client: self,
            url,
            state,
            guard: None,
            started: false,
        };

        stream::unfold(scroll, |mut sc| async move {
            if !sc.started {
                sc.started = true;
                let client: &'a AsyncBiothingClient<T> = sc.client;
                match CachingGuard::suspend(&client.transport, &client.suspensions) {
                    Ok(guard) => sc.guard = Some(guard),
                    Err(e) => {
                        sc.state.finish();
                        return Some((Err(e), sc));
                    }
                }
            }

            loop {
                if let Some(hit) = sc.state.pop_hit() {
                    return Some((Ok(hit), sc));
                }
                let params = sc.state.next_params()?;
                let request = Request::get(sc.url.clone()).with_params(params);
                match sc.client.fetch_json(&request).await {
                    Ok((_, page)) => sc.state.absorb(page),
                    Err(e) => {
                        sc.state.finish();
                        sc.guard = None;
                        return Some((Err(e), sc));
                    }
                }
            }
        })
        .boxed()
    }
}
