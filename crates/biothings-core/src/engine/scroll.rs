//! Scroll (fetch_all) pagination state

use serde_json::Value;
use std::collections::VecDeque;

/// Error prefix the services use to signal an exhausted scroll
pub const EXHAUSTED_PREFIX: &str = "No results to return";

/// Classified scroll page
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollPage {
    /// Clean end of the result set
    Exhausted,
    /// Soft error reported by the service
    Failed(String),
    Hits {
        hits: Vec<Value>,
        scroll_id: Option<String>,
        warning: Option<String>,
    },
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Classify one page returned by the query endpoint
pub fn classify_page(mut page: Value) -> ScrollPage {
    if let Some(error) = page.get("error") {
        let message = render(error);
        return if message.starts_with(EXHAUSTED_PREFIX) {
            ScrollPage::Exhausted
        } else {
            ScrollPage::Failed(message)
        };
    }

    let warning = page.get("_warning").map(render);
    let scroll_id = page
        .get("_scroll_id")
        .and_then(Value::as_str)
        .map(str::to_string);
    let hits = match page.get_mut("hits").map(Value::take) {
        Some(Value::Array(hits)) => hits,
        _ => Vec::new(),
    };

    ScrollPage::Hits {
        hits,
        scroll_id,
        warning,
    }
}

/// Total reported by the first page, either a number or `{"value": n}`
pub fn page_total(page: &Value) -> Option<u64> {
    let total = page.get("total")?;
    total
        .as_u64()
        .or_else(|| total.get("value").and_then(Value::as_u64))
}

/// Single-pass state machine behind the blocking and async scroll sequences
///
/// Hits are buffered one page at a time. The next request's parameters are
/// known only after a page was absorbed; `None` means the sequence is over.
#[derive(Debug)]
pub struct ScrollState {
    buffered: VecDeque<Value>,
    next: Option<Vec<(String, String)>>,
    base: Vec<(String, String)>,
    first_page: bool,
    label: String,
    verbose: bool,
}

impl ScrollState {
    /// `first` is sent on the opening request; `base` accompanies every cursor request
    pub fn new(
        first: Vec<(String, String)>,
        base: Vec<(String, String)>,
        label: impl Into<String>,
        verbose: bool,
    ) -> Self {
        Self {
            buffered: VecDeque::new(),
            next: Some(first),
            base,
            first_page: true,
            label: label.into(),
            verbose,
        }
    }

    pub fn pop_hit(&mut self) -> Option<Value> {
        self.buffered.pop_front()
    }

    /// Parameters of the next page request, consumed on read
    pub fn next_params(&mut self) -> Option<Vec<(String, String)>> {
        self.next.take()
    }

    pub fn absorb(&mut self, page: Value) {
        if self.first_page {
            self.first_page = false;
            if self.verbose {
                if let Some(total) = page_total(&page) {
                    tracing::info!("Fetching {} {} . . .", total, self.label);
                }
            }
        }

        match classify_page(page) {
            ScrollPage::Exhausted => {
                if self.verbose {
                    tracing::info!("Done.");
                }
                self.next = None;
            }
            ScrollPage::Failed(message) => {
                tracing::error!("{}", message);
                self.next = None;
            }
            ScrollPage::Hits {
                hits,
                scroll_id,
                warning,
            } => {
                if let Some(warning) = warning {
                    tracing::warn!("{}", warning);
                }
                if hits.is_empty() {
                    self.next = None;
                    return;
                }
                self.buffered.extend(hits);
                self.next = scroll_id.map(|id| {
                    let mut params = self.base.clone();
                    params.push(("scroll_id".to_string(), id));
                    params
                });
            }
        }
    }

    /// Abandon the sequence
    pub fn finish(&mut self) {
        self.next = None;
        self.buffered.clear();
    }

    pub fn is_finished(&self) -> bool {
        self.next.is_none() && self.buffered.is_empty()
    }
}
