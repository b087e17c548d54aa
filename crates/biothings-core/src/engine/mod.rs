//! Batched query execution engine
//!
//! Building blocks shared by the blocking and async clients:
//! - [`partition`]: lazy fixed-size batches
//! - [`pacing`]: deferred inter-batch delay
//! - [`terms`]: normalization of identifier inputs
//! - [`response`]: one response policy for both transport models
//! - [`scroll`]: `fetch_all` pagination state
//! - [`tally`]: duplicate and not-found bookkeeping

pub mod pacing;
pub mod params;
pub mod partition;
pub mod response;
pub mod scroll;
pub mod tally;
pub mod terms;

pub use pacing::Pacer;
pub use params::{join_list, join_quoted, Params};
pub use partition::{chunked, Batch, Chunked};
pub use response::{interpret, Payload, ResponsePolicy};
pub use scroll::{classify_page, ScrollPage, ScrollState};
pub use tally::{tally_hits, Tally};
pub use terms::{IntoTerms, Terms};

/// Progress line logged before each batch goes out
pub(crate) fn log_batch<T>(batch: &Batch<T>, verbose: bool) {
    if verbose {
        tracing::info!("querying {}-{} ...", batch.start() + 1, batch.cumulative);
    }
}
