//! Scoped suspension of response caching

use crate::error::Result;
use crate::transport::CacheControl;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct SuspendState {
    depth: usize,
    restore: bool,
}

/// Count of live guards over one transport
///
/// Caching is turned off by the first guard and back on by the last one, so
/// overlapping scrolls never see it re-enabled mid-flight.
#[derive(Debug, Default)]
pub struct Suspensions {
    state: Mutex<SuspendState>,
}

impl Suspensions {
    fn lock(&self) -> MutexGuard<'_, SuspendState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of guards currently alive
    pub fn depth(&self) -> usize {
        self.lock().depth
    }
}

/// Disables caching while alive and re-enables it when the last guard drops
///
/// Only toggles the flag; stored responses are left untouched.
pub struct CachingGuard<'a> {
    control: &'a (dyn CacheControl + Sync),
    suspensions: &'a Suspensions,
}

impl<'a> CachingGuard<'a> {
    /// Suspend caching if it is currently enabled
    pub fn suspend(control: &'a (dyn CacheControl + Sync), suspensions: &'a Suspensions) -> Result<Self> {
        let mut state = suspensions.lock();
        if state.depth == 0 {
            let restore = control.caching_enabled();
            if restore {
                tracing::warn!("Caching of http requests is implicitly disabled for fetch_all");
                control.set_caching(false)?;
            }
            state.restore = restore;
        }
        state.depth += 1;
        drop(state);
        Ok(Self { control, suspensions })
    }

    /// Whether caching will be re-enabled once every guard is dropped
    pub fn will_restore(&self) -> bool {
        self.suspensions.lock().restore
    }
}

impl Drop for CachingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.suspensions.lock();
        state.depth = state.depth.saturating_sub(1);
        if state.depth > 0 || !state.restore {
            return;
        }
        state.restore = false;
        match self.control.set_caching(true) {
            Ok(()) => tracing::info!("Re-enabling caching of http requests."),
            Err(e) => tracing::warn!("Failed to re-enable caching: {}", e),
        }
    }
}
