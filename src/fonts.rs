//! Font readiness signals awaited before a region is measured

use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use tokio::sync::watch;

/// Document-wide "all pending fonts have loaded" signal.
///
/// `ready` returns `None` when the platform exposes no such signal; callers
/// proceed immediately in that case and never invent a timeout.
pub trait FontReadiness: Send + Sync {
    fn ready(&self) -> Option<BoxFuture<'_, crate::Result<()>>>;
}

/// Platform without a font-loading signal
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFontSignal;

impl FontReadiness for NoFontSignal {
    fn ready(&self) -> Option<BoxFuture<'_, crate::Result<()>>> {
        None
    }
}

/// A signal that is already resolved
#[derive(Debug, Clone, Copy, Default)]
pub struct FontsSettled;

impl FontReadiness for FontsSettled {
    fn ready(&self) -> Option<BoxFuture<'_, crate::Result<()>>> {
        Some(futures::future::ready(Ok(())).boxed())
    }
}

/// Counts in-flight font loads; ready once the count drops to zero.
///
/// Each load is represented by a [`FontLoad`] ticket that settles when it is
/// finished or dropped.
#[derive(Debug, Clone)]
pub struct FontLoadTracker {
    pending: Arc<watch::Sender<usize>>,
}

impl Default for FontLoadTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLoadTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0usize);
        Self { pending: Arc::new(tx) }
    }

    /// Register a font load that is about to start.
    pub fn begin_load(&self, family: &str) -> FontLoad {
        self.pending.send_modify(|n| *n += 1);
        log::debug!("font load started: {}", family);
        FontLoad {
            pending: self.pending.clone(),
            family: family.to_string(),
        }
    }

    pub fn pending(&self) -> usize {
        *self.pending.borrow()
    }
}

impl FontReadiness for FontLoadTracker {
    fn ready(&self) -> Option<BoxFuture<'_, crate::Result<()>>> {
        let mut rx = self.pending.subscribe();
        Some(
            async move {
                rx.wait_for(|n| *n == 0)
                    .await
                    .map(|_| ())
                    .map_err(|e| crate::Error::CaptureError(format!("font readiness signal lost: {}", e)))
            }
            .boxed(),
        )
    }
}

/// One in-flight font load
#[derive(Debug)]
pub struct FontLoad {
    pending: Arc<watch::Sender<usize>>,
    family: String,
}

impl FontLoad {
    pub fn finish(self) {}
}

impl Drop for FontLoad {
    fn drop(&mut self) {
        self.pending.send_modify(|n| *n = n.saturating_sub(1));
        log::debug!("font load settled: {}", self.family);
    }
}
