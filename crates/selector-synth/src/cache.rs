//! Per-document selector caching and lifecycle-driven invalidation.
//!
//! The cache is purely an optimization: rebuilding after a clear must be
//! content-equal for a still-present element. Keys carry the document epoch,
//! so an entry from a pre-navigation document can never be served against
//! the post-navigation one even before the wholesale clear lands.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::select;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use context_adapter::{BrowsingContext, ContextEvent, Document, NodeId};

use crate::selector::Selector;

/// Bidirectional element/selector association scoped to one document.
#[derive(Default)]
pub struct SelectorCache {
    forward: DashMap<(u64, NodeId), Selector>,
    reverse: DashMap<String, Vec<(u64, NodeId)>>,
}

impl SelectorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last-built selector for an element of this document.
    pub fn get(&self, doc: &Document, node: NodeId) -> Option<Selector> {
        self.forward
            .get(&(doc.epoch(), node))
            .map(|entry| entry.value().clone())
    }

    pub fn insert(&self, doc: &Document, node: NodeId, selector: &Selector) {
        let key = (doc.epoch(), node);
        self.forward.insert(key, selector.clone());
        let mut entry = self.reverse.entry(selector.render()).or_default();
        if !entry.contains(&key) {
            entry.push(key);
        }
    }

    /// Elements of this document the rendered selector was built for.
    pub fn elements_for(&self, doc: &Document, rendered: &str) -> Vec<NodeId> {
        self.reverse
            .get(rendered)
            .map(|keys| {
                keys.iter()
                    .filter(|(epoch, _)| *epoch == doc.epoch())
                    .map(|(_, node)| *node)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Wholesale clear; invoked on every navigation and context disposal.
    pub fn clear(&self) {
        self.forward.clear();
        self.reverse.clear();
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Watches a context's lifecycle events and clears the selector cache when
/// the document it is scoped to goes away.
pub struct CacheInvalidator {
    cache: Arc<SelectorCache>,
    task: Option<JoinHandle<()>>,
    shutdown: CancellationToken,
}

impl CacheInvalidator {
    pub fn new(cache: Arc<SelectorCache>) -> Self {
        Self {
            cache,
            task: None,
            shutdown: CancellationToken::new(),
        }
    }

    /// Start watching lifecycle events from the given context.
    ///
    /// Invalidation policy: `Navigated` and `Disposed` both clear the whole
    /// cache; `Disposed` additionally ends the watch.
    pub fn start(&mut self, context: &BrowsingContext) {
        if let Some(handle) = self.task.take() {
            handle.abort();
        }

        let cache = Arc::clone(&self.cache);
        let shutdown = self.shutdown.clone();
        let mut rx = context.subscribe_lifecycle();

        self.task = Some(tokio::spawn(async move {
            debug!(target: "selector-cache", "invalidation watcher started");
            loop {
                select! {
                    _ = shutdown.cancelled() => break,
                    event = rx.recv() => {
                        match event {
                            Ok(ContextEvent::Navigated { context, epoch }) => {
                                debug!(target: "selector-cache", %context, epoch, "navigation, clearing selector cache");
                                cache.clear();
                            }
                            Ok(ContextEvent::Disposed { context }) => {
                                debug!(target: "selector-cache", %context, "context disposed, clearing selector cache");
                                cache.clear();
                                break;
                            }
                            Err(err) => {
                                warn!(target: "selector-cache", ?err, "lifecycle channel closed");
                                break;
                            }
                        }
                    }
                }
            }
        }));
    }

    /// Stop the watcher and wait for it to exit.
    pub async fn stop(&mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.task.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for CacheInvalidator {
    fn drop(&mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.task.take() {
            handle.abort();
        }
    }
}
