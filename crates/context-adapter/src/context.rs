//! Browsing-context handle: document ownership, event fan-out, mode cell.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use webscribe_core_types::{ContextId, RecorderMode};

use crate::dom::{Document, NodeId};
use crate::errors::AdapterError;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Pointer interaction kinds the chooser subscribes to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PointerEventKind {
    /// Pointer moved over the target (hover preview).
    Hover,
    /// Pointer confirmed the target.
    Click,
}

/// A pointer interaction raised against the context's current document.
#[derive(Clone, Copy, Debug)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub target: NodeId,
    /// Epoch of the document the event was raised against; consumers drop
    /// events whose epoch no longer matches the live document.
    pub epoch: u64,
}

/// Lifecycle transitions consumers use to invalidate per-document state.
#[derive(Clone, Debug)]
pub enum ContextEvent {
    Navigated { context: ContextId, epoch: u64 },
    Disposed { context: ContextId },
}

/// One page/tab/iframe instance with its own DOM, listener set, and
/// recorder-mode cell.
pub struct BrowsingContext {
    id: ContextId,
    document: RwLock<Document>,
    pointer_tx: broadcast::Sender<PointerEvent>,
    lifecycle_tx: broadcast::Sender<ContextEvent>,
    mode: Mutex<RecorderMode>,
    disposed: AtomicBool,
}

impl BrowsingContext {
    pub fn new() -> Arc<Self> {
        Self::with_document(Document::new())
    }

    pub fn with_document(document: Document) -> Arc<Self> {
        let (pointer_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (lifecycle_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            id: ContextId::new(),
            document: RwLock::new(document),
            pointer_tx,
            lifecycle_tx,
            mode: Mutex::new(RecorderMode::Passive),
            disposed: AtomicBool::new(false),
        })
    }

    pub fn id(&self) -> &ContextId {
        &self.id
    }

    /// Read access to the live document. Callers must not hold the guard
    /// across an await point.
    pub fn document(&self) -> RwLockReadGuard<'_, Document> {
        self.document.read()
    }

    /// Mutate the live document in place (attribute churn, subtree removal,
    /// the things a page does without navigating).
    pub fn with_document_mut<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut self.document.write())
    }

    /// Replace the document, as a page navigation does. Every element
    /// reference into the previous document is dead after this returns.
    pub fn navigate(&self, document: Document) -> Result<(), AdapterError> {
        if self.is_disposed() {
            return Err(AdapterError::ContextDisposed(self.id.clone()));
        }
        let epoch = document.epoch();
        *self.document.write() = document;
        debug!(context = %self.id, epoch, "context navigated");
        let _ = self.lifecycle_tx.send(ContextEvent::Navigated {
            context: self.id.clone(),
            epoch,
        });
        Ok(())
    }

    /// Dispose the context (tab closed). Idempotent.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!(context = %self.id, "context disposed");
        let _ = self.lifecycle_tx.send(ContextEvent::Disposed {
            context: self.id.clone(),
        });
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    pub fn subscribe_pointer(&self) -> broadcast::Receiver<PointerEvent> {
        self.pointer_tx.subscribe()
    }

    pub fn subscribe_lifecycle(&self) -> broadcast::Receiver<ContextEvent> {
        self.lifecycle_tx.subscribe()
    }

    /// Raise a hover event against the current document.
    pub fn hover(&self, target: NodeId) {
        self.emit_pointer(PointerEventKind::Hover, target);
    }

    /// Raise a click event against the current document.
    pub fn click(&self, target: NodeId) {
        self.emit_pointer(PointerEventKind::Click, target);
    }

    fn emit_pointer(&self, kind: PointerEventKind, target: NodeId) {
        if self.is_disposed() {
            warn!(context = %self.id, ?kind, "pointer event on disposed context dropped");
            return;
        }
        let epoch = self.document.read().epoch();
        let _ = self.pointer_tx.send(PointerEvent {
            kind,
            target,
            epoch,
        });
    }

    /// Current recorder mode for this context.
    pub fn mode(&self) -> RecorderMode {
        *self.mode.lock()
    }

    /// Swap the recorder mode, returning the previous value. The chooser is
    /// the single writer while it observes this context.
    pub fn set_mode(&self, mode: RecorderMode) -> RecorderMode {
        std::mem::replace(&mut *self.mode.lock(), mode)
    }

    /// Whether the passive action recorder currently observes this context.
    pub fn is_recording(&self) -> bool {
        !self.is_disposed() && self.mode() == RecorderMode::Passive
    }
}

impl std::fmt::Debug for BrowsingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowsingContext")
            .field("id", &self.id)
            .field("disposed", &self.is_disposed())
            .field("mode", &self.mode())
            .finish()
    }
}
