//! The chooser state machine.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::select;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use context_adapter::{BrowsingContext, ContextEvent, Document, NodeId, PointerEvent};
use selector_synth::{
    build_cues, build_selector, get_clickable_ancestor, get_element_text,
    get_topmost_editable_element, is_fillable, CacheInvalidator, SelectorCache, SelectorConfig,
    SelectorLevel,
};
use webscribe_core_types::{ContextId, RecorderMode, SessionId};

use crate::code::CodeModel;
use crate::value::ChooserValue;

/// Default symbolic variable for a context nobody bound a name to.
const DEFAULT_VARIABLE: &str = "page";

/// Chooser mode.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ChooserState {
    #[default]
    Idle,
    Active,
}

struct Listener {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Listener {
    fn teardown(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

#[derive(Default)]
struct Inner {
    state: ChooserState,
    context: Option<Arc<BrowsingContext>>,
    listener: Option<Listener>,
    invalidator: Option<CacheInvalidator>,
    /// Bumped on every context switch; listeners carry the generation they
    /// were spawned under and in-flight events from older generations are
    /// dropped.
    generation: u64,
}

struct Shared {
    session: SessionId,
    inner: Mutex<Inner>,
    config: SelectorConfig,
    code_model: Arc<CodeModel>,
    bindings: DashMap<ContextId, String>,
    cache: Arc<SelectorCache>,
    values_tx: watch::Sender<ChooserValue>,
}

/// Per-session element chooser.
///
/// Control operations (`start`, `stop`, `set_context`) are not internally
/// serialized; callers must not invoke them concurrently against the same
/// instance. All of them must run inside a tokio runtime.
pub struct ElementChooser {
    shared: Arc<Shared>,
}

impl ElementChooser {
    pub fn new() -> Self {
        Self::with_config(SelectorConfig::default(), Arc::new(CodeModel::new()))
    }

    pub fn with_config(config: SelectorConfig, code_model: Arc<CodeModel>) -> Self {
        let (values_tx, _) = watch::channel(ChooserValue::default());
        Self {
            shared: Arc::new(Shared {
                session: SessionId::new(),
                inner: Mutex::new(Inner::default()),
                config,
                code_model,
                bindings: DashMap::new(),
                cache: Arc::new(SelectorCache::new()),
                values_tx,
            }),
        }
    }

    /// Subscribe to the chooser-value stream. The boundary is
    /// last-write-wins: a slow consumer observes only the most recent value,
    /// but activity transitions are never overwritten by later interaction
    /// values before the next control call.
    pub fn subscribe(&self) -> watch::Receiver<ChooserValue> {
        self.shared.values_tx.subscribe()
    }

    pub fn state(&self) -> ChooserState {
        self.shared.inner.lock().state
    }

    /// The declared-variable model consulted for initialization snippets.
    pub fn code_model(&self) -> &Arc<CodeModel> {
        &self.shared.code_model
    }

    /// Associate a symbolic variable with a context; emitted values carrying
    /// interactions from that context name it.
    pub fn bind_variable(&self, context: &ContextId, variable: impl Into<String>) {
        self.shared.bindings.insert(context.clone(), variable.into());
    }

    /// Idle -> Active. Suspends passive recording on the bound context and
    /// attaches pointer listeners. Emits one activity value. A disposed
    /// bound context makes this a no-op.
    pub fn start(&self) {
        let shared = Arc::clone(&self.shared);
        let mut inner = shared.inner.lock();

        if let Some(ctx) = &inner.context {
            if ctx.is_disposed() {
                debug!(context = %ctx.id(), "start on disposed context ignored");
                return;
            }
        }

        inner.state = ChooserState::Active;
        if let Some(ctx) = inner.context.clone() {
            self.bind(&mut inner, &ctx);
        }
        debug!(session = %shared.session, "chooser started");

        let (variable, page) = self.current_binding(&inner);
        drop(inner);
        // send_replace stores the value even while nobody subscribes yet
        let _ = shared
            .values_tx
            .send_replace(ChooserValue::activity(true, variable, page));
    }

    /// Active -> Idle. Detaches listeners and resumes passive recording.
    /// Emits one activity value unless the bound context is disposed.
    pub fn stop(&self) {
        let shared = Arc::clone(&self.shared);
        let mut inner = shared.inner.lock();

        inner.state = ChooserState::Idle;
        if let Some(listener) = inner.listener.take() {
            listener.teardown();
        }
        inner.invalidator = None;

        let mut emit = true;
        if let Some(ctx) = &inner.context {
            if ctx.is_disposed() {
                emit = false;
            } else {
                ctx.set_mode(RecorderMode::Passive);
            }
        }
        debug!(session = %shared.session, "chooser stopped");

        let (variable, page) = self.current_binding(&inner);
        drop(inner);
        if emit {
            let _ = shared
                .values_tx
                .send_replace(ChooserValue::activity(false, variable, page));
        }
    }

    /// Re-target the observed browsing context. If currently active, the old
    /// context's listeners are torn down (and its passive recording resumed)
    /// and listeners are rebound to the new context in the same call;
    /// callers never stop/start around a switch. After this returns, no
    /// emitted value references the previous context.
    pub fn set_context(&self, context: Arc<BrowsingContext>) {
        let mut inner = self.shared.inner.lock();

        inner.generation += 1;
        if let Some(listener) = inner.listener.take() {
            listener.teardown();
        }
        inner.invalidator = None;
        if let Some(old) = inner.context.take() {
            if !old.is_disposed() {
                old.set_mode(RecorderMode::Passive);
            }
        }
        self.shared.cache.clear();

        debug!(context = %context.id(), generation = inner.generation, "chooser context switched");
        inner.context = Some(Arc::clone(&context));
        if inner.state == ChooserState::Active && !context.is_disposed() {
            self.bind(&mut inner, &context);
        }
    }

    /// Suspend recording on `ctx` and ensure the listener set is attached.
    fn bind(&self, inner: &mut Inner, ctx: &Arc<BrowsingContext>) {
        ctx.set_mode(RecorderMode::Chooser);
        if inner.listener.is_none() {
            inner.listener = Some(spawn_listener(
                Arc::clone(&self.shared),
                Arc::clone(ctx),
                inner.generation,
            ));
        }
        if inner.invalidator.is_none() {
            let mut invalidator = CacheInvalidator::new(Arc::clone(&self.shared.cache));
            invalidator.start(ctx);
            inner.invalidator = Some(invalidator);
        }
    }

    fn current_binding(&self, inner: &Inner) -> (String, Option<ContextId>) {
        match &inner.context {
            Some(ctx) => (variable_for(&self.shared, ctx.id()), Some(ctx.id().clone())),
            None => (DEFAULT_VARIABLE.to_string(), None),
        }
    }
}

impl Default for ElementChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ElementChooser {
    fn drop(&mut self) {
        let mut inner = self.shared.inner.lock();
        if let Some(listener) = inner.listener.take() {
            listener.teardown();
        }
        inner.invalidator = None;
    }
}

fn variable_for(shared: &Shared, context: &ContextId) -> String {
    shared
        .bindings
        .get(context)
        .map(|entry| entry.value().clone())
        .unwrap_or_else(|| DEFAULT_VARIABLE.to_string())
}

fn spawn_listener(
    shared: Arc<Shared>,
    ctx: Arc<BrowsingContext>,
    generation: u64,
) -> Listener {
    let cancel = CancellationToken::new();
    let child = cancel.clone();
    let mut pointer_rx = ctx.subscribe_pointer();
    let mut lifecycle_rx = ctx.subscribe_lifecycle();

    let task = tokio::spawn(async move {
        debug!(context = %ctx.id(), generation, "chooser listener attached");
        loop {
            select! {
                _ = child.cancelled() => break,
                event = pointer_rx.recv() => {
                    match event {
                        Ok(event) => handle_pointer(&shared, &ctx, event, generation),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            // hover spam; last-write-wins makes this harmless
                            warn!(context = %ctx.id(), skipped, "chooser listener lagged");
                            continue;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
                event = lifecycle_rx.recv() => {
                    match event {
                        // disposal detaches the listener set proactively
                        Ok(ContextEvent::Disposed { .. }) => break,
                        Ok(_) => continue,
                        Err(_) => break,
                    }
                }
            }
        }
        debug!(context = %ctx.id(), generation, "chooser listener detached");
    });

    Listener { cancel, task }
}

/// One qualifying pointer event becomes at most one emitted value. Runs
/// synchronously within the event's handling tick; the inner lock is held
/// through the emit so a concurrent context switch either completes before
/// (event dropped by the generation fence) or after (value already out,
/// still referencing the then-current context).
fn handle_pointer(shared: &Shared, ctx: &Arc<BrowsingContext>, event: PointerEvent, generation: u64) {
    let inner = shared.inner.lock();
    if inner.state != ChooserState::Active || inner.generation != generation {
        return;
    }
    if ctx.is_disposed() {
        return;
    }
    let doc = ctx.document();
    if doc.epoch() != event.epoch {
        // raised against a document that has since been navigated away
        return;
    }
    let value = build_value(shared, &doc, ctx, event.target);
    let _ = shared.values_tx.send_replace(value);
}

fn build_value(
    shared: &Shared,
    doc: &Document,
    ctx: &Arc<BrowsingContext>,
    target: NodeId,
) -> ChooserValue {
    let variable = variable_for(shared, ctx.id());

    // resolve the raw event target to the element a user means
    let element = if doc.contains(target) && doc.is_element(target) {
        if is_fillable(doc, target) {
            get_topmost_editable_element(doc, target)
        } else {
            get_clickable_ancestor(doc, target)
        }
    } else {
        target
    };

    let selector = build_selector(doc, element, &shared.config, &shared.cache);
    let mut selectors = vec![selector.render()];
    for cue in build_cues(doc, element, &shared.config) {
        let rendered = SelectorLevel::new(vec![cue]).render();
        if !rendered.is_empty() && !selectors.contains(&rendered) {
            selectors.push(rendered);
        }
    }

    ChooserValue {
        is_active: true,
        selectors,
        text: get_element_text(doc, element),
        is_fillable: is_fillable(doc, element),
        initialize_code: shared.code_model.initialize_code(&variable),
        variable,
        page: Some(ctx.id().clone()),
    }
}
