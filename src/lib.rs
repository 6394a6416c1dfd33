//! WebScribe - browser test recording, selector synthesis subsystem.
//!
//! This crate is the public surface of the recording subsystem: the
//! cue/selector primitives usable as an independent library (by passive
//! recording and by playback verification), and the interactive element
//! chooser driven by the recording-session controller.

pub use webscribe_core_types::{ContextId, RecorderMode, SessionId};

pub use context_adapter::{
    AdapterError, BrowsingContext, ContextEvent, Document, NodeId, PointerEvent, PointerEventKind,
};

pub use selector_synth::{
    build_cue_value_for_tag, build_cues, build_selector, get_clickable_ancestor, get_element_text,
    get_input_element_value, get_tokens, get_topmost_editable_element, is_clickable, is_dynamic,
    is_fillable, is_match, is_visible, query, resolve, to_selector, AttributePattern,
    CacheInvalidator, Cue, CueKind, ResolveError, Selector, SelectorCache, SelectorConfig,
    SelectorLevel,
};

pub use element_chooser::{ChooserState, ChooserValue, CodeModel, ElementChooser};
