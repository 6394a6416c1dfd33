//! Shared primitives for the WebScribe recording subsystem.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one browsing context (a page/tab/iframe with its own DOM).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ContextId(pub String);

impl ContextId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one recording session (a chooser instance lives inside one).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What is currently allowed to observe DOM events on a context.
///
/// Exactly one mode is in effect per context at any instant; the chooser and
/// the passive action recorder are mutually exclusive writers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum RecorderMode {
    /// The passive action recorder observes the context.
    #[default]
    Passive,

    /// The element chooser observes the context; passive recording is
    /// suspended until the chooser releases the context.
    Chooser,
}

impl RecorderMode {
    pub fn name(&self) -> &'static str {
        match self {
            RecorderMode::Passive => "passive",
            RecorderMode::Chooser => "chooser",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_ids_are_unique() {
        assert_ne!(ContextId::new(), ContextId::new());
    }

    #[test]
    fn mode_defaults_to_passive() {
        assert_eq!(RecorderMode::default(), RecorderMode::Passive);
        assert_eq!(RecorderMode::Passive.name(), "passive");
        assert_eq!(RecorderMode::Chooser.name(), "chooser");
    }
}
