//! The record emitted on every qualifying chooser interaction.

use serde::{Deserialize, Serialize};
use webscribe_core_types::ContextId;

/// One emitted chooser value.
///
/// Activity transitions (`start`/`stop`) emit a value carrying only the
/// updated flag; interactions fill in the remaining fields.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChooserValue {
    pub is_active: bool,

    /// Selector candidates for the target, most to least specific.
    pub selectors: Vec<String>,

    /// Canonical visible text of the target.
    pub text: String,

    /// Whether the target accepts direct text input.
    pub is_fillable: bool,

    /// Setup snippet required before interacting; empty when none is needed.
    pub initialize_code: String,

    /// Symbolic variable bound to the current context.
    pub variable: String,

    /// The context the interaction happened in.
    pub page: Option<ContextId>,
}

impl ChooserValue {
    /// A value carrying only an activity transition.
    pub fn activity(is_active: bool, variable: String, page: Option<ContextId>) -> Self {
        Self {
            is_active,
            variable,
            page,
            ..Self::default()
        }
    }
}
