//! Declared-variable tracking for initialization snippets.
//!
//! The code generator (out of scope here) keeps generated tests referring to
//! pages through symbolic variables. When the chooser reports an interaction
//! on a context whose variable the generated code has not declared yet, the
//! emitted value carries the setup line that brings it into existence.

use std::collections::HashSet;

use parking_lot::RwLock;

/// Set of page variables the generated code already declares.
#[derive(Default)]
pub struct CodeModel {
    declared: RwLock<HashSet<String>>,
}

impl CodeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the generated code declares `variable`.
    pub fn declare(&self, variable: impl Into<String>) {
        self.declared.write().insert(variable.into());
    }

    pub fn is_declared(&self, variable: &str) -> bool {
        self.declared.read().contains(variable)
    }

    /// Setup snippet for `variable`; empty when it is already declared.
    pub fn initialize_code(&self, variable: &str) -> String {
        if self.is_declared(variable) {
            String::new()
        } else {
            format!("let {variable} = browser.wait_for_page().await?;")
        }
    }
}
