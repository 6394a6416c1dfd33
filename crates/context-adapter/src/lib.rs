//! Browsing-context abstraction for the recording subsystem.
//!
//! A [`BrowsingContext`] owns one live [`Document`] at a time and exposes:
//! - read access to the DOM snapshot,
//! - subscription to pointer/click events raised against the document,
//! - lifecycle events (navigation, disposal) for cache invalidation,
//! - the per-context recorder mode cell used for chooser/recorder
//!   mutual exclusion.
//!
//! Element references ([`NodeId`]) are valid only within one document and
//! must never be carried across a navigation.

pub mod context;
pub mod dom;
pub mod errors;

pub use context::*;
pub use dom::*;
pub use errors::*;
