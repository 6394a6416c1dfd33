//! Interactive element chooser.
//!
//! A chooser instance serves one recording session and observes one
//! browsing context at a time. While active it converts every qualifying
//! pointer interaction into a [`ChooserValue`] carrying ordered selector
//! candidates, canonical text, and fillability, and it keeps itself
//! mutually exclusive with passive recording through the per-context
//! mode cell.

pub mod chooser;
pub mod code;
pub mod value;

pub use chooser::*;
pub use code::*;
pub use value::*;
