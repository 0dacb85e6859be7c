//! # notewise-core
//!
//! Core types, traits, and the rich-text engine for notewise.
//!
//! The centre of this crate is the [`delta`] module: a bidirectional
//! transform between Quill-style "Delta" documents and plain text, used so
//! that an external rewrite of the prose can be mapped back onto the
//! original formatting. [`TextEnhancer`] drives that round trip through a
//! [`RewriteService`].

pub mod defaults;
pub mod delta;
pub mod enhance;
pub mod error;
pub mod links;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use delta::{
    analyze, default_list_attribute, doc_to_plain, extract_text, is_list_like, plain_to_doc,
    plain_to_doc_with_links, preserve_list_formatting, reconstruct, reconstruct_with_analysis,
    text_conversions, AttributeSet, Delta, DeltaAnalysis, FormatSpan, LineBreakRecord, ListKind, Op,
};
pub use enhance::TextEnhancer;
pub use error::{Error, Result};
pub use links::{extract_links, extract_links_from_delta};
pub use models::*;
pub use traits::*;
