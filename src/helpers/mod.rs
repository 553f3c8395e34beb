//! Helper functions for templates
//!
//! Date formatting, URL generation, HTML snippets and the comment widget.

mod comments;
mod date;
mod html;
mod url;

pub use comments::*;
pub use date::*;
pub use html::*;
pub use url::*;
