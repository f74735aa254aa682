//! Content sources: readers that turn a path or URL into chunked pages.
//!
//! Every reader applies the shared chunking policy from `doc-index`, so
//! retrieval behaves identically regardless of origin. PDF/DOCX parsing is
//! not implemented here; those readers are injected behind [`SourceReader`]
//! by the host application.

mod errors;
mod html;
mod reader;

pub use errors::SourceError;
pub use html::html_to_text;
pub use reader::{PlainTextReader, SourceReader, WebPageReader};
