//! Core chunk and search-hit shapes shared across the workspace.

use serde::{Deserialize, Serialize};

/// One addressable chunk of extracted document text.
///
/// Page numbers start at 1 and increase monotonically within a single load;
/// a new load replaces the whole chunk set at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// A single lexical search hit (ranked by term overlap).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub page_number: u32,
    /// Number of distinct query terms found in the chunk (always >= 1).
    pub score: u32,
    pub snippet: String,
}
