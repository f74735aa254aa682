//! Session layer: intent classification, turn control, and answer
//! composition over the retrieval stack.
//!
//! One [`ChatSession`] owns the loaded chunk set, the vocabulary, the
//! embedding index, and the enrichment caches as a single unit: a load
//! replaces all of them atomically, and queries are serialized behind the
//! same gate so they never observe a half-updated index.

mod compose;
mod errors;
mod intent;
mod session;
mod transcript;

pub use errors::SessionError;
pub use intent::{QueryIntent, classify_intent, is_follow_up};
pub use session::{ChatSession, SessionCapabilities, SourceKind};
pub use transcript::{ChatMessage, Transcript};
