//! In-memory session store for Scout.
//!
//! Holds one conversation's transcript plus, per assistant turn, the
//! ordered tool-step trace produced while answering. Pure data with an
//! explicit init/reset lifecycle; there is no persistence and no sharing
//! across sessions.

/// The chat session and its transcript view.
pub mod session;

pub use session::{ChatSession, TranscriptEntry, GREETING};
