//! Turn execution for Scout: the boundary between the chat UI and the
//! conversational agent.
//!
//! The session and web layers only see the [`TurnExecutor`] trait — prior
//! transcript and user text in, final answer plus an ordered tool-step
//! trace out, with live [`TurnEvent`]s emitted through a channel while the
//! turn runs. The default implementation, [`ChatLoopExecutor`], drives an
//! OpenAI-compatible chat-completions API through a bounded tool-call
//! loop.

/// Model endpoint configuration.
pub mod config;
/// Chat backend seam and prompt message types.
pub mod backend;
/// OpenAI-compatible backend implementation.
pub mod openai;
/// Events emitted while a turn is running.
pub mod events;
/// The turn executor boundary and the default tool-loop implementation.
pub mod executor;
/// Turn commit: atomic append of a completed turn into the session.
pub mod turn;

pub use backend::{ChatBackend, ChatReply, PromptMessage, PromptRole, TokenDelta};
pub use config::ModelConfig;
pub use events::TurnEvent;
pub use executor::{ChatLoopExecutor, TurnExecutor, TurnOutcome};
pub use turn::run_turn;
