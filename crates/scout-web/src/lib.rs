//! Web surface for Scout: a single-page chat UI served by axum, with a
//! WebSocket per browsing session carrying the chat protocol.
//!
//! Each connection owns its own session and its own copy of the model
//! configuration (seeded from the server-wide config, overridable from the
//! sidebar). Turns run strictly one at a time per connection: the socket
//! is not read while a turn is in flight, so there is no concurrent
//! mutation and no cancellation path.

/// WebSocket wire frames.
pub mod protocol;
/// Router construction and the WebSocket chat loop.
pub mod server;

pub use protocol::{ClientFrame, EntrySnapshot, ServerFrame, StepSnapshot};
pub use server::{build_router, build_router_with_executors, AppState, ExecutorFactory};
