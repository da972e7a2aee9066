use scout_core::{Message, Role, ToolStep};
use serde::Serialize;
use std::collections::HashMap;

/// Greeting seeded as the sole assistant message after a reset.
pub const GREETING: &str = "Hi! Ask me anything — I can search the web when I need to.";

/// One rendered transcript entry: a message and the trace behind it.
///
/// `steps` is empty for user messages and for assistant messages that
/// answered without tools. Internal recovery steps are already filtered
/// out.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry<'a> {
    /// Position of the message in the transcript.
    pub index: usize,
    /// The message itself.
    pub message: &'a Message,
    /// The tool steps recorded for this message, in execution order.
    pub steps: Vec<&'a ToolStep>,
}

/// A single user's conversation: ordered messages plus per-assistant-turn
/// tool traces.
///
/// The session exclusively owns its messages and steps. Messages are
/// append-only and keyed by position; the step map only ever holds indices
/// of assistant messages. All mutation happens through `&mut self`, so a
/// turn either commits fully or not at all.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<Message>,
    steps: HashMap<usize, Vec<ToolStep>>,
}

impl ChatSession {
    /// Creates a session already seeded with the greeting message.
    pub fn new() -> Self {
        let mut session = Self {
            messages: Vec::new(),
            steps: HashMap::new(),
        };
        session.reset();
        session
    }

    /// Appends a user message at the next index and returns that index.
    pub fn append_user_message(&mut self, text: impl Into<String>) -> usize {
        self.messages.push(Message::user(text));
        self.messages.len() - 1
    }

    /// Appends an assistant message together with its tool-step trace.
    ///
    /// The message and its steps are recorded in one call so a turn can
    /// never leave an assistant message without its trace or vice versa.
    /// Returns the new message's index.
    pub fn append_assistant_turn(
        &mut self,
        text: impl Into<String>,
        steps: Vec<ToolStep>,
    ) -> usize {
        self.messages.push(Message::assistant(text));
        let index = self.messages.len() - 1;
        if !steps.is_empty() {
            self.steps.insert(index, steps);
        }
        index
    }

    /// Clears the transcript and all traces, then seeds the greeting.
    ///
    /// Calling `reset` twice in a row yields the same state as calling it
    /// once.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.steps.clear();
        self.messages.push(Message::assistant(GREETING));
    }

    /// Number of messages in the transcript, greeting included.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript is empty (only true mid-reset; a live
    /// session always carries at least the greeting).
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The raw stored steps for a message index, recovery markers included.
    pub fn steps_for(&self, index: usize) -> &[ToolStep] {
        self.steps.get(&index).map_or(&[], Vec::as_slice)
    }

    /// Lazy read-only view of the transcript in index order.
    ///
    /// Each entry pairs a message with its visible tool steps; internal
    /// recovery steps are excluded. The iterator borrows the session, so
    /// calling it again after further appends reflects the new state.
    pub fn render_view(&self) -> impl Iterator<Item = TranscriptEntry<'_>> {
        self.messages
            .iter()
            .enumerate()
            .map(move |(index, message)| TranscriptEntry {
                index,
                message,
                steps: self
                    .steps_for(index)
                    .iter()
                    .filter(|s| !s.is_recovery())
                    .collect(),
            })
    }

    /// The transcript as `(role, content)` pairs for the turn executor.
    pub fn history(&self) -> Vec<(Role, String)> {
        self.messages
            .iter()
            .map(|m| (m.role, m.content.clone()))
            .collect()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use scout_core::RECOVERY_TOOL;

    #[test]
    fn new_session_carries_only_the_greeting() {
        let session = ChatSession::new();
        assert_eq!(session.len(), 1);
        let entries: Vec<_> = session.render_view().collect();
        assert_eq!(entries[0].message.role, Role::Assistant);
        assert_eq!(entries[0].message.content, GREETING);
        assert!(entries[0].steps.is_empty());
    }

    #[test]
    fn append_returns_strictly_increasing_indices() {
        let mut session = ChatSession::new();
        let a = session.append_user_message("one");
        let b = session.append_assistant_turn("two", vec![]);
        let c = session.append_user_message("three");
        assert!(a < b && b < c);
    }

    #[test]
    fn steps_attach_to_their_assistant_message() {
        let mut session = ChatSession::new();
        session.append_user_message("weather?");
        let idx = session.append_assistant_turn(
            "Sunny",
            vec![ToolStep::new("Search", "weather", "Sunny", "")],
        );
        assert_eq!(session.steps_for(idx).len(), 1);
        assert_eq!(session.steps_for(idx)[0].tool, "Search");
        // The user message owns no steps.
        assert!(session.steps_for(idx - 1).is_empty());
    }

    #[test]
    fn render_view_hides_recovery_steps_but_storage_keeps_them() {
        let mut session = ChatSession::new();
        session.append_user_message("q");
        let idx = session.append_assistant_turn(
            "a",
            vec![
                ToolStep::new(RECOVERY_TOOL, "bad call", "error fed back", ""),
                ToolStep::new("Search", "q", "result", "looking it up"),
            ],
        );

        assert_eq!(session.steps_for(idx).len(), 2);

        let entry = session.render_view().nth(idx).unwrap();
        assert_eq!(entry.steps.len(), 1);
        assert_eq!(entry.steps[0].tool, "Search");
    }
}
