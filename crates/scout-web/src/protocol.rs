use scout_agent::TurnEvent;
use scout_core::Role;
use scout_session::ChatSession;
use serde::{Deserialize, Serialize};

/// Frames the browser sends over the WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Sidebar configuration update; absent fields keep their value.
    Configure {
        /// API credential.
        api_key: Option<String>,
        /// Model identifier.
        model: Option<String>,
        /// Endpoint base URL.
        base_url: Option<String>,
    },
    /// One user chat submission.
    UserMessage {
        /// The submitted text.
        content: String,
    },
    /// Clear the conversation back to the greeting.
    Reset,
}

/// One tool step as rendered to the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSnapshot {
    /// Tool name.
    pub tool: String,
    /// Rendered input.
    pub input: String,
    /// Tool output.
    pub output: String,
    /// Model rationale.
    pub log: String,
}

/// One transcript entry as rendered to the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrySnapshot {
    /// Position in the transcript.
    pub index: usize,
    /// Author role.
    pub role: Role,
    /// Message text.
    pub content: String,
    /// Visible tool steps behind this message.
    pub steps: Vec<StepSnapshot>,
}

/// Frames the server sends over the WebSocket.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Full transcript snapshot (sent on connect, reset, and turn end).
    Transcript {
        /// Entries in index order.
        entries: Vec<EntrySnapshot>,
    },
    /// A tool invocation started.
    StepStarted {
        /// Tool name.
        tool: String,
        /// Rendered input.
        input: String,
        /// Model rationale.
        log: String,
    },
    /// A tool invocation finished.
    StepFinished {
        /// Tool name.
        tool: String,
        /// Tool output.
        output: String,
        /// Whether the tool reported an error.
        is_error: bool,
    },
    /// A fragment of streamed answer text.
    AnswerDelta {
        /// The fragment.
        text: String,
    },
    /// The turn committed successfully.
    TurnComplete {
        /// Index of the committed assistant message.
        index: usize,
    },
    /// The turn (or a configuration check) failed; transcript unchanged.
    Error {
        /// Human-readable cause.
        message: String,
    },
}

impl From<TurnEvent> for ServerFrame {
    fn from(event: TurnEvent) -> Self {
        match event {
            TurnEvent::AnswerDelta { text } => Self::AnswerDelta { text },
            TurnEvent::StepStarted { tool, input, log } => Self::StepStarted { tool, input, log },
            TurnEvent::StepFinished {
                tool,
                output,
                is_error,
            } => Self::StepFinished {
                tool,
                output,
                is_error,
            },
        }
    }
}

/// Snapshots the session's rendered view for the wire.
pub fn snapshot(session: &ChatSession) -> ServerFrame {
    ServerFrame::Transcript {
        entries: session
            .render_view()
            .map(|entry| EntrySnapshot {
                index: entry.index,
                role: entry.message.role,
                content: entry.message.content.clone(),
                steps: entry
                    .steps
                    .iter()
                    .map(|s| StepSnapshot {
                        tool: s.tool.clone(),
                        input: s.input.clone(),
                        output: s.output.clone(),
                        log: s.log.clone(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use scout_core::{ToolStep, RECOVERY_TOOL};

    #[test]
    fn client_frames_deserialize() {
        let frame: ClientFrame = serde_json::from_str(
            r#"{"type": "configure", "api_key": "sk-x", "model": "gpt-4o-mini"}"#,
        )
        .unwrap();
        match frame {
            ClientFrame::Configure {
                api_key, base_url, ..
            } => {
                assert_eq!(api_key.as_deref(), Some("sk-x"));
                assert!(base_url.is_none());
            }
            other => panic!("expected Configure, got {other:?}"),
        }

        let frame: ClientFrame =
            serde_json::from_str(r#"{"type": "user_message", "content": "hi"}"#).unwrap();
        assert!(matches!(frame, ClientFrame::UserMessage { .. }));

        let frame: ClientFrame = serde_json::from_str(r#"{"type": "reset"}"#).unwrap();
        assert!(matches!(frame, ClientFrame::Reset));
    }

    #[test]
    fn snapshot_excludes_recovery_steps() {
        let mut session = ChatSession::new();
        session.append_user_message("q");
        session.append_assistant_turn(
            "a",
            vec![
                ToolStep::new(RECOVERY_TOOL, "x", "y", ""),
                ToolStep::new("Search", "q", "r", ""),
            ],
        );

        let ServerFrame::Transcript { entries } = snapshot(&session) else {
            panic!("expected Transcript");
        };
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].steps.len(), 1);
        assert_eq!(entries[2].steps[0].tool, "Search");
    }

    #[test]
    fn server_frames_carry_type_tags() {
        let json = serde_json::to_string(&ServerFrame::TurnComplete { index: 4 }).unwrap();
        assert!(json.contains("\"type\":\"turn_complete\""));

        let json = serde_json::to_string(&ServerFrame::Error {
            message: "HTTP error: 401".to_string(),
        })
        .unwrap();
        assert!(json.contains("\"type\":\"error\""));
    }
}
