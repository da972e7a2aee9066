use serde::{Deserialize, Serialize};

/// Events emitted through a side channel while a turn executes.
///
/// Consumers (the WebSocket layer) render these incrementally, in emission
/// order, before the final answer arrives. The events are observational:
/// nothing is committed to the session until the whole turn succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    /// A fragment of streamed answer or rationale text.
    AnswerDelta {
        /// The text fragment.
        text: String,
    },

    /// A tool invocation has started.
    StepStarted {
        /// Tool name.
        tool: String,
        /// Rendered tool input.
        input: String,
        /// Rationale the model emitted alongside the call.
        log: String,
    },

    /// A tool invocation has finished.
    StepFinished {
        /// Tool name.
        tool: String,
        /// The tool's output.
        output: String,
        /// Whether the tool reported an error in-band.
        is_error: bool,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tags() {
        let event = TurnEvent::StepStarted {
            tool: "Search".to_string(),
            input: "weather in Tokyo".to_string(),
            log: "I should look this up".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"step_started\""));

        let back: TurnEvent = serde_json::from_str(&json).unwrap();
        match back {
            TurnEvent::StepStarted { tool, .. } => assert_eq!(tool, "Search"),
            other => panic!("expected StepStarted, got {other:?}"),
        }
    }

    #[test]
    fn answer_delta_round_trips() {
        let json = serde_json::to_string(&TurnEvent::AnswerDelta {
            text: "Par".to_string(),
        })
        .unwrap();
        assert!(json.contains("\"type\":\"answer_delta\""));
    }
}
