use crate::events::TurnEvent;
use crate::executor::TurnExecutor;
use scout_core::ScoutResult;
use scout_session::ChatSession;
use scout_tools::ToolRegistry;
use tokio::sync::mpsc;
use tracing::info;

/// Runs one turn against `executor` and commits it into `session`.
///
/// The executor sees the transcript as it was before the turn; nothing is
/// appended until it returns. On success the user message and the
/// assistant turn (answer plus trace) are committed together, so a failure
/// anywhere — even after partial tool-step events were emitted — leaves
/// the session byte-identical to its pre-turn state.
///
/// Returns the committed assistant message's index.
pub async fn run_turn(
    session: &mut ChatSession,
    executor: &dyn TurnExecutor,
    tools: &ToolRegistry,
    user_text: &str,
    events: mpsc::Sender<TurnEvent>,
) -> ScoutResult<usize> {
    let history = session.history();
    let outcome = executor.execute(&history, user_text, tools, events).await?;

    session.append_user_message(user_text);
    let index = session.append_assistant_turn(outcome.answer, outcome.steps);

    info!(index, "Turn committed");
    Ok(index)
}
