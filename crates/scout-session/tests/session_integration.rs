//! Integration tests for the session store: ordering, atomicity, and the
//! reset lifecycle.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use scout_core::{Role, ToolStep};
use scout_session::{ChatSession, GREETING};

#[test]
fn render_view_orders_messages_and_steps() {
    let mut session = ChatSession::new();
    session.append_user_message("first question");
    session.append_assistant_turn(
        "first answer",
        vec![
            ToolStep::new("Search", "query one", "result one", "step 1"),
            ToolStep::new("Search", "query two", "result two", "step 2"),
        ],
    );
    session.append_user_message("second question");
    session.append_assistant_turn("second answer", vec![]);

    let entries: Vec<_> = session.render_view().collect();
    assert_eq!(entries.len(), 5);

    // Indices strictly increase and match positions.
    for (pos, entry) in entries.iter().enumerate() {
        assert_eq!(entry.index, pos);
    }

    // Roles match submission order: greeting, then alternating turns.
    let roles: Vec<Role> = entries.iter().map(|e| e.message.role).collect();
    assert_eq!(
        roles,
        vec![
            Role::Assistant,
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant,
        ]
    );

    // Steps appear in recorded order on their own assistant entry.
    assert_eq!(entries[2].steps.len(), 2);
    assert_eq!(entries[2].steps[0].input, "query one");
    assert_eq!(entries[2].steps[1].input, "query two");
    assert!(entries[4].steps.is_empty());
}

#[test]
fn render_view_is_restartable_and_reflects_later_appends() {
    let mut session = ChatSession::new();
    session.append_user_message("hello");
    assert_eq!(session.render_view().count(), 2);

    session.append_assistant_turn("hi", vec![]);
    assert_eq!(session.render_view().count(), 3);

    // A second pass yields the same sequence.
    let first: Vec<String> = session
        .render_view()
        .map(|e| e.message.content.clone())
        .collect();
    let second: Vec<String> = session
        .render_view()
        .map(|e| e.message.content.clone())
        .collect();
    assert_eq!(first, second);
}

#[test]
fn failed_turn_leaves_store_unchanged() {
    let mut session = ChatSession::new();
    session.append_user_message("works");
    session.append_assistant_turn("answered", vec![]);
    let before = session.len();

    // A failing turn never reaches the append calls: simulate by building
    // the steps buffer and dropping it without committing.
    let pending = vec![ToolStep::new("Search", "partial", "never shown", "")];
    drop(pending);

    assert_eq!(session.len(), before);
    assert!(session.steps_for(before).is_empty());
}

#[test]
fn reset_twice_equals_reset_once() {
    let mut session = ChatSession::new();
    session.append_user_message("question");
    session.append_assistant_turn(
        "answer",
        vec![ToolStep::new("Search", "q", "r", "")],
    );

    session.reset();
    let after_once: Vec<(Role, String)> = session.history();

    session.reset();
    let after_twice: Vec<(Role, String)> = session.history();

    assert_eq!(after_once, after_twice);
    assert_eq!(session.len(), 1);
    assert_eq!(after_twice[0], (Role::Assistant, GREETING.to_string()));
    assert!(session.steps_for(0).is_empty());
}

#[test]
fn reset_clears_traces_together_with_messages() {
    let mut session = ChatSession::new();
    session.append_user_message("q");
    let idx = session.append_assistant_turn(
        "a",
        vec![ToolStep::new("Search", "q", "r", "")],
    );
    assert_eq!(session.steps_for(idx).len(), 1);

    session.reset();

    // No stale trace may survive under any index.
    for entry in session.render_view() {
        assert!(entry.steps.is_empty());
    }
    assert!(session.steps_for(idx).is_empty());
}
