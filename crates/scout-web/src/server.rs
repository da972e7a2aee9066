use crate::protocol::{self, ClientFrame, ServerFrame};
use scout_agent::{run_turn, ChatLoopExecutor, ModelConfig, TurnEvent, TurnExecutor};
use scout_session::ChatSession;
use scout_tools::ToolRegistry;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Builds a [`TurnExecutor`] for the configuration a connection currently
/// holds. The indirection exists so tests can substitute scripted
/// executors for the real chat loop.
pub type ExecutorFactory = Arc<dyn Fn(&ModelConfig) -> Arc<dyn TurnExecutor> + Send + Sync>;

/// Shared application state.
pub struct AppState {
    /// Server-wide configuration each connection starts from.
    pub base_config: ModelConfig,
    /// Tools available to every turn.
    pub tools: Arc<ToolRegistry>,
    /// Executor construction seam.
    pub executors: ExecutorFactory,
}

/// Builds the web app with the default chat-loop executor.
pub fn build_router(base_config: ModelConfig, tools: Arc<ToolRegistry>) -> Router {
    build_router_with_executors(
        base_config,
        tools,
        Arc::new(|config: &ModelConfig| {
            Arc::new(ChatLoopExecutor::from_config(config.clone())) as Arc<dyn TurnExecutor>
        }),
    )
}

/// Builds the web app with a custom executor factory.
pub fn build_router_with_executors(
    base_config: ModelConfig,
    tools: Arc<ToolRegistry>,
    executors: ExecutorFactory,
) -> Router {
    let state = Arc::new(AppState {
        base_config,
        tools,
        executors,
    });

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

async fn index_handler() -> impl IntoResponse {
    Html(include_str!("../assets/chat.html"))
}

async fn health_handler() -> impl IntoResponse {
    serde_json::json!({"status": "ok", "service": "scout"}).to_string()
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Per-connection chat loop.
///
/// The socket is read one frame at a time and is not polled while a turn
/// runs, so turns on a connection are strictly sequential and cannot be
/// cancelled mid-flight. Tearing the connection down drops the in-progress
/// turn before anything is committed.
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut session = ChatSession::new();
    let mut config = state.base_config.clone();

    info!("Chat connection opened");
    if send_frame(&mut socket, &protocol::snapshot(&session))
        .await
        .is_err()
    {
        return;
    }

    while let Some(Ok(msg)) = socket.recv().await {
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let frame = match serde_json::from_str::<ClientFrame>(text.as_str()) {
            Ok(frame) => frame,
            Err(e) => {
                let _ = send_frame(
                    &mut socket,
                    &ServerFrame::Error {
                        message: format!("malformed frame: {e}"),
                    },
                )
                .await;
                continue;
            }
        };

        match frame {
            ClientFrame::Configure {
                api_key,
                model,
                base_url,
            } => {
                if let Some(key) = api_key {
                    config.api_key = key;
                }
                if let Some(model) = model {
                    if !model.trim().is_empty() {
                        config.model_id = model;
                    }
                }
                if let Some(url) = base_url {
                    config.api_base_url = if url.trim().is_empty() {
                        None
                    } else {
                        Some(url)
                    };
                }
                info!(model = %config.model_id, "Connection reconfigured");
            }

            ClientFrame::Reset => {
                session.reset();
                let _ = send_frame(&mut socket, &protocol::snapshot(&session)).await;
            }

            ClientFrame::UserMessage { content } => {
                if let Err(e) = config.require_credential() {
                    let _ = send_frame(
                        &mut socket,
                        &ServerFrame::Error {
                            message: e.to_string(),
                        },
                    )
                    .await;
                    continue;
                }

                let executor = (state.executors)(&config);
                execute_turn(&mut socket, &mut session, executor, &state.tools, &content).await;
            }
        }
    }

    info!("Chat connection closed");
}

/// Runs one turn, forwarding live events to the socket as they arrive and
/// finishing with either a fresh transcript + completion frame or a single
/// error frame.
async fn execute_turn(
    socket: &mut WebSocket,
    session: &mut ChatSession,
    executor: Arc<dyn TurnExecutor>,
    tools: &ToolRegistry,
    content: &str,
) {
    let (tx, mut rx) = mpsc::channel::<TurnEvent>(64);

    // The turn future borrows the session mutably; the inner block ends
    // that borrow before the post-commit snapshot reads it.
    let result = {
        let turn = run_turn(session, executor.as_ref(), tools, content, tx);
        tokio::pin!(turn);

        loop {
            tokio::select! {
                biased;
                event = rx.recv() => match event {
                    Some(event) => {
                        let _ = send_frame(socket, &ServerFrame::from(event)).await;
                    }
                    // Executor dropped its sender; only the commit remains.
                    None => break (&mut turn).await,
                },
                result = &mut turn => {
                    while let Ok(event) = rx.try_recv() {
                        let _ = send_frame(socket, &ServerFrame::from(event)).await;
                    }
                    break result;
                }
            }
        }
    };

    match result {
        Ok(index) => {
            let _ = send_frame(socket, &protocol::snapshot(session)).await;
            let _ = send_frame(socket, &ServerFrame::TurnComplete { index }).await;
        }
        Err(e) => {
            warn!(error = %e, "Turn failed");
            let _ = send_frame(
                socket,
                &ServerFrame::Error {
                    message: e.to_string(),
                },
            )
            .await;
        }
    }
}

async fn send_frame(socket: &mut WebSocket, frame: &ServerFrame) -> Result<(), axum::Error> {
    let json = serde_json::to_string(frame).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}
