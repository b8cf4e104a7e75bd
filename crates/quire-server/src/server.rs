//! Development server implementation.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Local;
use tokio::sync::broadcast::{self, error::RecvError};
use tower_http::services::ServeDir;

use quire_content::Post;
use quire_static::{BuildConfig, BuildError, StaticBuilder};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{hmr_client_script, HmrHub, HmrMessage};

/// Path of the live reload WebSocket.
const HMR_PATH: &str = "/__hmr";

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Content and page settings, shared with the static build
    pub build: BuildConfig,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),
}

/// Shared server state. Content is never cached; handlers load it per request.
struct ServerState {
    builder: StaticBuilder,
    hmr: HmrHub,
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Socket address the server binds to.
    pub fn addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        addr.parse().map_err(|_| ServerError::InvalidAddress(addr))
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = self.addr()?;
        let content_dir = self.config.build.content_dir.clone();

        let state = Arc::new(ServerState {
            builder: StaticBuilder::new(self.config.build.clone()),
            hmr: HmrHub::new(),
        });

        let (watcher, mut rx) = FileWatcher::new(std::slice::from_ref(&content_dir))
            .map_err(|e| ServerError::WatchError(e.to_string()))?;

        let state_clone = Arc::clone(&state);
        let watch_root = content_dir.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state_clone.hmr, &watch_root, event);
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = router(state, &content_dir);

        tracing::info!("Starting dev server at http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        if self.config.open {
            let url = format!("http://{}", addr);
            if let Err(e) = open::that(&url) {
                tracing::debug!("Could not open browser: {}", e);
            }
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

fn router(state: Arc<ServerState>, content_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/virtual:posts", get(posts_module_handler))
        .route("/print", get(print_handler))
        .route(HMR_PATH, get(ws_handler))
        .route("/__hmr.js", get(hmr_script_handler))
        .nest_service("/content", ServeDir::new(content_dir))
        .with_state(state)
}

/// Forward a file change to connected browsers.
fn handle_watch_event(hmr: &HmrHub, content_dir: &Path, event: WatchEvent) {
    let path = event.path();
    let relative = path.strip_prefix(content_dir).unwrap_or(path);

    match &event {
        WatchEvent::ContentModified(_) | WatchEvent::AssetModified(_) => {
            tracing::info!("Modified: {}", relative.display());
            hmr.send(HmrMessage::ContentChanged {
                path: relative.display().to_string(),
            });
        }
        WatchEvent::Created(_) | WatchEvent::Deleted(_) => {
            tracing::debug!("Changed: {}", relative.display());
            hmr.send(HmrMessage::Reload);
        }
    }
}

/// Load the content and render it on the blocking pool.
async fn render_blocking<F>(state: &Arc<ServerState>, render: F) -> Result<String, String>
where
    F: FnOnce(&StaticBuilder, &[Post]) -> Result<String, BuildError> + Send + 'static,
{
    let state = Arc::clone(state);

    tokio::task::spawn_blocking(move || {
        let posts = state.builder.load_posts();
        render(&state.builder, &posts)
    })
    .await
    .map_err(|e| e.to_string())?
    .map_err(|e| e.to_string())
}

/// Viewer page for the current content, with the live reload client.
async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    match render_blocking(&state, |builder, posts| builder.render_viewer(posts)).await {
        Ok(html) => Html(inject_hmr_script(&html)).into_response(),
        Err(e) => render_error(e),
    }
}

/// The `blogPosts` data module for the current content.
async fn posts_module_handler(State(state): State<Arc<ServerState>>) -> Response {
    match render_blocking(&state, |builder, posts| builder.render_module(posts)).await {
        Ok(module) => ([(header::CONTENT_TYPE, "application/javascript")], module).into_response(),
        Err(e) => render_error(e),
    }
}

/// Printable export for the current content.
async fn print_handler(State(state): State<Arc<ServerState>>) -> Response {
    let today = Local::now().date_naive();

    match render_blocking(&state, move |builder, posts| builder.render_export(posts, today)).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_error(e),
    }
}

fn render_error(e: impl std::fmt::Display) -> Response {
    tracing::error!("Render failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
}

fn inject_hmr_script(html: &str) -> String {
    let tag = r#"<script src="/__hmr.js"></script>"#;
    match html.rfind("</body>") {
        Some(pos) => format!("{}{}\n{}", &html[..pos], tag, &html[pos..]),
        None => format!("{}{}", html, tag),
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.hmr.subscribe();

    if !send_message(&mut socket, &HmrMessage::Connected).await {
        return;
    }

    while let Some(msg) = next_message(&mut rx).await {
        if !send_message(&mut socket, &msg).await {
            break;
        }
    }
}

/// Next message for a client; `None` once the hub is gone.
///
/// A client that fell behind has missed changes, so it is told to reload.
async fn next_message(rx: &mut broadcast::Receiver<HmrMessage>) -> Option<HmrMessage> {
    match rx.recv().await {
        Ok(msg) => Some(msg),
        Err(RecvError::Lagged(skipped)) => {
            tracing::debug!("Reload client lagged by {} messages", skipped);
            Some(HmrMessage::Reload)
        }
        Err(RecvError::Closed) => None,
    }
}

/// Send one message; false once the client is gone.
async fn send_message(socket: &mut WebSocket, msg: &HmrMessage) -> bool {
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("Failed to encode reload message: {}", e);
            return true;
        }
    };

    socket.send(Message::Text(json.into())).await.is_ok()
}

async fn hmr_script_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], hmr_client_script(HMR_PATH))
}
