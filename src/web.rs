//! Web form for building spaces
//!
//! Serves a single HTML form with the five build fields and a JSON endpoint
//! with the same semantics. Builds are blocking, so every request runs its
//! build on tokio's blocking pool.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::config::BuilderConfig;
use crate::core::{build_space, BuildForm, BuildOutcome, SpaceBuilder};
use crate::error::BuildError;
use crate::hub::Hub;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type WebResult<T> = Result<T, WebError>;

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Shared state: one Hub client and one configuration for every request
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<dyn Hub>,
    pub config: Arc<BuilderConfig>,
}

impl AppState {
    pub fn new(hub: Arc<dyn Hub>, config: BuilderConfig) -> Self {
        Self {
            hub,
            config: Arc::new(config),
        }
    }
}

/// JSON answer of `POST /api/build`
#[derive(Debug, Serialize)]
pub struct BuildResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_id: Option<String>,
    pub message: String,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(form_handler))
        .route("/build", post(build_form_handler))
        .route("/api/build", post(build_json_handler))
        .route(
            "/health",
            get(|| async {
                Json(serde_json::json!({
                    "status": "ok",
                    "service": "space-builder",
                    "version": crate::VERSION,
                }))
            }),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(addr: &str, state: AppState) -> WebResult<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| WebError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    tracing::info!("Space builder listening on http://{}", addr);
    tracing::info!("   Health: http://{}/health", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(WebError::Serve)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn on_blocking_pool<T, F>(state: AppState, task: F) -> WebResult<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn Hub, &BuilderConfig) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || task(state.hub.as_ref(), &state.config))
        .await
        .map_err(|e| WebError::Internal(format!("Build task failed: {}", e)))
}

async fn run_build(
    state: AppState,
    form: BuildForm,
) -> WebResult<Result<BuildOutcome, BuildError>> {
    on_blocking_pool(state, move |hub, config| {
        SpaceBuilder::new(hub, config).build(&form)
    })
    .await
}

async fn form_handler() -> Html<String> {
    Html(render_page(&BuildForm::default(), None))
}

async fn build_form_handler(
    State(state): State<AppState>,
    Form(form): Form<BuildForm>,
) -> WebResult<Html<String>> {
    let submitted = form.clone();
    let output =
        on_blocking_pool(state, move |hub, config| build_space(hub, config, &submitted)).await?;
    Ok(Html(render_page(&form, Some(&output))))
}

async fn build_json_handler(
    State(state): State<AppState>,
    Json(form): Json<BuildForm>,
) -> WebResult<(StatusCode, Json<BuildResponse>)> {
    let response = match run_build(state, form).await? {
        Ok(outcome) => (
            StatusCode::OK,
            Json(BuildResponse {
                ok: true,
                message: outcome.url.clone(),
                url: Some(outcome.url),
                repo_id: Some(outcome.repo_id),
            }),
        ),
        Err(e) => {
            let status = if e.is_validation() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::BAD_GATEWAY
            };
            (
                status,
                Json(BuildResponse {
                    ok: false,
                    url: None,
                    repo_id: None,
                    message: e.to_string(),
                }),
            )
        }
    };
    Ok(response)
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render the form, refilling every field except the token
fn render_page(form: &BuildForm, output: Option<&str>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Space that builds another Space</title>
<style>
body {{ font-family: sans-serif; max-width: 44rem; margin: 2rem auto; }}
label {{ display: block; margin-top: 1rem; font-weight: bold; }}
input, textarea {{ width: 100%; box-sizing: border-box; }}
button {{ margin-top: 1rem; }}
</style>
</head>
<body>
<h1>Space that builds another Space</h1>
<p>I can create another space which will compare the models or spaces you provide to me</p>
<form method="post" action="/build">
<label for="space_names">Input spaces and models</label>
<textarea id="space_names" name="space_names" rows="4" placeholder="Drop model and space links at each line and I will create a new space comparing them. Usage examples:&#10;spaces/deepklarity/poster2plot&#10;models/gpt2">{names}</textarea>
<label for="token">HuggingFace Write Token</label>
<input id="token" name="token" type="password" autocomplete="off">
<label for="target_name">Target space name</label>
<input id="target_name" name="target_name" placeholder="space-building-space" value="{target}">
<label for="title">Interface title</label>
<input id="title" name="title" placeholder="Title" value="{title}">
<label for="description">Interface description</label>
<input id="description" name="description" placeholder="Description" value="{description}">
<button type="submit">Build</button>
</form>
<label for="output">Output</label>
<textarea id="output" rows="3" readonly>{output}</textarea>
</body>
</html>
"#,
        names = escape_html(&form.space_names),
        target = escape_html(&form.target_name),
        title = escape_html(&form.title),
        description = escape_html(&form.description),
        output = escape_html(output.unwrap_or_default()),
    )
}
