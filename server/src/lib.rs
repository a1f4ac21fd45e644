use anyhow::Result;
use axum::{extract::{Query, State}, http::{HeaderValue, StatusCode}, routing::{get, post}, Json, Router};
use ragcore::persist::{load_corpus, CorpusPaths};
use ragcore::ranker::DEFAULT_K;
use ragcore::render::render;
use ragcore::{Category, Retriever};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod compose;

use compose::{compose_from_snippets, enforce_brand_casing};

const MAX_K: usize = 100;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { DEFAULT_K }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_ms: u128,
    pub took_s: f64,
    /// Documents scoring above zero.
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub rank: usize,
    pub score: f32,
    pub category: Category,
    pub url: String,
    pub headings: Vec<String>,
    pub snippet: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub text: String,
    pub snippets: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub retriever: Retriever,
}

pub fn build_app(data_dir: String) -> Result<Router> {
    // Corpus is loaded once and shared read-only by every request
    let corpus = load_corpus(&CorpusPaths::new(&data_dir))?;
    tracing::info!(data_dir, docs = corpus.len(), "corpus loaded");
    Ok(router(Retriever::with_builtin_synonyms(corpus)))
}

/// Router with CORS taken from `CORS_ALLOW_ORIGIN`.
pub fn router(retriever: Retriever) -> Router {
    let allow = std::env::var("CORS_ALLOW_ORIGIN").ok();
    router_with_cors(retriever, cors_layer(allow.as_deref()))
}

/// Comma-separated origins, or any origin when unset or nothing parses.
pub fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let origins: Vec<HeaderValue> = allow_origin
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn router_with_cors(retriever: Retriever, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/chat", post(chat_handler))
        .with_state(AppState { retriever })
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let k = params.k.clamp(1, MAX_K);
    let retriever = &state.retriever;

    let ranked = retriever.rank(&params.q, retriever.len());
    let total_hits = ranked.iter().filter(|s| s.score > 0.0).count();
    let results: Vec<SearchHit> = ranked
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(i, s)| SearchHit {
            rank: i + 1,
            score: s.score,
            category: s.document.category,
            url: s.document.url.clone(),
            headings: s.document.headings.clone(),
            snippet: render(s.document),
        })
        .collect();

    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, k, total_hits, "search");
    Json(SearchResponse { query: params.q, took_ms: elapsed.as_millis(), took_s: elapsed.as_secs_f64(), total_hits, results })
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn bad_payload() -> ApiError {
    (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": "Invalid payload: expected {messages:[{role,content}]}" })))
}

/// Null, false, 0 and "" do not count as a value.
fn is_truthy(v: &serde_json::Value) -> bool {
    match v {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// Role and content of one chat message. Both must be present and truthy;
/// non-string values are stringified.
fn message_parts(m: &serde_json::Value) -> Option<(String, String)> {
    let text = |v: &serde_json::Value| match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let role = m.get("role").filter(|v| is_truthy(v))?;
    let content = m.get("content").filter(|v| is_truthy(v))?;
    Some((text(role), text(content)))
}

pub async fn chat_handler(State(state): State<AppState>, Json(body): Json<serde_json::Value>) -> Result<Json<ChatResponse>, ApiError> {
    let messages = body.get("messages").and_then(|m| m.as_array()).ok_or_else(bad_payload)?;
    let parts: Vec<(String, String)> = messages.iter().map(message_parts).collect::<Option<_>>().ok_or_else(bad_payload)?;

    let user_last = parts.iter().rev().find(|(role, _)| role == "user").map(|(_, c)| c.as_str()).unwrap_or("");
    let snippets = state.retriever.retrieve(user_last, DEFAULT_K);
    let text = enforce_brand_casing(&compose_from_snippets(user_last, &snippets));
    tracing::debug!(query = user_last, snippets = snippets.len(), "chat answered from snippets");
    Ok(Json(ChatResponse { text, snippets }))
}
