//! HTTP+JSON surface of the citation service.
//!
//! Every handler is a thin adapter over [`Resolver`]: extract the request,
//! run one lookup, serialize the result. Requests share nothing but the
//! resolver, whose filter tables are read-only.
//!
//! | Method | Path         | Body / query                      |
//! |--------|--------------|-----------------------------------|
//! | GET    | `/health`    |                                   |
//! | GET    | `/search`    | `?q=...&all=true&provider=doaj`   |
//! | POST   | `/topics`    | multipart with a `file` field     |
//! | POST   | `/citations` | `{"query", "area", "limit"}`      |
//! | GET    | `/areas`     |                                   |

use std::sync::Arc;

use axum::{
  extract::{
    multipart::{Multipart, MultipartRejection},
    rejection::{JsonRejection, QueryRejection},
    Query, State,
  },
  routing::{get, post},
  Json, Router,
};
use citer::{paper::Provider, resolver::Resolver};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

use crate::errors::{ApiError, CiterdErrors};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
  /// The resolver and its filter tables
  pub resolver: Arc<Resolver>,
}

/// Query string of `GET /search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
  /// Free-text query
  pub q:        Option<String>,
  /// Return one citation per provider instead of the first match
  #[serde(default)]
  pub all:      bool,
  /// Ask only this provider, e.g. `crossref` or `doaj`
  pub provider: Option<String>,
}

/// Body of `POST /citations`.
#[derive(Debug, Deserialize)]
pub struct CitationRequest {
  /// Free-text query
  pub query: Option<String>,
  /// Subject-area label
  pub area:  Option<String>,
  /// Number of CrossRef rows to inspect
  pub limit: Option<u32>,
}

/// Builds the application router.
pub fn router(resolver: Arc<Resolver>) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/search", get(search))
    .route("/topics", post(topics))
    .route("/citations", post(citations))
    .route("/areas", get(areas))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(AppState { resolver })
}

/// Binds `bind` and serves until Ctrl-C.
pub async fn serve(bind: &str, resolver: Arc<Resolver>) -> Result<(), CiterdErrors> {
  let listener = tokio::net::TcpListener::bind(bind).await?;
  info!("citerd listening on http://{}", listener.local_addr()?);

  axum::serve(listener, router(resolver)).with_graceful_shutdown(shutdown_signal()).await?;

  info!("citerd stopped");
  Ok(())
}

/// Resolves when the process receives Ctrl-C.
async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("Failed to listen for shutdown signal: {e}");
    std::future::pending::<()>().await;
  }
  info!("Shutdown signal received");
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

async fn search(
  State(state): State<AppState>,
  params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
  let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let query = params.q.unwrap_or_default();

  if params.all {
    let citations = state.resolver.citations_per_provider(&query).await?;
    return Ok(Json(json!({ "citations": citations })));
  }

  let citation = match params.provider.as_deref() {
    Some(name) => {
      let provider = name.parse::<Provider>()?;
      state.resolver.provider_citation(provider, &query).await?
    },
    None => state.resolver.first_citation(&query).await?,
  };
  Ok(Json(json!({
    "message": citation.text,
    "provider": citation.provider,
    "url": citation.url,
  })))
}

async fn citations(
  State(state): State<AppState>,
  body: Result<Json<CitationRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
  let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  debug!("Citation request: {request:?}");

  let found = state
    .resolver
    .area_citations(
      request.query.as_deref().unwrap_or_default(),
      request.area.as_deref().unwrap_or_default(),
      request.limit,
    )
    .await?;

  Ok(Json(json!(found)))
}

async fn topics(
  State(state): State<AppState>,
  multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
  let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;

  let mut text = None;
  while let Some(field) =
    multipart.next_field().await.map_err(|e| ApiError::BadRequest(e.body_text()))?
  {
    if field.name() != Some("file") {
      continue;
    }
    let bytes = field.bytes().await.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let content = String::from_utf8(bytes.to_vec())
      .map_err(|_| ApiError::BadRequest("Uploaded file must be UTF-8 text".into()))?;
    text = Some(content);
    break;
  }

  let text = text.ok_or(citer::errors::CiterError::MissingField("file"))?;
  let results = state.resolver.resolve_topics(&text).await?;
  Ok(Json(json!({ "results": results })))
}

async fn areas(State(state): State<AppState>) -> Json<Value> {
  let table = state.resolver.areas();
  Json(json!({
    "default": table.default_area(),
    "areas": table.areas(),
    "denylist": state.resolver.denylist().domains(),
  }))
}
