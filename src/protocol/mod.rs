//! HTTP surface
//!
//! Handlers sanitize free text, call into `services`, and turn the
//! structured results into JSON. Errors render through `DictError`'s
//! `IntoResponse`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;

pub mod identity;
pub mod sanitize;

use crate::error::DictError;
use crate::services::{definition, deletion, linker, search, users};
use crate::state::AppState;
use crate::store::StoreStats;
use identity::CurrentUser;
use sanitize::{clean, clean_opt};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionSubmission {
    #[serde(default)]
    pub entry_submission: Option<String>,

    #[serde(default)]
    pub mirror_submission: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub email: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    let dictionary = Router::new()
        .route("/", get(browse_handler))
        .route("/search", get(search_handler))
        .route("/definition", post(post_definition_handler))
        .route(
            "/definition/{id}",
            get(get_definition_handler).delete(delete_definition_handler),
        );

    Router::new()
        .nest("/d", dictionary)
        .route("/users", post(register_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn browse_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, DictError> {
    let q = clean_opt(params.q.as_deref());
    let entries = search::search(&state.store, q.as_deref()).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Resource",
        "q": q,
        "entries": entries,
    })))
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, DictError> {
    let q = match clean_opt(params.q.as_deref()).filter(|q| !q.is_empty()) {
        Some(q) => q,
        None => {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "message": "Resource undefined",
                    "entries": [],
                })),
            ))
        }
    };

    let entries = search::search(&state.store, Some(&q)).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Resource",
            "entries": entries,
        })),
    ))
}

async fn post_definition_handler(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    body: Result<Json<DefinitionSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, DictError> {
    let Json(body) = body?;
    let entry = clean_opt(body.entry_submission.as_deref());
    let mirror = clean_opt(body.mirror_submission.as_deref());

    let linked = linker::link(&state.store, user.as_ref(), entry.as_deref(), mirror.as_deref()).await?;

    Ok(Json(json!({
        "entry": linked.entry,
        "mirror": linked.mirror,
        "definitionNode": linked.definition_node,
        "outcome": linked.outcome,
        "message": linked.outcome.message(),
    })))
}

async fn get_definition_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DictError> {
    let def = definition::definition(&state.store, &clean(&id)).await?;
    Ok(Json(def))
}

async fn delete_definition_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DictError> {
    let deletion = deletion::delete_node(&state.store, &clean(&id)).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Entry deleted.",
        "definitionNode": deletion.definition_node,
        "deleted": deletion.deleted,
    })))
}

async fn register_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> Result<impl IntoResponse, DictError> {
    let Json(body) = body?;
    let user = users::register_user(&state.store, &clean(&body.username), &clean(&body.email)).await?;
    Ok(Json(user))
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,

    #[serde(flatten)]
    pub stats: StoreStats,
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health {
        status: "ok",
        stats: state.store.stats().await,
    })
}
