use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/documents", get(list_documents))
        .route("/api/documents/{name}", get(get_document))
}

/// List generated documents in the docs directory, newest first.
async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut docs: Vec<Value> = Vec::new();
    let entries = match std::fs::read_dir(&state.docs_dir) {
        Ok(entries) => entries,
        // A docs dir that does not exist yet just means nothing generated.
        Err(_) => return Ok(Json(json!({ "documents": [] }))),
    };

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with("documentation_") {
            continue;
        }
        let meta = entry.metadata().map_err(internal)?;
        if !meta.is_file() {
            continue;
        }
        let modified = meta
            .modified()
            .ok()
            .map(|t| DateTime::<Utc>::from(t).to_rfc3339());
        docs.push(json!({
            "name": name,
            "size": meta.len(),
            "modified": modified,
        }));
    }

    docs.sort_by(|a, b| b["modified"].as_str().cmp(&a["modified"].as_str()));
    Ok(Json(json!({ "documents": docs })))
}

async fn get_document(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    if !super::is_plain_filename(&name) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid document name" })),
        ));
    }

    let path = state.docs_dir.join(&name);
    let content = std::fs::read_to_string(&path).map_err(|_| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("document '{name}' not found") })),
        )
    })?;

    let content_type = if name.ends_with(".json") {
        "application/json"
    } else {
        "text/markdown; charset=utf-8"
    };
    Ok(([(header::CONTENT_TYPE, content_type)], content).into_response())
}

fn internal(e: impl std::fmt::Display) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
}
