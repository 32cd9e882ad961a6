use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};
use uuid::Uuid;

use docsmith_core::ProjectRef;
use docsmith_runner::output;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/generate", post(generate))
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub project: String,
    #[serde(default)]
    pub with_kb: bool,
    #[serde(default)]
    pub output_file: Option<String>,
}

async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let project = ProjectRef::parse(&req.project).map_err(bad_request)?;
    if let Some(ref name) = req.output_file {
        if !super::is_plain_filename(name) {
            return Err(bad_request("output_file must be a plain filename"));
        }
    }

    let run_id = Uuid::new_v4();
    info!(%run_id, %project, with_kb = req.with_kb, "generation requested");

    let doc = state
        .generator
        .generate(&project, req.with_kb)
        .await
        .map_err(|e| {
            error!(%run_id, "generation failed: {e:#}");
            internal(e)
        })?;

    let path = output::save(&doc, &state.docs_dir, req.output_file.as_deref())
        .map_err(internal)?;
    info!(%run_id, path = %path.display(), "generation complete");

    Ok(Json(json!({
        "run_id": run_id,
        "project": project.path(),
        "output_path": path,
        "format": if doc.is_structured() { "structured" } else { "text" },
        "document": doc,
    })))
}

fn bad_request(e: impl std::fmt::Display) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })))
}

fn internal(e: impl std::fmt::Display) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
}
