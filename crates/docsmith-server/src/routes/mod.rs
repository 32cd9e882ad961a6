pub mod documents;
pub mod generate;
pub mod health;

use std::path::PathBuf;
use std::sync::Arc;

use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::Generator;

pub struct InnerAppState {
    pub generator: Arc<dyn Generator>,
    /// Directory generated documents are written to and listed from.
    pub docs_dir: PathBuf,
}

pub type AppState = Arc<InnerAppState>;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .merge(health::routes())
        .merge(generate::routes())
        .merge(documents::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../../templates/index.html"))
}

/// Plain filenames only; anything that could escape the docs dir is
/// rejected by both the viewer and the generate endpoint.
pub(crate) fn is_plain_filename(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}
