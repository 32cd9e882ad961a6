pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::net::TcpListener;

use docsmith_core::{GeneratedDoc, ProjectRef};
use docsmith_runner::config::PipelineSettings;
use docsmith_runner::pipeline;

use routes::InnerAppState;

/// The generation engine behind the HTTP surface. A trait so route tests
/// can swap in a scripted implementation.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, project: &ProjectRef, with_kb: bool) -> Result<GeneratedDoc>;
}

/// Production generator: assembles a fresh crew per request from the
/// configured settings and runs the pipeline.
pub struct PipelineGenerator {
    settings: PipelineSettings,
}

impl PipelineGenerator {
    pub fn new(settings: PipelineSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Generator for PipelineGenerator {
    async fn generate(&self, project: &ProjectRef, with_kb: bool) -> Result<GeneratedDoc> {
        let crew = self.settings.build_crew(with_kb);
        pipeline::execute(&crew, project).await
    }
}

pub async fn serve(
    listener: TcpListener,
    generator: Arc<dyn Generator>,
    docs_dir: PathBuf,
) -> Result<()> {
    let state = Arc::new(InnerAppState {
        generator,
        docs_dir,
    });
    let app = routes::build_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}
