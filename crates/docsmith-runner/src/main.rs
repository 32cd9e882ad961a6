use anyhow::Result;
use clap::Parser;
use tracing::info;

use docsmith_core::ProjectRef;
use docsmith_runner::config::RunnerConfig;
use docsmith_runner::{output, pipeline};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = RunnerConfig::parse();
    let project = ProjectRef::parse(&config.project)?;

    info!("docsmith-runner starting");
    info!("project: {project} (host: {})", config.pipeline.host);
    info!(
        "models: tool={} writer={}",
        config.pipeline.tool_model, config.pipeline.writer_model
    );

    let crew = config.build_crew();
    let doc = pipeline::execute(&crew, &project).await?;
    let path = output::save(&doc, &config.output_dir, config.output.as_deref())?;

    info!("documentation generation complete");
    println!("{}", path.display());
    Ok(())
}
