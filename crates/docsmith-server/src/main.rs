use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use docsmith_runner::config::PipelineSettings;
use docsmith_server::PipelineGenerator;

#[derive(Parser)]
#[command(name = "docsmith-server", about = "Docsmith documentation web UI")]
struct Cli {
    /// Address to bind
    #[arg(long, env = "DOCSMITH_BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on
    #[arg(long, env = "DOCSMITH_PORT", default_value = "3720")]
    port: u16,

    /// Directory generated documents are written to and served from
    #[arg(long, env = "DOCSMITH_DOCS_DIR", default_value = ".")]
    docs_dir: PathBuf,

    #[command(flatten)]
    pipeline: PipelineSettings,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let addr = SocketAddr::new(cli.bind.parse()?, cli.port);

    let generator = Arc::new(PipelineGenerator::new(cli.pipeline));

    let listener = TcpListener::bind(addr).await?;
    info!("docsmith-server listening on http://{addr}");

    docsmith_server::serve(listener, generator, cli.docs_dir).await?;
    Ok(())
}
