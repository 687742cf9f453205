//! The `pixarify serve` command: the browser upload form.

use clap::Args;
use pixarify_core::{Config, Pipeline};

use crate::web;

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides server.bind_addr)
    #[arg(short, long, env = "PIXARIFY_BIND")]
    pub bind: Option<String>,
}

/// Execute the serve command.
///
/// Both API secrets are resolved before binding; a missing one aborts
/// startup.
pub async fn execute(args: ServeArgs, config: Config) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_config(&config)?;
    let bind_addr = args.bind.unwrap_or_else(|| config.server.bind_addr.clone());

    let app = web::router(pipeline, &config.limits);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        generation_model = %config.generation.model,
        "Listening on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
