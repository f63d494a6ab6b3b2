use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use user_search::prelude::*;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Config file (defaults to ./config.toml, XDG and /etc lookups)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// XML dataset to serve
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,

    /// Access token clients must send
    #[arg(long)]
    pub token: Option<String>,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;

    if let Some(port) = args.port {
        config.service.port = port;
    }
    if let Some(dataset) = args.dataset {
        config.dataset.path = dataset;
    }
    if let Some(token) = args.token {
        config.auth.access_token = Some(token);
    }

    init_tracing(&config).context("Failed to initialize tracing")?;

    let state = AppState::new(config.clone());
    Server::new(config)
        .serve(router(state))
        .await
        .context("Server failed")?;

    Ok(())
}
