// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Wikigate server binary

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use wg_logging::{redact, CliLoggingArgs};
use wg_server::{Server, ServerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bind address for the server
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Directory containing Config/Config.toml and Config/Local.toml
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    /// Defaults file to use instead of Config/Config.toml
    #[arg(long)]
    defaults: Option<PathBuf>,

    /// Local overrides file to use instead of Config/Local.toml
    #[arg(long)]
    local: Option<PathBuf>,

    /// Secret for verifying bearer tokens
    #[arg(long, env = "WG_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Enable permissive CORS for development
    #[arg(long)]
    cors: bool,

    #[command(flatten)]
    logging: CliLoggingArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    args.logging.clone().init("wg-server")?;

    tracing::info!(
        config_dir = %args.config_dir.display(),
        jwt_secret = args.jwt_secret.as_ref().map(redact),
        "Starting wikigate"
    );

    let config = ServerConfig {
        bind_addr: args.bind,
        enable_cors: args.cors,
        jwt_secret: args.jwt_secret,
        config_root: args.config_dir,
        defaults_file: args.defaults,
        local_file: args.local,
    };

    let server = Server::new(config)?;
    server.run().await?;

    Ok(())
}
