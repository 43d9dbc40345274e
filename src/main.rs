use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use student_roster::{api, config, logging, roster::RosterService};
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "student-roster", about = "In-memory CRUD service for student records")]
struct Cli {
    /// Listen port (overrides `SERVER_PORT`).
    #[arg(long)]
    port: Option<u16>,
    /// Start with an empty store instead of the default students.
    #[arg(long)]
    empty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    config::init_config().context("failed to load configuration")?;
    let mut config = config::get_config().clone();
    if cli.port.is_some() {
        config.server_port = cli.port;
    }
    if cli.empty {
        config.seed_students = false;
    }
    logging::init_tracing(config.log_file.as_deref());

    let app = api::create_router(Arc::new(RosterService::from_config(&config)));

    let (listener, port) = bind_listener(config.server_port).await?;
    tracing::info!(port, "Student roster listening on http://0.0.0.0:{port}");
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")?;
    Ok(())
}

/// Ports tried in order when no port is configured.
const FALLBACK_PORTS: std::ops::RangeInclusive<u16> = 4100..=4199;

/// Bind the configured port, or the first free fallback port.
async fn bind_listener(server_port: Option<u16>) -> Result<(TcpListener, u16)> {
    let addr = |port| SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

    if let Some(port) = server_port {
        let listener = TcpListener::bind(addr(port))
            .await
            .with_context(|| format!("port {port} is unavailable"))?;
        return Ok((listener, port));
    }

    for port in FALLBACK_PORTS {
        match TcpListener::bind(addr(port)).await {
            Ok(listener) => return Ok((listener, port)),
            Err(err) if err.kind() == ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port taken");
            }
            Err(err) => return Err(err).with_context(|| format!("failed to bind port {port}")),
        }
    }
    bail!(
        "no free port in {}..={}",
        FALLBACK_PORTS.start(),
        FALLBACK_PORTS.end()
    )
}
