//! Entry point for the principal and replica services.
//!
//! ```text
//! user-replication principal --bind 0.0.0.0:8080
//! user-replication replica --bind 0.0.0.0:8081 --principal-url http://localhost:8080
//! ```

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use user_replication::config::{
    DEFAULT_POLL_INTERVAL, DEFAULT_PRINCIPAL_PORT, DEFAULT_REPLICA_PORT,
    DEFAULT_REQUEST_TIMEOUT,
};
use user_replication::server::{self, principal_router, replication_router};
use user_replication::{
    PrincipalConfig, PrincipalStore, ReplicaConfig, ReplicationAgent, ReplicationTask,
};

/// Primary/replica user store synchronized by short and long polling.
#[derive(Parser)]
#[command(name = "user-replication")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the principal store
    Principal {
        /// Address to listen on
        #[arg(long, env = "PRINCIPAL_BIND", default_value_t = SocketAddr::from(([0, 0, 0, 0], DEFAULT_PRINCIPAL_PORT)))]
        bind: SocketAddr,
    },

    /// Run the replication agent
    Replica {
        /// Address to listen on
        #[arg(long, env = "REPLICA_BIND", default_value_t = SocketAddr::from(([0, 0, 0, 0], DEFAULT_REPLICA_PORT)))]
        bind: SocketAddr,

        /// Base URL of the principal
        #[arg(long, env = "PRINCIPAL_URL", default_value_t = format!("http://localhost:{DEFAULT_PRINCIPAL_PORT}"))]
        principal_url: String,

        /// Seconds between poll cycles
        #[arg(long, env = "POLL_INTERVAL_SECS", default_value_t = DEFAULT_POLL_INTERVAL.as_secs())]
        poll_interval_secs: u64,

        /// Per-request timeout towards the principal, in milliseconds
        #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value_t = DEFAULT_REQUEST_TIMEOUT.as_millis() as u64)]
        request_timeout_ms: u64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Principal { bind } => run_principal(PrincipalConfig { bind }).await,
        Commands::Replica {
            bind,
            principal_url,
            poll_interval_secs,
            request_timeout_ms,
        } => {
            run_replica(ReplicaConfig {
                bind,
                principal_url,
                poll_interval: Duration::from_secs(poll_interval_secs),
                request_timeout: Duration::from_millis(request_timeout_ms),
            })
            .await
        }
    };

    if let Err(e) = result {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run_principal(config: PrincipalConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(PrincipalStore::new());
    let listener = TcpListener::bind(config.bind).await?;

    info!("Principal server listening on http://{}", listener.local_addr()?);
    info!("Available endpoints:");
    info!("  GET    /users            - List users");
    info!("  POST   /users            - Create user");
    info!("  PUT    /users/:id        - Update user");
    info!("  DELETE /users/:id        - Delete user");
    info!("  GET    /users/check-new  - Report and clear the change flag");
    info!("  GET    /users/peek       - Report the change flag");

    server::serve(listener, principal_router(store), shutdown_signal()).await?;
    info!("Principal server stopped");
    Ok(())
}

async fn run_replica(config: ReplicaConfig) -> Result<(), Box<dyn std::error::Error>> {
    let agent = Arc::new(ReplicationAgent::new(&config)?);
    let listener = TcpListener::bind(config.bind).await?;

    info!(
        principal = %config.principal_url,
        "Replication server listening on http://{}",
        listener.local_addr()?
    );
    info!("Available endpoints:");
    info!("  GET /replication/short   - Check the principal for changes");
    info!("  GET /replication/long    - Force a full sync");
    info!("  GET /replication/data    - Current mirror");
    info!("  GET /replication/status  - Replication counters");

    let task = ReplicationTask::spawn(Arc::clone(&agent), config.poll_interval);
    let served = server::serve(listener, replication_router(agent), shutdown_signal()).await;

    task.shutdown().await;
    info!("Replication server stopped");
    served.map_err(Into::into)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
