#![warn(clippy::pedantic, clippy::all, clippy::nursery)]

use roster::{config::RuntimeConfiguration, routes::router, state::RosterState};
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");
    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded env vars"),
        Err(e) if e.not_found() => debug!("no .env file, using the process environment"),
        Err(e) => warn!(?e, "unable to load .env file"),
    }

    let config = RuntimeConfiguration::new().expect("unable to create config");
    let listen_addr = config.server_config().listen_addr();
    let state = RosterState::new(config)
        .await
        .expect("unable to create state");

    let app = router(state);

    let listener = TcpListener::bind(listen_addr)
        .await
        .expect("unable to listen on server address");
    let local_addr = listener.local_addr().unwrap_or(listen_addr);

    info!(%local_addr, "Listening");
    info!("API available at http://{local_addr}/api");
    info!("Health check at http://{local_addr}/api/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("unable to serve app");
}
