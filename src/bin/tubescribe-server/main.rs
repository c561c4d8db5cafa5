use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::middleware::from_fn;
use axum::routing::get;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::{Level, error, info};

mod metrics;

use tubescribe::TubeScribe;
use tubescribe::cli::FetchArgs;
use tubescribe::server::{AppState, router};

#[derive(Parser, Debug)]
#[command(name = "tubescribe-server")]
#[command(about = "HTTP server for YouTube transcripts")]
struct Params {
    /// Host interface to bind to.
    #[arg(long = "host", env = "TUBESCRIBE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// TCP port to listen on.
    #[arg(long = "port", env = "PORT", default_value_t = 8000)]
    port: u16,

    #[command(flatten)]
    fetch: FetchArgs,
}

#[tokio::main]
async fn main() {
    tubescribe::init_logging();

    if let Err(err) = run().await {
        error!(error = ?err, "tubescribe-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let params = Params::parse();

    metrics::init();

    let addr: SocketAddr = format!("{}:{}", params.host, params.port)
        .parse()
        .context("invalid host/port bind address")?;

    let opts = params.fetch.to_opts();
    let tubescribe = TubeScribe::new(&opts).context("failed to initialize YouTube client")?;
    info!(
        proxy_enabled = tubescribe.proxy_enabled(),
        fetch_timeout_secs = opts.fetch_timeout.as_secs(),
        "transcript source ready"
    );

    let app = router(AppState::new(tubescribe))
        .route("/metrics", get(metrics::prometheus_metrics))
        .route_layer(from_fn(metrics::track_http_metrics))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        );

    let listener = TcpListener::bind(addr).await.context("bind failed")?;
    info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = ?err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => error!(error = ?err, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_have_server_defaults() -> Result<(), clap::Error> {
        let params = Params::try_parse_from(["tubescribe-server"])?;
        assert_eq!(params.fetch.fetch_timeout_secs, 60);
        Ok(())
    }

    #[test]
    fn params_accept_bind_address() -> Result<(), clap::Error> {
        let params = Params::try_parse_from(["tubescribe-server", "--host", "0.0.0.0", "--port", "9000"])?;
        assert_eq!(params.host, "0.0.0.0");
        assert_eq!(params.port, 9000);
        Ok(())
    }
}
