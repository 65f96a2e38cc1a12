//! sentimentd — sentiment analysis daemon.
//!
//! Loads the configured text-classification model once, then serves
//! `GET /` and `POST /analyze` over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use sentiment_service::SentimentPipeline;
use sentiment_service::providers::LocalClassifier;
use sentiment_service::server::config::Config;
use sentiment_service::server::{AppState, build_router};

/// sentimentd — HTTP sentiment analysis service.
#[derive(Parser)]
#[command(name = "sentimentd")]
#[command(version = sentiment_service::full_version())]
#[command(about = "Sentiment analysis HTTP daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind to, overriding `server.address`.
    #[arg(short, long, env = "SENTIMENTD_ADDRESS")]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    // Load configuration
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(address) = args.address {
        config.server.address = address;
    }
    let addr = config.server.socket_addr()?;

    // Load the model before binding; a failed load means no service.
    let model = config.model.local_model();
    let options = config.model.options()?;
    info!(
        model = model.name(),
        repo_id = model.repo_id().unwrap_or("-"),
        device = options.device.name(),
        "loading sentiment model"
    );
    let classifier = tokio::task::spawn_blocking(move || LocalClassifier::load(&model, &options))
        .await?
        .inspect_err(|e| error!(error = %e, "failed to load sentiment model"))?;

    let pipeline = SentimentPipeline::new(Arc::new(classifier));
    let app = build_router(Arc::new(AppState::new(pipeline)));

    info!(version = sentiment_service::full_version(), %addr, "sentimentd starting");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn version_includes_git_metadata() {
        let version = Args::command().render_version();
        assert!(version.starts_with("sentimentd "));
        assert!(version.contains(sentiment_service::PKG_VERSION));
        assert!(version.contains(sentiment_service::GIT_BRANCH));
        assert!(version.contains(sentiment_service::git_short_sha()));
    }

    #[test]
    fn version_flag_displays_version() {
        let err = match Args::try_parse_from(["sentimentd", "--version"]) {
            Ok(_) => panic!("--version should short-circuit parsing"),
            Err(e) => e,
        };
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
        assert!(err.to_string().contains(sentiment_service::full_version()));
    }

    #[test]
    fn address_flag_is_optional() {
        let args = Args::try_parse_from(["sentimentd"]).unwrap();
        assert!(args.config.is_none());

        let args = Args::try_parse_from(["sentimentd", "--address", "0.0.0.0:9000"]).unwrap();
        assert_eq!(args.address.as_deref(), Some("0.0.0.0:9000"));
    }
}
