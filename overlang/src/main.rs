use anyhow::Context;
use overlang::api::{ApiServer, ApiServerConfig, AppState};
use overlang::identity::{FirebaseConfig, build_verifier};
use overlang::utils::http_client::{build_http_client, install_rustls_provider};
use overlang::{database, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    let _log_guard = logging::init_logging(logging::log_dir_from_env())?;

    install_rustls_provider();

    let database_url = database::database_url_from_env();
    let pool = database::init_pool(&database_url)
        .await
        .with_context(|| format!("failed to open database {}", database_url))?;
    database::run_migrations(&pool).await?;

    let verifier = build_verifier(&FirebaseConfig::from_env(), build_http_client())?;
    let state = AppState::new(pool.clone()).with_verifier(verifier);

    let server = ApiServer::new(ApiServerConfig::from_env_or_default(), state);
    let cancel_token = server.cancel_token();

    tokio::spawn(async move {
        shutdown_signal().await;
        cancel_token.cancel();
    });

    tracing::info!("overlang {} started", env!("CARGO_PKG_VERSION"));
    server.run().await?;

    pool.close().await;
    tracing::info!("overlang stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
