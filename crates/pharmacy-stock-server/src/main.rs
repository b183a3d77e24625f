use anyhow::Context;
use pharmacy_stock_core::Database;
use pharmacy_stock_server::{build_gateway, build_router, AppState, ServerConfig};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let db = Database::open(&config.database_path)
        .with_context(|| format!("opening database {}", config.database_path.display()))?;

    if let Some((username, password)) = config.admin_credentials() {
        if !db.user_exists(username)? {
            db.create_user(username, password)?;
            tracing::info!(user = username, "Created bootstrap account");
        }
    }

    // The blocking HTTP client must be created and dropped outside the async runtime
    let gateway = build_gateway(&config.gateway).context("building AI gateway client")?;
    let state = AppState::new(db, gateway.clone(), config.session_ttl());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;

    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(&config.bind_addr)
            .await
            .with_context(|| format!("binding {}", config.bind_addr))?;
        tracing::info!(addr = %config.bind_addr, "Pharmacy stock server listening");

        axum::serve(listener, build_router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("serving HTTP")
    })?;

    drop(runtime);
    drop(gateway);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
