/// Process startup: configuration, bootstrap, serving
use crate::{
    config::{ServerConfig, ServerSettings},
    router::create_router,
    services::InstanceMetadataClient,
    shutdown,
    state::AppState,
};
use anyhow::Context;
use roster_storage::{BootstrapReport, Bootstrapper, MySqlProvisioner, MySqlUserStore};
use std::{path::Path, sync::Arc};
use tokio::net::TcpListener;

/// Load and validate configuration
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    let config = ServerConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

/// Run the bootstrap sequence and return the store over the scoped connection.
///
/// Any error here is a connectivity failure and ends the process with status 1.
pub async fn bootstrap(config: &ServerConfig) -> anyhow::Result<(MySqlUserStore, BootstrapReport)> {
    tracing::info!(
        host = %config.database.host,
        port = config.database.port,
        database = %config.database.name,
        "Bootstrapping database"
    );

    let provisioner =
        MySqlProvisioner::new(config.database.server_options(), config.database.name.as_str())?;

    let (provisioner, report) = Bootstrapper::new(provisioner)
        .run()
        .await
        .context("Database bootstrap failed")?;
    let store = provisioner.into_store()?;

    if report.is_clean() {
        tracing::info!(seeded = report.seeded_rows, "Bootstrap complete");
    } else {
        tracing::warn!(
            warnings = report.warnings.len(),
            "Bootstrap complete with warnings"
        );
    }

    Ok((store, report))
}

/// Bind the listener. `host` may be an IP address or a resolvable name.
pub async fn bind(settings: &ServerSettings) -> std::io::Result<TcpListener> {
    TcpListener::bind((settings.host.as_str(), settings.port)).await
}

/// Bootstrap, serve until a termination signal, then shut down
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let (store, _) = bootstrap(&config).await?;

    let metadata =
        InstanceMetadataClient::new(config.metadata.endpoint.clone(), config.metadata.timeout())?;
    let app_state = AppState::new(Arc::new(store.clone()), Arc::new(metadata));
    let app = create_router(app_state);

    let listener = bind(&config.server)
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.server.host, config.server.port))?;
    tracing::info!("Server running on {}", listener.local_addr()?);

    shutdown::serve_until(
        listener,
        app,
        shutdown::shutdown_signal(),
        store.close(),
        config.shutdown.timeout(),
    )
    .await;

    tracing::info!("Shutdown complete");
    Ok(())
}
