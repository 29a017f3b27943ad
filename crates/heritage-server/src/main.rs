mod api;
mod middleware;

use heritage_geoserver::GeoServerClient;
use heritage_khs::{KhsClient, Resolver};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, SearchSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = heritage_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting heritage server");

    let pool_config = heritage_db::PoolConfig::from_app_config(&config);
    let pool = heritage_db::connect_pool(&config.database_url, pool_config).await?;

    let khs = KhsClient::with_base_url(
        &config.khs_base_url,
        config.upstream_timeout_secs,
        &config.user_agent,
    )?;
    let resolver = Resolver::new(khs)
        .with_top_n(config.resolver_top_n)
        .with_page_size(config.list_page_size);
    let geoserver = GeoServerClient::with_base_url(
        &config.geoserver_base_url,
        &config.geoserver_workspace,
        config.upstream_timeout_secs,
        &config.user_agent,
    )?;

    let state = AppState::new(
        pool,
        resolver,
        geoserver,
        SearchSettings {
            schema: config.search_schema.clone(),
            row_limit: config.search_row_limit,
        },
    );
    let app = build_app(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
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

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
