mod showcase;

use std::sync::Arc;

use kaleido::config::HostConfig;
use kaleido::registry::LayoutRegistry;
use kaleido::routes;
use kaleido::state::AppState;
use kaleido::tabs::TabHost;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = HostConfig::from_env()?;
    let port = config.port;

    let registry = Arc::new(LayoutRegistry::new());
    showcase::register_all(&registry)?;

    let mut host = TabHost::new(registry, config);
    match host.open_initial() {
        Ok(Some(tab)) => tracing::info!(layout_id = %tab.layout_id, tab_id = %tab.id, "initial tab opened"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "initial tab not opened"),
    }

    let app = routes::app(AppState::new(host));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "kaleido listening");
    axum::serve(listener, app).await?;
    Ok(())
}
