use crate::app::{waste_dispatcher, App, ComboApp, FilteredApp};
use crate::commands::Out;
use crate::data::{Dataset, Scope};
use crate::error::{ErrorType, IntoResult};
use crate::reactive::EventLoop;
use crate::server::Server;
use crate::{Config, Result};
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info};

/// Serves the filtered line-chart dashboard until `shutdown` completes.
///
/// The national table is loaded once, before the listener is bound, and shared read-only by the
/// callback and every connection.
pub async fn serve(config: Config, shutdown: impl Future<Output = ()>) -> Result<Out<()>> {
    let dataset = Dataset::load(&config, Scope::National).await?;
    let event_loop = EventLoop::spawn(Arc::new(waste_dispatcher(dataset.clone())));
    let app = FilteredApp::new(&dataset, config.default_system(), event_loop.handle())
        .pub_result(ErrorType::Load)?;

    run(&config, App::Filtered(app), shutdown).await?;
    event_loop.shutdown().await.pub_result(ErrorType::Service)?;
    Ok("The dashboard server has stopped".into())
}

/// Serves the combo chart dashboard until `shutdown` completes.
pub async fn serve_combo(config: Config, shutdown: impl Future<Output = ()>) -> Result<Out<()>> {
    let dataset = Dataset::load(&config, Scope::Combo).await?;
    let app = ComboApp::new(&dataset).pub_result(ErrorType::Render)?;
    run(&config, App::Combo(app), shutdown).await?;
    Ok("The combo dashboard server has stopped".into())
}

async fn run(config: &Config, app: App, shutdown: impl Future<Output = ()>) -> Result<()> {
    let server = Server::bind(config.bind(), app)
        .await
        .pub_result(ErrorType::Service)?;
    info!("Press Ctrl-C to stop");
    server.run(shutdown).await.pub_result(ErrorType::Service)
}

/// Completes on Ctrl-C.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for Ctrl-C, stopping now: {e}");
    }
}
