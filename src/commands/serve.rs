use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    app::App,
    catalog::{manifest::scan_modules, TypeCatalog},
    config::Config,
    jobs::store::MemoryJobStore,
    router::router,
};

pub async fn handle_serve_command(config: Config) {
    let manifests = scan_modules(&config.catalog);
    let catalog = TypeCatalog::build(manifests);
    info!(
        "📦 Type catalog ready: {} modules, {} types, {} callable signatures",
        catalog.modules().len(),
        catalog.type_count(),
        catalog.signature_count()
    );

    let port = config.server.port;
    let app = App::new(config, catalog, Arc::new(MemoryJobStore::new()));
    let router = router(app);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("❌ Cannot bind {addr}: {e}");
            return;
        }
    };

    info!("🚀 Admin server listening on {addr}");
    if let Err(e) = axum::serve(listener, router).await {
        error!("❌ Server error: {e}");
    }
}
