use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryListingSource};
use crate::routes::with_listing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};
use tradirise::config::AppConfig;
use tradirise::error::AppError;
use tradirise::listings::{FileListingSource, ListingCatalog, ListingKind};
use tradirise::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(dir) = args.data_dir.take() {
        config.listings.data_dir = Some(dir);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = match &config.listings.data_dir {
        Some(dir) => {
            let source = FileListingSource::new(dir);
            info!(data_dir = %source.root().display(), "loading listings from disk");
            ListingCatalog::load(&source)?
        }
        None => {
            warn!("APP_LISTINGS_DIR not set; serving demo listings");
            ListingCatalog::load(&InMemoryListingSource::demo()?)?
        }
    };
    for kind in ListingKind::ordered() {
        let total = catalog.total(kind)?;
        info!(%kind, total, "listing source set ready");
    }

    let app = with_listing_routes(Arc::new(catalog))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "tradirise listing service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
