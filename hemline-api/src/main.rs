use std::net::SocketAddr;
use std::sync::Arc;

use hemline_api::{app, AppState};
use hemline_store::catalog_repo::{StoreGarmentTypeRepository, StoreServiceRepository};
use hemline_store::pricelist_repo::PostgresPriceListRepository;
use hemline_store::{seed, DbClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hemline_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = hemline_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Hemline API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let services = Arc::new(StoreServiceRepository::new(db.pool.clone()));
    let garments = Arc::new(StoreGarmentTypeRepository::new(db.pool.clone()));
    let price_lists = Arc::new(PostgresPriceListRepository::new(db.pool.clone()));

    if config.seed.enabled {
        seed::seed_catalog(garments.as_ref(), services.as_ref())
            .await
            .expect("Failed to seed catalog");
    }

    let app_state = AppState {
        services,
        garments,
        price_lists,
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
