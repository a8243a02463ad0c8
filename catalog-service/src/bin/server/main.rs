use std::sync::Arc;

use auth::Authenticator;
use auth::JwtHandler;
use catalog_service::config::Config;
use catalog_service::domain::identity::service::IdentityService;
use catalog_service::domain::product::service::ProductService;
use catalog_service::inbound::http::router::create_router;
use catalog_service::outbound::repositories::PostgresIdentityRepository;
use catalog_service::outbound::repositories::PostgresProductRepository;
use catalog_service::outbound::repositories::PostgresStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "catalog-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        jwt_issuer = %config.jwt.issuer,
        jwt_audience = %config.jwt.audience,
        jwt_expiration_hours = config.jwt.expiration_hours,
        cors_origins = config.cors.allowed_origins.len(),
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let jwt_handler = JwtHandler::new(config.jwt.secret.as_bytes())
        .with_issuer(&config.jwt.issuer)
        .with_audience(&config.jwt.audience);
    let authenticator = Arc::new(Authenticator::new(
        jwt_handler,
        config.jwt.expiration_hours,
    ));

    let store = Arc::new(PostgresStore::new(pg_pool.clone()));
    let identity_repository = Arc::new(PostgresIdentityRepository::new(pg_pool.clone()));
    let product_repository = Arc::new(PostgresProductRepository::new(pg_pool));

    let identity_service = Arc::new(IdentityService::new(
        identity_repository,
        Arc::clone(&store),
        Arc::clone(&authenticator),
    ));
    let product_service = Arc::new(ProductService::new(product_repository, store));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        identity_service,
        product_service,
        authenticator,
        &config.cors,
    );

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
