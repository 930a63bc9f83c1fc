use rosy_jewel_api::config;
use rosy_jewel_api::routes;
use rosy_jewel_api::state::AppState;
use rosy_jewel_api::store::postgres::Database;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("starting Rosy Jewel API in {:?} mode", config.environment);

    // Connect to the store before accepting traffic
    let database = Database::connect(&config.database.url, config.database.max_connections)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("failed to connect to database: {}", e);
            std::process::exit(1);
        });

    let app = routes::router(AppState::postgres(database));

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Rosy Jewel API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
