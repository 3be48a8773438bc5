use daygate::config::AppConfig;
use daygate::db;
use daygate::puzzles;
use daygate::server::{self, AppState};

#[tokio::main]
async fn main() {
    // Initialize logging - default to info level for our crate
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("daygate=info"),
    )
    .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let catalog = match puzzles::load_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("Failed to load puzzle catalog: {e}");
            std::process::exit(1);
        }
    };
    log::info!(
        "Loaded {} puzzles; launch {} at unlock hour {}",
        catalog.len(),
        config.launch_local,
        config.unlock_hour
    );
    if config.admin_token.is_none() {
        log::warn!("ADMIN_TOKEN not set; admin routes will refuse requests");
    }

    let addr = config.addr.clone();
    let db_url = config.db_url();
    let state = AppState::new(config, catalog);

    // Initialize the store asynchronously; handlers report "not
    // initialized" until the pool is installed.
    let init_state = state.clone();
    tokio::spawn(async move {
        match db::init_db(&db_url).await {
            Ok(pool) => {
                if let Ok(stats) = db::get_db_stats(&pool).await {
                    log::info!(
                        "Store stats: {} records, {} index entries",
                        stats.record_count,
                        stats.index_count
                    );
                }
                init_state.install_pool(pool).await;
                log::info!("Store initialized successfully");
            }
            Err(e) => {
                log::error!("Failed to initialize store: {e}");
            }
        }
    });

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    log::info!("Listening on http://{addr}");

    if let Err(e) = axum::serve(listener, server::app(state)).await {
        log::error!("Server error: {e}");
        std::process::exit(1);
    }
}
