use tracing::info;

use stash::db::Database;
use stash::file::BlobStorage;
use stash::web::ApiServer;
use stash::Config;

#[tokio::main]
async fn main() -> stash::Result<()> {
    // Configuration file is optional; environment overrides still apply
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = stash::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        stash::logging::init_console_only(&config.logging.level);
    }

    config.validate()?;

    let db = Database::open(&config.database.path).await?;
    info!("database ready at {}", config.database.path);

    let storage = BlobStorage::new(&config.storage.path)?;
    info!("blob storage at {}", config.storage.path);

    let server = ApiServer::new(&config, db, storage)?;
    info!(
        "stash starting on {}:{}",
        config.server.host, config.server.port
    );

    server.run().await
}
