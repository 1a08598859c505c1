use std::process;
use std::sync::Arc;

use tracing::{error, info};

use mailrelay::{Config, Storage, WebServer};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Load configuration
    let config = match Config::load_with_env(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = mailrelay::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        mailrelay::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        process::exit(1);
    }

    info!("mailrelay starting");

    let storage = match Storage::open(&config.storage) {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            error!("Failed to open storage: {}", e);
            process::exit(1);
        }
    };

    let server = match WebServer::new(&config.server, storage) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create web server: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        process::exit(1);
    }
}
