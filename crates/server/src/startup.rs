use std::{env, net::SocketAddr, path::Path};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::store::JsonStoreRepository;

use crate::routes::{self, AppState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8081);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Resolve the collection file path from configs or env, with a fallback
fn load_data_path() -> String {
    match configs::load_default() {
        Ok(cfg) => cfg.storage.data_path,
        Err(_) => env::var("STORE_DATA_PATH").unwrap_or_else(|_| "data/stores.json".to_string()),
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let data_path = load_data_path();
    if let Some(parent) = Path::new(&data_path).parent() {
        if !parent.as_os_str().is_empty() {
            common::env::ensure_data_dir(&parent.to_string_lossy()).await?;
        }
    }

    let stores = JsonStoreRepository::open(&data_path).await?;
    let state = AppState { stores };

    let app: Router = routes::build_router(state, build_cors());

    let addr = load_bind_addr()?;
    info!(%addr, %data_path, "starting store api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
