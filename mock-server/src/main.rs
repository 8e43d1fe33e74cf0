use std::collections::HashMap;

use serde_json::Value;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let db = match std::env::var("SEED_FILE") {
        Ok(path) => mock_server::seeded(load_seed(&path)?),
        Err(_) => mock_server::Db::default(),
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    mock_server::run(listener, db).await
}

/// Read `{"resource": [records...]}` from a JSON file.
fn load_seed(path: &str) -> Result<HashMap<String, Vec<Value>>, std::io::Error> {
    let raw = std::fs::read_to_string(path)?;
    let data: HashMap<String, Vec<Value>> =
        serde_json::from_str(&raw).map_err(std::io::Error::other)?;
    tracing::info!(path, resources = data.len(), "loaded seed data");
    Ok(data)
}
