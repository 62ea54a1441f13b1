mod api;
mod models;
mod repository;
mod service;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "commodity-service")]
struct Args {
    #[arg(long, env = "MONGO_URI", default_value = "mongodb://localhost:27017")]
    mongo_uri: String,

    #[arg(long, env = "COMMODITY_SERVICE_PORT", default_value = "8086")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let client = mongodb::Client::with_uri_str(&args.mongo_uri).await?;
    let db = client.database("wms_db");
    let repo = Arc::new(repository::MongoCommodityRepository::new(&db));

    let state = api::AppState {
        commodities: Arc::new(service::CommodityService::new(repo)),
    };
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port)).await?;
    info!("Commodity service listening on port {}", args.port);
    axum::serve(listener, app).await?;

    Ok(())
}
