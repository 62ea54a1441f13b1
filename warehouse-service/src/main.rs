mod api;
mod models;
mod repository;
mod service;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use shared::{HttpReferenceClient, ReferenceValidator};
use tracing::info;

#[derive(Parser)]
#[command(name = "warehouse-service")]
struct Args {
    #[arg(long, env = "MONGO_URI", default_value = "mongodb://localhost:27017")]
    mongo_uri: String,

    #[arg(long, env = "WAREHOUSE_SERVICE_PORT", default_value = "8085")]
    port: u16,

    #[arg(long, env = "CUSTOMER_SERVICE_URL", default_value = "http://localhost:8087")]
    customer_service_url: String,

    #[arg(long, env = "COMMODITY_SERVICE_URL", default_value = "http://localhost:8086")]
    commodity_service_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let client = mongodb::Client::with_uri_str(&args.mongo_uri).await?;
    let db = client.database("wms_db");
    let repo = Arc::new(repository::MongoWarehouseRepository::new(&db));

    let customers = ReferenceValidator::new(Arc::new(HttpReferenceClient::new(
        args.customer_service_url.as_str(),
        "customers",
    )?));
    let commodities = ReferenceValidator::new(Arc::new(HttpReferenceClient::new(
        args.commodity_service_url.as_str(),
        "commodities",
    )?));

    let state = api::AppState {
        warehouses: Arc::new(service::WarehouseService::new(repo, customers, commodities)),
    };
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port)).await?;
    info!("Warehouse service listening on port {}", args.port);
    axum::serve(listener, app).await?;

    Ok(())
}
