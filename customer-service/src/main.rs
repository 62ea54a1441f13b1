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
#[command(name = "customer-service")]
struct Args {
    #[arg(long, env = "MONGO_URI", default_value = "mongodb://localhost:27017")]
    mongo_uri: String,

    #[arg(long, env = "CUSTOMER_SERVICE_PORT", default_value = "8087")]
    port: u16,

    #[arg(long, env = "WAREHOUSE_SERVICE_URL", default_value = "http://localhost:8085")]
    warehouse_service_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let client = mongodb::Client::with_uri_str(&args.mongo_uri).await?;
    let db = client.database("wms_db");
    let repo = Arc::new(repository::MongoCustomerRepository::new(&db));

    let warehouses = ReferenceValidator::new(Arc::new(HttpReferenceClient::new(
        args.warehouse_service_url.as_str(),
        "warehouses",
    )?));

    let state = api::AppState {
        customers: Arc::new(service::CustomerService::new(repo, warehouses)),
    };
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port)).await?;
    info!("Customer service listening on port {}", args.port);
    axum::serve(listener, app).await?;

    Ok(())
}
