mod proxy;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use proxy::{GatewayState, Upstream};

/// Connect + response timeout for a proxied request. Longer than the
/// services' own 5 s validation timeout so their errors surface first.
const PROXY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "api-gateway")]
struct Args {
    #[arg(long, env = "PORT", default_value = "8080")]
    port: u16,

    #[arg(long, env = "CUSTOMER_SERVICE_URL", default_value = "http://customer-service:8087")]
    customer_service_url: String,

    #[arg(long, env = "WAREHOUSE_SERVICE_URL", default_value = "http://warehouse-service:8085")]
    warehouse_service_url: String,

    #[arg(long, env = "COMMODITIES_SERVICE_URL", default_value = "http://commodity-service:8086")]
    commodities_service_url: String,

    #[arg(long, env = "INVENTORY_SERVICE_URL", default_value = "http://inventory-service:8088")]
    inventory_service_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut upstreams = HashMap::new();
    upstreams.insert(
        "customers",
        Upstream::new("customer-service", &args.customer_service_url, "/customers"),
    );
    upstreams.insert(
        "warehouses",
        Upstream::new(
            "warehouse-service",
            &args.warehouse_service_url,
            "/warehouses",
        ),
    );
    upstreams.insert(
        "commodities",
        Upstream::new(
            "commodity-service",
            &args.commodities_service_url,
            "/commodities",
        ),
    );
    upstreams.insert(
        "inventory",
        Upstream::new(
            "inventory-service",
            &args.inventory_service_url,
            "/inventory",
        ),
    );
    for upstream in upstreams.values() {
        info!("upstream {} at {}", upstream.name, upstream.base_url);
    }

    let state = GatewayState {
        upstreams: Arc::new(upstreams),
        client: reqwest::Client::builder().timeout(PROXY_TIMEOUT).build()?,
    };
    let app = proxy::create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port)).await?;
    info!("API gateway listening on port {}", args.port);
    axum::serve(listener, app).await?;

    Ok(())
}
