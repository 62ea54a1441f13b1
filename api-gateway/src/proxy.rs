use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{HeaderMap, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use tracing::{info, warn};

use shared::ErrorBody;

/// An internal service the gateway forwards to.
#[derive(Debug, Clone)]
pub struct Upstream {
    pub name: String,
    pub base_url: String,
    pub root: String,
}

impl Upstream {
    pub fn new(name: &str, base_url: &str, root: &str) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            root: root.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct GatewayState {
    pub upstreams: Arc<HashMap<&'static str, Upstream>>,
    pub client: reqwest::Client,
}

pub fn create_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/:resource", any(proxy))
        .route("/api/:resource/*rest", any(proxy))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "API gateway is healthy"
}

/// Rewrites a gateway-facing path onto the upstream's path space.
/// `/api/commodities` and `/api/commodities/` both map to the upstream
/// root; deeper paths are concatenated with exactly one separating
/// slash.
pub fn rewrite_path(request_path: &str, gateway_prefix: &str, upstream_root: &str) -> String {
    let remainder = request_path
        .strip_prefix(gateway_prefix)
        .unwrap_or(request_path);
    let root = upstream_root.trim_end_matches('/');
    if remainder.is_empty() || remainder == "/" {
        root.to_string()
    } else {
        format!("{}/{}", root, remainder.trim_start_matches('/'))
    }
}

// Connection-level headers never travel through a proxy. Host is
// rewritten by the outbound client; CORS headers are owned by the
// gateway itself.
const STRIPPED_HEADERS: [&str; 9] = [
    "host",
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_stripped(name: &HeaderName) -> bool {
    STRIPPED_HEADERS.contains(&name.as_str()) || name.as_str().starts_with("access-control-")
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static("*"),
    );
}

fn error_response(status: StatusCode, message: String) -> Response {
    let mut response = (status, Json(ErrorBody { error: message })).into_response();
    apply_cors_headers(response.headers_mut());
    response
}

/// Forwards the request to the upstream owning the addressed resource,
/// preserving method, body, query string, and all non-connection
/// headers. Every verb is forwarded the same way, OPTIONS included.
pub async fn proxy(State(state): State<GatewayState>, request: Request) -> Response {
    let path = request.uri().path().to_string();
    let resource = path
        .strip_prefix("/api/")
        .and_then(|rest| rest.split('/').next())
        .unwrap_or("");

    let Some(upstream) = state.upstreams.get(resource) else {
        return error_response(
            StatusCode::NOT_FOUND,
            format!("unknown resource '{}'", resource),
        );
    };

    let gateway_prefix = format!("/api/{}", resource);
    let target_path = rewrite_path(&path, &gateway_prefix, &upstream.root);
    let mut url = format!("{}{}", upstream.base_url, target_path);
    if let Some(query) = request.uri().query() {
        url.push('?');
        url.push_str(query);
    }
    info!("proxying {} {} -> {}", request.method(), path, url);

    let method = request.method().clone();
    let mut headers = HeaderMap::new();
    for (name, value) in request.headers() {
        if !is_stripped(name) {
            headers.insert(name.clone(), value.clone());
        }
    }

    let body = match axum::body::to_bytes(request.into_body(), usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("failed to read request body: {}", err),
            );
        }
    };

    let upstream_response = match state
        .client
        .request(method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            warn!("upstream {} unreachable: {}", upstream.name, err);
            return error_response(
                StatusCode::BAD_GATEWAY,
                format!(
                    "bad gateway: could not reach upstream service {} ({}): {}",
                    upstream.name, upstream.base_url, err
                ),
            );
        }
    };

    let status = upstream_response.status();
    let mut response_headers = HeaderMap::new();
    for (name, value) in upstream_response.headers() {
        if !is_stripped(name) {
            response_headers.insert(name.clone(), value.clone());
        }
    }

    let body = match upstream_response.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("upstream {} response aborted: {}", upstream.name, err);
            return error_response(
                StatusCode::BAD_GATEWAY,
                format!(
                    "bad gateway: upstream service {} aborted the response: {}",
                    upstream.name, err
                ),
            );
        }
    };

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    apply_cors_headers(response.headers_mut());
    response
}
