//! api-server — HTTP API for the URL Shortener microservice.
//!
//! Endpoints:
//! - `POST /api/shorturl` with a `url` field (form or JSON body) validates,
//!   canonicalizes and registers the URL, returning `{original_url, short_url}`.
//! - `GET /api/shorturl/:short_url` redirects (302) to the stored URL.
//! - `GET /api/shorturl` lists every entry in registration order.
//! - `GET /api/hello` smoke test.
//!
//! Failures are reported as `{"error": "..."}` with status 200, matching the
//! public contract of the service; only internal errors use 500.
//!
//! Run:
//! ```bash
//! # pretty logs (default); PORT optional
//! cargo run -p api-server
//!
//! # JSON logs, tighter DNS budget
//! LOG_FORMAT=json DNS_TIMEOUT_MS=2000 cargo run -p api-server
//! ```
//!
//! Configuration: See `config.rs` for all environment variables.

mod config;
mod dns;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{
    async_trait,
    extract::{FromRequest, Path, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use domain::adapters::memory_repo::InMemoryRegistry;
use domain::service::ShortenerService;
use domain::{CoreError, HostResolver, UrlEntry};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::dns::DnsResolver;

struct AppState<H: HostResolver> {
    svc: Arc<ShortenerService<InMemoryRegistry, H>>,
}

impl<H: HostResolver> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            svc: Arc::clone(&self.svc),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load and validate config first (fail fast on misconfiguration)
    let cfg = match config::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&cfg);

    let state = AppState {
        svc: Arc::new(ShortenerService::new(
            InMemoryRegistry::new(),
            DnsResolver::new(cfg.dns_timeout),
        )),
    };

    // Request ID header name
    let x_request_id = axum::http::HeaderName::from_static("x-request-id");

    let mut app = router(state)
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid));

    // CORS - already validated in Config::from_env()
    let cors = if cfg.cors_allow_origin == HeaderValue::from_static("*") {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list([cfg.cors_allow_origin.clone()]))
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
    };
    app = app.layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(%addr, err = %e, "failed to bind");
            std::process::exit(1);
        }
    };
    info!(%addr, dns_timeout_ms = cfg.dns_timeout.as_millis() as u64, "api-server listening");
    if let Err(e) = axum::serve(listener, app).await {
        error!(err = %e, "server error");
        std::process::exit(1);
    }
}

fn init_tracing(cfg: &config::Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match cfg.log_format {
        config::LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(fmt::time::SystemTime)
                        .with_writer(std::io::stdout),
                )
                .init();
        }
        config::LogFormat::Pretty => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_writer(std::io::stdout),
                )
                .init();
        }
    }
}

fn router<H: HostResolver + 'static>(state: AppState<H>) -> Router {
    Router::new()
        .route(
            "/api/shorturl",
            get(list_short_urls::<H>).post(create_short_url::<H>),
        )
        .route("/api/shorturl/:short_url", get(redirect_short_url::<H>))
        .route("/api/hello", get(hello))
        .with_state(state)
}

#[derive(Deserialize)]
struct ShortenReq {
    #[serde(default)]
    url: Option<String>,
}

/// The submitted `url` field, read from a JSON or urlencoded body.
///
/// A body that cannot be parsed counts as a missing field, so the handler
/// answers with the regular invalid-url error instead of a rejection.
struct ShortenBody(Option<String>);

#[async_trait]
impl<S> FromRequest<S> for ShortenBody
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let parsed = if is_json {
            Json::<ShortenReq>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .map_err(|e| e.body_text())
        } else {
            Form::<ShortenReq>::from_request(req, state)
                .await
                .map(|Form(body)| body)
                .map_err(|e| e.body_text())
        };

        match parsed {
            Ok(body) => Ok(Self(body.url)),
            Err(reason) => {
                warn!(%reason, "unreadable shorten body");
                Ok(Self(None))
            }
        }
    }
}

#[derive(Serialize)]
struct EntryOut {
    original_url: String,
    short_url: u64,
}

impl From<UrlEntry> for EntryOut {
    fn from(entry: UrlEntry) -> Self {
        Self {
            short_url: entry.short_id.get(),
            original_url: entry.original_url,
        }
    }
}

fn error_response(err: &CoreError) -> Response {
    let status = match err {
        CoreError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::OK,
    };
    (status, Json(http_common::json_core_err(err))).into_response()
}

async fn create_short_url<H: HostResolver + 'static>(
    State(state): State<AppState<H>>,
    ShortenBody(url): ShortenBody,
) -> Response {
    let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
        warn!("shorten without url field");
        return Json(http_common::json_err(http_common::INVALID_URL)).into_response();
    };

    match state.svc.shorten(&url).await {
        Ok(entry) => Json(EntryOut::from(entry)).into_response(),
        Err(e) if e.is_validation() => {
            warn!(input = %url, err = %e, "rejected url");
            error_response(&e)
        }
        Err(e) => {
            error!(input = %url, err = %e, "shorten error");
            error_response(&e)
        }
    }
}

async fn redirect_short_url<H: HostResolver + 'static>(
    State(state): State<AppState<H>>,
    Path(short_url): Path<String>,
) -> Response {
    match state.svc.resolve(&short_url) {
        Ok(entry) => {
            info!(short_url = %entry.short_id, redirect_to = %entry.original_url, "resolve ok");
            (
                StatusCode::FOUND,
                [(header::LOCATION, entry.original_url)],
            )
                .into_response()
        }
        Err(e @ CoreError::Repository(_)) => {
            error!(%short_url, err = %e, "resolve error");
            error_response(&e)
        }
        Err(e) => {
            warn!(%short_url, err = %e, "resolve miss");
            error_response(&e)
        }
    }
}

async fn list_short_urls<H: HostResolver + 'static>(State(state): State<AppState<H>>) -> Response {
    match state.svc.list() {
        Ok(entries) => {
            let out: Vec<EntryOut> = entries.into_iter().map(EntryOut::from).collect();
            Json(out).into_response()
        }
        Err(e) => {
            error!(err = %e, "list error");
            error_response(&e)
        }
    }
}

async fn hello() -> impl IntoResponse {
    Json(serde_json::json!({ "greeting": "hello API" }))
}
