use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Request, Response, StatusCode};
use opentelemetry::KeyValue;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{MakeSpan, OnResponse, TraceLayer},
};
use tracing::Span;
use uuid::Uuid;

mod astro;
mod config;
mod dates;
mod error;
mod lenient;
mod llm;
mod middleware;
mod models;
mod pdf;
mod pipeline;
mod routes;
mod services;
mod telemetry;

use astro::{AstroClient, AstroSource};
use config::Config;
use llm::{LlmClient, Provider, RetryPolicy};
use pdf::ReportSettings;
use services::AuthService;
use telemetry::{HTTP_REQUEST_DURATION, HTTP_REQUESTS_TOTAL, init_telemetry};

const LLM_HTTP_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub astro: Arc<dyn AstroSource>,
    pub llm: Option<Arc<LlmClient>>,
    pub auth: AuthService,
    pub settings: Arc<ReportSettings>,
}

#[derive(Clone)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

#[derive(Clone)]
struct HttpMakeSpan;

impl<B> MakeSpan<B> for HttpMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let method = request.method().as_str();
        let path = request.uri().path();

        tracing::info_span!(
            "HTTP request",
            otel.name = %format!("{} {}", method, path),
            http.method = %method,
            http.route = %path,
            http.target = %request.uri(),
            http.scheme = "http",
            http.flavor = ?request.version(),
            http.user_agent = request.headers()
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .unwrap_or(""),
            http.request_id = request.headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or(""),
            http.response.status_code = tracing::field::Empty,
            otel.status_code = tracing::field::Empty,
        )
    }
}

#[derive(Clone)]
struct HttpOnResponse;

impl<B> OnResponse<B> for HttpOnResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status().as_u16();

        span.record("http.response.status_code", status as i64);

        if status >= 500 {
            span.record("otel.status_code", "ERROR");
        } else {
            span.record("otel.status_code", "OK");
        }

        let latency_ms = latency.as_secs_f64() * 1000.0;
        let status_class = format!("{}xx", status / 100);
        let attrs = [
            KeyValue::new("http.status_code", status.to_string()),
            KeyValue::new("http.status_class", status_class),
        ];

        HTTP_REQUESTS_TOTAL.add(1, &attrs);
        HTTP_REQUEST_DURATION.record(latency_ms, &attrs);

        tracing::info!(
            http.response.status_code = status,
            latency_ms = latency_ms,
            "finished processing request"
        );
    }
}

/// Resolves a provider name from configuration. Unknown names and "none"
/// yield no provider.
fn build_provider(name: &str, config: &Config) -> anyhow::Result<Option<Arc<dyn Provider>>> {
    let provider: Arc<dyn Provider> = match name {
        "openai" => Arc::new(llm::openai::OpenAIProvider::new(
            config.openai_api_key.as_deref().unwrap_or(""),
        )),
        "anthropic" => Arc::new(llm::anthropic::AnthropicProvider::new(
            config.anthropic_api_key.as_deref().unwrap_or(""),
            LLM_HTTP_TIMEOUT,
        )?),
        _ => return Ok(None),
    };
    Ok(Some(provider))
}

fn build_llm(config: &Config) -> anyhow::Result<Option<Arc<LlmClient>>> {
    if !config.summary_enabled {
        tracing::info!("Summary generation disabled");
        return Ok(None);
    }

    let Some(primary) = build_provider(&config.llm_provider, config)? else {
        anyhow::bail!("unsupported LLM_PROVIDER {:?}", config.llm_provider);
    };
    let fallback = build_provider(&config.fallback_provider, config)?;

    tracing::info!(
        primary_provider = %config.llm_provider,
        model = %config.llm_model,
        fallback_provider = %config.fallback_provider,
        "LLM client initialized"
    );

    Ok(Some(Arc::new(LlmClient {
        primary,
        fallback,
        primary_provider: config.llm_provider.clone(),
        primary_model: config.llm_model.clone(),
        fallback_provider: config.fallback_provider.clone(),
        fallback_model: config.fallback_model.clone(),
        retry: RetryPolicy::default(),
    })))
}

/// Loads the cover background. A missing or unreadable image leaves the cover
/// on its plain fill.
async fn load_cover(path: Option<&str>) -> Option<Vec<u8>> {
    let path = path?;
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path, error = %e, "Cover image not readable");
            return None;
        }
    };
    match pdf::chart::to_jpeg(&bytes) {
        Ok(jpeg) => {
            tracing::info!(path, bytes = jpeg.len(), "Cover image loaded");
            Some(jpeg)
        }
        Err(e) => {
            tracing::warn!(path, error = %e, "Cover image could not be decoded");
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let telemetry_guard = init_telemetry(&config)?;

    tracing::info!(
        port = config.port,
        environment = %config.environment,
        "Starting cosmic-report"
    );

    let astro: Arc<dyn AstroSource> = Arc::new(AstroClient::new(&config)?);
    let llm = build_llm(&config)?;

    let settings = Arc::new(ReportSettings {
        brand: config.brand.clone(),
        cover_jpeg: load_cover(config.cover_image_path.as_deref()).await,
    });

    let state = AppState {
        auth: AuthService::new(&config),
        config: config.clone(),
        astro,
        llm,
        settings,
    };

    let app = routes::create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(HttpMakeSpan)
                .on_response(HttpOnResponse),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.report_timeout_secs),
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    telemetry_guard.shutdown();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
