use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::is_observability_enabled;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const LOG_DIR: &str = "storage/logs";

/// Logs every request with a request id, its method, matched path, status and
/// latency. 4xx responses are logged at warn, 5xx at error.
///
/// An incoming `x-request-id` is reused; otherwise one is generated. Either
/// way it is echoed on the response.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let span = tracing::info_span!("request", request_id = %request_id);
    let mut response = next.run(req).instrument(span).await;

    let latency_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    match status {
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "Client error"
        ),
        500..=599 => error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "Server error"
        ),
        _ => info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "Request completed"
        ),
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("helmsman=info,helmsman_cli=info,tower_http=warn,hyper=warn,sqlx=warn")
    })
}

/// Installs the global subscriber.
///
/// Console output always. When observability is enabled, also a daily rolling
/// error log and a daily rolling JSON log under `storage/logs`, plus an OTLP
/// exporter with the `otel` feature. An exporter that fails to start is
/// reported and skipped.
pub fn init_tracing() -> anyhow::Result<()> {
    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(default_filter());

    if !is_observability_enabled() {
        tracing_subscriber::registry().with(console_layer).try_init()?;
        info!("Observability disabled, console logging only");
        return Ok(());
    }

    std::fs::create_dir_all(LOG_DIR)?;

    let error_layer = fmt::layer()
        .with_writer(RollingFileAppender::new(
            Rotation::DAILY,
            LOG_DIR,
            "helmsman.log",
        ))
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    // Structured logs for ingestion (Loki and the like)
    let json_layer = fmt::layer()
        .json()
        .with_writer(RollingFileAppender::new(
            Rotation::DAILY,
            LOG_DIR,
            "helmsman.json",
        ))
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    let registry = tracing_subscriber::registry()
        .with(console_layer)
        .with(error_layer)
        .with(json_layer);

    #[cfg(feature = "otel")]
    {
        match crate::otel::init_tracer() {
            Ok(tracer) => {
                registry
                    .with(tracing_opentelemetry::layer().with_tracer(tracer))
                    .try_init()?;
                info!("Tracing initialized with OpenTelemetry and file logging");
            }
            Err(e) => {
                registry.try_init()?;
                warn!(error = %e, "OpenTelemetry unavailable, file logging only");
            }
        }
    }

    #[cfg(not(feature = "otel"))]
    {
        registry.try_init()?;
        info!("Tracing initialized with file logging");
    }

    Ok(())
}

/// Flushes pending spans. A no-op without the `otel` feature.
pub fn shutdown_tracer() {
    #[cfg(feature = "otel")]
    crate::otel::shutdown();
}
