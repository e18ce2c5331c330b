//! # Helmsman Observability
//!
//! - [`logging`]: subscriber setup (console, rolling files, optional OTLP) and
//!   the per-request logging middleware
//! - [`metrics`]: Prometheus recorder, HTTP metrics middleware and the
//!   business counters (logins, authorization decisions)
//!
//! `OBSERVABILITY_ENABLED=false` switches off the file logs, the OTLP exporter
//! and every metric at runtime; console logging always stays on.
//!
//! # Example
//!
//! ```no_run
//! use helmsman_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_tracing()?;
//!     // ... serve ...
//!     shutdown_tracer();
//!     Ok(())
//! }
//! ```

use std::sync::OnceLock;

pub mod logging;
pub mod metrics;
#[cfg(feature = "otel")]
mod otel;

pub use logging::{REQUEST_ID_HEADER, init_tracing, logging_middleware, shutdown_tracer};
pub use metrics::{
    init_metrics, metrics_middleware, metrics_router, track_authorization_check,
    track_user_login_failure, track_user_login_success,
};
pub use metrics_exporter_prometheus::PrometheusHandle;

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Reads `OBSERVABILITY_ENABLED` once; anything but `false`/`0` means on.
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| !v.eq_ignore_ascii_case("false") && v != "0")
            .unwrap_or(true)
    })
}
