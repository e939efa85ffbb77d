//! Subscriber setup.

use super::file_writer::RotationPolicy;
use super::tracer;
use crate::infrastructure::paths;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "storefront-core";

/// Resolves the filter directive: `RUST_LOG`, then `trace_level`, then `info`.
fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.trace_level.as_deref().unwrap_or("info");
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

/// Installs the global subscriber exporting spans to
/// `<data_dir>/storefront-otlp.json`.
///
/// Tracing is optional: if the data directory cannot be created, nothing is
/// installed. Calling this more than once is harmless; only the first
/// subscriber is kept.
pub fn init_tracing(config: &Config) {
    let data_dir = paths::get_data_dir(config.data_dir.as_deref());
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![
        opentelemetry::KeyValue::new("service.name", SERVICE_NAME),
        opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);

    let provider = tracer::create_tracer_provider(
        paths::trace_file(&data_dir),
        resource,
        SERVICE_NAME,
        RotationPolicy::default(),
    );
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(otel_layer)
        .try_init();
}
