//! Log subscriber and optional `OpenTelemetry` span export.
//!
//! Logs always go to stderr through `tracing-subscriber`, filtered by
//! `RUST_LOG`. With the `telemetry` feature, spans are also exported over
//! OTLP when `OTEL_EXPORTER_OTLP_*` variables are present. Dropping the
//! returned [`TelemetryGuard`] flushes pending spans, which matters for a
//! process that exits as soon as its work is done.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "telemetry")]
use opentelemetry::trace::TracerProvider;
#[cfg(feature = "telemetry")]
use tracing_opentelemetry::OpenTelemetryLayer;

#[cfg(feature = "telemetry")]
mod otlp {
    use std::env;

    use opentelemetry::{KeyValue, Value};
    use opentelemetry_sdk::Resource;
    use opentelemetry_sdk::trace::{RandomIdGenerator, Sampler, SdkTracerProvider};
    use opentelemetry_semantic_conventions::{
        SCHEMA_URL,
        attribute::{DEPLOYMENT_ENVIRONMENT_NAME, SERVICE_VERSION},
    };

    /// Supported OTLP transport protocols.
    #[derive(Debug, Clone, Copy)]
    enum Protocol {
        Http,
        Grpc,
    }

    /// Returns `None` if OTLP export is not configured.
    fn detect_protocol() -> Option<Protocol> {
        let configured = ["ENDPOINT", "HEADERS", "PROTOCOL"]
            .iter()
            .any(|suffix| env::var(format!("OTEL_EXPORTER_OTLP_{suffix}")).is_ok());
        configured.then(|| match env::var("OTEL_EXPORTER_OTLP_PROTOCOL").as_deref() {
            Ok("grpc") => Protocol::Grpc,
            _ => Protocol::Http,
        })
    }

    fn env_or(key: &str, fallback: &str) -> Value {
        env::var(key)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| Value::from(fallback.to_owned()), Value::from)
    }

    fn resource(name: &str, version: &str) -> Resource {
        let mut attributes = vec![KeyValue::new(
            SERVICE_VERSION,
            env_or("OTEL_SERVICE_VERSION", version),
        )];
        if let Ok(deployment) = env::var("OTEL_SERVICE_DEPLOYMENT") {
            attributes.push(KeyValue::new(DEPLOYMENT_ENVIRONMENT_NAME, deployment));
        }
        Resource::builder()
            .with_service_name(env_or("OTEL_SERVICE_NAME", name))
            .with_schema_url(attributes, SCHEMA_URL)
            .build()
    }

    /// Builds the tracer provider, or `None` when export is not configured or
    /// the exporter cannot be created.
    pub(super) fn tracer_provider(name: &str, version: &str) -> Option<SdkTracerProvider> {
        let exporter = match detect_protocol()? {
            Protocol::Http => opentelemetry_otlp::SpanExporter::builder()
                .with_http()
                .build(),
            Protocol::Grpc => opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .build(),
        };
        let exporter = exporter.ok()?;
        Some(
            SdkTracerProvider::builder()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource(name, version))
                .with_batch_exporter(exporter)
                .build(),
        )
    }
}

/// Subscriber settings.
#[derive(Debug, Default)]
#[cfg_attr(not(feature = "telemetry"), allow(dead_code))]
pub struct Telemetry {
    name: Option<&'static str>,
    version: Option<&'static str>,
    log_level: Option<String>,
}

impl Telemetry {
    /// Creates a new, empty [`Telemetry`] instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service name reported to the collector.
    #[must_use]
    pub const fn with_name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the service version reported to the collector.
    #[must_use]
    pub const fn with_version(mut self, version: &'static str) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the filter used when `RUST_LOG` is not set.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Installs the global subscriber.
    ///
    /// Returns [`TelemetryGuard`] that flushes exporters on drop.
    pub fn register(self) -> TelemetryGuard {
        let fallback = self.log_level.as_deref().unwrap_or("info");
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into());
        let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

        let registry = tracing_subscriber::registry().with(filter).with(fmt);

        #[cfg(feature = "telemetry")]
        let tracer_provider = otlp::tracer_provider(
            self.name.unwrap_or(env!("CARGO_PKG_NAME")),
            self.version.unwrap_or(env!("CARGO_PKG_VERSION")),
        );
        #[cfg(feature = "telemetry")]
        let registry = registry.with(
            tracer_provider
                .as_ref()
                .map(|tp| OpenTelemetryLayer::new(tp.tracer(env!("CARGO_PKG_NAME")))),
        );

        registry.init();

        TelemetryGuard {
            #[cfg(feature = "telemetry")]
            tracer_provider,
        }
    }
}

/// Owns the tracer provider; flushes and shuts it down on drop.
#[derive(Debug)]
pub struct TelemetryGuard {
    #[cfg(feature = "telemetry")]
    tracer_provider: Option<opentelemetry_sdk::trace::SdkTracerProvider>,
}

#[cfg(feature = "telemetry")]
impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(ref tp) = self.tracer_provider
            && let Err(err) = tp.shutdown()
        {
            tracing::error!(?err, "tracer provider shutdown error");
        }
    }
}
