//! Logging and trace export for DevCamper
//!
//! Installs a `tracing-subscriber` registry that always logs to stdout and,
//! when an OTLP exporter is configured, also exports spans.

mod metadata;

use std::time::Duration;

use devcamper_config::telemetry::exporters::{ExportProtocol, ExporterConfig};
use devcamper_config::{LogFormat, TelemetryConfig};
use opentelemetry::global;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider};
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Shuts the tracer provider down, flushing pending spans, when dropped
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Whether spans are being exported
    pub const fn is_exporting(&self) -> bool {
        self.tracer_provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to shutdown tracer provider: {e}");
        }
    }
}

/// Initialize logging and optional trace export
///
/// `log_filter` uses `RUST_LOG` directive syntax; an unparsable filter
/// falls back to `info`. The returned guard must be held for the lifetime
/// of the application.
///
/// # Errors
///
/// Returns an error if the OTLP exporter cannot be built or a global
/// subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>, log_filter: &str) -> anyhow::Result<TelemetryGuard> {
    let filter = EnvFilter::try_new(log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let format = config.map_or(LogFormat::Text, |c| c.log_format);

    let mut guard = TelemetryGuard { tracer_provider: None };

    let otel_layer = match config.and_then(|c| c.exporter.as_ref().map(|e| (c, e))) {
        Some((telemetry, exporter)) => {
            let provider = init_tracer(telemetry, exporter)?;
            let tracer = provider.tracer("devcamper");
            global::set_tracer_provider(provider.clone());
            guard.tracer_provider = Some(provider);
            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(format))
        .with(otel_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}

fn fmt_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().flatten_event(true).boxed(),
    }
}

fn init_tracer(config: &TelemetryConfig, exporter: &ExporterConfig) -> anyhow::Result<SdkTracerProvider> {
    let provider = SdkTracerProvider::builder()
        .with_resource(metadata::build_resource(config))
        .with_sampler(sampler(config.sampling_rate))
        .with_batch_exporter(build_span_exporter(exporter)?)
        .build();

    Ok(provider)
}

/// Parent-based sampler honoring the configured root sampling rate
fn sampler(rate: f64) -> Sampler {
    let root = if rate >= 1.0 {
        Sampler::AlwaysOn
    } else if rate <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(rate)
    };

    Sampler::ParentBased(Box::new(root))
}

fn build_span_exporter(config: &ExporterConfig) -> anyhow::Result<SpanExporter> {
    let timeout = config.timeout.map(Duration::from_secs);

    let exporter = match config.protocol {
        ExportProtocol::Grpc => {
            let mut builder = SpanExporter::builder().with_tonic().with_endpoint(config.endpoint.as_str());
            if let Some(timeout) = timeout {
                builder = builder.with_timeout(timeout);
            }
            builder
                .build()
                .map_err(|e| anyhow::anyhow!("failed to build gRPC span exporter: {e}"))?
        }
        ExportProtocol::HttpProto => {
            let mut builder = SpanExporter::builder().with_http().with_endpoint(config.endpoint.as_str());
            if let Some(timeout) = timeout {
                builder = builder.with_timeout(timeout);
            }
            builder
                .build()
                .map_err(|e| anyhow::anyhow!("failed to build HTTP span exporter: {e}"))?
        }
    };

    Ok(exporter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_of(sampler: Sampler) -> Sampler {
        match sampler {
            Sampler::ParentBased(root) => *root,
            other => panic!("expected parent-based sampler, got {other:?}"),
        }
    }

    #[test]
    fn sampler_clamps_rate() {
        assert!(matches!(root_of(sampler(1.5)), Sampler::AlwaysOn));
        assert!(matches!(root_of(sampler(0.0)), Sampler::AlwaysOff));

        let Sampler::TraceIdRatioBased(rate) = root_of(sampler(0.25)) else {
            panic!("expected ratio sampler");
        };
        assert!((rate - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn resource_carries_service_name() {
        let config = TelemetryConfig {
            service_name: "devcamper-test".to_owned(),
            ..TelemetryConfig::default()
        };
        let resource = metadata::build_resource(&config);

        let name = resource.get(&opentelemetry::Key::from_static_str(
            opentelemetry_semantic_conventions::resource::SERVICE_NAME,
        ));
        assert_eq!(name.map(|v| v.to_string()).as_deref(), Some("devcamper-test"));

        let namespace = resource.get(&opentelemetry::Key::from_static_str(metadata::SERVICE_NAMESPACE));
        assert_eq!(namespace.map(|v| v.to_string()).as_deref(), Some("devcamper"));
    }

    #[test]
    fn configured_namespace_wins() {
        let mut config = TelemetryConfig::default();
        config
            .resource_attributes
            .insert(metadata::SERVICE_NAMESPACE.to_owned(), "bootcamps-staging".to_owned());
        let resource = metadata::build_resource(&config);

        let namespace = resource.get(&opentelemetry::Key::from_static_str(metadata::SERVICE_NAMESPACE));
        assert_eq!(namespace.map(|v| v.to_string()).as_deref(), Some("bootcamps-staging"));
    }
}
