use devcamper_config::TelemetryConfig;
use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource as semconv;

/// Resource key grouping every DevCamper service
pub const SERVICE_NAMESPACE: &str = "service.namespace";

const DEFAULT_NAMESPACE: &str = "devcamper";

/// Describe this process to the trace backend
///
/// Configured `resource_attributes` are applied last and may override the
/// namespace.
pub fn build_resource(config: &TelemetryConfig) -> Resource {
    let mut attrs = vec![
        KeyValue::new(semconv::SERVICE_NAME, config.service_name.clone()),
        KeyValue::new(semconv::SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
    ];

    if !config.resource_attributes.contains_key(SERVICE_NAMESPACE) {
        attrs.push(KeyValue::new(SERVICE_NAMESPACE, DEFAULT_NAMESPACE));
    }

    attrs.extend(
        config
            .resource_attributes
            .iter()
            .map(|(key, value)| KeyValue::new(key.clone(), value.clone())),
    );

    Resource::builder().with_attributes(attrs).build()
}
