//! Metric names and the instruments the studio records into

use std::sync::OnceLock;
use std::time::Instant;

use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Histogram};

pub const GENERATION_COUNT: &str = "studio.generation.count";
pub const GENERATION_FAILURES: &str = "studio.generation.failures";
pub const PROVIDER_REQUEST_DURATION: &str = "provider.request.duration";

/// Instruments shared by every request
///
/// Built lazily from the global meter provider, so they become no-ops when
/// no exporter is configured.
pub struct StudioMetrics {
    /// Successful generated media, labelled by variant
    pub generations: Counter<u64>,
    /// Failed generation attempts, labelled by variant
    pub generation_failures: Counter<u64>,
    /// Wall time of provider calls in seconds, labelled by model and outcome
    pub provider_duration: Histogram<f64>,
}

/// Process-wide studio instruments
pub fn studio() -> &'static StudioMetrics {
    static METRICS: OnceLock<StudioMetrics> = OnceLock::new();
    METRICS.get_or_init(|| {
        let meter = opentelemetry::global::meter("brewshot");
        StudioMetrics {
            generations: meter
                .u64_counter(GENERATION_COUNT)
                .with_description("Generated media returned to callers")
                .build(),
            generation_failures: meter
                .u64_counter(GENERATION_FAILURES)
                .with_description("Generation attempts that produced no usable media")
                .build(),
            provider_duration: meter
                .f64_histogram(PROVIDER_REQUEST_DURATION)
                .with_unit("s")
                .with_description("Provider prediction latency")
                .build(),
        }
    })
}

/// Record a duration measurement on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[KeyValue]) {
    histogram.record(start.elapsed().as_secs_f64(), attributes);
}
