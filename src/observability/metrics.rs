use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::{Arc, OnceLock};
use tracing::info;

static METRICS_INSTANCE: OnceLock<Arc<Metrics>> = OnceLock::new();

/// Lazily initializes and returns the process-wide metrics.
pub fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| {
        info!("Initializing Metrics ...");
        Metrics::new()
    })
}

/// Prometheus text exposition of every client metric.
pub fn gather_text() -> String {
    let encoder = TextEncoder::new();
    let metric_families = get_metrics().registry.gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token exchange metrics
    pub token_exchanges: IntCounterVec,
    pub token_exchange_failures: IntCounterVec,
    pub token_exchange_duration: HistogramVec,
    pub token_cache_hits: IntCounterVec,

    // Platform API metrics
    pub api_requests: IntCounterVec,
    pub api_request_failures: IntCounterVec,
    pub api_request_duration: HistogramVec,

    // Identity tokens
    pub identity_tokens_issued: IntCounter,
    pub identity_token_failures: IntCounterVec,

    // Config
    pub config_errors: IntCounter,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("atomicclient".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Token exchange
            token_exchanges: IntCounterVec::new(Opts::new("token_exchanges_total", "OAuth2 token exchanges by role"),&["role"],).unwrap(),
            token_exchange_failures: IntCounterVec::new(Opts::new("token_exchange_failures_total", "Failed token exchanges by reason"),&["role", "reason"],).unwrap(),
            token_exchange_duration: HistogramVec::new(HistogramOpts::new("token_exchange_duration_seconds", "Token exchange duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),&["role"],).unwrap(),
            token_cache_hits: IntCounterVec::new(Opts::new("token_cache_hits_total", "Access tokens served from cache"),&["role"],).unwrap(),

            // API
            api_requests: IntCounterVec::new(Opts::new("api_requests_total", "Platform API requests by operation"),&["operation", "method"],).unwrap(),
            api_request_failures: IntCounterVec::new(Opts::new("api_request_failures_total", "Platform API failures by reason"),&["operation", "reason"],).unwrap(),
            api_request_duration: HistogramVec::new(HistogramOpts::new("api_request_duration_seconds", "Platform API request duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),&["operation"],).unwrap(),

            identity_tokens_issued: IntCounter::new("identity_tokens_issued_total", "Identity tokens signed and self-verified").unwrap(),
            identity_token_failures: IntCounterVec::new(Opts::new("identity_token_failures_total", "Identity token failures by reason"),&["reason"],).unwrap(),

            config_errors: IntCounter::new("config_errors_total", "Errors found while loading configuration").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_exchanges.clone())).unwrap();
        reg.register(Box::new(metrics.token_exchange_failures.clone())).unwrap();
        reg.register(Box::new(metrics.token_exchange_duration.clone())).unwrap();
        reg.register(Box::new(metrics.token_cache_hits.clone())).unwrap();
        reg.register(Box::new(metrics.api_requests.clone())).unwrap();
        reg.register(Box::new(metrics.api_request_failures.clone())).unwrap();
        reg.register(Box::new(metrics.api_request_duration.clone())).unwrap();
        reg.register(Box::new(metrics.identity_tokens_issued.clone())).unwrap();
        reg.register(Box::new(metrics.identity_token_failures.clone())).unwrap();
        reg.register(Box::new(metrics.config_errors.clone())).unwrap();

        metrics
    }
}
