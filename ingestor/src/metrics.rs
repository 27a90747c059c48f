use crate::errors::Result;
use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Gauge, Opts, Registry, TextEncoder};
use tracing::error;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref DEVICE_READINGS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "vitalsync_device_readings_total",
        "Total device readings accepted"
    ))
    .expect("valid metric opts");
    pub static ref REJECTED_READINGS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "vitalsync_device_readings_rejected_total",
        "Total device readings rejected for a bad API key"
    ))
    .expect("valid metric opts");
    pub static ref LOGIN_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "vitalsync_login_failures_total",
        "Total failed login attempts"
    ))
    .expect("valid metric opts");
    pub static ref TRACKED_DEVICES: Gauge = Gauge::with_opts(Opts::new(
        "vitalsync_tracked_devices",
        "Distinct devices with a stored reading"
    ))
    .expect("valid metric opts");
}

pub fn init_metrics() -> Result<()> {
    REGISTRY.register(Box::new(DEVICE_READINGS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(REJECTED_READINGS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(LOGIN_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(TRACKED_DEVICES.clone()))?;
    Ok(())
}

pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
