use crate::errors::ApiError;
use crate::metrics::{DEVICE_READINGS_TOTAL, REJECTED_READINGS_TOTAL, TRACKED_DEVICES};
use crate::model::{DeviceReading, ReadingAck};
use crate::store::ReadingStore;
use tracing::{debug, info};

/// Stores a reading from a gateway after checking its API key.
///
/// A key mismatch is rejected before the store is touched.
pub async fn submit_reading(
    store: &dyn ReadingStore,
    expected_key: &str,
    presented_key: &str,
    reading: DeviceReading,
) -> Result<ReadingAck, ApiError> {
    if presented_key != expected_key {
        REJECTED_READINGS_TOTAL.inc();
        debug!("Rejected reading for device {}: invalid API key", reading.device_id);
        return Err(ApiError::Unauthorized("Invalid API key".to_string()));
    }

    let ack = ReadingAck::from(&reading);
    let tracked = store.put_latest(reading).await;

    DEVICE_READINGS_TOTAL.inc();
    TRACKED_DEVICES.set(tracked as f64);
    info!("Received reading from device {}", ack.device_id);

    Ok(ack)
}
