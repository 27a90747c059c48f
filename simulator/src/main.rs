mod telemetry;

use chrono::Utc;
use clap::Parser;
use rand::Rng;
use std::time::Duration;
use telemetry::{BloodPressure, DeviceReading};
use tracing::{error, info, warn};

/// Bursts between progress lines
const PROGRESS_EVERY_BURSTS: u64 = 20;

/// Posts randomised vital-sign readings the way a sensor gateway does
#[derive(Debug, Parser)]
#[command(name = "vitalsync-simulator")]
struct Args {
    /// Base URL of the ingestor
    #[arg(long, env = "API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Shared secret sent in `x-api-key`
    #[arg(long, env = "API_KEY", default_value = "expected-api-key")]
    api_key: String,

    /// Readings per second
    #[arg(long, env = "RATE", default_value_t = 10)]
    rate: u64,

    #[arg(long, env = "DEVICES", default_value_t = 5)]
    devices: usize,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    if args.rate == 0 || args.devices == 0 {
        error!("RATE and DEVICES must both be greater than zero");
        std::process::exit(1);
    }

    info!("Starting VitalSync gateway simulator");
    info!("API: {}, Rate: {} readings/s, Devices: {}", args.api_url, args.rate, args.devices);

    // Every simulated device shares one gateway prefix per run
    let gateway_id = uuid::Uuid::new_v4().simple().to_string();
    let gateway_id = &gateway_id[..8];

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };
    let url = format!("{}/gateway/device-data", args.api_url.trim_end_matches('/'));

    let mut rng = rand::thread_rng();
    let mut tally = Tally::default();

    let burst_size = args.rate.min(50) as usize;
    let burst_interval = Duration::from_millis((burst_size as u64 * 1000) / args.rate);

    info!("Posting in bursts of {} readings every {:?}", burst_size, burst_interval);

    loop {
        let burst_start = std::time::Instant::now();

        for _ in 0..burst_size {
            let device_index = tally.attempts() % args.devices as u64;
            let device_id = format!("gw-{}-dev-{}", gateway_id, device_index);
            let reading = generate_reading(&mut rng, device_id);

            match client
                .post(&url)
                .header("x-api-key", &args.api_key)
                .json(&reading)
                .send()
                .await
            {
                Ok(resp) if resp.status().is_success() => {
                    tally.posted += 1;
                }
                Ok(resp) => {
                    tally.rejected += 1;
                    warn!("Reading for {} rejected: {}", reading.device_id, resp.status());
                }
                Err(e) => {
                    tally.failed += 1;
                    warn!("Failed to post reading: {}", e);
                }
            }
        }

        if tally.finish_burst() {
            info!(
                "Posted {} readings ({} rejected, {} failed)",
                tally.posted, tally.rejected, tally.failed
            );
        }

        let elapsed = burst_start.elapsed();
        if elapsed < burst_interval {
            tokio::time::sleep(burst_interval - elapsed).await;
        } else if elapsed > burst_interval * 2 {
            warn!(
                "Burst took {:?}, target was {:?} - server may be overloaded",
                elapsed, burst_interval
            );
        }
    }
}

/// Outcome counts across the whole run
#[derive(Debug, Default)]
struct Tally {
    posted: u64,
    rejected: u64,
    failed: u64,
    bursts: u64,
}

impl Tally {
    fn attempts(&self) -> u64 {
        self.posted + self.rejected + self.failed
    }

    /// Returns true when a progress line is due
    fn finish_burst(&mut self) -> bool {
        self.bursts += 1;
        self.bursts % PROGRESS_EVERY_BURSTS == 0
    }
}

fn generate_reading(rng: &mut impl Rng, device_id: String) -> DeviceReading {
    let heart_rate = if rng.gen_bool(0.05) {
        rng.gen_range(30..180) // 5% arrhythmic spikes
    } else {
        rng.gen_range(60..100)
    };

    let oxygen_level = if rng.gen_bool(0.03) {
        rng.gen_range(80..90) // 3% desaturation
    } else {
        rng.gen_range(94..100)
    };

    let temperature = if rng.gen_bool(0.05) {
        rng.gen_range(37.8..40.0) // 5% fever
    } else {
        rng.gen_range(36.0..37.4)
    };

    DeviceReading {
        device_id,
        heart_rate,
        oxygen_level,
        pressure: BloodPressure {
            systolic: rng.gen_range(100..140),
            diastolic: rng.gen_range(60..90),
        },
        temperature,
        timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_follows_bursts_not_successes() {
        let mut tally = Tally {
            posted: 1000,
            ..Tally::default()
        };

        // Further bursts that only fail must not repeat the progress line
        let due: Vec<bool> = (0..PROGRESS_EVERY_BURSTS * 2)
            .map(|_| {
                tally.failed += 1;
                tally.finish_burst()
            })
            .collect();

        assert_eq!(due.iter().filter(|d| **d).count(), 2);
        assert!(due[PROGRESS_EVERY_BURSTS as usize - 1]);
        assert_eq!(tally.failed, PROGRESS_EVERY_BURSTS * 2);
    }

    #[test]
    fn test_attempts_count_every_outcome() {
        let tally = Tally {
            posted: 3,
            rejected: 2,
            failed: 1,
            bursts: 0,
        };
        assert_eq!(tally.attempts(), 6);
    }

    #[test]
    fn test_generated_reading_keeps_device_id() {
        let reading = generate_reading(&mut rand::thread_rng(), "gw-1-dev-0".to_string());
        assert_eq!(reading.device_id, "gw-1-dev-0");
    }
}
