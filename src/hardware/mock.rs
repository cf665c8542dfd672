//! Mock GPS source for testing and development

use std::collections::VecDeque;

use crate::core::types::{GeoPosition, GpsReading};
use crate::hardware::{GpsSource, GpsSourceConfig};

/// Queue-backed GPS source
///
/// Readings are pushed by the test or demo and handed out by `poll`,
/// respecting the configured update interval. Fully deterministic.
pub struct MockGpsSource {
    config: GpsSourceConfig,
    queue: VecDeque<GpsReading>,
    last_delivered_ms: Option<u64>,
}

impl MockGpsSource {
    pub fn new(config: GpsSourceConfig) -> Self {
        Self {
            config,
            queue: VecDeque::new(),
            last_delivered_ms: None,
        }
    }

    /// Queue a full reading
    pub fn push_reading(&mut self, reading: GpsReading) {
        self.queue.push_back(reading);
    }

    /// Queue a simple fix at ground level
    pub fn push_fix(&mut self, latitude: f64, longitude: f64, timestamp_ms: u64) {
        self.push_reading(GpsReading::new(
            GeoPosition::new(latitude, longitude, 0.0),
            timestamp_ms,
        ));
    }

    /// Drop all queued readings, simulating fix loss
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }
}

impl Default for MockGpsSource {
    fn default() -> Self {
        Self::new(GpsSourceConfig::default())
    }
}

impl GpsSource for MockGpsSource {
    fn poll(&mut self) -> Option<GpsReading> {
        let next_ts = self.queue.front()?.timestamp_ms;

        if let Some(last) = self.last_delivered_ms {
            if self.config.update_interval_ms == 0 {
                // Single-snapshot mode: nothing after the first reading
                return None;
            }
            if next_ts < last + u64::from(self.config.update_interval_ms) {
                self.queue.pop_front();
                return None;
            }
        }

        let reading = self.queue.pop_front()?;
        self.last_delivered_ms = Some(reading.timestamp_ms);
        Some(reading)
    }
}
