//! Named stopwatches for timing page loads. Disabled monitors are no-ops.

use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct PerfMonitor {
    enabled: bool,
    timers: HashMap<String, Instant>,
}

impl PerfMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timers: HashMap::new(),
        }
    }

    pub fn start(&mut self, label: &str) {
        if !self.enabled {
            return;
        }
        tracing::info!("[START] {}", label);
        self.timers.insert(label.to_string(), Instant::now());
    }

    pub fn checkpoint(&self, label: &str, description: &str) {
        if !self.enabled {
            return;
        }
        match self.timers.get(label) {
            Some(started) => tracing::info!("[CHECKPOINT] {} - {} at {:.2?}", label, description, started.elapsed()),
            None => tracing::info!("[CHECKPOINT] {} - {}", label, description),
        }
    }

    pub fn end(&mut self, label: &str) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        let Some(started) = self.timers.remove(label) else {
            tracing::warn!("Timer '{}' not found", label);
            return None;
        };
        let elapsed = started.elapsed();
        tracing::info!("[END] {} - {:.2?}", label, elapsed);
        Some(elapsed)
    }
}
