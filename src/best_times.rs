//! Local Schulte best times
//!
//! Persisted to LocalStorage, one best time per grid size. The backend
//! keeps the cross-device history; this is the instant "personal best"
//! shown on the Schulte page without a round trip.

use serde::{Deserialize, Serialize};

/// Best completion times keyed by grid size.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BestTimes {
    pub entries: Vec<BestTimeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestTimeEntry {
    pub grid_size: usize,
    /// Completion time in milliseconds
    pub time_ms: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl BestTimes {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "brain_gym_schulte_best";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn best_for(&self, grid_size: usize) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.grid_size == grid_size)
            .map(|e| e.time_ms)
    }

    /// Record a completion. Returns `true` when it set a new best for
    /// its grid size.
    pub fn record(&mut self, grid_size: usize, time_ms: u32, timestamp: f64) -> bool {
        match self.entries.iter_mut().find(|e| e.grid_size == grid_size) {
            Some(entry) => {
                if time_ms < entry.time_ms {
                    entry.time_ms = time_ms;
                    entry.timestamp = timestamp;
                    true
                } else {
                    false
                }
            }
            None => {
                self.entries.push(BestTimeEntry {
                    grid_size,
                    time_ms,
                    timestamp,
                });
                true
            }
        }
    }

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(times) = serde_json::from_str::<BestTimes>(&json) {
                    return times;
                }
            }
        }
        Self::new()
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Schulte best times saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Format milliseconds as `mm:ss.cc` for the stopwatch display.
pub fn format_clock(time_ms: f64) -> String {
    let total_ms = time_ms.max(0.0) as u64;
    let minutes = total_ms / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let centis = (total_ms % 1000) / 10;
    format!("{minutes:02}:{seconds:02}.{centis:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_completion_is_a_best() {
        let mut times = BestTimes::new();
        assert!(times.record(5, 30_000, 1.0));
        assert_eq!(times.best_for(5), Some(30_000));
    }

    #[test]
    fn only_faster_times_replace_the_best() {
        let mut times = BestTimes::new();
        times.record(4, 20_000, 1.0);
        assert!(!times.record(4, 25_000, 2.0));
        assert_eq!(times.best_for(4), Some(20_000));
        assert!(times.record(4, 18_000, 3.0));
        assert_eq!(times.best_for(4), Some(18_000));
    }

    #[test]
    fn grid_sizes_are_tracked_independently() {
        let mut times = BestTimes::new();
        times.record(4, 20_000, 1.0);
        times.record(6, 90_000, 2.0);
        assert_eq!(times.best_for(4), Some(20_000));
        assert_eq!(times.best_for(6), Some(90_000));
        assert_eq!(times.best_for(7), None);
    }

    #[test]
    fn clock_formats_minutes_seconds_centis() {
        assert_eq!(format_clock(0.0), "00:00.00");
        assert_eq!(format_clock(61_230.0), "01:01.23");
        assert_eq!(format_clock(599_990.0), "09:59.99");
    }
}
