//! Core module - event bus and system-wide state

mod event_bus;

pub use event_bus::{Alert, EventBus, Subscription};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// System-wide state snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemState {
    /// Whether the feed is currently detecting
    pub running: bool,
    /// Total detections appended to the log
    pub total_detections: u64,
    /// Detections flagged as threats
    pub total_threats: u64,
    /// Threats promoted to incidents
    pub total_incidents: u64,
    /// Timestamp of the most recent detection
    pub last_detection: Option<DateTime<Utc>>,
}

impl Default for SystemState {
    fn default() -> Self {
        Self {
            running: false,
            total_detections: 0,
            total_threats: 0,
            total_incidents: 0,
            last_detection: None,
        }
    }
}
