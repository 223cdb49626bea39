// Copyright (c) 2026 riverguard
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/riverguard/riverguard-rs

//! Derived incident analytics
//!
//! Each consumer of bus events keeps its own private aggregate; there is
//! no shared store between subscribers.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::core::{EventBus, Subscription};
use crate::detection::{IncidentKind, Severity};

/// Aggregate incident counters
#[derive(Debug, Default, Clone, Serialize)]
pub struct IncidentTotals {
    /// All incidents seen
    pub total: u64,
    /// Critical incidents
    pub critical: u64,
    /// Warning incidents
    pub warning: u64,
    /// Informational incidents
    pub info: u64,
    /// Counts per category
    pub by_kind: HashMap<IncidentKind, u64>,
}

/// Incident statistics aggregator.
///
/// Subscribes to incident events and maintains a private copy of the
/// counts. Dropping the aggregator (or calling [`IncidentStats::detach`])
/// unsubscribes it.
pub struct IncidentStats {
    totals: Arc<Mutex<IncidentTotals>>,
    subscription: Option<Subscription>,
}

impl IncidentStats {
    /// Create a detached aggregator with zeroed counters
    pub fn new() -> Self {
        Self {
            totals: Arc::new(Mutex::new(IncidentTotals::default())),
            subscription: None,
        }
    }

    /// Subscribe to incident events on the bus. Re-attaching replaces the
    /// previous registration.
    pub fn attach(&mut self, bus: &EventBus) {
        let totals = Arc::clone(&self.totals);
        self.subscription = Some(bus.subscribe_incidents(move |incident| {
            let mut totals = totals.lock();
            totals.total += 1;
            match incident.severity {
                Severity::Critical => totals.critical += 1,
                Severity::Warning => totals.warning += 1,
                Severity::Info => totals.info += 1,
            }
            *totals.by_kind.entry(incident.kind).or_default() += 1;
        }));
    }

    /// Drop the subscription; counters are retained
    pub fn detach(&mut self) {
        self.subscription = None;
    }

    /// Copy of the current counters
    pub fn snapshot(&self) -> IncidentTotals {
        self.totals.lock().clone()
    }

    /// Critical incident count
    pub fn critical_count(&self) -> u64 {
        self.totals.lock().critical
    }
}

impl Default for IncidentStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::Incident;

    fn critical_dumping() -> Incident {
        Incident::new(
            "Dumping detected",
            IncidentKind::Dumping,
            Severity::Critical,
            "Yamuna River, Delhi",
            None,
        )
    }

    #[test]
    fn critical_count_increments_by_exactly_one() {
        let bus = EventBus::new();
        let mut stats = IncidentStats::new();
        stats.attach(&bus);

        bus.publish_incident(&critical_dumping());

        assert_eq!(stats.critical_count(), 1);
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total, 1);
        assert_eq!(snapshot.by_kind.get(&IncidentKind::Dumping), Some(&1));
    }

    #[test]
    fn detached_aggregator_stops_counting() {
        let bus = EventBus::new();
        let mut stats = IncidentStats::new();
        stats.attach(&bus);

        bus.publish_incident(&critical_dumping());
        stats.detach();
        bus.publish_incident(&critical_dumping());

        assert_eq!(stats.critical_count(), 1);
    }

    #[test]
    fn aggregators_keep_private_copies() {
        let bus = EventBus::new();
        let mut first = IncidentStats::new();
        let mut second = IncidentStats::new();
        first.attach(&bus);
        second.attach(&bus);

        bus.publish_incident(&critical_dumping());
        first.detach();
        bus.publish_incident(&Incident::new(
            "Oil sheen",
            IncidentKind::Pollution,
            Severity::Warning,
            "Hooghly River, Kolkata",
            None,
        ));

        assert_eq!(first.snapshot().total, 1);
        assert_eq!(second.snapshot().total, 2);
        assert_eq!(second.snapshot().warning, 1);
    }
}
