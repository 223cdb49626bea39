// Copyright (c) 2026 riverguard
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/riverguard/riverguard-rs

//! Simulated object detection
//!
//! Produces plausible-looking but entirely synthetic detection events.
//! Generation cannot fail; it degrades by returning an empty batch.

mod frame;

pub use frame::FrameDetector;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rand::prelude::*;

use crate::config::SimulatorConfig;
use crate::detection::{is_suspicious, BoundingBox, Detection, ObjectClass};

/// Common seam over the detection generators
#[async_trait]
pub trait Detector: Send + Sync {
    /// Detector identifier
    fn id(&self) -> &str;

    /// Whether the detector is ready to produce detections
    fn is_ready(&self) -> bool;

    /// One-time simulated warm-up; a no-op once ready
    async fn warm_up(&mut self) -> Result<()>;

    /// Produce zero or more detections for the given camera
    async fn detect(&mut self, camera_index: usize) -> Vec<Detection>;

    /// Get detector configuration
    fn config(&self) -> serde_json::Value;

    /// Update detector configuration
    fn set_config(&mut self, config: serde_json::Value) -> Result<()>;
}

/// On-demand detection generator
pub struct DetectionSimulator {
    id: String,
    rng: StdRng,
    locations: Vec<String>,
    max_per_call: u32,
    confidence_floor: f64,
    confidence_span: f64,
}

impl DetectionSimulator {
    /// Create a simulator seeded from entropy
    pub fn new(config: &SimulatorConfig, locations: Vec<String>) -> Self {
        Self::with_rng(config, locations, StdRng::from_entropy())
    }

    /// Create a deterministic simulator for scenario tests
    pub fn with_seed(config: &SimulatorConfig, locations: Vec<String>, seed: u64) -> Self {
        Self::with_rng(config, locations, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &SimulatorConfig, locations: Vec<String>, rng: StdRng) -> Self {
        Self {
            id: "simulator".to_string(),
            rng,
            locations,
            max_per_call: config.max_per_call,
            confidence_floor: config.confidence_floor,
            confidence_span: config.confidence_span,
        }
    }

    /// Simulate object detection for one camera.
    ///
    /// Picks 0..=2 detections; each gets a uniformly random class, a
    /// uniformly random action from that class's list, a confidence in
    /// [0.70, 0.99), a random bounding box, and a threat flag derived from
    /// the suspicious-action set.
    pub fn generate(&mut self, camera_index: usize) -> Vec<Detection> {
        let count = self.rng.gen_range(0..=self.max_per_call);
        if count == 0 {
            return Vec::new();
        }

        let location = self.location_label(camera_index);
        (0..count).map(|_| self.generate_one(&location)).collect()
    }

    /// Two-entry camera lookup: index 0 is the primary feed, any other
    /// index is the secondary. Short location tables fall back to the
    /// first entry, empty ones to a fixed label.
    pub fn location_label(&self, camera_index: usize) -> String {
        let slot = if camera_index == 0 { 0 } else { 1 };
        self.locations
            .get(slot)
            .or_else(|| self.locations.first())
            .cloned()
            .unwrap_or_else(|| "Unknown Location".to_string())
    }

    fn generate_one(&mut self, location: &str) -> Detection {
        let class = ObjectClass::ALL[self.rng.gen_range(0..ObjectClass::ALL.len())];
        let actions = class.actions();
        let action = actions[self.rng.gen_range(0..actions.len())];
        let confidence = self.confidence_floor + self.rng.gen::<f64>() * self.confidence_span;

        Detection {
            id: uuid::Uuid::new_v4().to_string(),
            object_class: class,
            confidence,
            location: location.to_string(),
            timestamp: Utc::now(),
            action: action.to_string(),
            bbox: self.random_bbox(),
            is_threat: is_suspicious(action),
        }
    }

    // Keep boxes within the frame: position in [0,70), size in [10,30)
    fn random_bbox(&mut self) -> BoundingBox {
        BoundingBox {
            left: self.rng.gen_range(0.0..70.0),
            top: self.rng.gen_range(0.0..70.0),
            width: 10.0 + self.rng.gen_range(0.0..20.0),
            height: 10.0 + self.rng.gen_range(0.0..20.0),
        }
    }
}

#[async_trait]
impl Detector for DetectionSimulator {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_ready(&self) -> bool {
        true
    }

    async fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }

    async fn detect(&mut self, camera_index: usize) -> Vec<Detection> {
        self.generate(camera_index)
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "max_per_call": self.max_per_call,
            "confidence_floor": self.confidence_floor,
            "confidence_span": self.confidence_span,
        })
    }

    fn set_config(&mut self, config: serde_json::Value) -> Result<()> {
        if let Some(max) = config.get("max_per_call").and_then(|v| v.as_u64()) {
            self.max_per_call = max as u32;
        }
        if let Some(floor) = config.get("confidence_floor").and_then(|v| v.as_f64()) {
            self.confidence_floor = floor;
        }
        if let Some(span) = config.get("confidence_span").and_then(|v| v.as_f64()) {
            self.confidence_span = span;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::SUSPICIOUS_ACTIONS;

    fn seeded(seed: u64) -> DetectionSimulator {
        let config = SimulatorConfig::default();
        DetectionSimulator::with_seed(
            &config,
            vec![
                "Yamuna River, Delhi".to_string(),
                "Hooghly River, Kolkata".to_string(),
            ],
            seed,
        )
    }

    #[test]
    fn confidence_and_bbox_within_documented_ranges() {
        let mut simulator = seeded(7);

        let mut total = 0;
        for _ in 0..500 {
            for detection in simulator.generate(0) {
                total += 1;
                assert!(detection.confidence >= 0.70 && detection.confidence < 0.99);
                assert!(detection.bbox.left >= 0.0 && detection.bbox.left < 70.0);
                assert!(detection.bbox.top >= 0.0 && detection.bbox.top < 70.0);
                assert!(detection.bbox.width >= 10.0 && detection.bbox.width < 30.0);
                assert!(detection.bbox.height >= 10.0 && detection.bbox.height < 30.0);
            }
        }
        assert!(total > 0);
    }

    #[test]
    fn threat_flag_matches_suspicious_set() {
        let mut simulator = seeded(11);

        for _ in 0..500 {
            for detection in simulator.generate(0) {
                let expected = SUSPICIOUS_ACTIONS.contains(&detection.action.as_str());
                assert_eq!(detection.is_threat, expected, "action {}", detection.action);
            }
        }
    }

    #[test]
    fn action_belongs_to_object_class() {
        let mut simulator = seeded(13);

        for _ in 0..500 {
            for detection in simulator.generate(1) {
                assert!(detection
                    .object_class
                    .actions()
                    .contains(&detection.action.as_str()));
            }
        }
    }

    #[test]
    fn camera_zero_labels_yamuna_and_dumping_is_threat() {
        let mut simulator = seeded(42);

        let mut found_dumping = false;
        for _ in 0..500 {
            for detection in simulator.generate(0) {
                assert_eq!(detection.location, "Yamuna River, Delhi");
                if detection.action == "Dumping Trash" {
                    assert!(detection.is_threat);
                    found_dumping = true;
                }
            }
        }
        assert!(found_dumping, "seeded run never produced a dumping event");
    }

    #[test]
    fn other_cameras_use_secondary_label() {
        let mut simulator = seeded(3);
        for camera in [1usize, 2, 9] {
            for detection in simulator.generate(camera) {
                assert_eq!(detection.location, "Hooghly River, Kolkata");
            }
        }
    }

    #[test]
    fn short_location_tables_fall_back() {
        let config = SimulatorConfig::default();

        let mut single =
            DetectionSimulator::with_seed(&config, vec!["Only Site".to_string()], 21);
        for _ in 0..100 {
            for detection in single.generate(1) {
                assert_eq!(detection.location, "Only Site");
            }
        }

        let mut empty = DetectionSimulator::with_seed(&config, Vec::new(), 23);
        for _ in 0..100 {
            for detection in empty.generate(0) {
                assert_eq!(detection.location, "Unknown Location");
            }
        }
    }

    #[test]
    fn batch_size_stays_within_limit() {
        let mut simulator = seeded(5);
        let mut saw_empty = false;
        for _ in 0..200 {
            let batch = simulator.generate(0);
            assert!(batch.len() <= 2);
            saw_empty |= batch.is_empty();
        }
        assert!(saw_empty, "empty batches should occur");
    }

    #[test]
    fn ids_are_unique() {
        let mut simulator = seeded(17);
        let mut ids = std::collections::HashSet::new();
        for _ in 0..200 {
            for detection in simulator.generate(0) {
                assert!(ids.insert(detection.id));
            }
        }
    }

    #[tokio::test]
    async fn detector_seam_reconfigures() {
        let mut simulator = seeded(19);
        assert!(simulator.is_ready());
        simulator.warm_up().await.unwrap();

        simulator
            .set_config(serde_json::json!({ "max_per_call": 0 }))
            .unwrap();
        assert!(simulator.detect(0).await.is_empty());
    }
}
