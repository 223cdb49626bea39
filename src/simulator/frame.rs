// Copyright (c) 2026 riverguard
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/riverguard/riverguard-rs

//! Frame-based detector with simulated model warm-up

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rand::prelude::*;
use tokio::time::sleep;
use tracing::{info, warn};

use super::Detector;
use crate::config::SimulatorConfig;
use crate::detection::{is_suspicious, BoundingBox, Detection, ObjectClass};

const DEFAULT_FRAME_WIDTH: u32 = 640;
const DEFAULT_FRAME_HEIGHT: u32 = 480;

/// Simulated frame-based object detector.
///
/// A one-time asynchronous warm-up gates detection; once the simulated
/// model is loaded it stays loaded for the process lifetime.
pub struct FrameDetector {
    id: String,
    rng: StdRng,
    ready: bool,
    warmup: Duration,
    max_per_frame: u32,
    confidence_floor: f64,
    confidence_span: f64,
}

impl FrameDetector {
    /// Create a detector seeded from entropy
    pub fn new(config: &SimulatorConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a deterministic detector for scenario tests
    pub fn with_seed(config: &SimulatorConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &SimulatorConfig, rng: StdRng) -> Self {
        Self {
            id: "frame-detector".to_string(),
            rng,
            ready: false,
            warmup: Duration::from_millis(config.model_warmup_ms),
            max_per_frame: config.max_per_frame,
            confidence_floor: config.confidence_floor,
            confidence_span: config.confidence_span,
        }
    }

    /// Simulate loading the detection model. Idempotent once loaded.
    pub async fn load_model(&mut self) -> Result<()> {
        if self.ready {
            return Ok(());
        }

        info!("Loading simulated detection model...");
        sleep(self.warmup).await;
        self.ready = true;
        info!("Simulated detection model loaded");
        Ok(())
    }

    /// Whether the model has finished warming up
    pub fn is_model_ready(&self) -> bool {
        self.ready
    }

    /// Run detection against one frame, producing 0..=4 detections with
    /// bounding boxes derived from the frame dimensions.
    pub async fn detect_frame(&mut self, width: u32, height: u32) -> Vec<Detection> {
        if !self.ready {
            warn!("Detection model not loaded, warming up first");
            if let Err(err) = self.load_model().await {
                warn!("Model warm-up failed: {err}");
                return Vec::new();
            }
        }

        let width = if width == 0 { DEFAULT_FRAME_WIDTH } else { width };
        let height = if height == 0 {
            DEFAULT_FRAME_HEIGHT
        } else {
            height
        };

        let count = self.rng.gen_range(0..=self.max_per_frame);
        (0..count).map(|_| self.detect_one(width, height)).collect()
    }

    fn detect_one(&mut self, width: u32, height: u32) -> Detection {
        let class = ObjectClass::ALL[self.rng.gen_range(0..ObjectClass::ALL.len())];
        let actions = class.actions();
        let action = actions[self.rng.gen_range(0..actions.len())];
        let confidence = self.confidence_floor + self.rng.gen::<f64>() * self.confidence_span;

        Detection {
            id: uuid::Uuid::new_v4().to_string(),
            object_class: class,
            confidence,
            location: "Camera Feed".to_string(),
            timestamp: Utc::now(),
            action: action.to_string(),
            bbox: self.frame_bbox(width, height),
            is_threat: is_suspicious(action),
        }
    }

    // Box position snaps to whole pixels before converting back to
    // percentages, size lands in [10,30)% of the frame
    fn frame_bbox(&mut self, width: u32, height: u32) -> BoundingBox {
        let w = width as f64;
        let h = height as f64;

        BoundingBox {
            left: self.rng.gen_range(0.0..(w * 0.7)).floor() / w * 100.0,
            top: self.rng.gen_range(0.0..(h * 0.7)).floor() / h * 100.0,
            width: 10.0 + self.rng.gen_range(0.0..20.0),
            height: 10.0 + self.rng.gen_range(0.0..20.0),
        }
    }
}

#[async_trait]
impl Detector for FrameDetector {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn warm_up(&mut self) -> Result<()> {
        self.load_model().await
    }

    async fn detect(&mut self, _camera_index: usize) -> Vec<Detection> {
        self.detect_frame(DEFAULT_FRAME_WIDTH, DEFAULT_FRAME_HEIGHT)
            .await
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "max_per_frame": self.max_per_frame,
            "warmup_ms": self.warmup.as_millis() as u64,
        })
    }

    fn set_config(&mut self, config: serde_json::Value) -> Result<()> {
        if let Some(max) = config.get("max_per_frame").and_then(|v| v.as_u64()) {
            self.max_per_frame = max as u32;
        }
        if let Some(ms) = config.get("warmup_ms").and_then(|v| v.as_u64()) {
            self.warmup = Duration::from_millis(ms);
        }
        Ok(())
    }
}
