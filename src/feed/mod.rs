// Copyright (c) 2026 riverguard
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/riverguard/riverguard-rs

//! Live feed orchestration
//!
//! Drives the detection simulator on a fixed cadence (or the frame detector
//! at the faster webcam cadence), owns the append-only detection log, and
//! escalates threats through the event bus.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use rand::prelude::*;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

use crate::config::FeedConfig;
use crate::core::{EventBus, SystemState};
use crate::detection::{Detection, Incident};
use crate::simulator::{DetectionSimulator, FrameDetector};

/// Feed state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// No simulator calls occur
    Idle,
    /// Ticks are live
    Detecting,
}

/// Camera/media-access failures. All are non-fatal; the feed falls back to
/// the idle state and the cause is surfaced as a distinct notification.
#[derive(Debug, Error)]
pub enum CameraError {
    /// The user denied the media permission prompt
    #[error("Camera access denied: allow camera access in your permissions")]
    PermissionDenied,
    /// No capture device is attached
    #[error("No camera found: connect a camera and try again")]
    NotFound,
    /// Another application holds the device
    #[error("Camera is in use by another application")]
    Busy,
    /// Anything else the platform reports
    #[error("Could not access camera: {0}")]
    Other(String),
}

/// Handle to a simulated capture device.
///
/// There is no real device layer in this system; the device name selects
/// the outcome the platform request would have produced.
#[derive(Debug)]
pub struct Webcam {
    device: String,
    width: u32,
    height: u32,
}

impl Webcam {
    /// Request media access for the named device
    pub fn open(device: &str) -> Result<Self, CameraError> {
        match device {
            "" => Err(CameraError::NotFound),
            "denied" => Err(CameraError::PermissionDenied),
            "busy" => Err(CameraError::Busy),
            "broken" => Err(CameraError::Other("device reported an unknown error".to_string())),
            name => Ok(Self {
                device: name.to_string(),
                width: 640,
                height: 480,
            }),
        }
    }

    /// Device name
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Frame dimensions in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Live feed display driver
pub struct LiveFeed {
    camera: usize,
    state: FeedState,
    simulator: DetectionSimulator,
    bus: Arc<EventBus>,
    gate_rng: StdRng,
    tick_probability: f64,
    tick_period: Duration,
    // Faster cadence used while a webcam drives the frame detector
    active_tick_period: Duration,
    // Demo retention: deliberately unbounded for the feed's lifetime
    detections: Vec<Detection>,
    incident_detected: bool,
    promoted: usize,
    webcam: Option<Webcam>,
    frame_detector: Option<FrameDetector>,
}

impl LiveFeed {
    /// Create a feed over camera 0 in the idle state
    pub fn new(config: &FeedConfig, simulator: DetectionSimulator, bus: Arc<EventBus>) -> Self {
        Self::with_gate_rng(config, simulator, bus, StdRng::from_entropy())
    }

    /// Create a feed with a deterministic tick gate for scenario tests
    pub fn with_seed(
        config: &FeedConfig,
        simulator: DetectionSimulator,
        bus: Arc<EventBus>,
        seed: u64,
    ) -> Self {
        Self::with_gate_rng(config, simulator, bus, StdRng::seed_from_u64(seed))
    }

    fn with_gate_rng(
        config: &FeedConfig,
        simulator: DetectionSimulator,
        bus: Arc<EventBus>,
        gate_rng: StdRng,
    ) -> Self {
        Self {
            camera: 0,
            state: FeedState::Idle,
            simulator,
            bus,
            gate_rng,
            tick_probability: config.tick_probability,
            tick_period: Duration::from_millis(config.tick_interval_ms),
            active_tick_period: Duration::from_millis(config.active_tick_interval_ms),
            detections: Vec::new(),
            incident_detected: false,
            promoted: 0,
            webcam: None,
            frame_detector: None,
        }
    }

    /// Current state
    pub fn state(&self) -> FeedState {
        self.state
    }

    /// Active camera index
    pub fn camera(&self) -> usize {
        self.camera
    }

    /// The append-only detection log
    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    /// Whether any threat has been seen since the feed was created
    pub fn incident_detected(&self) -> bool {
        self.incident_detected
    }

    /// Begin detecting
    pub fn start(&mut self) {
        if self.state == FeedState::Idle {
            self.state = FeedState::Detecting;
            info!("Detection started on camera {}", self.camera);
        }
    }

    /// Stop detecting; the log is retained
    pub fn stop(&mut self) {
        if self.state == FeedState::Detecting {
            self.state = FeedState::Idle;
            info!("Detection stopped on camera {}", self.camera);
        }
    }

    /// Switch the active camera.
    ///
    /// The detection log is deliberately NOT reset: entries recorded before
    /// the switch keep their old location label, and later entries carry
    /// the new one.
    pub fn switch_camera(&mut self, index: usize) {
        self.camera = index;
        debug!("Switched to camera {index}");
    }

    /// One timer tick. While idle this is a no-op. While detecting, the
    /// simulator is consulted with the configured probability; any threat
    /// in the returned batch sets the incident flag and raises a one-shot
    /// alert naming the first threat.
    ///
    /// Returns the number of detections appended.
    pub fn tick(&mut self) -> usize {
        if self.state != FeedState::Detecting {
            return 0;
        }
        if self.gate_rng.gen::<f64>() >= self.tick_probability {
            return 0;
        }

        let batch = self.simulator.generate(self.camera);
        self.ingest(batch)
    }

    /// One active-mode tick: run the frame detector against the current
    /// webcam frame. Unlike [`LiveFeed::tick`] this is ungated; every call
    /// produces a detection pass, matching the live-webcam cadence. Falls
    /// back to the periodic tick when no webcam or frame detector is
    /// attached.
    ///
    /// Returns the number of detections appended.
    pub async fn tick_frame(&mut self) -> usize {
        if self.state != FeedState::Detecting {
            return 0;
        }

        let (width, height) = match &self.webcam {
            Some(webcam) => webcam.dimensions(),
            None => return self.tick(),
        };
        let batch = match self.frame_detector.as_mut() {
            Some(detector) => detector.detect_frame(width, height).await,
            None => return self.tick(),
        };
        self.ingest(batch)
    }

    fn ingest(&mut self, batch: Vec<Detection>) -> usize {
        if batch.is_empty() {
            return 0;
        }

        if let Some(threat) = batch.iter().find(|d| d.is_threat) {
            self.incident_detected = true;
            self.bus.publish_alert(
                "error",
                &format!(
                    "Alert: {} detected ({} at {})",
                    threat.action, threat.object_class, threat.location
                ),
            );
        }

        let appended = batch.len();
        self.detections.extend(batch);
        debug!("Appended {appended} detections on camera {}", self.camera);
        appended
    }

    /// Promote the earliest not-yet-promoted threat to an incident and
    /// publish it on the bus
    pub fn promote_first_threat(&mut self) -> Option<Incident> {
        let (offset, threat) = self.detections[self.promoted..]
            .iter()
            .enumerate()
            .find(|(_, d)| d.is_threat)?;

        self.promoted += offset + 1;
        let incident = Incident::from_detection(threat);
        info!("Promoted threat detection to incident '{}'", incident.title);
        self.bus.publish_incident(&incident);
        Some(incident)
    }

    /// Request media access and start detecting on success. On failure the
    /// cause is published as a user-facing alert and the feed stays idle.
    pub fn activate_webcam(&mut self, device: &str) -> bool {
        match Webcam::open(device) {
            Ok(webcam) => {
                info!("Webcam '{}' activated", webcam.device());
                self.bus.publish_alert("success", "Webcam activated successfully");
                self.webcam = Some(webcam);
                self.start();
                true
            }
            Err(err) => {
                warn!("Webcam activation failed: {err}");
                self.bus.publish_alert("error", &err.to_string());
                false
            }
        }
    }

    /// Attach the frame-based detector used while a webcam is live
    pub fn attach_frame_detector(&mut self, detector: FrameDetector) {
        self.frame_detector = Some(detector);
    }

    /// Release the capture device and stop detecting
    pub fn deactivate_webcam(&mut self) {
        if self.webcam.take().is_some() {
            info!("Webcam released");
        }
        self.stop();
    }

    /// Run the feed until the shutdown signal arrives.
    ///
    /// With a live webcam and an attached frame detector the loop runs at
    /// the faster active cadence and every pass hits the detector;
    /// otherwise it runs the gated periodic tick. The tick timer lives
    /// inside this future, so dropping or joining the task is the timer
    /// cleanup; nothing keeps firing after teardown. The first tick fires
    /// one full period after start.
    pub async fn run(&mut self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        self.start();
        let active = self.webcam.is_some() && self.frame_detector.is_some();
        let period = if active {
            self.active_tick_period
        } else {
            self.tick_period
        };
        let mut ticker = interval_at(Instant::now() + period, period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if active {
                        self.tick_frame().await;
                    } else {
                        self.tick();
                    }
                }
                _ = shutdown.recv() => {
                    info!("Live feed shutting down...");
                    break;
                }
            }
        }

        self.stop();
        Ok(())
    }

    /// Snapshot of the feed's run state
    pub fn stats(&self) -> SystemState {
        SystemState {
            running: self.state == FeedState::Detecting,
            total_detections: self.detections.len() as u64,
            total_threats: self.detections.iter().filter(|d| d.is_threat).count() as u64,
            total_incidents: self
                .detections
                .iter()
                .take(self.promoted)
                .filter(|d| d.is_threat)
                .count() as u64,
            last_detection: self.detections.last().map(|d| d.timestamp),
        }
    }
}
