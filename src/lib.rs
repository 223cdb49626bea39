// Copyright (c) 2026 riverguard
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/riverguard/riverguard-rs

//! RiverGuard Core - Simulated Detection and Live-Feed Event Pipeline
//!
//! The headless core of a river-monitoring concept product:
//! - Synthetic object-detection generation with threat classification
//! - Explicitly-constructed publish/subscribe event bus
//! - Timer-driven live feed orchestration with clean shutdown
//! - Incident reporting and derived analytics
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    RiverGuard Core                         │
//! ├────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌───────────┐   ┌────────────────────┐    │
//! │  │ Simulator │ → │ Live Feed │ → │ Incident Promotion │    │
//! │  └───────────┘   └───────────┘   └────────────────────┘    │
//! │        ↓               ↓                  ↓                │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │                      Event Bus                       │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │        ↓               ↓                  ↓                │
//! │  ┌───────────┐   ┌───────────┐   ┌────────────────────┐    │
//! │  │ Analytics │   │ Incident  │   │       Chat         │    │
//! │  │           │   │   Log     │   │     Assistant      │    │
//! │  └───────────┘   └───────────┘   └────────────────────┘    │
//! └────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![allow(dead_code)]

pub mod analytics;
pub mod chat;
pub mod config;
pub mod core;
pub mod detection;
pub mod feed;
pub mod incident;
pub mod simulator;

// Re-exports for convenience
pub use crate::analytics::IncidentStats;
pub use crate::chat::{ChatBot, ChatSession};
pub use crate::config::Config;
pub use crate::core::{Alert, EventBus, Subscription, SystemState};
pub use crate::detection::{
    BoundingBox, ChatMessage, ChatSender, Detection, Incident, IncidentKind, ObjectClass, Severity,
};
pub use crate::feed::{CameraError, FeedState, LiveFeed, Webcam};
pub use crate::incident::{IncidentDraft, IncidentSubmitter, SubmitError};
pub use crate::simulator::{DetectionSimulator, Detector, FrameDetector};

/// RiverGuard version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// RiverGuard name
pub const NAME: &str = "RiverGuard";
