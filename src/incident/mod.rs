// Copyright (c) 2026 riverguard
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/riverguard/riverguard-rs

//! Incident reporting pipeline
//!
//! User-submitted incident reports pass validation, wait out an artificial
//! network delay, then broadcast once on the event bus. Failures surface
//! as a single notification with no retry and never propagate further.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tracing::info;

use crate::config::IncidentConfig;
use crate::core::EventBus;
use crate::detection::{Incident, IncidentKind, Severity};

/// Submission failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// An image is required to report an incident
    #[error("An image is required to report an incident")]
    MissingImage,
    /// The report needs a title
    #[error("A title is required")]
    MissingTitle,
    /// The report needs a location
    #[error("A location is required")]
    MissingLocation,
    /// The artificial transport failed (never happens in practice)
    #[error("Failed to submit incident: {0}")]
    Transport(String),
}

/// An incident report as entered in the upload form
#[derive(Debug, Clone)]
pub struct IncidentDraft {
    /// Short title
    pub title: String,
    /// Free-text description
    pub description: String,
    /// River location or coordinates
    pub location: String,
    /// Category
    pub kind: IncidentKind,
    /// Severity
    pub severity: Severity,
    /// Handle to the uploaded image evidence
    pub image_ref: Option<String>,
}

impl IncidentDraft {
    /// Check the required fields: title, location, and an image
    pub fn validate(&self) -> Result<(), SubmitError> {
        if self.image_ref.is_none() {
            return Err(SubmitError::MissingImage);
        }
        if self.title.trim().is_empty() {
            return Err(SubmitError::MissingTitle);
        }
        if self.location.trim().is_empty() {
            return Err(SubmitError::MissingLocation);
        }
        Ok(())
    }
}

/// Accepts incident drafts and broadcasts the resulting incidents
pub struct IncidentSubmitter {
    bus: Arc<EventBus>,
    delay: Duration,
}

impl IncidentSubmitter {
    /// Create a submitter publishing on the given bus
    pub fn new(config: &IncidentConfig, bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            delay: Duration::from_millis(config.submit_delay_ms),
        }
    }

    /// Validate and submit a draft. The artificial network delay resolves
    /// once per submission; the incident is then published exactly once.
    pub async fn submit(&self, draft: IncidentDraft) -> Result<Incident, SubmitError> {
        draft.validate()?;

        // Stand-in for the upload round trip
        sleep(self.delay).await;

        let incident = Incident::new(
            &draft.title,
            draft.kind,
            draft.severity,
            &draft.location,
            draft.image_ref,
        );

        info!("Incident '{}' submitted at {}", incident.title, incident.location);
        self.bus.publish_incident(&incident);
        self.bus
            .publish_alert("success", "Incident reported successfully");

        Ok(incident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn draft() -> IncidentDraft {
        IncidentDraft {
            title: "Plastic waste pile".to_string(),
            description: "Large pile of plastic waste on the east bank".to_string(),
            location: "Yamuna River, Delhi".to_string(),
            kind: IncidentKind::Dumping,
            severity: Severity::Warning,
            image_ref: Some("upload://east-bank.jpg".to_string()),
        }
    }

    #[test]
    fn validation_requires_image_title_location() {
        let mut missing_image = draft();
        missing_image.image_ref = None;
        assert_eq!(missing_image.validate(), Err(SubmitError::MissingImage));

        let mut missing_title = draft();
        missing_title.title = "  ".to_string();
        assert_eq!(missing_title.validate(), Err(SubmitError::MissingTitle));

        let mut missing_location = draft();
        missing_location.location = String::new();
        assert_eq!(missing_location.validate(), Err(SubmitError::MissingLocation));

        assert!(draft().validate().is_ok());
    }

    #[tokio::test]
    async fn submit_publishes_once() {
        let bus = Arc::new(EventBus::new());
        let received = Arc::new(Mutex::new(Vec::new()));
        let received_cb = Arc::clone(&received);
        let _sub = bus.subscribe_incidents(move |incident| {
            received_cb.lock().push(incident.clone());
        });

        let config = IncidentConfig { submit_delay_ms: 5 };
        let submitter = IncidentSubmitter::new(&config, Arc::clone(&bus));

        let incident = submitter.submit(draft()).await.unwrap();

        let received = received.lock();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].id, incident.id);
        assert_eq!(received[0].kind, IncidentKind::Dumping);
        assert_eq!(received[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn invalid_draft_publishes_nothing() {
        let bus = Arc::new(EventBus::new());
        let config = IncidentConfig { submit_delay_ms: 5 };
        let submitter = IncidentSubmitter::new(&config, Arc::clone(&bus));

        let mut bad = draft();
        bad.image_ref = None;
        assert!(submitter.submit(bad).await.is_err());
        assert_eq!(bus.published(), 0);
    }
}
