//! Detection module - data model and threat classification

mod classification;

pub use classification::{is_suspicious, SUSPICIOUS_ACTIONS};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Object classes the simulated detector recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectClass {
    /// A person on the riverbank
    Person,
    /// A road vehicle
    Vehicle,
    /// Floating or submerged debris
    Debris,
    /// An animal
    Animal,
    /// A boat on the water
    Boat,
}

impl ObjectClass {
    /// The fixed detectable set
    pub const ALL: [ObjectClass; 5] = [
        ObjectClass::Person,
        ObjectClass::Vehicle,
        ObjectClass::Debris,
        ObjectClass::Animal,
        ObjectClass::Boat,
    ];

    /// Actions this class can be observed performing
    pub fn actions(&self) -> &'static [&'static str] {
        match self {
            ObjectClass::Person => &["Walking", "Suspicious Activity", "Dumping Trash", "Standing"],
            ObjectClass::Vehicle => &["Parked", "Moving", "Dumping Materials"],
            ObjectClass::Debris => &["Floating", "Submerged"],
            ObjectClass::Animal => &["Moving", "Standing"],
            ObjectClass::Boat => &["Moving", "Anchored", "Dumping Materials"],
        }
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ObjectClass::Person => "Person",
            ObjectClass::Vehicle => "Vehicle",
            ObjectClass::Debris => "Debris",
            ObjectClass::Animal => "Animal",
            ObjectClass::Boat => "Boat",
        };
        f.write_str(label)
    }
}

/// Bounding box as percentages of the frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Percentage from the left edge
    pub left: f64,
    /// Percentage from the top edge
    pub top: f64,
    /// Percentage of frame width
    pub width: f64,
    /// Percentage of frame height
    pub height: f64,
}

/// A single simulated detection event, immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Opaque unique id
    pub id: String,
    /// Recognized object class
    pub object_class: ObjectClass,
    /// Confidence in [0.70, 0.99)
    pub confidence: f64,
    /// Camera location label
    pub location: String,
    /// When the detection was produced
    pub timestamp: DateTime<Utc>,
    /// Observed action, class-dependent
    pub action: String,
    /// Overlay position
    pub bbox: BoundingBox,
    /// True iff the action is in the suspicious set
    pub is_threat: bool,
}

/// Incident categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentKind {
    /// Illegal dumping
    Dumping,
    /// Water pollution
    Pollution,
    /// Vandalism
    Vandalism,
    /// Wildlife disturbance
    Wildlife,
    /// Anything else
    Other,
}

/// Incident severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational
    Info,
    /// Needs attention
    Warning,
    /// Immediate response
    Critical,
}

/// A confirmed or user-reported environmental event, distinct from a raw
/// detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    /// Opaque unique id
    pub id: String,
    /// Short human-readable title
    pub title: String,
    /// Category
    pub kind: IncidentKind,
    /// Severity
    pub severity: Severity,
    /// Where it happened
    pub location: String,
    /// Reference to image evidence, if any
    pub image_ref: Option<String>,
    /// When it was reported
    pub timestamp: DateTime<Utc>,
}

impl Incident {
    /// Build a new incident with a fresh id and the current time
    pub fn new(
        title: &str,
        kind: IncidentKind,
        severity: Severity,
        location: &str,
        image_ref: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            kind,
            severity,
            location: location.to_string(),
            image_ref,
            timestamp: Utc::now(),
        }
    }

    /// Promote a threat detection to a critical incident.
    ///
    /// Dumping actions map to [`IncidentKind::Dumping`]; the remaining
    /// suspicious action maps to [`IncidentKind::Other`].
    pub fn from_detection(detection: &Detection) -> Self {
        let kind = if detection.action.starts_with("Dumping") {
            IncidentKind::Dumping
        } else {
            IncidentKind::Other
        };

        Self::new(
            &format!("{}: {}", detection.action, detection.object_class),
            kind,
            Severity::Critical,
            &detection.location,
            None,
        )
    }
}

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSender {
    /// A human operator
    User,
    /// The assistant
    Bot,
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Opaque unique id
    pub id: String,
    /// Message text
    pub content: String,
    /// Author
    pub sender: ChatSender,
    /// When it was sent
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// A message from the operator
    pub fn user(content: &str) -> Self {
        Self::with_sender(content, ChatSender::User)
    }

    /// A message from the assistant
    pub fn bot(content: &str) -> Self {
        Self::with_sender(content, ChatSender::Bot)
    }

    fn with_sender(content: &str, sender: ChatSender) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.to_string(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threat_detection(action: &str, class: ObjectClass) -> Detection {
        Detection {
            id: "det-test".to_string(),
            object_class: class,
            confidence: 0.87,
            location: "Yamuna River, Delhi".to_string(),
            timestamp: Utc::now(),
            action: action.to_string(),
            bbox: BoundingBox {
                left: 45.0,
                top: 65.0,
                width: 30.0,
                height: 20.0,
            },
            is_threat: is_suspicious(action),
        }
    }

    #[test]
    fn every_class_has_actions() {
        for class in ObjectClass::ALL {
            assert!(!class.actions().is_empty());
        }
    }

    #[test]
    fn promotion_maps_dumping_actions() {
        let incident = Incident::from_detection(&threat_detection("Dumping Trash", ObjectClass::Person));
        assert_eq!(incident.kind, IncidentKind::Dumping);
        assert_eq!(incident.severity, Severity::Critical);
        assert_eq!(incident.location, "Yamuna River, Delhi");
        assert!(incident.title.contains("Dumping Trash"));

        let incident =
            Incident::from_detection(&threat_detection("Suspicious Activity", ObjectClass::Person));
        assert_eq!(incident.kind, IncidentKind::Other);
    }

    #[test]
    fn severity_orders_by_urgency() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }
}
