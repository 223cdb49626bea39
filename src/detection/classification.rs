// Copyright (c) 2026 riverguard
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/riverguard/riverguard-rs

//! Threat classification
//!
//! The suspicious-action set is fixed for a run. A detection is a threat
//! exactly when its action appears here, regardless of object class.

/// Actions flagged as suspicious or illegal
pub const SUSPICIOUS_ACTIONS: [&str; 3] = [
    "Dumping Trash",
    "Dumping Materials",
    "Suspicious Activity",
];

/// Whether the given action is in the suspicious set
pub fn is_suspicious(action: &str) -> bool {
    SUSPICIOUS_ACTIONS.contains(&action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::ObjectClass;

    #[test]
    fn suspicious_set_is_exact() {
        assert!(is_suspicious("Dumping Trash"));
        assert!(is_suspicious("Dumping Materials"));
        assert!(is_suspicious("Suspicious Activity"));

        assert!(!is_suspicious("Walking"));
        assert!(!is_suspicious("Standing"));
        assert!(!is_suspicious("Parked"));
        assert!(!is_suspicious("Floating"));
        assert!(!is_suspicious(""));
    }

    #[test]
    fn threat_is_independent_of_class() {
        // Every action of every class classifies by membership alone
        for class in ObjectClass::ALL {
            for action in class.actions() {
                let expected = SUSPICIOUS_ACTIONS.contains(action);
                assert_eq!(is_suspicious(action), expected, "action {action}");
            }
        }
    }
}
