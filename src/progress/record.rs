//! The per-user progress record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A user's position in the guided flow.
///
/// Serialized with camelCase keys to match the stored documents.
/// `completed_steps` has set semantics: membership only, no ordering
/// guarantee, and a member is never removed once added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    /// Step the view currently shows. Starts at 1.
    pub current_step: u32,

    /// Steps the user has completed, as a set of step numbers.
    #[serde(default)]
    pub completed_steps: BTreeSet<u32>,

    /// Step the user is actively working on. Starts at 1.
    pub currently_working: u32,

    /// When this record was last written, local or remote.
    pub last_updated: DateTime<Utc>,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            current_step: 1,
            completed_steps: BTreeSet::new(),
            currently_working: 1,
            last_updated: Utc::now(),
        }
    }
}

impl UserProgress {
    /// Whether a step has been completed.
    pub fn is_complete(&self, step: u32) -> bool {
        self.completed_steps.contains(&step)
    }

    /// Number of completed steps.
    pub fn completed_count(&self) -> usize {
        self.completed_steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_starts_at_step_one() {
        let progress = UserProgress::default();
        assert_eq!(progress.current_step, 1);
        assert_eq!(progress.currently_working, 1);
        assert!(progress.completed_steps.is_empty());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let progress = UserProgress::default();
        let json = serde_json::to_string(&progress).unwrap();

        assert!(json.contains("currentStep"));
        assert!(json.contains("completedSteps"));
        assert!(json.contains("currentlyWorking"));
        assert!(json.contains("lastUpdated"));
    }

    #[test]
    fn completed_steps_deserialize_as_a_set() {
        let json = r#"{
            "currentStep": 3,
            "completedSteps": [2, 1, 2, 1],
            "currentlyWorking": 3,
            "lastUpdated": "2026-01-10T12:00:00Z"
        }"#;

        let progress: UserProgress = serde_json::from_str(json).unwrap();

        assert_eq!(progress.completed_steps.len(), 2);
        assert!(progress.is_complete(1));
        assert!(progress.is_complete(2));
        assert!(!progress.is_complete(3));
    }

    #[test]
    fn missing_completed_steps_defaults_to_empty() {
        let json = r#"{
            "currentStep": 1,
            "currentlyWorking": 1,
            "lastUpdated": "2026-01-10T12:00:00Z"
        }"#;

        let progress: UserProgress = serde_json::from_str(json).unwrap();
        assert_eq!(progress.completed_count(), 0);
    }
}
