//! Public entry point.
//!
//! [`ProgressService`] exposes the three read-only operations. Each one is
//! total: failures are logged and replaced with the operation's canonical
//! empty snapshot, so callers never handle an error.

use serde::{Deserialize, Serialize};

use crate::guard;
use crate::snapshot::{ClassProgressSnapshot, ProgressSnapshot, TopicProgressDetail};
use crate::statistics::DEFAULT_QUIZ_PASS_THRESHOLD;
use crate::traits::Stores;
use crate::{class, student, topic};

/// Tunables for the aggregation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Minimum quiz score (fraction) counted as passed.
    #[serde(default = "default_quiz_pass_threshold")]
    pub quiz_pass_threshold: f64,
    /// Number of records listed under recent activity.
    #[serde(default = "default_recent_activity_limit")]
    pub recent_activity_limit: usize,
    /// Keep only this many of a student's newest records (None = no cap).
    #[serde(default)]
    pub max_history_records: Option<usize>,
    /// Role used to select class members.
    #[serde(default = "default_student_role")]
    pub student_role: String,
}

fn default_quiz_pass_threshold() -> f64 {
    DEFAULT_QUIZ_PASS_THRESHOLD
}
fn default_recent_activity_limit() -> usize {
    10
}
fn default_student_role() -> String {
    "student".to_string()
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            quiz_pass_threshold: default_quiz_pass_threshold(),
            recent_activity_limit: default_recent_activity_limit(),
            max_history_records: None,
            student_role: default_student_role(),
        }
    }
}

/// The aggregation engine.
///
/// Stateless between calls: every invocation reads fresh from the stores and
/// concurrent invocations share nothing mutable.
#[derive(Clone)]
pub struct ProgressService {
    stores: Stores,
    config: AggregatorConfig,
}

impl ProgressService {
    pub fn new(stores: Stores, config: AggregatorConfig) -> Self {
        Self { stores, config }
    }

    /// Full progress snapshot for one student.
    pub async fn get_student_progress(&self, student_id: &str) -> ProgressSnapshot {
        guard::total(
            "get_student_progress",
            student::student_progress(&self.stores, &self.config, student_id),
            || ProgressSnapshot::empty(student_id),
        )
        .await
    }

    /// Roster view for one class.
    pub async fn get_class_students_progress(&self, class_id: &str) -> ClassProgressSnapshot {
        guard::total(
            "get_class_students_progress",
            class::class_progress(&self.stores, &self.config, class_id),
            || ClassProgressSnapshot::empty(class_id),
        )
        .await
    }

    /// Per-content detail for one (student, topic) pair.
    pub async fn get_topic_progress(&self, student_id: &str, topic_id: &str) -> TopicProgressDetail {
        guard::total(
            "get_topic_progress",
            topic::topic_progress(&self.stores, student_id, topic_id),
            || TopicProgressDetail::empty(student_id, topic_id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AggregatorConfig::default();
        assert_eq!(config.quiz_pass_threshold, 0.6);
        assert_eq!(config.recent_activity_limit, 10);
        assert_eq!(config.max_history_records, None);
        assert_eq!(config.student_role, "student");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: AggregatorConfig =
            serde_json::from_str(r#"{"max_history_records": 500}"#).unwrap();
        assert_eq!(config.max_history_records, Some(500));
        assert_eq!(config.recent_activity_limit, 10);
    }
}
