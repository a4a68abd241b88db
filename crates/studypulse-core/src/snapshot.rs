//! Computed snapshot types returned by the three public operations.
//!
//! Snapshots are built fresh on every call and never persisted. Every type
//! here has an "empty" constructor producing the canonical zeroed value that
//! the guard returns when an operation fails.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ContentStatus, NormalizationType, VarkAxis};

// ---------------------------------------------------------------------------
// Student snapshot
// ---------------------------------------------------------------------------

/// A student's full progress snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub student_id: String,
    /// Topic-count-weighted mean of subject percentages.
    pub overall_progress: f64,
    pub by_subject: Vec<SubjectProgress>,
    pub activity_breakdown: ActivityBreakdown,
    pub recent_activity: Vec<RecentActivity>,
    pub vark_profile: Option<VarkProfile>,
    pub generated_at: DateTime<Utc>,
}

impl ProgressSnapshot {
    pub fn empty(student_id: &str) -> Self {
        Self {
            student_id: student_id.to_string(),
            overall_progress: 0.0,
            by_subject: Vec::new(),
            activity_breakdown: ActivityBreakdown::default(),
            recent_activity: Vec::new(),
            vark_profile: None,
            generated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectProgress {
    pub subject_id: String,
    pub subject_name: String,
    pub progress: f64,
    pub completed_topics: usize,
    pub total_topics: usize,
    pub current_module: Option<NodeRef>,
    pub current_topic: Option<NodeRef>,
    pub modules: Vec<ModuleProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    pub module_id: String,
    pub module_name: String,
    pub order: i32,
    pub progress: f64,
    pub completed_topics: usize,
    pub total_topics: usize,
    pub topics: Vec<TopicProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicProgress {
    pub topic_id: String,
    pub virtual_topic_id: String,
    pub topic_name: String,
    pub progress: f64,
    pub completed_contents: usize,
    pub total_contents: usize,
    pub is_completed: bool,
    pub last_activity: Option<DateTime<Utc>>,
}

/// A lightweight `{id, name}` pointer into the curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: String,
    pub name: String,
}

/// Interaction counts bucketed by normalization type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityBreakdown {
    pub quizzes: QuizStats,
    pub interactive: ActivityStats,
    pub slide_views: ActivityStats,
    pub other: ActivityStats,
    pub total_activities: usize,
    pub completed_activities: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStats {
    pub total: usize,
    pub completed: usize,
    pub passed: usize,
    /// `passed / total` as a percentage.
    pub percentage: f64,
    /// Mean of present scores as a percentage; `None` if nothing was scored.
    pub average_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub total: usize,
    pub completed: usize,
    /// `completed / total` as a percentage.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub topic_id: String,
    pub content_type: String,
    pub normalization_type: NormalizationType,
    pub title: Option<String>,
    pub score: Option<f64>,
    pub status: ContentStatus,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VarkProfile {
    pub visual: f64,
    pub auditory: f64,
    pub reading_writing: f64,
    pub kinesthetic: f64,
    /// Axis with the highest value; `None` when every axis is zero.
    pub primary_style: Option<VarkAxis>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Class snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassProgressSnapshot {
    pub class_id: String,
    pub class_name: String,
    pub students: Vec<StudentSummary>,
    /// Unweighted mean of per-student overall percentages.
    pub class_average: f64,
    pub total_students: usize,
}

impl ClassProgressSnapshot {
    pub fn empty(class_id: &str) -> Self {
        Self {
            class_id: class_id.to_string(),
            class_name: String::new(),
            students: Vec::new(),
            class_average: 0.0,
            total_students: 0,
        }
    }
}

/// One roster row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub student_id: String,
    pub student_name: Option<String>,
    pub overall_progress: f64,
    pub current_module: Option<NodeRef>,
    pub current_topic: Option<NodeRef>,
    pub activities_completed: usize,
    pub activities_total: usize,
    pub last_activity: Option<DateTime<Utc>>,
}

impl StudentSummary {
    pub fn empty(student_id: &str, student_name: Option<String>) -> Self {
        Self {
            student_id: student_id.to_string(),
            student_name,
            overall_progress: 0.0,
            current_module: None,
            current_topic: None,
            activities_completed: 0,
            activities_total: 0,
            last_activity: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Topic detail
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicProgressDetail {
    pub student_id: String,
    pub topic_id: String,
    pub topic_name: String,
    pub progress: f64,
    pub completed_count: usize,
    pub total_count: usize,
    pub average_score: Option<f64>,
    pub contents: Vec<ContentProgress>,
    pub last_activity: Option<DateTime<Utc>>,
    /// `true` when the student has no instance of this topic.
    pub not_started: bool,
}

impl TopicProgressDetail {
    /// The explicit "not started" value for a pair with no instance.
    pub fn not_started(student_id: &str, topic_id: &str, topic_name: String) -> Self {
        Self {
            student_id: student_id.to_string(),
            topic_id: topic_id.to_string(),
            topic_name,
            progress: 0.0,
            completed_count: 0,
            total_count: 0,
            average_score: None,
            contents: Vec::new(),
            last_activity: None,
            not_started: true,
        }
    }

    /// The zeroed value returned when the lookup itself failed.
    pub fn empty(student_id: &str, topic_id: &str) -> Self {
        Self::not_started(student_id, topic_id, String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentProgress {
    pub content_id: String,
    pub title: String,
    pub content_type: String,
    pub order: u32,
    pub status: ContentStatus,
    /// Score as a percentage when completed.
    pub score: Option<f64>,
    pub is_interactive: bool,
    pub recorded_at: Option<DateTime<Utc>>,
}
