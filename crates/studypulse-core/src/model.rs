//! Core data model types for studypulse.
//!
//! These are the records the engine reads from its stores: the canonical
//! curriculum graph, per-student virtual topics and their content items,
//! the append-only interaction log, and the derived cognitive profile.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Curriculum graph
// ---------------------------------------------------------------------------

/// A subject at the root of the curriculum hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
}

/// A study plan groups modules of one subject, optionally for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub id: String,
    pub subject_id: String,
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// A module within a study plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub study_plan_id: String,
    pub name: String,
    /// Position of the module inside its plan; lower comes first.
    #[serde(default)]
    pub order: i32,
}

/// A canonical topic within a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub module_id: String,
    pub name: String,
}

/// A class (roster) with an optional assigned study plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub study_plan_id: Option<String>,
}

/// A member of a class as returned by a role-filtered roster read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMember {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Virtual topics
// ---------------------------------------------------------------------------

/// A student-specific materialized copy of a canonical topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualTopicInstance {
    pub id: String,
    pub student_id: String,
    pub topic_id: String,
    pub topic_name: String,
}

/// One ordered content item inside a virtual topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualTopicContent {
    pub id: String,
    pub virtual_topic_id: String,
    pub content_type: String,
    pub order: u32,
    #[serde(default)]
    pub title: String,
    /// Render and attachment hints written by the content pipeline.
    #[serde(default)]
    pub metadata: ContentMetadata,
}

/// Render/attachment metadata attached to a content item.
///
/// Several historical encodings exist; any of them may mark an item as a
/// template-driven interactive payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentMetadata {
    #[serde(default)]
    pub render: Option<RenderMetadata>,
    #[serde(default)]
    pub attachment: Option<AttachmentMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderMetadata {
    /// Rendering engine name, e.g. "template" or "markdown".
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentMetadata {
    /// Attachment kind, e.g. "interactive_template" or "pdf".
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub interactive: bool,
}

// ---------------------------------------------------------------------------
// Interaction log
// ---------------------------------------------------------------------------

/// Coarse category used to bucket heterogeneous interactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationType {
    Quiz,
    Interactive,
    SlideView,
    #[default]
    #[serde(other)]
    Default,
}

impl fmt::Display for NormalizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationType::Quiz => write!(f, "quiz"),
            NormalizationType::Interactive => write!(f, "interactive"),
            NormalizationType::SlideView => write!(f, "slide_view"),
            NormalizationType::Default => write!(f, "default"),
        }
    }
}

impl FromStr for NormalizationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quiz" => Ok(NormalizationType::Quiz),
            "interactive" => Ok(NormalizationType::Interactive),
            "slide_view" | "slideview" => Ok(NormalizationType::SlideView),
            "default" => Ok(NormalizationType::Default),
            other => Err(format!("unknown normalization type: {other}")),
        }
    }
}

/// One atomic student/content interaction.
///
/// A present `score` (a fraction in [0, 1]) means the interaction was
/// completed; an absent score means it was attempted but not scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentInteractionRecord {
    pub student_id: String,
    pub topic_id: String,
    #[serde(default)]
    pub virtual_content_id: Option<String>,
    pub content_type: String,
    #[serde(default)]
    pub normalization_type: NormalizationType,
    #[serde(default)]
    pub score: Option<f64>,
    pub recorded_at: DateTime<Utc>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ContentInteractionRecord {
    pub fn is_completed(&self) -> bool {
        self.score.is_some()
    }

    pub fn status(&self) -> ContentStatus {
        if self.is_completed() {
            ContentStatus::Completed
        } else {
            ContentStatus::InProgress
        }
    }
}

/// Per-item progress status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Completed,
    InProgress,
    NotStarted,
}

// ---------------------------------------------------------------------------
// Cognitive profile
// ---------------------------------------------------------------------------

/// Four VARK axes, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStyle {
    #[serde(default)]
    pub visual: f64,
    #[serde(default)]
    pub auditory: f64,
    #[serde(default, alias = "reading_writing")]
    pub reading_writing: f64,
    #[serde(default)]
    pub kinesthetic: f64,
}

impl LearningStyle {
    /// `true` when no axis carries a positive value.
    pub fn is_empty(&self) -> bool {
        self.axes().iter().all(|(_, v)| *v <= 0.0)
    }

    /// Axes in canonical VARK order.
    pub fn axes(&self) -> [(VarkAxis, f64); 4] {
        [
            (VarkAxis::Visual, self.visual),
            (VarkAxis::Auditory, self.auditory),
            (VarkAxis::ReadingWriting, self.reading_writing),
            (VarkAxis::Kinesthetic, self.kinesthetic),
        ]
    }
}

/// One of the four VARK learning-style axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarkAxis {
    Visual,
    Auditory,
    ReadingWriting,
    Kinesthetic,
}

/// A stored cognitive profile.
///
/// Older documents carry no structured `learning_style`; instead the same
/// shape is nested under a `"profile"` key inside `legacy_blob`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognitiveProfile {
    pub user_id: String,
    #[serde(default)]
    pub learning_style: Option<LearningStyle>,
    #[serde(default)]
    pub legacy_blob: Option<String>,
    pub updated_at: DateTime<Utc>,
}
