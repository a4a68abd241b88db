//! JSON dataset files backing the in-memory store.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use studypulse_core::model::{
    Class, CognitiveProfile, ContentInteractionRecord, Module, StudyPlan, Subject, Topic,
    VirtualTopicContent, VirtualTopicInstance,
};

/// One role assignment of a user in a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMembership {
    pub class_id: String,
    pub user_id: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub name: Option<String>,
}

fn default_role() -> String {
    "student".to_string()
}

/// Every collection the engine reads, as a single serializable document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub study_plans: Vec<StudyPlan>,
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub class_members: Vec<ClassMembership>,
    #[serde(default)]
    pub virtual_topics: Vec<VirtualTopicInstance>,
    #[serde(default)]
    pub virtual_topic_contents: Vec<VirtualTopicContent>,
    #[serde(default)]
    pub results: Vec<ContentInteractionRecord>,
    #[serde(default)]
    pub profiles: Vec<CognitiveProfile>,
}

impl Dataset {
    /// Load a dataset from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset from {}", path.display()))?;
        let dataset: Dataset =
            serde_json::from_str(&content).context("failed to parse dataset JSON")?;
        tracing::debug!(
            path = %path.display(),
            topics = dataset.topics.len(),
            results = dataset.results.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Check for dangling references and out-of-range values.
    ///
    /// None of these are fatal to the engine, which skips what it cannot
    /// resolve; they are reported so data problems are visible.
    pub fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        let subject_ids: HashSet<&str> = self.subjects.iter().map(|s| s.id.as_str()).collect();
        let plan_ids: HashSet<&str> = self.study_plans.iter().map(|p| p.id.as_str()).collect();
        let module_ids: HashSet<&str> = self.modules.iter().map(|m| m.id.as_str()).collect();
        let topic_ids: HashSet<&str> = self.topics.iter().map(|t| t.id.as_str()).collect();
        let class_ids: HashSet<&str> = self.classes.iter().map(|c| c.id.as_str()).collect();
        let instance_ids: HashSet<&str> =
            self.virtual_topics.iter().map(|v| v.id.as_str()).collect();

        for plan in &self.study_plans {
            if !subject_ids.contains(plan.subject_id.as_str()) {
                warnings.push(ValidationWarning::new(
                    &plan.id,
                    format!("study plan references missing subject {}", plan.subject_id),
                ));
            }
        }

        for module in &self.modules {
            if !plan_ids.contains(module.study_plan_id.as_str()) {
                warnings.push(ValidationWarning::new(
                    &module.id,
                    format!("module references missing study plan {}", module.study_plan_id),
                ));
            }
        }

        for topic in &self.topics {
            if !module_ids.contains(topic.module_id.as_str()) {
                warnings.push(ValidationWarning::new(
                    &topic.id,
                    format!("topic references missing module {}", topic.module_id),
                ));
            }
        }

        for class in &self.classes {
            if let Some(plan_id) = &class.study_plan_id {
                if !plan_ids.contains(plan_id.as_str()) {
                    warnings.push(ValidationWarning::new(
                        &class.id,
                        format!("class is assigned missing study plan {plan_id}"),
                    ));
                }
            }
        }

        for member in &self.class_members {
            if !class_ids.contains(member.class_id.as_str()) {
                warnings.push(ValidationWarning::new(
                    &member.user_id,
                    format!("membership references missing class {}", member.class_id),
                ));
            }
        }

        let mut seen_pairs = HashSet::new();
        for instance in &self.virtual_topics {
            if !topic_ids.contains(instance.topic_id.as_str()) {
                warnings.push(ValidationWarning::new(
                    &instance.id,
                    format!("virtual topic references missing topic {}", instance.topic_id),
                ));
            }
            if !seen_pairs.insert((instance.student_id.as_str(), instance.topic_id.as_str())) {
                warnings.push(ValidationWarning::new(
                    &instance.id,
                    format!(
                        "duplicate virtual topic for student {} and topic {}",
                        instance.student_id, instance.topic_id
                    ),
                ));
            }
        }

        for content in &self.virtual_topic_contents {
            if !instance_ids.contains(content.virtual_topic_id.as_str()) {
                warnings.push(ValidationWarning::new(
                    &content.id,
                    format!(
                        "content references missing virtual topic {}",
                        content.virtual_topic_id
                    ),
                ));
            }
        }

        for record in &self.results {
            if let Some(score) = record.score {
                if !(0.0..=1.0).contains(&score) {
                    warnings.push(ValidationWarning::new(
                        &record.student_id,
                        format!(
                            "score {score} outside [0, 1] for topic {}",
                            record.topic_id
                        ),
                    ));
                }
            }
        }

        warnings
    }
}

/// A non-fatal problem found in a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    /// The id of the offending document.
    pub id: String,
    pub message: String,
}

impl ValidationWarning {
    fn new(id: &str, message: String) -> Self {
        Self {
            id: id.to_string(),
            message,
        }
    }
}
