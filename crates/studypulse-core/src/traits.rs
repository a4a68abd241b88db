//! Store trait definitions.
//!
//! The engine only ever reads through these traits. They are implemented by
//! the `studypulse-stores` crate and by whatever persistence layer embeds the
//! engine.

use std::sync::Arc;

use async_trait::async_trait;

use crate::model::{
    Class, ClassMember, CognitiveProfile, ContentInteractionRecord, Module, StudyPlan, Subject,
    Topic, VirtualTopicContent, VirtualTopicInstance,
};

// ---------------------------------------------------------------------------
// Curriculum graph
// ---------------------------------------------------------------------------

/// Read-only canonical Subject -> StudyPlan -> Module -> Topic hierarchy.
#[async_trait]
pub trait CurriculumGraph: Send + Sync {
    async fn get_topic(&self, id: &str) -> anyhow::Result<Option<Topic>>;

    async fn get_module(&self, id: &str) -> anyhow::Result<Option<Module>>;

    async fn get_study_plan(&self, id: &str) -> anyhow::Result<Option<StudyPlan>>;

    async fn get_subject(&self, id: &str) -> anyhow::Result<Option<Subject>>;

    /// Modules belonging to a study plan, in any order.
    async fn list_modules_by_study_plan(&self, study_plan_id: &str) -> anyhow::Result<Vec<Module>>;

    /// Topics belonging to a module, in any order.
    async fn list_topics_by_module(&self, module_id: &str) -> anyhow::Result<Vec<Topic>>;
}

// ---------------------------------------------------------------------------
// Interaction log
// ---------------------------------------------------------------------------

/// Append-only log of content-interaction records.
#[async_trait]
pub trait ContentResultStore: Send + Sync {
    /// All records for a student, newest first.
    async fn list_by_student(&self, student_id: &str)
        -> anyhow::Result<Vec<ContentInteractionRecord>>;

    /// Records for one (student, topic) pair, newest first.
    async fn list_by_student_and_topic(
        &self,
        student_id: &str,
        topic_id: &str,
    ) -> anyhow::Result<Vec<ContentInteractionRecord>>;
}

// ---------------------------------------------------------------------------
// Virtual topics
// ---------------------------------------------------------------------------

/// Per-student materialized topic instances.
#[async_trait]
pub trait VirtualTopicStore: Send + Sync {
    async fn list_by_student(&self, student_id: &str) -> anyhow::Result<Vec<VirtualTopicInstance>>;

    async fn get_by_student_and_topic(
        &self,
        student_id: &str,
        topic_id: &str,
    ) -> anyhow::Result<Option<VirtualTopicInstance>>;
}

/// Content items of a virtual topic.
#[async_trait]
pub trait VirtualTopicContentStore: Send + Sync {
    /// Items of one instance, ordered by their `order` field.
    async fn list_by_virtual_topic(
        &self,
        virtual_topic_id: &str,
    ) -> anyhow::Result<Vec<VirtualTopicContent>>;
}

// ---------------------------------------------------------------------------
// Profiles and classes
// ---------------------------------------------------------------------------

#[async_trait]
pub trait CognitiveProfileStore: Send + Sync {
    async fn get_by_student(&self, student_id: &str) -> anyhow::Result<Option<CognitiveProfile>>;
}

#[async_trait]
pub trait ClassStore: Send + Sync {
    /// Members of a class holding the given role.
    async fn get_members(&self, class_id: &str, role: &str) -> anyhow::Result<Vec<ClassMember>>;

    async fn get_class(&self, class_id: &str) -> anyhow::Result<Option<Class>>;
}

/// The full set of stores the engine reads from.
#[derive(Clone)]
pub struct Stores {
    pub curriculum: Arc<dyn CurriculumGraph>,
    pub results: Arc<dyn ContentResultStore>,
    pub virtual_topics: Arc<dyn VirtualTopicStore>,
    pub contents: Arc<dyn VirtualTopicContentStore>,
    pub profiles: Arc<dyn CognitiveProfileStore>,
    pub classes: Arc<dyn ClassStore>,
}

impl Stores {
    /// Build a bundle where one backend serves every store.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: CurriculumGraph
            + ContentResultStore
            + VirtualTopicStore
            + VirtualTopicContentStore
            + CognitiveProfileStore
            + ClassStore
            + 'static,
    {
        Self {
            curriculum: backend.clone(),
            results: backend.clone(),
            virtual_topics: backend.clone(),
            contents: backend.clone(),
            profiles: backend.clone(),
            classes: backend,
        }
    }
}
