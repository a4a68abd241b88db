//! In-memory store backend.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use studypulse_core::error::StoreError;
use studypulse_core::model::{
    Class, ClassMember, CognitiveProfile, ContentInteractionRecord, Module, StudyPlan, Subject,
    Topic, VirtualTopicContent, VirtualTopicInstance,
};
use studypulse_core::traits::{
    ClassStore, CognitiveProfileStore, ContentResultStore, CurriculumGraph, Stores,
    VirtualTopicContentStore, VirtualTopicStore,
};

use crate::dataset::Dataset;

/// A collection that can be made to fail, for exercising degraded paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Curriculum,
    Results,
    VirtualTopics,
    Contents,
    Profiles,
    Classes,
}

/// Serves every store trait from a [`Dataset`] held in memory.
///
/// Honors the ordering contracts of the traits: results newest first and
/// content items by `order`.
pub struct MemoryStore {
    data: Dataset,
    /// Collection whose reads fail with `StoreError::Unavailable`.
    failing: Option<Collection>,
    /// Number of reads served.
    read_count: AtomicU32,
}

impl MemoryStore {
    pub fn new(data: Dataset) -> Self {
        Self {
            data,
            failing: None,
            read_count: AtomicU32::new(0),
        }
    }

    /// Make every read of `collection` fail.
    pub fn failing(mut self, collection: Collection) -> Self {
        self.failing = Some(collection);
        self
    }

    /// Get the number of reads served so far.
    pub fn read_count(&self) -> u32 {
        self.read_count.load(Ordering::Relaxed)
    }

    /// Wrap this store into the engine's store bundle.
    pub fn into_stores(self) -> Stores {
        Stores::from_backend(Arc::new(self))
    }

    fn read(&self, collection: Collection) -> Result<()> {
        self.read_count.fetch_add(1, Ordering::Relaxed);
        if self.failing == Some(collection) {
            return Err(StoreError::Unavailable(format!("{collection:?} store is offline")).into());
        }
        Ok(())
    }

    fn results_where(
        &self,
        filter: impl Fn(&ContentInteractionRecord) -> bool,
    ) -> Vec<ContentInteractionRecord> {
        let mut records: Vec<_> = self.data.results.iter().filter(|r| filter(r)).cloned().collect();
        records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        records
    }
}

#[async_trait]
impl CurriculumGraph for MemoryStore {
    async fn get_topic(&self, id: &str) -> Result<Option<Topic>> {
        self.read(Collection::Curriculum)?;
        Ok(self.data.topics.iter().find(|t| t.id == id).cloned())
    }

    async fn get_module(&self, id: &str) -> Result<Option<Module>> {
        self.read(Collection::Curriculum)?;
        Ok(self.data.modules.iter().find(|m| m.id == id).cloned())
    }

    async fn get_study_plan(&self, id: &str) -> Result<Option<StudyPlan>> {
        self.read(Collection::Curriculum)?;
        Ok(self.data.study_plans.iter().find(|p| p.id == id).cloned())
    }

    async fn get_subject(&self, id: &str) -> Result<Option<Subject>> {
        self.read(Collection::Curriculum)?;
        Ok(self.data.subjects.iter().find(|s| s.id == id).cloned())
    }

    async fn list_modules_by_study_plan(&self, study_plan_id: &str) -> Result<Vec<Module>> {
        self.read(Collection::Curriculum)?;
        Ok(self
            .data
            .modules
            .iter()
            .filter(|m| m.study_plan_id == study_plan_id)
            .cloned()
            .collect())
    }

    async fn list_topics_by_module(&self, module_id: &str) -> Result<Vec<Topic>> {
        self.read(Collection::Curriculum)?;
        Ok(self
            .data
            .topics
            .iter()
            .filter(|t| t.module_id == module_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ContentResultStore for MemoryStore {
    async fn list_by_student(&self, student_id: &str) -> Result<Vec<ContentInteractionRecord>> {
        self.read(Collection::Results)?;
        Ok(self.results_where(|r| r.student_id == student_id))
    }

    async fn list_by_student_and_topic(
        &self,
        student_id: &str,
        topic_id: &str,
    ) -> Result<Vec<ContentInteractionRecord>> {
        self.read(Collection::Results)?;
        Ok(self.results_where(|r| r.student_id == student_id && r.topic_id == topic_id))
    }
}

#[async_trait]
impl VirtualTopicStore for MemoryStore {
    async fn list_by_student(&self, student_id: &str) -> Result<Vec<VirtualTopicInstance>> {
        self.read(Collection::VirtualTopics)?;
        Ok(self
            .data
            .virtual_topics
            .iter()
            .filter(|v| v.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn get_by_student_and_topic(
        &self,
        student_id: &str,
        topic_id: &str,
    ) -> Result<Option<VirtualTopicInstance>> {
        self.read(Collection::VirtualTopics)?;
        Ok(self
            .data
            .virtual_topics
            .iter()
            .find(|v| v.student_id == student_id && v.topic_id == topic_id)
            .cloned())
    }
}

#[async_trait]
impl VirtualTopicContentStore for MemoryStore {
    async fn list_by_virtual_topic(&self, virtual_topic_id: &str) -> Result<Vec<VirtualTopicContent>> {
        self.read(Collection::Contents)?;
        let mut contents: Vec<_> = self
            .data
            .virtual_topic_contents
            .iter()
            .filter(|c| c.virtual_topic_id == virtual_topic_id)
            .cloned()
            .collect();
        contents.sort_by_key(|c| c.order);
        Ok(contents)
    }
}

#[async_trait]
impl CognitiveProfileStore for MemoryStore {
    async fn get_by_student(&self, student_id: &str) -> Result<Option<CognitiveProfile>> {
        self.read(Collection::Profiles)?;
        let mut matches = self.data.profiles.iter().filter(|p| p.user_id == student_id);
        let first = matches.next().cloned();
        let extra = matches.count();
        if extra > 0 {
            return Err(StoreError::Corrupt {
                collection: "profiles".into(),
                message: format!("{} profiles for user {student_id}", extra + 1),
            }
            .into());
        }
        Ok(first)
    }
}

#[async_trait]
impl ClassStore for MemoryStore {
    async fn get_members(&self, class_id: &str, role: &str) -> Result<Vec<ClassMember>> {
        self.read(Collection::Classes)?;
        Ok(self
            .data
            .class_members
            .iter()
            .filter(|m| m.class_id == class_id && m.role == role)
            .map(|m| ClassMember {
                user_id: m.user_id.clone(),
                name: m.name.clone(),
            })
            .collect())
    }

    async fn get_class(&self, class_id: &str) -> Result<Option<Class>> {
        self.read(Collection::Classes)?;
        Ok(self.data.classes.iter().find(|c| c.id == class_id).cloned())
    }
}
