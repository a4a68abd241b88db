//! Curriculum path resolution.
//!
//! References in the curriculum are denormalized and may dangle. Resolution
//! is an explicit optional chain: a missing link yields `Ok(None)` for that
//! topic only, while a store failure is an error for the whole call.

use std::collections::HashSet;

use anyhow::Result;
use futures::future::try_join_all;

use crate::model::{Module, StudyPlan, Subject, Topic};
use crate::traits::CurriculumGraph;

/// A fully resolved Topic -> Module -> StudyPlan -> Subject chain.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicPath {
    pub topic: Topic,
    pub module: Module,
    pub study_plan: StudyPlan,
    pub subject: Subject,
}

/// Resolve the chain above `topic_id`, or `None` if any link is missing.
pub async fn resolve_topic_path(
    graph: &dyn CurriculumGraph,
    topic_id: &str,
) -> Result<Option<TopicPath>> {
    let Some(topic) = graph.get_topic(topic_id).await? else {
        tracing::warn!(topic_id, "topic not found in curriculum, skipping");
        return Ok(None);
    };
    let Some(module) = graph.get_module(&topic.module_id).await? else {
        tracing::warn!(
            topic_id,
            module_id = %topic.module_id,
            "topic points to a missing module, skipping"
        );
        return Ok(None);
    };
    let Some(study_plan) = graph.get_study_plan(&module.study_plan_id).await? else {
        tracing::warn!(
            topic_id,
            module_id = %module.id,
            study_plan_id = %module.study_plan_id,
            "module points to a missing study plan, skipping"
        );
        return Ok(None);
    };
    let Some(subject) = graph.get_subject(&study_plan.subject_id).await? else {
        tracing::warn!(
            topic_id,
            study_plan_id = %study_plan.id,
            subject_id = %study_plan.subject_id,
            "study plan points to a missing subject, skipping"
        );
        return Ok(None);
    };

    Ok(Some(TopicPath {
        topic,
        module,
        study_plan,
        subject,
    }))
}

/// Every topic id reachable from a study plan's modules.
pub async fn plan_topic_ids(graph: &dyn CurriculumGraph, study_plan_id: &str) -> Result<HashSet<String>> {
    let modules = graph.list_modules_by_study_plan(study_plan_id).await?;
    let per_module = try_join_all(
        modules
            .iter()
            .map(|module| graph.list_topics_by_module(&module.id)),
    )
    .await?;

    Ok(per_module
        .into_iter()
        .flatten()
        .map(|topic| topic.id)
        .collect())
}
