//! Per-student progress aggregation.
//!
//! Builds the Subject -> Module -> Topic tree for one student from their
//! virtual topic instances, joins interaction records onto content items,
//! and derives the activity breakdown and VARK section.

use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;

use crate::engine::AggregatorConfig;
use crate::graph::{resolve_topic_path, TopicPath};
use crate::model::{ContentInteractionRecord, VirtualTopicContent, VirtualTopicInstance};
use crate::snapshot::{
    ModuleProgress, NodeRef, ProgressSnapshot, RecentActivity, SubjectProgress, TopicProgress,
};
use crate::statistics::{
    compute_activity_breakdown, percentage, round1, simple_mean, weighted_mean,
};
use crate::traits::Stores;
use crate::vark::extract_vark_profile;

/// Which canonical topics count towards a computation.
#[derive(Debug, Clone, Default)]
pub enum TopicScope {
    #[default]
    All,
    /// Only topics reachable from an assigned study plan.
    Only(HashSet<String>),
}

impl TopicScope {
    pub fn contains(&self, topic_id: &str) -> bool {
        match self {
            TopicScope::All => true,
            TopicScope::Only(ids) => ids.contains(topic_id),
        }
    }
}

/// Raw inputs for one student, already scoped and ordered newest first.
pub(crate) struct StudentData {
    pub records: Vec<ContentInteractionRecord>,
    pub instances: Vec<VirtualTopicInstance>,
}

pub(crate) async fn load_student_data(
    stores: &Stores,
    config: &AggregatorConfig,
    student_id: &str,
    scope: &TopicScope,
) -> Result<StudentData> {
    let (mut records, mut instances) = futures::try_join!(
        async {
            stores
                .results
                .list_by_student(student_id)
                .await
                .context("failed to list interaction records")
        },
        async {
            stores
                .virtual_topics
                .list_by_student(student_id)
                .await
                .context("failed to list virtual topics")
        },
    )?;

    records.retain(|r| scope.contains(&r.topic_id));
    instances.retain(|i| scope.contains(&i.topic_id));

    // The cap counts in-scope records only.
    records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    if let Some(cap) = config.max_history_records {
        if records.len() > cap {
            tracing::warn!(
                student_id,
                loaded = records.len(),
                cap,
                "interaction history exceeds cap, keeping newest records only"
            );
            records.truncate(cap);
        }
    }

    Ok(StudentData { records, instances })
}

/// Build a student's full snapshot.
pub(crate) async fn student_progress(
    stores: &Stores,
    config: &AggregatorConfig,
    student_id: &str,
) -> Result<ProgressSnapshot> {
    let (data, profile) = futures::try_join!(
        load_student_data(stores, config, student_id, &TopicScope::All),
        async {
            stores
                .profiles
                .get_by_student(student_id)
                .await
                .context("failed to read cognitive profile")
        },
    )?;

    let by_subject = build_subject_tree(stores, &data.instances, &data.records).await?;
    let overall_progress = overall_progress(&by_subject);
    let activity_breakdown = compute_activity_breakdown(&data.records, config.quiz_pass_threshold);
    let recent_activity = data
        .records
        .iter()
        .take(config.recent_activity_limit)
        .map(recent_activity)
        .collect();
    let vark_profile = match profile {
        Some(profile) => extract_vark_profile(&profile)?,
        None => None,
    };

    tracing::debug!(
        student_id,
        subjects = by_subject.len(),
        records = data.records.len(),
        overall_progress,
        "built student progress snapshot"
    );

    Ok(ProgressSnapshot {
        student_id: student_id.to_string(),
        overall_progress,
        by_subject,
        activity_breakdown,
        recent_activity,
        vark_profile,
        generated_at: Utc::now(),
    })
}

/// Topic-count-weighted mean of subject percentages.
pub(crate) fn overall_progress(subjects: &[SubjectProgress]) -> f64 {
    let pairs: Vec<(f64, usize)> = subjects
        .iter()
        .map(|s| (s.progress, s.total_topics))
        .collect();
    weighted_mean(&pairs)
}

fn recent_activity(record: &ContentInteractionRecord) -> RecentActivity {
    RecentActivity {
        topic_id: record.topic_id.clone(),
        content_type: record.content_type.clone(),
        normalization_type: record.normalization_type,
        title: record.title.clone(),
        score: record.score.map(|s| round1(s * 100.0)),
        status: record.status(),
        recorded_at: record.recorded_at,
    }
}

// ---------------------------------------------------------------------------
// Tree construction
// ---------------------------------------------------------------------------

struct ResolvedInstance<'a> {
    instance: &'a VirtualTopicInstance,
    path: TopicPath,
    contents: Vec<VirtualTopicContent>,
}

/// Resolve every instance and assemble the ordered subject tree.
///
/// Instances whose curriculum chain does not resolve are dropped without
/// affecting any other branch.
pub(crate) async fn build_subject_tree(
    stores: &Stores,
    instances: &[VirtualTopicInstance],
    records: &[ContentInteractionRecord],
) -> Result<Vec<SubjectProgress>> {
    let resolved = try_join_all(instances.iter().map(|instance| async move {
        let (path, contents) = futures::try_join!(
            resolve_topic_path(stores.curriculum.as_ref(), &instance.topic_id),
            stores.contents.list_by_virtual_topic(&instance.id),
        )
        .with_context(|| format!("failed to resolve virtual topic {}", instance.id))?;
        Ok::<_, anyhow::Error>(path.map(|path| ResolvedInstance {
            instance,
            path,
            contents,
        }))
    }))
    .await?;

    let joins = ContentJoins::from_records(records);
    Ok(assemble(resolved.into_iter().flatten(), &joins))
}

/// Per-content and per-topic facts derived from the interaction log.
struct ContentJoins<'a> {
    scored_contents: HashSet<&'a str>,
    last_by_topic: HashMap<&'a str, DateTime<Utc>>,
}

impl<'a> ContentJoins<'a> {
    fn from_records(records: &'a [ContentInteractionRecord]) -> Self {
        let mut scored_contents = HashSet::new();
        let mut last_by_topic: HashMap<&str, DateTime<Utc>> = HashMap::new();
        for record in records {
            if record.is_completed() {
                if let Some(content_id) = record.virtual_content_id.as_deref() {
                    scored_contents.insert(content_id);
                }
            }
            let last = last_by_topic
                .entry(record.topic_id.as_str())
                .or_insert(record.recorded_at);
            if record.recorded_at > *last {
                *last = record.recorded_at;
            }
        }
        Self {
            scored_contents,
            last_by_topic,
        }
    }

    fn topic_progress(&self, resolved: &ResolvedInstance<'_>) -> TopicProgress {
        let total = resolved.contents.len();
        let completed = resolved
            .contents
            .iter()
            .filter(|c| self.scored_contents.contains(c.id.as_str()))
            .count();
        TopicProgress {
            topic_id: resolved.instance.topic_id.clone(),
            virtual_topic_id: resolved.instance.id.clone(),
            topic_name: resolved.path.topic.name.clone(),
            progress: percentage(completed, total),
            completed_contents: completed,
            total_contents: total,
            is_completed: total > 0 && completed == total,
            last_activity: self
                .last_by_topic
                .get(resolved.instance.topic_id.as_str())
                .copied(),
        }
    }
}

type ModuleKey = (i32, String, String);

#[derive(Default)]
struct SubjectBucket {
    name: String,
    modules: BTreeMap<ModuleKey, ModuleBucket>,
}

struct ModuleBucket {
    id: String,
    name: String,
    order: i32,
    topics: BTreeMap<(String, String), TopicProgress>,
}

fn assemble<'a>(
    resolved: impl Iterator<Item = ResolvedInstance<'a>>,
    joins: &ContentJoins<'_>,
) -> Vec<SubjectProgress> {
    // Subjects by (name, id); modules by (order, name, id); topics by (name, id).
    let mut subjects: BTreeMap<(String, String), SubjectBucket> = BTreeMap::new();

    for item in resolved {
        let topic = joins.topic_progress(&item);
        let TopicPath {
            module, subject, ..
        } = item.path;

        let bucket = subjects
            .entry((subject.name.clone(), subject.id.clone()))
            .or_insert_with(|| SubjectBucket {
                name: subject.name.clone(),
                ..Default::default()
            });
        let module_bucket = bucket
            .modules
            .entry((module.order, module.name.clone(), module.id.clone()))
            .or_insert_with(|| ModuleBucket {
                id: module.id.clone(),
                name: module.name.clone(),
                order: module.order,
                topics: BTreeMap::new(),
            });

        let topic_key = (topic.topic_name.clone(), topic.topic_id.clone());
        if module_bucket.topics.contains_key(&topic_key) {
            tracing::warn!(
                topic_id = %topic.topic_id,
                virtual_topic_id = %topic.virtual_topic_id,
                "duplicate virtual topic instance for topic, keeping the first"
            );
            continue;
        }
        module_bucket.topics.insert(topic_key, topic);
    }

    subjects
        .into_iter()
        .map(|((_, subject_id), bucket)| finish_subject(subject_id, bucket))
        .collect()
}

fn finish_subject(subject_id: String, bucket: SubjectBucket) -> SubjectProgress {
    let modules: Vec<ModuleProgress> = bucket.modules.into_values().map(finish_module).collect();

    let topic_percentages: Vec<f64> = modules
        .iter()
        .flat_map(|m| m.topics.iter().map(|t| t.progress))
        .collect();
    let completed_topics: usize = modules.iter().map(|m| m.completed_topics).sum();

    let current = modules.iter().find_map(|m| {
        m.topics.iter().find(|t| !t.is_completed).map(|t| {
            (
                NodeRef {
                    id: m.module_id.clone(),
                    name: m.module_name.clone(),
                },
                NodeRef {
                    id: t.topic_id.clone(),
                    name: t.topic_name.clone(),
                },
            )
        })
    });
    let (current_module, current_topic) = match current {
        Some((module, topic)) => (Some(module), Some(topic)),
        None => (None, None),
    };

    SubjectProgress {
        subject_id,
        subject_name: bucket.name,
        progress: simple_mean(&topic_percentages),
        completed_topics,
        total_topics: topic_percentages.len(),
        current_module,
        current_topic,
        modules,
    }
}

fn finish_module(bucket: ModuleBucket) -> ModuleProgress {
    let topics: Vec<TopicProgress> = bucket.topics.into_values().collect();
    let percentages: Vec<f64> = topics.iter().map(|t| t.progress).collect();
    ModuleProgress {
        module_id: bucket.id,
        module_name: bucket.name,
        order: bucket.order,
        progress: simple_mean(&percentages),
        completed_topics: topics.iter().filter(|t| t.is_completed).count(),
        total_topics: topics.len(),
        topics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(progress: f64, total_topics: usize) -> SubjectProgress {
        SubjectProgress {
            subject_id: "s".into(),
            subject_name: "S".into(),
            progress,
            completed_topics: 0,
            total_topics,
            current_module: None,
            current_topic: None,
            modules: vec![],
        }
    }

    #[test]
    fn overall_is_topic_weighted() {
        assert_eq!(overall_progress(&[subject(75.0, 2), subject(0.0, 1)]), 50.0);
        assert_eq!(overall_progress(&[]), 0.0);
    }

    #[test]
    fn scope_membership() {
        assert!(TopicScope::All.contains("anything"));
        let scope = TopicScope::Only(["t1".to_string()].into_iter().collect());
        assert!(scope.contains("t1"));
        assert!(!scope.contains("t2"));
    }
}
