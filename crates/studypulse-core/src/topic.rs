//! Fine-grained progress for one (student, topic) pair.

use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::model::{ContentInteractionRecord, ContentStatus, VirtualTopicContent};
use crate::snapshot::{ContentProgress, TopicProgressDetail};
use crate::statistics::{mean_score_percent, percentage, round1};
use crate::traits::Stores;

/// Content types that are always interactive.
pub const INTERACTIVE_CONTENT_TYPES: &[&str] = &[
    "game",
    "simulation",
    "interactive",
    "interactive_exercise",
    "virtual_lab",
    "mini_game",
    "challenge",
];

/// One independent signal that a content item is interactive.
pub type InteractivitySignal = fn(&VirtualTopicContent) -> bool;

/// Every signal honored by [`is_interactive`]; any one of them suffices.
pub const INTERACTIVITY_SIGNALS: &[InteractivitySignal] = &[
    has_interactive_content_type,
    has_template_render,
    has_interactive_attachment,
];

pub fn is_interactive(content: &VirtualTopicContent) -> bool {
    INTERACTIVITY_SIGNALS.iter().any(|signal| signal(content))
}

fn has_interactive_content_type(content: &VirtualTopicContent) -> bool {
    let content_type = content.content_type.to_lowercase();
    INTERACTIVE_CONTENT_TYPES.contains(&content_type.as_str())
}

fn has_template_render(content: &VirtualTopicContent) -> bool {
    content.metadata.render.as_ref().is_some_and(|render| {
        render.template_id.as_deref().is_some_and(|id| !id.is_empty())
            || render
                .engine
                .as_deref()
                .is_some_and(|engine| engine.eq_ignore_ascii_case("template"))
    })
}

fn has_interactive_attachment(content: &VirtualTopicContent) -> bool {
    content.metadata.attachment.as_ref().is_some_and(|attachment| {
        attachment.interactive
            || attachment
                .kind
                .as_deref()
                .is_some_and(|kind| kind.eq_ignore_ascii_case("interactive_template"))
            || attachment.template_id.as_deref().is_some_and(|id| !id.is_empty())
    })
}

/// Build the detail view for one topic.
pub(crate) async fn topic_progress(
    stores: &Stores,
    student_id: &str,
    topic_id: &str,
) -> Result<TopicProgressDetail> {
    let instance = stores
        .virtual_topics
        .get_by_student_and_topic(student_id, topic_id)
        .await
        .context("failed to look up virtual topic")?;

    let Some(instance) = instance else {
        let topic_name = stores
            .curriculum
            .get_topic(topic_id)
            .await
            .context("failed to read canonical topic")?
            .map(|t| t.name)
            .unwrap_or_default();
        return Ok(TopicProgressDetail::not_started(student_id, topic_id, topic_name));
    };

    let (mut contents, records) = futures::try_join!(
        async {
            stores
                .contents
                .list_by_virtual_topic(&instance.id)
                .await
                .context("failed to list topic contents")
        },
        async {
            stores
                .results
                .list_by_student_and_topic(student_id, topic_id)
                .await
                .context("failed to list topic interaction records")
        },
    )?;
    contents.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));

    let matched = match_records(&records);
    let items: Vec<ContentProgress> = contents
        .iter()
        .map(|content| content_progress(content, matched.get(content.id.as_str()).copied()))
        .collect();

    let scores: Vec<f64> = contents
        .iter()
        .filter_map(|c| matched.get(c.id.as_str()).and_then(|r| r.score))
        .collect();
    let completed_count = scores.len();
    let total_count = items.len();
    let last_activity = records.iter().map(|r| r.recorded_at).max();

    Ok(TopicProgressDetail {
        student_id: student_id.to_string(),
        topic_id: topic_id.to_string(),
        topic_name: instance.topic_name,
        progress: percentage(completed_count, total_count),
        completed_count,
        total_count,
        average_score: mean_score_percent(&scores),
        contents: items,
        last_activity,
        not_started: false,
    })
}

/// Pick at most one record per content item: the newest scored record if
/// any exists, otherwise the newest unscored one.
fn match_records(records: &[ContentInteractionRecord]) -> HashMap<&str, &ContentInteractionRecord> {
    let mut matched: HashMap<&str, &ContentInteractionRecord> = HashMap::new();
    for record in records {
        let Some(content_id) = record.virtual_content_id.as_deref() else {
            continue;
        };
        match matched.get(content_id).copied() {
            None => {
                matched.insert(content_id, record);
            }
            Some(current) => {
                let upgrade = match (current.is_completed(), record.is_completed()) {
                    (false, true) => true,
                    (true, false) => false,
                    _ => record.recorded_at > current.recorded_at,
                };
                if upgrade {
                    matched.insert(content_id, record);
                }
            }
        }
    }
    matched
}

fn content_progress(
    content: &VirtualTopicContent,
    record: Option<&ContentInteractionRecord>,
) -> ContentProgress {
    ContentProgress {
        content_id: content.id.clone(),
        title: content.title.clone(),
        content_type: content.content_type.clone(),
        order: content.order,
        status: record.map_or(ContentStatus::NotStarted, |r| r.status()),
        score: record.and_then(|r| r.score).map(|s| round1(s * 100.0)),
        is_interactive: is_interactive(content),
        recorded_at: record.map(|r| r.recorded_at),
    }
}
