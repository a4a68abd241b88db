//! Class roster progress.
//!
//! Runs the per-student aggregation for every member holding the student
//! role and rolls the results up into one roster view. When the class has an
//! assigned study plan, only topics reachable from that plan count, both for
//! each row and for the class average.

use anyhow::{Context, Result};
use futures::future::join_all;

use crate::engine::AggregatorConfig;
use crate::graph::plan_topic_ids;
use crate::guard;
use crate::model::ClassMember;
use crate::snapshot::{ClassProgressSnapshot, StudentSummary};
use crate::statistics::simple_mean;
use crate::student::{build_subject_tree, load_student_data, overall_progress, TopicScope};
use crate::traits::Stores;

pub(crate) async fn class_progress(
    stores: &Stores,
    config: &AggregatorConfig,
    class_id: &str,
) -> Result<ClassProgressSnapshot> {
    let (class, members) = futures::try_join!(
        async {
            stores
                .classes
                .get_class(class_id)
                .await
                .context("failed to read class")
        },
        async {
            stores
                .classes
                .get_members(class_id, &config.student_role)
                .await
                .context("failed to list class members")
        },
    )?;

    let Some(class) = class else {
        tracing::warn!(class_id, "class not found, returning empty roster");
        return Ok(ClassProgressSnapshot::empty(class_id));
    };

    let scope = match class.study_plan_id.as_deref() {
        Some(plan_id) => plan_scope(stores, class_id, plan_id).await?,
        None => TopicScope::All,
    };

    let students: Vec<StudentSummary> = join_all(members.iter().map(|member| {
        guard::total(
            "student_summary",
            student_summary(stores, config, member, &scope),
            move || StudentSummary::empty(&member.user_id, member.name.clone()),
        )
    }))
    .await;

    let percentages: Vec<f64> = students.iter().map(|s| s.overall_progress).collect();

    Ok(ClassProgressSnapshot {
        class_id: class_id.to_string(),
        class_name: class.name,
        class_average: simple_mean(&percentages),
        total_students: students.len(),
        students,
    })
}

/// Topics reachable from the class's assigned plan. A plan id that does not
/// resolve is treated as no plan at all.
async fn plan_scope(stores: &Stores, class_id: &str, plan_id: &str) -> Result<TopicScope> {
    let plan = stores
        .curriculum
        .get_study_plan(plan_id)
        .await
        .with_context(|| format!("failed to read study plan {plan_id}"))?;
    if plan.is_none() {
        tracing::warn!(
            class_id,
            plan_id,
            "class assigned missing study plan, counting all topics"
        );
        return Ok(TopicScope::All);
    }

    let topics = plan_topic_ids(stores.curriculum.as_ref(), plan_id)
        .await
        .with_context(|| format!("failed to resolve topics of study plan {plan_id}"))?;
    tracing::debug!(class_id, plan_id, topics = topics.len(), "scoping class to study plan");
    Ok(TopicScope::Only(topics))
}

/// A reduced-detail summary of one student, restricted to `scope`.
async fn student_summary(
    stores: &Stores,
    config: &AggregatorConfig,
    member: &ClassMember,
    scope: &TopicScope,
) -> Result<StudentSummary> {
    let data = load_student_data(stores, config, &member.user_id, scope).await?;
    let subjects = build_subject_tree(stores, &data.instances, &data.records).await?;

    let current = subjects
        .iter()
        .find(|s| s.current_topic.is_some())
        .map(|s| (s.current_module.clone(), s.current_topic.clone()));
    let (current_module, current_topic) = current.unwrap_or((None, None));

    Ok(StudentSummary {
        student_id: member.user_id.clone(),
        student_name: member.name.clone(),
        overall_progress: overall_progress(&subjects),
        current_module,
        current_topic,
        activities_completed: data.records.iter().filter(|r| r.is_completed()).count(),
        activities_total: data.records.len(),
        last_activity: data.records.first().map(|r| r.recorded_at),
    })
}
