//! Dataset builders shared by the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};

use studypulse_core::model::{
    Class, CognitiveProfile, ContentInteractionRecord, ContentMetadata, LearningStyle, Module,
    NormalizationType, StudyPlan, Subject, Topic, VirtualTopicContent, VirtualTopicInstance,
};
use studypulse_core::{AggregatorConfig, ProgressService};
use studypulse_stores::{ClassMembership, Dataset, MemoryStore};

pub fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).unwrap() + Duration::minutes(minute)
}

/// Add a subject with one study plan and one module holding `topics`.
pub fn curriculum(
    data: &mut Dataset,
    subject: (&str, &str),
    plan_id: &str,
    module: (&str, &str, i32),
    topics: &[(&str, &str)],
) {
    if !data.subjects.iter().any(|s| s.id == subject.0) {
        data.subjects.push(Subject {
            id: subject.0.into(),
            name: subject.1.into(),
        });
    }
    if !data.study_plans.iter().any(|p| p.id == plan_id) {
        data.study_plans.push(StudyPlan {
            id: plan_id.into(),
            subject_id: subject.0.into(),
            class_id: None,
            name: format!("{} plan", subject.1),
        });
    }
    data.modules.push(Module {
        id: module.0.into(),
        study_plan_id: plan_id.into(),
        name: module.1.into(),
        order: module.2,
    });
    for (id, name) in topics {
        data.topics.push(Topic {
            id: (*id).into(),
            module_id: module.0.into(),
            name: (*name).into(),
        });
    }
}

/// Add a virtual topic with `contents` items of type `content_type`.
/// Returns the ids of the created content items.
pub fn instance(
    data: &mut Dataset,
    student: &str,
    topic: &str,
    contents: usize,
    content_type: &str,
) -> Vec<String> {
    let vt_id = format!("vt-{student}-{topic}");
    data.virtual_topics.push(VirtualTopicInstance {
        id: vt_id.clone(),
        student_id: student.into(),
        topic_id: topic.into(),
        topic_name: topic.to_uppercase(),
    });
    (0..contents)
        .map(|i| {
            let id = format!("{vt_id}-c{i}");
            data.virtual_topic_contents.push(VirtualTopicContent {
                id: id.clone(),
                virtual_topic_id: vt_id.clone(),
                content_type: content_type.into(),
                order: i as u32,
                title: format!("Item {i}"),
                metadata: ContentMetadata::default(),
            });
            id
        })
        .collect()
}

pub fn result(
    data: &mut Dataset,
    student: &str,
    topic: &str,
    content: Option<&str>,
    ty: NormalizationType,
    score: Option<f64>,
    minute: i64,
) {
    data.results.push(ContentInteractionRecord {
        student_id: student.into(),
        topic_id: topic.into(),
        virtual_content_id: content.map(str::to_string),
        content_type: ty.to_string(),
        normalization_type: ty,
        score,
        recorded_at: at(minute),
        title: None,
    });
}

/// Score the first `scored` items of `contents` for `student`.
pub fn complete(data: &mut Dataset, student: &str, topic: &str, contents: &[String], scored: usize) {
    for (i, id) in contents.iter().take(scored).enumerate() {
        result(
            data,
            student,
            topic,
            Some(id),
            NormalizationType::Interactive,
            Some(1.0),
            i as i64,
        );
    }
}

pub fn class(data: &mut Dataset, id: &str, name: &str, plan: Option<&str>, students: &[&str]) {
    data.classes.push(Class {
        id: id.into(),
        name: name.into(),
        study_plan_id: plan.map(str::to_string),
    });
    for student in students {
        data.class_members.push(ClassMembership {
            class_id: id.into(),
            user_id: (*student).into(),
            role: "student".into(),
            name: Some(student.to_uppercase()),
        });
    }
}

pub fn profile(
    data: &mut Dataset,
    user: &str,
    style: Option<LearningStyle>,
    legacy_blob: Option<&str>,
) {
    data.profiles.push(CognitiveProfile {
        user_id: user.into(),
        learning_style: style,
        legacy_blob: legacy_blob.map(str::to_string),
        updated_at: at(0),
    });
}

/// Scenario A from the design notes: subject X with T1 (4/4) and T2 (2/4),
/// subject Y with T3 (0/3).
pub fn scenario_a() -> Dataset {
    let mut data = Dataset::default();
    curriculum(
        &mut data,
        ("x", "Subject X"),
        "plan-x",
        ("mx", "Module X", 1),
        &[("t1", "Alpha"), ("t2", "Beta")],
    );
    curriculum(
        &mut data,
        ("y", "Subject Y"),
        "plan-y",
        ("my", "Module Y", 1),
        &[("t3", "Gamma")],
    );

    let t1 = instance(&mut data, "s1", "t1", 4, "slide");
    let t2 = instance(&mut data, "s1", "t2", 4, "slide");
    let t3 = instance(&mut data, "s1", "t3", 3, "slide");
    complete(&mut data, "s1", "t1", &t1, 4);
    complete(&mut data, "s1", "t2", &t2, 2);
    result(
        &mut data,
        "s1",
        "t3",
        Some(&t3[0]),
        NormalizationType::Interactive,
        None,
        50,
    );
    data
}

pub fn service(data: Dataset) -> ProgressService {
    ProgressService::new(MemoryStore::new(data).into_stores(), AggregatorConfig::default())
}
