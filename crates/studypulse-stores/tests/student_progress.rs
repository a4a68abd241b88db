//! Student snapshot tests over the in-memory store.

mod common;

use common::*;
use studypulse_core::model::{LearningStyle, NormalizationType, VarkAxis};
use studypulse_core::snapshot::ProgressSnapshot;
use studypulse_core::{AggregatorConfig, ProgressService};
use studypulse_stores::{Collection, Dataset, MemoryStore};

fn assert_empty(snapshot: &ProgressSnapshot, student_id: &str) {
    let mut expected = ProgressSnapshot::empty(student_id);
    expected.generated_at = snapshot.generated_at;
    assert_eq!(snapshot, &expected);
}

#[tokio::test]
async fn scenario_a_subject_and_overall_progress() {
    let snapshot = service(scenario_a()).get_student_progress("s1").await;

    assert_eq!(snapshot.student_id, "s1");
    assert_eq!(snapshot.by_subject.len(), 2);

    let x = &snapshot.by_subject[0];
    assert_eq!(x.subject_id, "x");
    assert_eq!(x.progress, 75.0);
    assert_eq!(x.completed_topics, 1);
    assert_eq!(x.total_topics, 2);
    assert_eq!(x.current_module.as_ref().unwrap().id, "mx");
    assert_eq!(x.current_topic.as_ref().unwrap().id, "t2");

    let topics = &x.modules[0].topics;
    assert_eq!(topics[0].topic_id, "t1");
    assert_eq!(topics[0].progress, 100.0);
    assert!(topics[0].is_completed);
    assert_eq!(topics[1].progress, 50.0);
    assert_eq!(topics[1].completed_contents, 2);
    assert_eq!(topics[1].total_contents, 4);
    assert!(!topics[1].is_completed);

    let y = &snapshot.by_subject[1];
    assert_eq!(y.progress, 0.0);
    assert_eq!(y.total_topics, 1);
    assert_eq!(y.current_topic.as_ref().unwrap().id, "t3");

    assert_eq!(snapshot.overall_progress, 50.0);
}

#[tokio::test]
async fn overall_progress_weights_subjects_by_topic_count() {
    let snapshot = service(scenario_a()).get_student_progress("s1").await;
    let weighted: f64 = snapshot
        .by_subject
        .iter()
        .map(|s| s.progress * s.total_topics as f64)
        .sum();
    let topics: usize = snapshot.by_subject.iter().map(|s| s.total_topics).sum();
    let expected = (weighted / topics as f64 * 10.0).round() / 10.0;
    assert_eq!(snapshot.overall_progress, expected);
    // A flat average of subjects would give 37.5.
    assert_ne!(snapshot.overall_progress, 37.5);
}

#[tokio::test]
async fn activity_breakdown_and_recent_activity() {
    let snapshot = service(scenario_a()).get_student_progress("s1").await;
    let breakdown = &snapshot.activity_breakdown;
    assert_eq!(breakdown.interactive.total, 7);
    assert_eq!(breakdown.interactive.completed, 6);
    assert_eq!(breakdown.interactive.percentage, 85.7);
    assert_eq!(breakdown.total_activities, 7);
    assert_eq!(breakdown.quizzes.total, 0);

    assert_eq!(snapshot.recent_activity.len(), 7);
    assert_eq!(snapshot.recent_activity[0].topic_id, "t3");
    assert_eq!(snapshot.recent_activity[0].score, None);
}

#[tokio::test]
async fn topic_completion_ratio_and_empty_topics() {
    let mut data = Dataset::default();
    curriculum(
        &mut data,
        ("bio", "Biology"),
        "plan-bio",
        ("cells", "Cells", 0),
        &[("t-a", "Anatomy"), ("t-b", "Botany")],
    );
    let a = instance(&mut data, "s1", "t-a", 3, "slide");
    instance(&mut data, "s1", "t-b", 0, "slide");
    complete(&mut data, "s1", "t-a", &a, 1);

    let snapshot = service(data).get_student_progress("s1").await;
    let topics = &snapshot.by_subject[0].modules[0].topics;
    assert_eq!(topics[0].progress, 33.3);
    assert_eq!(topics[1].total_contents, 0);
    assert_eq!(topics[1].progress, 0.0);
    assert!(!topics[1].is_completed);
    assert_eq!(snapshot.by_subject[0].completed_topics, 0);
}

#[tokio::test]
async fn unscored_records_do_not_complete_content() {
    let mut data = Dataset::default();
    curriculum(
        &mut data,
        ("art", "Art"),
        "plan-art",
        ("color", "Color", 0),
        &[("t-c", "Contrast")],
    );
    let items = instance(&mut data, "s1", "t-c", 1, "video");
    result(
        &mut data,
        "s1",
        "t-c",
        Some(&items[0]),
        NormalizationType::Default,
        None,
        1,
    );
    let snapshot = service(data).get_student_progress("s1").await;
    let topic = &snapshot.by_subject[0].modules[0].topics[0];
    assert_eq!(topic.progress, 0.0);
    assert_eq!(topic.last_activity, Some(at(1)));
}

#[tokio::test]
async fn current_topic_follows_module_order_then_topic_name() {
    let mut data = Dataset::default();
    curriculum(
        &mut data,
        ("geo", "Geography"),
        "plan-geo",
        ("late", "A late module", 2),
        &[("t-late", "Aardvarks")],
    );
    curriculum(
        &mut data,
        ("geo", "Geography"),
        "plan-geo",
        ("early", "Z early module", 1),
        &[("t-z", "Zebras"), ("t-m", "Mountains")],
    );
    instance(&mut data, "s1", "t-late", 1, "slide");
    instance(&mut data, "s1", "t-z", 1, "slide");
    let m = instance(&mut data, "s1", "t-m", 1, "slide");
    complete(&mut data, "s1", "t-m", &m, 1);

    let snapshot = service(data).get_student_progress("s1").await;
    let geo = &snapshot.by_subject[0];
    let module_ids: Vec<_> = geo.modules.iter().map(|m| m.module_id.as_str()).collect();
    assert_eq!(module_ids, ["early", "late"]);
    let topic_ids: Vec<_> = geo.modules[0]
        .topics
        .iter()
        .map(|t| t.topic_id.as_str())
        .collect();
    assert_eq!(topic_ids, ["t-m", "t-z"]);
    assert_eq!(geo.current_module.as_ref().unwrap().id, "early");
    assert_eq!(geo.current_topic.as_ref().unwrap().id, "t-z");
}

#[tokio::test]
async fn fully_complete_subject_has_no_current_pointer() {
    let mut data = Dataset::default();
    curriculum(
        &mut data,
        ("chem", "Chemistry"),
        "plan-chem",
        ("atoms", "Atoms", 0),
        &[("t-1", "Bonds")],
    );
    let items = instance(&mut data, "s1", "t-1", 2, "slide");
    complete(&mut data, "s1", "t-1", &items, 2);

    let snapshot = service(data).get_student_progress("s1").await;
    let chem = &snapshot.by_subject[0];
    assert_eq!(chem.progress, 100.0);
    assert!(chem.current_module.is_none());
    assert!(chem.current_topic.is_none());
}

#[tokio::test]
async fn dangling_references_only_skip_their_branch() {
    let baseline = service(scenario_a()).get_student_progress("s1").await;

    let mut data = scenario_a();
    // Topic missing from the graph entirely.
    instance(&mut data, "s1", "ghost", 2, "slide");
    // Topic whose module points to a study plan that does not exist.
    data.modules.push(studypulse_core::model::Module {
        id: "orphan-module".into(),
        study_plan_id: "no-such-plan".into(),
        name: "Orphan".into(),
        order: 0,
    });
    data.topics.push(studypulse_core::model::Topic {
        id: "orphan-topic".into(),
        module_id: "orphan-module".into(),
        name: "Orphan topic".into(),
    });
    instance(&mut data, "s1", "orphan-topic", 1, "slide");

    let snapshot = service(data).get_student_progress("s1").await;
    assert_eq!(snapshot.by_subject, baseline.by_subject);
    assert_eq!(snapshot.overall_progress, 50.0);
}

#[tokio::test]
async fn quiz_breakdown_scenario_b() {
    let mut data = Dataset::default();
    for (i, score) in [Some(0.9), Some(0.5), Some(0.7), None, Some(0.6)]
        .into_iter()
        .enumerate()
    {
        result(
            &mut data,
            "s2",
            "t1",
            None,
            NormalizationType::Quiz,
            score,
            i as i64,
        );
    }
    let snapshot = service(data).get_student_progress("s2").await;
    let quizzes = &snapshot.activity_breakdown.quizzes;
    assert_eq!(quizzes.total, 5);
    assert_eq!(quizzes.passed, 3);
    assert_eq!(quizzes.average_score, Some(67.5));
    assert!(snapshot.by_subject.is_empty());
    assert_eq!(snapshot.overall_progress, 0.0);
}

#[tokio::test]
async fn custom_quiz_threshold_is_honored() {
    let mut data = Dataset::default();
    result(&mut data, "s2", "t1", None, NormalizationType::Quiz, Some(0.65), 0);
    let config = AggregatorConfig {
        quiz_pass_threshold: 0.7,
        ..Default::default()
    };
    let service = ProgressService::new(MemoryStore::new(data).into_stores(), config);
    let snapshot = service.get_student_progress("s2").await;
    assert_eq!(snapshot.activity_breakdown.quizzes.passed, 0);
}

#[tokio::test]
async fn vark_falls_back_to_legacy_blob() {
    let mut data = scenario_a();
    profile(
        &mut data,
        "s1",
        None,
        Some(r#"{"profile":{"visual":0.2,"auditory":0.6,"readingWriting":0.1,"kinesthetic":0.3}}"#),
    );
    let snapshot = service(data).get_student_progress("s1").await;
    let vark = snapshot.vark_profile.expect("vark profile from legacy blob");
    assert_eq!(vark.auditory, 0.6);
    assert_eq!(vark.primary_style, Some(VarkAxis::Auditory));
}

#[tokio::test]
async fn vark_prefers_structured_profile() {
    let mut data = scenario_a();
    profile(
        &mut data,
        "s1",
        Some(LearningStyle {
            visual: 0.9,
            auditory: 0.1,
            reading_writing: 0.2,
            kinesthetic: 0.3,
        }),
        None,
    );
    let snapshot = service(data).get_student_progress("s1").await;
    assert_eq!(
        snapshot.vark_profile.unwrap().primary_style,
        Some(VarkAxis::Visual)
    );
}

#[tokio::test]
async fn repeated_calls_are_identical() {
    let service = service(scenario_a());
    let first = service.get_student_progress("s1").await;
    let mut second = service.get_student_progress("s1").await;
    second.generated_at = first.generated_at;
    assert_eq!(first, second);
}

#[tokio::test]
async fn unknown_student_gets_empty_snapshot() {
    let snapshot = service(scenario_a()).get_student_progress("nobody").await;
    assert_empty(&snapshot, "nobody");
}

#[tokio::test]
async fn store_failure_returns_empty_snapshot() {
    for collection in [
        Collection::Results,
        Collection::VirtualTopics,
        Collection::Contents,
        Collection::Curriculum,
        Collection::Profiles,
    ] {
        let stores = MemoryStore::new(scenario_a()).failing(collection).into_stores();
        let service = ProgressService::new(stores, AggregatorConfig::default());
        let snapshot = service.get_student_progress("s1").await;
        assert_empty(&snapshot, "s1");
    }
}

#[tokio::test]
async fn undecodable_profile_blob_returns_empty_snapshot() {
    let mut data = scenario_a();
    profile(&mut data, "s1", None, Some("{broken"));
    let snapshot = service(data).get_student_progress("s1").await;
    assert_empty(&snapshot, "s1");
}

#[tokio::test]
async fn history_cap_keeps_newest_records() {
    let config = AggregatorConfig {
        max_history_records: Some(2),
        recent_activity_limit: 1,
        ..Default::default()
    };
    let service = ProgressService::new(MemoryStore::new(scenario_a()).into_stores(), config);
    let snapshot = service.get_student_progress("s1").await;
    assert_eq!(snapshot.activity_breakdown.total_activities, 2);
    assert_eq!(snapshot.recent_activity.len(), 1);
    assert_eq!(snapshot.recent_activity[0].recorded_at, at(50));
}

#[tokio::test]
async fn snapshot_json_uses_camel_case_keys() {
    let snapshot = service(scenario_a()).get_student_progress("s1").await;
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["overallProgress"], 50.0);
    assert_eq!(json["bySubject"][0]["completedTopics"], 1);
    assert_eq!(json["bySubject"][0]["currentTopic"]["name"], "Beta");
    assert!(json["varkProfile"].is_null());
}
