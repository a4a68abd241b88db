//! The `studypulse student` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use studypulse_core::snapshot::ProgressSnapshot;

use super::{percent, print_json, timestamp, DataArgs, OutputFormat};

pub async fn execute(student_id: String, data: DataArgs) -> Result<()> {
    let (service, format) = data.open()?;
    let snapshot = service.get_student_progress(&student_id).await;

    match format {
        OutputFormat::Json => print_json(&snapshot)?,
        OutputFormat::Table => print_summary(&snapshot),
    }

    Ok(())
}

fn print_summary(snapshot: &ProgressSnapshot) {
    println!(
        "Student {}: {} overall",
        snapshot.student_id,
        percent(snapshot.overall_progress)
    );

    let mut subjects = Table::new();
    subjects.set_header(vec![
        "Subject",
        "Progress",
        "Topics",
        "Current module",
        "Current topic",
    ]);
    for subject in &snapshot.by_subject {
        subjects.add_row(vec![
            Cell::new(&subject.subject_name),
            Cell::new(percent(subject.progress)),
            Cell::new(format!(
                "{}/{}",
                subject.completed_topics, subject.total_topics
            )),
            Cell::new(
                subject
                    .current_module
                    .as_ref()
                    .map_or("-", |m| m.name.as_str()),
            ),
            Cell::new(
                subject
                    .current_topic
                    .as_ref()
                    .map_or("-", |t| t.name.as_str()),
            ),
        ]);
    }
    println!("{subjects}");

    let breakdown = &snapshot.activity_breakdown;
    let mut activities = Table::new();
    activities.set_header(vec!["Activity", "Completed", "Total", "Rate"]);
    activities.add_row(vec![
        Cell::new("Quizzes passed"),
        Cell::new(breakdown.quizzes.passed),
        Cell::new(breakdown.quizzes.total),
        Cell::new(percent(breakdown.quizzes.percentage)),
    ]);
    for (label, stats) in [
        ("Interactive", &breakdown.interactive),
        ("Slide views", &breakdown.slide_views),
        ("Other", &breakdown.other),
    ] {
        activities.add_row(vec![
            Cell::new(label),
            Cell::new(stats.completed),
            Cell::new(stats.total),
            Cell::new(percent(stats.percentage)),
        ]);
    }
    println!("{activities}");

    if let Some(latest) = snapshot.recent_activity.first() {
        println!(
            "Last activity: {} ({})",
            timestamp(Some(latest.recorded_at)),
            latest.topic_id
        );
    }
    if let Some(vark) = &snapshot.vark_profile {
        println!(
            "VARK: V {:.2} A {:.2} R {:.2} K {:.2}",
            vark.visual, vark.auditory, vark.reading_writing, vark.kinesthetic
        );
    }
}
