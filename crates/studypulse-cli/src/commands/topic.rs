//! The `studypulse topic` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use studypulse_core::snapshot::TopicProgressDetail;

use super::{
    optional_percent, percent, print_json, status_label, timestamp, DataArgs, OutputFormat,
};

pub async fn execute(student_id: String, topic_id: String, data: DataArgs) -> Result<()> {
    let (service, format) = data.open()?;
    let detail = service.get_topic_progress(&student_id, &topic_id).await;

    match format {
        OutputFormat::Json => print_json(&detail)?,
        OutputFormat::Table => print_detail(&detail),
    }

    Ok(())
}

fn print_detail(detail: &TopicProgressDetail) {
    let name = if detail.topic_name.is_empty() {
        detail.topic_id.as_str()
    } else {
        detail.topic_name.as_str()
    };

    if detail.not_started {
        println!("{name}: not started by {}", detail.student_id);
        return;
    }

    println!(
        "{name}: {} ({}/{} completed, average score {})",
        percent(detail.progress),
        detail.completed_count,
        detail.total_count,
        optional_percent(detail.average_score)
    );

    let mut table = Table::new();
    table.set_header(vec![
        "#",
        "Title",
        "Type",
        "Status",
        "Score",
        "Interactive",
        "Recorded",
    ]);
    for item in &detail.contents {
        table.add_row(vec![
            Cell::new(item.order),
            Cell::new(&item.title),
            Cell::new(&item.content_type),
            Cell::new(status_label(item.status)),
            Cell::new(optional_percent(item.score)),
            Cell::new(if item.is_interactive { "yes" } else { "no" }),
            Cell::new(timestamp(item.recorded_at)),
        ]);
    }
    println!("{table}");
}
