//! The `studypulse class` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use studypulse_core::snapshot::ClassProgressSnapshot;

use super::{percent, print_json, timestamp, DataArgs, OutputFormat};

pub async fn execute(class_id: String, data: DataArgs) -> Result<()> {
    let (service, format) = data.open()?;
    let snapshot = service.get_class_students_progress(&class_id).await;

    match format {
        OutputFormat::Json => print_json(&snapshot)?,
        OutputFormat::Table => print_roster(&snapshot),
    }

    Ok(())
}

fn print_roster(snapshot: &ClassProgressSnapshot) {
    println!(
        "Class {} ({}): {} students",
        snapshot.class_name, snapshot.class_id, snapshot.total_students
    );

    let mut table = Table::new();
    table.set_header(vec![
        "Student",
        "Progress",
        "Activities",
        "Current topic",
        "Last activity",
    ]);
    for row in &snapshot.students {
        table.add_row(vec![
            Cell::new(row.student_name.as_deref().unwrap_or(&row.student_id)),
            Cell::new(percent(row.overall_progress)),
            Cell::new(format!(
                "{}/{}",
                row.activities_completed, row.activities_total
            )),
            Cell::new(row.current_topic.as_ref().map_or("-", |t| t.name.as_str())),
            Cell::new(timestamp(row.last_activity)),
        ]);
    }
    println!("{table}");

    println!("Class average: {}", percent(snapshot.class_average));
}
