use crate::cli::commands::open_service;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::attendance::AttendanceRecord;
use crate::utils::table::{Column, Table};
use crate::utils::time::ts_display;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        event_id,
        user,
        json,
    } = cmd
    {
        let service = open_service(cfg)?;

        let (title, records) = match (event_id, user) {
            (Some(id), _) => (format!("Event {}", id), service.list_attendance(*id)?),
            (None, Some(u)) => (format!("Attendee {}", u), service.list_attendance_for_user(u)?),
            (None, None) => return Ok(()),
        };

        if *json {
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(());
        }

        println!("\n=== {} ===", title);
        if records.is_empty() {
            println!("No attendance records.");
            return Ok(());
        }

        let present = records.iter().filter(|r| r.is_present()).count();
        println!("Records: {} | Present: {}\n", records.len(), present);
        print!("{}", render(&records));
    }
    Ok(())
}

fn render(records: &[AttendanceRecord]) -> String {
    let mut table = Table::new(vec![
        Column::new("ID", 5),
        Column::new("EVENT", 6),
        Column::new("CHECK-IN", 19),
        Column::new("ATTENDEE", 14),
        Column::new("STATUS", 8),
        Column::new("DIST(m)", 9),
        Column::new("ACC(m)", 6),
        Column::new("REASON", 0),
    ]);

    for r in records {
        table.add_row(vec![
            r.id.to_string(),
            r.event_id.to_string(),
            ts_display(r.checkin_time),
            r.student_number
                .clone()
                .or_else(|| r.user_id.clone())
                .unwrap_or_else(|| "anonymous".into()),
            r.status.to_db_str().to_string(),
            r.distance_str(),
            r.accuracy_m.to_string(),
            r.rejection_reason.clone().unwrap_or_default(),
        ]);
    }

    table.render()
}
