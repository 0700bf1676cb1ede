use crate::db::log::{LogEntry, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use unicode_width::UnicodeWidthStr;

/// Widest operation column before truncation.
const OP_MAX_WIDTH: usize = 60;

/// ANSI colour for each audited operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "checkin" => Colour::Green,
        "confirm_location" => Colour::Yellow,
        "issue_link" => Colour::Blue,
        "create_event" => Colour::RGB(255, 153, 51),
        "migration_applied" => Colour::Purple,
        _ => Colour::White,
    }
}

fn op_target(entry: &LogEntry) -> String {
    if entry.target.is_empty() {
        entry.operation.clone()
    } else {
        format!("{} ({})", entry.operation, entry.target)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let op_w = entries
            .iter()
            .map(|e| op_target(e).width())
            .max()
            .unwrap_or(10)
            .min(OP_MAX_WIDTH);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for entry in &entries {
            let visible = truncate(&op_target(entry), OP_MAX_WIDTH);
            let padding = " ".repeat(op_w.saturating_sub(visible.width()));

            // only the operation word is coloured
            let color = color_for_operation(&entry.operation);
            let colored = match visible.split_once(' ') {
                Some((op, rest)) => format!("{} {}", color.paint(op), rest),
                None => color.paint(visible.as_str()).to_string(),
            };

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                entry.id,
                entry.date,
                colored,
                padding,
                entry.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
