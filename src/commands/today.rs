use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime};
use colored::Colorize;

use crate::engine::clock;
use crate::engine::views::{self, Dashboard};
use crate::error::Result;
use crate::facade::Planner;
use crate::model::Task;
use crate::output::{Format, short_id};
use crate::store::workspace::Workspace;

/// Refresh cadence in watch mode; the countdown labels are minute-grained.
const TICK: Duration = Duration::from_secs(60);

pub fn run(watch: bool, format: Format) -> Result<()> {
    let ws = Workspace::discover()?;
    let planner = Planner::from_workspace(&ws)?;

    loop {
        // The only wall-clock read; everything below is pure.
        let now = Local::now();
        let today = now.date_naive();
        let naive_now = now.naive_local();
        let tz = *now.offset();

        let tasks = planner.list_tasks()?;
        let dash = views::dashboard(&tasks, today, tz);

        match format {
            Format::Json => println!("{}", serde_json::to_string(&dash)?),
            _ => render_pretty(&dash, today, naive_now),
        }

        if !watch {
            return Ok(());
        }
        // Wake at the next minute tick, or at midnight so the overdue flip
        // shows up promptly.
        let until_midnight = clock::until_next_midnight(naive_now)
            .to_std()
            .unwrap_or(TICK);
        thread::sleep(until_midnight.min(TICK));
        println!();
    }
}

fn render_pretty(dash: &Dashboard, today: NaiveDate, now: NaiveDateTime) {
    println!(
        "{} {} · {} of {} done",
        "today".bold(),
        today,
        dash.today_completed.len(),
        dash.total_today
    );
    println!(
        "[{}] {}%",
        progress_bar(dash.progress_percent, 20),
        dash.progress_percent
    );

    if !dash.overdue.is_empty() {
        println!();
        println!("{}", "overdue".red().bold());
        for task in &dash.overdue {
            println!("  {}", overdue_line(task, now).red());
        }
    }

    println!();
    println!("{}", "due today".bold());
    if dash.today_pending.is_empty() {
        let note = if dash.total_today == 0 {
            "nothing scheduled for today"
        } else {
            "all of today's quests are done"
        };
        println!("  {}", note.dimmed());
    }
    for task in &dash.today_pending {
        let mut line = format!("[{}] {}", short_id(task.id), task.title);
        if let Some(due) = task.due_date {
            let status = clock::due_status(due, now);
            let label = if status.urgent {
                status.remaining.yellow().to_string()
            } else {
                status.remaining
            };
            line = format!("{line} ({label})");
        }
        println!("  {line}");
    }

    if !dash.today_completed.is_empty() {
        println!();
        println!("{}", "completed today".bold());
        for task in &dash.today_completed {
            println!(
                "  {}",
                format!("[{}] {}", short_id(task.id), task.title).green()
            );
        }
    }
}

fn overdue_line(task: &Task, now: NaiveDateTime) -> String {
    match task.due_date {
        Some(due) => {
            let status = clock::due_status(due, now);
            format!(
                "[{}] {} (due {}, {})",
                short_id(task.id),
                task.title,
                due,
                status.remaining
            )
        }
        None => format!("[{}] {}", short_id(task.id), task.title),
    }
}

fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent as usize * width).div_ceil(100).min(width);
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0, 10), "----------");
        assert_eq!(progress_bar(100, 10), "##########");
        assert_eq!(progress_bar(50, 10), "#####-----");
        // Rounds up so any progress at all is visible.
        assert_eq!(progress_bar(1, 10), "#---------");
    }
}
