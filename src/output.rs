use clap::ValueEnum;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{Goal, Profile, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Pretty,
    Minimal,
}

/// First 8 hex chars; enough to resolve by prefix in day-to-day use.
pub fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

pub fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() > max_len {
        let truncated: String = title.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    } else {
        title.to_string()
    }
}

fn status_label(task: &Task) -> &'static str {
    if task.done { "done" } else { "pending" }
}

pub fn print_task(task: &Task, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(&task)?),
        Format::Pretty => {
            println!("[{}] {} ({})", short_id(task.id), task.title, status_label(task));
            if let Some(ref note) = task.note {
                println!("  {}", note);
            }
            if let Some(due) = task.due_date {
                println!("  due: {}", due);
            }
            if let Some(mask) = task.repeat_mask {
                println!("  repeat: {}", mask);
            }
            if let Some(goal) = task.goal_id {
                println!("  goal: {}", short_id(goal));
            }
        }
        Format::Minimal => {
            println!(
                "{:8} {:20} {:10} {:10} {}",
                short_id(task.id),
                truncate_title(&task.title, 20),
                task.due_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                task.repeat_mask.map(|m| m.to_string()).unwrap_or_else(|| "-".into()),
                status_label(task)
            );
        }
    }
    Ok(())
}

pub fn print_tasks(tasks: &[Task], format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(tasks)?),
        Format::Pretty => {
            for task in tasks {
                print_task(task, Format::Pretty)?;
                println!();
            }
        }
        Format::Minimal => {
            println!(
                "{:8} {:20} {:10} {:10} STATUS",
                "ID", "TITLE", "DUE", "REPEAT"
            );
            println!("{}", "-".repeat(60));
            for task in tasks {
                print_task(task, Format::Minimal)?;
            }
        }
    }
    Ok(())
}

pub fn print_goal(goal: &Goal, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(&goal)?),
        Format::Pretty => {
            println!(
                "[{}] {} ({}) {}% ({}/{})",
                short_id(goal.id),
                goal.title,
                goal.scope,
                goal.progress_percent(),
                goal.achieved_count,
                goal.target_count
            );
            match (goal.start_date, goal.end_date) {
                (Some(start), Some(end)) => println!("  {} .. {}", start, end),
                (Some(start), None) => println!("  from {}", start),
                (None, Some(end)) => println!("  until {}", end),
                (None, None) => {}
            }
        }
        Format::Minimal => {
            println!(
                "{:8} {:20} {:6} {:>4}% {:>3}/{}",
                short_id(goal.id),
                truncate_title(&goal.title, 20),
                goal.scope,
                goal.progress_percent(),
                goal.achieved_count,
                goal.target_count
            );
        }
    }
    Ok(())
}

pub fn print_goals(goals: &[Goal], format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(goals)?),
        Format::Pretty => {
            for goal in goals {
                print_goal(goal, Format::Pretty)?;
                println!();
            }
        }
        Format::Minimal => {
            println!("{:8} {:20} {:6} {:>5} PROGRESS", "ID", "TITLE", "SCOPE", "PCT");
            println!("{}", "-".repeat(55));
            for goal in goals {
                print_goal(goal, Format::Minimal)?;
            }
        }
    }
    Ok(())
}

pub fn print_profile(profile: &Profile, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "owner_id": profile.owner_id,
                    "xp": profile.xp,
                    "level": profile.level(),
                    "xp_in_level": profile.xp_in_level(),
                })
            );
        }
        Format::Pretty | Format::Minimal => {
            println!(
                "Lv.{} | {} XP total | {}/100 into this level",
                profile.level(),
                profile.xp,
                profile.xp_in_level()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_title("short", 20), "short");
        assert_eq!(truncate_title("a very long task title", 10), "a very ...");
    }

    #[test]
    fn short_id_is_eight_chars() {
        let id = Uuid::new_v4();
        assert_eq!(short_id(id).len(), 8);
        assert!(id.to_string().starts_with(&short_id(id)));
    }
}
