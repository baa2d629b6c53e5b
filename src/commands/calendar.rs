use chrono::{Datelike, Local};
use colored::Colorize;

use crate::commands::{parse_date, parse_month};
use crate::engine::views::{self, DayCell, DayStatus};
use crate::error::Result;
use crate::facade::Planner;
use crate::output::{self, Format};
use crate::store::workspace::Workspace;

pub fn run(month: Option<String>, select: Option<String>, format: Format) -> Result<()> {
    let ws = Workspace::discover()?;
    let planner = Planner::from_workspace(&ws)?;
    let tasks = planner.list_tasks()?;

    let now = Local::now();
    let today = now.date_naive();
    let tz = *now.offset();

    let month = match month {
        Some(m) => parse_month(&m)?,
        None => today.with_day(1).unwrap_or(today),
    };
    let cells = views::calendar_month(&tasks, month, today, tz);

    match format {
        Format::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "month": month.format("%Y-%m").to_string(),
                    "cells": cells,
                })
            );
        }
        _ => render_grid(&cells, month, today),
    }

    if let Some(sel) = select {
        let date = parse_date(&sel)?;
        let list = views::tasks_on(&tasks, date, today, tz);
        match format {
            Format::Json => println!("{}", serde_json::to_string(&list)?),
            _ => {
                println!();
                println!("{} {}", date.to_string().bold(), format!("({} tasks)", list.len()).dimmed());
                output::print_tasks(&list, Format::Minimal)?;
            }
        }
    }
    Ok(())
}

fn render_grid(cells: &[DayCell], month: chrono::NaiveDate, today: chrono::NaiveDate) {
    println!("{:^27}", month.format("%B %Y").to_string().bold());
    println!("{}", "Mo Tu We Th Fr Sa Su".dimmed());
    for week in cells.chunks(7) {
        let row: Vec<String> = week.iter().map(|cell| cell_label(cell, today)).collect();
        println!("{}", row.join(" "));
    }
    println!(
        "{}  {}  {}",
        "## complete".green(),
        "## partial".yellow(),
        "## none".dimmed()
    );
}

fn cell_label(cell: &DayCell, today: chrono::NaiveDate) -> String {
    let text = format!("{:>2}", cell.date.day());
    let colored = match cell.status {
        DayStatus::Complete => text.green(),
        DayStatus::Partial => text.yellow(),
        DayStatus::Empty if cell.in_month => text.normal(),
        DayStatus::Empty => text.dimmed(),
    };
    if cell.date == today {
        colored.bold().underline().to_string()
    } else if !cell.in_month {
        colored.dimmed().to_string()
    } else {
        colored.to_string()
    }
}
