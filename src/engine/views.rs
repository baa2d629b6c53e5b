use chrono::{Datelike, Days, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::engine::recurrence::occurs_on;
use crate::model::Task;

/// Dashboard partition for a single day. The three buckets are pairwise
/// disjoint; tasks matching none of them (e.g. a future due date) appear in
/// no bucket and stay visible only in the unfiltered task list.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub overdue: Vec<Task>,
    pub today_pending: Vec<Task>,
    pub today_completed: Vec<Task>,
    pub total_today: usize,
    pub progress_percent: u8,
}

pub fn dashboard(tasks: &[Task], today: NaiveDate, tz: FixedOffset) -> Dashboard {
    let mut overdue = Vec::new();
    let mut today_pending = Vec::new();
    let mut today_completed = Vec::new();

    for task in tasks {
        let is_today = match task.due_date {
            Some(due) => due == today,
            None => task.created_on(tz) == today,
        };
        let is_overdue = task.due_date.is_some_and(|due| due < today) && !task.done;

        if is_overdue {
            overdue.push(task.clone());
        } else if is_today && !task.done {
            today_pending.push(task.clone());
        } else if is_today && task.done {
            today_completed.push(task.clone());
        }
    }

    sort_newest_first(&mut overdue);
    sort_newest_first(&mut today_pending);
    sort_newest_first(&mut today_completed);

    let total_today = today_pending.len() + today_completed.len();
    let progress_percent = if total_today == 0 {
        0
    } else {
        (today_completed.len() as f64 / total_today as f64 * 100.0).round() as u8
    };

    Dashboard {
        overdue,
        today_pending,
        today_completed,
        total_today,
        progress_percent,
    }
}

fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Per-cell completion classification for the month grid. A strict 3-way
/// split, not a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Empty,
    Partial,
    Complete,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub total: usize,
    pub done: usize,
    pub left: usize,
    pub status: DayStatus,
}

/// 42 cells (6 weeks of Monday-first rows) starting from the Monday on or
/// before the 1st of `month`, so adjoining-month days are present but can be
/// rendered dimmed.
pub fn month_grid(month: NaiveDate) -> Vec<NaiveDate> {
    let first = month.with_day(1).unwrap_or(month);
    let offset = first.weekday().num_days_from_monday() as u64;
    let start = first
        .checked_sub_days(Days::new(offset))
        .unwrap_or(first);
    (0..42)
        .filter_map(|i| start.checked_add_days(Days::new(i)))
        .collect()
}

pub fn calendar_month(
    tasks: &[Task],
    month: NaiveDate,
    today: NaiveDate,
    tz: FixedOffset,
) -> Vec<DayCell> {
    month_grid(month)
        .into_iter()
        .map(|date| {
            let day_tasks: Vec<&Task> = tasks
                .iter()
                .filter(|t| occurs_on(t, date, today, tz))
                .collect();
            let total = day_tasks.len();
            let done = day_tasks.iter().filter(|t| t.done).count();
            let left = total - done;
            let status = if total == 0 {
                DayStatus::Empty
            } else if left == 0 {
                DayStatus::Complete
            } else {
                DayStatus::Partial
            };
            DayCell {
                date,
                in_month: date.month() == month.month() && date.year() == month.year(),
                total,
                done,
                left,
                status,
            }
        })
        .collect()
}

/// Tasks relevant to a selected cell, newest first, for the detail panel.
pub fn tasks_on(
    tasks: &[Task],
    date: NaiveDate,
    today: NaiveDate,
    tz: FixedOffset,
) -> Vec<Task> {
    let mut list: Vec<Task> = tasks
        .iter()
        .filter(|t| occurs_on(t, date, today, tz))
        .cloned()
        .collect();
    sort_newest_first(&mut list);
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RepeatMask;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;
    use uuid::Uuid;

    fn utc_offset() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(due: Option<NaiveDate>, done: bool, created: chrono::DateTime<Utc>) -> Task {
        Task {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "t".into(),
            note: None,
            due_date: due,
            repeat_mask: None,
            done,
            goal_id: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn dashboard_scenario_partitions_three_ways() {
        let today = date(2025, 6, 10);
        let created_today = Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap();
        let tasks = vec![
            task(Some(date(2099, 1, 1)), false, created_today),
            task(Some(date(2020, 1, 1)), false, created_today),
            task(None, true, created_today),
        ];
        let dash = dashboard(&tasks, today, utc_offset());
        // Future due date lands in no bucket.
        assert_eq!(dash.overdue.len(), 1);
        assert_eq!(dash.overdue[0].due_date, Some(date(2020, 1, 1)));
        assert!(dash.today_pending.is_empty());
        assert_eq!(dash.today_completed.len(), 1);
        assert_eq!(dash.total_today, 1);
        assert_eq!(dash.progress_percent, 100);
    }

    #[test]
    fn buckets_are_pairwise_disjoint() {
        let today = date(2025, 6, 10);
        let mut tasks = Vec::new();
        for day in 1..=20 {
            let created = Utc.with_ymd_and_hms(2025, 6, day, 9, 0, 0).unwrap();
            tasks.push(task(Some(date(2025, 6, day)), day % 2 == 0, created));
            tasks.push(task(None, day % 3 == 0, created));
        }
        let dash = dashboard(&tasks, today, utc_offset());
        let ids = |bucket: &[Task]| -> HashSet<Uuid> { bucket.iter().map(|t| t.id).collect() };
        let o = ids(&dash.overdue);
        let p = ids(&dash.today_pending);
        let c = ids(&dash.today_completed);
        assert!(o.is_disjoint(&p));
        assert!(o.is_disjoint(&c));
        assert!(p.is_disjoint(&c));
    }

    #[test]
    fn done_tasks_never_count_as_overdue() {
        let today = date(2025, 6, 10);
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let tasks = vec![task(Some(date(2025, 6, 1)), true, created)];
        let dash = dashboard(&tasks, today, utc_offset());
        assert!(dash.overdue.is_empty());
        assert!(dash.today_completed.is_empty());
    }

    #[test]
    fn progress_is_zero_for_an_empty_day() {
        let dash = dashboard(&[], date(2025, 6, 10), utc_offset());
        assert_eq!(dash.total_today, 0);
        assert_eq!(dash.progress_percent, 0);
    }

    #[test]
    fn progress_stays_within_bounds() {
        let today = date(2025, 6, 10);
        let created = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        for done_count in 0..=4u32 {
            let tasks: Vec<Task> = (0..4)
                .map(|i| task(Some(today), i < done_count, created))
                .collect();
            let dash = dashboard(&tasks, today, utc_offset());
            assert!(dash.progress_percent <= 100);
        }
    }

    #[test]
    fn buckets_sort_newest_first() {
        let today = date(2025, 6, 10);
        let older = Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        let tasks = vec![
            task(Some(today), false, older),
            task(Some(today), false, newer),
        ];
        let dash = dashboard(&tasks, today, utc_offset());
        assert_eq!(dash.today_pending[0].created_at, newer);
        assert_eq!(dash.today_pending[1].created_at, older);
    }

    #[test]
    fn month_grid_is_42_cells_starting_monday() {
        // June 2025: the 1st is a Sunday, so the grid starts Monday May 26.
        let grid = month_grid(date(2025, 6, 1));
        assert_eq!(grid.len(), 42);
        assert_eq!(grid[0], date(2025, 5, 26));
        assert_eq!(grid[0].weekday(), chrono::Weekday::Mon);
        assert_eq!(grid[6], date(2025, 6, 1));
        assert_eq!(grid[41], date(2025, 7, 6));
        // Every day of the month is present.
        for day in 1..=30 {
            assert!(grid.contains(&date(2025, 6, day)));
        }
    }

    #[test]
    fn month_grid_when_the_first_is_a_monday() {
        // September 2025 starts on a Monday; no leading spill-over days.
        let grid = month_grid(date(2025, 9, 1));
        assert_eq!(grid[0], date(2025, 9, 1));
    }

    #[test]
    fn calendar_cells_classify_three_ways() {
        let today = date(2025, 6, 10);
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let tasks = vec![
            // Both due June 12: one done, one pending -> partial.
            task(Some(date(2025, 6, 12)), true, created),
            task(Some(date(2025, 6, 12)), false, created),
            // Due June 13, done -> complete.
            task(Some(date(2025, 6, 13)), true, created),
        ];
        let cells = calendar_month(&tasks, date(2025, 6, 1), today, utc_offset());
        let cell = |d: NaiveDate| cells.iter().find(|c| c.date == d).unwrap().clone();

        let partial = cell(date(2025, 6, 12));
        assert_eq!(partial.status, DayStatus::Partial);
        assert_eq!((partial.total, partial.done, partial.left), (2, 1, 1));

        let complete = cell(date(2025, 6, 13));
        assert_eq!(complete.status, DayStatus::Complete);
        assert_eq!((complete.total, complete.done, complete.left), (1, 1, 0));

        let empty = cell(date(2025, 6, 20));
        assert_eq!(empty.status, DayStatus::Empty);
        assert_eq!(empty.total, 0);
    }

    #[test]
    fn calendar_marks_adjoining_month_cells() {
        let cells = calendar_month(&[], date(2025, 6, 1), date(2025, 6, 10), utc_offset());
        assert!(!cells[0].in_month); // May 26
        assert!(cells[6].in_month); // June 1
        assert!(!cells[41].in_month); // July 6
    }

    #[test]
    fn recurring_tasks_show_in_future_cells_only() {
        let today = date(2025, 6, 10);
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let mut t = task(None, false, created);
        t.repeat_mask = RepeatMask::new(127);
        let cells = calendar_month(&[t], date(2025, 6, 1), today, utc_offset());
        let total = |d: NaiveDate| cells.iter().find(|c| c.date == d).unwrap().total;
        assert_eq!(total(date(2025, 6, 9)), 0);
        assert_eq!(total(date(2025, 6, 10)), 1);
        assert_eq!(total(date(2025, 6, 11)), 1);
    }

    #[test]
    fn tasks_on_sorts_newest_first() {
        let today = date(2025, 6, 10);
        let older = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let tasks = vec![
            task(Some(date(2025, 6, 12)), false, older),
            task(Some(date(2025, 6, 12)), false, newer),
        ];
        let list = tasks_on(&tasks, date(2025, 6, 12), today, utc_offset());
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].created_at, newer);
    }
}
