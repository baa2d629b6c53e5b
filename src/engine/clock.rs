use chrono::{Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::model::Task;

const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_milli_opt(23, 59, 59, 999) {
    Some(t) => t,
    None => panic!("23:59:59.999 is a valid time"),
};

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_DAY: i64 = 24 * 60 * MS_PER_MINUTE;

/// Countdown label plus urgency flags for a due date, relative to an
/// explicit `now`. Never reads the wall clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueStatus {
    pub remaining: String,
    pub urgent: bool,
    pub overdue: bool,
}

/// Effective deadline for a due date: 23:59:59.999 local on that day.
pub fn deadline(due: NaiveDate) -> NaiveDateTime {
    due.and_time(END_OF_DAY)
}

/// Classify the distance between `now` (local wall clock) and the deadline.
///
/// - a day or more out: "N days left", calm;
/// - inside the final day: hours+minutes (or minutes alone), urgent;
/// - past the deadline: the same decomposition with "ago" framing.
pub fn due_status(due: NaiveDate, now: NaiveDateTime) -> DueStatus {
    let diff_ms = (deadline(due) - now).num_milliseconds();
    let mins = diff_ms.abs() / MS_PER_MINUTE;
    let hours = mins / 60;
    let days = hours / 24;

    if diff_ms >= MS_PER_DAY {
        let remaining = if days == 1 {
            "1 day left".to_string()
        } else {
            format!("{days} days left")
        };
        return DueStatus {
            remaining,
            urgent: false,
            overdue: false,
        };
    }
    if diff_ms >= 0 {
        let remaining = if hours >= 1 {
            format!("{}h {}m left", hours, mins % 60)
        } else {
            format!("{mins}m left")
        };
        return DueStatus {
            remaining,
            urgent: true,
            overdue: false,
        };
    }
    let remaining = if hours >= 1 {
        format!("{}h {}m ago", hours, mins % 60)
    } else {
        format!("{mins}m ago")
    };
    DueStatus {
        remaining,
        urgent: true,
        overdue: true,
    }
}

/// View-computed failure: past the deadline and still pending. Never
/// persisted; a done task is never failed, whatever the date says.
pub fn is_failed(task: &Task, now: NaiveDateTime) -> bool {
    match task.due_date {
        Some(due) => !task.done && now > deadline(due),
        None => false,
    }
}

/// Time until the next local midnight, for scheduling the overdue-flip
/// recompute.
pub fn until_next_midnight(now: NaiveDateTime) -> Duration {
    let next = now
        .date()
        .checked_add_days(Days::new(1))
        .unwrap_or(now.date())
        .and_time(NaiveTime::MIN);
    next - now
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, ms: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_milli_opt(h, min, s, ms).unwrap()
    }

    fn pending_task(due: Option<NaiveDate>, done: bool) -> Task {
        let created = Utc::now();
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
    fn deadline_is_end_of_day() {
        assert_eq!(
            deadline(date(2025, 6, 10)),
            at(2025, 6, 10, 23, 59, 59, 999)
        );
    }

    #[test]
    fn failure_flips_exactly_at_the_deadline() {
        let t = pending_task(Some(date(2025, 6, 10)), false);
        assert!(!is_failed(&t, at(2025, 6, 10, 23, 59, 59, 999)));
        assert!(is_failed(&t, at(2025, 6, 11, 0, 0, 0, 1)));
    }

    #[test]
    fn done_task_is_never_failed() {
        let t = pending_task(Some(date(2020, 1, 1)), true);
        assert!(!is_failed(&t, at(2025, 6, 11, 0, 0, 0, 0)));
        assert!(!is_failed(&t, at(2099, 1, 1, 0, 0, 0, 0)));
    }

    #[test]
    fn task_without_due_date_is_never_failed() {
        let t = pending_task(None, false);
        assert!(!is_failed(&t, at(2099, 1, 1, 0, 0, 0, 0)));
    }

    #[test]
    fn days_left_when_a_day_or_more_remains() {
        let due = date(2025, 6, 12);
        // Exactly 24h before the deadline.
        let status = due_status(due, at(2025, 6, 11, 23, 59, 59, 999));
        assert_eq!(status.remaining, "1 day left");
        assert!(!status.urgent);
        assert!(!status.overdue);

        let status = due_status(due, at(2025, 6, 1, 0, 0, 0, 0));
        assert_eq!(status.remaining, "11 days left");
    }

    #[test]
    fn hours_and_minutes_inside_the_final_day() {
        let due = date(2025, 6, 10);
        let status = due_status(due, at(2025, 6, 10, 10, 29, 59, 999));
        assert_eq!(status.remaining, "13h 30m left");
        assert!(status.urgent);
        assert!(!status.overdue);
    }

    #[test]
    fn minutes_only_under_an_hour() {
        let due = date(2025, 6, 10);
        let status = due_status(due, at(2025, 6, 10, 23, 29, 59, 999));
        assert_eq!(status.remaining, "30m left");
        assert!(status.urgent);
        assert!(!status.overdue);
    }

    #[test]
    fn overdue_uses_ago_framing() {
        let due = date(2025, 6, 10);
        let status = due_status(due, at(2025, 6, 11, 1, 29, 59, 999));
        assert_eq!(status.remaining, "1h 30m ago");
        assert!(status.urgent);
        assert!(status.overdue);

        let status = due_status(due, at(2025, 6, 11, 0, 9, 59, 999));
        assert_eq!(status.remaining, "10m ago");
        assert!(status.overdue);
    }

    #[test]
    fn until_next_midnight_counts_down() {
        let now = at(2025, 6, 10, 23, 0, 0, 0);
        assert_eq!(until_next_midnight(now), Duration::hours(1));
        let now = at(2025, 6, 10, 0, 0, 0, 0);
        assert_eq!(until_next_midnight(now), Duration::days(1));
    }
}
