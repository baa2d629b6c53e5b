use chrono::{Datelike, FixedOffset, NaiveDate};

use crate::model::{RepeatMask, Task};

/// Whether `task` is considered relevant for calendar date `date`, evaluated
/// against the caller's `today`. Pure: the clock and timezone come in as
/// explicit parameters.
///
/// Rules, first match wins:
/// 1. A due-date hit always shows, past or future.
/// 2. A recurring task shows on `today` and future dates whose weekday bit is
///    set, but never retroactively and never past its own due date.
/// 3. A one-off task (no due date, no repeat mask) shows only on the local
///    date it was created.
pub fn occurs_on(task: &Task, date: NaiveDate, today: NaiveDate, tz: FixedOffset) -> bool {
    if let Some(due) = task.due_date
        && due == date
    {
        return true;
    }

    if let Some(mask) = task.repeat_mask {
        if date < today {
            return false;
        }
        if !mask.contains(date.weekday()) {
            return false;
        }
        if let Some(due) = task.due_date
            && date > due
        {
            return false;
        }
        return true;
    }

    if task.due_date.is_none() {
        return task.created_on(tz) == date;
    }

    false
}

/// Monday-first weekday index (Monday = 0 .. Sunday = 6) for a calendar date.
/// Kept next to [`RepeatMask::bit_for`] so every repeat-bit computation goes
/// through the same remap.
pub fn monday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

/// The repeat bit a calendar date falls on.
pub fn weekday_bit(date: NaiveDate) -> u8 {
    RepeatMask::bit_for(date.weekday())
}
