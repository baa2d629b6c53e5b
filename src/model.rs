use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc, Weekday};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LifeQuestError;

/// Weekday set for recurring tasks: bit `i` (value `2^i`, i = 0..6) is
/// Monday..Sunday. The stored integer is always in 1..=127; an empty mask is
/// represented as the field being absent, never as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RepeatMask(u8);

impl RepeatMask {
    pub const DAILY: RepeatMask = RepeatMask(0b111_1111);
    pub const WEEKDAYS: RepeatMask = RepeatMask(0b001_1111);

    pub fn new(bits: u8) -> Option<Self> {
        if bits == 0 || bits > 127 {
            None
        } else {
            Some(Self(bits))
        }
    }

    pub fn from_days(days: &[Weekday]) -> Option<Self> {
        let mut bits = 0u8;
        for &day in days {
            bits |= Self::bit_for(day);
        }
        Self::new(bits)
    }

    /// The single weekday-to-bit remap point. Monday-first indexing comes
    /// from chrono's `num_days_from_monday`, so Monday = bit 0, Sunday = bit 6.
    pub fn bit_for(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & Self::bit_for(day) != 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn days(self) -> Vec<Weekday> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .filter(|&d| self.contains(d))
        .collect()
    }
}

impl TryFrom<u8> for RepeatMask {
    type Error = LifeQuestError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::new(bits).ok_or(LifeQuestError::InvalidRepeatMask(bits as u32))
    }
}

impl From<RepeatMask> for u8 {
    fn from(mask: RepeatMask) -> u8 {
        mask.0
    }
}

impl std::fmt::Display for RepeatMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if *self == Self::DAILY {
            return write!(f, "daily");
        }
        let names: Vec<&str> = self
            .days()
            .into_iter()
            .map(|d| match d {
                Weekday::Mon => "mon",
                Weekday::Tue => "tue",
                Weekday::Wed => "wed",
                Weekday::Thu => "thu",
                Weekday::Fri => "fri",
                Weekday::Sat => "sat",
                Weekday::Sun => "sun",
            })
            .collect();
        write!(f, "{}", names.join(","))
    }
}

impl FromStr for RepeatMask {
    type Err = LifeQuestError;

    /// Accepts a raw integer (1-127), the shorthands `daily` / `weekdays`,
    /// or a comma-separated day list like `mon,wed,fri`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(bits) = s.parse::<u32>() {
            return u8::try_from(bits)
                .ok()
                .and_then(Self::new)
                .ok_or(LifeQuestError::InvalidRepeatMask(bits));
        }
        match s.to_ascii_lowercase().as_str() {
            "daily" => return Ok(Self::DAILY),
            "weekdays" => return Ok(Self::WEEKDAYS),
            _ => {}
        }
        let days = s
            .split(',')
            .map(|part| Weekday::from_str(part.trim()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| LifeQuestError::InvalidRepeatSpec(s.to_string()))?;
        Self::from_days(&days).ok_or_else(|| LifeQuestError::InvalidRepeatSpec(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_mask: Option<RepeatMask>,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Calendar date the task was created on, in the owner's local timezone.
    /// The fallback "occurs on" date for one-off tasks with no due date and
    /// no repeat mask.
    pub fn created_on(&self, tz: FixedOffset) -> NaiveDate {
        self.created_at.with_timezone(&tz).date_naive()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[clap(rename_all = "snake_case")]
pub enum Scope {
    #[default]
    Short,
    Long,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Short => write!(f, "short"),
            Self::Long => write!(f, "long"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub scope: Scope,
    pub target_count: u32,
    pub achieved_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Count-based progress, clamped to 100 even when achieved overshoots
    /// the target. A zero target always reads as 0%.
    pub fn progress_percent(&self) -> u8 {
        if self.target_count == 0 {
            return 0;
        }
        let pct = (self.achieved_count as f64 / self.target_count as f64 * 100.0).round();
        pct.min(100.0) as u8
    }
}

/// Gamified profile row. Level is derived from XP, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub owner_id: Uuid,
    pub xp: u32,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// 0-99 XP is level 1, 100-199 is level 2, and so on.
    pub fn level(&self) -> u32 {
        self.xp / 100 + 1
    }

    /// XP accumulated within the current level, 0-99.
    pub fn xp_in_level(&self) -> u32 {
        self.xp % 100
    }
}
