use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum LifeQuestError {
    #[error("not a lifequest workspace (run `lifequest init` first)")]
    NotInitialized,

    #[error("lifequest already initialized in this directory")]
    AlreadyInitialized,

    #[error("no owner context in config.json (re-run `lifequest init`)")]
    NotSignedIn,

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("task {0} not found")]
    TaskNotFound(Uuid),

    #[error("goal {0} not found")]
    GoalNotFound(Uuid),

    #[error("no task or goal matches id prefix '{0}'")]
    UnknownId(String),

    #[error("id prefix '{0}' is ambiguous; give more characters")]
    AmbiguousId(String),

    #[error("repeat mask {0} out of range (expected 1-127, Monday = bit 0)")]
    InvalidRepeatMask(u32),

    #[error(
        "cannot parse '{0}' as a repeat spec (integer 1-127, day list like 'mon,wed', 'daily', or 'weekdays')"
    )]
    InvalidRepeatSpec(String),

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("invalid month '{0}' (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("corrupt stored row: {0}")]
    CorruptRow(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

impl LifeQuestError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotInitialized => "not_initialized",
            Self::AlreadyInitialized => "already_initialized",
            Self::NotSignedIn => "not_signed_in",
            Self::EmptyTitle => "empty_title",
            Self::TaskNotFound(_) => "task_not_found",
            Self::GoalNotFound(_) => "goal_not_found",
            Self::UnknownId(_) => "unknown_id",
            Self::AmbiguousId(_) => "ambiguous_id",
            Self::InvalidRepeatMask(_) => "invalid_repeat_mask",
            Self::InvalidRepeatSpec(_) => "invalid_repeat_spec",
            Self::InvalidDate(_) => "invalid_date",
            Self::InvalidMonth(_) => "invalid_month",
            Self::CorruptRow(_) => "corrupt_row",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
            Self::Db(_) => "db_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, LifeQuestError>;
