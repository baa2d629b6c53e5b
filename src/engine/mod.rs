pub mod clock;
pub mod recurrence;
pub mod views;
