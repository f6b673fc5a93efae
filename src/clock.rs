use time::{macros::format_description, Date, OffsetDateTime};
use tracing::warn;

pub trait Clock: Send + Sync {
    /// Current time in the user's local offset.
    fn now(&self) -> OffsetDateTime;

    fn today(&self) -> String {
        day_key(self.now().date())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|e| {
            warn!(error = %e, "local offset unavailable; using UTC");
            OffsetDateTime::now_utc()
        })
    }
}

/// `YYYY-MM-DD` key of a calendar day.
pub fn day_key(date: Date) -> String {
    let fmt = format_description!("[year]-[month]-[day]");
    date.format(&fmt)
        .unwrap_or_else(|_| format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day()))
}
