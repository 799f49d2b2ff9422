use std::fmt;

use chrono::{Local, TimeZone};

use crate::utils::flat_file::Record;

/// Layout produced by C `asctime`, minus the trailing newline.
pub const ATTENDANCE_TIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// One line of the attendance file: `<employee id> <unix seconds>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendancePunch {
    pub employee_id: String,
    pub timestamp: i64,
}

impl AttendancePunch {
    pub fn new(employee_id: impl Into<String>, timestamp: i64) -> Self {
        Self {
            employee_id: employee_id.into(),
            timestamp,
        }
    }

    /// Civil time of the punch in the given zone.
    pub fn format_time_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        tz.timestamp_opt(self.timestamp, 0)
            .earliest()
            .map(|t| t.format(ATTENDANCE_TIME_FORMAT).to_string())
            // out of chrono's range; show the raw value rather than nothing
            .unwrap_or_else(|| self.timestamp.to_string())
    }

    pub fn local_time(&self) -> String {
        self.format_time_in(&Local)
    }
}

impl fmt::Display for AttendancePunch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.employee_id, self.timestamp)
    }
}

impl Record for AttendancePunch {
    const VALUE_KIND: &'static str = "timestamp";

    fn from_tokens(key: &str, value: &str) -> Option<Self> {
        value.parse().ok().map(|ts| Self::new(key, ts))
    }

    fn key(&self) -> &str {
        &self.employee_id
    }
}
