use std::{fmt, str::FromStr, sync::OnceLock};

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

use crate::LoggerError;

/// Local UTC offset captured once at startup.
static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Timezone for log timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerTimeZone {
    #[default]
    Utc,
    /// Offset detected by [`init_local_offset`]; UTC if detection failed or was never run.
    Local,
}

impl FromStr for LoggerTimeZone {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(LoggerError::InvalidTimeZone(s.to_string())),
        }
    }
}

impl fmt::Display for LoggerTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoggerTimeZone::Utc => "utc",
            LoggerTimeZone::Local => "local",
        })
    }
}

/// Detect and cache the local offset.
///
/// Must run in `main()` before the tokio runtime spawns threads: most Unix platforms refuse offset detection in a multi-threaded process.
/// Returns the offset in effect (UTC on failure).
pub fn init_local_offset() -> UtcOffset {
    *LOCAL_OFFSET.get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
}

/// RFC3339 timestamp formatter honoring the configured timezone.
#[derive(Debug, Clone, Copy)]
pub struct LoggerTimer {
    offset: UtcOffset,
}

impl LoggerTimer {
    pub fn new(tz: LoggerTimeZone) -> Self {
        let offset = match tz {
            LoggerTimeZone::Utc => UtcOffset::UTC,
            LoggerTimeZone::Local => LOCAL_OFFSET.get().copied().unwrap_or(UtcOffset::UTC),
        };
        Self { offset }
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

impl FormatTime for LoggerTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        match self.now().format(&Rfc3339) {
            Ok(ts) => write!(w, "{ts}"),
            Err(_) => write!(w, "<invalid-time>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitive() {
        assert_eq!("UTC".parse::<LoggerTimeZone>().unwrap(), LoggerTimeZone::Utc);
        assert_eq!("Local".parse::<LoggerTimeZone>().unwrap(), LoggerTimeZone::Local);
        assert!("pst".parse::<LoggerTimeZone>().is_err());
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&LoggerTimeZone::Local).unwrap(), r#""local""#);
    }

    #[test]
    fn utc_timer_has_zero_offset() {
        let timer = LoggerTimer::new(LoggerTimeZone::Utc);
        assert_eq!(timer.now().offset(), UtcOffset::UTC);
    }

    #[test]
    fn local_offset_is_sane() {
        let offset = init_local_offset();
        assert!(offset.whole_hours().abs() <= 14);
        assert_eq!(LoggerTimer::new(LoggerTimeZone::Local).offset, offset);
    }
}
