//! Log helpers. Player input ends up in log lines (usernames, chat text, commands), so it is
//! escaped to a single bounded line before formatting.

use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Characters of user text kept in one log field.
pub const MAX_LOG_FIELD: usize = 200;

/// Escape backslashes and control characters and cap the length with an ellipsis.
pub fn escape_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_LOG_FIELD) + 4);
    for (idx, ch) in s.chars().enumerate() {
        if idx == MAX_LOG_FIELD {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// One formatted log line: `2026-10-14T12:00:00Z [INFO] message`.
pub fn format_log_line(ts: DateTime<Utc>, level: log::Level, message: &std::fmt::Arguments<'_>) -> String {
    format!("{} [{}] {}", ts.format("%Y-%m-%dT%H:%M:%SZ"), level, message)
}

/// Map a config level name to a filter; unknown names fall back to `info`.
pub fn parse_level(name: &str) -> log::LevelFilter {
    name.trim().parse().unwrap_or(log::LevelFilter::Info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn escapes_control_characters() {
        assert_eq!(escape_log("hi\nthere\t\\"), "hi\\nthere\\t\\\\");
        assert_eq!(escape_log("bell\u{7}"), "bell\\u{7}");
    }

    #[test]
    fn truncates_long_fields() {
        let long = "x".repeat(MAX_LOG_FIELD + 50);
        let escaped = escape_log(&long);
        assert_eq!(escaped.chars().count(), MAX_LOG_FIELD + 1);
        assert!(escaped.ends_with('…'));
    }

    #[test]
    fn log_line_layout() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
        let line = format_log_line(ts, log::Level::Warn, &format_args!("low on {}", "coins"));
        assert_eq!(line, "2026-10-14T12:00:00Z [WARN] low on coins");
    }

    #[test]
    fn level_names() {
        assert_eq!(parse_level("debug"), log::LevelFilter::Debug);
        assert_eq!(parse_level("loud"), log::LevelFilter::Info);
    }
}
