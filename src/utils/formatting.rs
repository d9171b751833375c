//! Formatting utilities used for CLI and export outputs.

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

/// Render a duration in seconds as `MM:SS`; minutes are not wrapped into
/// hours. `None` renders as `-`.
pub fn secs2mmss(seconds: Option<i64>) -> String {
    match seconds {
        None => "-".to_string(),
        Some(s) => {
            let sign = if s < 0 { "-" } else { "" };
            let abs = s.abs();
            format!("{}{:02}:{:02}", sign, abs / 60, abs % 60)
        }
    }
}

/// Human readable form for console listings, e.g. `1h 05m 09s`.
pub fn secs2readable(seconds: i64) -> String {
    let abs = seconds.abs();
    let hours = abs / 3600;
    let minutes = (abs % 3600) / 60;
    let secs = abs % 60;
    let sign = if seconds < 0 { "-" } else { "" };

    if hours > 0 {
        format!("{}{}h {:02}m {:02}s", sign, hours, minutes, secs)
    } else {
        format!("{}{:02}m {:02}s", sign, minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mmss_pads_and_keeps_long_minutes() {
        assert_eq!(secs2mmss(Some(135)), "02:15");
        assert_eq!(secs2mmss(Some(0)), "00:00");
        assert_eq!(secs2mmss(Some(59)), "00:59");
        assert_eq!(secs2mmss(Some(6_000)), "100:00");
        assert_eq!(secs2mmss(None), "-");
    }

    #[test]
    fn readable_switches_to_hours() {
        assert_eq!(secs2readable(135), "02m 15s");
        assert_eq!(secs2readable(3_909), "1h 05m 09s");
    }

    #[test]
    fn pad_right_fills_width() {
        assert_eq!(pad_right("ab", 4), "ab  ");
    }
}
