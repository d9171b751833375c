/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Open sessions are highlighted in yellow, closed ones in green.
pub fn color_for_status(is_open: bool) -> &'static str {
    if is_open { YELLOW } else { GREEN }
}

/// Grey out empty cells (`-`, blank) in listings.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "-" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_greyed() {
        assert_eq!(colorize_optional("-"), format!("{GREY}-{RESET}"));
        assert_eq!(colorize_optional("HRM"), "HRM");
        assert_eq!(color_for_status(true), YELLOW);
    }
}
