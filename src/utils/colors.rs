/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Rows superseded by a delete are shown in grey, delete rows in red.
pub fn color_for_action(is_delete: bool, cancelled: bool) -> &'static str {
    if is_delete {
        RED
    } else if cancelled {
        GREY
    } else {
        RESET
    }
}
