use carbon_lib::storage::Priority;

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in a color when colors are on
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn priority_badge(priority: Option<Priority>, use_color: bool) -> String {
    match priority {
        Some(Priority::High) => paint("[high]", Color::RED, use_color),
        Some(Priority::Medium) => paint("[medium]", Color::YELLOW, use_color),
        Some(Priority::Low) => paint("[low]", Color::GRAY, use_color),
        None => String::new(),
    }
}

/// Shorten to at most `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() && max > 0 {
        let mut cut: String = head.chars().take(max - 1).collect();
        cut.push('\u{2026}');
        cut
    } else {
        head
    }
}

/// First line of a note body, for listings
pub fn first_line(text: &str) -> &str {
    text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 6), "hello\u{2026}");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn test_paint_without_color() {
        assert_eq!(paint("x", Color::RED, false), "x");
        assert_eq!(paint("x", Color::RED, true), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("\n  \n Shopping list\nmilk"), "Shopping list");
        assert_eq!(first_line(""), "");
    }
}
