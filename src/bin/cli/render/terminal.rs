use memmaster_lib::flashcards::{Notice, NoticeKind};

/// ANSI color codes
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap text in a color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn render_notice(notice: &Notice, use_color: bool) -> String {
    let color = match notice.kind {
        NoticeKind::Success => Color::GREEN,
        NoticeKind::Refusal => Color::YELLOW,
        NoticeKind::Info => Color::CYAN,
    };
    paint(&notice.message, color, use_color)
}

/// "due today", "3 days overdue", or "new" for unscheduled cards
pub fn render_due_label(next_review: &str, days_overdue: i64, use_color: bool) -> String {
    if next_review.is_empty() {
        paint("new", Color::CYAN, use_color)
    } else if days_overdue > 0 {
        let unit = if days_overdue == 1 { "day" } else { "days" };
        paint(&format!("{} {} overdue", days_overdue, unit), Color::RED, use_color)
    } else {
        paint("due today", Color::GREEN, use_color)
    }
}
