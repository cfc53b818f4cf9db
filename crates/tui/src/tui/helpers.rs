use std::cmp::min;

use chrono::{DateTime, Local, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::model::{Filter, TaskStats};
use crate::week::WeekDay;

pub const BG_BASE: Color = Color::Rgb(14, 17, 23);
pub const BG_PANEL: Color = Color::Rgb(22, 26, 34);
pub const BG_ACCENT: Color = Color::Rgb(32, 37, 47);
pub const FG_ACCENT: Color = Color::Rgb(120, 161, 255);

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = min(width, area.width);
    let h = min(height, area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

pub fn inset_rect(area: Rect, padding: u16) -> Rect {
    if area.width == 0 || area.height == 0 {
        return area;
    }
    let px = padding.min(area.width / 2);
    let py = padding.min(area.height / 2);
    Rect {
        x: area.x + px,
        y: area.y + py,
        width: area.width.saturating_sub(px * 2),
        height: area.height.saturating_sub(py * 2),
    }
}

pub fn accent_title(text: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text.to_owned(),
        Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
    )])
}

/// Tab label for a day: `Mon 12 (3)` with the open-task count, `•` marking today.
pub fn day_tab_label(day: &WeekDay, stats: TaskStats, is_today: bool) -> String {
    let mut label = day.short_label();
    if stats.active > 0 {
        label.push_str(&format!(" ({})", stats.active));
    }
    if is_today {
        label.insert_str(0, "• ");
    }
    label
}

pub fn filter_label(filter: Filter, stats: TaskStats) -> String {
    let title = match filter {
        Filter::All => "All",
        Filter::Active => "Active",
        Filter::Done => "Done",
    };
    format!("{} {}", title, stats.count_for(filter))
}

pub fn task_marker(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn format_created(value: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = (*value).into();
    local.format("%a %H:%M").to_string()
}

pub fn build_help_lines() -> Vec<(&'static str, &'static str)> {
    vec![
        ("←/→, h/l, Tab", "Previous / next day (wraps within the week)"),
        ("1-7, t", "Jump to a weekday / back to today"),
        ("j / k or ↓ / ↑", "Move selection"),
        ("Home / End", "First / last task"),
        ("a", "Add a task to the selected day"),
        ("A", "Add a task to the following day"),
        ("Space / d", "Toggle done"),
        ("e / Enter", "Edit selected task"),
        ("x / Delete", "Delete selected task"),
        ("J / K", "Move selected task down / up"),
        ("m", "Grab task, move with j/k, drop with Enter"),
        ("i", "Copy unfinished tasks from the previous day"),
        ("c", "Clear completed tasks"),
        ("C", "Clear every task of the day (with confirmation)"),
        ("f", "Cycle filter: all → active → done"),
        ("/", "Command palette"),
        ("?", "Toggle this help overlay"),
        ("q / Ctrl+C", "Quit"),
        ("Esc", "Cancel/close overlays"),
    ]
}
