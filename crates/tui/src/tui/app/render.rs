use std::cmp::min;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use ratatui::Frame;

use crate::model::Filter;
use crate::tui::constants::APP_VERSION;
use crate::tui::helpers::{
    accent_title, build_help_lines, centered_rect, day_tab_label, filter_label, format_created,
    inset_rect, task_marker, BG_ACCENT, BG_BASE, BG_PANEL, FG_ACCENT,
};

use super::{AddTarget, App, ConfirmChoice, InputMode};

impl App {
    pub(crate) fn draw(&mut self, f: &mut Frame<'_>) {
        let size = f.size();
        f.render_widget(Clear, size);
        f.render_widget(Block::default().style(Style::default().bg(BG_BASE)), size);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(2),
            ])
            .split(size);

        self.draw_header(f, chunks[0]);
        self.draw_day_tabs(f, chunks[1]);
        self.draw_filter_bar(f, chunks[2]);
        self.draw_tasks(f, chunks[3]);
        self.draw_footer(f, chunks[4]);

        match self.input_mode {
            InputMode::Add | InputMode::Command | InputMode::Edit => {
                self.draw_input_overlay(f, size)
            }
            InputMode::Help => self.draw_help_overlay(f, size),
            InputMode::ConfirmClearAll => self.draw_confirm_overlay(f, size),
            InputMode::Normal | InputMode::Move => {}
        }
    }

    fn draw_header(&self, f: &mut Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);

        let state = self.state();
        let left_line = Line::from(vec![
            Span::styled(
                format!(" weekdo v{} 📅 ", APP_VERSION),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("Week of {}", state.week.range_label())),
            Span::raw("  "),
            Span::styled(
                format!("💾 {}", self.service.config().db_path().display()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        f.render_widget(
            Paragraph::new(left_line).style(Style::default().bg(BG_BASE)),
            cols[0],
        );

        let right_line = Line::from(vec![Span::styled(
            state.active().long_label(),
            Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
        )]);
        f.render_widget(
            Paragraph::new(right_line)
                .alignment(Alignment::Right)
                .style(Style::default().bg(BG_BASE)),
            cols[1],
        );
    }

    fn draw_day_tabs(&self, f: &mut Frame<'_>, area: Rect) {
        let state = self.state();
        let today_index = state.today_index();
        let titles: Vec<Line> = state
            .week
            .days()
            .iter()
            .enumerate()
            .map(|(index, day)| {
                let is_today = today_index == Some(index);
                let label = day_tab_label(day, state.tasks.stats(&day.key), is_today);
                if is_today {
                    Line::from(Span::styled(label, Style::default().fg(Color::Cyan)))
                } else {
                    Line::from(label)
                }
            })
            .collect();
        let tabs = Tabs::new(titles)
            .select(state.active_day)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(accent_title("Days"))
                    .border_style(Style::default().fg(Color::DarkGray))
                    .style(Style::default().bg(BG_PANEL)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Green)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, area);
    }

    fn draw_filter_bar(&self, f: &mut Frame<'_>, area: Rect) {
        let state = self.state();
        let stats = state.stats();
        let mut spans = vec![Span::raw(" ")];
        for filter in Filter::ALL {
            let style = if filter == state.filter {
                Style::default()
                    .fg(Color::Black)
                    .bg(FG_ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(
                format!(" {} ", filter_label(filter, stats)),
                style,
            ));
            spans.push(Span::raw(" "));
        }
        if self.input_mode == InputMode::Move {
            spans.push(Span::styled(
                " ↕ moving ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        f.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(BG_BASE)),
            area,
        );
    }

    fn draw_tasks(&mut self, f: &mut Frame<'_>, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title(&self.state().active().short_label()))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));

        if self.visible_len() == 0 {
            let lines = self.empty_task_state();
            let inner = block.inner(area);
            f.render_widget(Clear, area);
            f.render_widget(block, area);
            if inner.width == 0 || inner.height == 0 {
                return;
            }
            let width = inner.width.min(80).max(1);
            let height = (lines.len() as u16).saturating_add(2).min(inner.height);
            let content_area = centered_rect(width, height, inner);
            f.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .alignment(Alignment::Center)
                    .style(Style::default().bg(BG_PANEL)),
                content_area,
            );
            return;
        }

        let rows: Vec<Row> = self
            .state()
            .visible()
            .iter()
            .map(|row| {
                let task = row.task;
                let text_style = if task.done {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default()
                };
                let marker_style = if task.done {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Row::new(vec![
                    Cell::from(Span::styled(task_marker(task.done), marker_style)),
                    Cell::from(Span::styled(task.text.clone(), text_style)),
                    Cell::from(Span::styled(
                        format_created(&task.created_at),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(10),
        ];
        let highlight = if self.input_mode == InputMode::Move {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Color::Yellow)
                .bg(BG_ACCENT)
                .add_modifier(Modifier::BOLD)
        };
        let table = Table::new(rows, widths)
            .block(block)
            .highlight_style(highlight)
            .highlight_symbol("▶ ");
        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn empty_task_state(&self) -> Vec<Line<'static>> {
        let state = self.state();
        let stats = state.stats();
        let heading = match state.filter {
            _ if stats.total == 0 => {
                format!("Nothing planned for {} ✨", state.active().long_label())
            }
            Filter::Active => String::from("Everything is done 🎉"),
            Filter::Done => String::from("Nothing completed yet ✅"),
            Filter::All => String::from("All clear ✨"),
        };

        let mut hints = vec!["Press 'a' to add a task or 'A' to plan the next day."];
        if stats.total == 0 {
            hints.push("Press 'i' to carry over unfinished tasks from the previous day.");
        } else {
            hints.push("Press 'f' to change the filter.");
        }
        hints.push("Use '/' to explore commands, '?' for every key.");

        let mut lines: Vec<Line<'static>> = Vec::new();
        lines.push(Line::from(vec![Span::styled(
            heading,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )]));
        lines.push(Line::default());

        let hint_style = Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD);
        for hint in hints {
            lines.push(Line::from(vec![Span::styled(hint, hint_style)]));
        }

        if self.first_run {
            lines.push(Line::default());
            lines.push(Line::from(vec![Span::styled(
                format!(
                    "Your weekdo data lives in `{}` (adjust with `--data-dir` or `WEEKDO_DATA_DIR`).",
                    self.service.config().data_dir().display()
                ),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )]));
        }
        lines
    }

    fn draw_footer(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.style())])
        } else {
            Line::from(vec![Span::raw("Ready")])
        };
        f.render_widget(Paragraph::new(status_line), lines[0]);

        let mut help = match self.input_mode {
            InputMode::Normal => String::from(
                "days: ←/→ 1-7 t | tasks: j/k move | a add ✚ | A add next | space done ✅ | e edit ✏️ | x delete 🗑️ | J/K reorder | c clear done | i import 📥 | f filter 🔍 | / command ⌨️ | ? help | q quit",
            ),
            InputMode::Add => String::from("Enter to add ✍️ • Esc to cancel"),
            InputMode::Edit => String::from("Enter to save ✏️ • Esc to cancel"),
            InputMode::Command => {
                String::from("Up/Down navigate • Tab/Right complete • Enter select/run • Esc cancel")
            }
            InputMode::Help => String::from("Enter/Esc to close ❔"),
            InputMode::ConfirmClearAll => {
                String::from("←/→ choose • y yes • n no • Enter confirm • Esc cancel")
            }
            InputMode::Move => String::from("j/k move the task • Enter/Esc/m drop"),
        };
        if self.input_mode == InputMode::Normal && self.first_run {
            help.push_str(" • New here? Press `a` to add a task or type `/help`");
        }
        f.render_widget(
            Paragraph::new(Line::from(vec![Span::styled(
                help,
                Style::default().fg(Color::DarkGray),
            )])),
            lines[1],
        );
    }

    fn draw_input_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let width = min(area.width.saturating_sub(10), 80);
        let extra_height = match self.input_mode {
            InputMode::Command => self.suggestions.len().min(8) as u16 + 1,
            _ => 1,
        };
        let popup_area = centered_rect(width, 3 + extra_height, area);
        f.render_widget(Clear, popup_area);

        let state = self.state();
        let title = match (self.input_mode, self.add_target) {
            (InputMode::Add, AddTarget::ActiveDay) => {
                format!("➕ Add to {}", state.active().short_label())
            }
            (InputMode::Add, AddTarget::NextDay) => format!(
                "⏭️ Add to {}",
                state
                    .week
                    .day(crate::week::next_index(state.active_day))
                    .short_label()
            ),
            (InputMode::Edit, _) => String::from("✏️ Edit Task"),
            _ => String::from("⌨️ Command"),
        };

        let inner = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(popup_area);

        let input_block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title(&title))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let input_area = input_block.inner(inner[0]);
        f.render_widget(input_block, inner[0]);
        f.render_widget(
            Paragraph::new(self.input.as_str()).style(Style::default().bg(BG_PANEL)),
            input_area,
        );
        if input_area.width > 0 {
            let column = min(self.input.cursor_column() as u16, input_area.width - 1);
            f.set_cursor(input_area.x + column, input_area.y);
        }

        let mut lines: Vec<Line> = Vec::new();
        if self.input_mode == InputMode::Command {
            for (i, s) in self.suggestions.iter().enumerate() {
                let style = if i == self.suggestion_index {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                lines.push(Line::from(vec![
                    Span::styled(s.fill.as_str(), style.add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(s.label.as_str(), Style::default().fg(Color::DarkGray)),
                ]));
            }
            if lines.is_empty() {
                lines.push(Line::from(Span::styled(
                    "No matching commands",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        } else {
            lines.push(Line::from(Span::styled(
                "Text is trimmed; blank input adds nothing.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        f.render_widget(Clear, inner[1]);
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .style(Style::default().bg(BG_PANEL)),
            inner[1],
        );
    }

    fn draw_help_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = build_help_lines();
        let width = min(area.width.saturating_sub(10), 80);
        let height = min(lines.len() as u16 + 4, area.height.saturating_sub(2)).max(10);
        let popup_area = centered_rect(width, height, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("⌨️ Keyboard Reference"))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);
        if inner.width < 3 || inner.height < 3 {
            return;
        }

        let help_lines: Vec<Line> = lines
            .into_iter()
            .map(|(combo, desc)| {
                Line::from(vec![
                    Span::styled(format!("{:<16}", combo), Style::default().fg(Color::Cyan)),
                    Span::raw(desc),
                ])
            })
            .collect();
        f.render_widget(
            Paragraph::new(help_lines)
                .wrap(Wrap { trim: true })
                .style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }

    fn draw_confirm_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let width = min(area.width.saturating_sub(20), 60).max(40);
        let popup_area = centered_rect(width, 8, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("🧹 Clear Day"))
            .border_style(Style::default().fg(Color::Red))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let state = self.state();
        let count = state.active_bucket().len();
        let yes_style = if self.confirm_choice == ConfirmChoice::Yes {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red)
        };
        let no_style = if self.confirm_choice == ConfirmChoice::No {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let lines = vec![
            Line::from(vec![Span::styled(
                "This action cannot be undone.",
                Style::default().fg(Color::Red),
            )]),
            Line::from(vec![Span::styled(
                format!(
                    "Remove all {} task{} from {}?",
                    count,
                    if count == 1 { "" } else { "s" },
                    state.active().long_label()
                ),
                Style::default().fg(Color::White),
            )]),
            Line::default(),
            Line::from(vec![
                Span::styled("  Yes  ", yes_style),
                Span::raw("    "),
                Span::styled("  No  ", no_style),
            ]),
        ];
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }
}
