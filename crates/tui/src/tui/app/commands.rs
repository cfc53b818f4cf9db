use crate::cli::DaySpec;
use crate::core::services::Action;
use crate::model::Filter;
use crate::tui::constants::COMMAND_HELP;

use super::{AddTarget, App, InputMode};

#[derive(Debug, Clone)]
pub(crate) struct Suggestion {
    pub(crate) fill: String,
    pub(crate) label: String,
}

impl Suggestion {
    fn new(fill: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            fill: fill.into(),
            label: label.into(),
        }
    }
}

impl App {
    pub(crate) fn run_command(&mut self) {
        let raw = self.input.as_str().trim().to_string();
        self.finish_command();

        let Some(body) = raw.strip_prefix('/') else {
            self.set_status_error("Commands must start with '/'");
            return;
        };
        let (cmd, rest) = split_command(body);
        if cmd.is_empty() {
            self.set_status_error("Enter a command after '/'");
            return;
        }

        match cmd.as_str() {
            "help" | "h" => self.set_status_info(COMMAND_HELP),
            "add" | "next" => {
                if rest.is_empty() {
                    self.set_status_error(format!("Usage: /{} <task description>", cmd));
                    return;
                }
                self.add_target = if cmd == "add" {
                    AddTarget::ActiveDay
                } else {
                    AddTarget::NextDay
                };
                self.input.set(rest);
                self.add_task();
            }
            "done" | "toggle" => self.toggle_selected(),
            "delete" | "del" | "rm" => self.delete_selected(),
            "clear" => match rest.to_ascii_lowercase().as_str() {
                "" | "done" | "completed" => self.clear_completed(),
                "all" => self.prompt_clear_all(),
                other => self.set_status_error(format!(
                    "Unknown clear target '{}'; use done or all",
                    other
                )),
            },
            "import" | "rollover" => self.import_unfinished(),
            "filter" => {
                if rest.is_empty() {
                    self.cycle_filter();
                    return;
                }
                match rest.parse::<Filter>() {
                    Ok(filter) => {
                        self.apply(Action::SetFilter(filter));
                        self.select_row(0);
                        self.set_status_info(format!("Showing {} tasks", filter));
                    }
                    Err(err) => self.set_status_error(err.to_string()),
                }
            }
            "day" => {
                if rest.is_empty() {
                    self.set_status_error("Usage: /day <today|mon..sun|YYYY-MM-DD>");
                    return;
                }
                match rest.parse::<DaySpec>() {
                    Ok(DaySpec::Today) => self.change_day(Action::SelectToday),
                    Ok(DaySpec::Weekday(index)) => self.change_day(Action::SelectDay(index)),
                    Ok(DaySpec::Date(date)) => match self.state().week.position(date) {
                        Some(index) => self.change_day(Action::SelectDay(index)),
                        None => self.set_status_error(format!(
                            "{} is outside this week ({})",
                            date.format("%Y-%m-%d"),
                            self.state().week.range_label()
                        )),
                    },
                    Err(err) => self.set_status_error(err.to_string()),
                }
            }
            "quit" | "q" | "exit" => self.should_quit = true,
            unknown => {
                self.set_status_error(format!("Unknown command: {} (try /help)", unknown));
            }
        }
    }

    pub(crate) fn finish_command(&mut self) {
        self.input.clear();
        self.suggestions.clear();
        self.suggestion_index = 0;
        self.input_mode = InputMode::Normal;
    }

    pub(crate) fn update_command_suggestions(&mut self) {
        self.suggestions = build_command_suggestions(self.input.as_str());
        if self.suggestion_index >= self.suggestions.len() {
            self.suggestion_index = 0;
        }
    }

    pub(crate) fn accept_suggestion(&mut self) {
        if let Some(s) = self.suggestions.get(self.suggestion_index) {
            self.input.set(s.fill.clone());
            self.update_command_suggestions();
        }
    }
}

/// Split `body` into its lowercased command word and the trimmed text after it. Spacing
/// inside the text is kept as typed.
fn split_command(body: &str) -> (String, &str) {
    let body = body.trim_start();
    let (cmd, rest) = body.split_once(char::is_whitespace).unwrap_or((body, ""));
    (cmd.to_ascii_lowercase(), rest.trim())
}

fn base_commands() -> Vec<Suggestion> {
    vec![
        Suggestion::new("/add ", "➕ Add a task to the selected day"),
        Suggestion::new("/next ", "⏭️ Add a task to the following day"),
        Suggestion::new("/done", "✅ Toggle the selected task"),
        Suggestion::new("/delete", "🗑️ Delete the selected task"),
        Suggestion::new("/clear ", "🧹 Clear completed or all tasks"),
        Suggestion::new("/import", "📥 Copy unfinished tasks from the previous day"),
        Suggestion::new("/filter ", "🔍 Show all, active or done tasks"),
        Suggestion::new("/day ", "📅 Jump to a day of this week"),
        Suggestion::new("/help", "❓ Show available commands"),
        Suggestion::new("/quit", "🚪 Quit the application"),
    ]
}

pub(crate) fn build_command_suggestions(raw: &str) -> Vec<Suggestion> {
    let Some(without) = raw.strip_prefix('/') else {
        return Vec::new();
    };
    let has_argument = without.trim_start().contains(char::is_whitespace);
    let (first, rest) = split_command(without);

    if !has_argument {
        return base_commands()
            .into_iter()
            .filter(|s| s.fill[1..].starts_with(&first))
            .collect();
    }

    let partial = rest.to_ascii_lowercase();
    let complete = |command: &str, options: &[(&str, &str)]| -> Vec<Suggestion> {
        options
            .iter()
            .filter(|(name, _)| partial.is_empty() || name.starts_with(&partial))
            .map(|(name, desc)| Suggestion::new(format!("/{} {}", command, name), *desc))
            .collect()
    };

    match first.as_str() {
        "add" | "next" => {
            if partial.is_empty() {
                vec![Suggestion::new(format!("/{} ", first), "Enter task text…")]
            } else {
                vec![Suggestion::new(
                    format!("/{} {}", first, rest),
                    "Add this task",
                )]
            }
        }
        "clear" => complete(
            "clear",
            &[
                ("done", "Remove completed tasks"),
                ("all", "Remove every task of the day"),
            ],
        ),
        "filter" => complete(
            "filter",
            &[
                ("all", "Every task"),
                ("active", "Open tasks only"),
                ("done", "Completed tasks only"),
            ],
        ),
        "day" => complete(
            "day",
            &[
                ("today", "Back to today"),
                ("mon", "Monday"),
                ("tue", "Tuesday"),
                ("wed", "Wednesday"),
                ("thu", "Thursday"),
                ("fri", "Friday"),
                ("sat", "Saturday"),
                ("sun", "Sunday"),
            ],
        ),
        _ => Vec::new(),
    }
}
