use std::time::Instant;

use chrono::Utc;
use ratatui::style::{Color, Style};
use ratatui::widgets::TableState;

use super::buffer::TextBuffer;
use super::constants::*;
use crate::core::services::{Action, Change, PlannerService, PlannerState};
use crate::model::Task;

mod commands;
mod input;
mod render;

use commands::Suggestion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Add,
    Edit,
    Command,
    Help,
    ConfirmClearAll,
    Move,
}

/// Which day a new task lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddTarget {
    ActiveDay,
    NextDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmChoice {
    Yes,
    No,
}

impl ConfirmChoice {
    fn toggle(self) -> Self {
        match self {
            ConfirmChoice::Yes => ConfirmChoice::No,
            ConfirmChoice::No => ConfirmChoice::Yes,
        }
    }
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    kind: StatusKind,
    created_at: Instant,
}

impl StatusMessage {
    fn new<T: Into<String>>(text: T, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    fn style(&self) -> Style {
        match self.kind {
            StatusKind::Info => Style::default().fg(Color::Cyan),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusKind {
    Info,
    Error,
}

pub(crate) struct App {
    service: PlannerService,
    first_run: bool,
    selected: usize,
    table_state: TableState,
    input_mode: InputMode,
    add_target: AddTarget,
    input: TextBuffer,
    suggestions: Vec<Suggestion>,
    suggestion_index: usize,
    status: Option<StatusMessage>,
    editing_task_id: Option<String>,
    confirm_choice: ConfirmChoice,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(service: PlannerService, first_run: bool) -> Self {
        let mut app = Self {
            service,
            first_run,
            selected: 0,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            add_target: AddTarget::ActiveDay,
            input: TextBuffer::new(),
            suggestions: Vec::new(),
            suggestion_index: 0,
            status: None,
            editing_task_id: None,
            confirm_choice: ConfirmChoice::No,
            should_quit: false,
        };
        app.sync_selection();
        app
    }

    fn state(&self) -> &PlannerState {
        self.service.state()
    }

    fn visible_len(&self) -> usize {
        self.state().visible().len()
    }

    fn selected_task(&self) -> Option<Task> {
        self.state()
            .visible()
            .get(self.selected)
            .map(|row| row.task.clone())
    }

    /// Run an action through the planner. Save failures are reported in the status bar;
    /// the returned change is `None` in that case.
    fn apply(&mut self, action: Action) -> Option<Change> {
        let result = self.service.dispatch(action, Utc::now());
        let change = match result {
            Ok(change) => Some(change),
            Err(err) => {
                self.set_status_error(format!("Could not save tasks: {:#}", err));
                None
            }
        };
        if self.first_run && !self.state().tasks.is_empty() {
            self.first_run = false;
        }
        self.sync_selection();
        change
    }

    /// Keep the selection inside the visible rows.
    fn sync_selection(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.selected = 0;
            self.table_state.select(None);
        } else {
            if self.selected >= len {
                self.selected = len - 1;
            }
            self.table_state.select(Some(self.selected));
        }
    }

    fn select_row(&mut self, row: usize) {
        self.selected = row;
        self.sync_selection();
    }

    fn select_task_by_id(&mut self, id: &str) {
        let position = self
            .state()
            .visible()
            .iter()
            .position(|row| row.task.id == id);
        if let Some(row) = position {
            self.select_row(row);
        }
    }

    pub(crate) fn on_tick(&mut self) {
        if let Some(status) = &self.status {
            if status.created_at.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn select_next(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        self.select_row((self.selected + 1).min(len - 1));
    }

    fn select_prev(&mut self) {
        self.select_row(self.selected.saturating_sub(1));
    }

    fn change_day(&mut self, action: Action) {
        if let Some(Change::DaySelected(_)) = self.apply(action) {
            self.select_row(0);
            self.status = None;
        }
    }

    fn cycle_filter(&mut self) {
        if let Some(Change::FilterChanged(filter)) = self.apply(Action::CycleFilter) {
            self.select_row(0);
            self.set_status_info(format!("Showing {} tasks", filter));
        }
    }

    fn begin_add(&mut self, target: AddTarget) {
        self.add_target = target;
        self.input.clear();
        self.input_mode = InputMode::Add;
        self.set_status_info(match target {
            AddTarget::ActiveDay => STATUS_ENTER_ADD,
            AddTarget::NextDay => STATUS_ENTER_ADD_NEXT,
        });
    }

    /// Submit the add prompt. Blank input keeps the prompt open and creates nothing.
    fn add_task(&mut self) {
        if self.input.is_blank() {
            return;
        }
        let text = self.input.as_str().trim().to_string();
        let action = match self.add_target {
            AddTarget::ActiveDay => Action::Add(text.clone()),
            AddTarget::NextDay => Action::AddToNextDay(text.clone()),
        };
        self.input.clear();
        self.input_mode = InputMode::Normal;
        if let Some(Change::Added { day, id }) = self.apply(action) {
            if day == self.state().active_key() {
                self.select_task_by_id(&id);
                self.set_status_info(format!("Added '{}'", text));
            } else {
                let label = self
                    .state()
                    .week
                    .days()
                    .iter()
                    .find(|week_day| week_day.key == day)
                    .map(|week_day| week_day.short_label())
                    .unwrap_or_else(|| day.to_string());
                self.set_status_info(format!("Added '{}' to {}", text, label));
            }
        }
    }

    fn toggle_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            self.set_status_info("Nothing to toggle");
            return;
        };
        if let Some(Change::Toggled { id, done }) = self.apply(Action::Toggle(task.id)) {
            self.select_task_by_id(&id);
            if done {
                self.set_status_info(format!("Completed '{}' ✅", task.text));
            } else {
                self.set_status_info(format!("Reopened '{}'", task.text));
            }
        }
    }

    fn start_edit_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            self.set_status_info("Nothing to edit");
            return;
        };
        self.input.set(task.text);
        self.editing_task_id = Some(task.id);
        self.input_mode = InputMode::Edit;
        self.set_status_info(STATUS_ENTER_EDIT);
    }

    /// Save the edit prompt. A blank edit keeps the task's previous text.
    fn apply_edit(&mut self) {
        let Some(id) = self.editing_task_id.take() else {
            self.input_mode = InputMode::Normal;
            return;
        };
        let text = self.input.as_str().trim().to_string();
        self.input.clear();
        self.input_mode = InputMode::Normal;

        if text.is_empty() {
            self.set_status_info("Empty edit discarded; kept the previous text");
            return;
        }
        match self.apply(Action::Edit {
            id: id.clone(),
            text: text.clone(),
        }) {
            Some(Change::Edited { .. }) => {
                self.select_task_by_id(&id);
                self.set_status_info(format!("Updated '{}'", text));
            }
            Some(_) => self.set_status_info("No changes"),
            None => {}
        }
    }

    fn cancel_edit(&mut self) {
        self.editing_task_id = None;
        self.input.clear();
        self.input_mode = InputMode::Normal;
        self.status = None;
    }

    fn delete_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            self.set_status_info("Nothing to delete");
            return;
        };
        if let Some(Change::Removed { .. }) = self.apply(Action::Remove(task.id)) {
            self.set_status_info(format!("Deleted '{}' 🗑️", task.text));
        }
    }

    fn clear_completed(&mut self) {
        match self.apply(Action::ClearCompleted) {
            Some(Change::Cleared { removed, .. }) => self.set_status_info(format!(
                "Cleared {} completed task{}",
                removed,
                if removed == 1 { "" } else { "s" }
            )),
            Some(_) => self.set_status_info("No completed tasks to clear"),
            None => {}
        }
    }

    fn prompt_clear_all(&mut self) {
        if self.state().active_bucket().is_empty() {
            self.set_status_info("Nothing to clear");
            return;
        }
        self.confirm_choice = ConfirmChoice::No;
        self.input_mode = InputMode::ConfirmClearAll;
        self.set_status_info(STATUS_CONFIRM_CLEAR_ALL);
    }

    fn clear_all(&mut self) {
        if let Some(Change::Cleared { removed, .. }) = self.apply(Action::ClearAll) {
            let label = self.state().active().short_label();
            self.set_status_info(format!("Cleared {} from {}", removed, label));
        }
    }

    fn import_unfinished(&mut self) {
        let from = self
            .state()
            .week
            .day(crate::week::previous_index(self.state().active_day))
            .short_label();
        match self.apply(Action::ImportUnfinished) {
            Some(Change::Imported { count, .. }) => {
                self.select_row(0);
                self.set_status_info(format!(
                    "Copied {} unfinished task{} from {}",
                    count,
                    if count == 1 { "" } else { "s" },
                    from
                ));
            }
            Some(_) => self.set_status_info(format!("No unfinished tasks on {}", from)),
            None => {}
        }
    }

    /// Shift the selected row by `delta` rows within the visible list.
    fn move_selected(&mut self, delta: isize) {
        let len = self.visible_len();
        if len < 2 {
            return;
        }
        let from = self.selected;
        let to = from.saturating_add_signed(delta).min(len - 1);
        if to == from {
            return;
        }
        if let Some(Change::Reordered { .. }) = self.apply(Action::MoveVisible { from, to }) {
            self.select_row(to);
        }
    }

    fn begin_move(&mut self) {
        if self.visible_len() < 2 {
            self.set_status_info("Need at least two tasks to reorder");
            return;
        }
        self.input_mode = InputMode::Move;
        self.set_status_info(STATUS_MOVE);
    }

    fn end_move(&mut self) {
        self.input_mode = InputMode::Normal;
        self.set_status_info("Dropped task");
    }

    fn show_help_overlay(&mut self) {
        self.input_mode = InputMode::Help;
        self.set_status_info(STATUS_HELP);
    }

    pub(crate) fn set_status_info<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("ℹ️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text, StatusKind::Info));
    }

    pub(crate) fn set_status_error<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("⚠️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text, StatusKind::Error));
    }
}
