use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::services::Action;
use crate::tui::constants::STATUS_COMMAND_PALETTE;

use super::{AddTarget, App, ConfirmChoice, InputMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NormalAction {
    Quit,
    EnterAdd(AddTarget),
    EnterEdit,
    EnterCommand,
    ShowHelp,
    Toggle,
    Delete,
    ClearCompleted,
    ClearAll,
    ImportUnfinished,
    CycleFilter,
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    PrevDay,
    NextDay,
    JumpToDay(usize),
    Today,
    MoveDown,
    MoveUp,
    Grab,
}

impl NormalAction {
    pub(crate) fn from_event(key: &KeyEvent) -> Option<Self> {
        if matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Self::Quit);
        }

        match key.code {
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Char('a') => Some(Self::EnterAdd(AddTarget::ActiveDay)),
            KeyCode::Char('A') => Some(Self::EnterAdd(AddTarget::NextDay)),
            KeyCode::Char('e') | KeyCode::Enter => Some(Self::EnterEdit),
            KeyCode::Char('/') => Some(Self::EnterCommand),
            KeyCode::Char('?') => Some(Self::ShowHelp),
            KeyCode::Char(' ') | KeyCode::Char('d') => Some(Self::Toggle),
            KeyCode::Char('x') | KeyCode::Delete => Some(Self::Delete),
            KeyCode::Char('c') => Some(Self::ClearCompleted),
            KeyCode::Char('C') => Some(Self::ClearAll),
            KeyCode::Char('i') => Some(Self::ImportUnfinished),
            KeyCode::Char('f') => Some(Self::CycleFilter),
            KeyCode::Char('j') | KeyCode::Down => Some(Self::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Self::SelectPrev),
            KeyCode::Char('J') => Some(Self::MoveDown),
            KeyCode::Char('K') => Some(Self::MoveUp),
            KeyCode::Char('m') => Some(Self::Grab),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => Some(Self::PrevDay),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => Some(Self::NextDay),
            KeyCode::Char('t') => Some(Self::Today),
            KeyCode::Char(c @ '1'..='7') => Some(Self::JumpToDay(c as usize - '1' as usize)),
            KeyCode::Home => Some(Self::SelectFirst),
            KeyCode::End => Some(Self::SelectLast),
            _ => None,
        }
    }
}

impl App {
    pub(crate) fn on_key(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_mode(key),
            InputMode::Add => self.handle_add_mode(key),
            InputMode::Edit => self.handle_edit_mode(key),
            InputMode::Command => self.handle_command_mode(key),
            InputMode::Help => self.handle_help_mode(key),
            InputMode::ConfirmClearAll => self.handle_confirm_clear_mode(key),
            InputMode::Move => self.handle_move_mode(key),
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) {
        if let Some(action) = NormalAction::from_event(&key) {
            self.execute_normal_action(action);
        }
    }

    fn execute_normal_action(&mut self, action: NormalAction) {
        match action {
            NormalAction::Quit => self.should_quit = true,
            NormalAction::EnterAdd(target) => self.begin_add(target),
            NormalAction::EnterEdit => self.start_edit_selected(),
            NormalAction::EnterCommand => {
                self.input_mode = InputMode::Command;
                self.input.set("/");
                self.update_command_suggestions();
                self.set_status_info(STATUS_COMMAND_PALETTE);
            }
            NormalAction::ShowHelp => self.show_help_overlay(),
            NormalAction::Toggle => self.toggle_selected(),
            NormalAction::Delete => self.delete_selected(),
            NormalAction::ClearCompleted => self.clear_completed(),
            NormalAction::ClearAll => self.prompt_clear_all(),
            NormalAction::ImportUnfinished => self.import_unfinished(),
            NormalAction::CycleFilter => self.cycle_filter(),
            NormalAction::SelectNext => self.select_next(),
            NormalAction::SelectPrev => self.select_prev(),
            NormalAction::SelectFirst => self.select_row(0),
            NormalAction::SelectLast => {
                let len = self.visible_len();
                self.select_row(len.saturating_sub(1));
            }
            NormalAction::PrevDay => self.change_day(Action::PreviousDay),
            NormalAction::NextDay => self.change_day(Action::NextDay),
            NormalAction::JumpToDay(index) => self.change_day(Action::SelectDay(index)),
            NormalAction::Today => self.change_day(Action::SelectToday),
            NormalAction::MoveDown => self.move_selected(1),
            NormalAction::MoveUp => self.move_selected(-1),
            NormalAction::Grab => self.begin_move(),
        }
    }

    /// Editing keys shared by the add and edit prompts. Returns `false` when the key is not
    /// a text-editing key.
    fn edit_text(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Backspace
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    || key.modifiers.contains(KeyModifiers::ALT) =>
            {
                self.input.delete_word()
            }
            KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.delete_word()
            }
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete_char(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.insert_char(c)
            }
            _ => return false,
        }
        true
    }

    fn handle_add_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.add_task(),
            KeyCode::Esc => {
                self.input.clear();
                self.input_mode = InputMode::Normal;
                self.status = None;
            }
            _ => {
                self.edit_text(key);
            }
        }
    }

    fn handle_edit_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.apply_edit(),
            KeyCode::Esc => self.cancel_edit(),
            _ => {
                self.edit_text(key);
            }
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            self.input_mode = InputMode::Normal;
            self.status = None;
        }
    }

    fn handle_confirm_clear_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => {
                self.input_mode = InputMode::Normal;
                self.set_status_info("Clear cancelled");
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char(' ') => {
                self.confirm_choice = self.confirm_choice.toggle();
            }
            KeyCode::Char('y') => {
                self.input_mode = InputMode::Normal;
                self.clear_all();
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                if self.confirm_choice == ConfirmChoice::Yes {
                    self.clear_all();
                } else {
                    self.set_status_info("Clear cancelled");
                }
            }
            _ => {}
        }
    }

    fn handle_move_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Char('J') => self.move_selected(1),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::Char('K') => self.move_selected(-1),
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('m') => self.end_move(),
            _ => {}
        }
    }

    fn handle_command_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if let Some(s) = self.suggestions.get(self.suggestion_index).cloned() {
                    self.input.set(s.fill.clone());
                    if s.fill.ends_with(' ') {
                        self.update_command_suggestions();
                        return;
                    }
                }
                self.run_command();
            }
            KeyCode::Esc => {
                self.finish_command();
                self.status = None;
            }
            KeyCode::Tab | KeyCode::Right => self.accept_suggestion(),
            KeyCode::Up => {
                if !self.suggestions.is_empty() {
                    if self.suggestion_index == 0 {
                        self.suggestion_index = self.suggestions.len() - 1;
                    } else {
                        self.suggestion_index -= 1;
                    }
                }
            }
            KeyCode::Down => {
                if !self.suggestions.is_empty() {
                    self.suggestion_index = (self.suggestion_index + 1) % self.suggestions.len();
                }
            }
            _ => {
                if self.edit_text(key) {
                    self.update_command_suggestions();
                }
            }
        }
    }
}
