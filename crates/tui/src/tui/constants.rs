use std::time::Duration;

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const TICK_RATE: Duration = Duration::from_millis(200);
pub(crate) const STATUS_TTL: Duration = Duration::from_secs(5);

pub(crate) const COMMAND_HELP: &str = concat!(
    "Commands: /help, /add <text>, /next <text>, /done, /delete, /clear done|all, ",
    "/import, /filter all|active|done, /day <mon..sun|today>, /quit"
);

pub(crate) const STATUS_ENTER_ADD: &str = "Type the task and press Enter (Esc to cancel)";
pub(crate) const STATUS_ENTER_ADD_NEXT: &str =
    "Type a task for the next day and press Enter (Esc to cancel)";
pub(crate) const STATUS_ENTER_EDIT: &str =
    "Edit task • Enter to save • Esc to cancel • an empty edit keeps the old text";
pub(crate) const STATUS_COMMAND_PALETTE: &str =
    "Type a /command • Up/Down: navigate • Tab/Right: complete • Enter: run • Esc: cancel";
pub(crate) const STATUS_HELP: &str = "Keyboard reference • Enter/Esc to close";
pub(crate) const STATUS_CONFIRM_CLEAR_ALL: &str =
    "Confirm clearing the day • arrows choose, Enter confirms, Esc cancels";
pub(crate) const STATUS_MOVE: &str = "Moving task • j/k or ↑/↓ to move • Enter/Esc/m to drop";
