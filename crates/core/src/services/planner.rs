//! Explicit planner state and the single update function that drives it.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

use crate::config::AppConfig;
use crate::database::Database;
use crate::model::{DayKey, Filter, Task, TaskStats};
use crate::ops;
use crate::store::{self, TaskMap};
use crate::view::{self, VisibleTask};
use crate::week::{self, WeekDay, WeekWindow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerState {
    pub tasks: TaskMap,
    pub week: WeekWindow,
    pub today: NaiveDate,
    pub active_day: usize,
    pub filter: Filter,
}

impl PlannerState {
    /// State for a session started on `today`: the week around it, today active, no filter.
    pub fn new(tasks: TaskMap, today: NaiveDate) -> Self {
        Self {
            tasks,
            week: week::week_dates(today),
            today,
            active_day: WeekWindow::index_of(today),
            filter: Filter::All,
        }
    }

    /// Same week, day and filter over a different task mapping.
    pub fn with_tasks(&self, tasks: TaskMap) -> Self {
        Self {
            tasks,
            ..self.clone()
        }
    }

    pub fn active(&self) -> &WeekDay {
        self.week.day(self.active_day)
    }

    pub fn active_key(&self) -> DayKey {
        self.active().key
    }

    pub fn next_key(&self) -> DayKey {
        self.week.day(week::next_index(self.active_day)).key
    }

    pub fn previous_key(&self) -> DayKey {
        self.week.day(week::previous_index(self.active_day)).key
    }

    pub fn today_index(&self) -> Option<usize> {
        self.week.position(self.today)
    }

    pub fn active_bucket(&self) -> &[Task] {
        self.tasks.get(&self.active_key())
    }

    pub fn visible(&self) -> Vec<VisibleTask<'_>> {
        view::project(self.active_bucket(), self.filter)
    }

    pub fn stats(&self) -> TaskStats {
        self.tasks.stats(&self.active_key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectDay(usize),
    NextDay,
    PreviousDay,
    SelectToday,
    SetFilter(Filter),
    CycleFilter,
    Add(String),
    AddToNextDay(String),
    Toggle(String),
    Edit { id: String, text: String },
    Remove(String),
    ClearCompleted,
    ClearAll,
    /// Move between bucket positions.
    Reorder { from: usize, to: usize },
    /// Move between rows of the filtered view.
    MoveVisible { from: usize, to: usize },
    ImportUnfinished,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SelectDay(_) => "select_day",
            Action::NextDay => "next_day",
            Action::PreviousDay => "previous_day",
            Action::SelectToday => "select_today",
            Action::SetFilter(_) => "set_filter",
            Action::CycleFilter => "cycle_filter",
            Action::Add(_) => "add",
            Action::AddToNextDay(_) => "add_to_next_day",
            Action::Toggle(_) => "toggle",
            Action::Edit { .. } => "edit",
            Action::Remove(_) => "remove",
            Action::ClearCompleted => "clear_completed",
            Action::ClearAll => "clear_all",
            Action::Reorder { .. } => "reorder",
            Action::MoveVisible { .. } => "move_visible",
            Action::ImportUnfinished => "import_unfinished",
        }
    }
}

/// What an action did, for status lines and CLI summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Unchanged,
    DaySelected(DayKey),
    FilterChanged(Filter),
    Added { day: DayKey, id: String },
    Toggled { id: String, done: bool },
    Edited { id: String },
    Removed { id: String },
    Cleared { day: DayKey, removed: usize },
    Reordered { day: DayKey },
    Imported { from: DayKey, into: DayKey, count: usize },
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: PlannerState,
    pub change: Change,
    /// Day whose bucket was rewritten; `Some` means the mapping must be persisted.
    pub dirty_day: Option<DayKey>,
}

impl Transition {
    fn unchanged(state: &PlannerState) -> Self {
        Self {
            state: state.clone(),
            change: Change::Unchanged,
            dirty_day: None,
        }
    }

    fn navigated(state: PlannerState, change: Change) -> Self {
        Self {
            state,
            change,
            dirty_day: None,
        }
    }
}

/// Apply `action` to `state`, returning the next state. `now` stamps newly created tasks.
pub fn reduce(state: &PlannerState, action: Action, now: DateTime<Utc>) -> Transition {
    match action {
        Action::SelectDay(index) => {
            if index >= week::DAYS_IN_WEEK {
                return Transition::unchanged(state);
            }
            select_day(state, index)
        }
        Action::NextDay => select_day(state, week::next_index(state.active_day)),
        Action::PreviousDay => select_day(state, week::previous_index(state.active_day)),
        Action::SelectToday => match state.today_index() {
            Some(index) => select_day(state, index),
            None => Transition::unchanged(state),
        },
        Action::SetFilter(filter) => {
            let mut next = state.clone();
            next.filter = filter;
            Transition::navigated(next, Change::FilterChanged(filter))
        }
        Action::CycleFilter => reduce(state, Action::SetFilter(state.filter.cycle()), now),
        Action::Add(text) => {
            let day = state.active_key();
            add_to(state, day, &text, now)
        }
        Action::AddToNextDay(text) => {
            let day = state.next_key();
            add_to(state, day, &text, now)
        }
        Action::Toggle(id) => {
            let day = state.active_key();
            let bucket = ops::toggle(state.tasks.get(&day), &id);
            let done = bucket.iter().find(|task| task.id == id).map(|task| task.done);
            match done {
                Some(done) => rewrite(state, day, bucket, Change::Toggled { id, done }),
                None => Transition::unchanged(state),
            }
        }
        Action::Edit { id, text } => {
            let day = state.active_key();
            let bucket = ops::edit(state.tasks.get(&day), &id, &text);
            rewrite(state, day, bucket, Change::Edited { id })
        }
        Action::Remove(id) => {
            let day = state.active_key();
            let bucket = ops::remove(state.tasks.get(&day), &id);
            rewrite(state, day, bucket, Change::Removed { id })
        }
        Action::ClearCompleted => {
            let day = state.active_key();
            let current = state.tasks.get(&day);
            let bucket = ops::clear_completed(current);
            let removed = current.len() - bucket.len();
            rewrite(state, day, bucket, Change::Cleared { day, removed })
        }
        Action::ClearAll => {
            let day = state.active_key();
            let current = state.tasks.get(&day);
            let removed = current.len();
            let bucket = ops::clear_all(current);
            rewrite(state, day, bucket, Change::Cleared { day, removed })
        }
        Action::Reorder { from, to } => {
            let day = state.active_key();
            let bucket = ops::reorder(state.tasks.get(&day), from, to);
            rewrite(state, day, bucket, Change::Reordered { day })
        }
        Action::MoveVisible { from, to } => {
            match view::visible_to_bucket_move(&state.visible(), from, to) {
                Some((from, to)) => reduce(state, Action::Reorder { from, to }, now),
                None => Transition::unchanged(state),
            }
        }
        Action::ImportUnfinished => {
            let from = state.previous_key();
            let into = state.active_key();
            let source = state.tasks.get(&from);
            let count = source.iter().filter(|task| !task.done).count();
            let bucket = ops::import_unfinished(source, state.tasks.get(&into), now);
            rewrite(state, into, bucket, Change::Imported { from, into, count })
        }
    }
}

fn select_day(state: &PlannerState, index: usize) -> Transition {
    let mut next = state.clone();
    next.active_day = index;
    let key = next.active_key();
    Transition::navigated(next, Change::DaySelected(key))
}

fn add_to(state: &PlannerState, day: DayKey, text: &str, now: DateTime<Utc>) -> Transition {
    let bucket = ops::add(state.tasks.get(&day), text, now);
    let id = match bucket.first() {
        Some(task) if bucket.len() > state.tasks.get(&day).len() => task.id.clone(),
        _ => return Transition::unchanged(state),
    };
    rewrite(state, day, bucket, Change::Added { day, id })
}

/// Swap in the rewritten bucket, or report no change when it is identical.
fn rewrite(state: &PlannerState, day: DayKey, bucket: Vec<Task>, change: Change) -> Transition {
    if bucket.as_slice() == state.tasks.get(&day) {
        return Transition::unchanged(state);
    }
    let mut next = state.clone();
    next.tasks = state.tasks.set(day, bucket);
    Transition {
        state: next,
        change,
        dirty_day: Some(day),
    }
}

/// Planner state paired with its storage; every mutating action is written through.
pub struct PlannerService {
    config: AppConfig,
    database: Database,
    state: PlannerState,
}

impl PlannerService {
    pub fn open(config: AppConfig, today: NaiveDate) -> Result<Self> {
        let database = Database::initialize(&config)?;
        let tasks = store::load(&database)?;
        let state = PlannerState::new(tasks, today);
        tracing::info!(
            week = %state.week.range_label(),
            active = %state.active_key(),
            "planner session opened"
        );
        Ok(Self {
            config,
            database,
            state,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    /// Apply `action`. A mutation is replayed on the stored mapping under the write lock,
    /// so tasks written by another process since the last read are kept. The in-memory
    /// state advances even when the write fails; the error is returned so callers can
    /// report it.
    pub fn dispatch(&mut self, action: Action, now: DateTime<Utc>) -> Result<Change> {
        let name = action.name();
        let local = reduce(&self.state, action.clone(), now);
        if local.dirty_day.is_none() {
            self.state = local.state;
            return Ok(local.change);
        }

        let synced = self.database.with_write_lock(|database| {
            let stored = store::load(database)?;
            let transition = reduce(&self.state.with_tasks(stored), action, now);
            if let Some(day) = &transition.dirty_day {
                tracing::debug!(action = name, day = %day, "persisting task map");
                store::save(database, &transition.state.tasks)?;
            }
            Ok(transition)
        });

        match synced {
            Ok(transition) => {
                self.state = transition.state;
                Ok(transition.change)
            }
            Err(err) => {
                tracing::error!(action = name, error = %err, "failed to persist task map");
                self.state = local.state;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    // Monday of the week of 2026-10-12.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
    }

    fn apply(state: &PlannerState, action: Action) -> PlannerState {
        reduce(state, action, Utc::now()).state
    }

    fn texts(bucket: &[Task]) -> Vec<&str> {
        bucket.iter().map(|task| task.text.as_str()).collect()
    }

    #[test]
    fn new_state_selects_today_in_its_week() {
        let saturday = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let state = PlannerState::new(TaskMap::new(), saturday);
        assert_eq!(state.active_day, 5);
        assert_eq!(state.week.monday(), monday());
        assert_eq!(state.filter, Filter::All);
    }

    #[test]
    fn day_navigation_wraps_inside_the_week() {
        let state = PlannerState::new(TaskMap::new(), monday());
        let prev = apply(&state, Action::PreviousDay);
        assert_eq!(prev.active_day, 6);
        assert_eq!(prev.active().date, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert_eq!(apply(&prev, Action::NextDay).active_day, 0);

        let jumped = apply(&state, Action::SelectDay(3));
        assert_eq!(jumped.active_day, 3);
        assert_eq!(apply(&jumped, Action::SelectToday).active_day, 0);
        assert_eq!(apply(&jumped, Action::SelectDay(9)).active_day, 3);
    }

    #[test]
    fn add_marks_only_the_active_day_dirty() {
        let state = PlannerState::new(TaskMap::new(), monday());
        let transition = reduce(&state, Action::Add("  Buy milk ".into()), Utc::now());

        assert_eq!(transition.dirty_day, Some(state.active_key()));
        assert_eq!(texts(transition.state.active_bucket()), vec!["Buy milk"]);
        assert!(matches!(transition.change, Change::Added { .. }));
    }

    #[test]
    fn blank_add_changes_nothing() {
        let state = PlannerState::new(TaskMap::new(), monday());
        let transition = reduce(&state, Action::Add("   ".into()), Utc::now());
        assert_eq!(transition.change, Change::Unchanged);
        assert!(transition.dirty_day.is_none());
        assert!(!transition.state.tasks.contains_key(&state.active_key()));
    }

    #[test]
    fn add_to_next_day_keeps_active_day() {
        let state = PlannerState::new(TaskMap::new(), monday());
        let next = apply(&state, Action::AddToNextDay("Prep slides".into()));

        assert_eq!(next.active_day, 0);
        assert!(next.active_bucket().is_empty());
        assert_eq!(texts(next.tasks.get(&next.next_key())), vec!["Prep slides"]);
    }

    #[test]
    fn completed_task_is_not_rolled_over() {
        let state = PlannerState::new(TaskMap::new(), monday());
        let state = apply(&state, Action::Add("Buy milk".into()));
        let id = state.active_bucket()[0].id.clone();
        let state = apply(&state, Action::Toggle(id));
        let state = apply(&state, Action::NextDay);

        let transition = reduce(&state, Action::ImportUnfinished, Utc::now());

        assert!(transition.state.active_bucket().is_empty());
        assert!(transition.dirty_day.is_none());
    }

    #[test]
    fn unfinished_task_is_rolled_over_as_a_new_task() {
        let state = PlannerState::new(TaskMap::new(), monday());
        let state = apply(&state, Action::Add("Write report".into()));
        let original = state.active_bucket()[0].clone();
        let state = apply(&state, Action::SelectDay(1));

        let transition = reduce(&state, Action::ImportUnfinished, Utc::now());
        let tuesday = transition.state.active_bucket();

        assert_eq!(tuesday.len(), 1);
        assert_eq!(tuesday[0].text, "Write report");
        assert!(!tuesday[0].done);
        assert_ne!(tuesday[0].id, original.id);
        assert_eq!(
            transition.state.tasks.get(&state.previous_key()),
            &[original][..]
        );
        assert!(matches!(
            transition.change,
            Change::Imported { count: 1, .. }
        ));
    }

    #[test]
    fn filters_do_not_touch_tasks() {
        let state = PlannerState::new(TaskMap::new(), monday());
        let state = apply(&state, Action::Add("a".into()));
        let state = apply(&state, Action::Add("b".into()));
        let id = state.active_bucket()[0].id.clone();
        let state = apply(&state, Action::Toggle(id));

        let filtered = reduce(&state, Action::SetFilter(Filter::Done), Utc::now());
        assert!(filtered.dirty_day.is_none());
        assert_eq!(filtered.state.tasks, state.tasks);
        assert_eq!(filtered.state.visible().len(), 1);
        assert_eq!(apply(&filtered.state, Action::CycleFilter).filter, Filter::All);
    }

    #[test]
    fn move_visible_reorders_through_filtered_rows() {
        let state = PlannerState::new(TaskMap::new(), monday());
        let state = ["d", "c", "b", "a"]
            .iter()
            .fold(state, |acc, text| apply(&acc, Action::Add((*text).into())));
        let b = state.active_bucket()[1].id.clone();
        let state = apply(&state, Action::Toggle(b));
        let state = apply(&state, Action::SetFilter(Filter::Active));

        let state = apply(&state, Action::MoveVisible { from: 2, to: 0 });
        assert_eq!(texts(state.active_bucket()), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn clear_actions_report_removed_counts() {
        let state = PlannerState::new(TaskMap::new(), monday());
        let state = apply(&state, Action::Add("a".into()));
        let state = apply(&state, Action::Add("b".into()));
        let id = state.active_bucket()[0].id.clone();
        let state = apply(&state, Action::Toggle(id));

        let cleared = reduce(&state, Action::ClearCompleted, Utc::now());
        assert!(matches!(cleared.change, Change::Cleared { removed: 1, .. }));

        let emptied = reduce(&cleared.state, Action::ClearAll, Utc::now());
        assert!(emptied.state.active_bucket().is_empty());
        assert!(emptied.state.tasks.contains_key(&state.active_key()));
    }

    #[test]
    fn service_persists_every_mutation() {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");

        {
            let mut service = PlannerService::open(config.clone(), monday()).expect("open");
            service
                .dispatch(Action::Add("Write report".into()), Utc::now())
                .expect("add");
            service
                .dispatch(Action::AddToNextDay("Ship it".into()), Utc::now())
                .expect("add next");
        }

        let reopened = PlannerService::open(config, monday()).expect("reopen");
        let state = reopened.state();
        assert_eq!(texts(state.active_bucket()), vec!["Write report"]);
        assert_eq!(texts(state.tasks.get(&state.next_key())), vec!["Ship it"]);
    }

    fn temp_config() -> (AppConfig, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");
        (config, dir)
    }

    fn drop_store_table(config: &AppConfig) {
        rusqlite::Connection::open(config.db_path())
            .and_then(|conn| conn.execute_batch("DROP TABLE kv_store;"))
            .expect("drop table");
    }

    #[test]
    fn writes_from_another_session_survive_a_stale_session() {
        let (config, _dir) = temp_config();
        let mut stale = PlannerService::open(config.clone(), monday()).expect("open stale");
        {
            let mut other = PlannerService::open(config.clone(), monday()).expect("open other");
            other
                .dispatch(Action::Add("From the other session".into()), Utc::now())
                .expect("other add");
        }

        stale
            .dispatch(Action::Add("From the stale session".into()), Utc::now())
            .expect("stale add");

        assert_eq!(
            texts(stale.state().active_bucket()),
            vec!["From the stale session", "From the other session"]
        );
        let reopened = PlannerService::open(config, monday()).expect("reopen");
        assert_eq!(
            texts(reopened.state().active_bucket()),
            vec!["From the stale session", "From the other session"]
        );
    }

    #[test]
    fn failed_save_keeps_the_change_in_memory() {
        let (config, _dir) = temp_config();
        let mut service = PlannerService::open(config.clone(), monday()).expect("open");
        drop_store_table(&config);

        let result = service.dispatch(Action::Add("Unsaved".into()), Utc::now());

        assert!(result.is_err());
        assert_eq!(texts(service.state().active_bucket()), vec!["Unsaved"]);
    }

    #[test]
    fn navigation_does_not_touch_storage() {
        let (config, _dir) = temp_config();
        let mut service = PlannerService::open(config.clone(), monday()).expect("open");
        drop_store_table(&config);

        let change = service
            .dispatch(Action::NextDay, Utc::now())
            .expect("navigation needs no storage");

        assert_eq!(change, Change::DaySelected(service.state().active_key()));
    }

    #[test]
    fn open_fails_when_storage_cannot_be_read() {
        let (config, _dir) = temp_config();
        drop(PlannerService::open(config.clone(), monday()).expect("open"));
        rusqlite::Connection::open(config.db_path())
            .and_then(|conn| {
                conn.execute_batch(
                    "DROP TABLE kv_store; CREATE TABLE kv_store (key TEXT PRIMARY KEY);",
                )
            })
            .expect("replace table");

        assert!(PlannerService::open(config, monday()).is_err());
    }
}
