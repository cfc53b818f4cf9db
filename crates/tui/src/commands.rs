use std::fmt;
use std::io::Write;

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};

use crate::cli::{AddArgs, CliCommand, DaySpec, ListArgs, RolloverArgs};
use crate::config::AppConfig;
use crate::core::services::{Action, Change, PlannerService, PlannerState};
use crate::model::Filter;
use crate::week::WeekWindow;

pub fn execute<W: Write>(
    config: &AppConfig,
    command: CliCommand,
    today: NaiveDate,
    mut writer: W,
) -> Result<()> {
    match command {
        CliCommand::List(args) => handle_list(config, &args, today, &mut writer),
        CliCommand::Add(args) => handle_add(config, &args, today, &mut writer),
        CliCommand::Rollover(args) => handle_rollover(config, &args, today, &mut writer),
        CliCommand::Tui => Err(anyhow!("launch interactive surfaces directly")),
    }
}

/// Index of the requested day inside the week of `today`.
pub fn resolve_day(spec: Option<DaySpec>, week: &WeekWindow, today: NaiveDate) -> Result<usize> {
    match spec.unwrap_or(DaySpec::Today) {
        DaySpec::Today => Ok(WeekWindow::index_of(today)),
        DaySpec::Weekday(index) => Ok(index),
        DaySpec::Date(date) => week.position(date).ok_or_else(|| {
            anyhow!(
                "{} is outside this week ({})",
                date.format("%Y-%m-%d"),
                week.range_label()
            )
        }),
    }
}

fn open_at(
    config: &AppConfig,
    spec: Option<DaySpec>,
    today: NaiveDate,
) -> Result<PlannerService> {
    let mut service = PlannerService::open(config.clone(), today)?;
    let index = resolve_day(spec, &service.state().week, today)?;
    service.dispatch(Action::SelectDay(index), Utc::now())?;
    Ok(service)
}

fn handle_list<W: Write>(
    config: &AppConfig,
    args: &ListArgs,
    today: NaiveDate,
    mut writer: W,
) -> Result<()> {
    let mut service = open_at(config, args.day, today)?;
    service.dispatch(Action::SetFilter(args.filter), Utc::now())?;
    let state = service.state();

    writeln!(writer, "Week of {}", state.week.range_label())?;
    let indices: Vec<usize> = match args.day {
        Some(_) => vec![state.active_day],
        None => (0..state.week.days().len()).collect(),
    };
    for index in indices {
        write_day(state, index, args.filter, &mut writer)?;
    }
    Ok(())
}

fn write_day<W: Write>(
    state: &PlannerState,
    index: usize,
    filter: Filter,
    mut writer: W,
) -> Result<()> {
    let day = state.week.day(index);
    let bucket = state.tasks.get(&day.key);
    let stats = state.tasks.stats(&day.key);
    let marker = if Some(index) == state.today_index() {
        " (today)"
    } else {
        ""
    };
    writeln!(
        writer,
        "{}{}  {} open, {} done",
        day.short_label(),
        marker,
        stats.active,
        stats.done
    )?;
    for task in bucket.iter().filter(|task| filter.matches(task)) {
        writeln!(
            writer,
            "  [{}] {}",
            if task.done { 'x' } else { ' ' },
            task.text
        )?;
    }
    Ok(())
}

fn handle_add<W: Write>(
    config: &AppConfig,
    args: &AddArgs,
    today: NaiveDate,
    mut writer: W,
) -> Result<()> {
    let mut service = open_at(config, args.day, today)?;
    let text = args.text.join(" ");
    let action = if args.next_day {
        Action::AddToNextDay(text.clone())
    } else {
        Action::Add(text.clone())
    };
    let change = service.dispatch(action, Utc::now())?;
    let line = match change {
        Change::Added { day, .. } => {
            let label = service
                .state()
                .week
                .days()
                .iter()
                .find(|week_day| week_day.key == day)
                .map(|week_day| week_day.long_label())
                .unwrap_or_else(|| day.to_string());
            Summary::Added {
                text: text.trim().to_string(),
                day: label,
            }
        }
        _ => Summary::NothingAdded,
    };
    writeln!(writer, "{}", line)?;
    Ok(())
}

fn handle_rollover<W: Write>(
    config: &AppConfig,
    args: &RolloverArgs,
    today: NaiveDate,
    mut writer: W,
) -> Result<()> {
    let mut service = open_at(config, args.day, today)?;
    let from = service
        .state()
        .week
        .day(crate::week::previous_index(service.state().active_day))
        .long_label();
    let into = service.state().active().long_label();
    let change = service.dispatch(Action::ImportUnfinished, Utc::now())?;
    let count = match change {
        Change::Imported { count, .. } => count,
        _ => 0,
    };
    writeln!(writer, "{}", Summary::RolledOver { count, from, into })?;
    Ok(())
}

enum Summary {
    Added { text: String, day: String },
    NothingAdded,
    RolledOver { count: usize, from: String, into: String },
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::Added { text, day } => write!(f, "Added '{}' to {}", text, day),
            Summary::NothingAdded => write!(f, "Nothing added: task text is empty"),
            Summary::RolledOver { count: 0, from, .. } => {
                write!(f, "No unfinished tasks on {}", from)
            }
            Summary::RolledOver { count, from, into } => write!(
                f,
                "Copied {} unfinished task{} from {} into {}",
                count,
                if *count == 1 { "" } else { "s" },
                from,
                into
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::week::week_dates;
    use tempfile::TempDir;

    fn temp_config() -> (AppConfig, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");
        (config, dir)
    }

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn run(config: &AppConfig, command: CliCommand) -> String {
        let mut output = Vec::new();
        execute(config, command, wednesday(), &mut output).expect("execute");
        String::from_utf8(output).expect("utf8")
    }

    fn add(text: &str, day: Option<DaySpec>, next_day: bool) -> CliCommand {
        CliCommand::Add(AddArgs {
            text: text.split_whitespace().map(String::from).collect(),
            day,
            next_day,
        })
    }

    #[test]
    fn resolve_day_handles_names_and_dates() {
        let week = week_dates(wednesday());
        assert_eq!(resolve_day(None, &week, wednesday()).unwrap(), 2);
        assert_eq!(
            resolve_day(Some(DaySpec::Weekday(6)), &week, wednesday()).unwrap(),
            6
        );
        let monday = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        assert_eq!(
            resolve_day(Some(DaySpec::Date(monday)), &week, wednesday()).unwrap(),
            0
        );
        let outside = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        assert!(resolve_day(Some(DaySpec::Date(outside)), &week, wednesday()).is_err());
    }

    #[test]
    fn add_then_list_shows_task_under_its_day() {
        let (config, _dir) = temp_config();
        let output = run(&config, add("Write report", None, false));
        assert!(output.contains("Added 'Write report' to Wednesday 2026-10-14"));

        let output = run(
            &config,
            CliCommand::List(ListArgs {
                day: None,
                filter: Filter::All,
            }),
        );
        assert!(output.contains("Week of Oct 12"));
        assert!(output.contains("Wed 14 (today)  1 open, 0 done"));
        assert!(output.contains("  [ ] Write report"));
    }

    #[test]
    fn add_next_day_wraps_inside_the_week() {
        let (config, _dir) = temp_config();
        let output = run(&config, add("Plan week", Some(DaySpec::Weekday(6)), true));
        assert!(output.contains("Monday 2026-10-12"));
    }

    #[test]
    fn blank_add_reports_nothing_added() {
        let (config, _dir) = temp_config();
        let output = run(
            &config,
            CliCommand::Add(AddArgs {
                text: vec!["   ".into()],
                day: None,
                next_day: false,
            }),
        );
        assert!(output.contains("Nothing added"));
    }

    #[test]
    fn rollover_copies_unfinished_tasks_from_previous_day() {
        let (config, _dir) = temp_config();
        run(&config, add("Carry me", Some(DaySpec::Weekday(1)), false));

        let output = run(&config, CliCommand::Rollover(RolloverArgs { day: None }));
        assert!(output.contains("Copied 1 unfinished task from Tuesday"));

        let output = run(
            &config,
            CliCommand::List(ListArgs {
                day: Some(DaySpec::Today),
                filter: Filter::Active,
            }),
        );
        assert!(output.contains("[ ] Carry me"));
        assert!(!output.contains("Tue 13"));
    }

    #[test]
    fn rollover_without_open_tasks_says_so() {
        let (config, _dir) = temp_config();
        let output = run(&config, CliCommand::Rollover(RolloverArgs { day: None }));
        assert!(output.contains("No unfinished tasks on Tuesday 2026-10-13"));
    }
}
