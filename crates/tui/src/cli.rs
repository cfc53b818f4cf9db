use std::path::PathBuf;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::model::{DayKey, Filter};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "weekdo",
    version,
    about = "A keyboard-first weekly to-do list for the terminal.",
    after_help = "Examples:\n  weekdo                      Launch the TUI (same as `weekdo tui`)\n  weekdo add Buy milk         Add a task to today\n  weekdo add --day fri Demo   Add a task to Friday of this week\n  weekdo rollover             Copy yesterday's unfinished tasks into today\n  weekdo list --filter active"
)]
pub struct Cli {
    /// Override the data directory (defaults to platform-specific app dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Tracing filter for the log file (e.g. "info", "weekdo_core=debug")
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Launch the keyboard-first terminal UI (default command)
    Tui,
    /// Print this week's tasks
    List(ListArgs),
    /// Add a task to a day of this week
    Add(AddArgs),
    /// Copy unfinished tasks from the previous day into a day
    Rollover(RolloverArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only print one day (today, mon..sun, or YYYY-MM-DD)
    #[arg(long, value_name = "DAY")]
    pub day: Option<DaySpec>,

    /// Which tasks to show
    #[arg(long, value_enum, default_value_t = Filter::All)]
    pub filter: Filter,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Task text
    #[arg(value_name = "TEXT", required = true)]
    pub text: Vec<String>,

    /// Target day (today, mon..sun, or YYYY-MM-DD); defaults to today
    #[arg(long, value_name = "DAY")]
    pub day: Option<DaySpec>,

    /// Add to the day after the target day instead
    #[arg(long = "next-day")]
    pub next_day: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RolloverArgs {
    /// Day receiving the tasks; defaults to today
    #[arg(long, value_name = "DAY")]
    pub day: Option<DaySpec>,
}

/// A day of the current week as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySpec {
    Today,
    /// Monday = 0 … Sunday = 6
    Weekday(usize),
    Date(NaiveDate),
}

const WEEKDAY_NAMES: [(&str, &str); 7] = [
    ("mon", "monday"),
    ("tue", "tuesday"),
    ("wed", "wednesday"),
    ("thu", "thursday"),
    ("fri", "friday"),
    ("sat", "saturday"),
    ("sun", "sunday"),
];

impl DaySpec {
    pub fn weekday_index(name: &str) -> Option<usize> {
        let name = name.to_ascii_lowercase();
        WEEKDAY_NAMES
            .iter()
            .position(|(short, long)| name == *short || name == *long)
    }
}

impl FromStr for DaySpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("today") {
            return Ok(DaySpec::Today);
        }
        if let Some(index) = DaySpec::weekday_index(value) {
            return Ok(DaySpec::Weekday(index));
        }
        value
            .parse::<DayKey>()
            .map(|key| DaySpec::Date(key.date()))
            .map_err(|_| {
                anyhow!(
                    "Unknown day '{}': expected today, mon..sun, or YYYY-MM-DD",
                    value
                )
            })
    }
}
