use chrono::{Datelike, Duration, NaiveDate};

use crate::model::DayKey;

pub const DAYS_IN_WEEK: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekDay {
    pub key: DayKey,
    pub date: NaiveDate,
}

impl WeekDay {
    /// e.g. `Mon 12`
    pub fn short_label(&self) -> String {
        self.date.format("%a %d").to_string()
    }

    /// e.g. `Monday 2026-10-12`
    pub fn long_label(&self) -> String {
        self.date.format("%A %Y-%m-%d").to_string()
    }
}

/// The seven days (Monday first) of the week containing a reference date.
///
/// Computed once per session; it does not follow the wall clock afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekWindow {
    days: [WeekDay; DAYS_IN_WEEK],
}

pub fn week_dates(reference: NaiveDate) -> WeekWindow {
    let offset = reference.weekday().num_days_from_monday() as i64;
    let monday = reference - Duration::days(offset);
    let days = std::array::from_fn(|idx| {
        let date = monday + Duration::days(idx as i64);
        WeekDay {
            key: DayKey::new(date),
            date,
        }
    });
    WeekWindow { days }
}

impl WeekWindow {
    pub fn days(&self) -> &[WeekDay] {
        &self.days
    }

    pub fn day(&self, index: usize) -> &WeekDay {
        &self.days[index % DAYS_IN_WEEK]
    }

    pub fn monday(&self) -> NaiveDate {
        self.days[0].date
    }

    pub fn sunday(&self) -> NaiveDate {
        self.days[DAYS_IN_WEEK - 1].date
    }

    /// Position of `date` inside the window, if it belongs to it.
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.days.iter().position(|day| day.date == date)
    }

    /// Weekday index (Monday = 0) used as the default active day.
    pub fn index_of(date: NaiveDate) -> usize {
        date.weekday().num_days_from_monday() as usize
    }

    pub fn range_label(&self) -> String {
        format!(
            "{} → {}",
            self.monday().format("%b %d"),
            self.sunday().format("%b %d, %Y")
        )
    }
}

/// Next day inside the displayed week; Sunday wraps to Monday of the same week.
pub fn next_index(index: usize) -> usize {
    (index + 1) % DAYS_IN_WEEK
}

/// Previous day inside the displayed week; Monday wraps to Sunday of the same week.
pub fn previous_index(index: usize) -> usize {
    (index + DAYS_IN_WEEK - 1) % DAYS_IN_WEEK
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(date(2026, 10, 12))]
    #[case(date(2026, 10, 15))]
    #[case(date(2026, 10, 18))]
    fn week_starts_on_monday(#[case] reference: NaiveDate) {
        let week = week_dates(reference);
        assert_eq!(week.monday(), date(2026, 10, 12));
        assert_eq!(week.sunday(), date(2026, 10, 18));
        assert!(week.position(reference).is_some());
    }

    #[test]
    fn week_spanning_a_year_boundary_uses_contiguous_keys() {
        let week = week_dates(date(2027, 1, 1));
        let keys: Vec<String> = week.days().iter().map(|day| day.key.to_string()).collect();
        assert_eq!(
            keys,
            vec![
                "2026-12-28",
                "2026-12-29",
                "2026-12-30",
                "2026-12-31",
                "2027-01-01",
                "2027-01-02",
                "2027-01-03",
            ]
        );
    }

    #[test]
    fn index_of_follows_iso_weekday() {
        assert_eq!(WeekWindow::index_of(date(2026, 10, 12)), 0);
        assert_eq!(WeekWindow::index_of(date(2026, 10, 17)), 5);
        assert_eq!(WeekWindow::index_of(date(2026, 10, 18)), 6);
    }

    #[test]
    fn neighbours_wrap_within_the_displayed_week() {
        assert_eq!(next_index(0), 1);
        assert_eq!(next_index(6), 0);
        assert_eq!(previous_index(3), 2);
        assert_eq!(previous_index(0), 6);
    }

    #[test]
    fn labels_render_weekday_names() {
        let week = week_dates(date(2026, 10, 12));
        assert_eq!(week.day(0).short_label(), "Mon 12");
        assert_eq!(week.day(6).long_label(), "Sunday 2026-10-18");
        assert_eq!(week.position(date(2026, 10, 15)), Some(3));
        assert_eq!(week.position(date(2026, 10, 19)), None);
    }
}
