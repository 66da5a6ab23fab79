//! Month Window
//!
//! Generates the trailing twelve-month window used to parameterize the
//! batched GraphQL query and to label the chart's x-axis.
//!
//! The two sequences deliberately run in opposite directions:
//!
//! - [`MonthWindow::query_months`] is newest-first, matching the order in
//!   which the aliased sub-queries are emitted (`one` = last month).
//! - [`MonthWindow::display_months`] is oldest-first, matching the
//!   left-to-right x-axis of the chart.
//!
//! `query_months[i]` and `display_months[11 - i]` always name the same
//! calendar month; the collector reverses fetched counts to line the two up.

use chrono::{DateTime, Months, Utc};

/// Number of trailing months covered by a window.
pub const WINDOW_MONTHS: usize = 12;

/// The trailing twelve-month window, computed once per collection session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWindow {
    query_months: Vec<String>,
    display_months: Vec<String>,
}

impl MonthWindow {
    /// Build the window ending at the month before now.
    pub fn current() -> Self {
        Self::from_reference(Utc::now())
    }

    /// Build the window ending at the month before `reference`.
    ///
    /// Pure function of the reference date. Month and year rollover are
    /// chrono's problem, not ours.
    pub fn from_reference(reference: DateTime<Utc>) -> Self {
        let mut query_months = Vec::with_capacity(WINDOW_MONTHS);
        let mut display_months = Vec::with_capacity(WINDOW_MONTHS);

        for back in 1..=WINDOW_MONTHS as u32 {
            let month = reference - Months::new(back);
            query_months.push(month.format("%Y-%m").to_string());
            display_months.push(month.format("%b").to_string());
        }

        // Chart labels read oldest to newest.
        display_months.reverse();

        Self {
            query_months,
            display_months,
        }
    }

    /// Machine-format `YYYY-MM` months, newest-first (alias order).
    pub fn query_months(&self) -> &[String] {
        &self.query_months
    }

    /// Human-readable month abbreviations, oldest-first (chart order).
    pub fn display_months(&self) -> &[String] {
        &self.display_months
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn reference(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn window_has_twelve_of_each() {
        let window = MonthWindow::from_reference(reference(2023, 6, 15));
        assert_eq!(window.query_months().len(), WINDOW_MONTHS);
        assert_eq!(window.display_months().len(), WINDOW_MONTHS);
    }

    #[test]
    fn window_ends_at_month_before_reference() {
        let window = MonthWindow::from_reference(reference(2023, 6, 15));
        assert_eq!(window.query_months()[0], "2023-05");
        assert_eq!(window.query_months()[11], "2022-06");
    }

    #[test]
    fn query_months_are_strictly_consecutive() {
        let window = MonthWindow::from_reference(reference(2023, 3, 1));
        for pair in window.query_months().windows(2) {
            let newer = parse_month(&pair[0]);
            let older = parse_month(&pair[1]);
            assert_eq!(older + Months::new(1), newer, "{} should precede {}", pair[1], pair[0]);
        }
    }

    #[test]
    fn year_rollover_spans_both_years() {
        let window = MonthWindow::from_reference(reference(2020, 1, 31));
        assert_eq!(window.query_months()[0], "2019-12");
        assert_eq!(window.query_months()[11], "2019-01");
        // Full calendar year, so the labels read Jan..Dec.
        let expected: Vec<&str> = vec![
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        assert_eq!(window.display_months(), &expected[..]);
    }

    #[test]
    fn display_months_mirror_query_months() {
        let window = MonthWindow::from_reference(reference(2024, 11, 3));
        for (i, query_month) in window.query_months().iter().enumerate() {
            let label = parse_month(query_month).format("%b").to_string();
            assert_eq!(window.display_months()[WINDOW_MONTHS - 1 - i], label);
        }
    }

    fn parse_month(query_month: &str) -> NaiveDate {
        NaiveDate::parse_from_str(&format!("{query_month}-01"), "%Y-%m-%d").unwrap()
    }
}
