//! Month calendar grid for the take history view.
//!
//! Pure cell computation; rendering belongs to the UI adapter.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

/// Sunday-first weekday header, Portuguese initials.
pub const WEEKDAY_HEADER: [&str; 7] = ["D", "S", "T", "Q", "Q", "S", "S"];

/// One cell of the month grid. Leading/trailing cells from the adjacent
/// months are `muted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// Day-of-month number shown in the cell.
    pub day: u32,
    /// True for padding days outside the displayed month.
    pub muted: bool,
    /// True when at least one take record exists on this date.
    pub marked: bool,
}

/// Build the cell grid for `year`/`month` (1-12), Sunday-first. The result
/// length is always a multiple of 7: the first week is padded with the tail
/// of the previous month, the last with the head of the next.
///
/// `marked_days` holds `YYYY-MM-DD` dates that carry take records.
pub fn month_grid(year: i32, month: u32, marked_days: &HashSet<String>) -> Vec<CalendarCell> {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => return Vec::new(),
    };
    let lead = first.weekday().num_days_from_sunday() as i64;

    let mut cells = Vec::new();
    let mut date = first - chrono::Duration::days(lead);
    loop {
        let muted = date.month() != month || date.year() != year;
        if muted && date > first && cells.len() % 7 == 0 {
            break;
        }
        let iso = date.format("%Y-%m-%d").to_string();
        cells.push(CalendarCell {
            date,
            day: date.day(),
            muted,
            marked: marked_days.contains(&iso),
        });
        date += chrono::Duration::days(1);
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_multiple_of_seven_with_muted_padding() {
        // March 2025 starts on a Saturday and has 31 days.
        let cells = month_grid(2025, 3, &HashSet::new());
        assert_eq!(cells.len() % 7, 0);
        assert_eq!(cells.len(), 42); // 6 lead + 31 + 5 tail

        assert!(cells[..6].iter().all(|c| c.muted));
        assert_eq!(cells[6].day, 1);
        assert!(!cells[6].muted);
        assert!(cells[cells.len() - 5..].iter().all(|c| c.muted));
    }

    #[test]
    fn grid_without_lead_padding() {
        // June 2025 starts on a Sunday.
        let cells = month_grid(2025, 6, &HashSet::new());
        assert_eq!(cells[0].day, 1);
        assert!(!cells[0].muted);
        assert_eq!(cells.len(), 35);
    }

    #[test]
    fn take_days_are_marked() {
        let marked: HashSet<String> = ["2025-03-10".to_string()].into_iter().collect();
        let cells = month_grid(2025, 3, &marked);
        let cell = cells.iter().find(|c| c.day == 10 && !c.muted).unwrap();
        assert!(cell.marked);
        assert!(cells.iter().filter(|c| c.marked).count() == 1);
    }

    #[test]
    fn invalid_month_yields_empty_grid() {
        assert!(month_grid(2025, 13, &HashSet::new()).is_empty());
    }
}
