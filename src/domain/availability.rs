//! Availability slots and the rules that keep them consistent.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// A stored slot: a bookable window for a provider on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Availability {
    pub id: Uuid,
    pub provider_id: Uuid,
    #[schema(value_type = String, example = "2024-06-01")]
    pub available_date: NaiveDate,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "12:00:00")]
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

impl Availability {
    /// The window this slot covers.
    pub fn window(&self) -> SlotWindow {
        SlotWindow {
            available_date: self.available_date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    /// Whether a booking at `date`/`time` falls inside this slot.
    pub fn covers(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.window().covers(date, time)
    }
}

/// A validated `[start_time, end_time)` window on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    pub available_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl SlotWindow {
    /// Build a window, rejecting empty or inverted ranges.
    pub fn new(available_date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> AppResult<Self> {
        if start_time >= end_time {
            return Err(AppError::validation("start_time must be before end_time"));
        }
        Ok(Self {
            available_date,
            start_time,
            end_time,
        })
    }

    /// Two windows overlap when they share a date and their half-open ranges intersect.
    pub fn overlaps(&self, other: &SlotWindow) -> bool {
        self.available_date == other.available_date
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }

    pub fn covers(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.available_date == date && self.start_time <= time && time < self.end_time
    }
}

/// Reject a slot set in which any two windows overlap.
pub fn ensure_disjoint(windows: &[SlotWindow]) -> AppResult<()> {
    for (i, a) in windows.iter().enumerate() {
        if windows[i + 1..].iter().any(|b| a.overlaps(b)) {
            return Err(overlap_error(a));
        }
    }
    Ok(())
}

/// Reject `candidate` if it overlaps any of `existing`.
pub fn ensure_free<'a>(
    candidate: &SlotWindow,
    existing: impl IntoIterator<Item = &'a Availability>,
) -> AppResult<()> {
    if existing.into_iter().any(|slot| slot.window().overlaps(candidate)) {
        return Err(overlap_error(candidate));
    }
    Ok(())
}

fn overlap_error(window: &SlotWindow) -> AppError {
    AppError::validation(format!(
        "Availability on {} from {} to {} overlaps another slot",
        window.available_date, window.start_time, window.end_time
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(day: u32, start: u32, end: u32) -> SlotWindow {
        SlotWindow::new(
            NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_inverted_window_rejected() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert!(SlotWindow::new(date, nine, nine).is_err());
    }

    #[test]
    fn test_adjacent_windows_do_not_overlap() {
        assert!(!window(1, 9, 10).overlaps(&window(1, 10, 11)));
        assert!(window(1, 9, 11).overlaps(&window(1, 10, 12)));
        assert!(!window(1, 9, 11).overlaps(&window(2, 9, 11)));
    }

    #[test]
    fn test_ensure_disjoint() {
        assert!(ensure_disjoint(&[window(1, 9, 10), window(1, 10, 11), window(2, 9, 10)]).is_ok());
        assert!(ensure_disjoint(&[window(1, 9, 12), window(1, 11, 13)]).is_err());
    }

    #[test]
    fn test_covers_is_half_open() {
        let w = window(1, 9, 10);
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(w.covers(date, NaiveTime::from_hms_opt(9, 0, 0).unwrap()));
        assert!(w.covers(date, NaiveTime::from_hms_opt(9, 59, 0).unwrap()));
        assert!(!w.covers(date, NaiveTime::from_hms_opt(10, 0, 0).unwrap()));
    }
}
