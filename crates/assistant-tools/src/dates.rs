//! Calendar arithmetic shared by the argument-defaulting policy and the
//! derived-analytics tools. All dates are ISO `YYYY-MM-DD`; months are
//! `YYYY-MM`.

use chrono::{Datelike, Duration, NaiveDate};

use crate::dispatch::ToolError;

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// First day of the month `months` whole months before `month_start`'s month.
pub fn months_before(month_start: NaiveDate, months: u32) -> NaiveDate {
    let total = month_start.year() * 12 + month_start.month0() as i32 - months as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(month_start)
}

/// Last day of `month_start`'s month.
pub fn end_of_month(month_start: NaiveDate) -> NaiveDate {
    let next = if month_start.month() == 12 {
        NaiveDate::from_ymd_opt(month_start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(month_start.year(), month_start.month() + 1, 1)
    };
    match next {
        Some(next) => next - Duration::days(1),
        None => month_start,
    }
}

/// Default range when a tool request carries no dates: from the first day
/// of the month `months_back` whole months before the current month, up
/// to today.
pub fn default_range(today: NaiveDate, months_back: u32) -> (NaiveDate, NaiveDate) {
    (months_before(first_of_month(today), months_back), today)
}

/// Parses `YYYY-MM` into that month's first and last day.
pub fn month_bounds(month: &str) -> Result<(NaiveDate, NaiveDate), ToolError> {
    let start = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map_err(|_| ToolError::InvalidArguments(format!("month must be YYYY-MM, got {month:?}")))?;
    Ok((start, end_of_month(start)))
}

/// Same calendar date one year earlier; Feb 29 clamps to Feb 28.
pub fn shift_year_back(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year() - 1, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(date.year() - 1, 2, 28))
        .unwrap_or(date)
}

/// The `months` calendar months ending at `start_month` (inclusive), in
/// chronological order. Each bucket is (first day, last day).
pub fn month_buckets(
    start_month: &str,
    months: u32,
) -> Result<Vec<(NaiveDate, NaiveDate)>, ToolError> {
    let (anchor, _) = month_bounds(start_month)?;
    let mut buckets: Vec<(NaiveDate, NaiveDate)> = (0..months)
        .map(|i| {
            let start = months_before(anchor, i);
            (start, end_of_month(start))
        })
        .collect();
    buckets.reverse();
    Ok(buckets)
}
