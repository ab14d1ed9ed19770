//! Utility functions for the saas_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Months, NaiveDate};

/// Whether `date` is the last day of its month
pub fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().map_or(true, |next| next.month() != date.month())
}

/// The `horizon` calendar months following `last_month`.
///
/// Month-end inputs produce month-end outputs (Jun 30 -> Jul 31 -> Aug 31).
/// Other days keep their day-of-month, clamped to the month length.
pub fn months_after(last_month: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    let month_end = is_month_end(last_month);
    let first_of_month = last_month.with_day(1);

    (1..=horizon)
        .map(|step| {
            let step = u32::try_from(step).ok();
            let date = if month_end {
                step.and_then(|s| s.checked_add(1))
                    .zip(first_of_month)
                    .and_then(|(s, first)| first.checked_add_months(Months::new(s)))
                    .and_then(|next| next.pred_opt())
            } else {
                step.and_then(|s| last_month.checked_add_months(Months::new(s)))
            };

            date.ok_or_else(|| {
                ForecastError::InvalidParameter(format!(
                    "Cannot step {} months past {}",
                    horizon, last_month
                ))
            })
        })
        .collect()
}

/// Months since year 0, used as a continuous x coordinate for charts
pub fn month_ordinal(month: NaiveDate) -> f64 {
    let fraction = (month.day() as f64 - 1.0) / 31.0;
    month.year() as f64 * 12.0 + month.month0() as f64 + fraction
}

/// Print-friendly `YYYY-MM` label
pub fn month_label(month: NaiveDate) -> String {
    month.format("%Y-%m").to_string()
}
