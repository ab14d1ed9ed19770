#![allow(dead_code)]

use chrono::{Months, NaiveDate};
use saas_forecast::columns::{self, Tier};
use saas_forecast::data::MetricTable;

/// `count` month-end dates starting with the month of `year`-`month`
pub fn month_ends(year: i32, month: u32, count: usize) -> Vec<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    (1..=count as u32)
        .map(|i| {
            first
                .checked_add_months(Months::new(i))
                .unwrap()
                .pred_opt()
                .unwrap()
        })
        .collect()
}

/// Trending, seasonal MRR history with deterministic wiggle
pub fn mrr_series(count: usize) -> Vec<f64> {
    (0..count)
        .map(|t| {
            let t = t as f64;
            let season = 4000.0 * (2.0 * std::f64::consts::PI * t / 12.0).sin();
            let wiggle = 800.0 * (((t as usize * 7) % 11) as f64 - 5.0) / 5.0;
            100_000.0 + 1500.0 * t + season + wiggle
        })
        .collect()
}

/// Raw metric table with every column the derivation and insights need
pub fn raw_table(count: usize) -> MetricTable {
    let months = month_ends(2019, 1, count);
    let ramp = |base: f64, step: f64| -> Vec<f64> {
        (0..count).map(|i| base + step * (i % 7) as f64).collect()
    };

    let mut values: Vec<(&str, Vec<f64>)> = Vec::new();
    for (i, tier) in Tier::ALL.iter().enumerate() {
        let scale = (i + 1) as f64;
        values.push((tier.new_subscribers(), ramp(600.0 / scale, 10.0)));
        values.push((tier.cancellations(), ramp(200.0 / scale, 5.0)));
        values.push((tier.mrr(), ramp(10_000.0 * scale, 250.0)));
        values.push((tier.churn_rate(), ramp(0.05 / scale, 0.001)));
    }
    values.push((columns::MARKETING_SPEND, ramp(15_000.0, 100.0)));
    values.push((columns::NEW_CUSTOMERS, ramp(800.0, 20.0)));
    values.push((columns::FIXED_COSTS, ramp(20_000.0, 0.0)));
    values.push((columns::VARIABLE_COSTS, ramp(15_000.0, 50.0)));
    values.push((columns::UPSELL_COMPLETED, ramp(0.0, 1.0)));
    values.push((columns::UPSELL_RATE, ramp(0.05, 0.01)));
    values.push((columns::NPS_SCORE, ramp(3.0, 1.0)));

    MetricTable::from_columns(months, &values).unwrap()
}

/// Derived table whose `Total_MRR` equals `mrr` and whose last costs are fixed
pub fn forecast_table(mrr: &[f64]) -> MetricTable {
    let count = mrr.len();
    let months = month_ends(2019, 1, count);
    let constant = |v: f64| vec![v; count];

    MetricTable::from_columns(
        months,
        &[
            (columns::TOTAL_MRR, mrr.to_vec()),
            (columns::FIXED_COSTS, constant(20_000.0)),
            (columns::VARIABLE_COSTS, constant(15_000.0)),
            (columns::MARKETING_SPEND, constant(12_000.0)),
        ],
    )
    .unwrap()
}
