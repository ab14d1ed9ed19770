mod common;

use approx::assert_relative_eq;
use saas_forecast::columns::{self, Tier};
use saas_forecast::insights::{
    average_churn_rates, segment_churn_ratios, upsell_success_rate, variable_cost_per_customer,
    InsightSummary,
};
use saas_forecast::ForecastError;

#[test]
fn test_average_churn_ignores_missing() {
    let table = common::raw_table(3)
        .with_columns(vec![(Tier::Premium.churn_rate(), vec![0.02, f64::NAN, 0.04])])
        .unwrap();

    let averages = average_churn_rates(&table).unwrap();
    assert_relative_eq!(averages.premium, 0.03, epsilon = 1e-12);
}

#[test]
fn test_segment_churn_ratio() {
    let table = common::raw_table(4)
        .with_columns(vec![
            (Tier::Basic.new_subscribers(), vec![100.0, 100.0, 100.0, 100.0]),
            (Tier::Basic.cancellations(), vec![10.0, 20.0, 30.0, 40.0]),
        ])
        .unwrap();

    let ratios = segment_churn_ratios(&table).unwrap();
    assert_relative_eq!(ratios.get(Tier::Basic), 0.25, epsilon = 1e-12);
}

#[test]
fn test_segment_churn_zero_denominator() {
    let table = common::raw_table(2)
        .with_columns(vec![(Tier::Enterprise.new_subscribers(), vec![0.0, 0.0])])
        .unwrap();

    assert!(matches!(
        segment_churn_ratios(&table),
        Err(ForecastError::DivisionByZero(_))
    ));
}

#[test]
fn test_ratios_skip_missing_cells() {
    let table = common::raw_table(4)
        .with_columns(vec![
            (Tier::Basic.new_subscribers(), vec![100.0, 100.0, 100.0, 100.0]),
            (Tier::Basic.cancellations(), vec![100.0, f64::NAN, 100.0, 100.0]),
            (Tier::Basic.churn_rate(), vec![0.02, f64::NAN, 0.04, 0.06]),
            (columns::UPSELL_COMPLETED, vec![1.0, f64::NAN, 1.0, 0.0]),
            (columns::NEW_CUSTOMERS, vec![100.0, 100.0, 100.0, 100.0]),
        ])
        .unwrap();

    let averages = average_churn_rates(&table).unwrap();
    assert_relative_eq!(averages.basic, 0.04, epsilon = 1e-12);

    let ratios = segment_churn_ratios(&table).unwrap();
    assert_relative_eq!(ratios.basic, 0.75, epsilon = 1e-12);

    assert_relative_eq!(upsell_success_rate(&table).unwrap(), 0.005, epsilon = 1e-12);
}

#[test]
fn test_upsell_success_rate() {
    let table = common::raw_table(2)
        .with_columns(vec![
            (columns::UPSELL_COMPLETED, vec![1.0, 3.0]),
            (columns::NEW_CUSTOMERS, vec![100.0, 100.0]),
        ])
        .unwrap();
    assert_relative_eq!(upsell_success_rate(&table).unwrap(), 0.02, epsilon = 1e-12);

    let no_customers = table
        .with_columns(vec![(columns::NEW_CUSTOMERS, vec![0.0, 0.0])])
        .unwrap();
    assert!(matches!(
        upsell_success_rate(&no_customers),
        Err(ForecastError::DivisionByZero(_))
    ));
}

#[test]
fn test_variable_cost_per_customer() {
    let table = common::raw_table(2)
        .with_columns(vec![
            (columns::VARIABLE_COSTS, vec![1000.0, 3000.0]),
            (columns::NEW_CUSTOMERS, vec![10.0, 0.0]),
        ])
        .unwrap();

    assert!(matches!(
        variable_cost_per_customer(&table),
        Err(ForecastError::DivisionByZero(_))
    ));

    let table = table
        .with_columns(vec![(columns::NEW_CUSTOMERS, vec![10.0, 20.0])])
        .unwrap();
    assert_eq!(variable_cost_per_customer(&table).unwrap(), vec![100.0, 150.0]);
}

#[test]
fn test_summary_display() {
    let summary = InsightSummary::compute(&common::raw_table(6)).unwrap();
    let text = summary.to_string();

    assert!(text.starts_with("Missing Values in Each Column:"));
    assert!(text.contains("Average Churn Rate for Basic:"));
    assert!(text.contains("Upsell Success Rate:"));
    assert!(summary.missing_values.iter().all(|(_, count)| *count == 0));
}
