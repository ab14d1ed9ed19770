use approx::assert_relative_eq;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use saas_forecast::projection::LastObserved;
use saas_forecast::sensitivity::{
    simulate_scenario, ScenarioGrid, ScenarioKey, SensitivitySweep, BREAK_EVEN_PROFIT,
};
use saas_forecast::utils::months_after;
use saas_forecast::ForecastError;
use std::collections::HashSet;
use tempfile::TempDir;

fn baseline() -> LastObserved {
    LastObserved {
        total_mrr: 100_000.0,
        fixed_costs: 20_000.0,
        variable_costs: 15_000.0,
        marketing_spend: 12_000.0,
    }
}

#[test]
fn test_baseline_scenario_values() {
    let trajectory = simulate_scenario(ScenarioKey::new(1.0, 0.03), &baseline(), 12);

    assert_eq!(trajectory.len(), 12);
    assert_relative_eq!(trajectory[0], 50_000.0, epsilon = 1e-6);
    assert_relative_eq!(trajectory[1], 47_090.0, epsilon = 1e-6);

    let expected_last = 100_000.0 * 0.97_f64.powi(12) - 47_000.0;
    assert_relative_eq!(trajectory[11], expected_last, epsilon = 1e-6);
}

#[test]
fn test_default_sweep_covers_every_pair_once() {
    let sweep = SensitivitySweep::new(ScenarioGrid::default(), 12).unwrap();
    let results = sweep.run(&baseline());

    assert_eq!(results.len(), 9);
    assert!(results.iter().all(|(_, trajectory)| trajectory.len() == 12));

    let keys: HashSet<ScenarioKey> = results.iter().map(|(key, _)| *key).collect();
    assert_eq!(keys.len(), 9);
    for m in [0.9, 1.0, 1.1] {
        for c in [0.02, 0.03, 0.05] {
            assert!(results.get(&ScenarioKey::new(m, c)).is_some());
        }
    }
    assert!(results.get(&ScenarioKey::new(1.2, 0.03)).is_none());
    assert_eq!(results.break_even(), BREAK_EVEN_PROFIT);
}

#[test]
fn test_results_in_grid_order() {
    let results = SensitivitySweep::new(ScenarioGrid::default(), 3)
        .unwrap()
        .run(&baseline());

    let labels: Vec<String> = results.iter().map(|(key, _)| key.label()).collect();
    assert_eq!(
        labels,
        vec![
            "Marketing_90_Churn_2",
            "Marketing_90_Churn_3",
            "Marketing_90_Churn_5",
            "Marketing_100_Churn_2",
            "Marketing_100_Churn_3",
            "Marketing_100_Churn_5",
            "Marketing_110_Churn_2",
            "Marketing_110_Churn_3",
            "Marketing_110_Churn_5",
        ]
    );
}

#[test]
fn test_higher_marketing_and_churn_lower_profit() {
    let results = SensitivitySweep::new(ScenarioGrid::default(), 12)
        .unwrap()
        .run(&baseline());

    let cheap = results.get(&ScenarioKey::new(0.9, 0.02)).unwrap();
    let costly = results.get(&ScenarioKey::new(1.1, 0.05)).unwrap();
    assert!(cheap.iter().zip(costly).all(|(a, b)| a > b));

    // MRR only decays, so profit falls month over month.
    assert!(cheap.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn test_key_equality_ignores_sign_of_zero() {
    assert_eq!(ScenarioKey::new(-0.0, 0.0), ScenarioKey::new(0.0, -0.0));

    let set: HashSet<ScenarioKey> = [ScenarioKey::new(-0.0, 0.0), ScenarioKey::new(0.0, 0.0)]
        .into_iter()
        .collect();
    assert_eq!(set.len(), 1);
}

#[rstest]
#[case(vec![], vec![0.03])]
#[case(vec![1.0], vec![])]
#[case(vec![-0.1], vec![0.03])]
#[case(vec![1.0], vec![1.5])]
#[case(vec![1.0, 1.0], vec![0.03])]
#[case(vec![1.0], vec![f64::NAN])]
#[case(vec![1.0], vec![0.02, 0.021])]
#[case(vec![1.1, 1.104], vec![0.03])]
fn test_invalid_grids(#[case] multipliers: Vec<f64>, #[case] churn: Vec<f64>) {
    assert!(matches!(
        ScenarioGrid::new(multipliers, churn),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_labels_are_unique_across_a_grid() {
    let grid = ScenarioGrid::new(vec![0.95, 1.0], vec![0.01, 0.02, 0.04]).unwrap();
    let labels: HashSet<String> = grid.keys().map(|key| key.label()).collect();
    assert_eq!(labels.len(), grid.len());
}

#[test]
fn test_write_csv() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sensitivity_results.csv");
    let months = months_after(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(), 12).unwrap();

    let results = SensitivitySweep::new(ScenarioGrid::default(), 12)
        .unwrap()
        .run(&baseline());
    results.write_csv(&path, &months).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let header = reader.headers().unwrap().clone();
    assert_eq!(header.len(), 10);
    assert_eq!(&header[0], "Month");
    assert_eq!(&header[5], "Marketing_100_Churn_3");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 12);
    assert_eq!(&rows[0][0], "2024-01");
    assert_relative_eq!(rows[0][5].parse::<f64>().unwrap(), 50_000.0, epsilon = 1e-6);

    assert!(matches!(
        results.write_csv(&path, &months[..3]),
        Err(ForecastError::InvalidData(_))
    ));
}
