mod common;

use approx::assert_relative_eq;
use rstest::rstest;
use saas_forecast::models::{
    decompose_additive, ArimaModel, ForecastKind, ForecastModel, GarchModel, HoltWinters,
};
use saas_forecast::ForecastError;

#[test]
fn test_arima_forecast_shape_and_intervals() {
    let history = common::mrr_series(60);
    let model = ArimaModel::new(1, 1, 1).unwrap();

    let trained = model.train(&history).unwrap();
    let forecast = trained.forecast(12).unwrap();

    assert_eq!(forecast.model(), "ARIMA(1,1,1)");
    assert_eq!(forecast.kind(), ForecastKind::Level);
    assert_eq!(forecast.horizons(), 12);
    assert!(forecast.values().iter().all(|v| v.is_finite()));

    let intervals = forecast.intervals().unwrap();
    let mut previous_width = 0.0;
    for (value, (lower, upper)) in forecast.values().iter().zip(intervals) {
        assert!(lower <= value && value <= upper);
        let width = upper - lower;
        assert!(width >= previous_width - 1e-9);
        previous_width = width;
    }

    let parameters = trained.parameters();
    assert!(parameters.contains_key("ar.L1"));
    assert!(parameters.contains_key("ma.L1"));
    assert!(parameters["ma.L1"].abs() <= 0.99);
}

#[test]
fn test_arima_extends_linear_trend() {
    let history: Vec<f64> = (0..30).map(|t| 100.0 + 5.0 * t as f64).collect();
    let forecast = ArimaModel::new(1, 1, 1)
        .unwrap()
        .train(&history)
        .unwrap()
        .forecast(3)
        .unwrap();

    assert_relative_eq!(forecast.values()[0], 250.0, epsilon = 1e-9);
    assert_relative_eq!(forecast.values()[1], 255.0, epsilon = 1e-9);
    assert_relative_eq!(forecast.values()[2], 260.0, epsilon = 1e-9);
}

#[rstest]
#[case(12, 13)]
#[case(5, 13)]
fn test_arima_insufficient_history(#[case] length: usize, #[case] required: usize) {
    let model = ArimaModel::new(1, 1, 1).unwrap();
    assert_eq!(model.min_observations(), required);

    let result = model.train(&common::mrr_series(length));
    match result {
        Err(ForecastError::InsufficientData {
            required: r,
            actual,
            ..
        }) => {
            assert_eq!(r, required);
            assert_eq!(actual, length);
        }
        other => panic!("expected InsufficientData, got {:?}", other),
    }
}

#[test]
fn test_arima_rejects_missing_values() {
    let mut history = common::mrr_series(20);
    history[7] = f64::NAN;

    assert!(matches!(
        ArimaModel::new(1, 1, 1).unwrap().train(&history),
        Err(ForecastError::InvalidData(_))
    ));
}

#[test]
fn test_confidence_level_validation() {
    assert!(ArimaModel::new(1, 1, 1)
        .unwrap()
        .with_confidence_level(1.5)
        .is_err());
    assert!(HoltWinters::new(12)
        .unwrap()
        .with_confidence_level(0.0)
        .is_err());
}

#[test]
fn test_garch_variance_forecast() {
    let history = common::mrr_series(60);
    let trained = GarchModel::new(1, 1).unwrap().train(&history).unwrap();
    let forecast = trained.forecast(12).unwrap();

    assert_eq!(forecast.kind(), ForecastKind::Variance);
    assert_eq!(forecast.values().len(), 12);
    assert!(forecast.values().iter().all(|v| *v > 0.0));
    assert!(forecast.intervals().is_none());

    let p = trained.parameters();
    let (omega, alpha, beta) = (p["omega"], p["alpha[1]"], p["beta[1]"]);
    assert!(omega > 0.0);
    assert!(alpha + beta < 1.0);
    assert_relative_eq!(p["persistence"], alpha + beta, epsilon = 1e-12);

    // Beyond one step the recursion only carries the previous variance.
    let values = forecast.values();
    for h in 1..values.len() {
        assert_relative_eq!(
            values[h],
            omega + (alpha + beta) * values[h - 1],
            max_relative = 1e-12
        );
    }
}

#[test]
fn test_garch_rejects_constant_series() {
    let result = GarchModel::new(1, 1).unwrap().train(&[100.0; 20]);
    assert!(matches!(result, Err(ForecastError::InvalidData(_))));
}

#[test]
fn test_garch_minimum_history() {
    let model = GarchModel::new(1, 1).unwrap();
    assert_eq!(model.min_observations(), 12);
    assert!(model.train(&common::mrr_series(12)).is_ok());
    assert!(matches!(
        model.train(&common::mrr_series(11)),
        Err(ForecastError::InsufficientData { .. })
    ));
}

#[test]
fn test_holt_winters_tracks_seasonal_trend() {
    let truth = |t: usize| {
        let t = t as f64;
        1000.0 + 10.0 * t + 50.0 * (2.0 * std::f64::consts::PI * t / 12.0).sin()
    };
    let history: Vec<f64> = (0..48).map(truth).collect();

    let forecast = HoltWinters::new(12)
        .unwrap()
        .train(&history)
        .unwrap()
        .forecast(12)
        .unwrap();

    assert_eq!(forecast.kind(), ForecastKind::Level);
    for (h, value) in forecast.values().iter().enumerate() {
        assert_relative_eq!(*value, truth(48 + h), max_relative = 1e-6);
    }

    let intervals = forecast.intervals().unwrap();
    assert!(intervals
        .iter()
        .zip(forecast.values())
        .all(|((lower, upper), value)| lower <= value && value <= upper));
}

#[test]
fn test_holt_winters_needs_two_seasons() {
    let result = HoltWinters::new(12).unwrap().train(&common::mrr_series(18));

    match result {
        Err(ForecastError::InsufficientData {
            required, actual, ..
        }) => {
            assert_eq!(required, 24);
            assert_eq!(actual, 18);
        }
        other => panic!("expected InsufficientData, got {:?}", other),
    }
}

#[test]
fn test_decomposition_recovers_components() {
    let pattern = [3.0, -1.0, -4.0, 2.0];
    let history: Vec<f64> = (0..16).map(|t| 2.0 * t as f64 + pattern[t % 4]).collect();

    let decomposition = decompose_additive(&history, 4).unwrap();

    assert_eq!(decomposition.trend[0], None);
    assert_eq!(decomposition.trend[1], None);
    assert_eq!(decomposition.trend[14], None);
    assert_eq!(decomposition.residual[15], None);

    for (t, trend) in decomposition.trend.iter().enumerate().take(14).skip(2) {
        assert_relative_eq!(trend.unwrap(), 2.0 * t as f64, epsilon = 1e-9);
    }
    for (figure, expected) in decomposition.seasonal_figure().iter().zip(pattern) {
        assert_relative_eq!(*figure, expected, epsilon = 1e-9);
    }
    assert_relative_eq!(
        decomposition.seasonal_figure().iter().sum::<f64>(),
        0.0,
        epsilon = 1e-9
    );
    for residual in decomposition.residual.iter().flatten() {
        assert_relative_eq!(*residual, 0.0, epsilon = 1e-9);
    }
}

#[test]
fn test_decomposition_needs_two_periods() {
    assert!(matches!(
        decompose_additive(&common::mrr_series(18), 12),
        Err(ForecastError::InsufficientData { required: 24, .. })
    ));
}
