use pretty_assertions::assert_eq;
use saas_forecast::config::AnalysisConfig;
use saas_forecast::ForecastError;
use std::io::Write;
use tempfile::NamedTempFile;

fn config_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", json).unwrap();
    file
}

#[test]
fn test_defaults() {
    let config = AnalysisConfig::default();

    assert_eq!(config.horizon, 12);
    assert_eq!(config.seasonal_period, 12);
    assert_eq!(config.arima_order, [1, 1, 1]);
    assert_eq!(config.garch_order, [1, 1]);
    assert_eq!(config.marketing_multipliers, vec![0.9, 1.0, 1.1]);
    assert_eq!(config.churn_rates, vec![0.02, 0.03, 0.05]);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = config_file(r#"{ "horizon": 6, "churn_rates": [0.01, 0.04] }"#);
    let config = AnalysisConfig::from_json_file(file.path()).unwrap();

    assert_eq!(config.horizon, 6);
    assert_eq!(config.churn_rates, vec![0.01, 0.04]);
    assert_eq!(config.seasonal_period, 12);
    assert_eq!(config.scenario_grid().unwrap().len(), 6);
}

#[test]
fn test_invalid_values_are_config_errors() {
    for json in [
        r#"{ "horizon": 0 }"#,
        r#"{ "seasonal_period": 1 }"#,
        r#"{ "confidence_level": 1.0 }"#,
        r#"{ "churn_rates": [0.03, 0.03] }"#,
        r#"{ "marketing_multipliers": [] }"#,
        r#"{ "horizon": "twelve" }"#,
    ] {
        let file = config_file(json);
        assert!(
            matches!(
                AnalysisConfig::from_json_file(file.path()),
                Err(ForecastError::ConfigError(_))
            ),
            "{} should be rejected",
            json
        );
    }
}

#[test]
fn test_missing_config_file() {
    let result = AnalysisConfig::from_json_file("/nonexistent/analysis.json");
    assert!(matches!(result, Err(ForecastError::ConfigError(_))));
}
