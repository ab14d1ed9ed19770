use saas_dataset::{write_csv, DatasetGenerator};
use saas_forecast::config::AnalysisConfig;
use saas_forecast::data::DataLoader;
use saas_forecast::derive::derive_metrics;
use saas_forecast::insights::InsightSummary;
use saas_forecast::pipeline::ForecastPipeline;
use saas_forecast::projection::{cash_flow_forecast, profit_forecast, LastObserved};
use saas_forecast::report::{charts, ChartSink, PngChartRenderer};
use saas_forecast::sensitivity::SensitivitySweep;
use saas_forecast::{columns, ForecastKind};
use tempfile::TempDir;

fn generated_dataset(dir: &TempDir, months: usize) -> std::path::PathBuf {
    let path = dir.path().join("saas_dataset.csv");
    let records = DatasetGenerator::new(2019, 1, months)
        .unwrap()
        .with_seed(7)
        .generate()
        .unwrap();
    write_csv(&path, &records).unwrap();
    path
}

#[test]
fn test_full_analysis_workflow() {
    // 1. Generate and load five years of data
    let dir = TempDir::new().unwrap();
    let input = generated_dataset(&dir, 60);
    let table = derive_metrics(&DataLoader::from_csv(&input).unwrap()).unwrap();
    assert_eq!(table.len(), 60);

    // 2. Insights
    let summary = InsightSummary::compute(&table).unwrap();
    assert!(summary.upsell_success_rate >= 0.0);
    assert!(summary.average_churn.basic > summary.average_churn.enterprise);

    let output = dir.path().join("out");
    let mut renderer = PngChartRenderer::new(&output).unwrap();
    for chart in charts::insight_charts(&table, &summary.segment_churn).unwrap() {
        renderer.render(&chart).unwrap();
    }

    // 3. Forecasts
    let config = AnalysisConfig::default();
    let report = ForecastPipeline::from_config(&config)
        .unwrap()
        .run_table(&table)
        .unwrap();
    assert_eq!(report.failures().count(), 0);
    assert_eq!(report.successes().count(), 3);
    assert!(report.decomposition.is_ok());

    let garch = report.forecast("GARCH").unwrap();
    assert_eq!(garch.kind(), ForecastKind::Variance);
    renderer.render(&charts::garch_chart(garch).unwrap()).unwrap();

    // 4. Projections and sensitivity sweep
    let last = LastObserved::from_table(&table).unwrap();
    assert_eq!(
        last.total_mrr,
        table.last_value(columns::TOTAL_MRR).unwrap()
    );

    let revenue = report.revenue_forecast().unwrap();
    let profit = profit_forecast(revenue.values(), &last);
    let cash_flow = cash_flow_forecast(revenue.values(), &last);
    assert!(profit
        .iter()
        .zip(&cash_flow)
        .all(|(p, c)| (p - c - last.marketing_spend).abs() < 1e-6));
    renderer
        .render(&charts::profit_chart(&report.months, &profit))
        .unwrap();

    let results = SensitivitySweep::new(config.scenario_grid().unwrap(), config.horizon)
        .unwrap()
        .run(&last);
    results
        .write_csv(output.join("sensitivity_results.csv"), &report.months)
        .unwrap();
    renderer
        .render(&charts::sensitivity_chart(&report.months, &results))
        .unwrap();

    for name in [
        "total_mrr_plot.png",
        "nps_vs_upsell_rate.png",
        "garch_mrr_volatility.png",
        "profit_forecast.png",
        "sensitivity_analysis_profit_forecast.png",
        "sensitivity_results.csv",
    ] {
        assert!(output.join(name).exists(), "{} was not written", name);
    }
}

#[test]
fn test_eighteen_month_dataset_still_produces_a_revenue_forecast() {
    let dir = TempDir::new().unwrap();
    let input = generated_dataset(&dir, 18);
    let table = derive_metrics(&DataLoader::from_csv(&input).unwrap()).unwrap();

    let report = ForecastPipeline::from_config(&AnalysisConfig::default())
        .unwrap()
        .run_table(&table)
        .unwrap();

    assert_eq!(report.failures().count(), 1);
    assert!(report.revenue_forecast().is_some());
    assert!(report.forecast("GARCH").is_some());
    assert!(report.decomposition.is_err());
}
