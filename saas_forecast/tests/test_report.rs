mod common;

use pretty_assertions::assert_eq;
use saas_forecast::derive::derive_metrics;
use saas_forecast::insights::segment_churn_ratios;
use saas_forecast::models::decompose_additive;
use saas_forecast::projection::LastObserved;
use saas_forecast::report::charts::{self, SENSITIVITY_ANALYSIS, STL_MRR_DECOMPOSITION};
use saas_forecast::report::{
    Chart, ChartSeries, ChartSink, PngChartRenderer, RecordingSink, SeriesKind,
};
use saas_forecast::sensitivity::{ScenarioGrid, SensitivitySweep, BREAK_EVEN_PROFIT};
use saas_forecast::utils::months_after;
use tempfile::TempDir;

#[test]
fn test_insight_chart_names() {
    let table = derive_metrics(&common::raw_table(12)).unwrap();
    let segment = segment_churn_ratios(&table).unwrap();

    let mut sink = RecordingSink::new();
    for chart in charts::insight_charts(&table, &segment).unwrap() {
        sink.render(&chart).unwrap();
    }

    assert_eq!(
        sink.names(),
        vec![
            "total_mrr_plot",
            "churn_rate_analysis",
            "net_new_subscribers_plot",
            "revenue_vs_costs",
            "marketing_vs_customers",
            "clv_plot",
            "churn_rates_by_segment",
            "variable_costs_per_customer",
            "nps_vs_upsell_rate",
        ]
    );

    let churn = sink.get("churn_rate_analysis").unwrap();
    assert_eq!(churn.series().count(), 3);

    let segments = sink.get("churn_rates_by_segment").unwrap();
    assert!(segments.series().all(|s| s.kind == SeriesKind::Bar));

    let scatter = sink.get("nps_vs_upsell_rate").unwrap();
    assert_eq!(scatter.series().next().unwrap().kind, SeriesKind::Scatter);
}

#[test]
fn test_sensitivity_chart_has_break_even_line() {
    let baseline = LastObserved {
        total_mrr: 100_000.0,
        fixed_costs: 20_000.0,
        variable_costs: 15_000.0,
        marketing_spend: 12_000.0,
    };
    let results = SensitivitySweep::new(ScenarioGrid::default(), 12)
        .unwrap()
        .run(&baseline);
    let months = months_after(chrono::NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(), 12).unwrap();

    let chart = charts::sensitivity_chart(&months, &results);

    assert_eq!(chart.name, SENSITIVITY_ANALYSIS);
    assert_eq!(chart.series().count(), 9);
    assert_eq!(
        chart.panels[0].reference.as_ref().map(|r| r.y),
        Some(BREAK_EVEN_PROFIT)
    );
}

#[test]
fn test_decomposition_chart_panels() {
    let history = common::mrr_series(36);
    let months = common::month_ends(2019, 1, 36);
    let decomposition = decompose_additive(&history, 12).unwrap();

    let chart = charts::decomposition_chart(&months, &decomposition);

    assert_eq!(chart.name, STL_MRR_DECOMPOSITION);
    let titles: Vec<&str> = chart.panels.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Observed", "Trend", "Seasonal", "Residual"]);

    // Undefined trend edges are carried as NaN and skipped when drawing.
    let trend = &chart.panels[1].series[0];
    assert_eq!(trend.points.len(), 36);
    assert_eq!(trend.finite_points().count(), 24);
}

#[test]
fn test_png_renderer_writes_file() {
    let dir = TempDir::new().unwrap();
    let mut renderer = PngChartRenderer::new(dir.path().join("charts"))
        .unwrap()
        .with_size(320, 200)
        .unwrap();

    let chart = Chart::new("demo_plot", "Demo", "x", "y")
        .with_series(ChartSeries::line(
            "line",
            vec![(0.0, 1.0), (1.0, f64::NAN), (2.0, 3.0), (3.0, 2.0)],
        ))
        .with_series(ChartSeries::scatter("points", vec![(0.5, 2.0)]))
        .with_series(ChartSeries::bar("bars", vec![(1.0, -1.0), (2.0, 2.0)]))
        .with_reference("zero", 0.0);

    renderer.render(&chart).unwrap();

    let path = renderer.path_for(&chart);
    assert_eq!(path, dir.path().join("charts").join("demo_plot.png"));

    let image = image::open(&path).unwrap();
    assert_eq!(image.width(), 320);
    assert_eq!(image.height(), 200);
}

#[test]
fn test_renderer_rejects_tiny_canvas() {
    let dir = TempDir::new().unwrap();
    assert!(PngChartRenderer::new(dir.path())
        .unwrap()
        .with_size(10, 10)
        .is_err());
}

#[test]
fn test_empty_chart_still_renders() {
    let renderer = PngChartRenderer::new(TempDir::new().unwrap().path()).unwrap();
    let image = renderer.draw(&Chart::new("empty", "Empty", "", ""));

    assert_eq!(image.width(), 1400);
    assert_eq!(image.height(), 700);
}
