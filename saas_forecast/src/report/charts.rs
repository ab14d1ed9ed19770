//! Chart builders for the insights and forecasting reports

use crate::columns::{self, Tier, TierValues};
use crate::data::MetricTable;
use crate::error::{ForecastError, Result};
use crate::insights::variable_cost_per_customer;
use crate::models::{Decomposition, ForecastResult};
use crate::report::{Chart, ChartSeries, Panel};
use crate::sensitivity::{SensitivityResults, BREAK_EVEN_PROFIT};
use crate::utils::month_ordinal;
use chrono::NaiveDate;

pub const TOTAL_MRR_PLOT: &str = "total_mrr_plot";
pub const CHURN_RATE_ANALYSIS: &str = "churn_rate_analysis";
pub const NET_NEW_SUBSCRIBERS_PLOT: &str = "net_new_subscribers_plot";
pub const REVENUE_VS_COSTS: &str = "revenue_vs_costs";
pub const MARKETING_VS_CUSTOMERS: &str = "marketing_vs_customers";
pub const CLV_PLOT: &str = "clv_plot";
pub const CHURN_RATES_BY_SEGMENT: &str = "churn_rates_by_segment";
pub const VARIABLE_COSTS_PER_CUSTOMER: &str = "variable_costs_per_customer";
pub const NPS_VS_UPSELL_RATE: &str = "nps_vs_upsell_rate";

pub const ARIMA_MRR_FORECAST: &str = "arima_mrr_forecast";
pub const GARCH_MRR_VOLATILITY: &str = "garch_mrr_volatility";
pub const EXP_SMOOTHING_FORECAST: &str = "exp_smoothing_forecast";
pub const STL_MRR_DECOMPOSITION: &str = "stl_mrr_decomposition";
pub const PROFIT_FORECAST: &str = "profit_forecast";
pub const CASH_FLOW_FORECAST: &str = "cash_flow_forecast";
pub const SENSITIVITY_ANALYSIS: &str = "sensitivity_analysis_profit_forecast";

/// Pair month positions with values
pub fn month_points(months: &[NaiveDate], values: &[f64]) -> Vec<(f64, f64)> {
    months
        .iter()
        .zip(values.iter())
        .map(|(m, v)| (month_ordinal(*m), *v))
        .collect()
}

fn optional_points(months: &[NaiveDate], values: &[Option<f64>]) -> Vec<(f64, f64)> {
    months
        .iter()
        .zip(values.iter())
        .map(|(m, v)| (month_ordinal(*m), v.unwrap_or(f64::NAN)))
        .collect()
}

fn forecast_months(forecast: &ForecastResult) -> Result<&[NaiveDate]> {
    forecast.months().ok_or_else(|| {
        ForecastError::InvalidData(format!(
            "{} forecast is not aligned to calendar months",
            forecast.model()
        ))
    })
}

fn column_line(table: &MetricTable, column: &str, label: &str) -> Result<ChartSeries> {
    Ok(ChartSeries::line(
        label,
        month_points(table.months(), &table.column_f64(column)?),
    ))
}

pub fn total_mrr_chart(table: &MetricTable) -> Result<Chart> {
    Ok(Chart::new(
        TOTAL_MRR_PLOT,
        "Total Monthly Recurring Revenue Over Time",
        "Month",
        "Total MRR ($)",
    )
    .with_series(column_line(table, columns::TOTAL_MRR, "Total MRR")?))
}

pub fn churn_rate_chart(table: &MetricTable) -> Result<Chart> {
    let mut chart = Chart::new(
        CHURN_RATE_ANALYSIS,
        "Churn Rate by Subscription Tier Over Time",
        "Month",
        "Churn Rate",
    );
    for tier in Tier::ALL {
        chart = chart.with_series(column_line(table, tier.churn_rate(), tier.name())?);
    }
    Ok(chart)
}

pub fn net_new_subscribers_chart(table: &MetricTable) -> Result<Chart> {
    Ok(Chart::new(
        NET_NEW_SUBSCRIBERS_PLOT,
        "Net New Subscribers Over Time",
        "Month",
        "Net New Subscribers",
    )
    .with_series(column_line(
        table,
        columns::NET_NEW_SUBSCRIBERS,
        "Net New Subscribers",
    )?))
}

pub fn revenue_vs_costs_chart(table: &MetricTable) -> Result<Chart> {
    let fixed = table.column_f64(columns::FIXED_COSTS)?;
    let variable = table.column_f64(columns::VARIABLE_COSTS)?;
    let total_costs: Vec<f64> = fixed.iter().zip(variable.iter()).map(|(f, v)| f + v).collect();

    Ok(Chart::new(
        REVENUE_VS_COSTS,
        "Revenue vs Operating Costs Over Time",
        "Month",
        "Amount ($)",
    )
    .with_series(column_line(table, columns::TOTAL_MRR, "Total Revenue")?)
    .with_series(ChartSeries::line(
        "Total Costs",
        month_points(table.months(), &total_costs),
    )))
}

pub fn marketing_vs_customers_chart(table: &MetricTable) -> Result<Chart> {
    Ok(Chart::new(
        MARKETING_VS_CUSTOMERS,
        "Marketing Spend vs New Customers Acquired Over Time",
        "Month",
        "Value",
    )
    .with_series(column_line(table, columns::MARKETING_SPEND, "Marketing Spend")?)
    .with_series(column_line(table, columns::NEW_CUSTOMERS, "New Customers")?))
}

pub fn clv_chart(table: &MetricTable) -> Result<Chart> {
    Ok(Chart::new(
        CLV_PLOT,
        "Customer Lifetime Value (CLV) Over Time",
        "Month",
        "CLV ($)",
    )
    .with_series(column_line(table, columns::CLV, "Customer Lifetime Value")?))
}

/// One bar per tier, in tier order
pub fn segment_churn_chart(ratios: &TierValues) -> Chart {
    let mut chart = Chart::new(
        CHURN_RATES_BY_SEGMENT,
        "Churn Rates by Customer Segment",
        "Customer Segment",
        "Churn Rate",
    );
    for (i, tier) in Tier::ALL.iter().enumerate() {
        chart = chart.with_series(ChartSeries::bar(
            tier.name(),
            vec![(i as f64, ratios.get(*tier))],
        ));
    }
    chart
}

pub fn variable_cost_chart(table: &MetricTable) -> Result<Chart> {
    let per_customer = variable_cost_per_customer(table)?;
    Ok(Chart::new(
        VARIABLE_COSTS_PER_CUSTOMER,
        "Variable Costs per New Customer Over Time",
        "Month",
        "Cost per Customer ($)",
    )
    .with_series(ChartSeries::line(
        "Variable Costs per Customer",
        month_points(table.months(), &per_customer),
    )))
}

pub fn nps_vs_upsell_chart(table: &MetricTable) -> Result<Chart> {
    let nps = table.column_f64(columns::NPS_SCORE)?;
    let upsell = table.column_f64(columns::UPSELL_RATE)?;

    Ok(Chart::new(
        NPS_VS_UPSELL_RATE,
        "NPS Score vs. Upsell Rate",
        "NPS Score",
        "Upsell Rate",
    )
    .with_series(ChartSeries::scatter(
        "Customers",
        nps.into_iter().zip(upsell).collect(),
    )))
}

/// Every insights chart, in report order. `table` must carry derived columns.
pub fn insight_charts(table: &MetricTable, segment_churn: &TierValues) -> Result<Vec<Chart>> {
    Ok(vec![
        total_mrr_chart(table)?,
        churn_rate_chart(table)?,
        net_new_subscribers_chart(table)?,
        revenue_vs_costs_chart(table)?,
        marketing_vs_customers_chart(table)?,
        clv_chart(table)?,
        segment_churn_chart(segment_churn),
        variable_cost_chart(table)?,
        nps_vs_upsell_chart(table)?,
    ])
}

/// Observed history followed by a level forecast and its interval bounds
fn level_forecast_chart(
    name: &str,
    title: &str,
    label: &str,
    months: &[NaiveDate],
    history: &[f64],
    forecast: &ForecastResult,
) -> Result<Chart> {
    let future = forecast_months(forecast)?;
    let mut chart = Chart::new(name, title, "Month", "MRR ($)")
        .with_series(ChartSeries::line("Observed MRR", month_points(months, history)))
        .with_series(ChartSeries::line(label, month_points(future, forecast.values())));

    if let Some(intervals) = forecast.intervals() {
        let lower: Vec<f64> = intervals.iter().map(|(l, _)| *l).collect();
        let upper: Vec<f64> = intervals.iter().map(|(_, u)| *u).collect();
        chart = chart
            .with_series(ChartSeries::line("Lower bound", month_points(future, &lower)))
            .with_series(ChartSeries::line("Upper bound", month_points(future, &upper)));
    }

    Ok(chart)
}

pub fn arima_chart(
    months: &[NaiveDate],
    history: &[f64],
    forecast: &ForecastResult,
) -> Result<Chart> {
    level_forecast_chart(
        ARIMA_MRR_FORECAST,
        "ARIMA Forecast of Total MRR",
        "ARIMA Forecast",
        months,
        history,
        forecast,
    )
}

pub fn exp_smoothing_chart(
    months: &[NaiveDate],
    history: &[f64],
    forecast: &ForecastResult,
) -> Result<Chart> {
    level_forecast_chart(
        EXP_SMOOTHING_FORECAST,
        "Exponential Smoothing Forecast of Total MRR",
        "Exponential Smoothing Forecast",
        months,
        history,
        forecast,
    )
}

pub fn garch_chart(forecast: &ForecastResult) -> Result<Chart> {
    Ok(Chart::new(
        GARCH_MRR_VOLATILITY,
        "GARCH Forecast of Total MRR Volatility",
        "Month",
        "Variance",
    )
    .with_series(ChartSeries::line(
        "GARCH Forecast",
        month_points(forecast_months(forecast)?, forecast.values()),
    )))
}

/// Observed, trend, seasonal and residual panels
pub fn decomposition_chart(months: &[NaiveDate], decomposition: &Decomposition) -> Chart {
    let panels = vec![
        Panel::new("Observed").with_series(ChartSeries::line(
            "Observed",
            month_points(months, &decomposition.observed),
        )),
        Panel::new("Trend").with_series(ChartSeries::line(
            "Trend",
            optional_points(months, &decomposition.trend),
        )),
        Panel::new("Seasonal").with_series(ChartSeries::line(
            "Seasonal",
            month_points(months, &decomposition.seasonal),
        )),
        Panel::new("Residual").with_series(ChartSeries::scatter(
            "Residual",
            optional_points(months, &decomposition.residual),
        )),
    ];

    Chart::stacked(
        STL_MRR_DECOMPOSITION,
        "Additive Decomposition of Total MRR",
        panels,
    )
}

pub fn profit_chart(months: &[NaiveDate], profit: &[f64]) -> Chart {
    Chart::new(
        PROFIT_FORECAST,
        "Profit Forecast for the Next 12 Months",
        "Month",
        "Profit ($)",
    )
    .with_series(ChartSeries::line("Profit Forecast", month_points(months, profit)))
}

pub fn cash_flow_chart(months: &[NaiveDate], cash_flow: &[f64]) -> Chart {
    Chart::new(
        CASH_FLOW_FORECAST,
        "Cash Flow Forecast for the Next 12 Months",
        "Month",
        "Cash Flow ($)",
    )
    .with_series(ChartSeries::line(
        "Cash Flow Forecast",
        month_points(months, cash_flow),
    ))
}

/// One line per scenario plus the break-even line
pub fn sensitivity_chart(months: &[NaiveDate], results: &SensitivityResults) -> Chart {
    let mut chart = Chart::new(
        SENSITIVITY_ANALYSIS,
        "Sensitivity Analysis of Profit Forecast (Churn vs Marketing Spend)",
        "Month",
        "Profit ($)",
    );
    for (key, trajectory) in results.iter() {
        chart = chart.with_series(ChartSeries::line(key.label(), month_points(months, trajectory)));
    }
    chart.with_reference("Break-even Point", BREAK_EVEN_PROFIT)
}
