//! Dashboard Page
//!
//! Summary cards, chart series and insight messages. The three feeds are
//! requested together and the page renders once all of them arrive.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

use super::PageError;
use crate::api::ApiClient;
use crate::forms::{as_number, display_value};

const SUMMARY_PATH: &str = "/dashboard/summary/";
const INSIGHTS_PATH: &str = "/analytics/insights/";
const CHARTS_PATH: &str = "/analytics/charts/";

/// Raw responses of the three dashboard feeds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub summary: Value,
    pub insights: Value,
    pub charts: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCard {
    pub title: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightPanel {
    pub messages: Vec<String>,
    pub saving_rate_percent: String,
    pub income_expense_ratio: String,
    pub recommended_monthly_saving: String,
}

/// One month of a line chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub month: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub category: String,
    pub total: f64,
}

/// One bar group of the income vs expense chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeExpenseRow {
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub expense_trend: Vec<TrendPoint>,
    pub saving_growth: Vec<TrendPoint>,
    pub category_distribution: Vec<CategorySlice>,
    pub income_vs_expense: Vec<IncomeExpenseRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub cards: Vec<SummaryCard>,
    pub insights: InsightPanel,
    pub charts: ChartSeries,
}

impl DashboardView {
    pub fn from_data(data: DashboardData) -> Self {
        Self {
            cards: summary_cards(&data.summary),
            insights: insight_panel(&data.insights),
            charts: chart_series(&data.charts),
        }
    }
}

pub async fn fetch_dashboard(api: &ApiClient) -> Result<DashboardData, PageError> {
    let (summary, insights, charts) = tokio::try_join!(
        api.get_json::<Value>(SUMMARY_PATH),
        api.get_json::<Value>(INSIGHTS_PATH),
        api.get_json::<Value>(CHARTS_PATH),
    )?;

    Ok(DashboardData {
        summary,
        insights,
        charts,
    })
}

pub async fn load_dashboard(api: &ApiClient) -> Result<DashboardView, PageError> {
    Ok(DashboardView::from_data(fetch_dashboard(api).await?))
}

/// The six headline cards, in display order
pub fn summary_cards(summary: &Value) -> Vec<SummaryCard> {
    let totals = &summary["summary"];

    vec![
        card("Total Balance", &totals["total_balance"]),
        card("Total Income", &totals["total_income"]),
        card("Total Expenses", &totals["total_expenses"]),
        card("Total Savings", &totals["total_savings"]),
        card("Net Savings", &totals["net_savings"]),
        card("Current Month", &summary["monthly_overview"]["month"]),
    ]
}

fn card(title: &'static str, value: &Value) -> SummaryCard {
    SummaryCard {
        title,
        value: display_value(value),
    }
}

pub fn insight_panel(insights: &Value) -> InsightPanel {
    let messages = insights["insight_messages"]
        .as_array()
        .map(|items| items.iter().map(display_value).collect())
        .unwrap_or_default();

    InsightPanel {
        messages,
        saving_rate_percent: display_value(&insights["saving_rate_percent"]),
        income_expense_ratio: display_value(&insights["income_expense_ratio"]),
        recommended_monthly_saving: display_value(&insights["recommended_monthly_saving"]),
    }
}

/// Turn the charts feed into the series the chart widgets draw.
///
/// Totals arrive as decimal strings or numbers; anything unreadable counts
/// as 0. Income and expense are merged over the sorted union of their
/// months.
pub fn chart_series(charts: &Value) -> ChartSeries {
    let income = &charts["income_vs_expense"]["income"];
    let expense = &charts["income_vs_expense"]["expense"];

    ChartSeries {
        expense_trend: trend_points(&charts["expense_trend"]),
        saving_growth: trend_points(&charts["saving_growth"]),
        category_distribution: rows(&charts["category_distribution"])
            .map(|row| CategorySlice {
                category: display_value(&row["category"]),
                total: total_of(row),
            })
            .collect(),
        income_vs_expense: merge_income_expense(income, expense),
    }
}

fn merge_income_expense(income: &Value, expense: &Value) -> Vec<IncomeExpenseRow> {
    let months: BTreeSet<String> = rows(income)
        .chain(rows(expense))
        .map(|row| display_value(&row["month"]))
        .collect();

    months
        .into_iter()
        .map(|month| IncomeExpenseRow {
            income: month_total(income, &month),
            expense: month_total(expense, &month),
            month,
        })
        .collect()
}

fn month_total(series: &Value, month: &str) -> f64 {
    rows(series)
        .find(|row| row["month"].as_str() == Some(month))
        .map(total_of)
        .unwrap_or(0.0)
}

fn trend_points(series: &Value) -> Vec<TrendPoint> {
    rows(series)
        .map(|row| TrendPoint {
            month: display_value(&row["month"]),
            total: total_of(row),
        })
        .collect()
}

fn total_of(row: &Value) -> f64 {
    as_number(&row["total"]).unwrap_or(0.0)
}

fn rows(series: &Value) -> impl Iterator<Item = &Value> {
    series.as_array().into_iter().flatten()
}
