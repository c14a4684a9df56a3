//! Budget Page
//!
//! Monthly budgets and the current month's status from the insights feed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{PageError, Record};
use crate::api::ApiClient;
use crate::forms::{display_value, progress_percent, require, require_number, today};

const BUDGETS_PATH: &str = "/budgets/";
const INSIGHTS_PATH: &str = "/analytics/insights/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetForm {
    pub month: String,
    pub amount: String,
}

impl Default for BudgetForm {
    fn default() -> Self {
        Self {
            month: today(),
            amount: String::new(),
        }
    }
}

impl BudgetForm {
    pub fn validate(&self) -> Result<(), PageError> {
        require("month", &self.month)?;
        require_number("amount", &self.amount, 1.0)?;
        Ok(())
    }
}

/// Budget usage for the current month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub budget: String,
    pub spent: String,
    pub remaining: String,
    pub percent_used: f64,
    pub alert: Option<String>,
}

impl BudgetStatus {
    /// Read `insights.budget`; `None` when no budget is set this month
    pub fn from_insights(insights: &Value) -> Option<Self> {
        let budget = insights.get("budget")?;
        let amount = budget.get("budget").filter(|v| !v.is_null())?;
        let spent = budget.get("spent").unwrap_or(&Value::Null);

        Some(Self {
            budget: display_value(amount),
            spent: display_value(spent),
            remaining: budget.get("remaining").map(display_value).unwrap_or_default(),
            percent_used: progress_percent(spent, amount),
            alert: budget
                .get("alert")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetPageData {
    pub budgets: Vec<Record>,
    pub status: Option<BudgetStatus>,
}

/// Budgets and insights, fetched concurrently
pub async fn load_budget_page(api: &ApiClient) -> Result<BudgetPageData, PageError> {
    let (budgets, insights) = tokio::try_join!(
        api.get_json::<Vec<Record>>(BUDGETS_PATH),
        api.get_json::<Value>(INSIGHTS_PATH),
    )?;

    Ok(BudgetPageData {
        budgets,
        status: BudgetStatus::from_insights(&insights),
    })
}

/// Save a month's budget. A month that already has one is rejected by the
/// backend and surfaces as an API error.
pub async fn save_budget(api: &ApiClient, form: &BudgetForm) -> Result<Record, PageError> {
    form.validate()?;
    let record: Record = api.post_json(BUDGETS_PATH, form).await?;
    info!("Budget saved for {}", form.month);
    Ok(record)
}
