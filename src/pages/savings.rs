//! Savings Page
//!
//! Saving goals, contributions towards them and per-goal progress.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{record_id, PageError, Record};
use crate::api::ApiClient;
use crate::forms::{display_value, progress_percent, require, require_number, today};

const GOALS_PATH: &str = "/saving-goals/";
const CONTRIBUTIONS_PATH: &str = "/saving-contributions/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingGoalForm {
    pub name: String,
    pub target_amount: String,
    /// Optional; left out of the payload when empty
    #[serde(skip_serializing_if = "String::is_empty")]
    pub deadline: String,
}

impl SavingGoalForm {
    pub fn validate(&self) -> Result<(), PageError> {
        require("name", &self.name)?;
        require_number("target_amount", &self.target_amount, 1.0)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionForm {
    pub goal: String,
    pub amount: String,
    pub date: String,
    #[serde(default)]
    pub note: String,
}

impl Default for ContributionForm {
    fn default() -> Self {
        Self {
            goal: String::new(),
            amount: String::new(),
            date: today(),
            note: String::new(),
        }
    }
}

impl ContributionForm {
    pub fn validate(&self) -> Result<(), PageError> {
        require("goal", &self.goal)?;
        require_number("amount", &self.amount, 1.0)?;
        require("date", &self.date)?;
        Ok(())
    }
}

/// Progress card for one goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub id: Option<String>,
    pub name: String,
    pub target: String,
    pub saved: String,
    pub remaining: String,
    pub percent: f64,
}

impl GoalProgress {
    pub fn from_record(goal: &Record) -> Self {
        let field = |name: &str| goal.get(name).unwrap_or(&Value::Null);

        Self {
            id: record_id(goal),
            name: display_value(field("name")),
            target: display_value(field("target_amount")),
            saved: display_value(field("current_amount")),
            remaining: display_value(field("remaining_amount")),
            percent: progress_percent(field("current_amount"), field("target_amount")),
        }
    }
}

pub async fn list_goals(api: &ApiClient) -> Result<Vec<Record>, PageError> {
    Ok(api.get_json(GOALS_PATH).await?)
}

pub async fn create_goal(api: &ApiClient, form: &SavingGoalForm) -> Result<Record, PageError> {
    form.validate()?;
    let record: Record = api.post_json(GOALS_PATH, form).await?;
    info!("Goal created: {}", form.name);
    Ok(record)
}

pub async fn add_contribution(
    api: &ApiClient,
    form: &ContributionForm,
) -> Result<Record, PageError> {
    form.validate()?;
    let record: Record = api.post_json(CONTRIBUTIONS_PATH, form).await?;
    info!("Contribution added to goal {}", form.goal);
    Ok(record)
}

/// Goals with their progress, in backend order
pub async fn load_goal_progress(api: &ApiClient) -> Result<Vec<GoalProgress>, PageError> {
    let goals = list_goals(api).await?;
    Ok(goals.iter().map(GoalProgress::from_record).collect())
}
