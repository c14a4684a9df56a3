//! Transactions Page
//!
//! Filtered listing, create/update/delete and category management.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{PageError, Record};
use crate::api::{ApiClient, ApiRequest};
use crate::forms::{display_value, require, require_number, today};

const TRANSACTIONS_PATH: &str = "/transactions/";
const CATEGORIES_PATH: &str = "/categories/";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
    Saving,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Saving => "saving",
        }
    }
}

/// Listing filters. Field order is the order of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionFilters {
    pub search: String,
    pub transaction_type: String,
    pub category: String,
    pub start_date: String,
    pub end_date: String,
    pub amount_min: String,
    pub amount_max: String,
}

impl TransactionFilters {
    /// Non-empty filters as query pairs
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("search", &self.search),
            ("transaction_type", &self.transaction_type),
            ("category", &self.category),
            ("start_date", &self.start_date),
            ("end_date", &self.end_date),
            ("amount_min", &self.amount_min),
            ("amount_max", &self.amount_max),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key, value.as_str()))
        .collect()
    }
}

/// Create/edit form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionForm {
    pub amount: String,
    pub transaction_type: TransactionType,
    pub category: String,
    pub date: String,
    #[serde(default)]
    pub note: String,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self {
            amount: String::new(),
            transaction_type: TransactionType::Expense,
            category: String::new(),
            date: today(),
            note: String::new(),
        }
    }
}

impl TransactionForm {
    /// Prefill the form from an existing transaction
    pub fn from_record(record: &Record) -> Self {
        let field = |name: &str| record.get(name).map(display_value).unwrap_or_default();

        let transaction_type = record
            .get("transaction_type")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();

        Self {
            amount: field("amount"),
            transaction_type,
            category: field("category"),
            date: field("date"),
            note: field("note"),
        }
    }

    pub fn validate(&self) -> Result<(), PageError> {
        require_number("amount", &self.amount, 0.0)?;
        require("category", &self.category)?;
        require("date", &self.date)?;
        Ok(())
    }
}

pub async fn list_transactions(
    api: &ApiClient,
    filters: &TransactionFilters,
) -> Result<Vec<Record>, PageError> {
    let request = ApiRequest::get(TRANSACTIONS_PATH).with_query(filters.query_pairs());
    Ok(api.send_json(request).await?)
}

/// Create a transaction, or update `editing_id` when set
pub async fn save_transaction(
    api: &ApiClient,
    editing_id: Option<&str>,
    form: &TransactionForm,
) -> Result<Record, PageError> {
    form.validate()?;

    let record = match editing_id {
        Some(id) => {
            let record: Record = api.put_json(&transaction_path(id), form).await?;
            info!("Transaction {} updated", id);
            record
        }
        None => {
            let record: Record = api.post_json(TRANSACTIONS_PATH, form).await?;
            info!("Transaction added");
            record
        }
    };
    Ok(record)
}

pub async fn delete_transaction(api: &ApiClient, id: &str) -> Result<(), PageError> {
    api.delete(&transaction_path(id)).await?;
    info!("Transaction {} removed", id);
    Ok(())
}

pub async fn list_categories(api: &ApiClient) -> Result<Vec<Record>, PageError> {
    Ok(api.get_json(CATEGORIES_PATH).await?)
}

/// Create a custom category. A blank name is ignored and yields `None`.
pub async fn create_category(
    api: &ApiClient,
    name: &str,
    category_type: TransactionType,
) -> Result<Option<Record>, PageError> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }

    let body = serde_json::json!({
        "name": name,
        "category_type": category_type.as_str(),
    });
    let record: Record = api.post_json(CATEGORIES_PATH, &body).await?;

    info!("Category created: {}", name);
    Ok(Some(record))
}

/// Categories offered for the form's current transaction type
pub fn categories_for_type(categories: &[Record], kind: TransactionType) -> Vec<Record> {
    categories
        .iter()
        .filter(|c| c.get("category_type") == Some(&Value::from(kind.as_str())))
        .cloned()
        .collect()
}

fn transaction_path(id: &str) -> String {
    format!("{}{}/", TRANSACTIONS_PATH, id)
}
