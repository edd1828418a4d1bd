//! Expense entries.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use spendwise_core::{ExpenseId, Result};
use spendwise_session::{ApiGateway, GatewayError};
use tracing::instrument;

const EXPENSES_PATH: &str = "/expenses";

/// A recorded expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Fields submitted when creating or replacing an expense.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub amount: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
}

impl ExpenseDraft {
    #[must_use]
    pub fn new(amount: f64, category: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            amount,
            category: category.into(),
            description: None,
            date,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl From<&Expense> for ExpenseDraft {
    fn from(expense: &Expense) -> Self {
        Self {
            amount: expense.amount,
            category: expense.category.clone(),
            description: expense.description.clone(),
            date: expense.date,
        }
    }
}

/// Client for `/expenses`.
#[derive(Clone)]
pub struct ExpenseClient {
    gateway: ApiGateway,
}

impl ExpenseClient {
    #[must_use]
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Lists every expense of the current user.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Expense>, GatewayError> {
        self.gateway.get_json(EXPENSES_PATH).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ExpenseId) -> Result<Expense, GatewayError> {
        self.gateway.get_json(&item_path(id)).await
    }

    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: &ExpenseDraft) -> Result<Expense, GatewayError> {
        self.gateway.post_json(EXPENSES_PATH, draft).await
    }

    /// Replaces every field of an existing expense.
    #[instrument(skip(self, draft))]
    pub async fn update(
        &self,
        id: ExpenseId,
        draft: &ExpenseDraft,
    ) -> Result<Expense, GatewayError> {
        self.gateway.put_json(&item_path(id), draft).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: ExpenseId) -> Result<(), GatewayError> {
        self.gateway.delete(&item_path(id)).await
    }
}

fn item_path(id: ExpenseId) -> String {
    format!("{EXPENSES_PATH}/{id}")
}
