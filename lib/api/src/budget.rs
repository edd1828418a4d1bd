//! Monthly budgets.
//!
//! A budget is keyed by month and year; posting one for a month that already
//! has a budget replaces its limit. Spending figures are computed by the
//! service.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use spendwise_core::{BudgetId, Result};
use spendwise_session::{ApiGateway, GatewayError};
use tracing::instrument;

const BUDGETS_PATH: &str = "/budgets";
const CURRENT_BUDGET_PATH: &str = "/budgets/current";

/// Request to create or replace a monthly budget.
///
/// Month and year default to the current month on the server when omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    pub monthly_limit: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl BudgetRequest {
    /// Creates a request for the current month.
    #[must_use]
    pub fn current(monthly_limit: f64) -> Self {
        Self {
            monthly_limit,
            month: None,
            year: None,
        }
    }

    /// Creates a request for a specific month.
    #[must_use]
    pub fn for_month(monthly_limit: f64, month: u32, year: i32) -> Self {
        Self {
            monthly_limit,
            month: Some(month),
            year: Some(year),
        }
    }
}

/// A monthly budget with the service's spending figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: BudgetId,
    pub monthly_limit: f64,
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub total_spent: f64,
    #[serde(default)]
    pub remaining_amount: f64,
    #[serde(default)]
    pub usage_percentage: f64,
    #[serde(default)]
    pub exceeded: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Client for `/budgets`.
#[derive(Clone)]
pub struct BudgetClient {
    gateway: ApiGateway,
}

impl BudgetClient {
    #[must_use]
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Returns the budget of the current month.
    #[instrument(skip(self))]
    pub async fn current(&self) -> Result<Budget, GatewayError> {
        self.gateway.get_json(CURRENT_BUDGET_PATH).await
    }

    #[instrument(skip(self))]
    pub async fn for_month(&self, month: u32, year: i32) -> Result<Budget, GatewayError> {
        self.gateway.get_json(&month_path(month, year)).await
    }

    /// Creates or replaces a monthly budget.
    #[instrument(skip(self))]
    pub async fn set(&self, request: &BudgetRequest) -> Result<Budget, GatewayError> {
        self.gateway.post_json(BUDGETS_PATH, request).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, month: u32, year: i32) -> Result<(), GatewayError> {
        self.gateway.delete(&month_path(month, year)).await
    }
}

fn month_path(month: u32, year: i32) -> String {
    format!("{BUDGETS_PATH}/{month}/{year}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::authenticated;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn budget_json() -> serde_json::Value {
        serde_json::json!({
            "id": 4,
            "monthlyLimit": 500.0,
            "month": 3,
            "year": 2024,
            "totalSpent": 620.0,
            "remainingAmount": -120.0,
            "usagePercentage": 124.0,
            "exceeded": true,
            "createdAt": "2024-03-01T08:00:00",
            "updatedAt": "2024-03-20T08:00:00"
        })
    }

    #[tokio::test]
    async fn reads_current_budget() {
        let h = authenticated().await;
        Mock::given(method("GET"))
            .and(path("/api/budgets/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(budget_json()))
            .mount(&h.server)
            .await;

        let budget = BudgetClient::new(h.session.gateway().clone())
            .current()
            .await
            .expect("budget");

        assert_eq!(budget.id, BudgetId::new(4));
        assert!(budget.exceeded);
        assert_eq!(budget.remaining_amount, -120.0);
    }

    #[tokio::test]
    async fn current_month_request_omits_month_and_year() {
        let h = authenticated().await;
        Mock::given(method("POST"))
            .and(path("/api/budgets"))
            .and(body_json(serde_json::json!({"monthlyLimit": 500.0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(budget_json()))
            .expect(1)
            .mount(&h.server)
            .await;

        BudgetClient::new(h.session.gateway().clone())
            .set(&BudgetRequest::current(500.0))
            .await
            .expect("set");
    }

    #[tokio::test]
    async fn validation_failure_keeps_session() {
        let h = authenticated().await;
        Mock::given(method("POST"))
            .and(path("/api/budgets"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(serde_json::json!({
                    "message": "Monthly limit must be positive"
                })),
            )
            .mount(&h.server)
            .await;

        let err = BudgetClient::new(h.session.gateway().clone())
            .set(&BudgetRequest::for_month(-1.0, 3, 2024))
            .await
            .expect_err("should fail");

        assert_eq!(
            err.current_context().message(),
            Some("Monthly limit must be positive")
        );
        assert!(h.session.snapshot().is_authenticated());
    }

    #[tokio::test]
    async fn deletes_by_month() {
        let h = authenticated().await;
        Mock::given(method("DELETE"))
            .and(path("/api/budgets/3/2024"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&h.server)
            .await;

        BudgetClient::new(h.session.gateway().clone())
            .delete(3, 2024)
            .await
            .expect("delete");
    }
}
