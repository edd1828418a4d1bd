//! Read-only spending summaries computed by the service.

use serde::{Deserialize, Serialize};
use spendwise_core::Result;
use spendwise_session::{ApiGateway, GatewayError};
use std::collections::BTreeMap;
use tracing::instrument;

const DASHBOARD_PATH: &str = "/dashboard";
const ANALYTICS_PATH: &str = "/analytics";

/// Current-month overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(default)]
    pub total_monthly_spending: f64,
    #[serde(default)]
    pub category_breakdown: BTreeMap<String, f64>,
    /// Absent when no budget is set for the month.
    #[serde(default)]
    pub monthly_budget: Option<f64>,
    /// Negative when over budget.
    #[serde(default)]
    pub remaining_amount: Option<f64>,
    /// 0 to 100.
    #[serde(default)]
    pub financial_health_score: Option<u8>,
}

/// Multi-month spending trends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    /// Spending per month, keyed by the service's month label.
    #[serde(default)]
    pub monthly_trend: BTreeMap<String, f64>,
    #[serde(default)]
    pub category_breakdown: BTreeMap<String, f64>,
    #[serde(default)]
    pub total_spent: Option<f64>,
    /// Percentage change relative to the previous month.
    #[serde(default)]
    pub month_over_month_change: Option<f64>,
}

/// Client for the dashboard and analytics endpoints.
#[derive(Clone)]
pub struct InsightClient {
    gateway: ApiGateway,
}

impl InsightClient {
    #[must_use]
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<Dashboard, GatewayError> {
        self.gateway.get_json(DASHBOARD_PATH).await
    }

    #[instrument(skip(self))]
    pub async fn analytics(&self) -> Result<Analytics, GatewayError> {
        self.gateway.get_json(ANALYTICS_PATH).await
    }
}
