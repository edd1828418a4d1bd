//! Recurring charges such as subscriptions and rent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use spendwise_core::{RecurringExpenseId, Result};
use spendwise_session::{ApiGateway, GatewayError};
use std::fmt;
use std::str::FromStr;
use tracing::instrument;

const RECURRING_PATH: &str = "/recurring-expenses";

/// How often a recurring charge falls due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Weekly,
    Monthly,
    Yearly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(format!("unknown frequency: {other}")),
        }
    }
}

/// A recurring charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringExpense {
    pub id: RecurringExpenseId,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub next_due_date: Option<NaiveDate>,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn active_by_default() -> bool {
    true
}

/// Fields submitted when adding a recurring charge.
///
/// The first due date defaults to the start date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringDraft {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub next_due_date: NaiveDate,
    pub active: bool,
}

impl RecurringDraft {
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
            frequency,
            start_date,
            next_due_date: start_date,
            active: true,
        }
    }
}

/// Client for `/recurring-expenses`.
#[derive(Clone)]
pub struct RecurringClient {
    gateway: ApiGateway,
}

impl RecurringClient {
    #[must_use]
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<RecurringExpense>, GatewayError> {
        self.gateway.get_json(RECURRING_PATH).await
    }

    #[instrument(skip(self, draft))]
    pub async fn add(&self, draft: &RecurringDraft) -> Result<RecurringExpense, GatewayError> {
        self.gateway.post_json(RECURRING_PATH, draft).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: RecurringExpenseId) -> Result<(), GatewayError> {
        self.gateway
            .delete(&format!("{RECURRING_PATH}/{id}"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::authenticated;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[test]
    fn frequency_parses_case_insensitively() {
        assert_eq!("Monthly".parse::<Frequency>(), Ok(Frequency::Monthly));
        assert!("daily".parse::<Frequency>().is_err());
    }

    #[tokio::test]
    async fn adds_with_uppercase_frequency() {
        let h = authenticated().await;
        Mock::given(method("POST"))
            .and(path("/api/recurring-expenses"))
            .and(body_json(serde_json::json!({
                "description": "Streaming",
                "amount": 11.99,
                "category": "Subscription",
                "frequency": "MONTHLY",
                "startDate": "2024-01-15",
                "nextDueDate": "2024-01-15",
                "active": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 5,
                "description": "Streaming",
                "amount": 11.99,
                "category": "Subscription",
                "frequency": "MONTHLY",
                "startDate": "2024-01-15",
                "nextDueDate": "2024-02-15"
            })))
            .expect(1)
            .mount(&h.server)
            .await;

        let start = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
        let added = RecurringClient::new(h.session.gateway().clone())
            .add(&RecurringDraft::new(
                "Streaming",
                11.99,
                "Subscription",
                Frequency::Monthly,
                start,
            ))
            .await
            .expect("add");

        assert_eq!(added.id, RecurringExpenseId::new(5));
        assert!(added.active);
        assert_eq!(added.next_due_date, NaiveDate::from_ymd_opt(2024, 2, 15));
    }
}
