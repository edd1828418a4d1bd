//! Savings goals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use spendwise_core::{GoalId, Result};
use spendwise_session::{ApiGateway, GatewayError};
use tracing::instrument;

const GOALS_PATH: &str = "/goals";

/// A savings goal and its progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: GoalId,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl SavingsGoal {
    /// Returns progress towards the target as a percentage, capped at 100.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        (self.current_amount / self.target_amount * 100.0).clamp(0.0, 100.0)
    }
}

/// Fields submitted when creating or replacing a goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDraft {
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl GoalDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, target_amount: f64) -> Self {
        Self {
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            deadline: None,
            icon: None,
        }
    }
}

impl From<&SavingsGoal> for GoalDraft {
    fn from(goal: &SavingsGoal) -> Self {
        Self {
            name: goal.name.clone(),
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            deadline: goal.deadline,
            icon: goal.icon.clone(),
        }
    }
}

/// Client for `/goals`.
#[derive(Clone)]
pub struct GoalClient {
    gateway: ApiGateway,
}

impl GoalClient {
    #[must_use]
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<SavingsGoal>, GatewayError> {
        self.gateway.get_json(GOALS_PATH).await
    }

    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: &GoalDraft) -> Result<SavingsGoal, GatewayError> {
        self.gateway.post_json(GOALS_PATH, draft).await
    }

    #[instrument(skip(self, draft))]
    pub async fn update(
        &self,
        id: GoalId,
        draft: &GoalDraft,
    ) -> Result<SavingsGoal, GatewayError> {
        self.gateway.put_json(&item_path(id), draft).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: GoalId) -> Result<(), GatewayError> {
        self.gateway.delete(&item_path(id)).await
    }
}

fn item_path(id: GoalId) -> String {
    format!("{GOALS_PATH}/{id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::authenticated;
    use spendwise_session::{SessionEnd, SessionStatus};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[test]
    fn progress_is_capped() {
        let mut goal = SavingsGoal {
            id: GoalId::new(1),
            name: "Bike".to_string(),
            target_amount: 400.0,
            current_amount: 100.0,
            deadline: None,
            icon: None,
        };
        assert_eq!(goal.progress_percent(), 25.0);
        goal.current_amount = 900.0;
        assert_eq!(goal.progress_percent(), 100.0);
        goal.target_amount = 0.0;
        assert_eq!(goal.progress_percent(), 0.0);
    }

    #[tokio::test]
    async fn lists_goals() {
        let h = authenticated().await;
        Mock::given(method("GET"))
            .and(path("/api/goals"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 2,
                    "name": "Holiday",
                    "targetAmount": 2000.0,
                    "currentAmount": 350.0,
                    "deadline": "2025-06-01",
                    "icon": "plane"
                }
            ])))
            .mount(&h.server)
            .await;

        let goals = GoalClient::new(h.session.gateway().clone())
            .list()
            .await
            .expect("list");

        assert_eq!(goals[0].name, "Holiday");
        assert_eq!(goals[0].deadline, NaiveDate::from_ymd_opt(2025, 6, 1));
    }

    #[tokio::test]
    async fn forbidden_listing_ends_session() {
        let h = authenticated().await;
        Mock::given(method("GET"))
            .and(path("/api/goals"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&h.server)
            .await;

        let err = GoalClient::new(h.session.gateway().clone())
            .list()
            .await
            .expect_err("should fail");

        assert!(matches!(
            err.current_context(),
            GatewayError::AuthorizationRevoked { .. }
        ));
        let session = h.session.snapshot();
        assert_eq!(session.status(), SessionStatus::Unauthenticated);
        assert_eq!(session.ended(), Some(SessionEnd::Revoked));
        assert!(session.identity().is_none());
        assert!(spendwise_session::CredentialStore::get(h.store.as_ref()).is_none());
        assert_eq!(h.prompts.count(), 1);
    }
}
