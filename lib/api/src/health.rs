//! Public liveness probe.

use serde::{Deserialize, Serialize};
use spendwise_core::Result;
use spendwise_session::{ApiGateway, GatewayError};
use tracing::instrument;

const HEALTH_PATH: &str = "/public/health";

/// Liveness report of the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub application: Option<String>,
}

impl Health {
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.status.eq_ignore_ascii_case("up")
    }
}

/// Client for the health probe. Needs no credential.
#[derive(Clone)]
pub struct HealthClient {
    gateway: ApiGateway,
}

impl HealthClient {
    #[must_use]
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    #[instrument(skip(self))]
    pub async fn check(&self) -> Result<Health, GatewayError> {
        self.gateway.get_json(HEALTH_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::authenticated;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn reports_up() {
        let h = authenticated().await;
        Mock::given(method("GET"))
            .and(path("/api/public/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "UP",
                "application": "SpendWise",
                "timestamp": [2024, 3, 4, 12, 0, 0]
            })))
            .mount(&h.server)
            .await;

        let health = HealthClient::new(h.session.gateway().clone())
            .check()
            .await
            .expect("health");

        assert!(health.is_up());
        assert_eq!(health.application.as_deref(), Some("SpendWise"));
    }
}
