//! API gateway: the single outbound channel for every resource call.
//!
//! The gateway is a middleware stage around a [`Transport`]:
//! 1. read the credential store and attach the credential as a bearer token
//! 2. execute the request
//! 3. on 403, tear the session down and navigate to login
//! 4. hand every other failure back to the caller untouched
//!
//! Resource collaborators never attach credentials and never look at 403s
//! themselves.

use crate::credential::CredentialStore;
use crate::error::GatewayError;
use crate::navigation::Navigator;
use crate::state::{SessionCell, SessionEnd};
use crate::transport::{ApiResponse, OutboundRequest, Transport};
use rootcause::prelude::Report;
use serde::Serialize;
use serde::de::DeserializeOwned;
use spendwise_core::Result;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Forced-teardown capability handed to the gateway by the session controller.
#[derive(Clone)]
pub(crate) struct Teardown {
    cell: Arc<SessionCell>,
    navigator: Arc<dyn Navigator>,
}

impl Teardown {
    pub(crate) fn new(cell: Arc<SessionCell>, navigator: Arc<dyn Navigator>) -> Self {
        Self { cell, navigator }
    }

    /// Clears the store, ends the session, and navigates to login.
    ///
    /// Navigation happens only for the call that actually tore something
    /// down, so concurrent rejections navigate once.
    fn revoke(&self) {
        if self.cell.sign_out(SessionEnd::Revoked) {
            info!("session revoked by server");
            self.navigator.to_login();
        }
    }
}

/// Outbound channel for all resource calls.
///
/// Cheap to clone; clones share the transport, the store, and the session.
#[derive(Clone)]
pub struct ApiGateway {
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
    teardown: Teardown,
}

impl ApiGateway {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
        teardown: Teardown,
    ) -> Self {
        Self {
            transport,
            store,
            teardown,
        }
    }

    /// Sends a request and applies the authorization policy to its response.
    ///
    /// Returns the response for 2xx statuses. A 403 tears the session down and
    /// fails with [`GatewayError::AuthorizationRevoked`]; other statuses fail
    /// with [`GatewayError::Rejected`] or [`GatewayError::ServerFault`].
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn send(&self, request: OutboundRequest) -> Result<ApiResponse, GatewayError> {
        // Read at send time so a credential replaced mid-session is honored.
        let request = request.with_bearer(self.store.get());
        let authenticated = request.bearer().is_some();

        let response = self.transport.execute(&request).await?;
        let status = response.status();
        debug!(status, authenticated, "response received");

        if response.is_success() {
            return Ok(response);
        }

        let path = request.path().to_string();
        if response.is_forbidden() {
            warn!("credential rejected, tearing down session");
            self.teardown.revoke();
            return Err(GatewayError::AuthorizationRevoked { path }.into());
        }

        let message = response.error_message();
        if status >= 500 {
            Err(GatewayError::ServerFault {
                status,
                path,
                message,
            }
            .into())
        } else {
            Err(GatewayError::Rejected {
                status,
                path,
                message,
            }
            .into())
        }
    }

    /// Sends a request and decodes the JSON response body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: OutboundRequest,
    ) -> Result<T, GatewayError> {
        let path = request.path().to_string();
        let response = self.send(request).await?;
        response.json().map_err(|e| {
            GatewayError::Decode {
                path,
                details: e.to_string(),
            }
            .into()
        })
    }

    /// GET `path` and decode the body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.send_json(OutboundRequest::get(path)).await
    }

    /// POST `body` to `path` and decode the response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = OutboundRequest::post(path).with_body(encode(path, body)?);
        self.send_json(request).await
    }

    /// POST to `path` without a body and decode the response.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.send_json(OutboundRequest::post(path)).await
    }

    /// PUT `body` to `path` and decode the response.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = OutboundRequest::put(path).with_body(encode(path, body)?);
        self.send_json(request).await
    }

    /// DELETE `path`, ignoring any response body.
    pub async fn delete(&self, path: &str) -> Result<(), GatewayError> {
        self.send(OutboundRequest::delete(path)).await?;
        Ok(())
    }
}

fn encode<B: Serialize + ?Sized>(
    path: &str,
    body: &B,
) -> std::result::Result<serde_json::Value, Report<GatewayError>> {
    serde_json::to_value(body).map_err(|e| {
        GatewayError::Encode {
            path: path.to_string(),
            details: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{Credential, MemoryCredentialStore};
    use crate::identity::Identity;
    use crate::navigation::testing::CountingNavigator;
    use crate::role::RoleSet;
    use crate::state::SessionStatus;
    use crate::testing::ScriptedTransport;
    use crate::transport::Method;

    struct Fixture {
        gateway: ApiGateway,
        transport: Arc<ScriptedTransport>,
        store: Arc<MemoryCredentialStore>,
        cell: Arc<SessionCell>,
        navigator: Arc<CountingNavigator>,
    }

    fn authenticated_fixture() -> Fixture {
        let transport = Arc::new(ScriptedTransport::new());
        let store = Arc::new(MemoryCredentialStore::new());
        let cell = Arc::new(SessionCell::new(store.clone()));
        let navigator = Arc::new(CountingNavigator::default());
        cell.establish(
            cell.ticket(),
            Credential::new("t1"),
            Identity::new("alice", "a@x.com", RoleSet::user()),
        );
        let gateway = ApiGateway::new(
            transport.clone(),
            store.clone(),
            Teardown::new(cell.clone(), navigator.clone()),
        );
        Fixture {
            gateway,
            transport,
            store,
            cell,
            navigator,
        }
    }

    #[tokio::test]
    async fn attaches_current_store_value_at_send_time() {
        let fx = authenticated_fixture();
        fx.transport.respond(Method::Get, "/expenses", 200, "[]");
        fx.transport.respond(Method::Get, "/expenses", 200, "[]");

        fx.gateway
            .send(OutboundRequest::get("/expenses"))
            .await
            .expect("first call");
        fx.store.set(Credential::new("t2"));
        fx.gateway
            .send(OutboundRequest::get("/expenses"))
            .await
            .expect("second call");

        let bearers: Vec<_> = fx
            .transport
            .calls()
            .into_iter()
            .map(|call| call.bearer)
            .collect();
        assert_eq!(bearers, vec![Some("t1".to_string()), Some("t2".to_string())]);
    }

    #[tokio::test]
    async fn sends_unauthenticated_when_store_is_empty() {
        let fx = authenticated_fixture();
        fx.store.clear();
        fx.transport.respond(Method::Get, "/public/health", 200, "{}");

        fx.gateway
            .send(OutboundRequest::get("/public/health"))
            .await
            .expect("call");

        assert_eq!(fx.transport.calls()[0].bearer, None);
    }

    #[tokio::test]
    async fn forbidden_on_any_endpoint_tears_down() {
        for path in ["/expenses", "/budgets/current", "/goals", "/ai/chat", "/users/me"] {
            let fx = authenticated_fixture();
            fx.transport.respond(Method::Get, path, 403, "");

            let err = fx
                .gateway
                .send(OutboundRequest::get(path))
                .await
                .expect_err("should fail");

            assert!(matches!(
                err.current_context(),
                GatewayError::AuthorizationRevoked { .. }
            ));
            assert!(fx.store.get().is_none(), "store not cleared for {path}");
            assert_eq!(fx.cell.snapshot().status(), SessionStatus::Unauthenticated);
            assert_eq!(fx.cell.snapshot().ended(), Some(SessionEnd::Revoked));
            assert_eq!(fx.navigator.count(), 1);
        }
    }

    #[tokio::test]
    async fn concurrent_forbidden_navigates_once() {
        let fx = authenticated_fixture();
        for path in ["/expenses", "/goals", "/dashboard"] {
            fx.transport.respond(Method::Get, path, 403, "");
        }

        let (a, b, c) = tokio::join!(
            fx.gateway.send(OutboundRequest::get("/expenses")),
            fx.gateway.send(OutboundRequest::get("/goals")),
            fx.gateway.send(OutboundRequest::get("/dashboard")),
        );

        assert!(a.is_err() && b.is_err() && c.is_err());
        assert!(fx.store.get().is_none());
        assert_eq!(fx.cell.snapshot().status(), SessionStatus::Unauthenticated);
        assert_eq!(fx.navigator.count(), 1);
    }

    #[tokio::test]
    async fn validation_errors_pass_through() {
        let fx = authenticated_fixture();
        fx.transport.respond(
            Method::Post,
            "/budgets",
            400,
            r#"{"message":"monthlyLimit must be positive"}"#,
        );

        let err = fx
            .gateway
            .post_json::<_, serde_json::Value>("/budgets", &serde_json::json!({}))
            .await
            .expect_err("should fail");

        assert_eq!(
            err.current_context(),
            &GatewayError::Rejected {
                status: 400,
                path: "/budgets".to_string(),
                message: "monthlyLimit must be positive".to_string(),
            }
        );
        assert!(fx.cell.snapshot().is_authenticated());
        assert_eq!(fx.store.get(), Some(Credential::new("t1")));
        assert_eq!(fx.navigator.count(), 0);
    }

    #[tokio::test]
    async fn server_faults_pass_through_without_retry() {
        let fx = authenticated_fixture();
        fx.transport.respond(Method::Get, "/analytics", 503, "down");

        let err = fx
            .gateway
            .get_json::<serde_json::Value>("/analytics")
            .await
            .expect_err("should fail");

        assert!(matches!(
            err.current_context(),
            GatewayError::ServerFault { status: 503, .. }
        ));
        assert_eq!(fx.transport.calls().len(), 1);
        assert!(fx.cell.snapshot().is_authenticated());
    }

    #[tokio::test]
    async fn network_failures_pass_through() {
        let fx = authenticated_fixture();
        fx.transport.fail(Method::Get, "/dashboard", "connection reset");

        let err = fx
            .gateway
            .get_json::<serde_json::Value>("/dashboard")
            .await
            .expect_err("should fail");

        assert!(matches!(err.current_context(), GatewayError::Network { .. }));
        assert!(fx.cell.snapshot().is_authenticated());
    }

    #[tokio::test]
    async fn undecodable_body_is_decode_error() {
        let fx = authenticated_fixture();
        fx.transport.respond(Method::Get, "/dashboard", 200, "not json");

        let err = fx
            .gateway
            .get_json::<serde_json::Value>("/dashboard")
            .await
            .expect_err("should fail");

        assert!(matches!(err.current_context(), GatewayError::Decode { .. }));
    }

    #[tokio::test]
    async fn delete_ignores_empty_body() {
        let fx = authenticated_fixture();
        fx.transport.respond(Method::Delete, "/goals/3", 204, "");

        fx.gateway.delete("/goals/3").await.expect("delete");
        assert_eq!(fx.transport.calls()[0].method, Method::Delete);
    }
}
