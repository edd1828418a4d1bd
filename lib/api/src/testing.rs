//! Session wiring against a mock server.

use spendwise_session::{
    ClientConfig, Credential, HttpTransport, MemoryCredentialStore, Navigator, SessionController,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
pub(crate) struct LoginPrompts(AtomicUsize);

impl LoginPrompts {
    pub(crate) fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl Navigator for LoginPrompts {
    fn to_login(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

pub(crate) struct Harness {
    pub(crate) server: MockServer,
    pub(crate) session: SessionController,
    pub(crate) store: Arc<MemoryCredentialStore>,
    pub(crate) prompts: Arc<LoginPrompts>,
}

/// Starts a mock server and restores a session for "alice" with token "t1".
pub(crate) async fn authenticated() -> Harness {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "username": "alice",
            "email": "a@x.com",
            "password": null
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&ClientConfig::new(format!("{}/api", server.uri())))
        .expect("build transport");
    let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new("t1")));
    let prompts = Arc::new(LoginPrompts::default());
    let session = SessionController::new(Arc::new(transport), store.clone(), prompts.clone());
    session.initialize().await;
    assert!(session.snapshot().is_authenticated());

    Harness {
        server,
        session,
        store,
        prompts,
    }
}
