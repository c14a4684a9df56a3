//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use smart_ledger_lib::api::ApiClient;
use smart_ledger_lib::config::AppConfig;
use smart_ledger_lib::router::Router;
use smart_ledger_lib::session::{Session, SessionContext};
use smart_ledger_lib::storage::{LocalStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use smart_ledger_lib::AppState;
use tempfile::TempDir;
use wiremock::MockServer;

/// A client against a mock server with a counting unauthenticated handler
pub struct ClientHarness {
    pub server: MockServer,
    pub api: ApiClient,
    pub session: SessionContext,
    pub logouts: Arc<AtomicUsize>,
}

impl ClientHarness {
    pub async fn start(session: Session) -> Self {
        let server = MockServer::start().await;
        let config = AppConfig::with_base_url(&server.uri());
        Self::with_config(server, config, session)
    }

    /// Like `start`, with a short per-request timeout
    pub async fn start_with_timeout(session: Session, timeout: Duration) -> Self {
        let server = MockServer::start().await;
        let mut config = AppConfig::with_base_url(&server.uri());
        config.request_timeout = timeout;
        Self::with_config(server, config, session)
    }

    fn with_config(server: MockServer, config: AppConfig, session: Session) -> Self {
        let session = SessionContext::from_session(session);
        let logouts = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&logouts);
        let api = ApiClient::new(
            &config,
            session.clone(),
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();

        Self {
            server,
            api,
            session,
            logouts,
        }
    }

    pub fn logout_calls(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }

    /// Requests the server saw for `path`
    pub async fn requests_to(&self, path: &str) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.url.path() == path)
            .collect()
    }
}

/// Fully wired application state against a mock server
pub struct AppHarness {
    pub server: MockServer,
    pub dir: TempDir,
    pub state: AppState,
}

impl AppHarness {
    pub async fn start() -> Self {
        Self::start_with_stored(None).await
    }

    /// Start with credentials already persisted, as after a previous run
    pub async fn start_with_stored(tokens: Option<(&str, &str)>) -> Self {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();

        if let Some((access, refresh)) = tokens {
            let storage = LocalStore::new(dir.path().join("storage"));
            storage.set(ACCESS_TOKEN_KEY, access).unwrap();
            storage.set(REFRESH_TOKEN_KEY, refresh).unwrap();
        }

        let config = AppConfig::with_base_url(&server.uri()).with_data_dir(dir.path());
        let state = AppState::bootstrap(config, Router::new()).unwrap();

        Self { server, dir, state }
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.state.storage.get(key).unwrap()
    }
}
