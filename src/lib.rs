//! Smart Ledger Desktop Library
//!
//! Core modules for the personal-finance client.

pub mod api;
pub mod auth;
pub mod config;
pub mod forms;
pub mod logging;
pub mod pages;
pub mod router;
pub mod session;
pub mod storage;

#[cfg(feature = "desktop")]
pub mod commands;

use std::sync::Arc;

use api::ApiClient;
use auth::{AuthController, AuthError};
use config::AppConfig;
use router::Router;
use session::SessionContext;
use storage::LocalStore;

/// Application state shared across commands
pub struct AppState {
    pub config: AppConfig,
    pub storage: LocalStore,
    pub session: SessionContext,
    pub router: Arc<Router>,
    pub api: ApiClient,
    pub auth: AuthController,
}

impl AppState {
    /// Wire the client together and restore any persisted session
    pub fn bootstrap(config: AppConfig, router: Router) -> Result<Self, AuthError> {
        let storage = LocalStore::new(config.data_dir.join("storage"));
        let session = SessionContext::new();
        let router = Arc::new(router);

        let on_unauthenticated =
            auth::expire_session_handler(session.clone(), storage.clone(), router.clone());
        let api = ApiClient::new(&config, session.clone(), on_unauthenticated)?;
        let auth = AuthController::new(api.clone(), storage.clone(), router.clone());

        auth.restore()?;

        Ok(Self {
            config,
            storage,
            session,
            router,
            api,
            auth,
        })
    }
}
