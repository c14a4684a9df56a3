//! Authentication Module
//!
//! Login, registration and logout. Owns the persisted credentials and keeps
//! the shared session in step with them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, ApiError, UnauthenticatedHandler};
use crate::forms::{require, FormError};
use crate::router::{Navigator, Route};
use crate::session::{Session, SessionContext};
use crate::storage::{LocalStore, StorageError, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

const LOGIN_PATH: &str = "/auth/login/";
const REGISTER_PATH: &str = "/auth/register/";
const LOGOUT_PATH: &str = "/auth/logout/";

/// Payload of the registration form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), FormError> {
        require("email", &self.email)?;
        require("username", &self.username)?;
        require("password", &self.password)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access: String,
    refresh: String,
}

#[derive(Serialize)]
struct LogoutRequest<'a> {
    refresh: &'a str,
}

/// Orchestrates the authentication flow
pub struct AuthController {
    api: ApiClient,
    session: SessionContext,
    storage: LocalStore,
    navigator: Arc<dyn Navigator>,
}

impl AuthController {
    /// The controller writes to the same session the client reads from
    pub fn new(api: ApiClient, storage: LocalStore, navigator: Arc<dyn Navigator>) -> Self {
        let session = api.session().clone();
        Self {
            api,
            session,
            storage,
            navigator,
        }
    }

    /// Load persisted credentials into the session. Returns whether an
    /// access credential was found.
    pub fn restore(&self) -> Result<bool, AuthError> {
        let session = Session {
            access: self.storage.get(ACCESS_TOKEN_KEY)?,
            refresh: self.storage.get(REFRESH_TOKEN_KEY)?,
        };
        let authenticated = session.is_authenticated();

        self.session.update(session);
        info!(authenticated, "Session restored from storage");
        Ok(authenticated)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        require("email", email)?;
        require("password", password)?;

        let tokens: LoginResponse = self
            .api
            .post_json(LOGIN_PATH, &LoginRequest { email, password })
            .await?;

        if tokens.access.is_empty() || tokens.refresh.is_empty() {
            return Err(ApiError::Parse("login returned an empty credential".into()).into());
        }

        self.storage.set(ACCESS_TOKEN_KEY, &tokens.access)?;
        if let Err(e) = self.storage.set(REFRESH_TOKEN_KEY, &tokens.refresh) {
            // Never leave an access credential on disk without its refresh pair
            if let Err(rollback) = self.storage.remove(ACCESS_TOKEN_KEY) {
                error!("Failed to roll back stored access credential: {}", rollback);
            }
            return Err(e.into());
        }
        self.session
            .update(Session::new(tokens.access, tokens.refresh));

        info!("Logged in");
        self.navigator.navigate(Route::Dashboard);
        Ok(())
    }

    /// Create an account. Does not sign the user in.
    pub async fn register(&self, form: &RegisterForm) -> Result<(), AuthError> {
        form.validate()?;

        let _: Value = self.api.post_json(REGISTER_PATH, form).await?;

        info!("Account registered");
        Ok(())
    }

    /// Sign out. The backend is told on a best-effort basis; local state is
    /// always cleared, so calling this while signed out is harmless.
    pub async fn logout(&self) -> Result<(), AuthError> {
        if let Some(refresh) = self.session.refresh_token() {
            let result: Result<Value, ApiError> = self
                .api
                .post_json(LOGOUT_PATH, &LogoutRequest { refresh: &refresh })
                .await;
            if let Err(e) = result {
                debug!("Backend logout ignored: {}", e);
            }
        }

        clear_local_session(&self.session, &self.storage)?;
        info!("Logged out");
        self.navigator.navigate(Route::Login);
        Ok(())
    }

    pub fn session(&self) -> Session {
        self.session.snapshot()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

/// Handler given to the API client: drops the session locally and sends the
/// user back to the login route.
pub fn expire_session_handler(
    session: SessionContext,
    storage: LocalStore,
    navigator: Arc<dyn Navigator>,
) -> UnauthenticatedHandler {
    Arc::new(move || {
        warn!("Session expired, signing out");
        if let Err(e) = clear_local_session(&session, &storage) {
            error!("Failed to clear stored credentials: {}", e);
        }
        navigator.navigate(Route::Login);
    })
}

fn clear_local_session(session: &SessionContext, storage: &LocalStore) -> Result<(), StorageError> {
    session.clear();
    storage.remove(ACCESS_TOKEN_KEY)?;
    storage.remove(REFRESH_TOKEN_KEY)?;
    Ok(())
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Form(#[from] FormError),
}

impl AuthError {
    /// Message for a transient notification
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AuthError::Api(e) => e.user_message(fallback),
            AuthError::Form(e) => e.to_string(),
            AuthError::Storage(_) => fallback.to_string(),
        }
    }
}
