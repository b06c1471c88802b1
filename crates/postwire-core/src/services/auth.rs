use std::sync::Arc;

use tracing::{debug, error, info};

use crate::api::{FetchError, HttpRequest, Transport};
use crate::config::ServiceConfig;
use crate::models::{AuthToken, Credentials, LoginResponse};
use crate::observable::StateHandle;
use crate::status::FetchStatus;

use super::state::ServiceState;

/// Holds the session token obtained from the login endpoint.
pub struct AuthService {
    transport: Arc<dyn Transport>,
    url: String,
    state: ServiceState<AuthToken>,
}

impl AuthService {
    pub fn new(transport: Arc<dyn Transport>, config: &ServiceConfig) -> Self {
        Self {
            transport,
            url: config.login_url.clone(),
            state: ServiceState::new(AuthToken::default()),
        }
    }

    pub fn token(&self) -> StateHandle<AuthToken> {
        self.state.value()
    }

    /// Current token, empty when not logged in.
    pub fn jwt(&self) -> String {
        self.state.value().borrow().as_str().to_string()
    }

    pub fn is_authenticated(&self) -> bool {
        !self.state.value().borrow().is_empty()
    }

    pub fn status(&self) -> StateHandle<FetchStatus> {
        self.state.status()
    }

    /// Exchange credentials for a token.
    ///
    /// On success the token is stored and the full response returned. On
    /// failure the stored token is left as it was, never cleared.
    ///
    /// When logins overlap, the most recently issued successful one owns the
    /// stored token. An older login that completes after it still returns
    /// `Ok` with its payload, but its token is not stored; use `jwt()` or
    /// `token()` for the session token rather than `LoginResponse::token`.
    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<LoginResponse, FetchError> {
        let credentials = Credentials::new(email, password);
        let ticket = self.state.begin();

        match self.authenticate(credentials).await {
            Ok(response) => {
                if self.state.succeed(ticket, AuthToken::new(response.token.clone())) {
                    info!("Login succeeded, token stored");
                } else {
                    debug!(ticket = ticket, "Discarding token from superseded login");
                }
                Ok(response)
            }
            Err(e) => {
                error!(url = %self.url, error = %e, "Login failed");
                self.state.fail(ticket, &e);
                Err(e)
            }
        }
    }

    async fn authenticate(&self, credentials: Credentials) -> Result<LoginResponse, FetchError> {
        let request = HttpRequest::post_json(&self.url, &credentials)?;
        drop(credentials);

        let response = self.transport.send(request).await?;
        let login: LoginResponse = response.json()?;
        if login.token.is_empty() {
            return Err(FetchError::Decode("Login response has an empty token".to_string()));
        }
        Ok(login)
    }
}
