// Login, signup and logout on top of the API client

use crate::api_client::{ApiClient, RequestOptions, RetryPolicy};
use crate::error::Result;
use crate::types::{AuthResponse, LoginRequest, SignupRequest, User};
use tracing::{info, warn};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const SIGNUP_PATH: &str = "/api/auth/signup";
pub const LOGOUT_PATH: &str = "/api/auth/logout";

/// Authentication session bound to one [`ApiClient`]
///
/// The token lives in the client's token store and the profile in the
/// client itself, so a token refresh that returns a profile is visible here.
#[derive(Clone)]
pub struct AuthSession {
    client: ApiClient,
}

impl AuthSession {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Signed-in user, if any
    pub fn user(&self) -> Option<User> {
        self.client.current_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.token_store().is_present()
    }

    /// Authenticate with email and password
    ///
    /// A 401 here means bad credentials, so no refresh is attempted.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let options = RequestOptions::post().with_json(&request)?;

        let response: AuthResponse = self
            .client
            .fetch_json(LOGIN_PATH, &options, RetryPolicy::Never)
            .await?;

        Ok(self.establish(response))
    }

    /// Register a new account and sign it in
    pub async fn signup(&self, request: &SignupRequest) -> Result<User> {
        let options = RequestOptions::post().with_json(request)?;

        let response: AuthResponse = self
            .client
            .fetch_json(SIGNUP_PATH, &options, RetryPolicy::Never)
            .await?;

        Ok(self.establish(response))
    }

    /// End the session
    ///
    /// Local state is cleared whatever the backend answers.
    pub async fn logout(&self) {
        match self
            .client
            .send_unchecked(LOGOUT_PATH, &RequestOptions::post())
            .await
        {
            Ok(response) if response.status().is_success() => info!("Logged out"),
            Ok(response) => warn!(status = %response.status(), "Logout rejected by backend"),
            Err(e) => warn!(error = %e, "Logout request failed"),
        }

        self.client.set_access_token(None);
        self.client.set_current_user(None);
    }

    fn establish(&self, response: AuthResponse) -> User {
        self.client.set_access_token(Some(response.access_token));
        self.client.set_current_user(Some(response.user.clone()));
        info!(user_id = response.user.id, "Signed in");
        response.user
    }
}
