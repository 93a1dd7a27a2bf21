//! Single-flight access token refresh

use crate::error::{ClientError, Result};
use crate::token_store::TokenStore;
use crate::types::{RefreshResponse, User};
use async_singleflight::Group;
use parking_lot::RwLock;
use reqwest::Client;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Path of the cookie-backed refresh endpoint
pub const REFRESH_PATH: &str = "/api/auth/refresh";

/// Every refresh shares one key: there is a single session per client.
const REFRESH_KEY: &str = "access-token";

/// Coalesces concurrent token refreshes into one network call
///
/// While a refresh is in flight every caller awaits that same call. Once it
/// settles, success or failure, the next caller starts a new one.
pub struct RefreshCoordinator {
    http_client: Client,
    refresh_url: String,
    token_store: TokenStore,
    current_user: Arc<RwLock<Option<User>>>,
    /// The outcome is the shared value so waiting callers see failures too
    singleflight: Group<std::result::Result<String, String>, Infallible>,
}

impl RefreshCoordinator {
    pub fn new(
        http_client: Client,
        base_url: &str,
        token_store: TokenStore,
        current_user: Arc<RwLock<Option<User>>>,
    ) -> Self {
        Self {
            http_client,
            refresh_url: format!("{base_url}{REFRESH_PATH}"),
            token_store,
            current_user,
            singleflight: Group::new(),
        }
    }

    /// Refresh the access token, joining an in-flight refresh if there is one
    ///
    /// Every caller sharing a refresh receives its outcome, failure included.
    /// On failure the token store is cleared, forcing a new login.
    pub async fn refresh_access_token_once(&self) -> Result<String> {
        loop {
            let (outcome, _, leader) = self
                .singleflight
                .work(REFRESH_KEY, async {
                    Ok::<_, Infallible>(self.refresh_and_store().await)
                })
                .await;

            match outcome {
                Some(Ok(token)) => {
                    if !leader {
                        debug!("Joined in-flight token refresh");
                    }
                    return Ok(token);
                }
                Some(Err(reason)) => return Err(ClientError::SessionExpired { reason }),
                // The caller running the refresh was dropped before it settled.
                None => debug!("In-flight token refresh was abandoned, taking it over"),
            }
        }
    }

    /// Run one refresh, clearing the token if it fails
    async fn refresh_and_store(&self) -> std::result::Result<String, String> {
        self.do_refresh().await.map_err(|e| {
            let err_msg = e.to_string();
            warn!(url = %self.refresh_url, error = %err_msg, "Token refresh failed");
            self.token_store.clear();
            err_msg
        })
    }

    /// POST to the refresh endpoint and store the rotated token
    async fn do_refresh(&self) -> Result<String> {
        debug!(url = %self.refresh_url, "Refreshing access token");

        let response = self.http_client.post(&self.refresh_url).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::RefreshFailed(response.status()));
        }

        let refreshed: RefreshResponse = response.json().await?;

        self.token_store.set(Some(refreshed.token.clone()));
        if let Some(user) = refreshed.user {
            *self.current_user.write() = Some(user);
        }
        info!("Access token refreshed successfully");

        Ok(refreshed.token)
    }
}
