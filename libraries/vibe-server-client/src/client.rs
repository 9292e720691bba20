//! Main account server client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use vibe_core::types::{
    AccountRecord, ItemCategory, ItemId, RegisterData, ServerStats, SessionIdentity, UserId,
    UserPatch,
};
use vibe_core::AccountGateway;

use crate::error::{AccountClientError, Result};
use crate::types::{
    AdminRequest, AuthResponse, CoinsRequest, InventoryRequest, LoginRequest, ServerConfig,
    ServerInfo,
};

/// HTTP implementation of the account gateway.
///
/// Handles authentication and session-token storage, and maps the account
/// server's REST surface onto [`AccountGateway`].
///
/// # Example
///
/// ```ignore
/// use vibe_server_client::{AccountServerClient, ServerConfig};
///
/// let config = ServerConfig::new("https://accounts.example.com");
/// let client = AccountServerClient::new(config)?;
///
/// let info = client.test_connection().await?;
/// println!("Connected to {} v{}", info.name, info.version);
/// ```
#[derive(Debug)]
pub struct AccountServerClient {
    http: Client,
    config: Arc<RwLock<ServerConfig>>,
}

impl AccountServerClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(AccountClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AccountClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let normalized_config = ServerConfig {
            url,
            token: config.token,
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("VibePlayer/{} (Desktop)", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AccountClientError::Request)?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(normalized_config)),
        })
    }

    /// Get the server URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Check if the client has a session token.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.token.is_some()
    }

    /// Set the session token directly (e.g., from stored credentials).
    pub async fn set_token(&self, token: String) {
        self.config.write().await.token = Some(token);
    }

    /// Clear the stored session token.
    pub async fn clear_token(&self) {
        self.config.write().await.token = None;
        info!("Cleared session token");
    }

    /// Test the connection to the server.
    ///
    /// This does not require authentication.
    pub async fn test_connection(&self) -> Result<ServerInfo> {
        let url = format!("{}/api/info", self.url().await);
        debug!(url = %url, "Testing server connection");

        let response = self.execute(self.http.get(&url)).await?;
        let info: ServerInfo = Self::expect_json(response).await?;

        info!(name = %info.name, version = %info.version, "Connected to server");
        Ok(info)
    }

    async fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let token = self
            .config
            .read()
            .await
            .token
            .clone()
            .ok_or(AccountClientError::AuthRequired)?;
        Ok(builder.bearer_auth(token))
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                AccountClientError::ServerUnreachable(e.to_string())
            } else {
                AccountClientError::Request(e)
            }
        })?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(1);
            return Err(AccountClientError::RateLimited { retry_after_secs });
        }
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AccountClientError::AuthRequired);
        }

        Ok(response)
    }

    async fn expect_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| AccountClientError::ParseError(e.to_string()))
        } else {
            Err(Self::server_error(status, response).await)
        }
    }

    /// Interpret a mutation response: success is `true`, a missing target
    /// record is `false`, anything else is an error.
    async fn expect_flag(response: Response) -> Result<bool> {
        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(Self::server_error(status, response).await)
        }
    }

    async fn expect_ack(response: Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::server_error(status, response).await)
        }
    }

    async fn server_error(status: StatusCode, response: Response) -> AccountClientError {
        let message = response.text().await.unwrap_or_default();
        AccountClientError::ServerError {
            status: status.as_u16(),
            message,
        }
    }

    async fn authenticate(&self, url: String, body: impl serde::Serialize) -> Result<AuthResponse> {
        let response = self.execute(self.http.post(&url).json(&body)).await;

        // An invalid-credential 401 here is a login failure, not a missing token
        let auth: AuthResponse = match response {
            Ok(r) => Self::expect_json(r).await?,
            Err(AccountClientError::AuthRequired) => {
                warn!("Authentication rejected by server");
                return Err(AccountClientError::AuthFailed(
                    "Invalid username or password".to_string(),
                ));
            }
            Err(e) => return Err(e),
        };

        self.set_token(auth.token.clone()).await;
        info!(username = %auth.user.username, "Authenticated");
        Ok(auth)
    }
}

fn identity_of(user: &AccountRecord) -> SessionIdentity {
    SessionIdentity {
        user_id: UserId::new(user.id.clone()),
        username: user.username.clone(),
    }
}

#[async_trait]
impl AccountGateway for AccountServerClient {
    async fn get_user_by_id(&self, id: &UserId) -> vibe_core::Result<Option<AccountRecord>> {
        let url = format!("{}/api/users/{}", self.url().await, id.as_str());
        let builder = self.authed(self.http.get(&url)).await?;
        let response = self.execute(builder).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(Self::expect_json(response).await?))
    }

    async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> vibe_core::Result<(SessionIdentity, AccountRecord)> {
        let url = format!("{}/api/auth/login", self.url().await);
        let request = LoginRequest {
            identifier: identifier.to_string(),
            password: password.to_string(),
        };

        let auth = self.authenticate(url, request).await?;
        Ok((identity_of(&auth.user), auth.user))
    }

    async fn register(
        &self,
        data: &RegisterData,
    ) -> vibe_core::Result<(SessionIdentity, AccountRecord)> {
        let url = format!("{}/api/auth/register", self.url().await);
        let auth = self.authenticate(url, data).await?;
        Ok((identity_of(&auth.user), auth.user))
    }

    async fn update_user(&self, id: &UserId, patch: &UserPatch) -> vibe_core::Result<bool> {
        let url = format!("{}/api/users/{}", self.url().await, id.as_str());
        let builder = self.authed(self.http.patch(&url).json(patch)).await?;
        let response = self.execute(builder).await?;
        Ok(Self::expect_flag(response).await?)
    }

    async fn add_coins(&self, id: &UserId, amount: u64) -> vibe_core::Result<bool> {
        let url = format!("{}/api/users/{}/coins/add", self.url().await, id.as_str());
        let builder = self
            .authed(self.http.post(&url).json(&CoinsRequest { amount }))
            .await?;
        let response = self.execute(builder).await?;
        Ok(Self::expect_flag(response).await?)
    }

    async fn spend_coins(&self, id: &UserId, amount: u64) -> vibe_core::Result<bool> {
        let url = format!("{}/api/users/{}/coins/spend", self.url().await, id.as_str());
        let builder = self
            .authed(self.http.post(&url).json(&CoinsRequest { amount }))
            .await?;
        let response = self.execute(builder).await?;

        // The server rejects an overdraft with 409
        if response.status() == StatusCode::CONFLICT {
            return Ok(false);
        }
        Ok(Self::expect_flag(response).await?)
    }

    async fn add_to_inventory(
        &self,
        id: &UserId,
        category: ItemCategory,
        item: &ItemId,
    ) -> vibe_core::Result<bool> {
        let url = format!("{}/api/users/{}/inventory", self.url().await, id.as_str());
        let request = InventoryRequest {
            category: category.as_str().to_string(),
            item_id: item.as_str().to_string(),
        };
        let builder = self.authed(self.http.post(&url).json(&request)).await?;
        let response = self.execute(builder).await?;
        Ok(Self::expect_flag(response).await?)
    }

    async fn set_admin(&self, id: &UserId, admin: bool) -> vibe_core::Result<bool> {
        let url = format!("{}/api/users/{}/admin", self.url().await, id.as_str());
        let builder = self
            .authed(self.http.post(&url).json(&AdminRequest { admin }))
            .await?;
        let response = self.execute(builder).await?;
        Ok(Self::expect_flag(response).await?)
    }

    async fn set_premium(&self, id: &UserId) -> vibe_core::Result<bool> {
        let url = format!("{}/api/users/{}/premium", self.url().await, id.as_str());
        let builder = self.authed(self.http.post(&url)).await?;
        let response = self.execute(builder).await?;
        Ok(Self::expect_flag(response).await?)
    }

    async fn remove_premium(&self, id: &UserId) -> vibe_core::Result<bool> {
        let url = format!("{}/api/users/{}/premium", self.url().await, id.as_str());
        let builder = self.authed(self.http.delete(&url)).await?;
        let response = self.execute(builder).await?;
        Ok(Self::expect_flag(response).await?)
    }

    async fn delete_user(&self, id: &UserId) -> vibe_core::Result<bool> {
        let url = format!("{}/api/users/{}", self.url().await, id.as_str());
        let builder = self.authed(self.http.delete(&url)).await?;
        let response = self.execute(builder).await?;
        Ok(Self::expect_flag(response).await?)
    }

    async fn get_all_users_full(&self) -> vibe_core::Result<Vec<AccountRecord>> {
        let url = format!("{}/api/users", self.url().await);
        let builder = self.authed(self.http.get(&url)).await?;
        let response = self.execute(builder).await?;
        Ok(Self::expect_json(response).await?)
    }

    async fn get_stats(&self) -> vibe_core::Result<ServerStats> {
        let url = format!("{}/api/stats", self.url().await);
        let builder = self.authed(self.http.get(&url)).await?;
        let response = self.execute(builder).await?;
        Ok(Self::expect_json(response).await?)
    }

    async fn update_last_seen(&self, id: &UserId) -> vibe_core::Result<()> {
        let url = format!("{}/api/users/{}/heartbeat", self.url().await, id.as_str());
        let builder = self.authed(self.http.post(&url)).await?;
        let response = self.execute(builder).await?;
        Ok(Self::expect_ack(response).await?)
    }

    async fn set_offline(&self, id: &UserId) -> vibe_core::Result<()> {
        let url = format!("{}/api/users/{}/offline", self.url().await, id.as_str());
        let builder = self.authed(self.http.post(&url)).await?;
        let response = self.execute(builder).await?;
        Ok(Self::expect_ack(response).await?)
    }
}
