//! `reqwest`-backed API clients.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use consola_session::{ApiError, AuthApi, Credentials, TokenPair, UserRecord, UsersApi};

/// Wire envelope the console API wraps every payload in.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(
                self.message
                    .unwrap_or_else(|| "request rejected".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::Parse("successful response carried no data".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct PermissionsPayload {
    permissions: Vec<String>,
}

/// Shared request plumbing for both clients.
#[derive(Debug, Clone)]
struct HttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClient {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api(status.as_u16(), body));
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        envelope.into_data()
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.client.post(self.url(path)).json(body))
            .await
    }

    async fn get_authed<T: DeserializeOwned>(
        &self,
        path: &str,
        access_token: &str,
    ) -> Result<T, ApiError> {
        self.execute(self.client.get(self.url(path)).bearer_auth(access_token))
            .await
    }
}

/// Base URL from `CONSOLA_API_URL`, with a logged localhost default.
fn api_url_from_env() -> String {
    std::env::var("CONSOLA_API_URL").unwrap_or_else(|_| {
        tracing::warn!("CONSOLA_API_URL not set; using http://localhost:8080");
        "http://localhost:8080".to_string()
    })
}

/// Client for the authentication endpoints.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    http: HttpClient,
}

impl HttpAuthApi {
    /// `base_url` without a trailing slash, e.g. `https://api.example.com`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(base_url),
        }
    }

    pub fn from_env() -> Self {
        Self::new(api_url_from_env())
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        self.http.post_json("/auth/login", credentials).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        self.http.post_json("/auth/register", credentials).await
    }

    async fn logout(&self, access_token: &str) -> Result<(), ApiError> {
        // Best-effort: any 2xx counts, the body is ignored.
        let response = self
            .http
            .client
            .post(self.http.url("/auth/logout"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Api(
                status.as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }
        Ok(())
    }
}

/// Client for the current-user endpoints.
#[derive(Debug, Clone)]
pub struct HttpUsersApi {
    http: HttpClient,
}

impl HttpUsersApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(base_url),
        }
    }

    pub fn from_env() -> Self {
        Self::new(api_url_from_env())
    }
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn current_user(&self, access_token: &str) -> Result<UserRecord, ApiError> {
        self.http.get_authed("/users/me", access_token).await
    }

    async fn current_user_permissions(&self, access_token: &str) -> Result<Vec<String>, ApiError> {
        let payload: PermissionsPayload = self
            .http
            .get_authed("/users/me/permissions", access_token)
            .await?;
        Ok(payload.permissions)
    }
}
