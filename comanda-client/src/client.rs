//! Backend client - network communication
//!
//! Thin generic surface over the platform's row API (`/rest/v1`), named
//! functions (`/rest/v1/rpc`) and auth endpoints (`/auth/v1`). Row writes are
//! last-write-wins: no version checks, no retries. Callers decide what a
//! failure means for their screen.

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::auth::{Session, TokenResponse};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::feed::{FeedSubscription, WsConnector};
use crate::query::RowQuery;

/// Error body shapes the platform returns (the row API and the auth
/// endpoints disagree on field names)
#[derive(serde::Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ApiErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
    }
}

/// Hosted backend client
#[derive(Debug)]
pub struct Backend {
    http: Client,
    config: ClientConfig,
    session: RwLock<Option<Session>>,
}

impl Backend {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            http,
            config,
            session: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, table)
    }

    async fn bearer(&self) -> String {
        match &*self.session.read().await {
            Some(session) => format!("Bearer {}", session.access_token),
            None => format!("Bearer {}", self.config.anon_key),
        }
    }

    async fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .header(reqwest::header::AUTHORIZATION, self.bearer().await)
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(self.response_error(status, response).await);
        }
        Ok(response.json().await?)
    }

    async fn handle_empty(&self, response: reqwest::Response) -> ClientResult<()> {
        let status = response.status();
        if !status.is_success() {
            return Err(self.response_error(status, response).await);
        }
        Ok(())
    }

    async fn response_error(&self, status: StatusCode, response: reqwest::Response) -> ClientError {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(ApiErrorBody::into_message)
            .unwrap_or(text);
        if status == StatusCode::UNAUTHORIZED {
            ClientError::Auth(message)
        } else {
            ClientError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }

    // ---- row API ----

    /// Fetch rows matching the query.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: RowQuery,
    ) -> ClientResult<Vec<T>> {
        let response = self
            .request(Method::GET, &self.rest_url(table))
            .await
            .query(&query.to_query_pairs())
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Fetch at most one row.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: RowQuery,
    ) -> ClientResult<Option<T>> {
        let rows: Vec<T> = self.select(table, query.limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert a row and return the stored representation.
    pub async fn insert<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        table: &str,
        row: &B,
    ) -> ClientResult<T> {
        let response = self
            .request(Method::POST, &self.rest_url(table))
            .await
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        let mut rows: Vec<T> = self.handle_response(response).await?;
        if rows.is_empty() {
            return Err(ClientError::InvalidResponse(
                "insert returned no representation".into(),
            ));
        }
        Ok(rows.remove(0))
    }

    /// Patch the rows selected by the query's filters.
    pub async fn update<B: Serialize + Sync>(
        &self,
        table: &str,
        query: RowQuery,
        patch: &B,
    ) -> ClientResult<()> {
        let response = self
            .request(Method::PATCH, &self.rest_url(table))
            .await
            .query(&query.to_filter_pairs())
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;
        self.handle_empty(response).await
    }

    /// Delete the rows selected by the query's filters.
    pub async fn delete(&self, table: &str, query: RowQuery) -> ClientResult<()> {
        let response = self
            .request(Method::DELETE, &self.rest_url(table))
            .await
            .query(&query.to_filter_pairs())
            .send()
            .await?;
        self.handle_empty(response).await
    }

    /// Call a named backend function.
    pub async fn rpc<T: DeserializeOwned, P: Serialize + Sync>(
        &self,
        name: &str,
        params: &P,
    ) -> ClientResult<T> {
        let url = format!("{}/rest/v1/rpc/{}", self.config.base_url, name);
        let response = self
            .request(Method::POST, &url)
            .await
            .json(params)
            .send()
            .await?;
        self.handle_response(response).await
    }

    // ---- auth ----

    /// Password sign-in. The session is kept on the client and its token
    /// sent as the bearer on subsequent requests.
    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<Session> {
        let url = format!(
            "{}/auth/v1/token?grant_type=password",
            self.config.base_url
        );
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .json(&body)
            .send()
            .await?;
        let token: TokenResponse = self.handle_response(response).await?;
        let session = Session::from(token);
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    /// Current session, if signed in.
    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Fetch the authenticated user from the auth endpoint.
    pub async fn current_user(&self) -> ClientResult<crate::auth::AuthUser> {
        if self.session.read().await.is_none() {
            return Err(ClientError::NotAuthenticated);
        }
        let url = format!("{}/auth/v1/user", self.config.base_url);
        let response = self.request(Method::GET, &url).await.send().await?;
        self.handle_response(response).await
    }

    /// Revoke the session on the backend and drop it locally.
    pub async fn sign_out(&self) -> ClientResult<()> {
        if self.session.read().await.is_none() {
            return Err(ClientError::NotAuthenticated);
        }
        let url = format!("{}/auth/v1/logout", self.config.base_url);
        let response = self.request(Method::POST, &url).await.send().await?;
        self.handle_empty(response).await?;
        *self.session.write().await = None;
        Ok(())
    }

    // ---- change feed ----

    /// Subscribe to row changes on a table. The returned handle owns the
    /// background worker; dropping it (or calling `stop`) ends the
    /// subscription.
    pub fn subscribe(&self, table: &str) -> FeedSubscription {
        let connector = WsConnector::new(self.config.realtime_url());
        FeedSubscription::spawn(Box::new(connector), table)
    }
}
