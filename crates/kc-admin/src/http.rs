//! Admin API client over HTTP.
//!
//! Authenticates with the OpenID password grant and keeps the bearer token
//! until it expires or the server rejects it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::api::{AdminClient, MapperOwner};
use crate::dto::{
    ClientRepresentation, ClientScopeRepresentation, ProtocolMapperRepresentation,
    RealmRepresentation,
};
use crate::error::{AdminError, AdminResult};
use crate::location;

/// Tokens are refreshed this long before they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(10);

/// Credentials for the password grant.
#[derive(Clone)]
pub struct Credentials {
    /// Realm the admin user lives in.
    pub realm: String,
    /// Client used for the grant.
    pub client_id: String,
    /// Admin user name.
    pub username: String,
    /// Admin password.
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    60
}

/// Password grant request body.
#[derive(Serialize)]
struct PasswordGrant<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

/// Admin API client for one Keycloak instance.
pub struct HttpAdminClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    token: Mutex<Option<AccessToken>>,
}

impl HttpAdminClient {
    /// Creates a new client.
    ///
    /// ## Errors
    ///
    /// Returns `AdminError::InvalidUrl` if `base_url` is not an http(s) URL.
    pub fn new(
        base_url: &str,
        credentials: Credentials,
        timeout: Duration,
    ) -> AdminResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AdminError::InvalidUrl(base_url));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            credentials,
            token: Mutex::new(None),
        })
    }

    /// Gets the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn admin_url(&self, path: &str) -> String {
        format!("{}/admin/realms{}", self.base_url, path)
    }

    /// Returns a valid bearer token, fetching a new one if needed.
    async fn token(&self) -> AdminResult<String> {
        let mut token = self.token.lock().await;
        if let Some(current) = token.as_ref().filter(|t| t.is_fresh()) {
            return Ok(current.value.clone());
        }

        let fetched = self.fetch_token().await?;
        let value = fetched.value.clone();
        *token = Some(fetched);
        Ok(value)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    async fn fetch_token(&self) -> AdminResult<AccessToken> {
        let url = format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url,
            urlencoding::encode(&self.credentials.realm)
        );
        debug!(url = %url, username = %self.credentials.username, "requesting admin token");

        let response = self
            .http
            .post(&url)
            .form(&PasswordGrant {
                grant_type: "password",
                client_id: &self.credentials.client_id,
                username: &self.credentials.username,
                password: &self.credentials.password,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdminError::Auth(format!(
                "token endpoint returned {} with: {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }

    /// Sends an authenticated request, retrying once with a new token on 401.
    async fn send<F>(&self, build: F) -> AdminResult<Response>
    where
        F: Fn(&reqwest::Client) -> RequestBuilder + Send + Sync,
    {
        let token = self.token().await?;
        let response = build(&self.http).bearer_auth(token).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!("admin token rejected, requesting a new one");
        self.invalidate_token().await;
        let token = self.token().await?;
        Ok(build(&self.http).bearer_auth(token).send().await?)
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> AdminResult<T> {
        let response = self.send(|http| http.get(url)).await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    async fn get_optional<T: DeserializeOwned>(&self, url: &str) -> AdminResult<Option<T>> {
        let response = self.send(|http| http.get(url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check(response).await?;
        Ok(Some(response.json().await?))
    }

    async fn post<B: Serialize + Sync>(&self, url: &str, body: &B) -> AdminResult<()> {
        let response = self.send(|http| http.post(url).json(body)).await?;
        check(response).await.map(|_| ())
    }

    /// Posts a new object and extracts the identifier from `Location`.
    async fn post_created<B: Serialize + Sync>(&self, url: &str, body: &B) -> AdminResult<String> {
        let response = self.send(|http| http.post(url).json(body)).await?;
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = if status >= 400 {
            response.text().await.unwrap_or_default()
        } else {
            String::new()
        };
        location::created_id(status, location.as_deref(), &body)
    }

    async fn put<B: Serialize + Sync>(&self, url: &str, body: &B) -> AdminResult<()> {
        let response = self.send(|http| http.put(url).json(body)).await?;
        check(response).await.map(|_| ())
    }

    async fn delete(&self, url: &str) -> AdminResult<()> {
        let response = self.send(|http| http.delete(url)).await?;
        check(response).await.map(|_| ())
    }
}

/// Converts a non-success response into a structured error.
async fn check(response: Response) -> AdminResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(AdminError::api(status.as_u16(), body))
    }
}

fn seg(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}

#[async_trait]
impl AdminClient for HttpAdminClient {
    async fn server_info(&self) -> AdminResult<()> {
        let url = format!("{}/admin/serverinfo", self.base_url);
        let _: serde_json::Value = self.get(&url).await?;
        Ok(())
    }

    async fn realm(&self, realm: &str) -> AdminResult<Option<RealmRepresentation>> {
        self.get_optional(&self.admin_url(&format!("/{}", seg(realm))))
            .await
    }

    async fn create_realm(&self, realm: &RealmRepresentation) -> AdminResult<()> {
        self.post(&self.admin_url(""), realm).await
    }

    async fn update_realm(
        &self,
        realm: &str,
        representation: &RealmRepresentation,
    ) -> AdminResult<()> {
        self.put(&self.admin_url(&format!("/{}", seg(realm))), representation)
            .await
    }

    async fn delete_realm(&self, realm: &str) -> AdminResult<()> {
        self.delete(&self.admin_url(&format!("/{}", seg(realm))))
            .await
    }

    async fn clients(&self, realm: &str) -> AdminResult<Vec<ClientRepresentation>> {
        self.get(&self.admin_url(&format!("/{}/clients", seg(realm))))
            .await
    }

    async fn create_client(
        &self,
        realm: &str,
        client: &ClientRepresentation,
    ) -> AdminResult<String> {
        self.post_created(&self.admin_url(&format!("/{}/clients", seg(realm))), client)
            .await
    }

    async fn update_client(
        &self,
        realm: &str,
        id: &str,
        client: &ClientRepresentation,
    ) -> AdminResult<()> {
        let url = self.admin_url(&format!("/{}/clients/{}", seg(realm), seg(id)));
        self.put(&url, client).await
    }

    async fn delete_client(&self, realm: &str, id: &str) -> AdminResult<()> {
        let url = self.admin_url(&format!("/{}/clients/{}", seg(realm), seg(id)));
        self.delete(&url).await
    }

    async fn client_scopes(&self, realm: &str) -> AdminResult<Vec<ClientScopeRepresentation>> {
        self.get(&self.admin_url(&format!("/{}/client-scopes", seg(realm))))
            .await
    }

    async fn create_client_scope(
        &self,
        realm: &str,
        scope: &ClientScopeRepresentation,
    ) -> AdminResult<String> {
        let url = self.admin_url(&format!("/{}/client-scopes", seg(realm)));
        self.post_created(&url, scope).await
    }

    async fn update_client_scope(
        &self,
        realm: &str,
        id: &str,
        scope: &ClientScopeRepresentation,
    ) -> AdminResult<()> {
        let url = self.admin_url(&format!("/{}/client-scopes/{}", seg(realm), seg(id)));
        self.put(&url, scope).await
    }

    async fn delete_client_scope(&self, realm: &str, id: &str) -> AdminResult<()> {
        let url = self.admin_url(&format!("/{}/client-scopes/{}", seg(realm), seg(id)));
        self.delete(&url).await
    }

    async fn protocol_mappers(
        &self,
        realm: &str,
        owner: MapperOwner<'_>,
    ) -> AdminResult<Vec<ProtocolMapperRepresentation>> {
        let url = self.admin_url(&format!(
            "/{}/{}/{}/protocol-mappers/models",
            seg(realm),
            owner.collection(),
            seg(owner.id())
        ));
        self.get(&url).await
    }

    async fn create_protocol_mapper(
        &self,
        realm: &str,
        owner: MapperOwner<'_>,
        mapper: &ProtocolMapperRepresentation,
    ) -> AdminResult<String> {
        let url = self.admin_url(&format!(
            "/{}/{}/{}/protocol-mappers/models",
            seg(realm),
            owner.collection(),
            seg(owner.id())
        ));
        self.post_created(&url, mapper).await
    }

    async fn update_protocol_mapper(
        &self,
        realm: &str,
        owner: MapperOwner<'_>,
        id: &str,
        mapper: &ProtocolMapperRepresentation,
    ) -> AdminResult<()> {
        let url = self.admin_url(&format!(
            "/{}/{}/{}/protocol-mappers/models/{}",
            seg(realm),
            owner.collection(),
            seg(owner.id()),
            seg(id)
        ));
        self.put(&url, mapper).await
    }

    async fn delete_protocol_mapper(
        &self,
        realm: &str,
        owner: MapperOwner<'_>,
        id: &str,
    ) -> AdminResult<()> {
        let url = self.admin_url(&format!(
            "/{}/{}/{}/protocol-mappers/models/{}",
            seg(realm),
            owner.collection(),
            seg(owner.id()),
            seg(id)
        ));
        self.delete(&url).await
    }
}
