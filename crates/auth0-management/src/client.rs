//! Auth0 Management API v2 HTTP client (reqwest-based).
//!
//! Covers the parent lookups and child-collection endpoints used to
//! reconcile one-to-many relationships: organization connections, members,
//! member roles and discovery domains, resource server scopes, and role and
//! user permissions and roles.

use crate::auth::ManagementAuth;
use crate::config::ManagementConfig;
use crate::error::{ManagementError, ManagementResult};
use crate::models::{
    DiscoveryDomain, DiscoveryDomainUpdate, EnabledConnection, EnabledConnectionUpdate,
    Organization, OrganizationMember, Permission, PermissionRef, ResourceServer,
    ResourceServerScope, Role, User,
};
use crate::pagination::{decode_page, Page, PageRequest};
use crate::retry::RetryPolicy;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct ManagementClient {
    /// Tenant origin, e.g. `https://example.auth0.com`.
    base_url: String,
    auth: ManagementAuth,
    http_client: Client,
    retry: RetryPolicy,
    /// Request timeout applied by `http_client`, reported on timeouts.
    timeout: Option<Duration>,
    /// Log response bodies at debug level.
    log_bodies: bool,
}

impl ManagementClient {
    /// Build a client from tenant configuration.
    pub fn new(config: &ManagementConfig) -> ManagementResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("auth0-management/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ManagementError::InvalidConfig(format!("failed to build HTTP client: {e}"))
            })?;

        let base_url = config.base_url();
        let auth = ManagementAuth::new(config.credentials.clone(), &base_url, http_client.clone());
        let mut retry = RetryPolicy::default();
        retry.max_retries = config.max_retries;

        Ok(Self {
            base_url,
            auth,
            http_client,
            retry,
            timeout: Some(config.timeout),
            log_bodies: config.debug,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(
        base_url: String,
        auth: ManagementAuth,
        http_client: Client,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            http_client,
            retry,
            timeout: None,
            log_bodies: false,
        }
    }

    /// Record the timeout the supplied `reqwest::Client` was built with so
    /// timeout errors can name it.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Parents ───────────────────────────────────────────────────────

    pub async fn get_organization(&self, id: &str) -> ManagementResult<Organization> {
        let url = self.url(&["organizations", id], &[])?;
        self.get("get_organization", url).await
    }

    pub async fn get_role(&self, id: &str) -> ManagementResult<Role> {
        let url = self.url(&["roles", id], &[])?;
        self.get("get_role", url).await
    }

    pub async fn get_user(&self, id: &str) -> ManagementResult<User> {
        let url = self.url(&["users", id], &[])?;
        self.get("get_user", url).await
    }

    /// `id` may be the resource server ID or its identifier (audience).
    pub async fn get_resource_server(&self, id: &str) -> ManagementResult<ResourceServer> {
        let url = self.url(&["resource-servers", id], &[])?;
        self.get("get_resource_server", url).await
    }

    // ── Organization connections ──────────────────────────────────────

    pub async fn list_enabled_connections(
        &self,
        organization_id: &str,
        page: PageRequest,
    ) -> ManagementResult<Page<EnabledConnection>> {
        let url = self.url(
            &["organizations", organization_id, "enabled_connections"],
            &page.query_pairs(),
        )?;
        self.get_page("list_enabled_connections", url, "enabled_connections", &page)
            .await
    }

    pub async fn add_enabled_connection(
        &self,
        organization_id: &str,
        connection: &EnabledConnection,
    ) -> ManagementResult<EnabledConnection> {
        let url = self.url(&["organizations", organization_id, "enabled_connections"], &[])?;
        self.send_json("add_enabled_connection", Method::POST, url, connection)
            .await
    }

    pub async fn update_enabled_connection(
        &self,
        organization_id: &str,
        connection_id: &str,
        update: &EnabledConnectionUpdate,
    ) -> ManagementResult<EnabledConnection> {
        let url = self.url(
            &["organizations", organization_id, "enabled_connections", connection_id],
            &[],
        )?;
        self.send_json("update_enabled_connection", Method::PATCH, url, update)
            .await
    }

    pub async fn remove_enabled_connection(
        &self,
        organization_id: &str,
        connection_id: &str,
    ) -> ManagementResult<()> {
        let url = self.url(
            &["organizations", organization_id, "enabled_connections", connection_id],
            &[],
        )?;
        self.send_empty("remove_enabled_connection", Method::DELETE, url, None)
            .await
    }

    // ── Organization members ──────────────────────────────────────────

    pub async fn list_members(
        &self,
        organization_id: &str,
        page: PageRequest,
    ) -> ManagementResult<Page<OrganizationMember>> {
        let url = self.url(
            &["organizations", organization_id, "members"],
            &page.query_pairs(),
        )?;
        self.get_page("list_members", url, "members", &page).await
    }

    pub async fn add_members(
        &self,
        organization_id: &str,
        user_ids: &[String],
    ) -> ManagementResult<()> {
        let url = self.url(&["organizations", organization_id, "members"], &[])?;
        let body = json!({ "members": user_ids });
        self.send_empty("add_members", Method::POST, url, Some(body))
            .await
    }

    pub async fn remove_members(
        &self,
        organization_id: &str,
        user_ids: &[String],
    ) -> ManagementResult<()> {
        let url = self.url(&["organizations", organization_id, "members"], &[])?;
        let body = json!({ "members": user_ids });
        self.send_empty("remove_members", Method::DELETE, url, Some(body))
            .await
    }

    // ── Organization member roles ─────────────────────────────────────

    pub async fn list_member_roles(
        &self,
        organization_id: &str,
        user_id: &str,
        page: PageRequest,
    ) -> ManagementResult<Page<Role>> {
        let url = self.url(
            &["organizations", organization_id, "members", user_id, "roles"],
            &page.query_pairs(),
        )?;
        self.get_page("list_member_roles", url, "roles", &page).await
    }

    pub async fn assign_member_roles(
        &self,
        organization_id: &str,
        user_id: &str,
        role_ids: &[String],
    ) -> ManagementResult<()> {
        let url = self.url(
            &["organizations", organization_id, "members", user_id, "roles"],
            &[],
        )?;
        let body = json!({ "roles": role_ids });
        self.send_empty("assign_member_roles", Method::POST, url, Some(body))
            .await
    }

    pub async fn remove_member_roles(
        &self,
        organization_id: &str,
        user_id: &str,
        role_ids: &[String],
    ) -> ManagementResult<()> {
        let url = self.url(
            &["organizations", organization_id, "members", user_id, "roles"],
            &[],
        )?;
        let body = json!({ "roles": role_ids });
        self.send_empty("remove_member_roles", Method::DELETE, url, Some(body))
            .await
    }

    // ── Organization discovery domains ────────────────────────────────

    pub async fn list_discovery_domains(
        &self,
        organization_id: &str,
        page: PageRequest,
    ) -> ManagementResult<Page<DiscoveryDomain>> {
        let url = self.url(
            &["organizations", organization_id, "discovery-domains"],
            &page.query_pairs(),
        )?;
        self.get_page("list_discovery_domains", url, "domains", &page)
            .await
    }

    pub async fn create_discovery_domain(
        &self,
        organization_id: &str,
        domain: &DiscoveryDomain,
    ) -> ManagementResult<DiscoveryDomain> {
        let url = self.url(&["organizations", organization_id, "discovery-domains"], &[])?;
        self.send_json("create_discovery_domain", Method::POST, url, domain)
            .await
    }

    pub async fn update_discovery_domain(
        &self,
        organization_id: &str,
        domain_id: &str,
        update: &DiscoveryDomainUpdate,
    ) -> ManagementResult<DiscoveryDomain> {
        let url = self.url(
            &["organizations", organization_id, "discovery-domains", domain_id],
            &[],
        )?;
        self.send_json("update_discovery_domain", Method::PATCH, url, update)
            .await
    }

    pub async fn delete_discovery_domain(
        &self,
        organization_id: &str,
        domain_id: &str,
    ) -> ManagementResult<()> {
        let url = self.url(
            &["organizations", organization_id, "discovery-domains", domain_id],
            &[],
        )?;
        self.send_empty("delete_discovery_domain", Method::DELETE, url, None)
            .await
    }

    // ── Resource server scopes ────────────────────────────────────────

    /// Replace the full scope list of a resource server.
    pub async fn update_resource_server_scopes(
        &self,
        id: &str,
        scopes: &[ResourceServerScope],
    ) -> ManagementResult<ResourceServer> {
        let url = self.url(&["resource-servers", id], &[])?;
        let body = json!({ "scopes": scopes });
        self.send_json("update_resource_server_scopes", Method::PATCH, url, &body)
            .await
    }

    // ── Role permissions ──────────────────────────────────────────────

    pub async fn list_role_permissions(
        &self,
        role_id: &str,
        page: PageRequest,
    ) -> ManagementResult<Page<Permission>> {
        let url = self.url(&["roles", role_id, "permissions"], &page.query_pairs())?;
        self.get_page("list_role_permissions", url, "permissions", &page)
            .await
    }

    pub async fn associate_role_permissions(
        &self,
        role_id: &str,
        permissions: &[PermissionRef],
    ) -> ManagementResult<()> {
        let url = self.url(&["roles", role_id, "permissions"], &[])?;
        let body = json!({ "permissions": permissions });
        self.send_empty("associate_role_permissions", Method::POST, url, Some(body))
            .await
    }

    pub async fn remove_role_permissions(
        &self,
        role_id: &str,
        permissions: &[PermissionRef],
    ) -> ManagementResult<()> {
        let url = self.url(&["roles", role_id, "permissions"], &[])?;
        let body = json!({ "permissions": permissions });
        self.send_empty("remove_role_permissions", Method::DELETE, url, Some(body))
            .await
    }

    // ── User permissions ──────────────────────────────────────────────

    pub async fn list_user_permissions(
        &self,
        user_id: &str,
        page: PageRequest,
    ) -> ManagementResult<Page<Permission>> {
        let url = self.url(&["users", user_id, "permissions"], &page.query_pairs())?;
        self.get_page("list_user_permissions", url, "permissions", &page)
            .await
    }

    pub async fn assign_user_permissions(
        &self,
        user_id: &str,
        permissions: &[PermissionRef],
    ) -> ManagementResult<()> {
        let url = self.url(&["users", user_id, "permissions"], &[])?;
        let body = json!({ "permissions": permissions });
        self.send_empty("assign_user_permissions", Method::POST, url, Some(body))
            .await
    }

    pub async fn remove_user_permissions(
        &self,
        user_id: &str,
        permissions: &[PermissionRef],
    ) -> ManagementResult<()> {
        let url = self.url(&["users", user_id, "permissions"], &[])?;
        let body = json!({ "permissions": permissions });
        self.send_empty("remove_user_permissions", Method::DELETE, url, Some(body))
            .await
    }

    // ── User roles ────────────────────────────────────────────────────

    pub async fn list_user_roles(
        &self,
        user_id: &str,
        page: PageRequest,
    ) -> ManagementResult<Page<Role>> {
        let url = self.url(&["users", user_id, "roles"], &page.query_pairs())?;
        self.get_page("list_user_roles", url, "roles", &page).await
    }

    pub async fn assign_user_roles(
        &self,
        user_id: &str,
        role_ids: &[String],
    ) -> ManagementResult<()> {
        let url = self.url(&["users", user_id, "roles"], &[])?;
        let body = json!({ "roles": role_ids });
        self.send_empty("assign_user_roles", Method::POST, url, Some(body))
            .await
    }

    pub async fn remove_user_roles(
        &self,
        user_id: &str,
        role_ids: &[String],
    ) -> ManagementResult<()> {
        let url = self.url(&["users", user_id, "roles"], &[])?;
        let body = json!({ "roles": role_ids });
        self.send_empty("remove_user_roles", Method::DELETE, url, Some(body))
            .await
    }

    // ── Internal HTTP Methods ─────────────────────────────────────────

    /// `{base_url}/api/v2/{segments...}?{query}`, each segment percent-encoded.
    fn url(&self, segments: &[&str], query: &[(&'static str, String)]) -> ManagementResult<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| {
                ManagementError::InvalidConfig(format!(
                    "base URL cannot hold a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("api")
            .push("v2")
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, operation: &str, url: Url) -> ManagementResult<T> {
        let body = self.execute(operation, Method::GET, url, None).await?;
        serde_json::from_str(&body)
            .map_err(|e| ManagementError::ParseError(format!("{operation}: {e}")))
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: Url,
        key: &str,
        page: &PageRequest,
    ) -> ManagementResult<Page<T>> {
        let body = self.execute(operation, Method::GET, url, None).await?;
        let value: Value = if body.trim().is_empty() {
            Value::Array(Vec::new())
        } else {
            serde_json::from_str(&body)?
        };
        decode_page(value, key, page)
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        operation: &str,
        method: Method,
        url: Url,
        body: &B,
    ) -> ManagementResult<T> {
        let payload = serde_json::to_value(body)?;
        let body = self.execute(operation, method, url, Some(&payload)).await?;
        serde_json::from_str(&body)
            .map_err(|e| ManagementError::ParseError(format!("{operation}: {e}")))
    }

    async fn send_empty(
        &self,
        operation: &str,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> ManagementResult<()> {
        self.execute(operation, method, url, body.as_ref()).await?;
        Ok(())
    }

    /// Send with retry and return the raw success body.
    async fn execute(
        &self,
        operation: &str,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> ManagementResult<String> {
        self.retry
            .execute(operation, || self.dispatch(method.clone(), url.clone(), body))
            .await
    }

    async fn dispatch(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> ManagementResult<String> {
        debug!("Management API {} {}", method, url);
        let mut builder = self.http_client.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let builder = self.auth.apply(builder).await?;
        let response = builder
            .send()
            .await
            .map_err(|e| ManagementError::from_transport(e, self.timeout))?;

        let status = response.status();
        if status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| ManagementError::from_transport(e, self.timeout))?;
            if self.log_bodies {
                debug!(status = status.as_u16(), body = %text, "Management API response");
            }
            Ok(text)
        } else {
            self.handle_error_response(response).await
        }
    }

    // ── Response Handling ─────────────────────────────────────────────

    async fn handle_error_response<T>(&self, response: reqwest::Response) -> ManagementResult<T> {
        let status = response.status();

        let retry_after = response
            .headers()
            .get("Retry-After")
            .or_else(|| response.headers().get("X-RateLimit-Reset-After"))
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        let detail = error_message(&body).unwrap_or_else(|| {
            if body.is_empty() {
                format!("HTTP {status}")
            } else {
                body.clone()
            }
        });

        match status {
            StatusCode::NOT_FOUND => Err(ManagementError::NotFound(detail)),
            StatusCode::CONFLICT => Err(ManagementError::Conflict(detail)),
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("Management API rate limited, retry after {:?}s", retry_after);
                Err(ManagementError::RateLimited {
                    retry_after_secs: retry_after,
                })
            }
            StatusCode::UNAUTHORIZED => {
                self.auth.invalidate_cache().await;
                Err(ManagementError::AuthError(format!(
                    "authentication failed (401): {detail}"
                )))
            }
            _ => Err(ManagementError::Api {
                status: status.as_u16(),
                detail,
            }),
        }
    }
}

/// Pull `message` out of an Auth0 error body
/// (`{"statusCode", "error", "message", "errorCode"}`).
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;

    fn client(base_url: &str) -> ManagementClient {
        let auth = ManagementAuth::new(
            Credentials::Bearer {
                token: "t".into(),
            },
            base_url,
            Client::new(),
        );
        ManagementClient::with_http_client(
            base_url.to_string(),
            auth,
            Client::new(),
            RetryPolicy::none(),
        )
    }

    #[test]
    fn test_url_encodes_segments() {
        let client = client("https://example.auth0.com/");
        let url = client
            .url(&["users", "auth0|abc/def", "roles"], &[])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.auth0.com/api/v2/users/auth0|abc%2Fdef/roles"
        );
    }

    #[test]
    fn test_url_with_query() {
        let client = client("https://example.auth0.com");
        let url = client
            .url(
                &["roles", "rol_1", "permissions"],
                &PageRequest::first_offset().query_pairs(),
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.auth0.com/api/v2/roles/rol_1/permissions?page=0&per_page=100&include_totals=true"
        );
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(
                r#"{"statusCode":404,"error":"Not Found","message":"The role does not exist."}"#
            ),
            Some("The role does not exist.".to_string())
        );
        assert_eq!(error_message("plain text"), None);
    }
}
