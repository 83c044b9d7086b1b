//! HTTP-level tests for the management client against a wiremock tenant.
//!
//! Tests cover:
//! - Offset and checkpoint pagination
//! - Error status classification (404, 409, 429, 5xx)
//! - Retry on transient failures
//! - Client credentials token exchange

use auth0_management::auth::{Credentials, ManagementAuth};
use auth0_management::models::{EnabledConnection, PermissionRef};
use auth0_management::pagination::{fetch_all, PageRequest};
use auth0_management::retry::RetryPolicy;
use auth0_management::{ManagementClient, ManagementError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn bearer_client(server: &MockServer, retry: RetryPolicy) -> ManagementClient {
    let auth = ManagementAuth::new(
        Credentials::Bearer {
            token: "test-token".to_string(),
        },
        &server.uri(),
        reqwest::Client::new(),
    );
    ManagementClient::with_http_client(server.uri(), auth, reqwest::Client::new(), retry)
}

// ═══════════════════════════════════════════════════════════════════════════
// Pagination
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_offset_pagination_collects_all_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/users/u1/roles"))
        .and(query_param("page", "0"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "start": 0, "limit": 2, "total": 3,
            "roles": [{"id": "rol_a", "name": "a"}, {"id": "rol_b", "name": "b"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/u1/roles"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "start": 2, "limit": 2, "total": 3,
            "roles": [{"id": "rol_c"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = bearer_client(&server, RetryPolicy::none());
    let first = PageRequest::Offset {
        page: 0,
        per_page: 2,
    };
    let roles = fetch_all(first, |page| client.list_user_roles("u1", page))
        .await
        .unwrap();

    let ids: Vec<&str> = roles.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["rol_a", "rol_b", "rol_c"]);
}

#[tokio::test]
async fn test_checkpoint_pagination_follows_next() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/org_1/members"))
        .and(query_param("from", "cursor-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "members": [{"user_id": "u3"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/org_1/members"))
        .and(query_param("take", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "members": [{"user_id": "u1"}, {"user_id": "u2", "email": "u2@example.com"}],
            "next": "cursor-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = bearer_client(&server, RetryPolicy::none());
    let members = fetch_all(PageRequest::first_checkpoint(), |page| {
        client.list_members("org_1", page)
    })
    .await
    .unwrap();

    let ids: Vec<&str> = members.iter().map(|m| m.user_id.as_str()).collect();
    assert_eq!(ids, vec!["u1", "u2", "u3"]);
}

#[tokio::test]
async fn test_offset_pagination_follows_tenant_page_size() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/users/u1/roles"))
        .and(query_param("page", "0"))
        .and(query_param("per_page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "start": 0, "limit": 2, "total": 3,
            "roles": [{"id": "rol_a"}, {"id": "rol_b"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/u1/roles"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "start": 2, "limit": 2, "total": 3,
            "roles": [{"id": "rol_c"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = bearer_client(&server, RetryPolicy::none());
    let first = PageRequest::Offset {
        page: 0,
        per_page: 3,
    };
    let roles = fetch_all(first, |page| client.list_user_roles("u1", page))
        .await
        .unwrap();

    let ids: Vec<&str> = roles.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["rol_a", "rol_b", "rol_c"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Mutations
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_add_enabled_connection_posts_request_fields_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/organizations/org_1/enabled_connections"))
        .and(body_json(json!({
            "connection_id": "con_a",
            "assign_membership_on_login": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "connection_id": "con_a",
            "assign_membership_on_login": true,
            "connection": {"name": "db", "strategy": "auth0"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = bearer_client(&server, RetryPolicy::none());
    let created = client
        .add_enabled_connection(
            "org_1",
            &EnabledConnection {
                connection_id: "con_a".into(),
                assign_membership_on_login: true,
                is_signup_enabled: None,
                show_as_button: None,
                connection: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(created.connection.unwrap().strategy, "auth0");
}

#[tokio::test]
async fn test_remove_role_permissions_sends_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/roles/rol_1/permissions"))
        .and(body_json(json!({
            "permissions": [{
                "permission_name": "read:foo",
                "resource_server_identifier": "https://api.example.com"
            }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = bearer_client(&server, RetryPolicy::none());
    client
        .remove_role_permissions(
            "rol_1",
            &[PermissionRef {
                permission_name: "read:foo".into(),
                resource_server_identifier: "https://api.example.com".into(),
            }],
        )
        .await
        .unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_404_maps_to_not_found_with_message() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/organizations/org_1/enabled_connections/con_x"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "statusCode": 404,
            "error": "Not Found",
            "message": "No connection found by that id"
        })))
        .mount(&server)
        .await;

    let client = bearer_client(&server, RetryPolicy::none());
    let err = client
        .remove_enabled_connection("org_1", "con_x")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("No connection found by that id"));
}

#[tokio::test]
async fn test_409_maps_to_conflict() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/organizations/org_1/members"))
        .respond_with(ResponseTemplate::new(409).set_body_string("duplicate"))
        .mount(&server)
        .await;

    let client = bearer_client(&server, RetryPolicy::none());
    let err = client
        .add_members("org_1", &["u1".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, ManagementError::Conflict(ref body) if body == "duplicate"));
}

#[tokio::test]
async fn test_429_is_retried_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/roles/rol_1"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/roles/rol_1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "rol_1", "name": "admin"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = bearer_client(&server, RetryPolicy::new(2, 0));
    let role = client.get_role("rol_1").await.unwrap();
    assert_eq!(role.name.as_deref(), Some("admin"));
}

#[tokio::test]
async fn test_server_error_exhausts_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/users/u1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = bearer_client(&server, RetryPolicy::new(2, 0));
    let err = client.get_user("u1").await.unwrap_err();
    assert!(matches!(
        err,
        ManagementError::MaxRetriesExceeded { attempts: 3, .. }
    ));
}

#[tokio::test]
async fn test_401_is_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/org_1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "statusCode": 401, "message": "Invalid token"
        })))
        .mount(&server)
        .await;

    let client = bearer_client(&server, RetryPolicy::none());
    let err = client.get_organization("org_1").await.unwrap_err();
    assert!(matches!(err, ManagementError::AuthError(ref m) if m.contains("Invalid token")));
}

#[tokio::test]
async fn test_timeout_names_configured_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/roles/rol_1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "rol_1"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let timeout = Duration::from_millis(100);
    let http_client = reqwest::Client::builder().timeout(timeout).build().unwrap();
    let auth = ManagementAuth::new(
        Credentials::Bearer {
            token: "test-token".to_string(),
        },
        &server.uri(),
        http_client.clone(),
    );
    let client =
        ManagementClient::with_http_client(server.uri(), auth, http_client, RetryPolicy::none())
            .with_timeout(timeout);

    let err = client.get_role("rol_1").await.unwrap_err();
    assert!(matches!(err, ManagementError::Timeout { timeout: Some(t) } if t == timeout));
    assert_eq!(err.to_string(), "request timed out after 100ms");
}

// ═══════════════════════════════════════════════════════════════════════════
// Client credentials
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_client_credentials_token_is_fetched_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_json(json!({
            "grant_type": "client_credentials",
            "client_id": "cid",
            "client_secret": "secret",
            "audience": "https://tenant/api/v2/"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "m2m-token",
            "token_type": "Bearer",
            "expires_in": 86400
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/roles/rol_1"))
        .and(header("Authorization", "Bearer m2m-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "rol_1"})))
        .expect(2)
        .mount(&server)
        .await;

    let auth = ManagementAuth::new(
        Credentials::ClientCredentials {
            client_id: "cid".into(),
            client_secret: "secret".into(),
            audience: "https://tenant/api/v2/".into(),
        },
        &server.uri(),
        reqwest::Client::new(),
    );
    let client = ManagementClient::with_http_client(
        server.uri(),
        auth,
        reqwest::Client::new(),
        RetryPolicy::none(),
    );

    client.get_role("rol_1").await.unwrap();
    client.get_role("rol_1").await.unwrap();
}
