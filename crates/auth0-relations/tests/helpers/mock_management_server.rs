//! Mock Auth0 tenant for reconciliation tests.
//!
//! Wraps a wiremock server with helpers for the list responses and
//! mutation expectations the relationship tests need.

use auth0_management::auth::{Credentials, ManagementAuth};
use auth0_management::retry::RetryPolicy;
use auth0_management::ManagementClient;
use auth0_relations::{ProviderContext, ReconcileOptions};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-token";

pub struct MockManagementServer {
    pub server: MockServer,
}

impl MockManagementServer {
    pub async fn start() -> Self {
        auth0_relations::logging::init_test_logging();
        Self {
            server: MockServer::start().await,
        }
    }

    /// Context whose client talks to this server without retries.
    pub fn context(&self) -> ProviderContext {
        let auth = ManagementAuth::new(
            Credentials::Bearer {
                token: TEST_TOKEN.to_string(),
            },
            &self.server.uri(),
            reqwest::Client::new(),
        );
        let client = ManagementClient::with_http_client(
            self.server.uri(),
            auth,
            reqwest::Client::new(),
            RetryPolicy::none(),
        );
        ProviderContext::new(client)
    }

    pub fn context_with(&self, options: ReconcileOptions) -> ProviderContext {
        self.context().with_options(options)
    }

    /// Serve `body` for `GET {api_path}`.
    ///
    /// With `times`, the response is used that many times and later
    /// requests fall through to mocks mounted after it.
    pub async fn mount_get(&self, api_path: &str, body: Value, times: Option<u64>) {
        let mock = Mock::given(method("GET"))
            .and(path(api_path.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body));
        match times {
            Some(n) => mock.up_to_n_times(n).mount(&self.server).await,
            None => mock.mount(&self.server).await,
        }
    }

    /// Fail the test if any POST, PATCH or DELETE reaches the server.
    pub async fn forbid_mutations(&self) {
        for verb in ["POST", "PATCH", "DELETE"] {
            Mock::given(method(verb))
                .respond_with(ResponseTemplate::new(500))
                .expect(0)
                .named(format!("no {verb} calls"))
                .mount(&self.server)
                .await;
        }
    }

    /// Every request received so far, as `"METHOD /path"`.
    pub async fn request_log(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| format!("{} {}", request.method, request.url.path()))
            .collect()
    }
}

/// Offset-paginated list body holding every item on one page.
pub fn offset_page(key: &str, items: Value) -> Value {
    let total = items.as_array().map_or(0, Vec::len);
    let mut body = json!({ "start": 0, "limit": 100, "total": total });
    body[key] = items;
    body
}

/// Checkpoint-paginated list body without a next page.
pub fn checkpoint_page(key: &str, items: Value) -> Value {
    let mut body = json!({});
    body[key] = items;
    body
}

pub fn roles_json(ids: &[&str]) -> Value {
    Value::Array(
        ids.iter()
            .map(|id| json!({ "id": id, "name": format!("Role {id}") }))
            .collect(),
    )
}

pub fn not_found(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "statusCode": 404,
        "error": "Not Found",
        "message": message,
    }))
}

pub fn api_error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "statusCode": status,
        "message": message,
    }))
}
