//! Organizations and their child collections.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Connection details echoed back inside an enabled connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSummary {
    pub name: String,
    pub strategy: String,
}

/// A connection enabled on an organization.
///
/// Also the body of `POST organizations/{id}/enabled_connections`;
/// `connection` is response-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledConnection {
    pub connection_id: String,
    #[serde(default)]
    pub assign_membership_on_login: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_signup_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_as_button: Option<bool>,
    #[serde(default, skip_serializing)]
    pub connection: Option<ConnectionSummary>,
}

/// Body of `PATCH organizations/{id}/enabled_connections/{connection_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnabledConnectionUpdate {
    pub assign_membership_on_login: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_signup_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_as_button: Option<bool>,
}

impl From<&EnabledConnection> for EnabledConnectionUpdate {
    fn from(connection: &EnabledConnection) -> Self {
        Self {
            assign_membership_on_login: connection.assign_membership_on_login,
            is_signup_enabled: connection.is_signup_enabled,
            show_as_button: connection.show_as_button,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMember {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryDomainStatus {
    #[default]
    Pending,
    Verified,
}

/// Email domain used for organization discovery.
///
/// `id` and the verification fields are assigned by the tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryDomain {
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    pub domain: String,
    #[serde(default)]
    pub status: DiscoveryDomainStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_for_organization_discovery: Option<bool>,
    #[serde(default, skip_serializing)]
    pub verification_txt: Option<String>,
    #[serde(default, skip_serializing)]
    pub verification_host: Option<String>,
}

/// Body of `PATCH organizations/{id}/discovery-domains/{domain_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryDomainUpdate {
    pub status: DiscoveryDomainStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_for_organization_discovery: Option<bool>,
}

impl From<&DiscoveryDomain> for DiscoveryDomainUpdate {
    fn from(domain: &DiscoveryDomain) -> Self {
        Self {
            status: domain.status,
            use_for_organization_discovery: domain.use_for_organization_discovery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enabled_connection_request_omits_response_fields() {
        let connection = EnabledConnection {
            connection_id: "con_1".into(),
            assign_membership_on_login: true,
            is_signup_enabled: None,
            show_as_button: Some(false),
            connection: Some(ConnectionSummary {
                name: "db".into(),
                strategy: "auth0".into(),
            }),
        };
        assert_eq!(
            serde_json::to_value(&connection).unwrap(),
            json!({
                "connection_id": "con_1",
                "assign_membership_on_login": true,
                "show_as_button": false
            })
        );
    }

    #[test]
    fn test_discovery_domain_deserialize() {
        let domain: DiscoveryDomain = serde_json::from_value(json!({
            "id": "dd_1",
            "domain": "example.com",
            "status": "verified",
            "verification_txt": "auth0-domain-verification=abc",
            "verification_host": "_auth0-challenge.example.com"
        }))
        .unwrap();
        assert_eq!(domain.id.as_deref(), Some("dd_1"));
        assert_eq!(domain.status, DiscoveryDomainStatus::Verified);
        assert_eq!(domain.use_for_organization_discovery, None);
    }
}
