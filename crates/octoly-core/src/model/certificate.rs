use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::{ResourceId, ResourceKind};
use super::resource::{Resource, TenantedDeploymentMode};
use super::sensitive::SensitiveValue;

/// An X.509 certificate stored on the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CertificateResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_data: Option<SensitiveValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<SensitiveValue>,
    #[serde(default)]
    pub thumbprint: Option<String>,
    #[serde(default)]
    pub subject_common_name: Option<String>,
    /// RFC 3339 timestamp; kept as the server's string so updates echo it verbatim.
    #[serde(default)]
    pub not_after: Option<String>,
    #[serde(default)]
    pub environment_ids: Vec<String>,
    #[serde(default)]
    pub tenant_ids: Vec<String>,
    #[serde(default)]
    pub tenant_tags: Vec<String>,
    #[serde(default)]
    pub tenanted_deployment_participation: TenantedDeploymentMode,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CertificateResource {
    pub fn expires_at(&self) -> Option<DateTime<FixedOffset>> {
        self.not_after
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|t| t < now)
    }
}

impl Resource for CertificateResource {
    const KIND: ResourceKind = ResourceKind::Certificate;

    fn id(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn expiry_parses_server_timestamp() {
        let cert: CertificateResource = serde_json::from_value(json!({
            "Id": "Certificates-3",
            "Name": "wildcard",
            "NotAfter": "2030-03-22T23:20:56.000+00:00",
            "CertificateData": { "HasValue": true }
        }))
        .unwrap();

        let before = Utc.with_ymd_and_hms(2029, 1, 1, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).unwrap();
        assert!(!cert.is_expired_at(before));
        assert!(cert.is_expired_at(after));
        assert_eq!(
            serde_json::to_value(&cert).unwrap()["NotAfter"],
            "2030-03-22T23:20:56.000+00:00"
        );
    }

    #[test]
    fn unparseable_expiry_is_not_expired() {
        let cert: CertificateResource =
            serde_json::from_value(json!({ "Name": "odd", "NotAfter": "soon" })).unwrap();
        assert!(cert.expires_at().is_none());
        assert!(!cert.is_expired_at(Utc::now()));
    }
}
