//! Certificate command handlers.

use chrono::Utc;
use tabled::Tabled;

use octoly_core::{CertificateResource, ResourceId};

use crate::cli::ResourceArgs;
use crate::error::CliError;

use super::resources::{self, ResourceView};
use super::{Context, util};

#[derive(Tabled)]
pub struct CertificateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Expires")]
    expires: String,
}

fn expiry(cert: &CertificateResource) -> String {
    match cert.expires_at() {
        Some(at) if cert.is_expired_at(Utc::now()) => format!("{} (expired)", at.date_naive()),
        Some(at) => at.date_naive().to_string(),
        None => "-".into(),
    }
}

impl ResourceView for CertificateResource {
    type Row = CertificateRow;

    fn row(&self) -> CertificateRow {
        CertificateRow {
            id: util::or_dash(self.id.as_ref().map(ResourceId::as_str)),
            name: self.name.clone(),
            subject: util::or_dash(self.subject_common_name.as_deref()),
            expires: expiry(self),
        }
    }

    fn detail(&self) -> String {
        [
            format!("ID:         {}", util::or_dash(self.id.as_ref().map(ResourceId::as_str))),
            format!("Name:       {}", self.name),
            format!("Subject:    {}", util::or_dash(self.subject_common_name.as_deref())),
            format!("Thumbprint: {}", util::or_dash(self.thumbprint.as_deref())),
            format!("Expires:    {}", expiry(self)),
            format!("Tenanted:   {}", self.tenanted_deployment_participation),
            format!("Notes:      {}", util::or_dash(self.notes.as_deref())),
        ]
        .join("\n")
    }
}

pub async fn handle(args: ResourceArgs, ctx: Context<'_>) -> Result<(), CliError> {
    resources::handle::<CertificateResource>(args.command, ctx).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn expired_certificates_are_flagged() {
        let cert: CertificateResource = serde_json::from_value(json!({
            "Id": "Certificates-7",
            "Name": "old-wildcard",
            "SubjectCommonName": "*.example.com",
            "NotAfter": "2020-01-31T00:00:00+00:00"
        }))
        .unwrap();

        let row = cert.row();
        assert_eq!(row.expires, "2020-01-31 (expired)");
        assert_eq!(row.subject, "*.example.com");
    }

    #[test]
    fn missing_expiry_renders_as_dash() {
        let cert: CertificateResource =
            serde_json::from_value(json!({ "Name": "pending" })).unwrap();
        assert!(cert.detail().contains("Expires:    -"));
    }
}
