// ── Write-only secret fields ──
//
// The server never returns secret material. Reads carry only `HasValue`;
// writes send `NewValue` to set or replace the secret. A value read from
// the server and sent back unchanged leaves the stored secret alone.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default)]
pub struct SensitiveValue {
    pub has_value: bool,
    pub new_value: Option<SecretString>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Wire {
    #[serde(default)]
    has_value: bool,
    #[serde(default)]
    new_value: Option<String>,
}

impl SensitiveValue {
    /// A value that sets the secret on the next write.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            has_value: true,
            new_value: Some(SecretString::from(secret.into())),
        }
    }
}

impl Serialize for SensitiveValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Wire {
            has_value: self.has_value,
            new_value: self
                .new_value
                .as_ref()
                .map(|s| s.expose_secret().to_owned()),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SensitiveValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = Wire::deserialize(deserializer)?;
        Ok(Self {
            has_value: wire.has_value,
            new_value: wire.new_value.map(SecretString::from),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn read_side_carries_no_secret() {
        let v: SensitiveValue =
            serde_json::from_value(json!({ "HasValue": true, "NewValue": null })).unwrap();
        assert!(v.has_value);
        assert!(v.new_value.is_none());
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!({ "HasValue": true, "NewValue": null })
        );
    }

    #[test]
    fn debug_redacts_new_value() {
        let v = SensitiveValue::new("hunter2");
        assert!(!format!("{v:?}").contains("hunter2"));
        assert_eq!(serde_json::to_value(&v).unwrap()["NewValue"], "hunter2");
    }
}
