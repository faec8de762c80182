// ── Identity types ──
//
// `ResourceId` wraps the opaque string identifiers the server assigns
// (e.g. `Accounts-12`). `ResourceKind` enumerates the resource families
// the command surface manages and knows where each one lives.

use serde::{Deserialize, Serialize};
use std::fmt;

// ── ResourceId ──────────────────────────────────────────────────────

/// Server-assigned identifier, unique within its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ── ResourceKind ────────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum ResourceKind {
    Account,
    Certificate,
    TagSet,
    Lifecycle,
    User,
}

impl ResourceKind {
    /// REST collection segment, e.g. `accounts`.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Account => "accounts",
            Self::Certificate => "certificates",
            Self::TagSet => "tagsets",
            Self::Lifecycle => "lifecycles",
            Self::User => "users",
        }
    }

    /// Prefix of server-assigned ids, e.g. `Accounts` in `Accounts-12`.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Account => "Accounts",
            Self::Certificate => "Certificates",
            Self::TagSet => "TagSets",
            Self::Lifecycle => "Lifecycles",
            Self::User => "Users",
        }
    }

    /// Lower-case noun for messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Certificate => "certificate",
            Self::TagSet => "tag set",
            Self::Lifecycle => "lifecycle",
            Self::User => "user",
        }
    }

    /// Users are server-wide; everything else is partitioned by space.
    pub fn is_space_scoped(self) -> bool {
        !matches!(self, Self::User)
    }

    /// Whether `raw` has the shape of an id of this kind.
    pub fn looks_like_id(self, raw: &str) -> bool {
        raw.strip_prefix(self.id_prefix())
            .and_then(|rest| rest.strip_prefix('-'))
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
    }
}
