// ── Error records ──
//
// Every failure a command surfaces carries a stable identifier built from
// the operation and the failure class, e.g. `GetAccount-NotFound`, so
// scripts can match on it regardless of the message text.

use std::fmt;

use serde::Serialize;

use crate::error::{CoreError, ErrorKind};
use crate::lifecycle::Operation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub id: String,
    pub operation: String,
    pub kind: ErrorKind,
    pub target: String,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(operation: &Operation, error: &CoreError, target: impl Into<String>) -> Self {
        Self {
            id: format!("{}-{}", operation.compact(), error.kind()),
            operation: operation.to_string(),
            kind: error.kind(),
            target: target.into(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}: {}", self.operation, self.target, self.message)
    }
}

/// An error that terminates the invocation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{record}")]
pub struct Fatal {
    record: ErrorRecord,
}

impl Fatal {
    pub fn new(record: ErrorRecord) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &ErrorRecord {
        &self.record
    }

    pub fn kind(&self) -> ErrorKind {
        self.record.kind
    }

    pub fn into_record(self) -> ErrorRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Verb;
    use crate::model::ResourceKind;

    #[test]
    fn id_joins_operation_and_kind() {
        let op = Operation::for_kind(Verb::Get, ResourceKind::Account);
        let err = CoreError::NotFound {
            entity: "account".into(),
            identifier: "prod".into(),
        };
        let record = ErrorRecord::new(&op, &err, "account 'prod'");
        assert_eq!(record.id, "GetAccount-NotFound");
        assert_eq!(record.operation, "Get-Account");
        insta::assert_snapshot!(
            record.to_string(),
            @"Get-Account on account 'prod': account not found: prod"
        );
    }
}
