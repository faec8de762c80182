// ── Selection strategies ──
//
// A query command names exactly one way of choosing resources: all of
// them, one by name, several by name, the first that matches a filter,
// or every one that does. `SelectionRequest` is the raw invocation;
// `validate()` turns it into a `SelectionCriterion` or refuses it before
// any connection is opened.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::connection::RemoteApi;
use crate::error::CoreError;
use crate::model::Resource;
use crate::repository::ScopedRepository;

// ── Selector ────────────────────────────────────────────────────────

/// Caller-supplied predicate. The default accepts every resource.
pub struct Selector<R>(Arc<dyn Fn(&R) -> bool + Send + Sync>);

impl<R> Selector<R> {
    pub fn new(predicate: impl Fn(&R) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    pub fn always() -> Self {
        Self::new(|_| true)
    }

    pub fn matches(&self, resource: &R) -> bool {
        (self.0)(resource)
    }
}

impl<R> Default for Selector<R> {
    fn default() -> Self {
        Self::always()
    }
}

impl<R> Clone for Selector<R> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<R> fmt::Debug for Selector<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Selector(..)")
    }
}

// ── Request / criterion ─────────────────────────────────────────────

/// Selection flags exactly as the caller supplied them.
#[derive(Debug, Clone)]
pub struct SelectionRequest<R> {
    pub all: bool,
    pub name: Option<String>,
    pub names: Option<Vec<String>>,
    pub first: bool,
    pub many: bool,
    pub selector: Option<Selector<R>>,
}

impl<R> Default for SelectionRequest<R> {
    fn default() -> Self {
        Self {
            all: false,
            name: None,
            names: None,
            first: false,
            many: false,
            selector: None,
        }
    }
}

impl<R> SelectionRequest<R> {
    pub fn all() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn by_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: Some(names.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn first(selector: Selector<R>) -> Self {
        Self {
            first: true,
            selector: Some(selector),
            ..Self::default()
        }
    }

    pub fn many(selector: Selector<R>) -> Self {
        Self {
            many: true,
            selector: Some(selector),
            ..Self::default()
        }
    }

    /// Check that exactly one mode is active and its arguments make sense.
    pub fn validate(self) -> Result<SelectionCriterion<R>, CoreError> {
        let active: Vec<&str> = [
            (self.all, "--all"),
            (self.name.is_some(), "--name"),
            (self.names.is_some(), "--names"),
            (self.first, "--first"),
            (self.many, "--many"),
        ]
        .into_iter()
        .filter_map(|(on, flag)| on.then_some(flag))
        .collect();

        match active.as_slice() {
            [] => {
                return Err(CoreError::configuration(
                    "no selection given; use one of --all, --name, --names, --first, --many",
                ));
            }
            [_] => {}
            several => {
                return Err(CoreError::configuration(format!(
                    "selection modes are mutually exclusive, got {}",
                    several.join(", ")
                )));
            }
        }

        if self.selector.is_some() && !(self.first || self.many) {
            return Err(CoreError::configuration(
                "a filter only applies to --first or --many",
            ));
        }

        if self.all {
            return Ok(SelectionCriterion::All);
        }
        if let Some(name) = self.name {
            if name.trim().is_empty() {
                return Err(CoreError::configuration("--name must not be empty"));
            }
            return Ok(SelectionCriterion::ByName(name));
        }
        if let Some(names) = self.names {
            let names: Vec<String> = names
                .into_iter()
                .map(|n| n.trim().to_owned())
                .filter(|n| !n.is_empty())
                .collect();
            if names.is_empty() {
                return Err(CoreError::configuration("--names needs at least one name"));
            }
            return Ok(SelectionCriterion::ByNames(names));
        }
        let selector = self.selector.unwrap_or_default();
        if self.first {
            Ok(SelectionCriterion::First(selector))
        } else {
            Ok(SelectionCriterion::Many(selector))
        }
    }
}

/// A validated selection: exactly one mode.
#[derive(Debug, Clone)]
pub enum SelectionCriterion<R> {
    All,
    ByName(String),
    ByNames(Vec<String>),
    First(Selector<R>),
    Many(Selector<R>),
}

impl<R: Resource> SelectionCriterion<R> {
    /// Short label for logs.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ByName(_) => "by-name",
            Self::ByNames(_) => "by-names",
            Self::First(_) => "first",
            Self::Many(_) => "many",
        }
    }

    /// What the selection is aimed at, for error targets.
    pub fn target(&self) -> String {
        let plural = format!("{}s", R::KIND.label());
        match self {
            Self::ByName(name) => format!("{} '{name}'", R::KIND.label()),
            Self::ByNames(names) => format!("{plural} [{}]", names.join(", ")),
            Self::All | Self::First(_) | Self::Many(_) => plural,
        }
    }

    pub async fn apply<A: RemoteApi>(
        &self,
        repo: &ScopedRepository<'_, A, R>,
    ) -> Result<Selection<R>, CoreError> {
        match self {
            Self::All => repo.find_all().await.map(Selection::Many),
            Self::ByName(name) => repo.find_by_name(name).await.map(Selection::One),
            Self::ByNames(names) => repo.find_by_names(names).await.map(Selection::Many),
            Self::First(selector) => repo.find_one(selector).await.map(Selection::One),
            Self::Many(selector) => repo.find_many(selector).await.map(Selection::Many),
        }
    }
}

/// Result of a query: one resource or a (possibly empty) sequence.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Selection<R> {
    One(R),
    Many(Vec<R>),
}

impl<R> Selection<R> {
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<R> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

// ── Field filters ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Contains,
    StartsWith,
}

/// `Field=value` style predicate evaluated against a resource's JSON form.
///
/// Operators: `=`, `!=`, `~=` (contains), `^=` (prefix). Field names are
/// case-insensitive and may be dotted (`ReleaseRetentionPolicy.Unit`).
/// String comparison ignores case. An array field matches when any of its
/// elements does (for `!=`, when none equals the value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    path: Vec<String>,
    op: FilterOp,
    value: String,
}

impl FieldFilter {
    pub fn matches(&self, resource: &Value) -> bool {
        let Some(found) = lookup(resource, &self.path) else {
            return self.op == FilterOp::Ne;
        };
        let leaves: Vec<String> = match found {
            Value::Array(items) => items.iter().filter_map(scalar).collect(),
            other => scalar(other).into_iter().collect(),
        };
        let want = self.value.to_lowercase();
        let hit = |op: FilterOp| {
            leaves.iter().any(|leaf| {
                let leaf = leaf.to_lowercase();
                match op {
                    FilterOp::Eq | FilterOp::Ne => leaf == want,
                    FilterOp::Contains => leaf.contains(&want),
                    FilterOp::StartsWith => leaf.starts_with(&want),
                }
            })
        };
        match self.op {
            FilterOp::Ne => !hit(FilterOp::Ne),
            op => hit(op),
        }
    }

    /// Combine filters into one selector; a resource must pass all of them.
    pub fn selector<R: Resource>(filters: Vec<FieldFilter>) -> Selector<R> {
        if filters.is_empty() {
            return Selector::always();
        }
        Selector::new(move |resource: &R| {
            serde_json::to_value(resource).is_ok_and(|v| filters.iter().all(|f| f.matches(&v)))
        })
    }
}

impl FromStr for FieldFilter {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = |why: &str| CoreError::ValidationFailed {
            message: format!("invalid filter '{raw}': {why}"),
        };

        let (at, op, width) = raw
            .char_indices()
            .find_map(|(i, _)| {
                let rest = &raw[i..];
                [
                    ("!=", FilterOp::Ne),
                    ("~=", FilterOp::Contains),
                    ("^=", FilterOp::StartsWith),
                    ("=", FilterOp::Eq),
                ]
                .into_iter()
                .find(|(token, _)| rest.starts_with(token))
                .map(|(token, op)| (i, op, token.len()))
            })
            .ok_or_else(|| invalid("expected FIELD=VALUE, FIELD!=VALUE, FIELD~=VALUE or FIELD^=VALUE"))?;

        let field = raw[..at].trim();
        if field.is_empty() {
            return Err(invalid("missing field name"));
        }
        let path: Vec<String> = field.split('.').map(str::to_owned).collect();
        if path.iter().any(String::is_empty) {
            return Err(invalid("empty path segment"));
        }

        Ok(Self {
            path,
            op,
            value: raw[at + width..].trim().to_owned(),
        })
    }
}

fn lookup<'v>(value: &'v Value, path: &[String]) -> Option<&'v Value> {
    path.iter().try_fold(value, |node, segment| {
        node.as_object()?
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(segment))
            .map(|(_, v)| v)
    })
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;
    use crate::model::AccountResource;

    type Request = SelectionRequest<AccountResource>;

    #[test]
    fn exactly_one_mode_is_required() {
        let none = Request::default().validate().unwrap_err();
        assert_eq!(none.kind(), ErrorKind::Configuration);

        let two = Request {
            all: true,
            name: Some("prod".into()),
            ..Request::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(two.kind(), ErrorKind::Configuration);
        insta::assert_snapshot!(
            two.to_string(),
            @"Invalid command configuration: selection modes are mutually exclusive, got --all, --name"
        );
    }

    #[test]
    fn selector_only_with_predicate_modes() {
        let err = Request {
            name: Some("prod".into()),
            selector: Some(Selector::always()),
            ..Request::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn empty_name_lists_are_rejected() {
        assert!(Request::by_names(Vec::<String>::new()).validate().is_err());
        assert!(Request::by_names([" ", ""]).validate().is_err());
        assert!(Request::by_name("  ").validate().is_err());
    }

    #[test]
    fn predicate_modes_default_to_accept_all() {
        let request = Request {
            many: true,
            ..Request::default()
        };
        let SelectionCriterion::Many(selector) = request.validate().unwrap() else {
            panic!("expected Many");
        };
        let account: AccountResource =
            serde_json::from_value(json!({ "Name": "x", "AccountType": "Token" })).unwrap();
        assert!(selector.matches(&account));
    }

    #[test]
    fn names_are_trimmed() {
        let SelectionCriterion::ByNames(names) =
            Request::by_names([" a", "b "]).validate().unwrap()
        else {
            panic!("expected ByNames");
        };
        assert_eq!(names, vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn filter_parsing() {
        let f: FieldFilter = "AccountType=Token".parse().unwrap();
        assert_eq!(f.op, FilterOp::Eq);
        assert_eq!(f.path, vec!["AccountType".to_owned()]);

        let f: FieldFilter = "Name!=a=b".parse().unwrap();
        assert_eq!(f.op, FilterOp::Ne);
        assert_eq!(f.value, "a=b");

        let f: FieldFilter = "Policy.Unit^=Da".parse().unwrap();
        assert_eq!(f.op, FilterOp::StartsWith);
        assert_eq!(f.path.len(), 2);

        assert!("NoOperator".parse::<FieldFilter>().is_err());
        assert!("=value".parse::<FieldFilter>().is_err());
        assert!("a..b=c".parse::<FieldFilter>().is_err());
    }

    #[test]
    fn filter_matching() {
        let doc = json!({
            "Name": "aws-prod",
            "IsActive": true,
            "EnvironmentIds": ["Environments-1", "Environments-2"],
            "Policy": { "Unit": "Days", "QuantityToKeep": 30 }
        });
        let check = |raw: &str| raw.parse::<FieldFilter>().unwrap().matches(&doc);

        assert!(check("name=AWS-PROD"));
        assert!(check("Name~=prod"));
        assert!(check("Name^=aws"));
        assert!(!check("Name^=prod"));
        assert!(check("IsActive=true"));
        assert!(check("EnvironmentIds=Environments-2"));
        assert!(!check("EnvironmentIds!=Environments-2"));
        assert!(check("policy.unit=days"));
        assert!(check("Policy.QuantityToKeep=30"));
        assert!(!check("Missing=x"));
        assert!(check("Missing!=x"));
    }

    #[test]
    fn filters_combine_with_and() {
        let selector = FieldFilter::selector::<AccountResource>(vec![
            "AccountType=Token".parse().unwrap(),
            "Name^=ci".parse().unwrap(),
        ]);
        let ci: AccountResource =
            serde_json::from_value(json!({ "Name": "ci-token", "AccountType": "Token" })).unwrap();
        let other: AccountResource =
            serde_json::from_value(json!({ "Name": "prod", "AccountType": "Token" })).unwrap();
        assert!(selector.matches(&ci));
        assert!(!selector.matches(&other));
    }
}
