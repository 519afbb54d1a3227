use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metadata::RoleTag;

/// A request that cannot be built from the given input, such as a blank update name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
    /// Argument the message refers to, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Broad classification of [`MethodError`] for callers that branch on the failed check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MethodErrorKind {
    InvalidReference,
    UnknownMethod,
    NotAWorkflowInterface,
    NoRoleAttribute,
    ConflictingRoleAttributes,
    WrongRole,
    InvalidValidatorTarget,
}

/// Misuse of the method resolution API.
///
/// Every resolver reports all of its failures through this one type, so a caller
/// needs a single branch to handle "this method reference cannot be used here".
/// Each variant names the method (qualified as `Type::method`) and the check that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MethodError {
    #[error("{reference} is not a method reference")]
    InvalidReference { reference: String },

    #[error("{type_name} declares no method named {method}")]
    UnknownMethod { type_name: String, method: String },

    #[error("{method} is declared on {type_name}, which is not a workflow interface")]
    NotAWorkflowInterface { type_name: String, method: String },

    #[error("{method} carries no workflow role attribute")]
    NoRoleAttribute { method: String },

    #[error("{method} carries conflicting role attributes: {}", join_roles(.roles))]
    ConflictingRoleAttributes { method: String, roles: Vec<RoleTag> },

    /// `found` is `None` when the method carries no role attribute at all.
    #[error(
        "{method} is {}, expected {} method",
        describe_role(.found),
        with_article(.expected)
    )]
    WrongRole {
        method: String,
        found: Option<RoleTag>,
        expected: RoleTag,
    },

    #[error("cannot determine the update name for validator {method}: {reason}")]
    InvalidValidatorTarget { method: String, reason: String },
}

impl MethodError {
    pub fn kind(&self) -> MethodErrorKind {
        match self {
            MethodError::InvalidReference { .. } => MethodErrorKind::InvalidReference,
            MethodError::UnknownMethod { .. } => MethodErrorKind::UnknownMethod,
            MethodError::NotAWorkflowInterface { .. } => MethodErrorKind::NotAWorkflowInterface,
            MethodError::NoRoleAttribute { .. } => MethodErrorKind::NoRoleAttribute,
            MethodError::ConflictingRoleAttributes { .. } => {
                MethodErrorKind::ConflictingRoleAttributes
            }
            MethodError::WrongRole { .. } => MethodErrorKind::WrongRole,
            MethodError::InvalidValidatorTarget { .. } => MethodErrorKind::InvalidValidatorTarget,
        }
    }
}

fn describe_role(found: &Option<RoleTag>) -> String {
    match found {
        Some(role) => format!("{} method", with_article(role)),
        None => "a method with no role".to_string(),
    }
}

fn with_article(role: &RoleTag) -> String {
    match role {
        RoleTag::Update | RoleTag::UpdateValidator => format!("an {role}"),
        _ => format!("a {role}"),
    }
}

fn join_roles(roles: &[RoleTag]) -> String {
    roles
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience alias for fallible SDK results.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type surfaced by the SDK.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Method(#[from] MethodError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    /// Failure reported by the [`WorkflowClient`](crate::WorkflowClient) collaborator.
    #[error("client error: {0}")]
    Client(String),
}

impl Error {
    /// The resolution failure behind this error, if it is one.
    pub fn as_method_error(&self) -> Option<&MethodError> {
        match self {
            Error::Method(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_formats_with_field() {
        let err = ValidationError::new("is required").with_field("workflow_id");
        assert_eq!(err.to_string(), "workflow_id: is required");
    }

    #[test]
    fn wrong_role_names_found_and_expected() {
        let err = MethodError::WrongRole {
            method: "Workflow1::query1".into(),
            found: Some(RoleTag::Query),
            expected: RoleTag::Signal,
        };
        assert_eq!(
            err.to_string(),
            "Workflow1::query1 is a query method, expected a signal method"
        );
        assert_eq!(err.kind(), MethodErrorKind::WrongRole);
    }

    #[test]
    fn wrong_role_without_any_role() {
        let err = MethodError::WrongRole {
            method: "Workflow1::helper".into(),
            found: None,
            expected: RoleTag::Update,
        };
        assert_eq!(
            err.to_string(),
            "Workflow1::helper is a method with no role, expected an update method"
        );
    }

    #[test]
    fn conflicting_roles_are_listed() {
        let err = MethodError::ConflictingRoleAttributes {
            method: "Workflow1::both".into(),
            roles: vec![RoleTag::Signal, RoleTag::Query],
        };
        assert_eq!(
            err.to_string(),
            "Workflow1::both carries conflicting role attributes: signal, query"
        );
    }

    #[test]
    fn method_error_wraps_into_sdk_error() {
        let err: Error = MethodError::InvalidReference {
            reference: "String::new".into(),
        }
        .into();
        assert_eq!(err.to_string(), "String::new is not a method reference");
        assert_eq!(
            err.as_method_error().map(MethodError::kind),
            Some(MethodErrorKind::InvalidReference)
        );
    }
}
