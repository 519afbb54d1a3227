//! Identifiers addressing a workflow execution and its updates.
//!
//! Each one wraps a trimmed `String` and serializes as that bare string.
//!
//! ```ignore
//! use workflow_stub::{UpdateId, WorkflowId};
//!
//! let workflow: WorkflowId = "order-42".into();
//! let update = UpdateId::generate();
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into().trim().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id_type!(WorkflowId, "Business identifier of a workflow execution.");
string_id_type!(RunId, "Identifier of a single run of a workflow execution.");
string_id_type!(Namespace, "Namespace a workflow execution lives in.");
string_id_type!(
    UpdateId,
    "Identifier of an update request, used to deduplicate and to fetch its outcome."
);

impl UpdateId {
    /// Fresh random update id (UUID v4).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_id_trims_whitespace() {
        let id: WorkflowId = "  order-42  ".into();
        assert_eq!(id.as_str(), "order-42");
    }

    #[test]
    fn namespace_displays_bare_value() {
        assert_eq!(Namespace::new(" prod ").to_string(), "prod");
    }

    #[test]
    fn generated_update_ids_are_unique_uuids() {
        let a = UpdateId::generate();
        let b = UpdateId::generate();
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn run_id_serializes_as_string() {
        let id = RunId::new("run-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"run-1\"");
        let back: RunId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
