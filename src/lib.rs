//! Wire-name resolution for workflow interface methods, plus a typed stub for
//! calling a running workflow.
//!
//! A workflow interface declares its entry method, signals, queries, updates and
//! update validators; each is addressed over the wire by a string name. The
//! [`metadata`] module answers, for one method reference, which role it plays and
//! what its wire name is, failing with a [`MethodError`] on any misuse.
//! [`WorkflowStub`] uses those names to build calls for a [`WorkflowClient`].
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Namespace used when the stub config leaves it unset.
pub const DEFAULT_NAMESPACE: &str = "default";

mod client;
mod errors;
mod identifiers;
pub mod metadata;
#[cfg(feature = "mock")]
mod mock;
mod stub;
mod types;

pub use client::{BoxFuture, WorkflowClient};
pub use errors::{Error, MethodError, MethodErrorKind, Result, ValidationError};
pub use identifiers::{Namespace, RunId, UpdateId, WorkflowId};
pub use metadata::{
    classify, resolve, validator_target_name, workflow_query_type, workflow_signal_name,
    workflow_type, workflow_update_name, InterfaceDef, MethodDef, MethodRef, ResolvedName,
    RoleTag, TypeDescriptor, WorkflowInterface,
};
#[cfg(feature = "mock")]
pub use mock::{MockConfig, MockWorkflowClient, RecordedCall};
pub use stub::{Config, UpdateHandle, WorkflowStub};
pub use types::{HandleRef, RemoteCall, ResultType, WorkflowExecution};

#[doc(hidden)]
pub mod __private {
    pub use serde_json::{to_value, Value};
}
