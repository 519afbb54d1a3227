use std::{fmt, marker::PhantomData};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    errors::{Error, Result, ValidationError},
    identifiers::{Namespace, RunId, UpdateId, WorkflowId},
    metadata::{
        workflow_query_type, workflow_signal_name, workflow_type, workflow_update_name, MethodRef,
        RoleTag, TypeDescriptor,
    },
};

/// Explicit token for the type a remote call is expected to return.
///
/// The descriptor is forwarded to the [`WorkflowClient`](crate::WorkflowClient);
/// the type parameter decodes the returned JSON value.
pub struct ResultType<T> {
    descriptor: TypeDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ResultType<T> {
    pub fn new() -> Self {
        Self {
            descriptor: TypeDescriptor::of::<T>(),
            _marker: PhantomData,
        }
    }

    /// Token whose descriptor names a foreign type rather than the Rust one.
    pub fn with_descriptor(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor,
            _marker: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }
}

impl<T: DeserializeOwned> ResultType<T> {
    pub fn decode(&self, value: Value) -> Result<T> {
        serde_json::from_value(value).map_err(Error::Serialization)
    }
}

impl<T> Default for ResultType<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ResultType<T> {
    fn clone(&self) -> Self {
        Self::with_descriptor(self.descriptor.clone())
    }
}

impl<T> fmt::Debug for ResultType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResultType").field(&self.descriptor).finish()
    }
}

/// Workflow execution a stub is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowExecution {
    pub namespace: Namespace,
    pub workflow_id: WorkflowId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<RunId>,
}

impl WorkflowExecution {
    pub fn new(namespace: impl Into<Namespace>, workflow_id: impl Into<WorkflowId>) -> Self {
        Self {
            namespace: namespace.into(),
            workflow_id: workflow_id.into(),
            run_id: None,
        }
    }

    pub fn with_run_id(mut self, run_id: impl Into<RunId>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }
}

/// Reference returned by start-style calls: the execution, plus the update id
/// when an update was started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleRef {
    pub execution: WorkflowExecution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_id: Option<UpdateId>,
}

/// A fully resolved request handed to the [`WorkflowClient`](crate::WorkflowClient).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCall {
    pub role: RoleTag,
    pub name: String,
    pub result_type: TypeDescriptor,
    pub args: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_id: Option<UpdateId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_execution_run_id: Option<RunId>,
}

impl RemoteCall {
    /// Request addressed by a method reference.
    ///
    /// The name is resolved with the resolver for `role`; an `UpdateValidator`
    /// reference addresses its update. Fails before anything is sent when the
    /// reference does not resolve for that role.
    pub fn for_method(
        method: &MethodRef,
        role: RoleTag,
        result_type: TypeDescriptor,
        args: Vec<Value>,
    ) -> Result<Self> {
        let (role, name) = match role {
            RoleTag::Workflow => (RoleTag::Workflow, workflow_type(method)?),
            RoleTag::Signal => (RoleTag::Signal, workflow_signal_name(method)?),
            RoleTag::Query => (RoleTag::Query, workflow_query_type(method)?),
            RoleTag::Update | RoleTag::UpdateValidator => {
                (RoleTag::Update, workflow_update_name(method)?)
            }
        };
        Ok(Self::build(role, name, result_type, args))
    }

    /// Request addressed by a literal wire name; no resolution applies.
    pub fn named(
        role: RoleTag,
        name: impl Into<String>,
        result_type: TypeDescriptor,
        args: Vec<Value>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::Validation(
                ValidationError::new(format!("{role} name is required")).with_field("name"),
            ));
        }
        Ok(Self::build(role, name, result_type, args))
    }

    fn build(role: RoleTag, name: String, result_type: TypeDescriptor, args: Vec<Value>) -> Self {
        Self {
            role,
            name,
            result_type,
            args,
            update_id: None,
            first_execution_run_id: None,
        }
    }

    pub fn with_update_id(mut self, update_id: UpdateId) -> Self {
        self.update_id = Some(update_id);
        self
    }

    pub fn with_first_execution_run_id(mut self, run_id: Option<RunId>) -> Self {
        self.first_execution_run_id = run_id;
        self
    }
}

/// Serialize call arguments, in order, into the `Vec<Value>` the stub takes.
///
/// ```ignore
/// let args = workflow_stub::args!["order-42", 3u32]?;
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::result::Result::<::std::vec::Vec<$crate::__private::Value>, $crate::Error>::Ok(
            ::std::vec::Vec::new(),
        )
    };
    ($($arg:expr),+ $(,)?) => {
        (|| -> ::std::result::Result<::std::vec::Vec<$crate::__private::Value>, $crate::Error> {
            ::std::result::Result::Ok(::std::vec![
                $($crate::__private::to_value(&$arg).map_err($crate::Error::Serialization)?),+
            ])
        })()
    };
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::errors::MethodErrorKind;
    use crate::metadata::{InterfaceDef, MethodDef};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Receipt {
        id: u32,
    }

    #[test]
    fn result_type_decodes_values() {
        let token = ResultType::<Receipt>::new();
        assert!(token.descriptor().as_str().ends_with("Receipt"));
        let receipt = token.decode(json!({ "id": 7 })).unwrap();
        assert_eq!(receipt, Receipt { id: 7 });
        assert!(matches!(
            token.decode(json!("nope")),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn validator_reference_addresses_its_update() {
        let def = InterfaceDef::workflow("Workflow1")
            .method(MethodDef::new("update2").update_named("customUpdateName"))
            .method(MethodDef::new("update2Validator").update_validator_for("customUpdateName"));
        let call = RemoteCall::for_method(
            &def.method_ref("update2Validator").unwrap(),
            RoleTag::Update,
            TypeDescriptor::of::<String>(),
            vec![json!(5)],
        )
        .unwrap();
        assert_eq!(call.role, RoleTag::Update);
        assert_eq!(call.name, "customUpdateName");
    }

    #[test]
    fn wrong_role_fails_before_a_call_exists() {
        let def = InterfaceDef::workflow("Workflow1").method(MethodDef::new("query1").query());
        let err = RemoteCall::for_method(
            &def.method_ref("query1").unwrap(),
            RoleTag::Signal,
            TypeDescriptor::unit(),
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(
            err.as_method_error().map(|e| e.kind()),
            Some(MethodErrorKind::WrongRole)
        );
    }

    #[test]
    fn named_call_rejects_blank_name() {
        let err = RemoteCall::named(RoleTag::Update, " ", TypeDescriptor::unit(), Vec::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "name: update name is required");
    }

    #[test]
    fn args_macro_serializes_in_order() {
        let args = crate::args!["order-42", 3u32, Some(true)].unwrap();
        assert_eq!(args, vec![json!("order-42"), json!(3), json!(true)]);
        assert!(crate::args!().unwrap().is_empty());
    }
}
