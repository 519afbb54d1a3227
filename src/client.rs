use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use crate::{
    errors::Result,
    metadata::TypeDescriptor,
    types::{HandleRef, RemoteCall, WorkflowExecution},
};

/// Boxed future returned by [`WorkflowClient`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The RPC client that carries resolved calls to the workflow service.
///
/// Every call arrives with its wire name already resolved, the expected result
/// type descriptor, and the positional arguments. Transport, retries and
/// timeouts belong to the implementation. Each method is invoked exactly once
/// per stub operation.
pub trait WorkflowClient: Send + Sync {
    /// Execute-and-await: runs the call and yields its result value
    /// (`Value::Null` for signals).
    fn execute(
        &self,
        execution: WorkflowExecution,
        call: RemoteCall,
    ) -> BoxFuture<'_, Result<Value>>;

    /// Start-style: begins a workflow or an update and returns a handle to it.
    fn start(
        &self,
        execution: WorkflowExecution,
        call: RemoteCall,
    ) -> BoxFuture<'_, Result<HandleRef>>;

    /// Outcome of something previously started: the workflow result when
    /// `handle.update_id` is `None`, otherwise that update's result.
    fn result(
        &self,
        handle: HandleRef,
        result_type: TypeDescriptor,
    ) -> BoxFuture<'_, Result<Value>>;
}

impl<C: WorkflowClient + ?Sized> WorkflowClient for Arc<C> {
    fn execute(
        &self,
        execution: WorkflowExecution,
        call: RemoteCall,
    ) -> BoxFuture<'_, Result<Value>> {
        (**self).execute(execution, call)
    }

    fn start(
        &self,
        execution: WorkflowExecution,
        call: RemoteCall,
    ) -> BoxFuture<'_, Result<HandleRef>> {
        (**self).start(execution, call)
    }

    fn result(
        &self,
        handle: HandleRef,
        result_type: TypeDescriptor,
    ) -> BoxFuture<'_, Result<Value>> {
        (**self).result(handle, result_type)
    }
}
