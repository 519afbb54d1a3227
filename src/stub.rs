//! Typed remote calls against a single workflow execution.
//!
//! [`WorkflowStub`] resolves a method reference to its wire name, builds a
//! [`RemoteCall`] carrying the expected [`ResultType`] descriptor and the
//! arguments, and hands it to the [`WorkflowClient`]. Name resolution happens
//! before the client is touched, so a misdeclared method never reaches the wire.
//!
//! ```ignore
//! use workflow_stub::{args, Config, ResultType, WorkflowStub};
//!
//! let mut stub = WorkflowStub::new(client, Config::for_workflow("order-42"))?;
//! stub.start(&place, args!["sku-1"]?).await?;
//! stub.signal(&cancel, args![]?).await?;
//! let total: u64 = stub.update(&add_item, ResultType::new(), args!["sku-2"]?).await?;
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    client::WorkflowClient,
    errors::{Error, Result},
    identifiers::{Namespace, RunId, UpdateId, WorkflowId},
    metadata::{MethodRef, RoleTag},
    types::{HandleRef, RemoteCall, ResultType, WorkflowExecution},
    DEFAULT_NAMESPACE,
};

#[derive(Clone, Debug, Default)]
pub struct Config {
    pub workflow_id: Option<String>,
    /// Run to target; the latest run when unset.
    pub run_id: Option<String>,
    /// First run of the execution chain; passed along with update requests.
    pub first_execution_run_id: Option<String>,
    /// Namespace (defaults to `"default"`).
    pub namespace: Option<String>,
}

impl Config {
    pub fn for_workflow(workflow_id: impl Into<String>) -> Self {
        Self {
            workflow_id: Some(workflow_id.into()),
            ..Default::default()
        }
    }
}

pub struct WorkflowStub<C> {
    client: Arc<C>,
    execution: WorkflowExecution,
    first_execution_run_id: Option<RunId>,
}

impl<C> Clone for WorkflowStub<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            execution: self.execution.clone(),
            first_execution_run_id: self.first_execution_run_id.clone(),
        }
    }
}

impl<C: WorkflowClient> WorkflowStub<C> {
    pub fn new(client: C, cfg: Config) -> Result<Self> {
        Self::with_shared_client(Arc::new(client), cfg)
    }

    pub fn with_shared_client(client: Arc<C>, cfg: Config) -> Result<Self> {
        let workflow_id = non_blank(cfg.workflow_id)
            .map(WorkflowId::new)
            .ok_or_else(|| Error::Config("workflow_id is required".to_string()))?;
        let namespace = non_blank(cfg.namespace).unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        Ok(Self {
            client,
            execution: WorkflowExecution {
                namespace: Namespace::new(namespace),
                workflow_id,
                run_id: non_blank(cfg.run_id).map(RunId::new),
            },
            first_execution_run_id: non_blank(cfg.first_execution_run_id).map(RunId::new),
        })
    }

    pub fn execution(&self) -> &WorkflowExecution {
        &self.execution
    }

    /// Start the workflow through its entry method; the stub then targets the new run.
    pub async fn start(
        &mut self,
        method: &MethodRef,
        args: Vec<Value>,
    ) -> Result<WorkflowExecution> {
        let call = RemoteCall::for_method(
            method,
            RoleTag::Workflow,
            ResultType::<Value>::new().descriptor().clone(),
            args,
        )?;
        let handle = self.start_call(call).await?;
        if self.first_execution_run_id.is_none() {
            self.first_execution_run_id = handle.execution.run_id.clone();
        }
        self.execution = handle.execution;
        Ok(self.execution.clone())
    }

    /// Run the workflow through its entry method and wait for its result.
    pub async fn execute<R: DeserializeOwned>(
        &self,
        method: &MethodRef,
        result: ResultType<R>,
        args: Vec<Value>,
    ) -> Result<R> {
        let call =
            RemoteCall::for_method(method, RoleTag::Workflow, result.descriptor().clone(), args)?;
        result.decode(self.execute_call(call).await?)
    }

    pub async fn signal(&self, method: &MethodRef, args: Vec<Value>) -> Result<()> {
        let call = RemoteCall::for_method(
            method,
            RoleTag::Signal,
            ResultType::<()>::new().descriptor().clone(),
            args,
        )?;
        self.execute_call(call).await.map(|_| ())
    }

    pub async fn query<R: DeserializeOwned>(
        &self,
        method: &MethodRef,
        result: ResultType<R>,
        args: Vec<Value>,
    ) -> Result<R> {
        let call =
            RemoteCall::for_method(method, RoleTag::Query, result.descriptor().clone(), args)?;
        result.decode(self.execute_call(call).await?)
    }

    /// Run an update and wait for its result. Accepts the update method or its validator.
    pub async fn update<R: DeserializeOwned>(
        &self,
        method: &MethodRef,
        result: ResultType<R>,
        args: Vec<Value>,
    ) -> Result<R> {
        let call =
            RemoteCall::for_method(method, RoleTag::Update, result.descriptor().clone(), args)?;
        let call = self.prepare_update(call, None, None);
        result.decode(self.execute_call(call).await?)
    }

    pub async fn start_update<R: DeserializeOwned>(
        &self,
        method: &MethodRef,
        result: ResultType<R>,
        args: Vec<Value>,
    ) -> Result<UpdateHandle<C, R>> {
        let call =
            RemoteCall::for_method(method, RoleTag::Update, result.descriptor().clone(), args)?;
        let call = self.prepare_update(call, None, None);
        self.start_update_call(call, result).await
    }

    /// Run an update addressed by its literal wire name.
    pub async fn update_by_name<R: DeserializeOwned>(
        &self,
        update_name: &str,
        result: ResultType<R>,
        args: Vec<Value>,
    ) -> Result<R> {
        let call = RemoteCall::named(
            RoleTag::Update,
            update_name,
            result.descriptor().clone(),
            args,
        )?;
        let call = self.prepare_update(call, None, None);
        result.decode(self.execute_call(call).await?)
    }

    pub async fn update_by_name_with_id<R: DeserializeOwned>(
        &self,
        update_name: &str,
        update_id: impl Into<UpdateId>,
        first_execution_run_id: impl Into<RunId>,
        result: ResultType<R>,
        args: Vec<Value>,
    ) -> Result<R> {
        let call = RemoteCall::named(
            RoleTag::Update,
            update_name,
            result.descriptor().clone(),
            args,
        )?;
        let call = self.prepare_update(
            call,
            Some(update_id.into()),
            Some(first_execution_run_id.into()),
        );
        result.decode(self.execute_call(call).await?)
    }

    pub async fn start_update_by_name<R: DeserializeOwned>(
        &self,
        update_name: &str,
        result: ResultType<R>,
        args: Vec<Value>,
    ) -> Result<UpdateHandle<C, R>> {
        let call = RemoteCall::named(
            RoleTag::Update,
            update_name,
            result.descriptor().clone(),
            args,
        )?;
        let call = self.prepare_update(call, None, None);
        self.start_update_call(call, result).await
    }

    pub async fn start_update_by_name_with_id<R: DeserializeOwned>(
        &self,
        update_name: &str,
        update_id: impl Into<UpdateId>,
        first_execution_run_id: impl Into<RunId>,
        result: ResultType<R>,
        args: Vec<Value>,
    ) -> Result<UpdateHandle<C, R>> {
        let call = RemoteCall::named(
            RoleTag::Update,
            update_name,
            result.descriptor().clone(),
            args,
        )?;
        let call = self.prepare_update(
            call,
            Some(update_id.into()),
            Some(first_execution_run_id.into()),
        );
        self.start_update_call(call, result).await
    }

    /// Wait for the workflow result.
    pub async fn get_result<R: DeserializeOwned>(&self, result: ResultType<R>) -> Result<R> {
        let handle = HandleRef {
            execution: self.execution.clone(),
            update_id: None,
        };
        let value = self
            .client
            .result(handle, result.descriptor().clone())
            .await?;
        result.decode(value)
    }

    fn prepare_update(
        &self,
        call: RemoteCall,
        update_id: Option<UpdateId>,
        first_execution_run_id: Option<RunId>,
    ) -> RemoteCall {
        call.with_update_id(update_id.unwrap_or_else(UpdateId::generate))
            .with_first_execution_run_id(
                first_execution_run_id.or_else(|| self.first_execution_run_id.clone()),
            )
    }

    async fn start_update_call<R>(
        &self,
        call: RemoteCall,
        result: ResultType<R>,
    ) -> Result<UpdateHandle<C, R>> {
        let name = call.name.clone();
        let requested_id = call.update_id.clone();
        let mut handle = self.start_call(call).await?;
        if handle.update_id.is_none() {
            handle.update_id = requested_id;
        }
        Ok(UpdateHandle {
            client: self.client.clone(),
            handle,
            name,
            result,
        })
    }

    async fn execute_call(&self, call: RemoteCall) -> Result<Value> {
        #[cfg(feature = "tracing")]
        let span = call_span(&call);
        let fut = self.client.execute(self.execution.clone(), call);
        #[cfg(feature = "tracing")]
        let fut = tracing::Instrument::instrument(fut, span);
        fut.await
    }

    async fn start_call(&self, call: RemoteCall) -> Result<HandleRef> {
        #[cfg(feature = "tracing")]
        let span = call_span(&call);
        let fut = self.client.start(self.execution.clone(), call);
        #[cfg(feature = "tracing")]
        let fut = tracing::Instrument::instrument(fut, span);
        fut.await
    }
}

#[cfg(feature = "tracing")]
fn call_span(call: &RemoteCall) -> tracing::Span {
    tracing::debug_span!(
        "workflow_stub.call",
        role = %call.role,
        name = %call.name,
        args = call.args.len()
    )
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Handle to an update that was started but not awaited.
pub struct UpdateHandle<C, R> {
    client: Arc<C>,
    handle: HandleRef,
    name: String,
    result: ResultType<R>,
}

impl<C: WorkflowClient, R: DeserializeOwned> UpdateHandle<C, R> {
    /// Update id; generated when the caller did not supply one.
    pub fn id(&self) -> Option<&UpdateId> {
        self.handle.update_id.as_ref()
    }

    pub fn execution(&self) -> &WorkflowExecution {
        &self.handle.execution
    }

    /// Resolved update name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait for the update's outcome.
    pub async fn get_result(&self) -> Result<R> {
        let value = self
            .client
            .result(self.handle.clone(), self.result.descriptor().clone())
            .await?;
        self.result.decode(value)
    }
}
