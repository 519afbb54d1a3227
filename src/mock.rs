#![cfg(feature = "mock")]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use serde_json::Value;

use crate::{
    client::{BoxFuture, WorkflowClient},
    errors::{Error, Result, ValidationError},
    identifiers::{RunId, UpdateId},
    metadata::{RoleTag, TypeDescriptor},
    types::{HandleRef, RemoteCall, WorkflowExecution},
};

/// In-memory mock configuration for offline tests.
#[derive(Default)]
pub struct MockConfig {
    pub execute_results: Vec<Result<Value>>,
    pub start_results: Vec<Result<HandleRef>>,
    pub fetch_results: Vec<Result<Value>>,
}

impl MockConfig {
    pub fn with_execute_result(mut self, value: Value) -> Self {
        self.execute_results.push(Ok(value));
        self
    }

    pub fn with_execute_error(mut self, err: Error) -> Self {
        self.execute_results.push(Err(err));
        self
    }

    /// Queue an explicit start handle. Without one, starts are answered with a
    /// generated run id (workflows) or the requested update id (updates).
    pub fn with_start_handle(mut self, handle: HandleRef) -> Self {
        self.start_results.push(Ok(handle));
        self
    }

    pub fn with_fetch_result(mut self, value: Value) -> Self {
        self.fetch_results.push(Ok(value));
        self
    }
}

/// Call observed by a [`MockWorkflowClient`], in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Execute {
        execution: WorkflowExecution,
        call: RemoteCall,
    },
    Start {
        execution: WorkflowExecution,
        call: RemoteCall,
    },
    Result {
        handle: HandleRef,
        result_type: TypeDescriptor,
    },
}

#[derive(Clone)]
pub struct MockWorkflowClient {
    inner: Arc<MockInner>,
}

impl MockWorkflowClient {
    pub fn new(cfg: MockConfig) -> Self {
        Self {
            inner: Arc::new(MockInner::new(cfg)),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.calls.lock().expect("lock poisoned").clone()
    }
}

struct MockInner {
    execute_results: Mutex<VecDeque<Result<Value>>>,
    start_results: Mutex<VecDeque<Result<HandleRef>>>,
    fetch_results: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<RecordedCall>>,
    runs_started: Mutex<u32>,
}

impl MockInner {
    fn new(cfg: MockConfig) -> Self {
        Self {
            execute_results: Mutex::new(VecDeque::from(cfg.execute_results)),
            start_results: Mutex::new(VecDeque::from(cfg.start_results)),
            fetch_results: Mutex::new(VecDeque::from(cfg.fetch_results)),
            calls: Mutex::new(Vec::new()),
            runs_started: Mutex::new(0),
        }
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().expect("lock poisoned").push(call);
    }

    fn next_execute(&self, call: &RemoteCall) -> Result<Value> {
        if call.role == RoleTag::Signal {
            return Ok(Value::Null);
        }
        self.execute_results
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(nothing_queued("execute")))
    }

    fn next_start(&self, execution: WorkflowExecution, call: &RemoteCall) -> Result<HandleRef> {
        if let Some(queued) = self
            .start_results
            .lock()
            .expect("lock poisoned")
            .pop_front()
        {
            return queued;
        }
        match call.role {
            RoleTag::Workflow => {
                let mut runs = self.runs_started.lock().expect("lock poisoned");
                *runs += 1;
                Ok(HandleRef {
                    execution: execution.with_run_id(RunId::new(format!("run-mock-{}", *runs))),
                    update_id: None,
                })
            }
            _ => Ok(HandleRef {
                execution,
                update_id: Some(call.update_id.clone().unwrap_or_else(UpdateId::generate)),
            }),
        }
    }

    fn next_fetch(&self) -> Result<Value> {
        self.fetch_results
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(nothing_queued("fetch")))
    }
}

fn nothing_queued(kind: &str) -> Error {
    Error::Validation(ValidationError::new(format!("no mock {kind} result queued")))
}

impl WorkflowClient for MockWorkflowClient {
    fn execute(
        &self,
        execution: WorkflowExecution,
        call: RemoteCall,
    ) -> BoxFuture<'_, Result<Value>> {
        Box::pin(async move {
            let result = self.inner.next_execute(&call);
            self.inner.record(RecordedCall::Execute { execution, call });
            result
        })
    }

    fn start(
        &self,
        execution: WorkflowExecution,
        call: RemoteCall,
    ) -> BoxFuture<'_, Result<HandleRef>> {
        Box::pin(async move {
            let result = self.inner.next_start(execution.clone(), &call);
            self.inner.record(RecordedCall::Start { execution, call });
            result
        })
    }

    fn result(
        &self,
        handle: HandleRef,
        result_type: TypeDescriptor,
    ) -> BoxFuture<'_, Result<Value>> {
        Box::pin(async move {
            let result = self.inner.next_fetch();
            self.inner.record(RecordedCall::Result {
                handle,
                result_type,
            });
            result
        })
    }
}
