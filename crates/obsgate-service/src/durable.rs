//! The durable-execution host seam.
//!
//! The host owns the wire protocol, handler invocation, retries, and the
//! checkpoint journal; this module defines the two interfaces the gateway
//! needs from it. [`StepContext`] is the checkpointed-step primitive: a named
//! unit of work whose outcome the host records durably, so a replayed
//! invocation gets the recorded outcome back instead of re-executing the work.
//! [`Service`] is the registration surface the host consumes: a named set of
//! operation handlers.
//!
//! Everything store-mutating in this workspace runs inside a step; nothing
//! else does.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use obsgate_core::GatewayError;

/// Outcome of a handler or a checkpointed step.
pub type StepOutcome = Result<Value, GatewayError>;

/// The work performed inside a step.
pub type StepFuture = BoxFuture<'static, StepOutcome>;

pub type StepFn = Box<dyn FnOnce() -> StepFuture + Send>;

/// Per-invocation context supplied by the durable-execution host.
#[async_trait]
pub trait StepContext: Send + Sync {
    /// Run a named, durably checkpointed step.
    ///
    /// On first execution the host runs `run`, records the outcome, and
    /// returns it. On replay of the same invocation the recorded outcome is
    /// returned and `run` is never invoked. Step names must be unique within
    /// an invocation and stable across replays; handlers here use the
    /// operation name.
    async fn run_step(&self, name: &str, run: StepFn) -> StepOutcome;
}

/// A [`StepContext`] without durability: every step runs immediately, exactly
/// once. Useful for embedding the gateway outside a durable host and for
/// tests; production deployments get their context from the host.
pub struct ImmediateContext;

#[async_trait]
impl StepContext for ImmediateContext {
    async fn run_step(&self, _name: &str, run: StepFn) -> StepOutcome {
        run().await
    }
}

/// An operation handler: raw request payload in, JSON result out.
pub type Handler = Arc<dyn Fn(Arc<dyn StepContext>, Value) -> StepFuture + Send + Sync>;

struct Registration {
    description: &'static str,
    handler: Handler,
}

/// A named set of operation handlers, ready for the host to expose.
pub struct Service {
    name: String,
    handlers: BTreeMap<&'static str, Registration>,
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn register(&mut self, operation: &'static str, description: &'static str, handler: Handler) {
        self.handlers.insert(
            operation,
            Registration {
                description,
                handler,
            },
        );
    }

    /// The registered operation names, sorted.
    pub fn operations(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }

    pub fn has_operation(&self, operation: &str) -> bool {
        self.handlers.contains_key(operation)
    }

    /// The human-readable description registered for an operation.
    pub fn description(&self, operation: &str) -> Option<&'static str> {
        self.handlers.get(operation).map(|r| r.description)
    }

    /// Dispatch one inbound call. Called by the host with the context for the
    /// current invocation.
    pub async fn invoke(
        &self,
        ctx: Arc<dyn StepContext>,
        operation: &str,
        payload: Value,
    ) -> StepOutcome {
        let registration = self.handlers.get(operation).ok_or_else(|| {
            GatewayError::Validation(format!("unknown operation '{operation}'"))
        })?;
        (registration.handler)(ctx, payload).await
    }
}
