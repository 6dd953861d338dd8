//! Operation execution over a resolution strategy.
//!
//! Each method runs the fixed pipeline: decode and validate the request,
//! resolve a store through the active strategy, then perform the storage call
//! inside a checkpointed step named after the operation. Decoding, validation,
//! and resolution stay outside the step — they are side-effect free and must
//! fail before anything is journaled; the storage call is the side effect and
//! never happens outside the step.

use std::sync::Arc;

use serde_json::Value;

use obsgate_core::{
    CopyRequest, DeleteRequest, GatewayError, GetRequest, HeadRequest, ListRequest, PutRequest,
    RenameRequest, SignRequest,
};
use obsgate_store::resolve::StoreResolver;
use obsgate_store::ops;

use crate::durable::{StepContext, StepOutcome};

fn to_value<T: serde::Serialize>(value: T) -> StepOutcome {
    serde_json::to_value(value).map_err(|err| GatewayError::Internal(err.to_string()))
}

pub struct Executor<R> {
    resolver: R,
}

impl<R: StoreResolver> Executor<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub async fn copy(&self, ctx: Arc<dyn StepContext>, payload: Value) -> StepOutcome {
        let (request, handle) = self.resolver.prepare::<CopyRequest>(payload)?;
        ctx.run_step(
            "copy",
            Box::new(move || {
                Box::pin(async move {
                    ops::copy(&handle, &request).await?;
                    Ok(Value::Null)
                })
            }),
        )
        .await
    }

    pub async fn delete(&self, ctx: Arc<dyn StepContext>, payload: Value) -> StepOutcome {
        let (request, handle) = self.resolver.prepare::<DeleteRequest>(payload)?;
        ctx.run_step(
            "delete",
            Box::new(move || {
                Box::pin(async move {
                    ops::delete(&handle, &request).await?;
                    Ok(Value::Null)
                })
            }),
        )
        .await
    }

    pub async fn get(&self, ctx: Arc<dyn StepContext>, payload: Value) -> StepOutcome {
        let (request, handle) = self.resolver.prepare::<GetRequest>(payload)?;
        ctx.run_step(
            "get",
            Box::new(move || {
                Box::pin(async move { to_value(ops::get(&handle, &request).await?) })
            }),
        )
        .await
    }

    pub async fn head(&self, ctx: Arc<dyn StepContext>, payload: Value) -> StepOutcome {
        let (request, handle) = self.resolver.prepare::<HeadRequest>(payload)?;
        ctx.run_step(
            "head",
            Box::new(move || {
                Box::pin(async move { to_value(ops::head(&handle, &request).await?) })
            }),
        )
        .await
    }

    pub async fn list(&self, ctx: Arc<dyn StepContext>, payload: Value) -> StepOutcome {
        let (request, handle) = self.resolver.prepare::<ListRequest>(payload)?;
        ctx.run_step(
            "list",
            Box::new(move || {
                Box::pin(async move { to_value(ops::list(&handle, &request).await?) })
            }),
        )
        .await
    }

    pub async fn put(&self, ctx: Arc<dyn StepContext>, payload: Value) -> StepOutcome {
        let (request, handle) = self.resolver.prepare::<PutRequest>(payload)?;
        ctx.run_step(
            "put",
            Box::new(move || {
                Box::pin(async move { to_value(ops::put(&handle, &request).await?) })
            }),
        )
        .await
    }

    pub async fn rename(&self, ctx: Arc<dyn StepContext>, payload: Value) -> StepOutcome {
        let (request, handle) = self.resolver.prepare::<RenameRequest>(payload)?;
        ctx.run_step(
            "rename",
            Box::new(move || {
                Box::pin(async move {
                    ops::rename(&handle, &request).await?;
                    Ok(Value::Null)
                })
            }),
        )
        .await
    }

    pub async fn sign(&self, ctx: Arc<dyn StepContext>, payload: Value) -> StepOutcome {
        let (request, handle) = self.resolver.prepare::<SignRequest>(payload)?;
        ctx.run_step(
            "sign",
            Box::new(move || {
                Box::pin(async move { to_value(ops::sign(&handle, &request).await?) })
            }),
        )
        .await
    }
}
