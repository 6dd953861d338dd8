//! Shared test doubles and fixtures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use object_store::path::Path;
use object_store::ObjectStoreExt;

use obsgate_service::{StepContext, StepFn, StepOutcome};
use obsgate_store::StoreHandle;

/// A `StepContext` that journals step outcomes by name, like a durable host:
/// the first execution of a step records its result, replays return the
/// recorded result without running the step again.
#[derive(Default)]
pub struct RecordingContext {
    journal: Mutex<HashMap<String, serde_json::Value>>,
    executions: AtomicUsize,
}

impl RecordingContext {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// How many steps actually ran (as opposed to being replayed).
    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StepContext for RecordingContext {
    async fn run_step(&self, name: &str, run: StepFn) -> StepOutcome {
        if let Some(recorded) = self.journal.lock().unwrap().get(name) {
            return Ok(recorded.clone());
        }

        self.executions.fetch_add(1, Ordering::SeqCst);
        let outcome = run().await?;
        self.journal
            .lock()
            .unwrap()
            .insert(name.to_string(), outcome.clone());
        Ok(outcome)
    }
}

/// Put an object of the given size directly into a store, bypassing the
/// gateway (whose `put` is a stub).
pub async fn seed_object(handle: &StoreHandle, path: &str, size: usize) {
    handle
        .store()
        .put(&Path::parse(path).unwrap(), vec![0u8; size].into())
        .await
        .unwrap();
}
