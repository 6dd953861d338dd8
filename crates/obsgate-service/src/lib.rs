//! Obsgate Service Library
//!
//! Assembles the gateway: operation handlers bound to a store resolution
//! strategy and dispatched through the durable-execution host's checkpointed
//! step primitive. The host itself (transport, identity verification, the
//! checkpoint journal) is external; it consumes [`Service`] and supplies a
//! [`StepContext`] per invocation.
//!
//! Embedding without a durable host:
//!
//! ```no_run
//! use std::sync::Arc;
//! use obsgate_service::{build_gateway, ImmediateContext, Settings};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let settings = Settings::from_env()?;
//! let service = build_gateway(&settings)?;
//! let _result = service
//!     .invoke(
//!         Arc::new(ImmediateContext),
//!         "head",
//!         serde_json::json!({"url": "s3://bucket", "path": "a/b"}),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod durable;
pub mod executor;
pub mod gateway;
pub mod registrar;
pub mod settings;
pub mod telemetry;

// Re-export commonly used types
pub use durable::{Handler, ImmediateContext, Service, StepContext, StepFn, StepFuture, StepOutcome};
pub use executor::Executor;
pub use gateway::build_gateway;
pub use registrar::{build_service, DEFAULT_SERVICE_NAME};
pub use settings::Settings;
pub use telemetry::init_telemetry;
