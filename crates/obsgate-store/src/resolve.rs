//! Store resolution strategies.
//!
//! Two mutually exclusive strategies, selected once at process configuration
//! time, expose the same contract to the dispatch layer:
//!
//! - [`BoundResolver`] — one store handle, constructed at startup and shared
//!   (read-only) by every request for the process lifetime.
//! - [`UnboundResolver`] — a [`StoreFactory`] invoked per request with the URL
//!   carried on that request; handles are never shared or cached across
//!   requests. The factory trait is the seam for pooling, handle caching, or
//!   credential injection, none of which the default factory does.
//!
//! Resolution is the second of three fixed steps — decode, validate, resolve —
//! so an invalid request never causes a store to be constructed.

use std::sync::Arc;
use std::time::Duration;

use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::ClientOptions;
use serde::de::DeserializeOwned;
use url::Url;

use obsgate_core::{GatewayError, Targeted, Validate};

use crate::handle::StoreHandle;

/// HTTP client options forwarded to every backend builder.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Allow plain-HTTP endpoints (e.g. a local MinIO).
    pub allow_http: bool,
    /// Overall request timeout.
    pub timeout: Option<Duration>,
    /// Connection establishment timeout.
    pub connect_timeout: Option<Duration>,
}

impl ClientConfig {
    fn to_options(&self) -> ClientOptions {
        let mut options = ClientOptions::new().with_allow_http(self.allow_http);
        if let Some(timeout) = self.timeout {
            options = options.with_timeout(timeout);
        }
        if let Some(connect_timeout) = self.connect_timeout {
            options = options.with_connect_timeout(connect_timeout);
        }
        options
    }
}

fn resolution(err: object_store::Error) -> GatewayError {
    GatewayError::Resolution(err.to_string())
}

/// Construct a store handle from a URL.
///
/// The scheme selects the backend: `s3://`/`s3a://`, `gs://`,
/// `az://`/`adl://`/`azure://`/`abfs://`/`abfss://`, `file://`, `memory://`.
/// Cloud backends pick up credentials from the environment via their
/// respective builders. Anything else is a resolution error.
pub fn from_url(url: &Url, client: &ClientConfig) -> Result<StoreHandle, GatewayError> {
    let handle = match url.scheme() {
        "s3" | "s3a" => {
            let store = AmazonS3Builder::from_env()
                .with_url(url.as_str())
                .with_client_options(client.to_options())
                .build()
                .map_err(resolution)?;
            StoreHandle::S3(Arc::new(store))
        }
        "gs" => {
            let store = GoogleCloudStorageBuilder::from_env()
                .with_url(url.as_str())
                .with_client_options(client.to_options())
                .build()
                .map_err(resolution)?;
            StoreHandle::Gcs(Arc::new(store))
        }
        "az" | "adl" | "azure" | "abfs" | "abfss" => {
            let store = MicrosoftAzureBuilder::from_env()
                .with_url(url.as_str())
                .with_client_options(client.to_options())
                .build()
                .map_err(resolution)?;
            StoreHandle::Azure(Arc::new(store))
        }
        "file" => {
            let store = LocalFileSystem::new_with_prefix(url.path()).map_err(resolution)?;
            StoreHandle::Local(Arc::new(store))
        }
        "memory" => StoreHandle::Memory(Arc::new(InMemory::new())),
        other => {
            return Err(GatewayError::Resolution(format!(
                "unsupported object store scheme '{other}' in '{url}'"
            )))
        }
    };

    tracing::debug!(backend = %handle.backend(), url = %url, "resolved object store");

    Ok(handle)
}

/// Produces a store handle from a URL, once per request.
pub trait StoreFactory: Send + Sync {
    fn create(&self, url: &Url) -> Result<StoreHandle, GatewayError>;
}

/// Factory backed by [`from_url`] with fixed client options.
pub struct DefaultStoreFactory {
    client: ClientConfig,
}

impl DefaultStoreFactory {
    pub fn new(client: ClientConfig) -> Self {
        Self { client }
    }
}

impl StoreFactory for DefaultStoreFactory {
    fn create(&self, url: &Url) -> Result<StoreHandle, GatewayError> {
        from_url(url, &self.client)
    }
}

fn decode<T: DeserializeOwned>(payload: serde_json::Value) -> Result<T, GatewayError> {
    serde_json::from_value(payload).map_err(|err| GatewayError::Validation(err.to_string()))
}

/// The single contract both resolution strategies expose to dispatch:
/// given a raw request, produce the validated operands and a store handle.
pub trait StoreResolver: Send + Sync + 'static {
    /// Decode the mode-specific request envelope, validate the operands, and
    /// resolve a store handle — in that order, so validation failures surface
    /// before any store is touched.
    fn prepare<T>(&self, payload: serde_json::Value) -> Result<(T, StoreHandle), GatewayError>
    where
        T: DeserializeOwned + Validate;

    /// Whether the `sign` handler should be registered at all.
    ///
    /// Bound deployments answer once, from the fixed handle's capability;
    /// unbound deployments always register and gate per request, because the
    /// backend varies per request.
    fn sign_registered(&self) -> bool;
}

/// Bound mode: one store, fixed at startup.
pub struct BoundResolver {
    handle: StoreHandle,
}

impl BoundResolver {
    pub fn new(handle: StoreHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &StoreHandle {
        &self.handle
    }
}

impl StoreResolver for BoundResolver {
    fn prepare<T>(&self, payload: serde_json::Value) -> Result<(T, StoreHandle), GatewayError>
    where
        T: DeserializeOwned + Validate,
    {
        let request: T = decode(payload)?;
        request.validate()?;
        Ok((request, self.handle.clone()))
    }

    fn sign_registered(&self) -> bool {
        self.handle.supports_signing()
    }
}

/// Unbound mode: a fresh store per request, from the request's `url` field.
pub struct UnboundResolver<F = DefaultStoreFactory> {
    factory: F,
}

impl<F: StoreFactory> UnboundResolver<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<F: StoreFactory + 'static> StoreResolver for UnboundResolver<F> {
    fn prepare<T>(&self, payload: serde_json::Value) -> Result<(T, StoreHandle), GatewayError>
    where
        T: DeserializeOwned + Validate,
    {
        let Targeted { url, request } = decode::<Targeted<T>>(payload)?;
        request.validate()?;
        let handle = self.factory.create(&url)?;
        Ok((request, handle))
    }

    fn sign_registered(&self) -> bool {
        true
    }
}
