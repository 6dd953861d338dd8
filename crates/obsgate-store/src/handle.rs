//! Resolved store handles and their capability classification.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use object_store::aws::AmazonS3;
use object_store::azure::MicrosoftAzure;
use object_store::gcp::GoogleCloudStorage;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::signer::Signer;
use object_store::ObjectStore;

use obsgate_core::GatewayError;

/// Backend classification tag for a resolved store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    S3,
    Gcs,
    Azure,
    Local,
    Memory,
}

impl FromStr for Backend {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(Backend::S3),
            "gcs" => Ok(Backend::Gcs),
            "azure" => Ok(Backend::Azure),
            "local" => Ok(Backend::Local),
            "memory" => Ok(Backend::Memory),
            other => Err(GatewayError::Resolution(format!(
                "unknown storage backend: {other}"
            ))),
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Backend::S3 => write!(f, "s3"),
            Backend::Gcs => write!(f, "gcs"),
            Backend::Azure => write!(f, "azure"),
            Backend::Local => write!(f, "local"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

/// A resolved object store.
///
/// The closed set of backends the gateway can front. A handle is immutable
/// once created: bound deployments share one handle across all requests for
/// the process lifetime, unbound deployments create one per request and drop
/// it with the request.
///
/// Cloning is cheap and shares the underlying store instance.
#[derive(Clone)]
pub enum StoreHandle {
    S3(Arc<AmazonS3>),
    Gcs(Arc<GoogleCloudStorage>),
    Azure(Arc<MicrosoftAzure>),
    Local(Arc<LocalFileSystem>),
    Memory(Arc<InMemory>),
}

impl StoreHandle {
    pub fn backend(&self) -> Backend {
        match self {
            StoreHandle::S3(_) => Backend::S3,
            StoreHandle::Gcs(_) => Backend::Gcs,
            StoreHandle::Azure(_) => Backend::Azure,
            StoreHandle::Local(_) => Backend::Local,
            StoreHandle::Memory(_) => Backend::Memory,
        }
    }

    /// The store itself, for the operations every backend supports.
    pub fn store(&self) -> &dyn ObjectStore {
        match self {
            StoreHandle::S3(store) => store.as_ref(),
            StoreHandle::Gcs(store) => store.as_ref(),
            StoreHandle::Azure(store) => store.as_ref(),
            StoreHandle::Local(store) => store.as_ref(),
            StoreHandle::Memory(store) => store.as_ref(),
        }
    }

    /// The capability gate for `sign`.
    ///
    /// Returns the signer for backends that can produce pre-authenticated
    /// URLs, `None` otherwise. Evaluated structurally against the variant,
    /// every time a store is resolved.
    pub fn signer(&self) -> Option<&dyn Signer> {
        match self {
            StoreHandle::S3(store) => Some(store.as_ref()),
            StoreHandle::Gcs(store) => Some(store.as_ref()),
            StoreHandle::Azure(store) => Some(store.as_ref()),
            StoreHandle::Local(_) | StoreHandle::Memory(_) => None,
        }
    }

    pub fn supports_signing(&self) -> bool {
        self.signer().is_some()
    }

    /// Whether two handles share the same underlying store instance.
    pub fn shares_store(&self, other: &StoreHandle) -> bool {
        match (self, other) {
            (StoreHandle::S3(a), StoreHandle::S3(b)) => Arc::ptr_eq(a, b),
            (StoreHandle::Gcs(a), StoreHandle::Gcs(b)) => Arc::ptr_eq(a, b),
            (StoreHandle::Azure(a), StoreHandle::Azure(b)) => Arc::ptr_eq(a, b),
            (StoreHandle::Local(a), StoreHandle::Local(b)) => Arc::ptr_eq(a, b),
            (StoreHandle::Memory(a), StoreHandle::Memory(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "StoreHandle({})", self.backend())
    }
}
