//! Operation request and response schemas.
//!
//! One request type per gateway operation. Schemas are closed
//! (`deny_unknown_fields`) so the protocol stays unambiguous, and every request
//! validates itself before it is allowed anywhere near a store. Responses that
//! accept a scalar-or-sequence operand mirror the input shape element for
//! element.
//!
//! Unbound deployments carry a store URL on every request; that variant is the
//! same schema wrapped in [`Targeted`], never a duplicated copy.

use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::error::GatewayError;

/// Metadata for an object stored in an object store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// The unique identifier for the object, if the backend provides one.
    pub e_tag: Option<String>,
    /// The last modified time.
    pub last_modified: DateTime<Utc>,
    /// The full path to the object.
    pub path: String,
    /// The size in bytes of the object.
    pub size: u64,
    /// A version indicator for this object, if the backend provides one.
    pub version: Option<String>,
}

/// A scalar operand or an ordered sequence of operands.
///
/// Operations that accept this shape must produce results in the same shape:
/// scalar in, scalar out; sequence in, sequence out with positional alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            OneOrMany::One(_) => false,
            OneOrMany::Many(items) => items.is_empty(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item).iter(),
            OneOrMany::Many(items) => items.iter(),
        }
    }
}

/// Request validation, applied before dispatch.
///
/// A request that fails validation never reaches the storage facade.
pub trait Validate {
    fn validate(&self) -> Result<(), GatewayError>;
}

fn require(value: &str, field: &'static str) -> Result<(), GatewayError> {
    if value.is_empty() {
        return Err(GatewayError::Validation(format!(
            "'{field}' must not be empty"
        )));
    }
    Ok(())
}

fn require_paths(paths: &OneOrMany<String>, field: &'static str) -> Result<(), GatewayError> {
    if paths.is_empty() {
        return Err(GatewayError::Validation(format!(
            "'{field}' must contain at least one path"
        )));
    }
    for path in paths.iter() {
        require(path, field)?;
    }
    Ok(())
}

/// Copy an object from one path to another in the same object store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyRequest {
    /// Source path.
    pub from: String,
    /// Destination path.
    pub to: String,
    /// Overwrite an object at the destination path if it exists, otherwise fail.
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
}

fn default_overwrite() -> bool {
    true
}

impl Validate for CopyRequest {
    fn validate(&self) -> Result<(), GatewayError> {
        require(&self.from, "from")?;
        require(&self.to, "to")
    }
}

/// Delete the object at the specified location(s).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteRequest {
    /// The path or paths within the store to delete.
    pub paths: OneOrMany<String>,
}

impl Validate for DeleteRequest {
    fn validate(&self) -> Result<(), GatewayError> {
        require_paths(&self.paths, "paths")
    }
}

/// Return the bytes that are stored at the specified location.
///
/// The body of this operation is intentionally unimplemented; whether `get`
/// should stream or buffer is an open design decision the shape does not
/// prejudge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetRequest {
    /// The path within the store to retrieve.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetResponse {}

impl Validate for GetRequest {
    fn validate(&self) -> Result<(), GatewayError> {
        require(&self.path, "path")
    }
}

/// Return the metadata for the specified location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeadRequest {
    /// The path within the store to inspect.
    pub path: String,
}

impl Validate for HeadRequest {
    fn validate(&self) -> Result<(), GatewayError> {
        require(&self.path, "path")
    }
}

/// List the objects with the given prefix.
///
/// Prefix and pagination semantics are intentionally undecided; the schema is
/// an empty closed object until they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListRequest {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListResponse {}

impl Validate for ListRequest {
    fn validate(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}

/// Save the provided bytes to the specified location.
///
/// Same placeholder status as `get`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PutRequest {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PutResponse {}

impl Validate for PutRequest {
    fn validate(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}

/// Move an object from one path to another in the same object store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenameRequest {
    /// Source path.
    pub from: String,
    /// Destination path.
    pub to: String,
    /// Overwrite an object at the destination path if it exists, otherwise fail.
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
}

impl Validate for RenameRequest {
    fn validate(&self) -> Result<(), GatewayError> {
        require(&self.from, "from")?;
        require(&self.to, "to")
    }
}

/// HTTP method a signed URL is valid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Put,
    Post,
    Head,
    Patch,
    Trace,
    Delete,
    Options,
    Connect,
}

impl HttpVerb {
    pub fn as_method(&self) -> http::Method {
        match self {
            HttpVerb::Get => http::Method::GET,
            HttpVerb::Put => http::Method::PUT,
            HttpVerb::Post => http::Method::POST,
            HttpVerb::Head => http::Method::HEAD,
            HttpVerb::Patch => http::Method::PATCH,
            HttpVerb::Trace => http::Method::TRACE,
            HttpVerb::Delete => http::Method::DELETE,
            HttpVerb::Options => http::Method::OPTIONS,
            HttpVerb::Connect => http::Method::CONNECT,
        }
    }
}

/// Create signed URL(s) for the specified location(s).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignRequest {
    pub method: HttpVerb,
    /// The path or paths within the store to sign.
    pub paths: OneOrMany<String>,
    /// Expiry in seconds, relative to the moment of signing (not to request
    /// receipt).
    pub expires_in: u64,
}

impl Validate for SignRequest {
    fn validate(&self) -> Result<(), GatewayError> {
        require_paths(&self.paths, "paths")?;
        if self.expires_in == 0 {
            return Err(GatewayError::Validation(
                "'expires_in' must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Signed URL(s), shaped like the request's `paths` and positionally aligned
/// with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignResponse {
    pub signed: OneOrMany<String>,
}

/// A request extended with the URL of the store it targets.
///
/// Unbound deployments wrap every operation schema in this envelope; the inner
/// schema stays identical to the bound one. Deserialization splits off `url`
/// by hand so the inner schema's unknown-field rejection still applies to the
/// remaining fields.
#[derive(Debug, Clone, Serialize)]
pub struct Targeted<T> {
    /// Object store URL, e.g. `s3://bucket`.
    pub url: Url,
    #[serde(flatten)]
    pub request: T,
}

impl<'de, T> Deserialize<'de> for Targeted<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = serde_json::Map::deserialize(deserializer)?;
        let url = fields
            .remove("url")
            .ok_or_else(|| de::Error::missing_field("url"))?;
        let url: Url = serde_json::from_value(url).map_err(de::Error::custom)?;
        let request: T =
            serde_json::from_value(serde_json::Value::Object(fields)).map_err(de::Error::custom)?;
        Ok(Targeted { url, request })
    }
}
