//! Storage facade: one function per gateway operation.
//!
//! Each function takes a resolved [`StoreHandle`] and an already-validated
//! request, performs exactly one storage interaction, and maps the store's
//! error surface onto the gateway taxonomy. These are the only call sites of
//! the `object_store` operation API in the workspace.

use std::time::{Duration, Instant};

use object_store::path::Path;
use object_store::ObjectStoreExt;

use obsgate_core::{
    CopyRequest, DeleteFailure, DeleteRequest, GatewayError, GetRequest, GetResponse, HeadRequest,
    ListRequest, ListResponse, ObjectMeta, OneOrMany, PutRequest, PutResponse, RenameRequest,
    SignRequest, SignResponse,
};

use crate::handle::StoreHandle;

fn parse_path(raw: &str) -> Result<Path, GatewayError> {
    Path::parse(raw).map_err(|err| GatewayError::Validation(format!("invalid path '{raw}': {err}")))
}

fn store_error(operation: &'static str, err: object_store::Error) -> GatewayError {
    match err {
        object_store::Error::NotFound { path, .. } => GatewayError::NotFound { path },
        object_store::Error::AlreadyExists { path, .. } => GatewayError::AlreadyExists { path },
        other => {
            tracing::error!(operation, error = %other, "object store call failed");
            GatewayError::Backend(other.to_string())
        }
    }
}

/// Copy an object. With `overwrite` unset the copy fails with a conflict if
/// the destination exists, and the destination is left untouched.
pub async fn copy(handle: &StoreHandle, request: &CopyRequest) -> Result<(), GatewayError> {
    let from = parse_path(&request.from)?;
    let to = parse_path(&request.to)?;
    let start = Instant::now();

    let store = handle.store();
    if request.overwrite {
        store.copy(&from, &to).await
    } else {
        store.copy_if_not_exists(&from, &to).await
    }
    .map_err(|err| store_error("copy", err))?;

    tracing::info!(
        backend = %handle.backend(),
        from = %from,
        to = %to,
        overwrite = request.overwrite,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "copy successful"
    );

    Ok(())
}

/// Delete every requested path. Paths are attempted independently; failures
/// are collected per path and reported together, so one missing object does
/// not mask the deletions that succeeded.
pub async fn delete(handle: &StoreHandle, request: &DeleteRequest) -> Result<(), GatewayError> {
    // All paths must parse before any deletion starts.
    let mut paths = Vec::with_capacity(request.paths.len());
    for raw in request.paths.iter() {
        paths.push((raw, parse_path(raw)?));
    }

    let store = handle.store();
    let start = Instant::now();
    let attempted = paths.len();
    let mut failures = Vec::new();

    for (raw, path) in paths {
        if let Err(err) = store.delete(&path).await {
            failures.push(DeleteFailure {
                path: raw.clone(),
                source: Box::new(store_error("delete", err)),
            });
        }
    }

    tracing::info!(
        backend = %handle.backend(),
        attempted,
        failed = failures.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "delete finished"
    );

    if failures.is_empty() {
        Ok(())
    } else {
        Err(GatewayError::PartialDelete {
            attempted,
            failures,
        })
    }
}

/// Fetch object metadata; not-found if the object is absent.
pub async fn head(handle: &StoreHandle, request: &HeadRequest) -> Result<ObjectMeta, GatewayError> {
    let path = parse_path(&request.path)?;

    let meta = handle
        .store()
        .head(&path)
        .await
        .map_err(|err| store_error("head", err))?;

    Ok(ObjectMeta {
        e_tag: meta.e_tag,
        last_modified: meta.last_modified,
        path: meta.location.to_string(),
        size: meta.size,
        version: meta.version,
    })
}

/// Move an object. Uses the backend's native rename where it has one, with
/// the same overwrite policy as [`copy`].
pub async fn rename(handle: &StoreHandle, request: &RenameRequest) -> Result<(), GatewayError> {
    let from = parse_path(&request.from)?;
    let to = parse_path(&request.to)?;
    let start = Instant::now();

    let store = handle.store();
    if request.overwrite {
        store.rename(&from, &to).await
    } else {
        store.rename_if_not_exists(&from, &to).await
    }
    .map_err(|err| store_error("rename", err))?;

    tracing::info!(
        backend = %handle.backend(),
        from = %from,
        to = %to,
        overwrite = request.overwrite,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "rename successful"
    );

    Ok(())
}

/// Create signed URL(s), one per requested path, in request order and in the
/// request's shape. Expiry is relative to the moment of signing. Valid only on
/// sign-capable backends; anything else is a capability error naming the
/// backend.
pub async fn sign(handle: &StoreHandle, request: &SignRequest) -> Result<SignResponse, GatewayError> {
    let signer = handle
        .signer()
        .ok_or_else(|| GatewayError::UnsupportedCapability {
            backend: handle.backend().to_string(),
        })?;

    let mut paths = Vec::with_capacity(request.paths.len());
    for raw in request.paths.iter() {
        paths.push(parse_path(raw)?);
    }

    let method = request.method.as_method();
    let expires_in = Duration::from_secs(request.expires_in);
    let start = Instant::now();

    let mut signed = Vec::with_capacity(paths.len());
    for path in &paths {
        let url = signer
            .signed_url(method.clone(), path, expires_in)
            .await
            .map_err(|err| store_error("sign", err))?;
        signed.push(url.to_string());
    }

    tracing::info!(
        backend = %handle.backend(),
        method = %method,
        count = signed.len(),
        expires_in_secs = request.expires_in,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "sign successful"
    );

    let signed = match &request.paths {
        OneOrMany::One(_) => {
            let first = signed.into_iter().next().ok_or_else(|| {
                GatewayError::Internal("signer produced no URL for a single path".into())
            })?;
            OneOrMany::One(first)
        }
        OneOrMany::Many(_) => OneOrMany::Many(signed),
    };

    Ok(SignResponse { signed })
}

/// Contract-only: fetch the bytes at a location. Whether `get` should stream
/// or buffer whole objects is deliberately undecided, so the body is a
/// placeholder.
pub async fn get(_handle: &StoreHandle, _request: &GetRequest) -> Result<GetResponse, GatewayError> {
    Err(GatewayError::Unimplemented { operation: "get" })
}

/// Contract-only: enumerate objects under a prefix. Pagination and prefix
/// semantics are deliberately undecided.
pub async fn list(
    _handle: &StoreHandle,
    _request: &ListRequest,
) -> Result<ListResponse, GatewayError> {
    Err(GatewayError::Unimplemented { operation: "list" })
}

/// Contract-only: write bytes to a location. Same placeholder status as
/// [`get`].
pub async fn put(_handle: &StoreHandle, _request: &PutRequest) -> Result<PutResponse, GatewayError> {
    Err(GatewayError::Unimplemented { operation: "put" })
}
