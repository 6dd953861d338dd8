//! End-to-end tests over the registered service: JSON payload in, JSON result
//! or typed failure out, with a journaling step context standing in for the
//! durable host.

mod helpers;

use std::sync::Arc;

use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use serde_json::json;

use helpers::{seed_object, RecordingContext};
use obsgate_service::{build_service, Executor, ImmediateContext, Service};
use obsgate_store::{
    BoundResolver, ClientConfig, DefaultStoreFactory, StoreHandle, UnboundResolver,
};

fn memory_handle() -> StoreHandle {
    StoreHandle::Memory(Arc::new(InMemory::new()))
}

fn bound_service(handle: StoreHandle) -> Service {
    build_service(Executor::new(BoundResolver::new(handle)), "Obstore")
}

fn unbound_service() -> Service {
    let factory = DefaultStoreFactory::new(ClientConfig::default());
    build_service(Executor::new(UnboundResolver::new(factory)), "Obstore")
}

#[test]
fn test_bound_mode_registers_sign_only_for_capable_stores() {
    let service = bound_service(memory_handle());
    assert!(!service.has_operation("sign"));
    assert_eq!(
        service.operations(),
        vec!["copy", "delete", "get", "head", "list", "put", "rename"]
    );

    let service = unbound_service();
    assert!(service.has_operation("sign"));
}

#[tokio::test]
async fn test_head_end_to_end() {
    let handle = memory_handle();
    seed_object(&handle, "a/b", 42).await;
    let service = bound_service(handle);

    let meta = service
        .invoke(Arc::new(ImmediateContext), "head", json!({"path": "a/b"}))
        .await
        .unwrap();
    assert_eq!(meta["size"], 42);
    assert_eq!(meta["path"], "a/b");
    assert!(!meta["last_modified"].is_null());

    // Same request against an empty store.
    let service = bound_service(memory_handle());
    let err = service
        .invoke(Arc::new(ImmediateContext), "head", json!({"path": "a/b"}))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_rename_then_head_both_paths() {
    let handle = memory_handle();
    seed_object(&handle, "x", 7).await;
    let service = bound_service(handle);
    let ctx: Arc<ImmediateContext> = Arc::new(ImmediateContext);

    service
        .invoke(
            ctx.clone(),
            "rename",
            json!({"from": "x", "to": "y", "overwrite": true}),
        )
        .await
        .unwrap();

    let err = service
        .invoke(ctx.clone(), "head", json!({"path": "x"}))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");

    let meta = service
        .invoke(ctx, "head", json!({"path": "y"}))
        .await
        .unwrap();
    assert_eq!(meta["size"], 7);
}

#[tokio::test]
async fn test_copy_conflict_surfaces_through_the_service() {
    let handle = memory_handle();
    seed_object(&handle, "src", 3).await;
    seed_object(&handle, "dst", 1).await;
    let service = bound_service(handle);

    let err = service
        .invoke(
            Arc::new(ImmediateContext),
            "copy",
            json!({"from": "src", "to": "dst", "overwrite": false}),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "ALREADY_EXISTS");
}

#[tokio::test]
async fn test_unknown_field_is_rejected_before_dispatch() {
    let service = bound_service(memory_handle());
    let err = service
        .invoke(
            Arc::new(ImmediateContext),
            "copy",
            json!({"from": "a", "to": "b", "force": true}),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_replay_returns_recorded_result_without_rerunning() {
    let handle = memory_handle();
    seed_object(&handle, "a/b", 42).await;
    let service = bound_service(handle.clone());
    let ctx = RecordingContext::new();

    let first = service
        .invoke(ctx.clone(), "head", json!({"path": "a/b"}))
        .await
        .unwrap();
    assert_eq!(ctx.executions(), 1);

    // Replay of the same invocation: the journaled step result comes back and
    // the storage backend is not touched again. Overwriting the object first
    // proves the replay never re-reads the store.
    seed_object(&handle, "a/b", 0).await;
    let replayed = service
        .invoke(ctx.clone(), "head", json!({"path": "a/b"}))
        .await
        .unwrap();
    assert_eq!(ctx.executions(), 1);
    assert_eq!(first, replayed);
    assert_eq!(replayed["size"], 42);
}

#[tokio::test]
async fn test_failed_steps_are_not_journaled() {
    let service = bound_service(memory_handle());
    let ctx = RecordingContext::new();

    let err = service
        .invoke(ctx.clone(), "head", json!({"path": "absent"}))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");

    // A retried invocation runs the step again rather than replaying a
    // failure.
    let err = service
        .invoke(ctx.clone(), "head", json!({"path": "absent"}))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(ctx.executions(), 2);
}

#[tokio::test]
async fn test_unbound_requests_carry_their_store_url() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("report.txt"), vec![0u8; 42]).unwrap();
    let url = url::Url::from_file_path(dir.path()).unwrap();

    let service = unbound_service();
    let meta = service
        .invoke(
            Arc::new(ImmediateContext),
            "head",
            json!({"url": url.as_str(), "path": "report.txt"}),
        )
        .await
        .unwrap();
    assert_eq!(meta["size"], 42);

    // Without a url the request fails validation before any store is built.
    let err = service
        .invoke(
            Arc::new(ImmediateContext),
            "head",
            json!({"path": "report.txt"}),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unbound_sign_is_gated_per_request() {
    let dir = tempfile::tempdir().unwrap();
    let url = url::Url::from_file_path(dir.path()).unwrap();

    let service = unbound_service();
    let err = service
        .invoke(
            Arc::new(ImmediateContext),
            "sign",
            json!({
                "url": url.as_str(),
                "method": "GET",
                "paths": "report.txt",
                "expires_in": 3600,
            }),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "UNSUPPORTED_CAPABILITY");
    assert!(err.to_string().contains("local"));
}

#[tokio::test]
async fn test_unbound_delete_reports_per_path_failures() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("present"), b"x").unwrap();
    let url = url::Url::from_file_path(dir.path()).unwrap();

    let service = unbound_service();
    let err = service
        .invoke(
            Arc::new(ImmediateContext),
            "delete",
            json!({"url": url.as_str(), "paths": ["present", "missing"]}),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "PARTIAL_DELETE");
    assert!(err.to_string().contains("1 of 2"));
    assert!(!dir.path().join("present").exists());
}

#[tokio::test]
async fn test_stub_operations_are_registered_but_unimplemented() {
    let service = bound_service(memory_handle());
    let ctx: Arc<ImmediateContext> = Arc::new(ImmediateContext);

    let err = service
        .invoke(ctx.clone(), "get", json!({"path": "a"}))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_IMPLEMENTED");

    let err = service.invoke(ctx.clone(), "list", json!({})).await.unwrap_err();
    assert_eq!(err.code(), "NOT_IMPLEMENTED");

    let err = service.invoke(ctx, "put", json!({})).await.unwrap_err();
    assert_eq!(err.code(), "NOT_IMPLEMENTED");
}

#[tokio::test]
async fn test_bound_delete_on_local_store() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("one"), b"1").unwrap();
    std::fs::write(dir.path().join("two"), b"2").unwrap();
    let handle = StoreHandle::Local(Arc::new(
        LocalFileSystem::new_with_prefix(dir.path()).unwrap(),
    ));
    let service = bound_service(handle);

    service
        .invoke(
            Arc::new(ImmediateContext),
            "delete",
            json!({"paths": ["one", "two"]}),
        )
        .await
        .unwrap();
    assert!(!dir.path().join("one").exists());
    assert!(!dir.path().join("two").exists());
}
