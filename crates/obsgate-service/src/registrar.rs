//! Binds every operation to a durably dispatched handler.

use std::sync::Arc;

use obsgate_store::resolve::StoreResolver;

use crate::durable::Service;
use crate::executor::Executor;

/// Default service name; overridable through configuration.
pub const DEFAULT_SERVICE_NAME: &str = "Obstore";

macro_rules! register {
    ($service:expr, $executor:expr, $operation:literal, $method:ident, $doc:literal) => {{
        let executor = Arc::clone(&$executor);
        $service.register(
            $operation,
            $doc,
            Arc::new(move |ctx, payload| {
                let executor = Arc::clone(&executor);
                Box::pin(async move { executor.$method(ctx, payload).await })
            }),
        );
    }};
}

/// Register one handler per operation against the given resolver.
///
/// `sign` is registered only when the resolver says so: always in unbound mode
/// (the capability check then runs per request), and only for a sign-capable
/// store in bound mode — an absent handler beats one that can never succeed.
pub fn build_service<R: StoreResolver>(
    executor: Executor<R>,
    service_name: impl Into<String>,
) -> Service {
    let executor = Arc::new(executor);
    let mut service = Service::new(service_name);

    register!(
        service,
        executor,
        "copy",
        copy,
        "Copy an object from one path to another in the same object store."
    );
    register!(
        service,
        executor,
        "delete",
        delete,
        "Delete the object at the specified location(s)."
    );
    register!(
        service,
        executor,
        "get",
        get,
        "Return the bytes that are stored at the specified location."
    );
    register!(
        service,
        executor,
        "head",
        head,
        "Return the metadata for the specified location."
    );
    register!(
        service,
        executor,
        "list",
        list,
        "List all the objects with the given prefix."
    );
    register!(
        service,
        executor,
        "put",
        put,
        "Save the provided bytes to the specified location."
    );
    register!(
        service,
        executor,
        "rename",
        rename,
        "Move an object from one path to another in the same object store."
    );

    if executor.resolver().sign_registered() {
        register!(service, executor, "sign", sign, "Create a signed URL.");
    }

    tracing::info!(
        service = service.name(),
        operations = ?service.operations(),
        "gateway service registered"
    );

    service
}
