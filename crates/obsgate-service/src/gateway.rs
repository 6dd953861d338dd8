//! Gateway assembly.

use obsgate_core::GatewayError;
use obsgate_store::resolve::{self, BoundResolver, DefaultStoreFactory, UnboundResolver};

use crate::durable::Service;
use crate::executor::Executor;
use crate::registrar::build_service;
use crate::settings::Settings;

/// Build the gateway service from settings.
///
/// A configured store URL selects bound mode: the store is resolved once,
/// here, and shared for the process lifetime. Otherwise the gateway runs
/// unbound, with a factory resolving a store from each request's `url` field.
pub fn build_gateway(settings: &Settings) -> Result<Service, GatewayError> {
    let service = match &settings.store_url {
        Some(url) => {
            let handle = resolve::from_url(url, &settings.client_config())?;
            tracing::info!(
                backend = %handle.backend(),
                sign_capable = handle.supports_signing(),
                "gateway bound to a fixed object store"
            );
            build_service(
                Executor::new(BoundResolver::new(handle)),
                settings.service_name.clone(),
            )
        }
        None => {
            tracing::info!("gateway unbound; store resolved per request");
            let factory = DefaultStoreFactory::new(settings.client_config());
            build_service(
                Executor::new(UnboundResolver::new(factory)),
                settings.service_name.clone(),
            )
        }
    };

    Ok(service)
}
