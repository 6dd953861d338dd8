//! Obsgate Core Library
//!
//! This crate provides the request/response schemas, validation, and error
//! taxonomy shared across all obsgate components. It is deliberately
//! dependency-light: nothing in here touches an object store or the durable
//! execution host.

pub mod error;
pub mod models;

// Re-export commonly used types
pub use error::{DeleteFailure, GatewayError};
pub use models::{
    CopyRequest, DeleteRequest, GetRequest, GetResponse, HeadRequest, HttpVerb, ListRequest,
    ListResponse, ObjectMeta, OneOrMany, PutRequest, PutResponse, RenameRequest, SignRequest,
    SignResponse, Targeted, Validate,
};
