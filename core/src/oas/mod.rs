#![deny(missing_docs)]

//! # OpenAPI Input Module
//!
//! - **models**: Parameter, body, operation and server definitions.
//! - **document**: Loading a document and preparing operations from it.
//! - **examples**: Schema based example synthesis.
//! - **server**: Base URL resolution from Server Objects.

pub mod document;
pub mod examples;
pub mod models;
pub(crate) mod ref_utils;
pub mod server;

pub use document::{OpenApiDocument, OperationSummary};
pub use examples::{ExampleGenerator, ExampleMode, ExampleOptions, SchemaExampleGenerator};
pub use models::{
    ExampleObject, MediaTypeObject, Operation, ParameterDefinition, ParameterLocation,
    ParameterStyle, RequestBodyDefinition, SecurityRequirement, Server, ServerVariable,
};
pub use server::{ServerUrlResolver, StandardServerUrlResolver};
