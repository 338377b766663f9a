#![deny(missing_docs)]

//! # Reqgen Core
//!
//! Compiles OpenAPI operations into concrete, HAR-shaped HTTP requests.

/// Shared error types.
pub mod error;

/// Dynamic values produced by examples and schemas.
pub mod value;

/// OpenAPI (OAS) input: models, document loading, example synthesis.
pub mod oas;

/// Request compilation into HAR entries.
pub mod har;

pub use error::{AppError, AppResult};
pub use har::{AssembledRequest, RequestAssembler, RequestContext};
pub use oas::{OpenApiDocument, Operation, Server};
pub use value::ResolvedValue;
