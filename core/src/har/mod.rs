#![deny(missing_docs)]

//! # Request Compilation Module
//!
//! Produces HAR-shaped requests from prepared operations.
//!
//! - **params**: Parameter value resolution and style serialization.
//! - **body**: Request body encoding (JSON, form, XML, text).
//! - **security**: Credential injection from security schemes.
//! - **cookies** / **headers**: Global cookies and default headers.
//! - **assembler**: The pipeline tying the pieces together.

pub mod assembler;
pub mod body;
pub mod cookies;
pub mod headers;
pub mod models;
pub mod params;
pub mod security;
pub mod xml;

pub use assembler::{RequestAssembler, RequestContext};
pub use body::{encode_body, EncodedBody};
pub use cookies::{CookieFilter, DisabledCookies, GlobalCookie, StandardCookieFilter};
pub use headers::{DefaultHeader, DefaultHeaderProvider, StandardHeaderProvider};
pub use models::{AssembledRequest, PostData, SerializedEntry};
pub use params::{resolve_parameter_value, serialize_parameter, SerializedParameter};
pub use security::{inject_security, SchemeCredentials, SecurityEntries, SecuritySchemeSecret};
