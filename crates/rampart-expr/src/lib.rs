//! Design tree for Rampart API definitions.
//!
//! Holds the API, its services, HTTP endpoints and errors as produced by the
//! DSL, resolves inherited HTTP paths across parent services and validates
//! the finished tree. Problems are collected as [`Diagnostics`] instead of
//! stopping at the first one.

pub mod api;
pub mod attribute;
pub mod docs;
pub mod error;
pub mod expression;
pub mod file_server;
pub mod http_endpoint;
pub mod http_error;
pub mod http_service;
pub mod path;
pub mod root;
pub mod service;
pub mod validate;

pub use api::{ApiExpr, ApiHttpExpr};
pub use attribute::{AttributeExpr, DataType, MappedAttribute, MappedAttributeExpr};
pub use docs::{ContactExpr, DocsExpr, LicenseExpr, ServerExpr};
pub use error::{Diagnostic, Diagnostics, DslError, FatalError, ValidationError};
pub use expression::Expression;
pub use file_server::HttpFileServerExpr;
pub use http_endpoint::{HttpEndpointExpr, HttpMethod, RouteExpr};
pub use http_error::{HttpErrorExpr, HttpResponseExpr};
pub use http_service::{HttpServiceExpr, SchemeMode, DEFAULT_CANONICAL_ENDPOINT};
pub use root::Root;
pub use service::{ErrorExpr, MethodExpr, ServiceExpr};
pub use validate::validate;
