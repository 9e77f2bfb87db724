//! The builder calls.
//!
//! Each call takes the [`Eval`](crate::Eval) of the running evaluation and
//! acts on its current node. A call used in a context that does not accept
//! it records an `E2001` diagnostic and leaves the tree untouched.

mod api;
mod http;

pub use self::api::{
    api, contact, description, docs, email, license, name, server, server_with,
    server_with_bodies, terms_of_service, title, url, version,
};
pub use self::http::{
    attribute, canonical_method, code, delete, error, files, get, head, header, meta,
    method, options, param, parent, patch, path, post, put, response, service, trace,
};
