//! Whole-tree validation.
//!
//! Runs once construction is complete. Every service is checked even when
//! earlier ones fail; the result is the concatenation of all findings.

use crate::error::Diagnostics;
use crate::root::Root;

/// Location used for findings that belong to no particular node.
pub const DESIGN_LOCATION: &str = "design";

/// Check every cross-node invariant of `root`.
pub fn validate(root: &Root) -> Diagnostics {
    let mut verr = Diagnostics::new();
    match root.api() {
        Some(api) => verr.merge(api.validate()),
        None => verr.add(DESIGN_LOCATION, "API is not defined"),
    }
    for service in root.services() {
        verr.merge(service.validate(root));
    }
    tracing::debug!(
        services = root.services().len(),
        diagnostics = verr.len(),
        "design validated"
    );
    verr
}

impl Root {
    /// See [`validate`].
    pub fn validate(&self) -> Diagnostics {
        validate(self)
    }
}
