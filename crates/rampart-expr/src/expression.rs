//! The open set of node types a builder call may target.
//!
//! Every node implements [`Expression`]. Builder calls that work on more
//! than one node type go through a capability accessor (`docs_mut`,
//! `servers_mut`, ...) instead of testing the concrete type, so adding a
//! node type only means overriding the accessors it supports.

use std::any::Any;
use std::fmt;

use crate::attribute::{AttributeExpr, MappedAttributeExpr};
use crate::docs::{DocsExpr, ServerExpr};

/// Type-erasure helpers, implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A node of the design tree.
pub trait Expression: AsAny + fmt::Debug {
    /// Name used in diagnostics, e.g. `service "users"`.
    fn eval_name(&self) -> String;

    /// Slot for `Docs`.
    fn docs_mut(&mut self) -> Option<&mut Option<DocsExpr>> {
        None
    }

    /// List extended by `Server`.
    fn servers_mut(&mut self) -> Option<&mut Vec<ServerExpr>> {
        None
    }

    /// Field set by `Description`.
    fn description_mut(&mut self) -> Option<&mut String> {
        None
    }

    /// Field set by `Name`.
    fn name_mut(&mut self) -> Option<&mut String> {
        None
    }

    /// Field set by `URL`.
    fn url_mut(&mut self) -> Option<&mut String> {
        None
    }

    /// Attribute list extended by `Attribute`.
    ///
    /// May create the list on first use; check [`Self::accepts_attributes`]
    /// to test for the capability without changing the node.
    fn attributes_mut(&mut self) -> Option<&mut Vec<AttributeExpr>> {
        None
    }

    /// Whether [`Self::attributes_mut`] would return a list.
    fn accepts_attributes(&self) -> bool {
        false
    }

    /// Map extended by `Header`.
    fn headers_mut(&mut self) -> Option<&mut MappedAttributeExpr> {
        None
    }
}

impl dyn Expression {
    /// Downcast to a concrete node type.
    pub fn downcast_mut<T: Expression>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Downcast to a concrete node type.
    pub fn downcast_ref<T: Expression>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::ContactExpr;

    #[test]
    fn downcast_through_trait_object() {
        let mut node: Box<dyn Expression> = Box::new(ContactExpr::default());
        assert!(node.downcast_mut::<ContactExpr>().is_some());
        assert!(node.downcast_ref::<DocsExpr>().is_none());
        assert!(node.name_mut().is_some());
        assert!(node.docs_mut().is_none());
    }

    #[test]
    fn into_any_recovers_concrete_node() {
        let node: Box<dyn Expression> = Box::new(DocsExpr {
            url: "https://example.com".into(),
            ..Default::default()
        });
        let docs = node.into_any().downcast::<DocsExpr>().ok();
        assert_eq!(docs.map(|d| d.url), Some("https://example.com".to_string()));
    }
}
