//! Transport independent parts of a service: the service itself, its
//! methods and the error types it declares.

use crate::attribute::{validate_fields, AttributeExpr, DataType};
use crate::docs::{DocsExpr, ServerExpr};
use crate::error::Diagnostics;
use crate::expression::Expression;

/// A named group of methods.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceExpr {
    pub name: String,
    pub description: String,
    pub docs: Option<DocsExpr>,
    /// Hosts serving this service, in declaration order.
    pub servers: Vec<ServerExpr>,
    /// Error types declared on the service.
    pub errors: Vec<ErrorExpr>,
}

impl ServiceExpr {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The service-local error type called `name`.
    pub fn error(&self, name: &str) -> Option<&ErrorExpr> {
        self.errors.iter().find(|e| e.name == name)
    }
}

/// A single operation of a service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodExpr {
    pub name: String,
    pub description: String,
    pub docs: Option<DocsExpr>,
    /// Payload fields.
    pub payload: Vec<AttributeExpr>,
}

impl MethodExpr {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// An error type, declared on a service or globally on the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorExpr {
    pub name: String,
    pub description: String,
    /// The error shape.
    pub attribute: AttributeExpr,
}

impl ErrorExpr {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            attribute: AttributeExpr::object(name.clone(), Vec::new()),
            description: String::new(),
            name,
        }
    }

    pub fn validate(&self) -> Diagnostics {
        validate_fields(self.attribute.fields(), &self.eval_name())
    }
}

impl Expression for ErrorExpr {
    fn eval_name(&self) -> String {
        format!("error {:?}", self.name)
    }

    fn description_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.description)
    }

    fn accepts_attributes(&self) -> bool {
        matches!(self.attribute.data_type, DataType::Object(_))
    }

    fn attributes_mut(&mut self) -> Option<&mut Vec<AttributeExpr>> {
        match &mut self.attribute.data_type {
            DataType::Object(fields) => Some(fields),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_lookup() {
        let mut svc = ServiceExpr::new("users");
        svc.errors.push(ErrorExpr::new("not_found"));
        assert!(svc.error("not_found").is_some());
        assert!(svc.error("bad_request").is_none());
    }

    #[test]
    fn error_shape_collects_attributes() {
        let mut err = ErrorExpr::new("invalid");
        if let Some(fields) = err.attributes_mut() {
            fields.push(AttributeExpr::new("field", DataType::String));
            fields.push(AttributeExpr::new("field", DataType::String));
        }
        let verr = err.validate();
        assert_eq!(verr.len(), 1);
        assert_eq!(
            verr.to_string(),
            "error \"invalid\": attribute field is defined twice"
        );
    }
}
