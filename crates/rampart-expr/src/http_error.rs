//! HTTP mappings of error types.

use crate::attribute::{AttributeExpr, DataType, MappedAttributeExpr};
use crate::error::Diagnostics;
use crate::expression::Expression;
use crate::service::ErrorExpr;

/// Response written when an error is returned over HTTP.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponseExpr {
    /// Status code, required by validation.
    pub status_code: Option<u16>,
    pub description: String,
    /// Response body. Derived from the error type by prepare when unset.
    pub body: Option<AttributeExpr>,
    pub headers: MappedAttributeExpr,
}

/// Named error with an HTTP response shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpErrorExpr {
    /// Name of the error type this maps.
    pub name: String,
    pub response: HttpResponseExpr,
}

impl HttpErrorExpr {
    pub fn new(name: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            name: name.into(),
            response: HttpResponseExpr {
                status_code,
                ..Default::default()
            },
        }
    }

    /// Derive the response shape from the error type it maps.
    pub fn prepare(&mut self, error: Option<&ErrorExpr>) {
        let Some(error) = error else {
            return;
        };
        if self.response.body.is_none() {
            self.response.body = Some(error.attribute.clone());
        }
        if self.response.description.is_empty() {
            self.response.description = error.description.clone();
        }
    }

    /// Check the mapping. `error` is the resolved error type, if any.
    pub fn validate(&self, error: Option<&ErrorExpr>) -> Diagnostics {
        let mut verr = Diagnostics::new();
        let location = self.eval_name();
        match self.response.status_code {
            None => verr.add(
                &location,
                format!("HTTP response status code is missing for error {}", self.name),
            ),
            Some(code) if !(100..=599).contains(&code) => verr.add(
                &location,
                format!("invalid HTTP status code {} for error {}", code, self.name),
            ),
            Some(_) => {}
        }
        if error.is_none() {
            verr.add(&location, format!("Error {} not found", self.name));
        }
        if let Some(body) = &self.response.body {
            verr.merge(body.validate(&location));
        }
        verr.merge(self.response.headers.validate("headers", &location));
        verr
    }
}

impl Expression for HttpErrorExpr {
    fn eval_name(&self) -> String {
        format!("HTTP error {:?}", self.name)
    }

    fn description_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.response.description)
    }

    fn accepts_attributes(&self) -> bool {
        match &self.response.body {
            Some(body) => matches!(body.data_type, DataType::Object(_)),
            None => true,
        }
    }

    /// Creates an empty object body if the response has none yet.
    fn attributes_mut(&mut self) -> Option<&mut Vec<AttributeExpr>> {
        let name = self.name.clone();
        let body = self
            .response
            .body
            .get_or_insert_with(|| AttributeExpr::object(name, Vec::new()));
        match &mut body.data_type {
            DataType::Object(fields) => Some(fields),
            _ => None,
        }
    }

    fn headers_mut(&mut self) -> Option<&mut MappedAttributeExpr> {
        Some(&mut self.response.headers)
    }
}
