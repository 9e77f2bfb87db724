//! HTTP endpoints and their routes.

use std::fmt;

use crate::attribute::AttributeExpr;
use crate::docs::DocsExpr;
use crate::error::Diagnostics;
use crate::expression::Expression;
use crate::path;
use crate::service::MethodExpr;

/// HTTP request methods a route may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A method + path template pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteExpr {
    pub method: HttpMethod,
    pub path: String,
}

impl RouteExpr {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// Whether the route ignores the service base paths.
    pub fn is_absolute(&self) -> bool {
        path::is_absolute(&self.path)
    }
}

impl fmt::Display for RouteExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// One routable operation of an HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpEndpointExpr {
    /// The method this endpoint exposes.
    pub method: MethodExpr,
    /// Name of the owning service.
    pub service: String,
    pub routes: Vec<RouteExpr>,
}

impl HttpEndpointExpr {
    pub fn new(service: impl Into<String>, method: MethodExpr) -> Self {
        Self {
            method,
            service: service.into(),
            routes: Vec::new(),
        }
    }

    /// Endpoint name, the name of its method.
    pub fn name(&self) -> &str {
        &self.method.name
    }

    pub fn validate(&self) -> Diagnostics {
        let mut verr = Diagnostics::new();
        let location = self.eval_name();
        if self.routes.is_empty() {
            verr.add(&location, format!("No route defined for method {}", self.name()));
        }
        for route in &self.routes {
            if let Err(e) = path::validate_template(&route.path) {
                verr.add(&location, format!("invalid route {}: {}", route, e));
            }
        }
        verr
    }
}

impl Expression for HttpEndpointExpr {
    fn eval_name(&self) -> String {
        format!("method {:?} of service {:?}", self.method.name, self.service)
    }

    fn docs_mut(&mut self) -> Option<&mut Option<DocsExpr>> {
        Some(&mut self.method.docs)
    }

    fn description_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.method.description)
    }

    fn accepts_attributes(&self) -> bool {
        true
    }

    fn attributes_mut(&mut self) -> Option<&mut Vec<AttributeExpr>> {
        Some(&mut self.method.payload)
    }
}
