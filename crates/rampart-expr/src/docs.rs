//! Small leaf nodes: documentation links, contact, license and servers.

use crate::expression::Expression;

/// External documentation attached to an API, service, method, attribute or
/// file server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocsExpr {
    pub description: String,
    pub url: String,
}

impl Expression for DocsExpr {
    fn eval_name(&self) -> String {
        "documentation".to_string()
    }

    fn description_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.description)
    }

    fn url_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.url)
    }
}

/// API contact information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactExpr {
    pub name: String,
    pub email: String,
    pub url: String,
}

impl Expression for ContactExpr {
    fn eval_name(&self) -> String {
        "contact".to_string()
    }

    fn name_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.name)
    }

    fn url_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.url)
    }
}

/// API license information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseExpr {
    pub name: String,
    pub url: String,
}

impl Expression for LicenseExpr {
    fn eval_name(&self) -> String {
        "license".to_string()
    }

    fn name_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.name)
    }

    fn url_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.url)
    }
}

/// An API host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerExpr {
    pub url: String,
    pub description: String,
}

impl ServerExpr {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: String::new(),
        }
    }
}

impl Expression for ServerExpr {
    fn eval_name(&self) -> String {
        format!("server {:?}", self.url)
    }

    fn description_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.description)
    }
}
