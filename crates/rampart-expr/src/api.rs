use crate::docs::{ContactExpr, DocsExpr, LicenseExpr, ServerExpr};
use crate::error::Diagnostics;
use crate::expression::Expression;
use crate::http_error::HttpErrorExpr;
use crate::service::ErrorExpr;

/// The API being designed. There is at most one per evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiExpr {
    pub name: String,
    pub title: String,
    pub description: String,
    pub version: String,
    pub terms_of_service: String,
    pub contact: Option<ContactExpr>,
    pub license: Option<LicenseExpr>,
    pub docs: Option<DocsExpr>,
    /// API hosts, in declaration order.
    pub servers: Vec<ServerExpr>,
    /// Error types available to every service.
    pub errors: Vec<ErrorExpr>,
    pub http: ApiHttpExpr,
}

/// HTTP settings shared by every service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiHttpExpr {
    /// Root path prepended to every service path.
    pub path: String,
    /// HTTP mappings of API-global errors.
    pub errors: Vec<HttpErrorExpr>,
}

impl ApiExpr {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The API-global error type called `name`.
    pub fn error(&self, name: &str) -> Option<&ErrorExpr> {
        self.errors.iter().find(|e| e.name == name)
    }

    /// Check the API name, its servers and its error types.
    pub fn validate(&self) -> Diagnostics {
        let mut verr = Diagnostics::new();
        if self.name.is_empty() {
            verr.add(self.eval_name(), "API name cannot be empty");
        }
        for server in &self.servers {
            if server.url.is_empty() {
                verr.add(self.eval_name(), "Server URL cannot be empty");
            }
        }
        for error in &self.errors {
            verr.merge(error.validate());
        }
        verr
    }

    /// Derive the response shapes of the API-global HTTP errors.
    pub fn prepare(&mut self) {
        let ApiExpr { errors, http, .. } = self;
        for herr in &mut http.errors {
            herr.prepare(errors.iter().find(|e| e.name == herr.name));
        }
    }
}

impl Expression for ApiExpr {
    fn eval_name(&self) -> String {
        format!("API {:?}", self.name)
    }

    fn docs_mut(&mut self) -> Option<&mut Option<DocsExpr>> {
        Some(&mut self.docs)
    }

    fn servers_mut(&mut self) -> Option<&mut Vec<ServerExpr>> {
        Some(&mut self.servers)
    }

    fn description_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_flags_empty_name_and_server_url() {
        let mut api = ApiExpr::new("");
        api.servers.push(ServerExpr::new("https://a"));
        api.servers.push(ServerExpr::new(""));

        let verr = api.validate();
        let messages: Vec<String> = verr.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "API \"\": API name cannot be empty",
                "API \"\": Server URL cannot be empty"
            ]
        );
    }

    #[test]
    fn prepare_uses_global_error_types() {
        let mut api = ApiExpr::new("store");
        let mut err = ErrorExpr::new("unauthorized");
        err.description = "missing credentials".into();
        api.errors.push(err);
        api.http.errors.push(HttpErrorExpr::new("unauthorized", Some(401)));

        api.prepare();
        assert_eq!(api.http.errors[0].response.description, "missing credentials");
        assert!(api.http.errors[0].response.body.is_some());
    }
}
