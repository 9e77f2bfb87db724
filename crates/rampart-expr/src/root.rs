use std::collections::HashMap;

use crate::api::ApiExpr;
use crate::http_error::HttpErrorExpr;
use crate::http_service::HttpServiceExpr;
use crate::service::ErrorExpr;

/// The design tree built by one evaluation: the API and the declared
/// services.
///
/// Services keep their declaration order and are indexed by name; relations
/// between services go through that index rather than references.
#[derive(Debug, Clone, Default)]
pub struct Root {
    api: Option<ApiExpr>,
    services: Vec<HttpServiceExpr>,
    index: HashMap<String, usize>,
}

impl Root {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api(&self) -> Option<&ApiExpr> {
        self.api.as_ref()
    }

    pub fn api_mut(&mut self) -> Option<&mut ApiExpr> {
        self.api.as_mut()
    }

    pub fn set_api(&mut self, api: ApiExpr) {
        self.api = Some(api);
    }

    /// Add a service. Gives the service back if the name is taken.
    pub fn add_service(&mut self, service: HttpServiceExpr) -> Result<(), HttpServiceExpr> {
        if self.index.contains_key(service.name()) {
            return Err(service);
        }
        self.index
            .insert(service.name().to_string(), self.services.len());
        self.services.push(service);
        Ok(())
    }

    pub fn service(&self, name: &str) -> Option<&HttpServiceExpr> {
        self.index.get(name).and_then(|&i| self.services.get(i))
    }

    pub fn service_mut(&mut self, name: &str) -> Option<&mut HttpServiceExpr> {
        match self.index.get(name) {
            Some(&i) => self.services.get_mut(i),
            None => None,
        }
    }

    /// Services in declaration order.
    pub fn services(&self) -> &[HttpServiceExpr] {
        &self.services
    }

    /// The API-global error type called `name`.
    pub fn error(&self, name: &str) -> Option<&ErrorExpr> {
        self.api.as_ref().and_then(|api| api.error(name))
    }

    /// API root path, empty when no API is defined.
    pub fn http_path(&self) -> &str {
        self.api.as_ref().map_or("", |api| api.http.path.as_str())
    }

    /// HTTP mappings of the API-global errors.
    pub fn http_errors(&self) -> &[HttpErrorExpr] {
        match &self.api {
            Some(api) => &api.http.errors,
            None => &[],
        }
    }

    /// Derive per-error response shapes across the tree.
    pub fn prepare(&mut self) {
        if let Some(api) = self.api.as_mut() {
            api.prepare();
        }
        let Root { api, services, .. } = self;
        for service in services.iter_mut() {
            service.prepare(api.as_ref());
        }
    }
}
