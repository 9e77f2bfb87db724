//! HTTP services: path inheritance, canonical endpoints, schemes and
//! per-service validation.
//!
//! Parent services and canonical endpoints are referenced by name and only
//! resolved against the [`Root`] when needed, so services may be declared in
//! any order.

use std::collections::{BTreeMap, BTreeSet};

use http::Uri;
use serde::Deserialize;

use crate::api::ApiExpr;
use crate::attribute::MappedAttributeExpr;
use crate::docs::{DocsExpr, ServerExpr};
use crate::error::Diagnostics;
use crate::expression::Expression;
use crate::file_server::HttpFileServerExpr;
use crate::http_endpoint::{HttpEndpointExpr, RouteExpr};
use crate::http_error::HttpErrorExpr;
use crate::path;
use crate::root::Root;
use crate::service::{ErrorExpr, MethodExpr, ServiceExpr};

/// Endpoint used as canonical when none is named explicitly.
pub const DEFAULT_CANONICAL_ENDPOINT: &str = "show";

/// How [`HttpServiceExpr::schemes`] reads server URLs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemeMode {
    /// Collect the scheme of every URL that parses.
    #[default]
    Parsed,
    /// Only URLs that fail to parse contribute, using the text before
    /// `://`. Mirrors the historical rule, pending product clarification.
    Unparsable,
}

impl SchemeMode {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "parsed" => Some(Self::Parsed),
            "unparsable" => Some(Self::Unparsable),
            _ => None,
        }
    }
}

/// A service exposed over HTTP.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpServiceExpr {
    /// The transport independent service.
    pub service: ServiceExpr,
    /// Path prefixes common to all endpoints.
    pub paths: Vec<String>,
    /// Path and query parameters common to all endpoints.
    pub params: MappedAttributeExpr,
    /// Request headers common to all endpoints.
    pub headers: MappedAttributeExpr,
    /// Name of the parent service, if any.
    pub parent_name: Option<String>,
    /// Name of the canonical endpoint, [`DEFAULT_CANONICAL_ENDPOINT`] if unset.
    pub canonical_endpoint_name: Option<String>,
    pub endpoints: Vec<HttpEndpointExpr>,
    /// HTTP errors that apply to all endpoints.
    pub http_errors: Vec<HttpErrorExpr>,
    pub file_servers: Vec<HttpFileServerExpr>,
    /// Generator specific key/value pairs, passed through untouched.
    pub meta: BTreeMap<String, Vec<String>>,
}

impl HttpServiceExpr {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            service: ServiceExpr::new(name),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.service.name
    }

    pub fn description(&self) -> &str {
        &self.service.description
    }

    pub fn servers(&self) -> &[ServerExpr] {
        &self.service.servers
    }

    /// URL schemes of the service servers, sorted and deduplicated.
    pub fn schemes(&self, mode: SchemeMode) -> Option<Vec<String>> {
        let mut schemes = BTreeSet::new();
        for server in &self.service.servers {
            match (mode, server.url.parse::<Uri>()) {
                (SchemeMode::Parsed, Ok(uri)) => {
                    if let Some(scheme) = uri.scheme_str() {
                        schemes.insert(scheme.to_string());
                    }
                }
                (SchemeMode::Unparsable, Err(_)) => {
                    if let Some((scheme, _)) = server.url.split_once("://") {
                        if !scheme.is_empty() {
                            schemes.insert(scheme.to_string());
                        }
                    }
                }
                _ => {}
            }
        }
        if schemes.is_empty() {
            None
        } else {
            Some(schemes.into_iter().collect())
        }
    }

    /// The error type called `name`, looked up on the service first and
    /// then among the API-global errors.
    pub fn error<'a>(&'a self, name: &str, root: &'a Root) -> Option<&'a ErrorExpr> {
        self.service.error(name).or_else(|| root.error(name))
    }

    /// The endpoint called `name`.
    pub fn endpoint(&self, name: &str) -> Option<&HttpEndpointExpr> {
        self.endpoints.iter().find(|e| e.name() == name)
    }

    /// The endpoint called `name`, created for `method` if it doesn't exist.
    pub fn endpoint_for(&mut self, name: &str, method: MethodExpr) -> &mut HttpEndpointExpr {
        let idx = match self.endpoints.iter().position(|e| e.name() == name) {
            Some(idx) => idx,
            None => {
                let endpoint = HttpEndpointExpr::new(self.name(), method);
                self.endpoints.push(endpoint);
                self.endpoints.len() - 1
            }
        };
        &mut self.endpoints[idx]
    }

    /// The endpoint used to compute hrefs to the service.
    pub fn canonical_endpoint(&self) -> Option<&HttpEndpointExpr> {
        let name = self
            .canonical_endpoint_name
            .as_deref()
            .unwrap_or(DEFAULT_CANONICAL_ENDPOINT);
        self.endpoint(name)
    }

    /// URI template of the canonical endpoint's first route, or the empty
    /// string if there is none.
    pub fn uri_template(&self, root: &Root) -> String {
        match self.canonical_endpoint().and_then(|ca| ca.routes.first()) {
            Some(route) => self
                .route_full_paths(route, root)
                .into_iter()
                .next()
                .unwrap_or_default(),
            None => String::new(),
        }
    }

    /// The parent service, if `parent_name` is set and resolves.
    pub fn parent<'a>(&self, root: &'a Root) -> Option<&'a HttpServiceExpr> {
        self.parent_name.as_deref().and_then(|n| root.service(n))
    }

    /// Values recorded under the metadata key `key`.
    pub fn meta(&self, key: &str) -> &[String] {
        match self.meta.get(key) {
            Some(values) => values,
            None => &[],
        }
    }

    /// The service HTTP error called `name`.
    pub fn http_error(&self, name: &str) -> Option<&HttpErrorExpr> {
        self.http_errors.iter().find(|e| e.name == name)
    }

    /// Base paths of the service endpoints, composed from the API root
    /// path, the parent canonical route and the service path prefixes.
    ///
    /// One entry per prefix and inherited base path; order is kept and
    /// duplicates are not removed.
    pub fn full_paths(&self, root: &Root) -> Vec<String> {
        let mut chain = Vec::new();
        self.full_paths_in(root, &mut chain)
    }

    /// Full paths of `route`, one of this service's routes.
    pub fn route_full_paths(&self, route: &RouteExpr, root: &Root) -> Vec<String> {
        let mut chain = Vec::new();
        self.route_full_paths_in(route, root, &mut chain)
    }

    fn full_paths_in<'a>(&'a self, root: &'a Root, chain: &mut Vec<&'a str>) -> Vec<String> {
        let root_path = root.http_path();
        if self.paths.is_empty() {
            return vec![path::join(&[root_path])];
        }

        chain.push(self.name());
        let mut paths = Vec::new();
        for prefix in &self.paths {
            if path::is_absolute(prefix) {
                paths.push(path::clean(prefix));
                continue;
            }
            // A parent already on the chain is a cycle; fall back to the root.
            let bases = match self.parent(root) {
                Some(parent) if !chain.contains(&parent.name()) => {
                    parent.canonical_base_paths(root, chain)
                }
                _ => vec![root_path.to_string()],
            };
            for base in &bases {
                paths.push(path::clean(&path::join(&[base, prefix])));
            }
        }
        chain.pop();
        paths
    }

    fn canonical_base_paths<'a>(
        &'a self,
        root: &'a Root,
        chain: &mut Vec<&'a str>,
    ) -> Vec<String> {
        match self.canonical_endpoint().and_then(|ca| ca.routes.first()) {
            Some(route) => self
                .route_full_paths_in(route, root, chain)
                .iter()
                .map(|p| path::join(&[p]))
                .collect(),
            None => Vec::new(),
        }
    }

    fn route_full_paths_in<'a>(
        &'a self,
        route: &RouteExpr,
        root: &'a Root,
        chain: &mut Vec<&'a str>,
    ) -> Vec<String> {
        if route.is_absolute() {
            return vec![path::clean(&route.path[1..])];
        }
        self.full_paths_in(root, chain)
            .iter()
            .map(|base| path::clean(&path::join(&[base, &route.path])))
            .collect()
    }

    /// Derive the response shapes of the service HTTP errors.
    pub fn prepare(&mut self, api: Option<&ApiExpr>) {
        let HttpServiceExpr {
            service,
            http_errors,
            ..
        } = self;
        for herr in http_errors.iter_mut() {
            let error = service
                .error(&herr.name)
                .or_else(|| api.and_then(|a| a.error(&herr.name)));
            herr.prepare(error);
        }
    }

    /// Check the service against the rest of the tree.
    ///
    /// API-global HTTP errors are validated here too, once per service.
    pub fn validate(&self, root: &Root) -> Diagnostics {
        let mut verr = Diagnostics::new();
        let location = self.eval_name();

        for server in &self.service.servers {
            if server.url.is_empty() {
                verr.add(&location, "Server URL cannot be empty");
            }
        }
        verr.merge(self.params.validate("parameters", &location));
        verr.merge(self.headers.validate("headers", &location));

        if let Some(n) = &self.parent_name {
            match root.service(n) {
                None => verr.add(&location, format!("Parent service {} not found", n)),
                Some(parent) => {
                    let routable = parent
                        .canonical_endpoint()
                        .is_some_and(|ca| !ca.routes.is_empty());
                    if !routable {
                        verr.add(
                            &location,
                            format!("Parent service {} has no canonical endpoint", n),
                        );
                    }
                    if parent.parent_name.as_deref() == Some(self.name()) {
                        verr.add(&location, format!("Parent service {} is also child", n));
                    }
                }
            }
        }
        if let Some(n) = &self.canonical_endpoint_name {
            if self.endpoint(n).is_none() {
                verr.add(&location, format!("Unknown canonical endpoint {}", n));
            }
        }

        for error in &self.service.errors {
            verr.merge(error.validate());
        }
        for endpoint in &self.endpoints {
            verr.merge(endpoint.validate());
        }
        for fs in &self.file_servers {
            verr.merge(fs.validate());
        }

        for herr in &self.http_errors {
            verr.merge(herr.validate(self.error(&herr.name, root)));
        }
        for herr in root.http_errors() {
            verr.merge(herr.validate(root.error(&herr.name)));
        }
        verr
    }
}

impl Expression for HttpServiceExpr {
    fn eval_name(&self) -> String {
        if self.name().is_empty() {
            "unnamed service".to_string()
        } else {
            format!("service {:?}", self.name())
        }
    }

    fn docs_mut(&mut self) -> Option<&mut Option<DocsExpr>> {
        Some(&mut self.service.docs)
    }

    fn servers_mut(&mut self) -> Option<&mut Vec<ServerExpr>> {
        Some(&mut self.service.servers)
    }

    fn description_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.service.description)
    }

    fn headers_mut(&mut self) -> Option<&mut MappedAttributeExpr> {
        Some(&mut self.headers)
    }
}
