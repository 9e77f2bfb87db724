//! Builder calls describing services and their HTTP mapping.

use rampart_expr::{
    ApiExpr, AttributeExpr, DataType, DslError, ErrorExpr, Expression, HttpEndpointExpr,
    HttpErrorExpr, HttpFileServerExpr, HttpMethod, HttpServiceExpr, MethodExpr, RouteExpr,
};

use crate::eval::Eval;

/// Declare a service. Valid at top level only.
pub fn service(e: &mut Eval, name: &str, body: impl FnOnce(&mut Eval)) {
    if !e.is_top_level() {
        e.incompatible_dsl("Service");
        return;
    }
    if name.is_empty() {
        e.report(DslError::InvalidArgument(
            "Service first argument cannot be empty".into(),
        ));
        return;
    }
    if e.root().service(name).is_some() {
        e.report(DslError::Duplicate(format!(
            "service {:?} is defined twice",
            name
        )));
        return;
    }
    let Some(svc) = e.execute(HttpServiceExpr::new(name), body).into_node() else {
        return;
    };
    if let Err(svc) = e.root_mut().add_service(svc) {
        let msg = format!("service {:?} is defined twice", svc.name());
        e.report(DslError::Duplicate(msg));
    }
}

/// Declare a method of the current service and its HTTP endpoint.
pub fn method(e: &mut Eval, name: &str, body: impl FnOnce(&mut Eval)) {
    let (service_name, duplicate) = match e.current_as::<HttpServiceExpr>() {
        Some(svc) => (svc.name().to_string(), svc.endpoint(name).is_some()),
        None => {
            e.incompatible_dsl("Method");
            return;
        }
    };
    if name.is_empty() {
        e.report(DslError::InvalidArgument(
            "Method first argument cannot be empty".into(),
        ));
        return;
    }
    if duplicate {
        let msg = format!("method {:?} is defined twice", name);
        e.report(DslError::Duplicate(msg));
        return;
    }

    let endpoint = HttpEndpointExpr::new(service_name, MethodExpr::new(name));
    let Some(HttpEndpointExpr { method, routes, .. }) = e.execute(endpoint, body).into_node()
    else {
        return;
    };
    if let Some(svc) = e.current_as::<HttpServiceExpr>() {
        svc.endpoint_for(name, method).routes.extend(routes);
    }
}

fn route(e: &mut Eval, call: &'static str, method: HttpMethod, path: &str) {
    match e.current_as::<HttpEndpointExpr>() {
        Some(endpoint) => endpoint.routes.push(RouteExpr::new(method, path)),
        None => e.incompatible_dsl(call),
    }
}

/// Add a GET route on `path` to the current method.
pub fn get(e: &mut Eval, path: &str) {
    route(e, "GET", HttpMethod::Get, path);
}

/// Add a POST route on `path` to the current method.
pub fn post(e: &mut Eval, path: &str) {
    route(e, "POST", HttpMethod::Post, path);
}

/// Add a PUT route on `path` to the current method.
pub fn put(e: &mut Eval, path: &str) {
    route(e, "PUT", HttpMethod::Put, path);
}

/// Add a PATCH route on `path` to the current method.
pub fn patch(e: &mut Eval, path: &str) {
    route(e, "PATCH", HttpMethod::Patch, path);
}

/// Add a DELETE route on `path` to the current method.
pub fn delete(e: &mut Eval, path: &str) {
    route(e, "DELETE", HttpMethod::Delete, path);
}

/// Add a HEAD route on `path` to the current method.
pub fn head(e: &mut Eval, path: &str) {
    route(e, "HEAD", HttpMethod::Head, path);
}

/// Add a OPTIONS route on `path` to the current method.
pub fn options(e: &mut Eval, path: &str) {
    route(e, "OPTIONS", HttpMethod::Options, path);
}

/// Add a TRACE route on `path` to the current method.
pub fn trace(e: &mut Eval, path: &str) {
    route(e, "TRACE", HttpMethod::Trace, path);
}

/// Set the API root path, or append a path prefix to the current service.
pub fn path(e: &mut Eval, prefix: &str) {
    if let Some(api) = e.current_as::<ApiExpr>() {
        api.http.path = prefix.to_string();
        return;
    }
    if let Some(svc) = e.current_as::<HttpServiceExpr>() {
        svc.paths.push(prefix.to_string());
        return;
    }
    e.incompatible_dsl("Path");
}

fn set_service_field(e: &mut Eval, call: &'static str, set: impl FnOnce(&mut HttpServiceExpr)) {
    match e.current_as::<HttpServiceExpr>() {
        Some(svc) => set(svc),
        None => e.incompatible_dsl(call),
    }
}

/// Name the parent of the current service.
pub fn parent(e: &mut Eval, name: &str) {
    set_service_field(e, "Parent", |svc| svc.parent_name = Some(name.to_string()));
}

/// Name the canonical endpoint of the current service.
pub fn canonical_method(e: &mut Eval, name: &str) {
    set_service_field(e, "CanonicalMethod", |svc| {
        svc.canonical_endpoint_name = Some(name.to_string())
    });
}

/// Add a parameter common to all endpoints of the current service.
///
/// `name` may map to a different element name with `name:element`.
pub fn param(e: &mut Eval, name: &str, data_type: DataType) {
    set_service_field(e, "Param", |svc| svc.params.add(name, data_type));
}

/// Record a generator specific value under `key` on the current service.
pub fn meta(e: &mut Eval, key: &str, value: &str) {
    set_service_field(e, "Meta", |svc| {
        svc.meta
            .entry(key.to_string())
            .or_default()
            .push(value.to_string())
    });
}

/// Add a header to the current service or HTTP error response.
pub fn header(e: &mut Eval, name: &str, data_type: DataType) {
    e.with_capability("Header", |n| n.headers_mut(), |h| h.add(name, data_type));
}

fn errors_mut<'n>(node: &'n mut (dyn Expression + 'static)) -> Option<&'n mut Vec<ErrorExpr>> {
    if node.downcast_ref::<ApiExpr>().is_some() {
        return node.downcast_mut::<ApiExpr>().map(|api| &mut api.errors);
    }
    node.downcast_mut::<HttpServiceExpr>()
        .map(|svc| &mut svc.service.errors)
}

fn http_errors_mut<'n>(
    node: &'n mut (dyn Expression + 'static),
) -> Option<&'n mut Vec<HttpErrorExpr>> {
    if node.downcast_ref::<ApiExpr>().is_some() {
        return node.downcast_mut::<ApiExpr>().map(|api| &mut api.http.errors);
    }
    node.downcast_mut::<HttpServiceExpr>()
        .map(|svc| &mut svc.http_errors)
}

/// Declare an error type on the API or the current service.
pub fn error(e: &mut Eval, name: &str, body: impl FnOnce(&mut Eval)) {
    let duplicate = match e.current().and_then(errors_mut) {
        Some(errors) => errors.iter().any(|err| err.name == name),
        None => {
            e.incompatible_dsl("Error");
            return;
        }
    };
    if name.is_empty() {
        e.report(DslError::InvalidArgument(
            "Error first argument cannot be empty".into(),
        ));
        return;
    }
    if duplicate {
        e.report(DslError::Duplicate(format!("error {:?} is defined twice", name)));
        return;
    }
    if let Some(err) = e.execute(ErrorExpr::new(name), body).into_node() {
        e.with_capability("Error", errors_mut, |errors| errors.push(err));
    }
}

/// Add an attribute to the current error, method payload, response body or
/// object attribute.
pub fn attribute(e: &mut Eval, name: &str, data_type: DataType, body: impl FnOnce(&mut Eval)) {
    if !e.current_ref().is_some_and(|n| n.accepts_attributes()) {
        e.incompatible_dsl("Attribute");
        return;
    }
    if name.is_empty() {
        e.report(DslError::InvalidArgument(
            "Attribute first argument cannot be empty".into(),
        ));
        return;
    }
    if let Some(attr) = e.execute(AttributeExpr::new(name, data_type), body).into_node() {
        e.with_capability("Attribute", |n| n.attributes_mut(), |attrs| attrs.push(attr));
    }
}

/// Map the error type `name` to an HTTP response on the API or the current
/// service.
pub fn response(e: &mut Eval, name: &str, body: impl FnOnce(&mut Eval)) {
    let duplicate = match e.current().and_then(http_errors_mut) {
        Some(errors) => errors.iter().any(|herr| herr.name == name),
        None => {
            e.incompatible_dsl("Response");
            return;
        }
    };
    if name.is_empty() {
        e.report(DslError::InvalidArgument(
            "Response first argument cannot be empty".into(),
        ));
        return;
    }
    if duplicate {
        let msg = format!("HTTP error {:?} is defined twice", name);
        e.report(DslError::Duplicate(msg));
        return;
    }
    if let Some(herr) = e.execute(HttpErrorExpr::new(name, None), body).into_node() {
        e.with_capability("Response", http_errors_mut, |errors| errors.push(herr));
    }
}

/// Set the status code of the current HTTP error response.
pub fn code(e: &mut Eval, status: u16) {
    match e.current_as::<HttpErrorExpr>() {
        Some(herr) => herr.response.status_code = Some(status),
        None => e.incompatible_dsl("Code"),
    }
}

/// Serve the file or directory at `file_path` under `request_path`.
pub fn files(e: &mut Eval, request_path: &str, file_path: &str, body: impl FnOnce(&mut Eval)) {
    let service_name = match e.current_as::<HttpServiceExpr>() {
        Some(svc) => svc.name().to_string(),
        None => {
            e.incompatible_dsl("Files");
            return;
        }
    };
    let mut fs = HttpFileServerExpr::new(service_name, file_path);
    if !request_path.is_empty() {
        fs.request_paths.push(request_path.to_string());
    }
    if let Some(fs) = e.execute(fs, body).into_node() {
        set_service_field(e, "Files", |svc| svc.file_servers.push(fs));
    }
}
