//! Builder calls describing the API and its documentation.

use rampart_expr::{ApiExpr, ContactExpr, DocsExpr, DslError, LicenseExpr, ServerExpr};

use crate::eval::{Dsl, Eval};

/// Declare the API. Valid at top level only, once per evaluation.
pub fn api(e: &mut Eval, name: &str, body: impl FnOnce(&mut Eval)) {
    if !e.is_top_level() {
        e.incompatible_dsl("API");
        return;
    }
    if name.is_empty() {
        e.report(DslError::InvalidArgument(
            "API first argument cannot be empty".into(),
        ));
        return;
    }
    if let Some(existing) = e.root().api() {
        let msg = format!("API already defined as {:?}", existing.name);
        e.report(DslError::Duplicate(msg));
        return;
    }
    if let Some(api) = e.execute(ApiExpr::new(name), body).into_node() {
        e.root_mut().set_api(api);
    }
}

fn set_api_field(e: &mut Eval, call: &'static str, set: impl FnOnce(&mut ApiExpr)) {
    match e.current_as::<ApiExpr>() {
        Some(api) => set(api),
        None => e.incompatible_dsl(call),
    }
}

/// Set the API title.
pub fn title(e: &mut Eval, title: &str) {
    set_api_field(e, "Title", |api| api.title = title.to_string());
}

/// Set the API version.
pub fn version(e: &mut Eval, version: &str) {
    set_api_field(e, "Version", |api| api.version = version.to_string());
}

/// Set the API terms of service.
pub fn terms_of_service(e: &mut Eval, terms: &str) {
    set_api_field(e, "TermsOfService", |api| {
        api.terms_of_service = terms.to_string()
    });
}

/// Set the description of the current node.
pub fn description(e: &mut Eval, text: &str) {
    e.with_capability(
        "Description",
        |n| n.description_mut(),
        |d| *d = text.to_string(),
    );
}

/// Attach contact information to the API.
///
/// The contact is only attached when its block reported nothing.
pub fn contact(e: &mut Eval, body: impl FnOnce(&mut Eval)) {
    if e.current_as::<ApiExpr>().is_none() {
        e.incompatible_dsl("Contact");
        return;
    }
    if let Some(c) = e.execute(ContactExpr::default(), body).completed() {
        set_api_field(e, "Contact", |api| api.contact = Some(c));
    }
}

/// Attach license information to the API.
pub fn license(e: &mut Eval, body: impl FnOnce(&mut Eval)) {
    if e.current_as::<ApiExpr>().is_none() {
        e.incompatible_dsl("License");
        return;
    }
    if let Some(l) = e.execute(LicenseExpr::default(), body).completed() {
        set_api_field(e, "License", |api| api.license = Some(l));
    }
}

/// Attach external documentation to the current node.
pub fn docs(e: &mut Eval, body: impl FnOnce(&mut Eval)) {
    if !e.accepts(|n| n.docs_mut()) {
        e.incompatible_dsl("Docs");
        return;
    }
    if let Some(d) = e.execute(DocsExpr::default(), body).completed() {
        e.with_capability("Docs", |n| n.docs_mut(), |slot| *slot = Some(d));
    }
}

/// Append a server to the current API or service.
pub fn server(e: &mut Eval, url: &str) {
    server_with(e, url, |_| {});
}

/// Append a server, running `body` to describe it.
pub fn server_with(e: &mut Eval, url: &str, body: impl FnOnce(&mut Eval)) {
    if !e.accepts(|n| n.servers_mut()) {
        e.incompatible_dsl("Server");
        return;
    }
    if url.is_empty() {
        e.report(DslError::InvalidArgument("Server URL cannot be empty".into()));
        return;
    }
    if let Some(s) = e.execute(ServerExpr::new(url), body).into_node() {
        e.with_capability("Server", |n| n.servers_mut(), |servers| servers.push(s));
    }
}

/// Append a server described by at most one block.
pub fn server_with_bodies(e: &mut Eval, url: &str, mut bodies: Vec<Dsl<'_>>) {
    if bodies.len() > 1 {
        e.report(DslError::TooManyArguments("Server"));
        return;
    }
    match bodies.pop() {
        Some(body) => server_with(e, url, body),
        None => server(e, url),
    }
}

/// Set the name of the current contact or license.
pub fn name(e: &mut Eval, name: &str) {
    e.with_capability("Name", |n| n.name_mut(), |f| *f = name.to_string());
}

/// Set the email of the current contact. Ignored in any other context.
pub fn email(e: &mut Eval, email: &str) {
    if let Some(c) = e.current_as::<ContactExpr>() {
        c.email = email.to_string();
    }
}

/// Set the URL of the current contact, license or docs.
pub fn url(e: &mut Eval, url: &str) {
    e.with_capability("URL", |n| n.url_mut(), |f| *f = url.to_string());
}
