//! Template-aware HTTP path cleaning and joining.
//!
//! Segments are split on `/` only outside of `{...}` so that templated
//! variables such as `{id}` or `{path:a/b}` survive normalisation untouched.

use std::collections::HashSet;

/// Prefix that makes a path fragment bypass any inherited base path.
pub const ABSOLUTE_PREFIX: &str = "//";

/// Whether `path` opts out of path inheritance.
pub fn is_absolute(path: &str) -> bool {
    path.starts_with(ABSOLUTE_PREFIX)
}

/// Clean an HTTP request path.
///
/// The result always starts with `/`, has no empty, `.` or `..` segments and
/// keeps a trailing slash if the input had one. The empty path cleans to `/`.
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    let segments = resolve_segments(path, true);
    let mut cleaned = format!("/{}", segments.join("/"));
    if path.ends_with('/') && cleaned.len() > 1 {
        cleaned.push('/');
    }
    cleaned
}

/// Lexically clean a slash separated path.
///
/// Unlike [`clean`], relative paths stay relative, a trailing slash is
/// dropped and the empty path cleans to `.`.
pub fn clean_lexical(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let rooted = path.starts_with('/');
    let body = resolve_segments(path, rooted).join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{}", body),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

/// Join path elements with `/` and clean the result lexically.
///
/// Empty elements are ignored; joining only empty elements yields `""`.
pub fn join(parts: &[&str]) -> String {
    let parts: Vec<&str> = parts.iter().copied().filter(|p| !p.is_empty()).collect();
    if parts.is_empty() {
        return String::new();
    }
    clean_lexical(&parts.join("/"))
}

/// Split on `/` outside of braces.
fn split_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in path.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => {
                segments.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&path[start..]);
    segments
}

fn resolve_segments(path: &str, rooted: bool) -> Vec<&str> {
    let mut stack: Vec<&str> = Vec::new();
    for segment in split_segments(path) {
        match segment {
            "" | "." => {}
            ".." => {
                if stack.last().is_some_and(|s| *s != "..") {
                    stack.pop();
                } else if !rooted {
                    stack.push("..");
                }
            }
            s => stack.push(s),
        }
    }
    stack
}

/// Names of the `{param}` variables of a path template, in order.
pub fn template_params(path: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut in_param = false;
    for ch in path.chars() {
        match ch {
            '{' => {
                in_param = true;
                current.clear();
            }
            '}' if in_param => {
                in_param = false;
                params.push(current.trim_start_matches('*').to_string());
            }
            _ if in_param => current.push(ch),
            _ => {}
        }
    }
    params
}

/// Check a route path template.
///
/// Enforces balanced, non-nested braces, non-empty parameter names made of
/// alphanumerics and underscores (a leading `*` marks a wildcard) and no
/// duplicate parameter names.
pub fn validate_template(path: &str) -> Result<(), String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut current = String::new();
    let mut in_param = false;

    for ch in path.chars() {
        match ch {
            '{' => {
                if in_param {
                    return Err(format!("nested braces not allowed in {:?}", path));
                }
                in_param = true;
            }
            '}' => {
                if !in_param {
                    return Err(format!("unmatched closing brace in {:?}", path));
                }
                in_param = false;

                let name = current.strip_prefix('*').unwrap_or(&current);
                if name.is_empty() {
                    return Err(format!("empty parameter name in {:?}", path));
                }
                if !seen.insert(name.to_string()) {
                    return Err(format!("duplicate parameter '{}' in {:?}", name, path));
                }
                current.clear();
            }
            _ if in_param => {
                let wildcard = ch == '*' && current.is_empty();
                if !wildcard && !ch.is_alphanumeric() && ch != '_' {
                    return Err(format!(
                        "invalid character '{}' in parameter name in {:?}",
                        ch, path
                    ));
                }
                current.push(ch);
            }
            _ => {}
        }
    }

    if in_param {
        return Err(format!("unclosed brace in {:?}", path));
    }
    Ok(())
}
