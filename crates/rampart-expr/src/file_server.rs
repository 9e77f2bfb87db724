use crate::docs::DocsExpr;
use crate::error::Diagnostics;
use crate::expression::Expression;

/// Endpoint serving static files from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFileServerExpr {
    /// Name of the owning service.
    pub service: String,
    /// File or directory on disk.
    pub file_path: String,
    /// Request paths served by the file server.
    pub request_paths: Vec<String>,
    pub description: String,
    pub docs: Option<DocsExpr>,
}

impl HttpFileServerExpr {
    pub fn new(service: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            file_path: file_path.into(),
            request_paths: Vec::new(),
            description: String::new(),
            docs: None,
        }
    }

    /// Whether the file server serves a whole directory.
    pub fn is_dir(&self) -> bool {
        self.request_paths
            .iter()
            .any(|p| p.ends_with("/*") || p.contains("{*"))
    }

    pub fn validate(&self) -> Diagnostics {
        let mut verr = Diagnostics::new();
        if self.file_path.is_empty() {
            verr.add(self.eval_name(), "file path cannot be empty");
        }
        if self.request_paths.iter().all(|p| p.is_empty()) {
            verr.add(
                self.eval_name(),
                format!("No request path defined for file server {}", self.file_path),
            );
        }
        verr
    }
}

impl Expression for HttpFileServerExpr {
    fn eval_name(&self) -> String {
        format!("file server {:?} of service {:?}", self.file_path, self.service)
    }

    fn docs_mut(&mut self) -> Option<&mut Option<DocsExpr>> {
        Some(&mut self.docs)
    }

    fn description_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_server_needs_a_request_path() {
        let fs = HttpFileServerExpr::new("assets", "public/index.html");
        assert_eq!(fs.validate().len(), 1);

        let mut fs = fs;
        fs.request_paths.push("/index.html".into());
        assert!(fs.validate().is_empty());
        assert!(!fs.is_dir());
    }

    #[test]
    fn wildcard_paths_serve_directories() {
        let mut fs = HttpFileServerExpr::new("assets", "public");
        fs.request_paths.push("/static/{*path}".into());
        assert!(fs.is_dir());
    }
}
