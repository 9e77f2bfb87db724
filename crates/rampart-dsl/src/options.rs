//! Evaluation options.
//!
//! Options can be built in code or read from a YAML file:
//!
//! ```yaml
//! max-depth: 16
//! scheme-mode: unparsable
//! validate-after-errors: false
//! ```

use std::path::Path;

use rampart_expr::SchemeMode;
use serde::Deserialize;
use thiserror::Error;

/// Default maximum nesting of DSL blocks.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Errors raised while reading options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse options: {0}")]
    Parse(String),

    #[error("invalid options: {0}")]
    Invalid(String),
}

/// Options for one evaluation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EvalOptions {
    /// Maximum nesting of DSL blocks before the run aborts.
    pub max_depth: usize,
    /// Reading of server URLs used when collecting schemes.
    pub scheme_mode: SchemeMode,
    /// Run the validate stage even when building reported errors.
    pub validate_after_errors: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            scheme_mode: SchemeMode::default(),
            validate_after_errors: true,
        }
    }
}

impl EvalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_scheme_mode(mut self, mode: SchemeMode) -> Self {
        self.scheme_mode = mode;
        self
    }

    pub fn with_validate_after_errors(mut self, enabled: bool) -> Self {
        self.validate_after_errors = enabled;
        self
    }

    /// Load options from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse options from YAML content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let options: Self =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        options.check()?;
        Ok(options)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max-depth must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults() {
        let options = EvalOptions::default();
        assert_eq!(options.max_depth, 32);
        assert_eq!(options.scheme_mode, SchemeMode::Parsed);
        assert!(options.validate_after_errors);
    }

    #[test]
    fn builder_overrides() {
        let options = EvalOptions::new()
            .with_max_depth(4)
            .with_scheme_mode(SchemeMode::Unparsable)
            .with_validate_after_errors(false);
        assert_eq!(options.max_depth, 4);
        assert_eq!(options.scheme_mode, SchemeMode::Unparsable);
        assert!(!options.validate_after_errors);
    }

    #[test]
    fn parse_partial_yaml_keeps_defaults() {
        let options = EvalOptions::parse("scheme-mode: unparsable\n").unwrap();
        assert_eq!(options.scheme_mode, SchemeMode::Unparsable);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert!(options.validate_after_errors);
    }

    #[test]
    fn parse_rejects_unknown_keys() {
        let err = EvalOptions::parse("max-dept: 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn parse_rejects_zero_depth() {
        let err = EvalOptions::parse("max-depth: 0\n").unwrap_err();
        assert_eq!(err.to_string(), "invalid options: max-depth must be at least 1");
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max-depth: 8").unwrap();
        writeln!(file, "validate-after-errors: false").unwrap();

        let options = EvalOptions::load(file.path()).unwrap();
        assert_eq!(options.max_depth, 8);
        assert!(!options.validate_after_errors);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EvalOptions::load(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
