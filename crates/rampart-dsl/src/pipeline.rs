//! The evaluation pipeline: build, prepare, validate.
//!
//! Each stage consumes the previous one, so a tree can only be validated
//! once it has been built and prepared.
//!
//! ```ignore
//! use rampart_dsl::{dsl::*, Design, EvalOptions};
//!
//! let root = Design::new(EvalOptions::default())
//!     .declare(|e| api(e, "store", |e| title(e, "Store")))
//!     .declare(|e| service(e, "users", |e| path(e, "/users")))
//!     .build()?
//!     .prepare()
//!     .validate()
//!     .into_result()?;
//! ```

use rampart_expr::{Diagnostic, Diagnostics, Root};
use rampart_telemetry::{log_evaluation_started, log_stage_completed, log_validation_failure};

use crate::eval::{Dsl, Eval};
use crate::options::EvalOptions;

/// A design waiting to be evaluated: the top-level declarations in order.
pub struct Design<'a> {
    options: EvalOptions,
    bodies: Vec<Dsl<'a>>,
}

impl<'a> Design<'a> {
    pub fn new(options: EvalOptions) -> Self {
        Self {
            options,
            bodies: Vec::new(),
        }
    }

    /// Add a top-level declaration.
    pub fn declare(mut self, body: impl FnOnce(&mut Eval) + 'a) -> Self {
        self.bodies.push(Box::new(body));
        self
    }

    /// Run every declaration against a fresh tree.
    ///
    /// A failing declaration does not stop the ones after it. Fails only when
    /// the run was aborted, with every diagnostic collected up to that point.
    pub fn build(self) -> Result<Built, Diagnostics> {
        log_evaluation_started!(declarations = self.bodies.len());

        let mut e = Eval::new(self.options);
        for body in self.bodies {
            if e.is_aborted() {
                break;
            }
            body(&mut e);
        }
        let options = e.options().clone();
        let (root, diagnostics) = e.into_parts();
        if diagnostics.fatal().is_some() {
            return Err(diagnostics);
        }

        log_stage_completed!(
            stage = "build",
            services = root.services().len(),
            diagnostics = diagnostics.len()
        );
        Ok(Built {
            root,
            diagnostics,
            options,
        })
    }
}

/// A fully built tree and the structural diagnostics found building it.
#[derive(Debug)]
pub struct Built {
    root: Root,
    diagnostics: Diagnostics,
    options: EvalOptions,
}

impl Built {
    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Derive the response shapes of every HTTP error.
    pub fn prepare(mut self) -> Prepared {
        self.root.prepare();
        log_stage_completed!(stage = "prepare");
        Prepared {
            root: self.root,
            diagnostics: self.diagnostics,
            options: self.options,
        }
    }
}

/// A prepared tree, ready for validation.
#[derive(Debug)]
pub struct Prepared {
    root: Root,
    diagnostics: Diagnostics,
    options: EvalOptions,
}

impl Prepared {
    pub fn root(&self) -> &Root {
        &self.root
    }

    /// Check cross-node invariants.
    ///
    /// Skipped when building reported errors and
    /// `validate_after_errors` is off.
    pub fn validate(self) -> Validated {
        let Prepared {
            root,
            mut diagnostics,
            options,
        } = self;

        if diagnostics.structural_count() > 0 && !options.validate_after_errors {
            tracing::debug!(
                structural = diagnostics.structural_count(),
                "skipping validation"
            );
        } else {
            let verr = root.validate();
            for d in &verr {
                if let Diagnostic::Validation(v) = d {
                    log_validation_failure!(location = %v.location, message = %v.message);
                }
            }
            log_stage_completed!(stage = "validate", diagnostics = verr.len());
            diagnostics.merge(verr);
        }

        Validated {
            root,
            diagnostics,
            options,
        }
    }
}

/// The outcome of a complete evaluation.
#[derive(Debug)]
pub struct Validated {
    root: Root,
    diagnostics: Diagnostics,
    options: EvalOptions,
}

impl Validated {
    pub fn root(&self) -> &Root {
        &self.root
    }

    /// Every diagnostic from every stage, in the order found.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Schemes of the service called `name`, read with the configured
    /// scheme mode.
    pub fn schemes(&self, name: &str) -> Option<Vec<String>> {
        self.root
            .service(name)
            .and_then(|svc| svc.schemes(self.options.scheme_mode))
    }

    /// The tree if nothing was reported, every diagnostic otherwise.
    pub fn into_result(self) -> Result<Root, Diagnostics> {
        self.diagnostics.into_result(self.root)
    }
}

/// Build, prepare and validate a design made of a single declaration.
pub fn run(options: EvalOptions, body: impl FnOnce(&mut Eval)) -> Result<Root, Diagnostics> {
    Design::new(options)
        .declare(body)
        .build()?
        .prepare()
        .validate()
        .into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::*;
    use rampart_expr::{DataType, FatalError, SchemeMode};

    fn messages(d: &Diagnostics) -> Vec<String> {
        d.iter().map(|d| d.to_string()).collect()
    }

    fn store() -> Design<'static> {
        Design::new(EvalOptions::default())
            .declare(|e| {
                api(e, "store", |e| {
                    title(e, "Store");
                    path(e, "/api");
                    server(e, "https://store.example.com");
                    error(e, "unauthorized", |e| description(e, "not logged in"));
                    response(e, "unauthorized", |e| code(e, 401));
                })
            })
            .declare(|e| {
                service(e, "org", |e| {
                    path(e, "/orgs");
                    method(e, "show", |e| get(e, "/{org}"));
                })
            })
            .declare(|e| {
                service(e, "team", |e| {
                    parent(e, "org");
                    path(e, "/teams");
                    server(e, "https://teams.example.com");
                    server(e, "http://teams.example.com");
                    method(e, "show", |e| get(e, "/{team}"));
                })
            })
    }

    #[test]
    fn valid_design() {
        let validated = match store().build() {
            Ok(built) => built.prepare().validate(),
            Err(d) => panic!("build failed: {}", d),
        };

        assert!(validated.is_valid(), "{}", validated.diagnostics());
        let root = validated.root();
        let team = root.service("team").map(|s| s.uri_template(root));
        assert_eq!(team.as_deref(), Some("/api/orgs/{org}/teams/{team}"));
        assert_eq!(
            validated.schemes("team"),
            Some(vec!["http".to_string(), "https".to_string()])
        );
        assert_eq!(validated.schemes("org"), None);

        // The global HTTP error got its description from the error type.
        let herr = &root.http_errors()[0];
        assert_eq!(herr.response.description, "not logged in");
    }

    #[test]
    fn runs_with_logging_installed() {
        use rampart_telemetry::{Telemetry, TelemetryConfig};

        // Another test in this binary may have installed one already.
        let _ = Telemetry::init(TelemetryConfig::new().with_log_level("debug"));
        let validated = store().build().map(|b| b.prepare().validate());
        assert!(matches!(validated, Ok(v) if v.is_valid()));
    }

    #[test]
    fn diagnostics_from_all_stages_are_aggregated() {
        let result = Design::new(EvalOptions::default())
            .declare(|e| api(e, "", |_| {}))
            .declare(|e| {
                service(e, "child", |e| {
                    parent(e, "ghost");
                    name(e, "oops");
                })
            })
            .declare(|e| {
                service(e, "a", |e| {
                    parent(e, "b");
                    method(e, "show", |e| get(e, "/a"));
                })
            })
            .declare(|e| {
                service(e, "b", |e| {
                    parent(e, "a");
                    method(e, "show", |e| get(e, "/b"));
                })
            })
            .build()
            .map(|b| b.prepare().validate().into_result());

        let Ok(Err(diagnostics)) = result else {
            panic!("expected validation diagnostics");
        };
        assert_eq!(
            messages(&diagnostics),
            vec![
                "E2002: API first argument cannot be empty",
                "E2001: invalid use of Name in service \"child\"",
                "design: API is not defined",
                "service \"child\": Parent service ghost not found",
                "service \"a\": Parent service b is also child",
                "service \"b\": Parent service a is also child",
            ]
        );
        assert_eq!(diagnostics.structural_count(), 2);
    }

    #[test]
    fn validation_can_be_skipped_after_errors() {
        let options = EvalOptions::new().with_validate_after_errors(false);
        let result = run(options, |e| {
            service(e, "child", |e| {
                parent(e, "ghost");
                title(e, "oops");
            })
        });
        let Err(diagnostics) = result else {
            panic!("expected diagnostics");
        };
        assert_eq!(
            messages(&diagnostics),
            vec!["E2001: invalid use of Title in service \"child\""]
        );
    }

    #[test]
    fn abort_fails_build() {
        let result = Design::new(EvalOptions::new().with_max_depth(1))
            .declare(|e| api(e, "store", |e| contact(e, |e| name(e, "n"))))
            .declare(|e| api(e, "", |_| {}))
            .build();
        let Err(diagnostics) = result else {
            panic!("expected abort");
        };
        assert_eq!(diagnostics.fatal(), Some(&FatalError::DepthExceeded(1)));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn validate_is_idempotent_across_runs() {
        let first = store().build().map(|b| b.prepare().validate());
        let second = store().build().map(|b| b.prepare().validate());
        match (first, second) {
            (Ok(a), Ok(b)) => {
                assert_eq!(a.diagnostics(), b.diagnostics());
                assert_eq!(a.root().validate(), a.root().validate());
            }
            _ => panic!("build failed"),
        }
    }

    #[test]
    fn unparsable_scheme_mode() {
        let options = EvalOptions::new().with_scheme_mode(SchemeMode::Unparsable);
        let validated = Design::new(options)
            .declare(|e| api(e, "store", |_| {}))
            .declare(|e| {
                service(e, "s", |e| {
                    server(e, "https://ok.example.com");
                    server(e, "wss://not a host");
                })
            })
            .build()
            .map(|b| b.prepare().validate());
        let Ok(validated) = validated else {
            panic!("build failed");
        };
        assert_eq!(validated.schemes("s"), Some(vec!["wss".to_string()]));
    }

    #[test]
    fn invalid_http_error_is_reported() {
        let result = run(EvalOptions::default(), |e| {
            service(e, "users", |e| {
                error(e, "conflict", |e| {
                    attribute(e, "id", DataType::String, |_| {});
                    attribute(e, "id", DataType::String, |_| {});
                });
                response(e, "conflict", |_| {});
                method(e, "list", |_| {});
            })
        });
        let Err(diagnostics) = result else {
            panic!("expected diagnostics");
        };
        let messages = messages(&diagnostics);
        assert!(messages.contains(&"design: API is not defined".to_string()));
        assert!(messages
            .iter()
            .any(|m| m.ends_with("HTTP response status code is missing for error conflict")));
        assert!(messages
            .iter()
            .any(|m| m.ends_with("No route defined for method list")));
        assert!(messages.iter().any(|m| m.contains("attribute id is defined twice")));
    }
}
