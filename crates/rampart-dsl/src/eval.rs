//! Evaluation context: the stack of nodes under construction and the
//! executor that runs DSL blocks against them.
//!
//! Builder calls receive the [`Eval`] explicitly and act on whatever node
//! sits on top of its stack. An empty stack means top level.

use rampart_expr::{Diagnostic, Diagnostics, DslError, Expression, FatalError, Root};
use rampart_telemetry::{log_evaluation_aborted, log_structural_error};

use crate::options::EvalOptions;

/// Name reported for the top-level context.
pub const TOP_LEVEL: &str = "top-level";

/// A boxed DSL block.
pub type Dsl<'a> = Box<dyn FnOnce(&mut Eval) + 'a>;

/// Result of running a DSL block with [`Eval::execute`].
#[derive(Debug)]
pub enum Outcome<T> {
    /// The block ran without reporting anything.
    Completed(T),
    /// The block reported at least one structural error.
    Failed(T),
    /// The evaluation run was aborted; the node is gone.
    Aborted,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    /// The node, unless the run was aborted.
    pub fn into_node(self) -> Option<T> {
        match self {
            Outcome::Completed(node) | Outcome::Failed(node) => Some(node),
            Outcome::Aborted => None,
        }
    }

    /// The node, only if the block completed cleanly.
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(node) => Some(node),
            _ => None,
        }
    }
}

/// State of one evaluation run.
pub struct Eval {
    root: Root,
    stack: Vec<Box<dyn Expression>>,
    diagnostics: Diagnostics,
    options: EvalOptions,
    aborted: bool,
}

impl Eval {
    pub fn new(options: EvalOptions) -> Self {
        Self {
            root: Root::new(),
            stack: Vec::new(),
            diagnostics: Diagnostics::new(),
            options,
            aborted: false,
        }
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Root {
        &mut self.root
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn is_top_level(&self) -> bool {
        self.stack.is_empty()
    }

    /// Current nesting depth, 0 at top level.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The node being defined, `None` at top level.
    pub fn current(&mut self) -> Option<&mut (dyn Expression + 'static)> {
        self.stack.last_mut().map(|node| &mut **node)
    }

    /// Read-only view of the node being defined.
    pub fn current_ref(&self) -> Option<&(dyn Expression + 'static)> {
        self.stack.last().map(|node| &**node)
    }

    /// The node being defined if it is a `T`.
    pub fn current_as<T: Expression>(&mut self) -> Option<&mut T> {
        self.current()?.downcast_mut::<T>()
    }

    /// Diagnostic name of the current context.
    pub fn current_name(&self) -> String {
        self.stack
            .last()
            .map_or_else(|| TOP_LEVEL.to_string(), |node| node.eval_name())
    }

    /// Record a structural error. Ignored once the run is aborted.
    pub fn report(&mut self, err: DslError) {
        if self.aborted {
            return;
        }
        log_structural_error!(context = %self.current_name(), error = %err);
        self.diagnostics.push(err);
    }

    /// Record that `call` is not valid in the current context.
    pub fn incompatible_dsl(&mut self, call: &'static str) {
        let current = self.current_name();
        self.report(DslError::IncompatibleDsl { call, current });
    }

    /// Apply `set` to a capability of the current node, or report `call` as
    /// incompatible when the node lacks it. Returns whether `set` ran.
    pub fn with_capability<C: ?Sized>(
        &mut self,
        call: &'static str,
        capability: impl for<'n> FnOnce(&'n mut (dyn Expression + 'static)) -> Option<&'n mut C>,
        set: impl FnOnce(&mut C),
    ) -> bool {
        match self.current().and_then(capability) {
            Some(target) => {
                set(target);
                true
            }
            None => {
                self.incompatible_dsl(call);
                false
            }
        }
    }

    /// Whether the current node offers a capability.
    pub fn accepts<C: ?Sized>(
        &mut self,
        capability: impl for<'n> FnOnce(&'n mut (dyn Expression + 'static)) -> Option<&'n mut C>,
    ) -> bool {
        self.current().and_then(capability).is_some()
    }

    /// Run `body` with `node` as the current context.
    ///
    /// The node is pushed before and popped after the block whatever the
    /// block reports. The outcome is `Failed` when the block recorded any
    /// diagnostic.
    pub fn execute<T: Expression>(&mut self, node: T, body: impl FnOnce(&mut Eval)) -> Outcome<T> {
        if self.aborted {
            return Outcome::Aborted;
        }
        if self.stack.len() >= self.options.max_depth {
            self.abort(FatalError::DepthExceeded(self.options.max_depth));
            return Outcome::Aborted;
        }

        let before = self.diagnostics.len();
        tracing::debug!(node = %node.eval_name(), depth = self.stack.len() + 1, "executing DSL");
        self.stack.push(Box::new(node));
        body(self);
        let popped = self.stack.pop();

        if self.aborted {
            return Outcome::Aborted;
        }
        let node = match popped.and_then(|n| n.into_any().downcast::<T>().ok()) {
            Some(node) => *node,
            None => {
                self.abort(FatalError::ContextCorrupted(std::any::type_name::<T>()));
                return Outcome::Aborted;
            }
        };
        if self.diagnostics.len() > before {
            Outcome::Failed(node)
        } else {
            Outcome::Completed(node)
        }
    }

    /// Stop the run. Later blocks are skipped and reports dropped.
    pub(crate) fn abort(&mut self, fatal: FatalError) {
        if self.aborted {
            return;
        }
        log_evaluation_aborted!(context = %self.current_name(), error = %fatal);
        self.diagnostics.push(Diagnostic::Fatal(fatal));
        self.aborted = true;
    }

    /// The tree and every diagnostic recorded.
    pub fn into_parts(self) -> (Root, Diagnostics) {
        (self.root, self.diagnostics)
    }
}

impl Default for Eval {
    fn default() -> Self {
        Self::new(EvalOptions::default())
    }
}
