//! Inline expansion session tracking
//!
//! Expanding an inline call is re-entrant: the body being substituted can
//! itself contain inline calls, so the generator holds a stack of in-progress
//! expansions. Two concerns live here:
//!
//! - [`InlineCycleReporter`] refuses expansions that would re-enter a
//!   function already on the chain (direct or mutual inline recursion), which
//!   would otherwise expand without bound. A refused call is compiled as an
//!   ordinary call and reported once per call site.
//! - [`InlineContext`] owns one activation per in-progress expansion and
//!   tracks the synthetic types (lambda classes, local classes) each
//!   expansion introduces. On exit, a popped activation's types merge into
//!   the caller's activation: a class synthesized deep inside a nested
//!   expansion must still be recognized by the outer expansion that triggered
//!   the chain.
//!
//! Both structures are owned by the per-unit codegen context and are not
//! safe for concurrent mutation; parallel unit compilation must use
//! independent instances.

use std::collections::HashSet;

use crate::ast::ExprId;
use crate::diag::{Diagnostic, DiagnosticSink};
use crate::error::{CompileError, Result};
use crate::resolve::{DeclId, ResolvedCall};

/// Detects inline expansion chains that re-enter a function already being
/// expanded.
///
/// The chain is keyed by declaration identity: the same inline function
/// expanded at two sibling call sites is fine, but re-entering it while one
/// of its expansions is still open is a cycle.
#[derive(Debug, Default)]
pub struct InlineCycleReporter {
    /// Activation chain of in-progress expansions, innermost last
    processing: Vec<(ExprId, DeclId)>,
    /// Call sites already reported, to keep one diagnostic per site even
    /// when the enclosing body is expanded at several outer call sites
    reported: HashSet<ExprId>,
}

impl InlineCycleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Would expanding `call` now re-enter a declaration on the chain?
    pub fn will_cycle(&self, call: &ResolvedCall) -> bool {
        self.processing.iter().any(|&(_, decl)| decl == call.target)
    }

    /// Try to begin expanding `call`. Returns false (and reports a
    /// diagnostic for the call site, at most once) when the expansion would
    /// close a cycle; the caller must then compile the call without
    /// inlining. Unresolved calls are never cycle-tracked.
    pub fn enter(&mut self, call: Option<&ResolvedCall>, sink: &mut dyn DiagnosticSink) -> bool {
        let Some(call) = call else { return true };

        if self.will_cycle(call) {
            if self.reported.insert(call.expr) {
                sink.report(Diagnostic::inline_cycle(call.span, &call.target_name));
            }
            return false;
        }

        self.processing.push((call.expr, call.target));
        true
    }

    /// Finish expanding `call`, making its declaration eligible again for
    /// later, non-overlapping expansions. Must mirror a successful `enter`.
    pub fn exit(&mut self, call: Option<&ResolvedCall>) -> Result<()> {
        let Some(call) = call else { return Ok(()) };

        match self.processing.pop() {
            Some((site, _)) if site == call.expr => Ok(()),
            Some((site, _)) => Err(CompileError::internal(format!(
                "inline exit out of order: expected {site}, got {} ('{}')",
                call.expr, call.target_name
            ))),
            None => Err(CompileError::internal(format!(
                "inline exit without matching enter for '{}'",
                call.target_name
            ))),
        }
    }

    /// Number of in-progress expansions on the chain
    pub fn depth(&self) -> usize {
        self.processing.len()
    }
}

/// Stack of inline expansion activations for one compilation unit.
///
/// Each activation records the synthetic type names introduced while it was
/// the innermost expansion. Only the top activation is ever mutated.
#[derive(Debug, Default)]
pub struct InlineContext {
    cycle_reporter: InlineCycleReporter,
    /// Synthetic-type sets, one per activation, innermost last
    state: Vec<HashSet<String>>,
}

impl InlineContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current expansion nesting depth (0 = not inside any inline expansion)
    pub fn depth(&self) -> usize {
        self.state.len()
    }

    /// Begin an inline expansion. On a detected cycle no activation is
    /// pushed, a diagnostic is reported through `sink`, and the caller must
    /// emit an ordinary call instead.
    pub fn enter(&mut self, call: Option<&ResolvedCall>, sink: &mut dyn DiagnosticSink) -> bool {
        let entered = self.cycle_reporter.enter(call, sink);
        if entered {
            self.state.push(HashSet::new());
        }
        entered
    }

    /// End the innermost expansion, merging its synthetic types into the
    /// caller's activation (or discarding them at the outermost level).
    /// Calling this without a matching successful `enter` is a contract
    /// violation by the generator.
    pub fn exit(&mut self, call: Option<&ResolvedCall>) -> Result<()> {
        self.cycle_reporter.exit(call)?;
        let popped = self
            .state
            .pop()
            .ok_or_else(|| CompileError::internal("inline exit without matching enter"))?;
        if let Some(parent) = self.state.last_mut() {
            parent.extend(popped);
        }
        Ok(())
    }

    /// Record a synthetic type introduced by the innermost expansion
    pub fn record_synthetic_type(&mut self, name: impl Into<String>) -> Result<()> {
        let top = self.state.last_mut().ok_or_else(|| {
            CompileError::internal("synthetic type recorded outside inline expansion")
        })?;
        top.insert(name.into());
        Ok(())
    }

    /// Was this synthetic type introduced by the innermost expansion?
    /// Checks only the top activation; types from finished nested expansions
    /// are visible here because they merged outward on exit.
    pub fn is_synthetic_type_from_expansion(&self, name: &str) -> Result<bool> {
        let top = self.state.last().ok_or_else(|| {
            CompileError::internal("synthetic type queried outside inline expansion")
        })?;
        Ok(top.contains(name))
    }
}
