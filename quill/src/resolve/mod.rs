//! Resolver outputs consumed by the backend
//!
//! Call resolution and smart-cast analysis run in the frontend; this module
//! is the narrow view of their results that code generation needs: stable
//! declaration identities, resolved calls, and the per-expression tables of
//! the binding map (operator targets, numeric comparison refinement).

use std::collections::HashMap;

use crate::ast::{ExprId, Span};
use crate::types::PrimitiveType;

/// Stable identity of a declaration within one compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(pub u32);

impl std::fmt::Display for DeclId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.0)
    }
}

/// What the backend knows about a resolved declaration
#[derive(Debug, Clone)]
pub struct DeclInfo {
    /// Simple name (`equals`, `compareTo`, `plus`, ...)
    pub name: String,
    /// Declared in the language's built-in library, as opposed to user code.
    /// Intrinsic dispatch only trusts built-in operator semantics.
    pub builtin: bool,
}

impl DeclInfo {
    pub fn builtin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            builtin: true,
        }
    }

    pub fn user(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            builtin: false,
        }
    }
}

/// A call expression resolved to its target declaration
#[derive(Debug, Clone)]
pub struct ResolvedCall {
    /// The call expression itself (call-site identity)
    pub expr: ExprId,
    /// The declaration being called
    pub target: DeclId,
    /// Simple name of the target, for diagnostics
    pub target_name: String,
    pub span: Span,
}

/// Smart-cast-refined operand types for one numeric comparison.
///
/// Computed by the frontend only for expressions subject to the strict
/// IEEE-754 comparison rule, which is why consumers must be able to fall
/// back to plain precise-primitive-type lookup.
#[derive(Debug, Clone, Copy)]
pub struct NumericComparisonInfo {
    pub left_type: PrimitiveType,
    pub right_type: PrimitiveType,
    /// The least common type the comparison is performed in. Carried for
    /// completeness; effective-type computation uses only the operand pair.
    pub comparison_type: PrimitiveType,
}

/// Per-expression resolution results for one compilation unit
#[derive(Debug, Default)]
pub struct BindingMap {
    decls: Vec<DeclInfo>,
    operator_targets: HashMap<ExprId, DeclId>,
    comparison_info: HashMap<ExprId, NumericComparisonInfo>,
}

impl BindingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration and return its identity
    pub fn add_decl(&mut self, info: DeclInfo) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(info);
        id
    }

    pub fn decl(&self, id: DeclId) -> Option<&DeclInfo> {
        self.decls.get(id.0 as usize)
    }

    /// Record the operator-function declaration a binary expression resolved to
    pub fn set_operator_target(&mut self, expr: ExprId, target: DeclId) {
        self.operator_targets.insert(expr, target);
    }

    pub fn operator_target(&self, expr: ExprId) -> Option<DeclId> {
        self.operator_targets.get(&expr).copied()
    }

    pub fn set_comparison_info(&mut self, expr: ExprId, info: NumericComparisonInfo) {
        self.comparison_info.insert(expr, info);
    }

    pub fn comparison_info(&self, expr: ExprId) -> Option<&NumericComparisonInfo> {
        self.comparison_info.get(&expr)
    }
}
