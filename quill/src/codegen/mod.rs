//! Backend code generation core
//!
//! This module owns the two context-sensitive decision engines that run
//! while a unit is being generated:
//!
//! - `inline` — the inline expansion session stack and cycle reporter
//! - `intrinsic` — memoized dispatch of binary operators to specialized
//!   emission strategies
//!
//! plus [`InlineExpander`], the driver that walks function bodies and
//! exercises both. The expander works on a deliberately small body IR
//! ([`BodyOp`]); the full lowering of expressions, locals and labels lives
//! in the emitting backend and consumes the [`EmitOp`] stream produced here.

pub mod inline;
pub mod intrinsic;

pub use inline::{InlineContext, InlineCycleReporter};
pub use intrinsic::{
    ArithOp, BinaryIntrinsics, BinaryOp, CompareOp, IntrinsicStrategy, binary_operation_types,
};

use std::collections::HashMap;

use crate::ast::{ExprId, Span};
use crate::config::LanguageSettings;
use crate::diag::DiagnosticSink;
use crate::error::{CompileError, Result};
use crate::resolve::{BindingMap, DeclId, DeclInfo, ResolvedCall};
use crate::types::TypeTable;

const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// Read-only resolution state for one compilation unit, threaded through
/// code generation. Owns nothing mutable: the mutable per-unit state
/// (session stack, dispatch cache) lives in [`InlineExpander`].
pub struct CodegenContext<'a> {
    pub settings: &'a LanguageSettings,
    pub bindings: &'a BindingMap,
    pub types: &'a TypeTable,
}

impl<'a> CodegenContext<'a> {
    pub fn new(
        settings: &'a LanguageSettings,
        bindings: &'a BindingMap,
        types: &'a TypeTable,
    ) -> Self {
        Self {
            settings,
            bindings,
            types,
        }
    }

    pub fn decl(&self, id: DeclId) -> Option<&DeclInfo> {
        self.bindings.decl(id)
    }
}

/// One compilation unit's functions, as handed over by the frontend
#[derive(Debug, Default)]
pub struct CodeUnit {
    pub functions: Vec<FunctionDef>,
}

/// A function body in the driver's flat IR
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub decl: DeclId,
    pub name: String,
    /// Declared `inline`: calls to it are expanded in place
    pub is_inline: bool,
    pub span: Span,
    pub body: Vec<BodyOp>,
}

/// Body operations relevant to inlining and intrinsic dispatch
#[derive(Debug, Clone)]
pub enum BodyOp {
    /// Call to another function in (or outside) the unit
    Call {
        expr: ExprId,
        callee: DeclId,
        span: Span,
    },
    /// A binary operator occurrence
    Binary(BinaryOp),
    /// A locally declared class or lambda wrapper
    DeclareClass { name: String },
}

/// Emission decisions produced by the expander, consumed by the emitting
/// backend
#[derive(Debug, Clone, PartialEq)]
pub enum EmitOp {
    /// Ordinary (non-inlined) call
    Call(DeclId),
    /// Binary operator compiled as a plain call (no intrinsic applied)
    OperatorCall(ExprId),
    /// Binary operator compiled through a specialized strategy
    Intrinsic(IntrinsicStrategy),
    /// Local class declaration; `from_inline` marks classes synthesized
    /// during an inline expansion, which need different attribution than
    /// classes declared directly in source
    LocalClass { name: String, from_inline: bool },
}

/// A fully expanded function body
#[derive(Debug)]
pub struct ExpandedFunction {
    pub name: String,
    pub ops: Vec<EmitOp>,
}

/// Walks function bodies, expanding inline calls in place and resolving
/// operator intrinsics. Owns the per-unit mutable state; one instance per
/// compilation unit.
pub struct InlineExpander<'a> {
    cx: CodegenContext<'a>,
    inline: InlineContext,
    intrinsics: BinaryIntrinsics,
}

impl<'a> InlineExpander<'a> {
    pub fn new(cx: CodegenContext<'a>) -> Self {
        Self {
            cx,
            inline: InlineContext::new(),
            intrinsics: BinaryIntrinsics::new(),
        }
    }

    /// Expand every non-inline function of the unit. Inline functions are
    /// expanded only where they are called; cycle diagnostics go to `sink`.
    pub fn expand_unit(
        &mut self,
        unit: &CodeUnit,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<ExpandedFunction>> {
        let mut fn_index: HashMap<DeclId, usize> = HashMap::new();
        for (idx, func) in unit.functions.iter().enumerate() {
            if fn_index.insert(func.decl, idx).is_some() {
                return Err(CompileError::codegen(
                    format!("duplicate definition of function '{}'", func.name),
                    func.span,
                ));
            }
        }

        let mut expanded = Vec::new();
        for func in unit.functions.iter().filter(|f| !f.is_inline) {
            let mut ops = Vec::new();
            self.expand_body(unit, &fn_index, &func.body, sink, &mut ops)?;
            expanded.push(ExpandedFunction {
                name: func.name.clone(),
                ops,
            });
        }
        Ok(expanded)
    }

    fn expand_body(
        &mut self,
        unit: &CodeUnit,
        fn_index: &HashMap<DeclId, usize>,
        body: &[BodyOp],
        sink: &mut dyn DiagnosticSink,
        out: &mut Vec<EmitOp>,
    ) -> Result<()> {
        for op in body {
            match op {
                BodyOp::Call { expr, callee, span } => {
                    let def = fn_index.get(callee).map(|&idx| &unit.functions[idx]);
                    match def {
                        Some(def) if def.is_inline => {
                            self.expand_inline_call(unit, fn_index, def, *expr, *span, sink, out)?;
                        }
                        // Non-inline or external target: ordinary call
                        _ => out.push(EmitOp::Call(*callee)),
                    }
                }
                BodyOp::Binary(binary) => {
                    let strategy = self.intrinsics.get_intrinsic(binary, &self.cx);
                    if strategy.exists() {
                        out.push(EmitOp::Intrinsic(strategy));
                    } else {
                        out.push(EmitOp::OperatorCall(binary.expr));
                    }
                }
                BodyOp::DeclareClass { name } => {
                    let from_inline = if self.inline.depth() > 0 {
                        self.inline.record_synthetic_type(name.clone())?;
                        self.inline.is_synthetic_type_from_expansion(name)?
                    } else {
                        false
                    };
                    out.push(EmitOp::LocalClass {
                        name: name.clone(),
                        from_inline,
                    });
                }
            }
        }
        Ok(())
    }

    /// Expand one call to an inline function, or downgrade it to an ordinary
    /// call when expansion would close a recursion cycle. `exit` is paired
    /// with every successful `enter`, including when body expansion fails.
    #[allow(clippy::too_many_arguments)]
    fn expand_inline_call(
        &mut self,
        unit: &CodeUnit,
        fn_index: &HashMap<DeclId, usize>,
        def: &FunctionDef,
        expr: ExprId,
        span: Span,
        sink: &mut dyn DiagnosticSink,
        out: &mut Vec<EmitOp>,
    ) -> Result<()> {
        let call = ResolvedCall {
            expr,
            target: def.decl,
            target_name: def.name.clone(),
            span,
        };

        if !self.inline.enter(Some(&call), sink) {
            out.push(EmitOp::Call(def.decl));
            return Ok(());
        }

        // Expansion depth tracks source nesting, which can be deep
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.expand_body(unit, fn_index, &def.body, sink, out)
        });
        self.inline.exit(Some(&call))?;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::OperatorToken;
    use crate::diag::DiagnosticList;
    use crate::types::PrimitiveType;

    fn function(decl: DeclId, name: &str, is_inline: bool, body: Vec<BodyOp>) -> FunctionDef {
        FunctionDef {
            decl,
            name: name.to_string(),
            is_inline,
            span: Span::dummy(),
            body,
        }
    }

    fn call_op(expr: u32, callee: DeclId) -> BodyOp {
        BodyOp::Call {
            expr: ExprId(expr),
            callee,
            span: Span::new(expr as usize, expr as usize + 1),
        }
    }

    #[test]
    fn test_non_inline_call_emitted_as_call() {
        let settings = LanguageSettings::default();
        let bindings = BindingMap::new();
        let types = TypeTable::new();
        let unit = CodeUnit {
            functions: vec![
                function(DeclId(0), "main", false, vec![call_op(0, DeclId(1))]),
                function(DeclId(1), "helper", false, vec![]),
            ],
        };

        let mut expander =
            InlineExpander::new(CodegenContext::new(&settings, &bindings, &types));
        let mut sink = DiagnosticList::new();
        let expanded = expander.expand_unit(&unit, &mut sink).unwrap();

        // Only non-inline functions are roots; both are here
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[0].ops, vec![EmitOp::Call(DeclId(1))]);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_inline_call_splices_body() {
        let settings = LanguageSettings::default();
        let bindings = BindingMap::new();
        let types = TypeTable::new();
        // main calls inline f; f calls external helper d9
        let unit = CodeUnit {
            functions: vec![
                function(DeclId(0), "main", false, vec![call_op(0, DeclId(1))]),
                function(DeclId(1), "f", true, vec![call_op(1, DeclId(9))]),
            ],
        };

        let mut expander =
            InlineExpander::new(CodegenContext::new(&settings, &bindings, &types));
        let mut sink = DiagnosticList::new();
        let expanded = expander.expand_unit(&unit, &mut sink).unwrap();

        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].name, "main");
        // f's body was substituted at the call site
        assert_eq!(expanded[0].ops, vec![EmitOp::Call(DeclId(9))]);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_local_class_outside_expansion_not_from_inline() {
        let settings = LanguageSettings::default();
        let bindings = BindingMap::new();
        let types = TypeTable::new();
        let unit = CodeUnit {
            functions: vec![function(
                DeclId(0),
                "main",
                false,
                vec![BodyOp::DeclareClass {
                    name: "Main$Local".to_string(),
                }],
            )],
        };

        let mut expander =
            InlineExpander::new(CodegenContext::new(&settings, &bindings, &types));
        let mut sink = DiagnosticList::new();
        let expanded = expander.expand_unit(&unit, &mut sink).unwrap();

        assert_eq!(
            expanded[0].ops,
            vec![EmitOp::LocalClass {
                name: "Main$Local".to_string(),
                from_inline: false,
            }]
        );
    }

    #[test]
    fn test_operator_without_intrinsic_becomes_operator_call() {
        let settings = LanguageSettings::default();
        let mut bindings = BindingMap::new();
        let user_eq = bindings.add_decl(DeclInfo::user("equals"));
        bindings.set_operator_target(ExprId(10), user_eq);
        let types = TypeTable::new();

        let unit = CodeUnit {
            functions: vec![function(
                DeclId(5),
                "main",
                false,
                vec![BodyOp::Binary(BinaryOp {
                    expr: ExprId(10),
                    token: OperatorToken::EqEq,
                    left: ExprId(11),
                    right: ExprId(12),
                })],
            )],
        };

        let mut expander =
            InlineExpander::new(CodegenContext::new(&settings, &bindings, &types));
        let mut sink = DiagnosticList::new();
        let expanded = expander.expand_unit(&unit, &mut sink).unwrap();

        assert_eq!(expanded[0].ops, vec![EmitOp::OperatorCall(ExprId(10))]);
    }

    #[test]
    fn test_operator_with_intrinsic() {
        let settings = LanguageSettings::default();
        let mut bindings = BindingMap::new();
        let eq = bindings.add_decl(DeclInfo::builtin("equals"));
        bindings.set_operator_target(ExprId(10), eq);
        let mut types = TypeTable::new();
        types.set_precise_type(ExprId(11), PrimitiveType::Int);
        types.set_precise_type(ExprId(12), PrimitiveType::Int);

        let unit = CodeUnit {
            functions: vec![function(
                DeclId(5),
                "main",
                false,
                vec![BodyOp::Binary(BinaryOp {
                    expr: ExprId(10),
                    token: OperatorToken::EqEq,
                    left: ExprId(11),
                    right: ExprId(12),
                })],
            )],
        };

        let mut expander =
            InlineExpander::new(CodegenContext::new(&settings, &bindings, &types));
        let mut sink = DiagnosticList::new();
        let expanded = expander.expand_unit(&unit, &mut sink).unwrap();

        assert_eq!(
            expanded[0].ops,
            vec![EmitOp::Intrinsic(IntrinsicStrategy::PrimitiveEquality {
                negated: false
            })]
        );
    }

    #[test]
    fn test_duplicate_function_definition_is_error() {
        let settings = LanguageSettings::default();
        let bindings = BindingMap::new();
        let types = TypeTable::new();
        let unit = CodeUnit {
            functions: vec![
                function(DeclId(0), "f", false, vec![]),
                function(DeclId(0), "f", false, vec![]),
            ],
        };

        let mut expander =
            InlineExpander::new(CodegenContext::new(&settings, &bindings, &types));
        let mut sink = DiagnosticList::new();
        assert!(expander.expand_unit(&unit, &mut sink).is_err());
    }
}
