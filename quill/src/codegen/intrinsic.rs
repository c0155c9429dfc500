//! Intrinsic dispatch for binary operators
//!
//! A binary operator call can often be emitted directly (primitive equality,
//! a native comparison, a compound-assignment rewrite) instead of as a call
//! to the resolved operator function. Which emission applies depends on the
//! operator token, the resolved declaration, and the statically known operand
//! types — possibly refined by smart casts when the strict IEEE-754
//! comparison rule is active. [`BinaryIntrinsics`] makes that selection once
//! per distinct [`IntrinsicKey`] and memoizes it for the rest of the unit's
//! codegen pass.
//!
//! "No intrinsic" is a normal outcome: the generator falls back to ordinary
//! call emission.

use std::collections::HashMap;

use crate::ast::{ExprId, OperatorToken};
use crate::codegen::CodegenContext;
use crate::config::LanguageFeature;
use crate::resolve::{DeclId, DeclInfo};
use crate::types::PrimitiveType;

/// A binary operator occurrence as seen by the backend
#[derive(Debug, Clone, Copy)]
pub struct BinaryOp {
    /// The operator expression itself
    pub expr: ExprId,
    pub token: OperatorToken,
    /// Left operand expression
    pub left: ExprId,
    /// Right operand expression
    pub right: ExprId,
}

/// Ordering comparison emitted by an intrinsic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
}

/// Arithmetic operation behind a compound assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// Selected emission for one binary operator occurrence.
///
/// Immutable once produced; shared by value across every call site whose
/// [`IntrinsicKey`] is equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntrinsicStrategy {
    /// No specialized emission; compile as an ordinary call
    None,
    /// Reference identity (`===` / `!==`)
    ReferenceEquality { negated: bool },
    /// Direct primitive equality
    PrimitiveEquality { negated: bool },
    /// Equality on floating operands under the strict IEEE-754 rule
    /// (NaN != NaN, -0.0 == 0.0, no boxing)
    Ieee754Equality { negated: bool },
    /// Comparison where at least one side is a Long (emitted through the
    /// boxed-long compare helper)
    LongCompare { op: CompareOp },
    /// Native comparison of two primitive numerics
    PrimitiveCompare { op: CompareOp },
    /// Call `compareTo` and compare its result against zero
    CompareToCall { op: CompareOp },
    /// Rewrite `a op= b` into a read-modify-write of `a`
    CompoundAssign { op: ArithOp },
}

impl IntrinsicStrategy {
    /// False for [`IntrinsicStrategy::None`], the ordinary-call fallback
    pub fn exists(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// One memoized dispatch decision: (operator, declaration, effective operand
/// types). Call-site identity is deliberately absent — two sites with equal
/// keys share one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct IntrinsicKey {
    token: OperatorToken,
    target: DeclId,
    left: Option<PrimitiveType>,
    right: Option<PrimitiveType>,
}

/// The closed set of intrinsic factories.
///
/// Dispatch evaluates them in [`FACTORY_PRIORITY`] order and takes the first
/// match; the order is a hard contract (Long comparisons must win over the
/// generic `compareTo` lowering), never a property of collection iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntrinsicFactory {
    LongCompare,
    Equals,
    Compare,
    Assignment,
}

const FACTORY_PRIORITY: [IntrinsicFactory; 4] = [
    IntrinsicFactory::LongCompare,
    IntrinsicFactory::Equals,
    IntrinsicFactory::Compare,
    IntrinsicFactory::Assignment,
];

impl IntrinsicFactory {
    /// Operator tokens this factory is willing to look at
    fn supports(self, token: OperatorToken) -> bool {
        match self {
            Self::LongCompare | Self::Compare => token.is_ordering(),
            Self::Equals => token.is_equality(),
            Self::Assignment => token.is_compound_assignment(),
        }
    }

    /// Build a strategy for the declaration/types, or decline
    fn build(
        self,
        decl: &DeclInfo,
        token: OperatorToken,
        left: Option<PrimitiveType>,
        right: Option<PrimitiveType>,
    ) -> Option<IntrinsicStrategy> {
        match self {
            Self::LongCompare => {
                if !decl.builtin || decl.name != "compareTo" {
                    return None;
                }
                let (l, r) = (left?, right?);
                if l.is_numeric()
                    && r.is_numeric()
                    && (l == PrimitiveType::Long || r == PrimitiveType::Long)
                {
                    Some(IntrinsicStrategy::LongCompare {
                        op: compare_op(token)?,
                    })
                } else {
                    None
                }
            }
            Self::Equals => {
                if token.is_identity() {
                    return Some(IntrinsicStrategy::ReferenceEquality {
                        negated: token.is_negated(),
                    });
                }
                if !decl.builtin || decl.name != "equals" {
                    return None;
                }
                let (l, r) = (left?, right?);
                let negated = token.is_negated();
                if l.is_floating() || r.is_floating() {
                    Some(IntrinsicStrategy::Ieee754Equality { negated })
                } else {
                    Some(IntrinsicStrategy::PrimitiveEquality { negated })
                }
            }
            Self::Compare => {
                if decl.name != "compareTo" {
                    return None;
                }
                let op = compare_op(token)?;
                if decl.builtin {
                    let (l, r) = (left?, right?);
                    if l.is_numeric() && r.is_numeric() {
                        Some(IntrinsicStrategy::PrimitiveCompare { op })
                    } else {
                        None
                    }
                } else {
                    Some(IntrinsicStrategy::CompareToCall { op })
                }
            }
            Self::Assignment => {
                if !decl.builtin {
                    return None;
                }
                let op = match decl.name.as_str() {
                    "plus" => ArithOp::Add,
                    "minus" => ArithOp::Sub,
                    "times" => ArithOp::Mul,
                    "div" => ArithOp::Div,
                    "rem" => ArithOp::Rem,
                    _ => return None,
                };
                Some(IntrinsicStrategy::CompoundAssign { op })
            }
        }
    }
}

fn compare_op(token: OperatorToken) -> Option<CompareOp> {
    match token {
        OperatorToken::Lt => Some(CompareOp::Lt),
        OperatorToken::LtEq => Some(CompareOp::Le),
        OperatorToken::Gt => Some(CompareOp::Gt),
        OperatorToken::GtEq => Some(CompareOp::Ge),
        _ => None,
    }
}

/// Effective operand types for a binary operator expression.
///
/// Two tiers: when the strict IEEE-754 comparison rule is active and the
/// frontend computed refinement info for this exact expression, use its
/// smart-cast-refined pair; otherwise ask the type table for each operand's
/// precise primitive type independently. Refinement is only computed for
/// expressions subject to the comparison rule, so the fallback is the common
/// path. The refinement's `comparison_type` is intentionally not consulted.
pub fn binary_operation_types(
    op: &BinaryOp,
    cx: &CodegenContext,
) -> (Option<PrimitiveType>, Option<PrimitiveType>) {
    if cx
        .settings
        .supports(LanguageFeature::ProperIeee754Comparisons)
    {
        if let Some(info) = cx.bindings.comparison_info(op.expr) {
            return (Some(info.left_type), Some(info.right_type));
        }
    }

    (
        cx.types.precise_primitive_type(op.left),
        cx.types.precise_primitive_type(op.right),
    )
}

/// Per-unit dispatch table for binary operator intrinsics
#[derive(Debug, Default)]
pub struct BinaryIntrinsics {
    cache: HashMap<IntrinsicKey, IntrinsicStrategy>,
}

impl BinaryIntrinsics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select (or recall) the emission strategy for one operator occurrence.
    ///
    /// Returns [`IntrinsicStrategy::None`] when the operator does not resolve
    /// to a concrete function declaration or no factory matches.
    pub fn get_intrinsic(&mut self, op: &BinaryOp, cx: &CodegenContext) -> IntrinsicStrategy {
        let Some(target) = cx.bindings.operator_target(op.expr) else {
            return IntrinsicStrategy::None;
        };
        let Some(decl) = cx.decl(target) else {
            return IntrinsicStrategy::None;
        };

        let (left, right) = binary_operation_types(op, cx);

        let key = IntrinsicKey {
            token: op.token,
            target,
            left,
            right,
        };
        if let Some(&cached) = self.cache.get(&key) {
            return cached;
        }

        let strategy = compute_intrinsic(op.token, decl, left, right);
        self.cache.insert(key, strategy);
        strategy
    }
}

fn compute_intrinsic(
    token: OperatorToken,
    decl: &DeclInfo,
    left: Option<PrimitiveType>,
    right: Option<PrimitiveType>,
) -> IntrinsicStrategy {
    for factory in FACTORY_PRIORITY {
        if factory.supports(token) {
            if let Some(strategy) = factory.build(decl, token, left, right) {
                return strategy;
            }
        }
    }
    IntrinsicStrategy::None
}
