//! Shared AST vocabulary consumed by the backend
//!
//! The frontend (parser + resolver) lives outside this crate; what crosses
//! the boundary is stable per-expression identities, spans for diagnostics,
//! and the closed set of binary operator tokens the backend dispatches on.

pub mod span;

pub use span::{Span, Spanned};

use serde::{Deserialize, Serialize};

/// Stable identity of an expression within one compilation unit.
///
/// Assigned by the frontend; the backend only compares and hashes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExprId(pub u32);

impl std::fmt::Display for ExprId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Binary operator tokens subject to intrinsic dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorToken {
    /// `==`
    EqEq,
    /// `!=`
    ExclEq,
    /// `===` (reference identity)
    EqEqEq,
    /// `!==`
    ExclEqEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `+=`
    PlusEq,
    /// `-=`
    MinusEq,
    /// `*=`
    MultEq,
    /// `/=`
    DivEq,
    /// `%=`
    RemEq,
}

impl OperatorToken {
    /// Equality family, including the identity variants
    pub fn is_equality(self) -> bool {
        matches!(
            self,
            Self::EqEq | Self::ExclEq | Self::EqEqEq | Self::ExclEqEq
        )
    }

    /// Reference identity comparison (`===` / `!==`)
    pub fn is_identity(self) -> bool {
        matches!(self, Self::EqEqEq | Self::ExclEqEq)
    }

    /// Negated comparison (`!=` / `!==`)
    pub fn is_negated(self) -> bool {
        matches!(self, Self::ExclEq | Self::ExclEqEq)
    }

    /// Ordering comparison (`<`, `>`, `<=`, `>=`)
    pub fn is_ordering(self) -> bool {
        matches!(self, Self::Lt | Self::Gt | Self::LtEq | Self::GtEq)
    }

    /// Compound assignment (`+=`, `-=`, `*=`, `/=`, `%=`)
    pub fn is_compound_assignment(self) -> bool {
        matches!(
            self,
            Self::PlusEq | Self::MinusEq | Self::MultEq | Self::DivEq | Self::RemEq
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_families_are_disjoint() {
        let all = [
            OperatorToken::EqEq,
            OperatorToken::ExclEq,
            OperatorToken::EqEqEq,
            OperatorToken::ExclEqEq,
            OperatorToken::Lt,
            OperatorToken::Gt,
            OperatorToken::LtEq,
            OperatorToken::GtEq,
            OperatorToken::PlusEq,
            OperatorToken::MinusEq,
            OperatorToken::MultEq,
            OperatorToken::DivEq,
            OperatorToken::RemEq,
        ];
        for token in all {
            let families = [
                token.is_equality(),
                token.is_ordering(),
                token.is_compound_assignment(),
            ];
            assert_eq!(families.iter().filter(|&&f| f).count(), 1);
        }
    }

    #[test]
    fn test_identity_tokens_are_equality() {
        assert!(OperatorToken::EqEqEq.is_equality());
        assert!(OperatorToken::EqEqEq.is_identity());
        assert!(!OperatorToken::EqEq.is_identity());
    }

    #[test]
    fn test_span_merge() {
        let a = Span::new(3, 7);
        let b = Span::new(5, 12);
        assert_eq!(a.merge(b), Span::new(3, 12));
    }
}
