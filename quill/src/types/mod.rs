//! Primitive-type model consumed from the type system
//!
//! The backend never runs inference itself: the type system publishes, per
//! expression, the statically known primitive type (if any), and the backend
//! reads it through [`TypeTable`]. Smart-cast refinement for numeric
//! comparisons arrives separately through the resolver's binding map.

use std::collections::HashMap;

use crate::ast::ExprId;

/// Built-in primitive types of the source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Bool,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    /// Numeric primitives (everything except Bool and Char)
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Bool | Self::Char)
    }

    /// Floating-point primitives, subject to IEEE-754 comparison rules
    pub fn is_floating(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    /// Integral primitives
    pub fn is_integral(self) -> bool {
        matches!(self, Self::Byte | Self::Short | Self::Int | Self::Long)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Char => "Char",
            Self::Byte => "Byte",
            Self::Short => "Short",
            Self::Int => "Int",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
        }
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-expression precise primitive types, as published by the type system.
///
/// "Precise" means the most specific static type after resolution, without
/// any control-flow-sensitive refinement. Expressions of non-primitive type
/// simply have no entry.
#[derive(Debug, Default)]
pub struct TypeTable {
    precise: HashMap<ExprId, PrimitiveType>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_precise_type(&mut self, expr: ExprId, ty: PrimitiveType) {
        self.precise.insert(expr, ty);
    }

    /// Precise primitive type of an expression, if it has one
    pub fn precise_primitive_type(&self, expr: ExprId) -> Option<PrimitiveType> {
        self.precise.get(&expr).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_classification() {
        assert!(PrimitiveType::Long.is_numeric());
        assert!(PrimitiveType::Double.is_numeric());
        assert!(!PrimitiveType::Bool.is_numeric());
        assert!(!PrimitiveType::Char.is_numeric());
        assert!(PrimitiveType::Float.is_floating());
        assert!(!PrimitiveType::Int.is_floating());
        assert!(PrimitiveType::Byte.is_integral());
    }

    #[test]
    fn test_table_lookup() {
        let mut table = TypeTable::new();
        table.set_precise_type(ExprId(1), PrimitiveType::Int);
        assert_eq!(
            table.precise_primitive_type(ExprId(1)),
            Some(PrimitiveType::Int)
        );
        assert_eq!(table.precise_primitive_type(ExprId(2)), None);
    }
}
