//! Quill Compiler Backend Core
//!
//! The context-sensitive decision engines of the Quill code generator:
//! inline-call expansion (session stack + recursion cycle detection) and
//! intrinsic dispatch for binary operators. Parsing, resolution and the
//! emitting backend are external collaborators consumed through the
//! `ast`/`resolve`/`types` boundary types.

pub mod ast;
pub mod codegen;
pub mod config;
pub mod diag;
pub mod error;
pub mod resolve;
pub mod types;

pub use ast::{ExprId, OperatorToken, Span, Spanned};
pub use error::{CompileError, Result};
