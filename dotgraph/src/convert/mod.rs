//! Conversions between the AST and the object model.

pub mod from_ast;
pub mod to_ast;

pub use from_ast::{FromAstConverter, FromAstOptions};
pub use to_ast::{ToAstConverter, ToAstOptions};
