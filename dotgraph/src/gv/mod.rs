//! A module that contains everything that has to do with the DOT text format
//! (lexing, parsing, building the AST and printing it back).

pub mod parser;

pub use parser::ast;
pub use parser::dump_ast;
pub use parser::Builder;
pub use parser::DotParser;
pub use parser::Lexer;
pub use parser::Printer;
pub use parser::Token;
