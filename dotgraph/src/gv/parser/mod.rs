//! GraphViz file format parser and printer.

pub mod ast;
pub mod builder;
pub mod dump;
pub mod lexer;
pub mod parser;
pub mod printer;

pub use builder::Builder;
pub use dump::dump_ast;
pub use lexer::Lexer;
pub use lexer::Token;
pub use parser::DotParser;
pub use printer::Printer;
