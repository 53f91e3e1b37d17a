/*!
This crate provides a library for reading, editing and writing GraphViz DOT
files. It is built as a pipeline:

```txt
DOT text -> [parser] -> AST -> [from_ast] -> model -> [to_ast] -> AST -> [printer] -> DOT text
```

The AST is an exact, immutable representation of a file, including its
comments. The object model is a mutable graph that applications build and
edit. Either one can be printed back as canonical DOT text.

# Parser example: parse a dot file and print it back

```rust
    let contents = "digraph { a -> b [label=\"foo\"]; }";
    match dotgraph::parse(contents) {
        Result::Err(err) => {
            log::error!("Error: {}", err);
        }
        Result::Ok(dot) => {
            let text = dotgraph::stringify(&dot).unwrap();
            assert_eq!(text, "digraph {\n  a -> b [\n    label = \"foo\";\n  ];\n}");
        }
    }
```

Syntax errors carry the location of the offending token, and can render the
line that contains it:

```rust
    let contents = "digraph {\n  a -> ;\n}";
    if let Result::Err(dotgraph::Error::Syntax(err)) = dotgraph::parse(contents) {
        println!("{}\n{}", err, err.snippet(contents));
    }
```

# Model example: build a graph

```rust
    use dotgraph::model::{Cluster, HasAttributes, RootGraph};

    let mut g = RootGraph::digraph();
    g.create_edge(["a", "b"], [("label", "x")]).unwrap();
    let text = dotgraph::to_dot(&g).unwrap();
    assert_eq!(text, "digraph {\n  \"a\" -> \"b\" [\n    label = \"x\";\n  ];\n}");

    let back = dotgraph::from_dot(&text).unwrap();
    assert_eq!(back.edges()[0].get("label").unwrap().to_string(), "x");
```
*/

pub mod adt;
pub mod convert;
pub mod error;
pub mod gv;
pub mod model;

pub use convert::{
    FromAstConverter, FromAstOptions, ToAstConverter, ToAstOptions,
};
pub use error::{Error, Result, SyntaxError};
pub use gv::parser::parser::{ParseOptions, ParseOutput, StartRule};
pub use gv::parser::printer::{EndOfLine, IndentStyle, PrintOptions};
pub use model::{Model, ModelRef, RootGraph};

use gv::parser::ast::{AstRef, Dot};
use gv::parser::{DotParser, Printer};

/// Parses a whole DOT file.
pub fn parse(input: &str) -> Result<Dot> {
    DotParser::new(input).process()
}

/// Parses \p input starting from `options.start_rule`.
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<ParseOutput> {
    DotParser::with_options(input, options).process_rule(options.start_rule)
}

/// Prints \p ast as DOT text with the default formatting.
pub fn stringify<'a>(ast: impl Into<AstRef<'a>>) -> Result<String> {
    stringify_with(ast, &PrintOptions::default())
}

pub fn stringify_with<'a>(
    ast: impl Into<AstRef<'a>>,
    options: &PrintOptions,
) -> Result<String> {
    Printer::new(*options).print(ast)
}

/// The options of `to_dot_with`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToDotOptions {
    pub convert: ToAstOptions,
    pub print: PrintOptions,
}

/// The options of `from_dot_with`.
#[derive(Default)]
pub struct FromDotOptions {
    pub parse: ParseOptions,
    pub convert: FromAstOptions,
}

/// Prints the model entity \p model as DOT text.
pub fn to_dot<'a>(model: impl Into<ModelRef<'a>>) -> Result<String> {
    to_dot_with(model, &ToDotOptions::default())
}

pub fn to_dot_with<'a>(
    model: impl Into<ModelRef<'a>>,
    options: &ToDotOptions,
) -> Result<String> {
    let ast = ToAstConverter::new(options.convert).convert(model)?;
    stringify_with(&ast, &options.print)
}

/// Parses a DOT file into a root graph.
pub fn from_dot(input: &str) -> Result<RootGraph> {
    let dot = parse(input)?;
    match FromAstConverter::default().convert(&dot)? {
        Model::Graph(graph) => Result::Ok(graph),
        other => Result::Err(Error::Conversion(format!(
            "expected a root graph, found a {:?}",
            other.kind()
        ))),
    }
}

/// Parses \p input starting from `options.parse.start_rule`, and converts the
/// result into a model entity. Fragments that are not a graph, a subgraph, a
/// node or an edge can't be converted.
pub fn from_dot_with(input: &str, options: FromDotOptions) -> Result<Model> {
    let node = match parse_with(input, &options.parse)? {
        ParseOutput::Node(node) => node,
        ParseOutput::Statements(_) => {
            return Result::Err(Error::Conversion(
                "a statement list can't be converted into a model".to_string(),
            ));
        }
    };
    FromAstConverter::new(options.convert).convert(&node)
}
