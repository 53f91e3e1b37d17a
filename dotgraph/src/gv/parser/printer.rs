//! Prints the AST back into DOT text.
//!
//! Printing is dispatched through an ordered list of plugins: the first
//! plugin whose `matches` accepts a node prints it. Plugins recurse into the
//! children of a node through `PrintContext::print`, so a custom plugin list
//! can override the printing of any single node kind.

use super::ast::*;
use crate::error::{conversion_error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndentStyle {
    #[default]
    Space,
    Tab,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EndOfLine {
    #[default]
    Lf,
    Crlf,
}

impl EndOfLine {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndOfLine::Lf => "\n",
            EndOfLine::Crlf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    pub indent_style: IndentStyle,
    /// The number of spaces per level. Ignored for tabs.
    pub indent_size: usize,
    pub end_of_line: EndOfLine,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent_style: IndentStyle::Space,
            indent_size: 2,
            end_of_line: EndOfLine::Lf,
        }
    }
}

/// Prints one kind of AST node.
pub trait PrintPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool;
    fn print(
        &self,
        ctx: &mut PrintContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<String>;
}

/// The state of one print call.
pub struct PrintContext<'a> {
    plugins: &'a [Box<dyn PrintPlugin>],
    options: PrintOptions,
    /// Selects the edge operator. Set when entering a `Graph` node.
    pub directed: bool,
    depth: usize,
}

impl<'a> PrintContext<'a> {
    fn new(plugins: &'a [Box<dyn PrintPlugin>], options: PrintOptions) -> Self {
        Self {
            plugins,
            options,
            directed: true,
            depth: 0,
        }
    }

    /// Prints \p ast with the first plugin that accepts it.
    pub fn print(&mut self, ast: AstRef<'_>) -> Result<String> {
        let plugins = self.plugins;
        for plugin in plugins.iter() {
            if plugin.matches(ast) {
                return plugin.print(self, ast);
            }
        }
        conversion_error(format!("no print plugin accepts {:?}", ast.kind()))
    }

    pub fn eol(&self) -> &'static str {
        self.options.end_of_line.as_str()
    }

    /// \returns the indentation of the current nesting level.
    pub fn indent(&self) -> String {
        match self.options.indent_style {
            IndentStyle::Space => {
                " ".repeat(self.options.indent_size * self.depth)
            }
            IndentStyle::Tab => "\t".repeat(self.depth),
        }
    }

    // Prints each of \p children on its own line, one level deeper than the
    // current one. The first line is not indented.
    fn print_lines<'n, I>(&mut self, children: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = AstRef<'n>>,
    {
        self.depth += 1;
        let mut lines = Vec::new();
        for child in children {
            match self.print(child) {
                Result::Ok(text) => {
                    lines.push(format!("{}{}", self.indent(), text))
                }
                Result::Err(err) => {
                    self.depth -= 1;
                    return Result::Err(err);
                }
            }
        }
        self.depth -= 1;
        Result::Ok(lines)
    }

    /// Prints `header { children }`, or `header {}` without children.
    pub fn block<'n, I>(&mut self, header: &str, children: I) -> Result<String>
    where
        I: IntoIterator<Item = AstRef<'n>>,
    {
        let lines = self.print_lines(children)?;
        if lines.is_empty() {
            return Result::Ok(format!("{} {{}}", header));
        }
        let eol = self.eol();
        Result::Ok(format!(
            "{} {{{}{}{}{}}}",
            header,
            eol,
            lines.join(eol),
            eol,
            self.indent()
        ))
    }

    /// Prints `header [ children ];`, or `header;` without children.
    pub fn statement<'n, I>(
        &mut self,
        header: &str,
        children: I,
    ) -> Result<String>
    where
        I: IntoIterator<Item = AstRef<'n>>,
    {
        let lines = self.print_lines(children)?;
        if lines.is_empty() {
            return Result::Ok(format!("{};", header));
        }
        let eol = self.eol();
        Result::Ok(format!(
            "{} [{}{}{}{}];",
            header,
            eol,
            lines.join(eol),
            eol,
            self.indent()
        ))
    }
}

/// Escapes a literal for printing: NUL bytes are removed, and quotes that
/// are not already escaped, carriage returns and newlines are replaced by
/// their backslash sequences. Escaping an escaped string changes nothing.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev = Option::None;
    for ch in value.chars() {
        match ch {
            '\0' => continue,
            '"' if prev != Option::Some('\\') => out.push_str("\\\""),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
        prev = Option::Some(ch);
    }
    out
}

// Block comments end at the first `*/`, so that sequence is broken up
// there. Line comments keep it as written.
fn escape_comment(value: &str, kind: CommentKind) -> String {
    let value = value.replace('\0', "");
    match kind {
        CommentKind::Block => value.replace("*/", "* /"),
        CommentKind::Slash | CommentKind::Macro => value,
    }
}

pub struct DotPrintPlugin;
pub struct GraphPrintPlugin;
pub struct SubgraphPrintPlugin;
pub struct NodePrintPlugin;
pub struct EdgePrintPlugin;
pub struct NodeRefPrintPlugin;
pub struct NodeRefGroupPrintPlugin;
pub struct AttributeListPrintPlugin;
pub struct AttributePrintPlugin;
pub struct LiteralPrintPlugin;
pub struct CommentPrintPlugin;

impl PrintPlugin for DotPrintPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool {
        matches!(ast, AstRef::Dot(_))
    }
    fn print(
        &self,
        ctx: &mut PrintContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<String> {
        let AstRef::Dot(dot) = ast else {
            return conversion_error("expected a Dot node");
        };
        let mut parts = Vec::new();
        for child in dot.children() {
            parts.push(ctx.print(child.into())?);
        }
        Result::Ok(parts.join(ctx.eol()))
    }
}

impl PrintPlugin for GraphPrintPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool {
        matches!(ast, AstRef::Graph(_))
    }
    fn print(
        &self,
        ctx: &mut PrintContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<String> {
        let AstRef::Graph(graph) = ast else {
            return conversion_error("expected a Graph node");
        };
        let mut header = String::new();
        if graph.strict() {
            header.push_str("strict ");
        }
        header.push_str(if graph.directed() { "digraph" } else { "graph" });
        if let Option::Some(id) = graph.id() {
            header.push(' ');
            header.push_str(&ctx.print(id.into())?);
        }
        let saved = ctx.directed;
        ctx.directed = graph.directed();
        let res = ctx.block(&header, graph.children().iter().map(AstRef::from));
        ctx.directed = saved;
        res
    }
}

impl PrintPlugin for SubgraphPrintPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool {
        matches!(ast, AstRef::Subgraph(_))
    }
    fn print(
        &self,
        ctx: &mut PrintContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<String> {
        let AstRef::Subgraph(subgraph) = ast else {
            return conversion_error("expected a Subgraph node");
        };
        let mut header = "subgraph".to_string();
        if let Option::Some(id) = subgraph.id() {
            header.push(' ');
            header.push_str(&ctx.print(id.into())?);
        }
        ctx.block(&header, subgraph.children().iter().map(AstRef::from))
    }
}

impl PrintPlugin for NodePrintPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool {
        matches!(ast, AstRef::Node(_))
    }
    fn print(
        &self,
        ctx: &mut PrintContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<String> {
        let AstRef::Node(node) = ast else {
            return conversion_error("expected a Node node");
        };
        let header = ctx.print(node.id().into())?;
        ctx.statement(&header, node.children().iter().map(AstRef::from))
    }
}

impl PrintPlugin for EdgePrintPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool {
        matches!(ast, AstRef::Edge(_))
    }
    fn print(
        &self,
        ctx: &mut PrintContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<String> {
        let AstRef::Edge(edge) = ast else {
            return conversion_error("expected an Edge node");
        };
        let op = if ctx.directed { " -> " } else { " -- " };
        let mut targets = Vec::new();
        for target in edge.targets() {
            targets.push(ctx.print(target.into())?);
        }
        let header = targets.join(op);
        ctx.statement(&header, edge.children().iter().map(AstRef::from))
    }
}

impl PrintPlugin for NodeRefPrintPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool {
        matches!(ast, AstRef::NodeRef(_))
    }
    fn print(
        &self,
        ctx: &mut PrintContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<String> {
        let AstRef::NodeRef(node_ref) = ast else {
            return conversion_error("expected a NodeRef node");
        };
        let mut out = ctx.print(node_ref.id().into())?;
        if let Option::Some(port) = node_ref.port() {
            out.push(':');
            out.push_str(&ctx.print(port.into())?);
        }
        if let Option::Some(compass) = node_ref.compass() {
            out.push(':');
            out.push_str(&ctx.print(compass.into())?);
        }
        Result::Ok(out)
    }
}

impl PrintPlugin for NodeRefGroupPrintPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool {
        matches!(ast, AstRef::NodeRefGroup(_))
    }
    fn print(
        &self,
        ctx: &mut PrintContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<String> {
        let AstRef::NodeRefGroup(group) = ast else {
            return conversion_error("expected a NodeRefGroup node");
        };
        let mut refs = Vec::new();
        for child in group.children() {
            refs.push(ctx.print(child.into())?);
        }
        Result::Ok(format!("{{{}}}", refs.join(" ")))
    }
}

impl PrintPlugin for AttributeListPrintPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool {
        matches!(ast, AstRef::AttributeList(_))
    }
    fn print(
        &self,
        ctx: &mut PrintContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<String> {
        let AstRef::AttributeList(list) = ast else {
            return conversion_error("expected an AttributeList node");
        };
        let keyword = list.kind().keyword();
        // 'node;' is not valid DOT, so an empty list keeps its brackets.
        if list.children().is_empty() {
            return Result::Ok(format!("{} [];", keyword));
        }
        ctx.statement(keyword, list.children().iter().map(AstRef::from))
    }
}

impl PrintPlugin for AttributePrintPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool {
        matches!(ast, AstRef::Attribute(_))
    }
    fn print(
        &self,
        ctx: &mut PrintContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<String> {
        let AstRef::Attribute(attr) = ast else {
            return conversion_error("expected an Attribute node");
        };
        let key = ctx.print(attr.key().into())?;
        let value = ctx.print(attr.value().into())?;
        Result::Ok(format!("{} = {};", key, value))
    }
}

impl PrintPlugin for LiteralPrintPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool {
        matches!(ast, AstRef::Literal(_))
    }
    fn print(
        &self,
        _ctx: &mut PrintContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<String> {
        let AstRef::Literal(literal) = ast else {
            return conversion_error("expected a Literal node");
        };
        Result::Ok(match literal.quoted() {
            Quoting::Quoted => format!("\"{}\"", escape(literal.value())),
            // Pre-formed markup.
            Quoting::Html => format!("<{}>", literal.value()),
            Quoting::Unquoted => escape(literal.value()),
        })
    }
}

impl PrintPlugin for CommentPrintPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool {
        matches!(ast, AstRef::Comment(_))
    }
    fn print(
        &self,
        ctx: &mut PrintContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<String> {
        let AstRef::Comment(comment) = ast else {
            return conversion_error("expected a Comment node");
        };
        let value = escape_comment(comment.value(), comment.kind());
        let lines: Vec<&str> = value.lines().collect();
        let sep = format!("{}{}", ctx.eol(), ctx.indent());
        let prefixed = |marker: &str| -> Vec<String> {
            if lines.is_empty() {
                return vec![marker.to_string()];
            }
            lines
                .iter()
                .map(|line| {
                    if line.is_empty() {
                        marker.to_string()
                    } else {
                        format!("{} {}", marker, line)
                    }
                })
                .collect()
        };
        Result::Ok(match comment.kind() {
            CommentKind::Slash => prefixed("//").join(&sep),
            CommentKind::Macro => prefixed("#").join(&sep),
            CommentKind::Block => {
                let mut out = vec!["/**".to_string()];
                out.extend(prefixed(" *"));
                out.push(" */".to_string());
                out.join(&sep)
            }
        })
    }
}

/// \returns the stock list of print plugins, one per node kind.
pub fn default_plugins() -> Vec<Box<dyn PrintPlugin>> {
    vec![
        Box::new(DotPrintPlugin),
        Box::new(GraphPrintPlugin),
        Box::new(SubgraphPrintPlugin),
        Box::new(NodePrintPlugin),
        Box::new(EdgePrintPlugin),
        Box::new(NodeRefPrintPlugin),
        Box::new(NodeRefGroupPrintPlugin),
        Box::new(AttributeListPrintPlugin),
        Box::new(AttributePrintPlugin),
        Box::new(LiteralPrintPlugin),
        Box::new(CommentPrintPlugin),
    ]
}

/// Serializes AST nodes into DOT text.
pub struct Printer {
    options: PrintOptions,
    plugins: Vec<Box<dyn PrintPlugin>>,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(PrintOptions::default())
    }
}

impl Printer {
    pub fn new(options: PrintOptions) -> Self {
        Self::with_plugins(options, default_plugins())
    }

    pub fn with_plugins(
        options: PrintOptions,
        plugins: Vec<Box<dyn PrintPlugin>>,
    ) -> Self {
        Self { options, plugins }
    }

    /// Prints \p ast. Fails if no plugin accepts it, or if nothing would be
    /// printed (for example, a `Dot` node without children).
    pub fn print<'n>(&self, ast: impl Into<AstRef<'n>>) -> Result<String> {
        let ast = ast.into();
        let mut ctx = PrintContext::new(&self.plugins, self.options);
        let text = ctx.print(ast)?;
        if text.is_empty() {
            return conversion_error(format!(
                "printing the {:?} node produced no output",
                ast.kind()
            ));
        }
        log::trace!("printed {} bytes of DOT", text.len());
        Result::Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gv::parser::builder::Builder;
    use pretty_assertions::assert_eq;

    fn lit(b: &mut Builder, value: &str, quoted: Quoting) -> Literal {
        b.literal(value, quoted, None).unwrap()
    }

    #[test]
    fn escaping() {
        assert_eq!(escape("a\"b\nc"), "a\\\"b\\nc");
        assert_eq!(escape("a\\\"b"), "a\\\"b");
        assert_eq!(escape(&escape("x\"y\r\n")), escape("x\"y\r\n"));
        assert_eq!(escape("nul\0byte"), "nulbyte");
    }

    #[test]
    fn literals() {
        let mut b = Builder::default();
        let printer = Printer::default();
        let quoted = lit(&mut b, "plain text", Quoting::Quoted);
        assert_eq!(printer.print(&quoted).unwrap(), "\"plain text\"");
        let html = lit(&mut b, "<b>bold</b>", Quoting::Html);
        assert_eq!(printer.print(&html).unwrap(), "<<b>bold</b>>");
        let bare = lit(&mut b, "1.5", Quoting::Unquoted);
        assert_eq!(printer.print(&bare).unwrap(), "1.5");
    }

    #[test]
    fn comments() {
        let mut b = Builder::default();
        let printer = Printer::default();
        let c = b.comment(CommentKind::Slash, "one\ntwo", None).unwrap();
        assert_eq!(printer.print(&c).unwrap(), "// one\n// two");
        let c = b.comment(CommentKind::Macro, "m", None).unwrap();
        assert_eq!(printer.print(&c).unwrap(), "# m");
        let c = b.comment(CommentKind::Block, "a */ b\nc", None).unwrap();
        assert_eq!(printer.print(&c).unwrap(), "/**\n * a * / b\n * c\n */");
        let c = b.comment(CommentKind::Slash, "a */ b", None).unwrap();
        assert_eq!(printer.print(&c).unwrap(), "// a */ b");
    }

    #[test]
    fn undirected_edges_and_groups() {
        let mut b = Builder::default();
        let a = lit(&mut b, "a", Quoting::Quoted);
        let a = b.node_ref(a, None, None, None).unwrap();
        let x = lit(&mut b, "x", Quoting::Quoted);
        let x = b.node_ref(x, None, None, None).unwrap();
        let y = lit(&mut b, "y", Quoting::Quoted);
        let port = lit(&mut b, "p", Quoting::Quoted);
        let compass = lit(&mut b, "ne", Quoting::Unquoted);
        let y = b.node_ref(y, Some(port), Some(compass), None).unwrap();
        let group = b.node_ref_group(vec![x, y], None).unwrap();
        let targets = vec![EdgeTarget::NodeRef(a), EdgeTarget::Group(group)];
        let edge = b.edge(targets, vec![], None).unwrap();
        let graph = b
            .graph(false, true, None, vec![Statement::Edge(edge)], None)
            .unwrap();
        assert_eq!(
            Printer::default().print(&graph).unwrap(),
            "strict graph {\n  \"a\" -- {\"x\" \"y\":\"p\":ne};\n}"
        );
    }

    #[test]
    fn empty_dot_is_an_error() {
        let mut b = Builder::default();
        let dot = b.dot(vec![], None).unwrap();
        assert!(Printer::default().print(&dot).is_err());
    }

    #[test]
    fn tabs_and_crlf() {
        let mut b = Builder::default();
        let k = lit(&mut b, "rankdir", Quoting::Unquoted);
        let v = lit(&mut b, "LR", Quoting::Quoted);
        let attr = b.attribute(k, v, None).unwrap();
        let sub = b
            .subgraph(None, vec![Statement::Attribute(attr)], None)
            .unwrap();
        let options = PrintOptions {
            indent_style: IndentStyle::Tab,
            indent_size: 4,
            end_of_line: EndOfLine::Crlf,
        };
        assert_eq!(
            Printer::new(options).print(&sub).unwrap(),
            "subgraph {\r\n\trankdir = \"LR\";\r\n}"
        );
    }

    #[test]
    fn missing_plugin() {
        let mut b = Builder::default();
        let c = b.comment(CommentKind::Slash, "x", None).unwrap();
        let printer = Printer::with_plugins(
            PrintOptions::default(),
            vec![Box::new(LiteralPrintPlugin)],
        );
        assert!(matches!(
            printer.print(&c),
            Result::Err(crate::error::Error::Conversion(_))
        ));
    }
}
