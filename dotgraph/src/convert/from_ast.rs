//! Converts AST nodes into object model entities.

use crate::error::{conversion_error, Result};
use crate::gv::parser::ast::{
    self, AstRef, AttributeItem, Compass, Location, Quoting,
    Statement,
};
use crate::model::{
    AttributeValue, AttributesGroup, Cluster, DefaultModels, EdgeTarget,
    ForwardRef, HasAttributes, Model, ModelFactory,
};

/// The options of the AST→Model conversion.
pub struct FromAstOptions {
    /// Creates the entities that the converter fills in.
    pub models: Box<dyn ModelFactory>,
}

impl Default for FromAstOptions {
    fn default() -> Self {
        Self {
            models: Box::new(DefaultModels),
        }
    }
}

/// Converts one kind of AST node.
pub trait FromAstPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool;
    fn convert(
        &self,
        ctx: &FromAstContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<Model>;
}

pub struct FromAstContext<'a> {
    pub models: &'a dyn ModelFactory,
    plugins: &'a [Box<dyn FromAstPlugin>],
}

impl FromAstContext<'_> {
    /// Converts \p ast with the first plugin that accepts it.
    pub fn convert(&self, ast: AstRef<'_>) -> Result<Model> {
        for plugin in self.plugins.iter() {
            if plugin.matches(ast) {
                return plugin.convert(self, ast);
            }
        }
        conversion_error(format!(
            "no conversion plugin accepts a {:?} node",
            ast.kind()
        ))
    }

    /// Applies the statements of a graph or a subgraph to \p cluster, in
    /// document order.
    pub fn apply_statements<C: Cluster>(
        &self,
        cluster: &mut C,
        stmts: &[Statement],
    ) -> Result<()> {
        let mut holder = CommentHolder::default();
        for stmt in stmts {
            match stmt {
                Statement::Comment(c) => holder.set(c),
                Statement::Attribute(attr) => {
                    let value = attribute_value(attr.value());
                    cluster.set(attr.key().value(), value);
                    holder.reset();
                }
                Statement::AttributeList(list) => {
                    let defaults = cluster.defaults_mut().get_mut(list.kind());
                    for (key, value) in attribute_pairs(list.children()) {
                        defaults.set(key, value);
                    }
                    holder.reset();
                }
                Statement::Node(n) => {
                    let id = n.id().value();
                    let models = self.models;
                    let node =
                        cluster.node_or_insert_with(id, || models.node(id));
                    apply_attribute_items(node.attributes_mut(), n.children());
                    holder.apply(&mut node.comment, n.location());
                }
                Statement::Edge(e) => {
                    let mut edge = self.models.edge(edge_targets(e)?)?;
                    apply_attribute_items(edge.attributes_mut(), e.children());
                    holder.apply(&mut edge.comment, e.location());
                    cluster.add_edge(edge);
                }
                Statement::Subgraph(s) => {
                    let models = self.models;
                    let subgraph = match s.id() {
                        Option::Some(id) => {
                            let id = id.value();
                            cluster.subgraph_or_insert_with(id, || {
                                models.subgraph(Option::Some(id))
                            })
                        }
                        Option::None => {
                            cluster.add_subgraph(models.subgraph(Option::None))
                        }
                    };
                    self.apply_statements(subgraph, s.children())?;
                    let mut comment = subgraph.comment().map(String::from);
                    holder.apply(&mut comment, s.location());
                    subgraph.set_comment(comment);
                }
            }
        }
        Result::Ok(())
    }
}

// Holds the last comment seen in a statement list, until the next statement
// either claims it or discards it.
#[derive(Default)]
struct CommentHolder<'a> {
    comment: Option<&'a ast::Comment>,
}

impl<'a> CommentHolder<'a> {
    fn set(&mut self, comment: &'a ast::Comment) {
        self.comment = Option::Some(comment);
    }

    fn reset(&mut self) {
        self.comment = Option::None;
    }

    // Attaches the held comment to the statement at \p location, if the
    // comment is adjacent to it. The holder is empty afterwards.
    fn apply(
        &mut self,
        target: &mut Option<String>,
        location: Option<Location>,
    ) {
        if let Option::Some(comment) = self.comment.take() {
            if is_adjacent(comment, location) {
                *target = Option::Some(comment.value().to_string());
            }
        }
    }
}

/// \returns true if \p comment belongs to the statement at \p location:
/// the comment, of any kind, ends on the line right before the one where
/// the statement starts. Nodes without a location are always adjacent.
fn is_adjacent(comment: &ast::Comment, location: Option<Location>) -> bool {
    match (comment.location(), location) {
        (Option::Some(c), Option::Some(s)) => c.end.line + 1 == s.start.line,
        _ => true,
    }
}

/// Rebuilds the model value of a literal. HTML-like literals get their
/// angle brackets back, and bare literals that spell a boolean or a number
/// become one.
pub fn attribute_value(literal: &ast::Literal) -> AttributeValue {
    let text = literal.value();
    match literal.quoted() {
        Quoting::Html => AttributeValue::String(format!("<{}>", text)),
        Quoting::Quoted => AttributeValue::from(text),
        Quoting::Unquoted => match text {
            "true" => AttributeValue::Bool(true),
            "false" => AttributeValue::Bool(false),
            _ => match parse_number(text) {
                Option::Some(n) => AttributeValue::Number(n),
                Option::None => AttributeValue::from(text),
            },
        },
    }
}

// Only numerals whose canonical form is the source text, so that printing
// the number gives back the same text.
fn parse_number(text: &str) -> Option<f64> {
    let first = text.chars().next()?;
    if !(first.is_ascii_digit() || first == '-' || first == '.') {
        return Option::None;
    }
    let n: f64 = text.parse().ok()?;
    if n.to_string() == text {
        Option::Some(n)
    } else {
        Option::None
    }
}

fn attribute_pairs(
    items: &[AttributeItem],
) -> impl Iterator<Item = (&str, AttributeValue)> {
    items.iter().filter_map(|item| match item {
        AttributeItem::Attribute(a) => {
            Option::Some((a.key().value(), attribute_value(a.value())))
        }
        AttributeItem::Comment(_) => Option::None,
    })
}

// A comment inside of `[ ... ]` becomes the comment of the group.
fn apply_attribute_items(group: &mut AttributesGroup, items: &[AttributeItem]) {
    for item in items {
        match item {
            AttributeItem::Attribute(a) => {
                group.set(a.key().value(), attribute_value(a.value()));
            }
            AttributeItem::Comment(c) => {
                group.comment = Option::Some(c.value().to_string());
            }
        }
    }
}

fn forward_ref(r: &ast::NodeRef) -> Result<ForwardRef> {
    let compass = match r.compass() {
        Option::Some(lit) => match Compass::parse(lit.value()) {
            Option::Some(c) => Option::Some(c),
            Option::None => {
                return conversion_error(format!(
                    "'{}' is not a compass point",
                    lit.value()
                ));
            }
        },
        Option::None => Option::None,
    };
    Result::Ok(ForwardRef {
        id: r.id().value().to_string(),
        port: r.port().map(|p| p.value().to_string()),
        compass,
    })
}

fn edge_targets(edge: &ast::Edge) -> Result<Vec<EdgeTarget>> {
    let mut targets = Vec::new();
    for target in edge.targets() {
        targets.push(match target {
            ast::EdgeTarget::NodeRef(r) => EdgeTarget::Ref(forward_ref(r)?),
            ast::EdgeTarget::Group(g) => {
                let refs: Result<Vec<ForwardRef>> =
                    g.children().iter().map(forward_ref).collect();
                EdgeTarget::Group(refs?)
            }
        });
    }
    Result::Ok(targets)
}

pub struct DotFromAstPlugin;
pub struct GraphFromAstPlugin;
pub struct SubgraphFromAstPlugin;
pub struct NodeFromAstPlugin;
pub struct EdgeFromAstPlugin;

impl FromAstPlugin for DotFromAstPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool {
        matches!(ast, AstRef::Dot(_))
    }
    fn convert(
        &self,
        ctx: &FromAstContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<Model> {
        let AstRef::Dot(dot) = ast else {
            return conversion_error("expected a Dot node");
        };
        let mut holder = CommentHolder::default();
        for item in dot.children() {
            match item {
                ast::DotItem::Comment(c) => holder.set(c),
                ast::DotItem::Graph(g) => {
                    let Model::Graph(mut graph) = ctx.convert(g.into())? else {
                        return conversion_error(
                            "a graph did not convert to a root graph",
                        );
                    };
                    let mut comment = Option::None;
                    holder.apply(&mut comment, g.location());
                    graph.set_comment(comment);
                    return Result::Ok(Model::Graph(graph));
                }
            }
        }
        conversion_error("the Dot node has no graph")
    }
}

impl FromAstPlugin for GraphFromAstPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool {
        matches!(ast, AstRef::Graph(_))
    }
    fn convert(
        &self,
        ctx: &FromAstContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<Model> {
        let AstRef::Graph(g) = ast else {
            return conversion_error("expected a Graph node");
        };
        let id = g.id().map(|id| id.value());
        let mut graph = if g.directed() {
            ctx.models.digraph(id, g.strict())
        } else {
            ctx.models.graph(id, g.strict())
        };
        ctx.apply_statements(&mut graph, g.children())?;
        Result::Ok(Model::Graph(graph))
    }
}

impl FromAstPlugin for SubgraphFromAstPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool {
        matches!(ast, AstRef::Subgraph(_))
    }
    fn convert(
        &self,
        ctx: &FromAstContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<Model> {
        let AstRef::Subgraph(s) = ast else {
            return conversion_error("expected a Subgraph node");
        };
        let mut subgraph = ctx.models.subgraph(s.id().map(|id| id.value()));
        ctx.apply_statements(&mut subgraph, s.children())?;
        Result::Ok(Model::Subgraph(subgraph))
    }
}

impl FromAstPlugin for NodeFromAstPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool {
        matches!(ast, AstRef::Node(_))
    }
    fn convert(
        &self,
        ctx: &FromAstContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<Model> {
        let AstRef::Node(n) = ast else {
            return conversion_error("expected a Node node");
        };
        let mut node = ctx.models.node(n.id().value());
        apply_attribute_items(node.attributes_mut(), n.children());
        Result::Ok(Model::Node(node))
    }
}

impl FromAstPlugin for EdgeFromAstPlugin {
    fn matches(&self, ast: AstRef<'_>) -> bool {
        matches!(ast, AstRef::Edge(_))
    }
    fn convert(
        &self,
        ctx: &FromAstContext<'_>,
        ast: AstRef<'_>,
    ) -> Result<Model> {
        let AstRef::Edge(e) = ast else {
            return conversion_error("expected an Edge node");
        };
        let mut edge = ctx.models.edge(edge_targets(e)?)?;
        apply_attribute_items(edge.attributes_mut(), e.children());
        Result::Ok(Model::Edge(edge))
    }
}

/// \returns the stock list of AST→Model plugins.
pub fn default_plugins() -> Vec<Box<dyn FromAstPlugin>> {
    vec![
        Box::new(DotFromAstPlugin),
        Box::new(GraphFromAstPlugin),
        Box::new(SubgraphFromAstPlugin),
        Box::new(NodeFromAstPlugin),
        Box::new(EdgeFromAstPlugin),
    ]
}

/// Converts AST nodes into model entities. Only `Dot`, `Graph`,
/// `Subgraph`, `Node` and `Edge` nodes can be converted.
pub struct FromAstConverter {
    options: FromAstOptions,
    plugins: Vec<Box<dyn FromAstPlugin>>,
}

impl Default for FromAstConverter {
    fn default() -> Self {
        Self::new(FromAstOptions::default())
    }
}

impl FromAstConverter {
    pub fn new(options: FromAstOptions) -> Self {
        Self::with_plugins(options, default_plugins())
    }

    pub fn with_plugins(
        options: FromAstOptions,
        plugins: Vec<Box<dyn FromAstPlugin>>,
    ) -> Self {
        Self { options, plugins }
    }

    pub fn convert<'a>(&self, ast: impl Into<AstRef<'a>>) -> Result<Model> {
        let ast = ast.into();
        let ctx = FromAstContext {
            models: self.options.models.as_ref(),
            plugins: &self.plugins,
        };
        let model = ctx.convert(ast)?;
        log::debug!(
            "converted a {:?} node into a {:?} model",
            ast.kind(),
            model.kind()
        );
        Result::Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::gv::parser::parser::{DotParser, StartRule};
    use crate::model::{Node, RootGraph};

    fn graph_of(input: &str) -> RootGraph {
        let dot = DotParser::new(input).process().unwrap();
        FromAstConverter::default()
            .convert(&dot)
            .unwrap()
            .into_graph()
            .unwrap()
    }

    #[test]
    fn statements_are_applied() {
        let g = graph_of(
            "strict digraph G {
               rankdir = LR;
               node [shape = box];
               node [shape = circle, color = red];
               a [label = <<b>A</b>>];
               a [width = 1.5];
               a -> {b c} [weight = 2];
               subgraph cluster_0 { d; }
               subgraph cluster_0 { e; }
               subgraph { f; }
             }",
        );
        assert!(g.directed());
        assert!(g.strict());
        assert_eq!(g.id(), Some("G"));
        assert_eq!(g.get("rankdir"), Some(&AttributeValue::from("LR")));

        let node_defaults = &g.defaults().node;
        assert_eq!(node_defaults.get("shape"), Some(&AttributeValue::from("circle")));
        assert_eq!(node_defaults.get("color"), Some(&AttributeValue::from("red")));

        let a = g.get_node("a").unwrap();
        assert_eq!(a.get("label"), Some(&AttributeValue::from("<<b>A</b>>")));
        assert_eq!(a.get("width"), Some(&AttributeValue::Number(1.5)));
        assert_eq!(g.nodes().count(), 1);

        let edge = &g.edges()[0];
        assert_eq!(edge.get("weight"), Some(&AttributeValue::Number(2.0)));
        assert!(matches!(&edge.targets()[1], EdgeTarget::Group(refs) if refs.len() == 2));

        assert_eq!(g.subgraphs().len(), 2);
        let cluster = g.get_subgraph("cluster_0").unwrap();
        assert!(cluster.is_cluster());
        assert_eq!(cluster.nodes().count(), 2);
    }

    #[test]
    fn value_kinds() {
        let mut b = crate::gv::parser::builder::Builder::default();
        let mut lit = |v: &str, q: Quoting| b.literal(v, q, None).unwrap();
        assert_eq!(attribute_value(&lit("true", Quoting::Unquoted)), AttributeValue::Bool(true));
        assert_eq!(attribute_value(&lit("true", Quoting::Quoted)), AttributeValue::from("true"));
        assert_eq!(attribute_value(&lit("-3", Quoting::Unquoted)), AttributeValue::Number(-3.0));
        assert_eq!(attribute_value(&lit("1.50", Quoting::Unquoted)), AttributeValue::from("1.50"));
        assert_eq!(attribute_value(&lit("inf", Quoting::Unquoted)), AttributeValue::from("inf"));
        assert_eq!(attribute_value(&lit("x", Quoting::Html)), AttributeValue::from("<x>"));
    }

    #[test]
    fn comments_attach_to_adjacent_statements() {
        let g = graph_of(
            "digraph {\n// note\na -> b;\n\n// lost\n\nc;\n/* same line */ d;\n\
             /* above\n */\ne;\n}",
        );
        assert_eq!(g.edges()[0].comment.as_deref(), Some("note"));
        assert_eq!(g.get_node("c").unwrap().comment, None);
        assert_eq!(g.get_node("d").unwrap().comment, None);
        assert_eq!(g.get_node("e").unwrap().comment.as_deref(), Some("above"));
    }

    #[test]
    fn attribute_statements_drop_comments() {
        let g = graph_of("graph {\n// about color\ncolor = red;\na;\n}");
        assert_eq!(g.get_node("a").unwrap().comment, None);
    }

    #[test]
    fn comments_inside_attribute_lists() {
        let g = graph_of("graph {\na [\n// inner\nshape = box\n];\n}");
        let a = g.get_node("a").unwrap();
        assert_eq!(a.attributes().comment.as_deref(), Some("inner"));
        assert!(a.get("shape").is_some());
    }

    #[test]
    fn fragments() {
        let ast = DotParser::new("a -> b:p:n [color = red]")
            .process_rule(StartRule::Edge)
            .unwrap()
            .into_node()
            .unwrap();
        let edge = FromAstConverter::default()
            .convert(&ast)
            .unwrap()
            .into_edge()
            .unwrap();
        let EdgeTarget::Ref(to) = &edge.targets()[1] else {
            panic!("expected a single target");
        };
        assert_eq!(to.port.as_deref(), Some("p"));
        assert_eq!(to.compass, Some(Compass::N));
    }

    #[test]
    fn unsupported_roots() {
        let ast = DotParser::new("color = red")
            .process_rule(StartRule::Attribute)
            .unwrap()
            .into_node()
            .unwrap();
        assert!(matches!(
            FromAstConverter::default().convert(&ast),
            Result::Err(Error::Conversion(_))
        ));
    }

    struct TaggedModels;

    impl ModelFactory for TaggedModels {
        fn node(&self, id: &str) -> Node {
            let mut node = Node::new(id);
            node.set("tagged", true);
            node
        }
    }

    #[test]
    fn custom_models() {
        let converter = FromAstConverter::new(FromAstOptions {
            models: Box::new(TaggedModels),
        });
        let dot = DotParser::new("graph { a; b [x = 1]; }").process().unwrap();
        let g = converter.convert(&dot).unwrap().into_graph().unwrap();
        for node in g.nodes() {
            assert_eq!(node.get("tagged"), Some(&AttributeValue::Bool(true)));
        }
        assert_eq!(g.nodes().count(), 2);
    }
}
