//! Converts object model entities into AST nodes.
//!
//! Like the printer, the conversion is dispatched through an ordered list of
//! plugins, and the first plugin that matches a model entity converts it.

use crate::error::{conversion_error, Result};
use crate::gv::parser::ast::{
    self, AstNode, AttributeItem, CommentKind, Quoting, Statement,
};
use crate::gv::parser::builder::{Builder, DEFAULT_MAX_AST_NODES};
use crate::model::{
    AttributeValue, Attributes, AttributesGroup, Cluster, EdgeTarget,
    ForwardRef, HasAttributes, ModelRef, RootGraph, Subgraph,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToAstOptions {
    /// The syntax of every emitted comment.
    pub comment_kind: CommentKind,
    pub max_ast_nodes: usize,
}

impl Default for ToAstOptions {
    fn default() -> Self {
        Self {
            comment_kind: CommentKind::Slash,
            max_ast_nodes: DEFAULT_MAX_AST_NODES,
        }
    }
}

/// Converts one kind of model entity.
pub trait ToAstPlugin {
    fn matches(&self, model: ModelRef<'_>) -> bool;
    fn convert(
        &self,
        ctx: &mut ToAstContext<'_>,
        model: ModelRef<'_>,
    ) -> Result<AstNode>;
}

/// The state of one conversion: the comment syntax, and the builder that
/// counts the nodes created by this conversion.
pub struct ToAstContext<'a> {
    pub comment_kind: CommentKind,
    pub builder: Builder,
    plugins: &'a [Box<dyn ToAstPlugin>],
}

impl ToAstContext<'_> {
    /// Converts \p model with the first plugin that accepts it.
    pub fn convert(&mut self, model: ModelRef<'_>) -> Result<AstNode> {
        let plugins = self.plugins;
        for plugin in plugins.iter() {
            if plugin.matches(model) {
                return plugin.convert(self, model);
            }
        }
        conversion_error(format!(
            "no conversion plugin accepts {:?}",
            model.kind()
        ))
    }

    fn convert_statement(&mut self, model: ModelRef<'_>) -> Result<Statement> {
        let kind = model.kind();
        match self.convert(model)?.into_statement() {
            Option::Some(stmt) => Result::Ok(stmt),
            Option::None => conversion_error(format!(
                "the {:?} model did not convert to a statement",
                kind
            )),
        }
    }

    pub fn comment(&mut self, value: &str) -> Result<ast::Comment> {
        self.builder.comment(self.comment_kind, value, Option::None)
    }

    fn attribute_items(
        &mut self,
        attrs: &Attributes,
    ) -> Result<Vec<AttributeItem>> {
        let mut items = Vec::new();
        for (key, value) in attrs.iter() {
            let attr = convert_attribute(&mut self.builder, key, value)?;
            items.push(AttributeItem::Attribute(attr));
        }
        Result::Ok(items)
    }

    // The children of a node or an edge: the group comment, followed by
    // the attributes.
    fn group_items(
        &mut self,
        group: &AttributesGroup,
    ) -> Result<Vec<AttributeItem>> {
        let mut items = Vec::new();
        if let Option::Some(comment) = &group.comment {
            items.push(AttributeItem::Comment(self.comment(comment)?));
        }
        items.extend(self.attribute_items(group.attribute_map())?);
        Result::Ok(items)
    }

    fn push_comment(
        &mut self,
        stmts: &mut Vec<Statement>,
        comment: Option<&str>,
    ) -> Result<()> {
        if let Option::Some(comment) = comment {
            stmts.push(Statement::Comment(self.comment(comment)?));
        }
        Result::Ok(())
    }

    /// Converts the contents of a graph or a subgraph. The statements are
    /// always emitted in this order: the attributes of the graph, the
    /// non-empty default lists (graph, node, edge), the nodes, the
    /// subgraphs, and the edges. Every child is preceded by its comment.
    pub fn cluster_statements<C: Cluster>(
        &mut self,
        cluster: &C,
    ) -> Result<Vec<Statement>> {
        let mut stmts = Vec::new();
        for (key, value) in cluster.attribute_map().iter() {
            let attr = convert_attribute(&mut self.builder, key, value)?;
            stmts.push(Statement::Attribute(attr));
        }
        for list in cluster.defaults().iter() {
            if list.is_empty() {
                continue;
            }
            self.push_comment(&mut stmts, list.comment.as_deref())?;
            let items = self.attribute_items(list.attribute_map())?;
            let list =
                self.builder
                    .attribute_list(list.kind(), items, Option::None)?;
            stmts.push(Statement::AttributeList(list));
        }
        for node in cluster.nodes() {
            self.push_comment(&mut stmts, node.comment.as_deref())?;
            stmts.push(self.convert_statement(node.into())?);
        }
        for subgraph in cluster.subgraphs() {
            self.push_comment(&mut stmts, subgraph.comment())?;
            stmts.push(self.convert_statement(subgraph.into())?);
        }
        for edge in cluster.edges() {
            self.push_comment(&mut stmts, edge.comment.as_deref())?;
            stmts.push(self.convert_statement(edge.into())?);
        }
        Result::Ok(stmts)
    }

    fn id(&mut self, id: Option<&str>) -> Result<Option<ast::Literal>> {
        match id {
            Option::Some(id) => Result::Ok(Option::Some(self.builder.literal(
                id,
                Quoting::Quoted,
                Option::None,
            )?)),
            Option::None => Result::Ok(Option::None),
        }
    }

    fn node_ref(&mut self, r: &ForwardRef) -> Result<ast::NodeRef> {
        let b = &mut self.builder;
        let id = b.literal(r.id.as_str(), Quoting::Quoted, Option::None)?;
        let port = match &r.port {
            Option::Some(port) => Option::Some(b.literal(
                port.as_str(),
                Quoting::Quoted,
                Option::None,
            )?),
            Option::None => Option::None,
        };
        let compass = match r.compass {
            Option::Some(compass) => Option::Some(b.literal(
                compass.as_str(),
                Quoting::Unquoted,
                Option::None,
            )?),
            Option::None => Option::None,
        };
        self.builder.node_ref(id, port, compass, Option::None)
    }
}

/// \returns true if \p value is written as an HTML-like string: after
/// trimming, it starts with '<', ends with '>', and has something in
/// between.
pub fn is_html_like(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.starts_with('<')
        && trimmed.ends_with('>')
        && trimmed.chars().count() >= 3
}

// Attribute keys are printed bare when they are plain identifiers.
fn is_plain_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Option::Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Converts one attribute. HTML-like strings become `Html` literals without
/// their outer angle brackets, other strings become quoted literals, and
/// numbers and booleans become bare literals.
pub fn convert_attribute(
    builder: &mut Builder,
    key: &str,
    value: &AttributeValue,
) -> Result<ast::Attribute> {
    let key_quoting = if is_plain_identifier(key) {
        Quoting::Unquoted
    } else {
        Quoting::Quoted
    };
    let key = builder.literal(key, key_quoting, Option::None)?;
    let value = match value {
        AttributeValue::String(s) if is_html_like(s) => {
            let trimmed = s.trim();
            let inner = &trimmed[1..trimmed.len() - 1];
            builder.literal(inner, Quoting::Html, Option::None)?
        }
        AttributeValue::String(s) => {
            builder.literal(s.as_str(), Quoting::Quoted, Option::None)?
        }
        other => {
            builder.literal(other.to_string(), Quoting::Unquoted, Option::None)?
        }
    };
    builder.attribute(key, value, Option::None)
}

pub struct GraphToAstPlugin;
pub struct SubgraphToAstPlugin;
pub struct NodeToAstPlugin;
pub struct EdgeToAstPlugin;

impl GraphToAstPlugin {
    fn convert_graph(
        &self,
        ctx: &mut ToAstContext<'_>,
        graph: &RootGraph,
    ) -> Result<AstNode> {
        let mut items = Vec::new();
        if let Option::Some(comment) = graph.comment() {
            items.push(ast::DotItem::Comment(ctx.comment(comment)?));
        }
        let id = ctx.id(graph.id())?;
        let children = ctx.cluster_statements(graph)?;
        let graph = ctx.builder.graph(
            graph.directed(),
            graph.strict(),
            id,
            children,
            Option::None,
        )?;
        items.push(ast::DotItem::Graph(graph));
        Result::Ok(AstNode::Dot(ctx.builder.dot(items, Option::None)?))
    }
}

impl ToAstPlugin for GraphToAstPlugin {
    fn matches(&self, model: ModelRef<'_>) -> bool {
        matches!(model, ModelRef::Graph(_))
    }
    fn convert(
        &self,
        ctx: &mut ToAstContext<'_>,
        model: ModelRef<'_>,
    ) -> Result<AstNode> {
        match model {
            ModelRef::Graph(graph) => self.convert_graph(ctx, graph),
            _ => conversion_error("expected a root graph"),
        }
    }
}

impl SubgraphToAstPlugin {
    fn convert_subgraph(
        &self,
        ctx: &mut ToAstContext<'_>,
        subgraph: &Subgraph,
    ) -> Result<AstNode> {
        let id = ctx.id(subgraph.id())?;
        let children = ctx.cluster_statements(subgraph)?;
        let subgraph = ctx.builder.subgraph(id, children, Option::None)?;
        Result::Ok(AstNode::Subgraph(subgraph))
    }
}

impl ToAstPlugin for SubgraphToAstPlugin {
    fn matches(&self, model: ModelRef<'_>) -> bool {
        matches!(model, ModelRef::Subgraph(_))
    }
    fn convert(
        &self,
        ctx: &mut ToAstContext<'_>,
        model: ModelRef<'_>,
    ) -> Result<AstNode> {
        match model {
            ModelRef::Subgraph(subgraph) => {
                self.convert_subgraph(ctx, subgraph)
            }
            _ => conversion_error("expected a subgraph"),
        }
    }
}

impl ToAstPlugin for NodeToAstPlugin {
    fn matches(&self, model: ModelRef<'_>) -> bool {
        matches!(model, ModelRef::Node(_))
    }
    fn convert(
        &self,
        ctx: &mut ToAstContext<'_>,
        model: ModelRef<'_>,
    ) -> Result<AstNode> {
        let ModelRef::Node(node) = model else {
            return conversion_error("expected a node");
        };
        let id = ctx.builder.literal(node.id(), Quoting::Quoted, Option::None)?;
        let children = ctx.group_items(node.attributes())?;
        Result::Ok(AstNode::Node(ctx.builder.node(id, children, Option::None)?))
    }
}

impl ToAstPlugin for EdgeToAstPlugin {
    fn matches(&self, model: ModelRef<'_>) -> bool {
        matches!(model, ModelRef::Edge(_))
    }
    fn convert(
        &self,
        ctx: &mut ToAstContext<'_>,
        model: ModelRef<'_>,
    ) -> Result<AstNode> {
        let ModelRef::Edge(edge) = model else {
            return conversion_error("expected an edge");
        };
        let mut targets = Vec::new();
        for target in edge.targets() {
            let target = match target {
                EdgeTarget::Ref(r) => {
                    ast::EdgeTarget::NodeRef(ctx.node_ref(r)?)
                }
                EdgeTarget::Group(group) => {
                    let mut refs = Vec::new();
                    for r in group {
                        refs.push(ctx.node_ref(r)?);
                    }
                    let group =
                        ctx.builder.node_ref_group(refs, Option::None)?;
                    ast::EdgeTarget::Group(group)
                }
            };
            targets.push(target);
        }
        let children = ctx.group_items(edge.attributes())?;
        let edge = ctx.builder.edge(targets, children, Option::None)?;
        Result::Ok(AstNode::Edge(edge))
    }
}

/// \returns the stock list of Model→AST plugins.
pub fn default_plugins() -> Vec<Box<dyn ToAstPlugin>> {
    vec![
        Box::new(GraphToAstPlugin),
        Box::new(SubgraphToAstPlugin),
        Box::new(NodeToAstPlugin),
        Box::new(EdgeToAstPlugin),
    ]
}

/// Converts model entities into AST nodes. Every call to `convert` uses a
/// fresh builder, so the node limit applies to each conversion on its own.
pub struct ToAstConverter {
    options: ToAstOptions,
    plugins: Vec<Box<dyn ToAstPlugin>>,
}

impl Default for ToAstConverter {
    fn default() -> Self {
        Self::new(ToAstOptions::default())
    }
}

impl ToAstConverter {
    pub fn new(options: ToAstOptions) -> Self {
        Self::with_plugins(options, default_plugins())
    }

    pub fn with_plugins(
        options: ToAstOptions,
        plugins: Vec<Box<dyn ToAstPlugin>>,
    ) -> Self {
        Self { options, plugins }
    }

    /// Converts \p model. A root graph converts to a `Dot` node.
    pub fn convert<'m>(
        &self,
        model: impl Into<ModelRef<'m>>,
    ) -> Result<AstNode> {
        let model = model.into();
        let mut ctx = ToAstContext {
            comment_kind: self.options.comment_kind,
            builder: Builder::with_limit(self.options.max_ast_nodes),
            plugins: &self.plugins,
        };
        let ast = ctx.convert(model)?;
        log::debug!(
            "converted a {:?} model into {} AST nodes",
            model.kind(),
            ctx.builder.count()
        );
        Result::Ok(ast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::Node;
    use pretty_assertions::assert_eq;

    fn kinds(stmts: &[Statement]) -> Vec<&'static str> {
        stmts
            .iter()
            .map(|s| match s {
                Statement::Attribute(_) => "attr",
                Statement::AttributeList(_) => "list",
                Statement::Node(_) => "node",
                Statement::Subgraph(_) => "subgraph",
                Statement::Edge(_) => "edge",
                Statement::Comment(_) => "comment",
            })
            .collect()
    }

    #[test]
    fn html_like_values() {
        let mut b = Builder::default();
        let html = AttributeValue::from("  <b>bold</b> ");
        let attr = convert_attribute(&mut b, "label", &html).unwrap();
        assert_eq!(attr.value().quoted(), Quoting::Html);
        assert_eq!(attr.value().value(), "b>bold</b");

        let text = AttributeValue::from("plain text");
        let attr = convert_attribute(&mut b, "label", &text).unwrap();
        assert_eq!(attr.value().quoted(), Quoting::Quoted);
        assert_eq!(attr.key().quoted(), Quoting::Unquoted);

        let attr = convert_attribute(&mut b, "label", &AttributeValue::from("<>")).unwrap();
        assert_eq!(attr.value().quoted(), Quoting::Quoted);

        let attr = convert_attribute(&mut b, "width", &AttributeValue::from(1.5)).unwrap();
        assert_eq!(attr.value().quoted(), Quoting::Unquoted);
        assert_eq!(attr.value().value(), "1.5");

        let attr = convert_attribute(&mut b, "odd key", &text).unwrap();
        assert_eq!(attr.key().quoted(), Quoting::Quoted);
    }

    #[test]
    fn cluster_children_order() {
        let mut g = RootGraph::digraph();
        g.create_edge(["a", "b"], Vec::<(&str, &str)>::new()).unwrap();
        g.create_subgraph(Some("cluster_x")).set_comment(Some("sub".into()));
        g.create_node("a", Vec::<(&str, &str)>::new()).comment = Some("node a".into());
        g.defaults_mut().edge.set("color", "red");
        g.defaults_mut().node.set("shape", "box");
        g.defaults_mut().node.comment = Some("nodes".into());
        g.set("rankdir", "LR");

        let AstNode::Dot(dot) = ToAstConverter::default().convert(&g).unwrap() else {
            panic!("expected a Dot node");
        };
        let graph = dot.graph().unwrap();
        assert_eq!(
            kinds(graph.children()),
            vec!["attr", "comment", "list", "list", "comment", "node", "comment", "subgraph", "edge"]
        );
        let Statement::AttributeList(first) = &graph.children()[2] else {
            panic!("expected a list");
        };
        assert_eq!(first.kind(), ast::AttributeListKind::Node);
    }

    #[test]
    fn comments_use_the_configured_kind() {
        let mut g = RootGraph::graph();
        g.set_comment(Some("top".into()));
        let options = ToAstOptions {
            comment_kind: CommentKind::Block,
            ..ToAstOptions::default()
        };
        let AstNode::Dot(dot) = ToAstConverter::new(options).convert(&g).unwrap() else {
            panic!("expected a Dot node");
        };
        let ast::DotItem::Comment(c) = &dot.children()[0] else {
            panic!("expected a comment");
        };
        assert_eq!(c.kind(), CommentKind::Block);
        assert_eq!(c.value(), "top");
    }

    #[test]
    fn node_limit_is_per_conversion() {
        let mut g = RootGraph::digraph();
        g.create_edge(["a", "b"], [("label", "x")]).unwrap();
        let small = ToAstOptions {
            max_ast_nodes: 5,
            ..ToAstOptions::default()
        };
        assert_eq!(
            ToAstConverter::new(small).convert(&g).unwrap_err(),
            Error::NodeCountExceeded { limit: 5 }
        );
        let large = ToAstOptions {
            max_ast_nodes: 1000,
            ..ToAstOptions::default()
        };
        let converter = ToAstConverter::new(large);
        for _ in 0..200 {
            assert!(converter.convert(&g).is_ok());
        }
    }

    #[test]
    fn missing_plugin() {
        let converter = ToAstConverter::with_plugins(
            ToAstOptions::default(),
            vec![Box::new(NodeToAstPlugin)],
        );
        assert!(converter.convert(&Node::new("a")).is_ok());
        assert!(matches!(
            converter.convert(&RootGraph::digraph()),
            Result::Err(Error::Conversion(_))
        ));
    }
}
