//! An AST that represents the GraphViz file format.
//!
//! The nodes in this module can only be created through the
//! [`Builder`](super::builder::Builder), which keeps count of how many nodes
//! were created. Once built, a node is never modified: its fields are private
//! and only exposed through accessors. Each node is owned by its parent in the
//! tree, and the only thing that points back into the source is the
//! `location`, which is a plain value.

use std::fmt;

/// A point in the source text. Lines and columns start at 1, the offset is
/// the index of the character in the input (starting at 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

/// A range in the source text: [start, end).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// How a literal is written: bare, in double quotes, or as `<html>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quoting {
    Unquoted,
    Quoted,
    Html,
}

/// The three comment syntaxes of the DOT language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// `/* ... */`
    Block,
    /// `// ...`
    #[default]
    Slash,
    /// `# ...`
    Macro,
}

// (graph | node | edge)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeListKind {
    Graph,
    Node,
    Edge,
}

impl AttributeListKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            AttributeListKind::Graph => "graph",
            AttributeListKind::Node => "node",
            AttributeListKind::Edge => "edge",
        }
    }
}

/// The side of a node that an edge is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compass {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
    C,
    Any,
}

impl Compass {
    pub const ALL: [Compass; 10] = [
        Compass::N,
        Compass::NE,
        Compass::E,
        Compass::SE,
        Compass::S,
        Compass::SW,
        Compass::W,
        Compass::NW,
        Compass::C,
        Compass::Any,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Compass::N => "n",
            Compass::NE => "ne",
            Compass::E => "e",
            Compass::SE => "se",
            Compass::S => "s",
            Compass::SW => "sw",
            Compass::W => "w",
            Compass::NW => "nw",
            Compass::C => "c",
            Compass::Any => "_",
        }
    }

    /// \returns the compass point that is spelled \p s, if any.
    pub fn parse(s: &str) -> Option<Compass> {
        Compass::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// "first", first, <b>first</b>
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub(crate) location: Option<Location>,
    pub(crate) value: String,
    pub(crate) quoted: Quoting,
}

impl Literal {
    pub fn location(&self) -> Option<Location> {
        self.location
    }
    pub fn value(&self) -> &str {
        &self.value
    }
    pub fn quoted(&self) -> Quoting {
        self.quoted
    }
}

// /* ... */, // ..., # ...
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub(crate) location: Option<Location>,
    pub(crate) kind: CommentKind,
    pub(crate) value: String,
}

impl Comment {
    pub fn location(&self) -> Option<Location> {
        self.location
    }
    pub fn kind(&self) -> CommentKind {
        self.kind
    }
    pub fn value(&self) -> &str {
        &self.value
    }
}

// key = value
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub(crate) location: Option<Location>,
    pub(crate) key: Literal,
    pub(crate) value: Literal,
}

impl Attribute {
    pub fn location(&self) -> Option<Location> {
        self.location
    }
    pub fn key(&self) -> &Literal {
        &self.key
    }
    pub fn value(&self) -> &Literal {
        &self.value
    }
}

/// The things that may appear inside of `[ ... ]`.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeItem {
    Attribute(Attribute),
    Comment(Comment),
}

// (graph | node | edge) [ ... ]
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeList {
    pub(crate) location: Option<Location>,
    pub(crate) kind: AttributeListKind,
    pub(crate) children: Vec<AttributeItem>,
}

impl AttributeList {
    pub fn location(&self) -> Option<Location> {
        self.location
    }
    pub fn kind(&self) -> AttributeListKind {
        self.kind
    }
    pub fn children(&self) -> &[AttributeItem] {
        &self.children
    }
}

// id:port:compass
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRef {
    pub(crate) location: Option<Location>,
    pub(crate) id: Literal,
    pub(crate) port: Option<Literal>,
    pub(crate) compass: Option<Literal>,
}

impl NodeRef {
    pub fn location(&self) -> Option<Location> {
        self.location
    }
    pub fn id(&self) -> &Literal {
        &self.id
    }
    pub fn port(&self) -> Option<&Literal> {
        self.port.as_ref()
    }
    pub fn compass(&self) -> Option<&Literal> {
        self.compass.as_ref()
    }
}

// { a b c }
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRefGroup {
    pub(crate) location: Option<Location>,
    pub(crate) children: Vec<NodeRef>,
}

impl NodeRefGroup {
    pub fn location(&self) -> Option<Location> {
        self.location
    }
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }
}

/// One end of an edge.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeTarget {
    NodeRef(NodeRef),
    Group(NodeRefGroup),
}

// node-name [ ... ]
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) location: Option<Location>,
    pub(crate) id: Literal,
    pub(crate) children: Vec<AttributeItem>,
}

impl Node {
    pub fn location(&self) -> Option<Location> {
        self.location
    }
    pub fn id(&self) -> &Literal {
        &self.id
    }
    pub fn children(&self) -> &[AttributeItem] {
        &self.children
    }
}

// a -> b -> {c d} [ ... ]
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub(crate) location: Option<Location>,
    pub(crate) targets: Vec<EdgeTarget>,
    pub(crate) children: Vec<AttributeItem>,
}

impl Edge {
    pub fn location(&self) -> Option<Location> {
        self.location
    }
    pub fn targets(&self) -> &[EdgeTarget] {
        &self.targets
    }
    pub fn children(&self) -> &[AttributeItem] {
        &self.children
    }
}

/// The statements that make up the body of a graph or a subgraph.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Attribute(Attribute),
    AttributeList(AttributeList),
    Edge(Edge),
    Node(Node),
    Subgraph(Subgraph),
    Comment(Comment),
}

// [ subgraph [ ID ] ] '{' stmt_list '}'
#[derive(Debug, Clone, PartialEq)]
pub struct Subgraph {
    pub(crate) location: Option<Location>,
    pub(crate) id: Option<Literal>,
    pub(crate) children: Vec<Statement>,
}

impl Subgraph {
    pub fn location(&self) -> Option<Location> {
        self.location
    }
    pub fn id(&self) -> Option<&Literal> {
        self.id.as_ref()
    }
    pub fn children(&self) -> &[Statement] {
        &self.children
    }
}

// [ strict ] (graph | digraph) [ ID ] '{' stmt_list '}'
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub(crate) location: Option<Location>,
    pub(crate) id: Option<Literal>,
    pub(crate) directed: bool,
    pub(crate) strict: bool,
    pub(crate) children: Vec<Statement>,
}

impl Graph {
    pub fn location(&self) -> Option<Location> {
        self.location
    }
    pub fn id(&self) -> Option<&Literal> {
        self.id.as_ref()
    }
    pub fn directed(&self) -> bool {
        self.directed
    }
    pub fn strict(&self) -> bool {
        self.strict
    }
    pub fn children(&self) -> &[Statement] {
        &self.children
    }
}

/// The things that may appear at the top level of a file.
#[derive(Debug, Clone, PartialEq)]
pub enum DotItem {
    Comment(Comment),
    Graph(Graph),
}

/// The root of a parsed file: one graph, surrounded by optional comments.
#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub(crate) location: Option<Location>,
    pub(crate) children: Vec<DotItem>,
}

impl Dot {
    pub fn location(&self) -> Option<Location> {
        self.location
    }
    pub fn children(&self) -> &[DotItem] {
        &self.children
    }
    /// \returns the graph in this file.
    pub fn graph(&self) -> Option<&Graph> {
        self.children.iter().find_map(|item| match item {
            DotItem::Graph(g) => Option::Some(g),
            DotItem::Comment(_) => Option::None,
        })
    }
}

/// The `type` tag of an AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AstKind {
    Dot,
    Graph,
    Subgraph,
    Node,
    Edge,
    NodeRef,
    NodeRefGroup,
    AttributeList,
    Attribute,
    Literal,
    Comment,
}

/// An owned AST node of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Dot(Dot),
    Graph(Graph),
    Subgraph(Subgraph),
    Node(Node),
    Edge(Edge),
    NodeRef(NodeRef),
    NodeRefGroup(NodeRefGroup),
    AttributeList(AttributeList),
    Attribute(Attribute),
    Literal(Literal),
    Comment(Comment),
}

impl AstNode {
    /// \returns a borrowed view of this node, which is what the printer and
    /// the converters dispatch on.
    pub fn view(&self) -> AstRef<'_> {
        match self {
            AstNode::Dot(n) => AstRef::Dot(n),
            AstNode::Graph(n) => AstRef::Graph(n),
            AstNode::Subgraph(n) => AstRef::Subgraph(n),
            AstNode::Node(n) => AstRef::Node(n),
            AstNode::Edge(n) => AstRef::Edge(n),
            AstNode::NodeRef(n) => AstRef::NodeRef(n),
            AstNode::NodeRefGroup(n) => AstRef::NodeRefGroup(n),
            AstNode::AttributeList(n) => AstRef::AttributeList(n),
            AstNode::Attribute(n) => AstRef::Attribute(n),
            AstNode::Literal(n) => AstRef::Literal(n),
            AstNode::Comment(n) => AstRef::Comment(n),
        }
    }
    pub fn kind(&self) -> AstKind {
        self.view().kind()
    }
    pub fn location(&self) -> Option<Location> {
        self.view().location()
    }

    /// \returns this node as a statement, if it may appear in a statement
    /// list.
    pub fn into_statement(self) -> Option<Statement> {
        match self {
            AstNode::Attribute(n) => Option::Some(Statement::Attribute(n)),
            AstNode::AttributeList(n) => {
                Option::Some(Statement::AttributeList(n))
            }
            AstNode::Edge(n) => Option::Some(Statement::Edge(n)),
            AstNode::Node(n) => Option::Some(Statement::Node(n)),
            AstNode::Subgraph(n) => Option::Some(Statement::Subgraph(n)),
            AstNode::Comment(n) => Option::Some(Statement::Comment(n)),
            _ => Option::None,
        }
    }
}

impl From<Statement> for AstNode {
    fn from(stmt: Statement) -> Self {
        match stmt {
            Statement::Attribute(n) => AstNode::Attribute(n),
            Statement::AttributeList(n) => AstNode::AttributeList(n),
            Statement::Edge(n) => AstNode::Edge(n),
            Statement::Node(n) => AstNode::Node(n),
            Statement::Subgraph(n) => AstNode::Subgraph(n),
            Statement::Comment(n) => AstNode::Comment(n),
        }
    }
}

/// A borrowed AST node of any kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AstRef<'a> {
    Dot(&'a Dot),
    Graph(&'a Graph),
    Subgraph(&'a Subgraph),
    Node(&'a Node),
    Edge(&'a Edge),
    NodeRef(&'a NodeRef),
    NodeRefGroup(&'a NodeRefGroup),
    AttributeList(&'a AttributeList),
    Attribute(&'a Attribute),
    Literal(&'a Literal),
    Comment(&'a Comment),
}

impl<'a> AstRef<'a> {
    pub fn kind(&self) -> AstKind {
        match self {
            AstRef::Dot(_) => AstKind::Dot,
            AstRef::Graph(_) => AstKind::Graph,
            AstRef::Subgraph(_) => AstKind::Subgraph,
            AstRef::Node(_) => AstKind::Node,
            AstRef::Edge(_) => AstKind::Edge,
            AstRef::NodeRef(_) => AstKind::NodeRef,
            AstRef::NodeRefGroup(_) => AstKind::NodeRefGroup,
            AstRef::AttributeList(_) => AstKind::AttributeList,
            AstRef::Attribute(_) => AstKind::Attribute,
            AstRef::Literal(_) => AstKind::Literal,
            AstRef::Comment(_) => AstKind::Comment,
        }
    }

    pub fn location(&self) -> Option<Location> {
        match self {
            AstRef::Dot(n) => n.location,
            AstRef::Graph(n) => n.location,
            AstRef::Subgraph(n) => n.location,
            AstRef::Node(n) => n.location,
            AstRef::Edge(n) => n.location,
            AstRef::NodeRef(n) => n.location,
            AstRef::NodeRefGroup(n) => n.location,
            AstRef::AttributeList(n) => n.location,
            AstRef::Attribute(n) => n.location,
            AstRef::Literal(n) => n.location,
            AstRef::Comment(n) => n.location,
        }
    }

    /// \returns the ordered children of this node. Leaves, and the fields
    /// that are not children (ids, keys, edge targets), are not included.
    pub fn children(&self) -> Vec<AstRef<'a>> {
        match *self {
            AstRef::Dot(n) => n.children.iter().map(AstRef::from).collect(),
            AstRef::Graph(n) => n.children.iter().map(AstRef::from).collect(),
            AstRef::Subgraph(n) => {
                n.children.iter().map(AstRef::from).collect()
            }
            AstRef::Node(n) => n.children.iter().map(AstRef::from).collect(),
            AstRef::Edge(n) => n.children.iter().map(AstRef::from).collect(),
            AstRef::AttributeList(n) => {
                n.children.iter().map(AstRef::from).collect()
            }
            AstRef::NodeRefGroup(n) => {
                n.children.iter().map(AstRef::NodeRef).collect()
            }
            AstRef::NodeRef(_)
            | AstRef::Attribute(_)
            | AstRef::Literal(_)
            | AstRef::Comment(_) => Vec::new(),
        }
    }
}

impl<'a> From<&'a AstNode> for AstRef<'a> {
    fn from(node: &'a AstNode) -> Self {
        node.view()
    }
}

impl<'a> From<&'a Statement> for AstRef<'a> {
    fn from(stmt: &'a Statement) -> Self {
        match stmt {
            Statement::Attribute(n) => AstRef::Attribute(n),
            Statement::AttributeList(n) => AstRef::AttributeList(n),
            Statement::Edge(n) => AstRef::Edge(n),
            Statement::Node(n) => AstRef::Node(n),
            Statement::Subgraph(n) => AstRef::Subgraph(n),
            Statement::Comment(n) => AstRef::Comment(n),
        }
    }
}

impl<'a> From<&'a AttributeItem> for AstRef<'a> {
    fn from(item: &'a AttributeItem) -> Self {
        match item {
            AttributeItem::Attribute(n) => AstRef::Attribute(n),
            AttributeItem::Comment(n) => AstRef::Comment(n),
        }
    }
}

impl<'a> From<&'a DotItem> for AstRef<'a> {
    fn from(item: &'a DotItem) -> Self {
        match item {
            DotItem::Graph(n) => AstRef::Graph(n),
            DotItem::Comment(n) => AstRef::Comment(n),
        }
    }
}

impl<'a> From<&'a EdgeTarget> for AstRef<'a> {
    fn from(target: &'a EdgeTarget) -> Self {
        match target {
            EdgeTarget::NodeRef(n) => AstRef::NodeRef(n),
            EdgeTarget::Group(n) => AstRef::NodeRefGroup(n),
        }
    }
}

macro_rules! ast_ref_from {
    ($($ty:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a $ty> for AstRef<'a> {
                fn from(node: &'a $ty) -> Self {
                    AstRef::$ty(node)
                }
            }
        )*
    };
}

ast_ref_from!(
    Dot,
    Graph,
    Subgraph,
    Node,
    Edge,
    NodeRef,
    NodeRefGroup,
    AttributeList,
    Attribute,
    Literal,
    Comment,
);

#[test]
fn test_compass_names() {
    for c in Compass::ALL {
        assert_eq!(Compass::parse(c.as_str()), Option::Some(c));
    }
    assert_eq!(Compass::parse("north"), Option::None);
    assert_eq!(Compass::parse("_"), Option::Some(Compass::Any));
}
