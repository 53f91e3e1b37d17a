//! The object model: mutable graphs, subgraphs, nodes and edges with
//! ordered attributes.
//!
//! Graphs own their children by value. Removing a child goes through its
//! parent (`remove_node`, `remove_edge`, `remove_subgraph`), so children
//! don't keep a reference back to the graph that holds them.

pub mod attributes;
pub mod edge;
pub mod factory;
pub mod graph;
pub mod node;

pub use attributes::{
    AttributeList, AttributeValue, Attributes, AttributesGroup, Defaults,
    HasAttributes,
};
pub use edge::{Edge, EdgeTarget};
pub use factory::{DefaultModels, ModelFactory};
pub use graph::{Cluster, GraphBase, RootGraph, Subgraph};
pub use node::{ForwardRef, Node, Port};

/// The kind tag of a model entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Graph,
    Subgraph,
    Node,
    Edge,
}

/// An owned model entity of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    Graph(RootGraph),
    Subgraph(Subgraph),
    Node(Node),
    Edge(Edge),
}

impl Model {
    pub fn view(&self) -> ModelRef<'_> {
        match self {
            Model::Graph(m) => ModelRef::Graph(m),
            Model::Subgraph(m) => ModelRef::Subgraph(m),
            Model::Node(m) => ModelRef::Node(m),
            Model::Edge(m) => ModelRef::Edge(m),
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.view().kind()
    }

    pub fn into_graph(self) -> Option<RootGraph> {
        match self {
            Model::Graph(g) => Option::Some(g),
            _ => Option::None,
        }
    }

    pub fn into_subgraph(self) -> Option<Subgraph> {
        match self {
            Model::Subgraph(g) => Option::Some(g),
            _ => Option::None,
        }
    }

    pub fn into_node(self) -> Option<Node> {
        match self {
            Model::Node(n) => Option::Some(n),
            _ => Option::None,
        }
    }

    pub fn into_edge(self) -> Option<Edge> {
        match self {
            Model::Edge(e) => Option::Some(e),
            _ => Option::None,
        }
    }
}

/// A borrowed model entity of any kind. This is what the Model→AST
/// converter dispatches on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelRef<'a> {
    Graph(&'a RootGraph),
    Subgraph(&'a Subgraph),
    Node(&'a Node),
    Edge(&'a Edge),
}

impl ModelRef<'_> {
    pub fn kind(&self) -> ModelKind {
        match self {
            ModelRef::Graph(_) => ModelKind::Graph,
            ModelRef::Subgraph(_) => ModelKind::Subgraph,
            ModelRef::Node(_) => ModelKind::Node,
            ModelRef::Edge(_) => ModelKind::Edge,
        }
    }
}

impl<'a> From<&'a Model> for ModelRef<'a> {
    fn from(model: &'a Model) -> Self {
        model.view()
    }
}

impl<'a> From<&'a RootGraph> for ModelRef<'a> {
    fn from(m: &'a RootGraph) -> Self {
        ModelRef::Graph(m)
    }
}

impl<'a> From<&'a Subgraph> for ModelRef<'a> {
    fn from(m: &'a Subgraph) -> Self {
        ModelRef::Subgraph(m)
    }
}

impl<'a> From<&'a Node> for ModelRef<'a> {
    fn from(m: &'a Node) -> Self {
        ModelRef::Node(m)
    }
}

impl<'a> From<&'a Edge> for ModelRef<'a> {
    fn from(m: &'a Edge) -> Self {
        ModelRef::Edge(m)
    }
}

impl From<RootGraph> for Model {
    fn from(m: RootGraph) -> Self {
        Model::Graph(m)
    }
}

impl From<Subgraph> for Model {
    fn from(m: Subgraph) -> Self {
        Model::Subgraph(m)
    }
}

impl From<Node> for Model {
    fn from(m: Node) -> Self {
        Model::Node(m)
    }
}

impl From<Edge> for Model {
    fn from(m: Edge) -> Self {
        Model::Edge(m)
    }
}
