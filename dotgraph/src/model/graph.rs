//! Root graphs, subgraphs, and the containment API that they share.

use super::attributes::{
    AttributeValue, Attributes, Defaults, HasAttributes,
};
use super::edge::{Edge, EdgeTarget};
use super::node::Node;
use crate::adt::map::OrderedMap;
use crate::error::Result;

/// The state shared by root graphs and subgraphs: the graph's own
/// attributes, its default attribute lists, and its children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphBase {
    id: Option<String>,
    pub comment: Option<String>,
    attributes: Attributes,
    defaults: Defaults,
    nodes: OrderedMap<String, Node>,
    edges: Vec<Edge>,
    subgraphs: Vec<Subgraph>,
}

impl GraphBase {
    pub fn new(id: Option<String>) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    fn subgraph_index(&self, id: &str) -> Option<usize> {
        self.subgraphs.iter().position(|s| s.id() == Option::Some(id))
    }
}

/// The containment API of graph-like entities. Everything is provided on
/// top of `base` and `base_mut`.
pub trait Cluster: HasAttributes {
    fn base(&self) -> &GraphBase;
    fn base_mut(&mut self) -> &mut GraphBase;

    fn id(&self) -> Option<&str> {
        self.base().id.as_deref()
    }

    fn comment(&self) -> Option<&str> {
        self.base().comment.as_deref()
    }

    fn set_comment(&mut self, comment: Option<String>) {
        self.base_mut().comment = comment;
    }

    /// The `graph`, `node` and `edge` default attribute lists.
    fn defaults(&self) -> &Defaults {
        &self.base().defaults
    }

    fn defaults_mut(&mut self) -> &mut Defaults {
        &mut self.base_mut().defaults
    }

    fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.base().nodes.values()
    }

    fn edges(&self) -> &[Edge] {
        &self.base().edges
    }

    fn subgraphs(&self) -> &[Subgraph] {
        &self.base().subgraphs
    }

    /// Adds \p node, replacing a node with the same id. The replaced node
    /// keeps its position.
    fn add_node(&mut self, node: Node) -> &mut Node {
        let id = node.id().to_string();
        self.base_mut().nodes.insert(id, node)
    }

    fn add_edge(&mut self, edge: Edge) -> &mut Edge {
        let edges = &mut self.base_mut().edges;
        edges.push(edge);
        let last = edges.len() - 1;
        &mut edges[last]
    }

    /// Adds \p subgraph. A named subgraph replaces the subgraph with the
    /// same id; anonymous subgraphs are always added.
    fn add_subgraph(&mut self, subgraph: Subgraph) -> &mut Subgraph {
        let base = self.base_mut();
        let idx = match subgraph.id().and_then(|id| base.subgraph_index(id)) {
            Option::Some(idx) => {
                base.subgraphs[idx] = subgraph;
                idx
            }
            Option::None => {
                base.subgraphs.push(subgraph);
                base.subgraphs.len() - 1
            }
        };
        &mut base.subgraphs[idx]
    }

    fn remove_node(&mut self, id: &str) -> Option<Node> {
        self.base_mut().nodes.remove(id)
    }

    /// Removes the first edge that is equal to \p edge.
    fn remove_edge(&mut self, edge: &Edge) -> Option<Edge> {
        let edges = &mut self.base_mut().edges;
        let idx = edges.iter().position(|e| e == edge)?;
        Option::Some(edges.remove(idx))
    }

    fn remove_subgraph(&mut self, id: &str) -> Option<Subgraph> {
        let base = self.base_mut();
        let idx = base.subgraph_index(id)?;
        Option::Some(base.subgraphs.remove(idx))
    }

    fn exists_node(&self, id: &str) -> bool {
        self.base().nodes.contains_key(id)
    }

    fn exists_edge(&self, edge: &Edge) -> bool {
        self.base().edges.contains(edge)
    }

    fn exists_subgraph(&self, id: &str) -> bool {
        self.base().subgraph_index(id).is_some()
    }

    fn get_node(&self, id: &str) -> Option<&Node> {
        self.base().nodes.get(id)
    }

    fn get_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.base_mut().nodes.get_mut(id)
    }

    fn get_subgraph(&self, id: &str) -> Option<&Subgraph> {
        let base = self.base();
        base.subgraph_index(id).map(|idx| &base.subgraphs[idx])
    }

    fn get_subgraph_mut(&mut self, id: &str) -> Option<&mut Subgraph> {
        let base = self.base_mut();
        let idx = base.subgraph_index(id)?;
        Option::Some(&mut base.subgraphs[idx])
    }

    /// Creates a node with attributes \p attrs and adds it.
    fn create_node<I, K, V>(&mut self, id: &str, attrs: I) -> &mut Node
    where
        Self: Sized,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        let mut node = Node::new(id);
        node.apply(attrs);
        self.add_node(node)
    }

    /// Creates an edge with attributes \p attrs and adds it. Fails like
    /// `Edge::new` does.
    fn create_edge<T, I, K, V>(
        &mut self,
        targets: impl IntoIterator<Item = T>,
        attrs: I,
    ) -> Result<&mut Edge>
    where
        Self: Sized,
        T: Into<EdgeTarget>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        let mut edge = Edge::new(targets)?;
        edge.apply(attrs);
        Result::Ok(self.add_edge(edge))
    }

    fn create_subgraph(&mut self, id: Option<&str>) -> &mut Subgraph {
        let subgraph = match id {
            Option::Some(id) => Subgraph::with_id(id),
            Option::None => Subgraph::new(),
        };
        self.add_subgraph(subgraph)
    }

    /// \returns the node \p id, creating it with \p make if it is missing.
    fn node_or_insert_with<F: FnOnce() -> Node>(
        &mut self,
        id: &str,
        make: F,
    ) -> &mut Node
    where
        Self: Sized,
    {
        self.base_mut().nodes.get_or_insert_with(id.to_string(), make)
    }

    /// \returns the node \p id, creating it if it is missing.
    fn node(&mut self, id: &str) -> &mut Node
    where
        Self: Sized,
    {
        self.node_or_insert_with(id, || Node::new(id))
    }

    /// \returns the subgraph \p id, creating it with \p make if it is
    /// missing.
    fn subgraph_or_insert_with<F: FnOnce() -> Subgraph>(
        &mut self,
        id: &str,
        make: F,
    ) -> &mut Subgraph
    where
        Self: Sized,
    {
        let base = self.base_mut();
        let idx = match base.subgraph_index(id) {
            Option::Some(idx) => idx,
            Option::None => {
                base.subgraphs.push(make());
                base.subgraphs.len() - 1
            }
        };
        &mut base.subgraphs[idx]
    }

    /// \returns the subgraph \p id, creating it if it is missing.
    fn subgraph(&mut self, id: &str) -> &mut Subgraph
    where
        Self: Sized,
    {
        self.subgraph_or_insert_with(id, || Subgraph::with_id(id))
    }
}

/// A top-level `graph` or `digraph`.
#[derive(Debug, Clone, PartialEq)]
pub struct RootGraph {
    directed: bool,
    strict: bool,
    base: GraphBase,
}

impl RootGraph {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            strict: false,
            base: GraphBase::new(Option::None),
        }
    }

    /// A directed graph.
    pub fn digraph() -> Self {
        Self::new(true)
    }

    /// An undirected graph.
    pub fn graph() -> Self {
        Self::new(false)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.base.id = Option::Some(id.into());
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn directed(&self) -> bool {
        self.directed
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }
}

impl HasAttributes for RootGraph {
    fn attribute_map(&self) -> &Attributes {
        &self.base.attributes
    }
    fn attribute_map_mut(&mut self) -> &mut Attributes {
        &mut self.base.attributes
    }
}

impl Cluster for RootGraph {
    fn base(&self) -> &GraphBase {
        &self.base
    }
    fn base_mut(&mut self) -> &mut GraphBase {
        &mut self.base
    }

    /// In a strict graph, an edge that connects the same targets as an
    /// existing edge is merged into it.
    fn add_edge(&mut self, edge: Edge) -> &mut Edge {
        let directed = self.directed;
        let edges = &mut self.base.edges;
        let found = if self.strict {
            edges.iter().position(|e| e.same_endpoints(&edge, directed))
        } else {
            Option::None
        };
        let idx = match found {
            Option::Some(idx) => {
                log::debug!("merging a duplicate edge of a strict graph");
                let existing = &mut edges[idx];
                existing.apply(edge.attribute_map().iter());
                if existing.comment.is_none() {
                    existing.comment = edge.comment;
                }
                idx
            }
            Option::None => {
                edges.push(edge);
                edges.len() - 1
            }
        };
        &mut edges[idx]
    }
}

/// A `subgraph` inside of a root graph or of another subgraph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subgraph {
    base: GraphBase,
}

impl Subgraph {
    /// An anonymous subgraph.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            base: GraphBase::new(Option::Some(id.into())),
        }
    }

    /// \returns true if this subgraph is a cluster, which is a subgraph
    /// whose id starts with "cluster".
    pub fn is_cluster(&self) -> bool {
        self.id().is_some_and(|id| id.starts_with("cluster"))
    }
}

impl HasAttributes for Subgraph {
    fn attribute_map(&self) -> &Attributes {
        &self.base.attributes
    }
    fn attribute_map_mut(&mut self) -> &mut Attributes {
        &mut self.base.attributes
    }
}

impl Cluster for Subgraph {
    fn base(&self) -> &GraphBase {
        &self.base
    }
    fn base_mut(&mut self) -> &mut GraphBase {
        &mut self.base
    }
}
