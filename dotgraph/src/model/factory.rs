use super::edge::{Edge, EdgeTarget};
use super::graph::{RootGraph, Subgraph};
use super::node::Node;
use crate::error::Result;

/// Creates the model entities that the AST→Model converter fills in.
/// Implement this to pre-populate entities (or to log their creation);
/// every method has a default that builds a plain entity.
pub trait ModelFactory {
    fn graph(&self, id: Option<&str>, strict: bool) -> RootGraph {
        with_id(RootGraph::graph(), id).with_strict(strict)
    }

    fn digraph(&self, id: Option<&str>, strict: bool) -> RootGraph {
        with_id(RootGraph::digraph(), id).with_strict(strict)
    }

    fn subgraph(&self, id: Option<&str>) -> Subgraph {
        match id {
            Option::Some(id) => Subgraph::with_id(id),
            Option::None => Subgraph::new(),
        }
    }

    fn node(&self, id: &str) -> Node {
        Node::new(id)
    }

    fn edge(&self, targets: Vec<EdgeTarget>) -> Result<Edge> {
        Edge::new(targets)
    }
}

fn with_id(graph: RootGraph, id: Option<&str>) -> RootGraph {
    match id {
        Option::Some(id) => graph.with_id(id),
        Option::None => graph,
    }
}

/// The stock factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultModels;

impl ModelFactory for DefaultModels {}
