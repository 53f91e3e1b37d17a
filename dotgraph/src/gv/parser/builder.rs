//! The only way to create AST nodes.
//!
//! The builder counts every node it creates and refuses to create more than
//! `max_ast_nodes` of them, so a pathological input (or model) can't exhaust
//! memory by producing an unbounded tree. The count belongs to the builder
//! instance: every top-level parse or conversion makes a fresh builder, and a
//! builder that is reused must be `reset` first.

use super::ast::*;
use crate::error::{Error, Result};

/// The default ceiling for the number of nodes one builder may create.
pub const DEFAULT_MAX_AST_NODES: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderOptions {
    pub max_ast_nodes: usize,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            max_ast_nodes: DEFAULT_MAX_AST_NODES,
        }
    }
}

/// Creates AST nodes and enforces the node-count ceiling.
///
/// Each creation method takes the location of the new node. The parser
/// passes the source range that it just consumed; the converters pass None,
/// because the nodes they create have no source text.
#[derive(Debug, Clone)]
pub struct Builder {
    options: BuilderOptions,
    count: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new(BuilderOptions::default())
    }
}

impl Builder {
    pub fn new(options: BuilderOptions) -> Self {
        Self { options, count: 0 }
    }

    pub fn with_limit(max_ast_nodes: usize) -> Self {
        Self::new(BuilderOptions { max_ast_nodes })
    }

    /// \returns the number of nodes created since the last reset.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn limit(&self) -> usize {
        self.options.max_ast_nodes
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    // Accounts for one more node.
    fn tick(&mut self) -> Result<()> {
        if self.count >= self.options.max_ast_nodes {
            log::warn!(
                "AST node limit reached ({} nodes)",
                self.options.max_ast_nodes
            );
            return Result::Err(Error::NodeCountExceeded {
                limit: self.options.max_ast_nodes,
            });
        }
        self.count += 1;
        Result::Ok(())
    }

    pub fn literal(
        &mut self,
        value: impl Into<String>,
        quoted: Quoting,
        location: Option<Location>,
    ) -> Result<Literal> {
        self.tick()?;
        Result::Ok(Literal {
            location,
            value: value.into(),
            quoted,
        })
    }

    pub fn comment(
        &mut self,
        kind: CommentKind,
        value: impl Into<String>,
        location: Option<Location>,
    ) -> Result<Comment> {
        self.tick()?;
        Result::Ok(Comment {
            location,
            kind,
            value: value.into(),
        })
    }

    pub fn attribute(
        &mut self,
        key: Literal,
        value: Literal,
        location: Option<Location>,
    ) -> Result<Attribute> {
        self.tick()?;
        Result::Ok(Attribute {
            location,
            key,
            value,
        })
    }

    pub fn attribute_list(
        &mut self,
        kind: AttributeListKind,
        children: Vec<AttributeItem>,
        location: Option<Location>,
    ) -> Result<AttributeList> {
        self.tick()?;
        Result::Ok(AttributeList {
            location,
            kind,
            children,
        })
    }

    pub fn node_ref(
        &mut self,
        id: Literal,
        port: Option<Literal>,
        compass: Option<Literal>,
        location: Option<Location>,
    ) -> Result<NodeRef> {
        self.tick()?;
        Result::Ok(NodeRef {
            location,
            id,
            port,
            compass,
        })
    }

    pub fn node_ref_group(
        &mut self,
        children: Vec<NodeRef>,
        location: Option<Location>,
    ) -> Result<NodeRefGroup> {
        self.tick()?;
        Result::Ok(NodeRefGroup { location, children })
    }

    pub fn node(
        &mut self,
        id: Literal,
        children: Vec<AttributeItem>,
        location: Option<Location>,
    ) -> Result<Node> {
        self.tick()?;
        Result::Ok(Node {
            location,
            id,
            children,
        })
    }

    /// Creates an edge. Fails if there are fewer than two targets.
    pub fn edge(
        &mut self,
        targets: Vec<EdgeTarget>,
        children: Vec<AttributeItem>,
        location: Option<Location>,
    ) -> Result<Edge> {
        if targets.len() < 2 {
            return Result::Err(Error::InvalidEdgeTargets {
                found: targets.len(),
            });
        }
        self.tick()?;
        Result::Ok(Edge {
            location,
            targets,
            children,
        })
    }

    pub fn subgraph(
        &mut self,
        id: Option<Literal>,
        children: Vec<Statement>,
        location: Option<Location>,
    ) -> Result<Subgraph> {
        self.tick()?;
        Result::Ok(Subgraph {
            location,
            id,
            children,
        })
    }

    pub fn graph(
        &mut self,
        directed: bool,
        strict: bool,
        id: Option<Literal>,
        children: Vec<Statement>,
        location: Option<Location>,
    ) -> Result<Graph> {
        self.tick()?;
        Result::Ok(Graph {
            location,
            id,
            directed,
            strict,
            children,
        })
    }

    pub fn dot(
        &mut self,
        children: Vec<DotItem>,
        location: Option<Location>,
    ) -> Result<Dot> {
        self.tick()?;
        Result::Ok(Dot { location, children })
    }
}

#[test]
fn test_builder_limit() {
    let mut b = Builder::with_limit(2);
    let a = b.literal("a", Quoting::Quoted, None).unwrap();
    assert_eq!(a.value(), "a");
    assert_eq!(a.location(), None);
    b.literal("b", Quoting::Unquoted, None).unwrap();
    assert_eq!(b.count(), 2);
    let err = b.literal("c", Quoting::Unquoted, None).unwrap_err();
    assert_eq!(err, Error::NodeCountExceeded { limit: 2 });
    b.reset();
    assert_eq!(b.count(), 0);
    assert!(b.literal("c", Quoting::Unquoted, None).is_ok());
}

#[test]
fn test_builder_edge_needs_two_targets() {
    let mut b = Builder::default();
    let id = b.literal("a", Quoting::Quoted, None).unwrap();
    let r = b.node_ref(id, None, None, None).unwrap();
    let err = b.edge(vec![EdgeTarget::NodeRef(r)], vec![], None).unwrap_err();
    assert_eq!(err, Error::InvalidEdgeTargets { found: 1 });
}
