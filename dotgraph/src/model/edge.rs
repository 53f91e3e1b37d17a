use super::attributes::{Attributes, AttributesGroup, HasAttributes};
use super::node::{ForwardRef, Node};
use crate::error::{Error, Result};

/// One end of an edge: a single node, or a group of nodes that are all
/// connected at once (`a -> {b c}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeTarget {
    Ref(ForwardRef),
    Group(Vec<ForwardRef>),
}

impl From<ForwardRef> for EdgeTarget {
    fn from(r: ForwardRef) -> Self {
        EdgeTarget::Ref(r)
    }
}

impl From<&Node> for EdgeTarget {
    fn from(node: &Node) -> Self {
        EdgeTarget::Ref(node.into())
    }
}

impl From<&str> for EdgeTarget {
    fn from(id: &str) -> Self {
        EdgeTarget::Ref(id.into())
    }
}

impl From<String> for EdgeTarget {
    fn from(id: String) -> Self {
        EdgeTarget::Ref(id.into())
    }
}

impl From<Vec<ForwardRef>> for EdgeTarget {
    fn from(group: Vec<ForwardRef>) -> Self {
        EdgeTarget::Group(group)
    }
}

/// An edge between two or more targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    targets: Vec<EdgeTarget>,
    pub comment: Option<String>,
    attributes: AttributesGroup,
}

impl Edge {
    /// Creates an edge. Fails with `InvalidEdgeTargets` unless there are at
    /// least two targets and every group is non-empty.
    pub fn new<I, T>(targets: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<EdgeTarget>,
    {
        let targets: Vec<EdgeTarget> = targets.into_iter().map(Into::into).collect();
        let resolvable = targets
            .iter()
            .filter(|t| match t {
                EdgeTarget::Ref(_) => true,
                EdgeTarget::Group(g) => !g.is_empty(),
            })
            .count();
        if targets.len() < 2 || resolvable != targets.len() {
            return Result::Err(Error::InvalidEdgeTargets { found: resolvable });
        }
        Result::Ok(Self {
            targets,
            comment: Option::None,
            attributes: AttributesGroup::new(),
        })
    }

    pub fn targets(&self) -> &[EdgeTarget] {
        &self.targets
    }

    pub fn attributes(&self) -> &AttributesGroup {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributesGroup {
        &mut self.attributes
    }

    /// \returns true if \p other connects the same targets. In an undirected
    /// graph, an edge also matches its reverse.
    pub fn same_endpoints(&self, other: &Edge, directed: bool) -> bool {
        if self.targets == other.targets {
            return true;
        }
        !directed && self.targets.iter().eq(other.targets.iter().rev())
    }
}

impl HasAttributes for Edge {
    fn attribute_map(&self) -> &Attributes {
        self.attributes.attribute_map()
    }
    fn attribute_map_mut(&mut self) -> &mut Attributes {
        self.attributes.attribute_map_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gv::parser::ast::Compass;

    #[test]
    fn edge_arity() {
        let a = Node::new("a");
        let b = Node::new("b");
        let none: Vec<EdgeTarget> = Vec::new();
        assert_eq!(
            Edge::new(none).unwrap_err(),
            Error::InvalidEdgeTargets { found: 0 }
        );
        assert_eq!(
            Edge::new([&a]).unwrap_err(),
            Error::InvalidEdgeTargets { found: 1 }
        );
        assert!(Edge::new([&a, &b]).is_ok());
        let empty = EdgeTarget::Group(vec![]);
        assert!(Edge::new([EdgeTarget::from(&a), empty]).is_err());
    }

    #[test]
    fn groups_and_ports() {
        let a = Node::new("a");
        let group = vec![ForwardRef::new("b"), a.port(Compass::E)];
        let edge = Edge::new([EdgeTarget::from("x"), group.into()]).unwrap();
        assert_eq!(edge.targets().len(), 2);
        assert!(matches!(&edge.targets()[1], EdgeTarget::Group(g) if g.len() == 2));
    }

    #[test]
    fn reversed_endpoints() {
        let ab = Edge::new(["a", "b"]).unwrap();
        let ba = Edge::new(["b", "a"]).unwrap();
        assert!(ab.same_endpoints(&ab.clone(), true));
        assert!(!ab.same_endpoints(&ba, true));
        assert!(ab.same_endpoints(&ba, false));
    }
}
