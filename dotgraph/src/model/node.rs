use super::attributes::{Attributes, AttributesGroup, HasAttributes};
use crate::gv::parser::ast::Compass;

/// A node of a graph, identified by its id.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    pub comment: Option<String>,
    attributes: AttributesGroup,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            comment: Option::None,
            attributes: AttributesGroup::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attributes(&self) -> &AttributesGroup {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributesGroup {
        &mut self.attributes
    }

    /// \returns a reference to a port of this node that can be used as an
    /// edge target, for example `node.port("p")` or `node.port(Compass::N)`.
    pub fn port(&self, port: impl Into<Port>) -> ForwardRef {
        let port = port.into();
        ForwardRef {
            id: self.id.clone(),
            port: port.port,
            compass: port.compass,
        }
    }
}

impl HasAttributes for Node {
    fn attribute_map(&self) -> &Attributes {
        self.attributes.attribute_map()
    }
    fn attribute_map_mut(&mut self) -> &mut Attributes {
        self.attributes.attribute_map_mut()
    }
}

/// The port part of a node reference: `:port`, `:compass` or
/// `:port:compass`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Port {
    pub port: Option<String>,
    pub compass: Option<Compass>,
}

impl From<&str> for Port {
    fn from(port: &str) -> Self {
        Port {
            port: Option::Some(port.to_string()),
            compass: Option::None,
        }
    }
}

impl From<String> for Port {
    fn from(port: String) -> Self {
        Port {
            port: Option::Some(port),
            compass: Option::None,
        }
    }
}

impl From<Compass> for Port {
    fn from(compass: Compass) -> Self {
        Port {
            port: Option::None,
            compass: Option::Some(compass),
        }
    }
}

impl From<(&str, Compass)> for Port {
    fn from((port, compass): (&str, Compass)) -> Self {
        Port {
            port: Option::Some(port.to_string()),
            compass: Option::Some(compass),
        }
    }
}

/// A reference to a node by id. The node does not need to exist in any
/// graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForwardRef {
    pub id: String,
    pub port: Option<String>,
    pub compass: Option<Compass>,
}

impl ForwardRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            port: Option::None,
            compass: Option::None,
        }
    }
}

impl From<&Node> for ForwardRef {
    fn from(node: &Node) -> Self {
        ForwardRef::new(node.id())
    }
}

impl From<&str> for ForwardRef {
    fn from(id: &str) -> Self {
        ForwardRef::new(id)
    }
}

impl From<String> for ForwardRef {
    fn from(id: String) -> Self {
        ForwardRef::new(id)
    }
}

#[test]
fn test_node_ports() {
    let mut node = Node::new("a");
    node.set("shape", "box");
    assert_eq!(node.get("shape").and_then(|v| v.as_str()), Some("box"));

    let r = node.port("p");
    assert_eq!(r.id, "a");
    assert_eq!(r.port.as_deref(), Some("p"));
    assert_eq!(r.compass, None);

    let r = node.port(Compass::SW);
    assert_eq!(r.port, None);
    assert_eq!(r.compass, Some(Compass::SW));

    let r = node.port(("p", Compass::Any));
    assert_eq!(r.port.as_deref(), Some("p"));
    assert_eq!(r.compass, Some(Compass::Any));
}
