//! A collection of methods for dumping the AST in a readable tree form.

use super::ast::{self, AstRef};
use std::fmt::Write;

fn dump_literal(out: &mut String, lit: &ast::Literal) {
    match lit.quoted() {
        ast::Quoting::Quoted => {
            let _ = write!(out, "{:?}", lit.value());
        }
        ast::Quoting::Html => {
            let _ = write!(out, "<{}>", lit.value());
        }
        ast::Quoting::Unquoted => out.push_str(lit.value()),
    }
}

fn dump_node_ref(out: &mut String, n: &ast::NodeRef) {
    dump_literal(out, n.id());
    if let Option::Some(port) = n.port() {
        out.push(':');
        dump_literal(out, port);
    }
    if let Option::Some(compass) = n.compass() {
        out.push(':');
        dump_literal(out, compass);
    }
}

fn dump_location(out: &mut String, loc: Option<ast::Location>) {
    if let Option::Some(loc) = loc {
        let _ = write!(out, " @{}", loc);
    }
}

fn dump_node(out: &mut String, node: AstRef, indent: usize) {
    out.push_str(&" ".repeat(indent));
    let _ = write!(out, "{:?}", node.kind());
    match node {
        AstRef::Graph(g) => {
            if g.strict() {
                out.push_str(" strict");
            }
            out.push_str(if g.directed() { " directed" } else { " undirected" });
            if let Option::Some(id) = g.id() {
                out.push(' ');
                dump_literal(out, id);
            }
        }
        AstRef::Subgraph(g) => {
            if let Option::Some(id) = g.id() {
                out.push(' ');
                dump_literal(out, id);
            }
        }
        AstRef::Node(n) => {
            out.push(' ');
            dump_literal(out, n.id());
        }
        AstRef::Edge(e) => {
            for (i, target) in e.targets().iter().enumerate() {
                out.push_str(if i == 0 { " " } else { " , " });
                match target {
                    ast::EdgeTarget::NodeRef(r) => dump_node_ref(out, r),
                    ast::EdgeTarget::Group(g) => {
                        out.push('{');
                        for (j, r) in g.children().iter().enumerate() {
                            if j > 0 {
                                out.push(' ');
                            }
                            dump_node_ref(out, r);
                        }
                        out.push('}');
                    }
                }
            }
        }
        AstRef::NodeRef(r) => {
            out.push(' ');
            dump_node_ref(out, r);
        }
        AstRef::AttributeList(l) => {
            out.push(' ');
            out.push_str(l.kind().keyword());
        }
        AstRef::Attribute(a) => {
            out.push(' ');
            dump_literal(out, a.key());
            out.push_str(" = ");
            dump_literal(out, a.value());
        }
        AstRef::Literal(l) => {
            out.push(' ');
            dump_literal(out, l);
        }
        AstRef::Comment(c) => {
            let _ = write!(out, " {:?} {:?}", c.kind(), c.value());
        }
        AstRef::Dot(_) | AstRef::NodeRefGroup(_) => {}
    }
    dump_location(out, node.location());
    out.push('\n');
    for child in node.children() {
        dump_node(out, child, indent + 2);
    }
}

/// \returns a tree-shaped dump of \p node, one AST node per line, for
/// debugging.
pub fn dump_ast<'a>(node: impl Into<AstRef<'a>>) -> String {
    let mut out = String::new();
    dump_node(&mut out, node.into(), 0);
    out
}

#[test]
fn test_dump_ast() {
    use super::parser::DotParser;

    let mut parser = DotParser::new("graph G { a -- b [w=1]; }");
    let dot = parser.process().unwrap();
    let dump = dump_ast(&dot);
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Dot"));
    assert!(lines[1].starts_with("  Graph undirected G"));
    assert!(lines[2].starts_with("    Edge a , b"));
    assert!(lines[3].starts_with("      Attribute w = 1"));
}
