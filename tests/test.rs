#[cfg(test)]
mod tests {

    use dotgraph::convert::to_ast::convert_attribute;
    use dotgraph::gv::parser::ast::{
        AstKind, AstRef, CommentKind, Compass, Quoting,
    };
    use dotgraph::gv::parser::printer::{
        default_plugins, escape, PrintContext, PrintPlugin,
    };
    use dotgraph::gv::{Builder, DotParser, Lexer, Printer, Token};
    use dotgraph::model::{
        AttributeValue, Cluster, Edge, EdgeTarget, HasAttributes, Node,
        RootGraph,
    };
    use dotgraph::{
        EndOfLine, Error, IndentStyle, ParseOptions, PrintOptions, StartRule,
        ToAstOptions, ToDotOptions,
    };
    use pretty_assertions::assert_eq;

    fn is_identifier(t: Token, target: &str) -> bool {
        match t {
            Token::Identifier(name) => target == name,
            _ => false,
        }
    }

    fn get_sample_program2() -> String {
        r##"/* ancestor graph from Caroline Bouvier Kennedy */
        graph G {
            I5 [shape=ellipse,color=red,style=bold,label="Caroline Bouvier Kennedy\nb. 27.11.1957 New York",image="images/165px-Caroline_Kennedy.jpg",labelloc=b];
            I1 [shape=box,color=blue,style=bold,label="John Fitzgerald Kennedy\nb. 29.5.1917 Brookline\nd. 22.11.1963 Dallas",image="images/kennedyface.jpg",labelloc=b];
            I6 [shape=box,color=blue,style=bold,label="John Fitzgerald Kennedy\nb. 25.11.1960 Washington\nd. 16.7.1999 over the Atlantic Ocean, near Aquinnah, MA, USA",image="images/180px-JFKJr2.jpg",labelloc=b];
            I7 [shape=box,color=blue,style=bold,label="Patrick Bouvier Kennedy\nb. 7.8.1963\nd. 9.8.1963"];
            I2 [shape=ellipse,color=red,style=bold,label="Jaqueline Lee Bouvier\nb. 28.7.1929 Southampton\nd. 19.5.1994 New York City",image="images/jacqueline-kennedy-onassis.jpg",labelloc=b];
             I1 -- I5  [style=bold,color=blue];
             I1 -- I6  [style=bold,color=orange];
             I2 -- I6  [style=bold,color=orange];
             I1 -- I7  [style=bold,color=orange];
             I2 -- I7  [style=bold,color=orange];
             I1 -- I2  [style=bold,color=violet];
            }
        "##
        .to_string()
    }

    fn get_canonical_program() -> String {
        r##"/**
 * header
 */
strict digraph G {
  rankdir = LR;
  node [
    shape = box;
    color = "#ff0000";
  ];
  // first
  a [
    label = <<b>A</b>>;
  ];
  subgraph cluster_0 {
    b;
    c:n -> d:p:sw;
  }
  subgraph {
    e;
  }
  a -> {b c} -> d [
    weight = 2;
  ];
}"##
        .to_string()
    }

    fn parse_or_panic(input: &str) -> dotgraph::gv::parser::ast::Dot {
        match dotgraph::parse(input) {
            Result::Ok(dot) => dot,
            Result::Err(Error::Syntax(err)) => {
                println!("{}", err.snippet(input));
                panic!("Error: {}", err);
            }
            Result::Err(err) => panic!("Error: {}", err),
        }
    }

    #[test]
    fn simple() {
        let mut lexer = Lexer::from_string("a -> b");
        let t0 = lexer.next_token();
        let t1 = lexer.next_token();
        let t2 = lexer.next_token();
        assert!(is_identifier(t0, "a"));
        assert!(matches!(t1, Token::ArrowRight));
        assert!(is_identifier(t2, "b"));
    }

    #[test]
    fn simple_number() {
        let mut lexer = Lexer::from_string("-12345");
        assert!(is_identifier(lexer.next_token(), "-12345"));
        assert!(matches!(lexer.next_token(), Token::EOF));
    }

    #[test]
    fn simple_float_number() {
        let mut lexer = Lexer::from_string("1.12");
        assert!(is_identifier(lexer.next_token(), "1.12"));
        assert!(matches!(lexer.next_token(), Token::EOF));
    }

    #[test]
    fn simple_program() {
        let mut lexer = Lexer::from_string("digraph { a -> b; } ");
        assert!(matches!(lexer.next_token(), Token::DigraphKW));
        assert!(matches!(lexer.next_token(), Token::OpenBrace));
        assert!(matches!(lexer.next_token(), Token::Identifier(_)));
        assert!(matches!(lexer.next_token(), Token::ArrowRight));
        assert!(matches!(lexer.next_token(), Token::Identifier(_)));
        assert!(matches!(lexer.next_token(), Token::Semicolon));
        assert!(matches!(lexer.next_token(), Token::CloseBrace));
        assert!(matches!(lexer.next_token(), Token::EOF));
    }

    #[test]
    fn lex_program() {
        let program = get_sample_program2();
        let mut lexer = Lexer::from_string(&program[..]);
        let first = lexer.next_token();
        assert_eq!(
            first,
            Token::Comment(
                CommentKind::Block,
                "ancestor graph from Caroline Bouvier Kennedy".to_string()
            )
        );
        let mut tok = lexer.next_token();
        while !matches!(tok, Token::EOF) {
            if let Token::Error(msg) = tok {
                panic!("Error: {}", msg);
            }
            tok = lexer.next_token();
        }
    }

    #[test]
    fn parse_program0() {
        parse_or_panic("graph { a -- b; b -- c;}");
    }

    #[test]
    fn parse_program1() {
        let dot = parse_or_panic("graph { a -- b -- c; }");
        let graph = dot.graph().unwrap();
        assert_eq!(graph.children().len(), 1);
    }

    #[test]
    fn parse_program2() {
        let program = get_sample_program2();
        let dot = parse_or_panic(&program);
        assert_eq!(dot.children().len(), 2);
        let g = dotgraph::from_dot(&program).unwrap();
        assert_eq!(g.comment(), Some("ancestor graph from Caroline Bouvier Kennedy"));
        assert_eq!(g.nodes().count(), 5);
        assert_eq!(g.edges().len(), 6);
    }

    #[test]
    fn parse_program_fail() {
        let mut parser = DotParser::new("graph { } s");
        assert!(matches!(parser.process(), Result::Err(Error::Syntax(_))));
    }

    #[test]
    fn syntax_error_location() {
        let input = "digraph {\n  a -> ;\n}";
        let options = ParseOptions {
            filename: Some("input.dot".to_string()),
            ..ParseOptions::default()
        };
        let Result::Err(Error::Syntax(err)) = dotgraph::parse_with(input, &options) else {
            panic!("expected a syntax error");
        };
        assert_eq!(err.location.start.line, 2);
        assert_eq!(err.location.start.column, 8);
        assert_eq!(err.found.as_deref(), Some(";"));
        assert!(err.to_string().starts_with("input.dot:2:8: Expected"));
        assert_eq!(err.snippet(input), "   2 |   a -> ;\n     |        ^");
    }

    #[test]
    fn start_rules() {
        let options = ParseOptions {
            start_rule: StartRule::AttributeList,
            ..ParseOptions::default()
        };
        let node = dotgraph::parse_with("edge [color = red]", &options)
            .unwrap()
            .into_node()
            .unwrap();
        assert_eq!(node.kind(), AstKind::AttributeList);
        assert_eq!(dotgraph::stringify(&node).unwrap(), "edge [\n  color = red;\n];");
    }

    #[test]
    fn print_edge_with_label() {
        let mut g = RootGraph::digraph();
        g.create_edge(["a", "b"], [("label", "x")]).unwrap();
        assert_eq!(
            dotgraph::to_dot(&g).unwrap(),
            "digraph {\n  \"a\" -> \"b\" [\n    label = \"x\";\n  ];\n}"
        );
    }

    #[test]
    fn edge_operator_follows_the_graph() {
        let mut d = RootGraph::digraph();
        d.create_edge(["a", "b", "c"], Vec::<(&str, &str)>::new()).unwrap();
        d.create_subgraph(None)
            .create_edge(["x", "y"], Vec::<(&str, &str)>::new())
            .unwrap();
        let text = dotgraph::to_dot(&d).unwrap();
        assert!(text.contains("\"a\" -> \"b\" -> \"c\";"));
        assert!(text.contains("\"x\" -> \"y\";"));
        assert!(!text.contains("--"));

        let mut g = RootGraph::graph();
        g.create_edge(["a", "b"], Vec::<(&str, &str)>::new()).unwrap();
        g.create_subgraph(None)
            .create_edge(["x", "y"], Vec::<(&str, &str)>::new())
            .unwrap();
        let text = dotgraph::to_dot(&g).unwrap();
        assert!(text.contains("\"a\" -- \"b\";"));
        assert!(text.contains("\"x\" -- \"y\";"));
        assert!(!text.contains("->"));
    }

    #[test]
    fn html_like_literals() {
        let mut b = Builder::default();
        let html = convert_attribute(&mut b, "label", &AttributeValue::from("<b>bold</b>")).unwrap();
        assert_eq!(html.value().quoted(), Quoting::Html);

        let text = convert_attribute(&mut b, "label", &AttributeValue::from("plain text")).unwrap();
        assert_eq!(text.value().quoted(), Quoting::Quoted);
        let printer = Printer::default();
        assert_eq!(printer.print(text.value()).unwrap(), "\"plain text\"");
        assert_eq!(printer.print(&text).unwrap(), "label = \"plain text\";");
    }

    #[test]
    fn escaping() {
        assert_eq!(escape("a\"b\nc"), "a\\\"b\\nc");
        let mut g = RootGraph::graph();
        g.create_node("n", [("label", "say \"hi\"\r\nbye\0")]);
        let text = dotgraph::to_dot(&g).unwrap();
        assert!(text.contains("label = \"say \\\"hi\\\"\\r\\nbye\";"));
        let back = dotgraph::from_dot(&text).unwrap();
        assert_eq!(
            back.get_node("n").unwrap().get("label"),
            Some(&AttributeValue::from("say \"hi\"\\r\\nbye"))
        );
    }

    #[test]
    fn node_count_guard() {
        let mut g = RootGraph::digraph();
        g.create_edge(["a", "b"], [("label", "x")]).unwrap();
        let limited = |max_ast_nodes| ToDotOptions {
            convert: ToAstOptions {
                max_ast_nodes,
                ..ToAstOptions::default()
            },
            ..ToDotOptions::default()
        };
        assert_eq!(
            dotgraph::to_dot_with(&g, &limited(5)).unwrap_err(),
            Error::NodeCountExceeded { limit: 5 }
        );
        assert!(dotgraph::to_dot_with(&g, &limited(1000)).is_ok());

        // Every conversion starts counting from zero.
        let options = limited(20);
        for _ in 0..200 {
            assert!(dotgraph::to_dot_with(&g, &options).is_ok());
        }

        let parse = ParseOptions {
            max_ast_nodes: 5,
            ..ParseOptions::default()
        };
        assert_eq!(
            dotgraph::parse_with("digraph { a -> b [label = x]; }", &parse).unwrap_err(),
            Error::NodeCountExceeded { limit: 5 }
        );
    }

    #[test]
    fn comment_attachment() {
        let g = dotgraph::from_dot("digraph {\n  // note\n  a -> b;\n}").unwrap();
        assert_eq!(g.edges()[0].comment.as_deref(), Some("note"));

        let g = dotgraph::from_dot("digraph {\n  // note\n\n  a -> b;\n}").unwrap();
        assert_eq!(g.edges()[0].comment, None);
    }

    #[test]
    fn cluster_children_order() {
        let mut g = RootGraph::graph().with_id("G");
        g.create_edge(["a", "b"], Vec::<(&str, &str)>::new())
            .unwrap()
            .comment = Some("edge".to_string());
        g.create_subgraph(Some("cluster_0")).node("c");
        g.create_node("a", [("shape", "box")]).comment = Some("node".to_string());
        g.defaults_mut().edge.set("color", "blue");
        g.defaults_mut().graph.set("label", "top");
        g.defaults_mut().graph.comment = Some("defaults".to_string());
        g.set("rankdir", "LR");
        g.set_comment(Some("graph".to_string()));

        let expected = r##"// graph
graph "G" {
  rankdir = "LR";
  // defaults
  graph [
    label = "top";
  ];
  edge [
    color = "blue";
  ];
  // node
  "a" [
    shape = "box";
  ];
  subgraph "cluster_0" {
    "c";
  }
  // edge
  "a" -- "b";
}"##;
        assert_eq!(dotgraph::to_dot(&g).unwrap(), expected);
    }

    #[test]
    fn print_options() {
        let mut g = RootGraph::digraph();
        g.create_node("a", [("label", "x")]);
        let options = ToDotOptions {
            convert: ToAstOptions::default(),
            print: PrintOptions {
                indent_style: IndentStyle::Tab,
                indent_size: 2,
                end_of_line: EndOfLine::Crlf,
            },
        };
        assert_eq!(
            dotgraph::to_dot_with(&g, &options).unwrap(),
            "digraph {\r\n\t\"a\" [\r\n\t\tlabel = \"x\";\r\n\t];\r\n}"
        );
        let options = ToDotOptions {
            print: PrintOptions {
                indent_size: 4,
                ..PrintOptions::default()
            },
            ..ToDotOptions::default()
        };
        assert_eq!(
            dotgraph::to_dot_with(&g, &options).unwrap(),
            "digraph {\n    \"a\" [\n        label = \"x\";\n    ];\n}"
        );
    }

    #[test]
    fn comment_kinds() {
        let mut g = RootGraph::digraph();
        g.create_node("a", Vec::<(&str, &str)>::new()).comment =
            Some("one\ntwo */ three".to_string());
        for (kind, expected) in [
            (CommentKind::Slash, "  // one\n  // two */ three\n"),
            (CommentKind::Macro, "  # one\n  # two */ three\n"),
            (CommentKind::Block, "  /**\n   * one\n   * two * / three\n   */\n"),
        ] {
            let options = ToDotOptions {
                convert: ToAstOptions {
                    comment_kind: kind,
                    ..ToAstOptions::default()
                },
                ..ToDotOptions::default()
            };
            let text = dotgraph::to_dot_with(&g, &options).unwrap();
            assert_eq!(text, format!("digraph {{\n{}  \"a\";\n}}", expected));
            let back = dotgraph::from_dot(&text).unwrap();
            assert!(back.get_node("a").unwrap().comment.is_some());
        }
    }

    #[test]
    fn line_comments_keep_block_terminators() {
        let g = dotgraph::from_dot("digraph {\n  // see a*/b\n  a;\n}").unwrap();
        let comment = |g: &RootGraph| g.get_node("a").unwrap().comment.clone();
        assert_eq!(comment(&g), Some("see a*/b".to_string()));
        let text = dotgraph::to_dot(&g).unwrap();
        assert!(text.contains("// see a*/b"));
        let back = dotgraph::from_dot(&text).unwrap();
        assert_eq!(comment(&back), Some("see a*/b".to_string()));
    }

    #[test]
    fn same_line_comments_are_not_attached() {
        let g = dotgraph::from_dot("digraph {\n  /* c */ a;\n  b;\n}").unwrap();
        assert_eq!(g.get_node("a").unwrap().comment, Option::None);
        let g = dotgraph::from_dot("digraph {\n  /* c */\n  a;\n}").unwrap();
        assert_eq!(g.get_node("a").unwrap().comment, Some("c".to_string()));
    }

    #[test]
    fn unset_attributes_keep_their_value() {
        let mut g = RootGraph::digraph();
        let a = g.create_node("a", [("color", "red")]);
        a.set_opt("color", Option::<&str>::None);
        a.set_opt("shape", Option::<&str>::None);
        assert_eq!(a.get("color"), Some(&AttributeValue::from("red")));
        assert_eq!(a.get("shape"), Option::None);
        let text = dotgraph::to_dot(&g).unwrap();
        assert_eq!(text, "digraph {\n  \"a\" [\n    color = \"red\";\n  ];\n}");
    }

    fn sample_model() -> RootGraph {
        let mut g = RootGraph::digraph().with_id("G").with_strict(true);
        g.set_comment(Some("a sample\nof two lines".to_string()));
        g.set("rankdir", "LR").set("nodesep", 0.5).set("compound", true);
        g.defaults_mut().node.set("shape", "box");
        g.defaults_mut().edge.set("arrowhead", "vee");

        let a = g.create_node("a", [("label", "<<b>A</b>>")]).clone();
        g.node("a").attributes_mut().comment = Some("inside".to_string());
        g.create_node("b", [("width", 2)]).comment = Some("node b".to_string());

        let sub = g.create_subgraph(Some("cluster_x"));
        sub.set("label", "X");
        sub.set_comment(Some("the cluster".to_string()));
        sub.node("c");
        sub.create_subgraph(None).node("d");
        sub.create_edge(["c", "d"], Vec::<(&str, &str)>::new()).unwrap();

        let group = vec![a.port("p"), Node::new("c").port(Compass::NE)];
        let edge = g
            .create_edge(
                [
                    EdgeTarget::from(a.port(("out", Compass::S))),
                    EdgeTarget::from(group),
                ],
                [("color", "red")],
            )
            .unwrap();
        edge.comment = Some("the edge".to_string());
        g.create_edge(["b", "a"], [("style", "dashed")]).unwrap();
        g
    }

    #[test]
    fn model_round_trip() {
        let g = sample_model();
        let text = dotgraph::to_dot(&g).unwrap();
        let back = dotgraph::from_dot(&text).unwrap();
        assert_eq!(back, g);
        assert_eq!(dotgraph::to_dot(&back).unwrap(), text);
    }

    #[test]
    fn parse_print_idempotence() {
        let program = get_canonical_program();
        let dot = parse_or_panic(&program);
        assert_eq!(dotgraph::stringify(&dot).unwrap(), program);
    }

    #[test]
    fn edge_arity() {
        let a = Node::new("a");
        let b = Node::new("b");
        assert!(matches!(
            Edge::new(Vec::<&Node>::new()),
            Result::Err(Error::InvalidEdgeTargets { .. })
        ));
        assert!(matches!(
            Edge::new([&a]),
            Result::Err(Error::InvalidEdgeTargets { .. })
        ));
        assert!(Edge::new([&a, &b]).is_ok());
    }

    #[test]
    fn empty_dot_is_not_printable() {
        let mut b = Builder::default();
        let dot = b.dot(vec![], None).unwrap();
        assert!(dotgraph::stringify(&dot).is_err());
    }

    // Prints every literal in double quotes.
    struct QuoteEverything;

    impl PrintPlugin for QuoteEverything {
        fn matches(&self, ast: AstRef<'_>) -> bool {
            matches!(ast, AstRef::Literal(l) if l.quoted() == Quoting::Unquoted)
        }
        fn print(
            &self,
            _ctx: &mut PrintContext<'_>,
            ast: AstRef<'_>,
        ) -> dotgraph::Result<String> {
            let AstRef::Literal(l) = ast else {
                return Result::Err(Error::Conversion("expected a literal".into()));
            };
            Result::Ok(format!("\"{}\"", escape(l.value())))
        }
    }

    #[test]
    fn custom_print_plugins() {
        let dot = parse_or_panic("digraph { a -> b }");
        let mut plugins: Vec<Box<dyn PrintPlugin>> = vec![Box::new(QuoteEverything)];
        plugins.extend(default_plugins());
        let printer = Printer::with_plugins(PrintOptions::default(), plugins);
        assert_eq!(printer.print(&dot).unwrap(), "digraph {\n  \"a\" -> \"b\";\n}");

        let printer = Printer::with_plugins(PrintOptions::default(), vec![]);
        assert!(matches!(printer.print(&dot), Result::Err(Error::Conversion(_))));
    }
}
