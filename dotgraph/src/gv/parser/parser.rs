use super::ast::{self, AttributeItem, Compass, Location, Position, Quoting};
use super::builder::{Builder, BuilderOptions, DEFAULT_MAX_AST_NODES};
use super::lexer::Lexer;
use super::lexer::Token;
use crate::error::{Expectation, Result, SyntaxError};

/// The grammar production that the parser starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartRule {
    /// A whole file: one graph, with optional comments around it.
    #[default]
    Dot,
    Graph,
    Node,
    Edge,
    AttributeList,
    Attribute,
    Subgraph,
    /// The body of a graph, without the braces.
    ClusterStatements,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub start_rule: StartRule,
    /// Reported in syntax errors.
    pub filename: Option<String>,
    pub max_ast_nodes: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            start_rule: StartRule::Dot,
            filename: Option::None,
            max_ast_nodes: DEFAULT_MAX_AST_NODES,
        }
    }
}

/// The result of a parse: a single node, or a list of statements when
/// parsing with `StartRule::ClusterStatements`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutput {
    Node(ast::AstNode),
    Statements(Vec<ast::Statement>),
}

impl ParseOutput {
    pub fn into_node(self) -> Option<ast::AstNode> {
        match self {
            ParseOutput::Node(n) => Option::Some(n),
            ParseOutput::Statements(_) => Option::None,
        }
    }
    pub fn into_statements(self) -> Option<Vec<ast::Statement>> {
        match self {
            ParseOutput::Node(_) => Option::None,
            ParseOutput::Statements(s) => Option::Some(s),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DotParser {
    lexer: Lexer,
    tok: Token,
    // The range of the current token.
    start: Position,
    end: Position,
    // The end of the last token that was consumed.
    prev_end: Position,
    // Comments that were skipped and not yet placed in the tree.
    comments: Vec<ast::Comment>,
    // Set while parsing the body of a graph; selects the legal edge operator.
    directed: Option<bool>,
    builder: Builder,
    filename: Option<String>,
    // How many subgraph bodies enclose the current token.
    depth: usize,
}

/// The deepest subgraph nesting that the parser accepts. Each level
/// recurses, so this bounds the stack.
pub const MAX_NESTING_DEPTH: usize = 32;

fn id_expectations() -> Vec<Expectation> {
    vec![
        Expectation::class("identifier"),
        Expectation::class("quoted string"),
        Expectation::class("HTML string"),
    ]
}

fn is_id_token(tok: &Token) -> bool {
    matches!(
        tok,
        Token::Identifier(_) | Token::QuotedString(_) | Token::HtmlString(_)
    )
}

impl DotParser {
    pub fn new(input: &str) -> Self {
        Self::with_options(input, &ParseOptions::default())
    }

    pub fn with_options(input: &str, options: &ParseOptions) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let builder = Builder::new(BuilderOptions {
            max_ast_nodes: options.max_ast_nodes,
        });
        Self {
            lexer: Lexer::new(chars),
            tok: Token::Colon,
            start: Position::new(0, 1, 1),
            end: Position::new(0, 1, 1),
            prev_end: Position::new(0, 1, 1),
            comments: Vec::new(),
            directed: Option::None,
            builder,
            filename: options.filename.clone(),
            depth: 0,
        }
    }

    /// \returns the number of AST nodes that were created so far.
    pub fn node_count(&self) -> usize {
        self.builder.count()
    }

    // Creates a syntax error at the current token.
    fn unexpected<T>(&self, expected: Vec<Expectation>) -> Result<T> {
        let mut err = SyntaxError::new(
            expected,
            self.tok.text(),
            Location::new(self.start, self.end),
        );
        err.filename = self.filename.clone();
        Result::Err(err.into())
    }

    // The location of everything that was consumed since \p start.
    fn since(&self, start: Position) -> Option<Location> {
        Option::Some(Location::new(start, self.prev_end))
    }

    /// Moves to the next token. Comments are collected on the side, and
    /// lexer errors are turned into syntax errors.
    pub fn lex(&mut self) -> Result<()> {
        self.prev_end = self.end;
        loop {
            let tok = self.lexer.next_token();
            self.start = self.lexer.start;
            self.end = self.lexer.end;
            match tok {
                Token::Comment(kind, value) => {
                    let loc = Option::Some(Location::new(self.start, self.end));
                    let comment = self.builder.comment(kind, value, loc)?;
                    self.comments.push(comment);
                }
                Token::Error(msg) => {
                    self.tok = Token::Error(msg.clone());
                    let mut err = SyntaxError::new(
                        vec![Expectation::Other(msg.clone())],
                        self.tok.text(),
                        Location::new(self.start, self.end),
                    );
                    err.message = msg;
                    err.filename = self.filename.clone();
                    return Result::Err(err.into());
                }
                _ => {
                    self.tok = tok;
                    return Result::Ok(());
                }
            }
        }
    }

    // Consumes the token \p expected, or fails.
    fn expect(&mut self, expected: Token) -> Result<()> {
        if self.tok == expected {
            return self.lex();
        }
        let text = expected.text().unwrap_or_default();
        self.unexpected(vec![Expectation::Literal(text)])
    }

    fn expect_end(&mut self) -> Result<()> {
        if let Token::EOF = self.tok {
            return Result::Ok(());
        }
        self.unexpected(vec![Expectation::End])
    }

    // Skips an optional ';'.
    fn skip_semicolon(&mut self) -> Result<()> {
        if let Token::Semicolon = self.tok {
            self.lex()?;
        }
        Result::Ok(())
    }

    fn take_comments(&mut self) -> Vec<ast::Comment> {
        std::mem::take(&mut self.comments)
    }

    // ID : identifier | numeral | "string" [ + "string" ]* | <html>
    pub fn parse_id(&mut self) -> Result<ast::Literal> {
        let start = self.start;
        match self.tok.clone() {
            Token::Identifier(name) => {
                self.lex()?;
                let loc = self.since(start);
                self.builder.literal(name, Quoting::Unquoted, loc)
            }
            Token::HtmlString(html) => {
                self.lex()?;
                let loc = self.since(start);
                self.builder.literal(html, Quoting::Html, loc)
            }
            Token::QuotedString(s) => {
                let mut value = s;
                self.lex()?;
                // Handle concatenation: "a" + "b".
                while let Token::Plus = self.tok {
                    self.lex()?;
                    if let Token::QuotedString(rest) = self.tok.clone() {
                        value.push_str(&rest);
                        self.lex()?;
                    } else {
                        return self
                            .unexpected(vec![Expectation::class("quoted string")]);
                    }
                }
                let loc = self.since(start);
                self.builder.literal(value, Quoting::Quoted, loc)
            }
            _ => self.unexpected(id_expectations()),
        }
    }

    fn parse_optional_id(&mut self) -> Result<Option<ast::Literal>> {
        if is_id_token(&self.tok) {
            return Result::Ok(Option::Some(self.parse_id()?));
        }
        Result::Ok(Option::None)
    }

    // compass_pt : n | ne | e | se | s | sw | w | nw | c | _
    fn parse_compass(&mut self) -> Result<ast::Literal> {
        if let Token::Identifier(name) | Token::QuotedString(name) = &self.tok {
            if Compass::parse(name).is_some() {
                return self.parse_id();
            }
        }
        let expected = Compass::ALL
            .iter()
            .map(|c| Expectation::literal(c.as_str()))
            .collect();
        self.unexpected(expected)
    }

    // dot : comment* graph comment*
    pub fn parse_dot(&mut self) -> Result<ast::Dot> {
        let start = self.start;
        let mut children: Vec<ast::DotItem> = self
            .take_comments()
            .into_iter()
            .map(ast::DotItem::Comment)
            .collect();
        let graph = self.parse_graph()?;
        children.push(ast::DotItem::Graph(graph));
        self.expect_end()?;
        for c in self.take_comments() {
            children.push(ast::DotItem::Comment(c));
        }
        let loc = Location::new(start, self.end);
        self.builder.dot(children, Option::Some(loc))
    }

    // graph : [ strict ] (graph | digraph) [ ID ] '{' stmt_list '}'
    pub fn parse_graph(&mut self) -> Result<ast::Graph> {
        let start = self.start;

        // Consume the 'strict' keyword.
        let mut strict = false;
        if let Token::StrictKW = self.tok {
            strict = true;
            self.lex()?;
        }

        let directed = match self.tok {
            Token::GraphKW => false,
            Token::DigraphKW => true,
            _ => {
                let mut expected = vec![
                    Expectation::literal("graph"),
                    Expectation::literal("digraph"),
                ];
                if !strict {
                    expected.push(Expectation::literal("strict"));
                }
                return self.unexpected(expected);
            }
        };
        self.lex()?;

        let id = self.parse_optional_id()?;
        self.expect(Token::OpenBrace)?;
        let saved = self.directed.replace(directed);
        let children = self.parse_stmt_list()?;
        self.directed = saved;
        self.expect(Token::CloseBrace)?;

        let loc = self.since(start);
        self.builder.graph(directed, strict, id, children, loc)
    }

    // Fails at the current token with a plain \p message.
    fn fail<T>(&self, message: String) -> Result<T> {
        let mut err = SyntaxError::new(
            vec![Expectation::Other(message.clone())],
            self.tok.text(),
            Location::new(self.start, self.end),
        );
        err.message = message;
        err.filename = self.filename.clone();
        Result::Err(err.into())
    }

    //subgraph : [ subgraph [ ID ] ] '{' stmt_list '}'
    pub fn parse_subgraph(&mut self) -> Result<ast::Subgraph> {
        if self.depth >= MAX_NESTING_DEPTH {
            return self.fail(format!(
                "subgraphs are nested more than {} levels deep",
                MAX_NESTING_DEPTH
            ));
        }
        self.depth += 1;
        let res = self.parse_subgraph_body();
        self.depth -= 1;
        res
    }

    fn parse_subgraph_body(&mut self) -> Result<ast::Subgraph> {
        let start = self.start;
        let mut id = Option::None;
        if let Token::SubgraphKW = self.tok {
            self.lex()?;
            id = self.parse_optional_id()?;
        }
        self.expect(Token::OpenBrace)?;
        let children = self.parse_stmt_list()?;
        self.expect(Token::CloseBrace)?;
        let loc = self.since(start);
        self.builder.subgraph(id, children, loc)
    }

    // stmt_list : [ stmt [ ';' ] stmt_list ]
    // Stops before the closing '}' (or at the end of the input).
    pub fn parse_stmt_list(&mut self) -> Result<Vec<ast::Statement>> {
        let mut list = Vec::new();

        loop {
            for c in self.take_comments() {
                list.push(ast::Statement::Comment(c));
            }
            match self.tok {
                Token::Semicolon => {
                    self.lex()?;
                }
                Token::CloseBrace | Token::EOF => {
                    return Result::Ok(list);
                }
                _ => {
                    let stmt = self.parse_stmt()?;
                    list.push(stmt);
                }
            }
        }
    }

    // stmt : node_stmt | edge_stmt | attr_stmt | ID '=' ID | subgraph
    pub fn parse_stmt(&mut self) -> Result<ast::Statement> {
        match self.tok {
            Token::Identifier(_) | Token::QuotedString(_) | Token::HtmlString(_) => {
                let start = self.start;
                let id = self.parse_id()?;
                if let Token::Equal = self.tok {
                    self.lex()?;
                    let value = self.parse_id()?;
                    let loc = self.since(start);
                    let attr = self.builder.attribute(id, value, loc)?;
                    return Result::Ok(ast::Statement::Attribute(attr));
                }
                let node_ref = self.parse_node_ref_rest(id, start)?;
                if self.is_edge_token() {
                    let target = ast::EdgeTarget::NodeRef(node_ref);
                    let edge = self.parse_edge_rhs(target, start)?;
                    return Result::Ok(ast::Statement::Edge(edge));
                }
                let node = self.parse_node_rest(node_ref, start)?;
                Result::Ok(ast::Statement::Node(node))
            }
            Token::SubgraphKW => {
                let subgraph = self.parse_subgraph()?;
                Result::Ok(ast::Statement::Subgraph(subgraph))
            }
            //attr_stmt : (graph | node | edge) attr_list
            Token::GraphKW | Token::NodeKW | Token::EdgeKW => {
                let list = self.parse_attr_stmt()?;
                Result::Ok(ast::Statement::AttributeList(list))
            }
            Token::OpenBrace => {
                // This is either a group of nodes on the left side of an
                // edge, or an anonymous subgraph.
                if let Option::Some(edge) = self.try_group_edge()? {
                    return Result::Ok(ast::Statement::Edge(edge));
                }
                let subgraph = self.parse_subgraph()?;
                Result::Ok(ast::Statement::Subgraph(subgraph))
            }
            _ => {
                let mut expected = id_expectations();
                expected.extend(
                    ["subgraph", "graph", "node", "edge", "{", "}"]
                        .iter()
                        .map(|s| Expectation::literal(s)),
                );
                self.unexpected(expected)
            }
        }
    }

    // Tries to parse "{a b} -> ...". Restores the parser state and returns
    // None if the input does not have this shape.
    fn try_group_edge(&mut self) -> Result<Option<ast::Edge>> {
        let saved = self.clone();
        let start = self.start;
        let group = match self.parse_node_ref_group() {
            Result::Ok(group) if self.is_edge_token() => group,
            _ => {
                // This also rolls back the node counter.
                *self = saved;
                return Result::Ok(Option::None);
            }
        };
        let target = ast::EdgeTarget::Group(group);
        let edge = self.parse_edge_rhs(target, start)?;
        Result::Ok(Option::Some(edge))
    }

    // Parses the optional ':port' and ':compass' suffixes after \p id.
    fn parse_node_ref_rest(
        &mut self,
        id: ast::Literal,
        start: Position,
    ) -> Result<ast::NodeRef> {
        let mut port = Option::None;
        let mut compass = Option::None;
        if let Token::Colon = self.tok {
            // Consume the colon.
            self.lex()?;
            let first = self.parse_id()?;
            if let Token::Colon = self.tok {
                self.lex()?;
                port = Option::Some(first);
                compass = Option::Some(self.parse_compass()?);
            } else if first.quoted() == Quoting::Unquoted
                && Compass::parse(first.value()).is_some()
            {
                compass = Option::Some(first);
            } else {
                port = Option::Some(first);
            }
        }
        let loc = self.since(start);
        self.builder.node_ref(id, port, compass, loc)
    }

    pub fn parse_node_ref(&mut self) -> Result<ast::NodeRef> {
        let start = self.start;
        let id = self.parse_id()?;
        self.parse_node_ref_rest(id, start)
    }

    // '{' node_ref+ '}'
    pub fn parse_node_ref_group(&mut self) -> Result<ast::NodeRefGroup> {
        let start = self.start;
        self.expect(Token::OpenBrace)?;
        let mut children = vec![self.parse_node_ref()?];
        loop {
            match self.tok {
                Token::CloseBrace => {
                    self.lex()?;
                    break;
                }
                Token::Comma | Token::Semicolon => {
                    self.lex()?;
                }
                _ => {
                    if !is_id_token(&self.tok) {
                        let mut expected = id_expectations();
                        expected.push(Expectation::literal("}"));
                        return self.unexpected(expected);
                    }
                    children.push(self.parse_node_ref()?);
                }
            }
        }
        let loc = self.since(start);
        self.builder.node_ref_group(children, loc)
    }

    fn parse_edge_target(&mut self) -> Result<ast::EdgeTarget> {
        if let Token::OpenBrace = self.tok {
            let group = self.parse_node_ref_group()?;
            return Result::Ok(ast::EdgeTarget::Group(group));
        }
        let node_ref = self.parse_node_ref()?;
        Result::Ok(ast::EdgeTarget::NodeRef(node_ref))
    }

    fn is_edge_token(&self) -> bool {
        matches!(self.tok, Token::ArrowLine | Token::ArrowRight)
    }

    //edge_stmt : (node_id | subgraph) edgeRHS [ attr_list ]
    fn parse_edge_rhs(
        &mut self,
        first: ast::EdgeTarget,
        start: Position,
    ) -> Result<ast::Edge> {
        let mut targets = vec![first];

        while self.is_edge_token() {
            // Graphs use '--' and digraphs use '->'.
            let directed = matches!(self.tok, Token::ArrowRight);
            if let Option::Some(expected) = self.directed {
                if expected != directed {
                    let op = if expected { "->" } else { "--" };
                    return self.unexpected(vec![Expectation::literal(op)]);
                }
            }
            // Consume the arrow.
            self.lex()?;
            targets.push(self.parse_edge_target()?);
        }
        if targets.len() < 2 {
            return self.unexpected(vec![
                Expectation::literal("->"),
                Expectation::literal("--"),
            ]);
        }
        // Parse the optional attribute list.
        let children = self.parse_attr_lists()?;
        let loc = self.since(start);
        self.builder.edge(targets, children, loc)
    }

    //node_stmt : node_id [ attr_list ]
    fn parse_node_rest(
        &mut self,
        node_ref: ast::NodeRef,
        start: Position,
    ) -> Result<ast::Node> {
        if node_ref.port.is_some() || node_ref.compass.is_some() {
            log::debug!(
                "ignoring the port of node {} in a node statement",
                node_ref.id.value()
            );
        }
        let children = self.parse_attr_lists()?;
        let loc = self.since(start);
        self.builder.node(node_ref.id, children, loc)
    }

    //attr_stmt : (graph | node | edge) attr_list
    pub fn parse_attr_stmt(&mut self) -> Result<ast::AttributeList> {
        let start = self.start;
        let kind = match self.tok {
            Token::GraphKW => ast::AttributeListKind::Graph,
            Token::NodeKW => ast::AttributeListKind::Node,
            Token::EdgeKW => ast::AttributeListKind::Edge,
            _ => {
                return self.unexpected(vec![
                    Expectation::literal("graph"),
                    Expectation::literal("node"),
                    Expectation::literal("edge"),
                ]);
            }
        };
        self.lex()?;
        if !matches!(self.tok, Token::OpenBracket) {
            return self.unexpected(vec![Expectation::literal("[")]);
        }
        let children = self.parse_attr_lists()?;
        let loc = self.since(start);
        self.builder.attribute_list(kind, children, loc)
    }

    //attr_list : '[' [ a_list ] ']' [ attr_list ]
    // Consecutive lists are merged. Returns an empty list if there is none.
    pub fn parse_attr_lists(&mut self) -> Result<Vec<AttributeItem>> {
        let mut items = Vec::new();
        while let Token::OpenBracket = self.tok {
            self.lex()?;
            loop {
                for c in self.take_comments() {
                    items.push(AttributeItem::Comment(c));
                }
                match self.tok {
                    Token::CloseBracket => {
                        self.lex()?;
                        break;
                    }
                    _ if is_id_token(&self.tok) => {
                        let attr = self.parse_attribute()?;
                        items.push(AttributeItem::Attribute(attr));
                        // Skip the separator.
                        if let Token::Semicolon | Token::Comma = self.tok {
                            self.lex()?;
                        }
                    }
                    _ => {
                        let mut expected = id_expectations();
                        expected.push(Expectation::literal("]"));
                        return self.unexpected(expected);
                    }
                }
            }
        }
        Result::Ok(items)
    }

    // ID '=' ID
    pub fn parse_attribute(&mut self) -> Result<ast::Attribute> {
        let start = self.start;
        let key = self.parse_id()?;
        self.expect(Token::Equal)?;
        let value = self.parse_id()?;
        let loc = self.since(start);
        self.builder.attribute(key, value, loc)
    }

    /// Parses dot files, as specified here:
    /// <https://graphviz.org/doc/info/lang.html>
    pub fn process(&mut self) -> Result<ast::Dot> {
        self.lex()?;
        let dot = self.parse_dot()?;
        log::debug!("parsed a graph with {} AST nodes", self.node_count());
        Result::Ok(dot)
    }

    // Discards the pending comments, which have no node to belong to.
    fn drop_comments(&mut self, rule: StartRule) {
        let dropped = self.take_comments();
        if !dropped.is_empty() {
            log::debug!(
                "dropping {} comments outside of the {:?} rule",
                dropped.len(),
                rule
            );
        }
    }

    /// Parses the input starting from the production \p rule.
    pub fn process_rule(&mut self, rule: StartRule) -> Result<ParseOutput> {
        self.lex()?;
        // Only a whole file and a statement list have a place for comments
        // that come before the first token.
        if !matches!(rule, StartRule::Dot | StartRule::ClusterStatements) {
            self.drop_comments(rule);
        }
        let node = match rule {
            StartRule::Dot => ast::AstNode::Dot(self.parse_dot()?),
            StartRule::Graph => ast::AstNode::Graph(self.parse_graph()?),
            StartRule::Subgraph => {
                ast::AstNode::Subgraph(self.parse_subgraph()?)
            }
            StartRule::Node => {
                let start = self.start;
                let node_ref = self.parse_node_ref()?;
                let node = self.parse_node_rest(node_ref, start)?;
                self.skip_semicolon()?;
                ast::AstNode::Node(node)
            }
            StartRule::Edge => {
                let start = self.start;
                let first = self.parse_edge_target()?;
                let edge = self.parse_edge_rhs(first, start)?;
                self.skip_semicolon()?;
                ast::AstNode::Edge(edge)
            }
            StartRule::AttributeList => {
                let list = self.parse_attr_stmt()?;
                self.skip_semicolon()?;
                ast::AstNode::AttributeList(list)
            }
            StartRule::Attribute => {
                let attr = self.parse_attribute()?;
                self.skip_semicolon()?;
                ast::AstNode::Attribute(attr)
            }
            StartRule::ClusterStatements => {
                let list = self.parse_stmt_list()?;
                self.expect_end()?;
                log::debug!("parsed {} statements", list.len());
                return Result::Ok(ParseOutput::Statements(list));
            }
        };
        self.expect_end()?;
        self.drop_comments(rule);
        log::debug!(
            "parsed a {:?} with {} AST nodes",
            node.kind(),
            self.node_count()
        );
        Result::Ok(ParseOutput::Node(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ast::{AstNode, EdgeTarget, Statement};

    fn parse_stmts(input: &str) -> Vec<Statement> {
        let mut parser = DotParser::new(input);
        parser
            .process_rule(StartRule::ClusterStatements)
            .unwrap()
            .into_statements()
            .unwrap()
    }

    #[test]
    fn edge_chain_and_groups() {
        let stmts = parse_stmts("a -> {b c} -> d:p:n [color=red]");
        let Statement::Edge(edge) = &stmts[0] else {
            panic!("expected an edge, got {:?}", stmts[0]);
        };
        assert_eq!(edge.targets().len(), 3);
        let EdgeTarget::Group(group) = &edge.targets()[1] else {
            panic!("expected a group");
        };
        assert_eq!(group.children().len(), 2);
        let EdgeTarget::NodeRef(last) = &edge.targets()[2] else {
            panic!("expected a node ref");
        };
        assert_eq!(last.port().unwrap().value(), "p");
        assert_eq!(last.compass().unwrap().value(), "n");
        assert_eq!(edge.children().len(), 1);
    }

    #[test]
    fn compass_without_port() {
        let stmts = parse_stmts("a:sw -> b:\"sw\"");
        let Statement::Edge(edge) = &stmts[0] else {
            panic!();
        };
        let EdgeTarget::NodeRef(a) = &edge.targets()[0] else {
            panic!();
        };
        let EdgeTarget::NodeRef(b) = &edge.targets()[1] else {
            panic!();
        };
        assert!(a.port().is_none());
        assert_eq!(a.compass().unwrap().value(), "sw");
        assert_eq!(b.port().unwrap().value(), "sw");
        assert!(b.compass().is_none());
    }

    #[test]
    fn group_at_statement_start() {
        let stmts = parse_stmts("{a b} -> c; {x y}");
        assert!(matches!(stmts[0], Statement::Edge(_)));
        let Statement::Subgraph(sub) = &stmts[1] else {
            panic!("expected an anonymous subgraph");
        };
        assert!(sub.id().is_none());
        assert_eq!(sub.children().len(), 2);
    }

    #[test]
    fn comments_become_statements() {
        let stmts = parse_stmts("// first\na; /* second */ b [/* in */ x=1]");
        assert!(matches!(stmts[0], Statement::Comment(_)));
        assert!(matches!(stmts[1], Statement::Node(_)));
        assert!(matches!(stmts[2], Statement::Comment(_)));
        let Statement::Node(b) = &stmts[3] else {
            panic!();
        };
        assert!(matches!(b.children()[0], AttributeItem::Comment(_)));
        assert!(matches!(b.children()[1], AttributeItem::Attribute(_)));
    }

    #[test]
    fn string_concatenation() {
        let mut parser = DotParser::new("label = \"a\" + \"b\"");
        let attr = parser.process_rule(StartRule::Attribute).unwrap();
        let Option::Some(AstNode::Attribute(attr)) = attr.into_node() else {
            panic!();
        };
        assert_eq!(attr.value().value(), "ab");
        assert_eq!(attr.value().quoted(), Quoting::Quoted);
    }

    #[test]
    fn wrong_edge_operator() {
        let mut parser = DotParser::new("graph { a -> b }");
        let Result::Err(Error::Syntax(err)) = parser.process() else {
            panic!("expected a syntax error");
        };
        assert_eq!(err.expected, vec![Expectation::literal("--")]);
        assert_eq!(err.found.as_deref(), Option::Some("->"));
        assert_eq!(err.location.start.column, 11);
    }

    #[test]
    fn error_at_end_of_input() {
        let mut parser = DotParser::new("digraph { a -> ");
        let Result::Err(Error::Syntax(err)) = parser.process() else {
            panic!("expected a syntax error");
        };
        assert_eq!(err.found, Option::None);
    }

    #[test]
    fn node_limit_applies_to_parsing() {
        let options = ParseOptions {
            max_ast_nodes: 3,
            ..ParseOptions::default()
        };
        let mut parser = DotParser::with_options("digraph { a -> b }", &options);
        assert!(matches!(
            parser.process(),
            Result::Err(Error::NodeCountExceeded { limit: 3 })
        ));
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let nested = |d: usize| {
            format!("digraph {{ {} a {} }}", "{".repeat(d), "}".repeat(d))
        };
        assert!(DotParser::new(&nested(MAX_NESTING_DEPTH)).process().is_ok());
        for d in [MAX_NESTING_DEPTH + 1, 200, 8000] {
            let Result::Err(Error::Syntax(err)) =
                DotParser::new(&nested(d)).process()
            else {
                panic!("expected a syntax error at depth {}", d);
            };
            assert_eq!(err.found.as_deref(), Option::Some("{"));
            assert!(err.message.contains("nested"));
        }
        let deep = "subgraph { ".repeat(100) + &"}".repeat(100);
        let mut parser = DotParser::new(&deep);
        assert!(matches!(
            parser.process_rule(StartRule::Subgraph),
            Result::Err(Error::Syntax(_))
        ));
    }

    #[test]
    fn comments_around_fragments_are_dropped() {
        let mut parser = DotParser::new("// lead\na [x=1] // tail");
        let node = parser.process_rule(StartRule::Node).unwrap();
        let Option::Some(AstNode::Node(node)) = node.into_node() else {
            panic!("expected a node");
        };
        assert_eq!(node.id().value(), "a");
        assert_eq!(node.children().len(), 1);
        assert!(matches!(node.children()[0], AttributeItem::Attribute(_)));

        let mut parser = DotParser::new("/* lead */ a -> b [w=2]; # tail");
        let edge = parser.process_rule(StartRule::Edge).unwrap();
        let Option::Some(AstNode::Edge(edge)) = edge.into_node() else {
            panic!("expected an edge");
        };
        assert_eq!(edge.children().len(), 1);
    }

    #[test]
    fn locations_are_recorded() {
        let mut parser = DotParser::new("digraph {\n  a;\n}");
        let dot = parser.process().unwrap();
        let graph = dot.graph().unwrap();
        let Statement::Node(a) = &graph.children()[0] else {
            panic!();
        };
        let loc = a.location().unwrap();
        assert_eq!(loc.start, Position::new(12, 2, 3));
        assert_eq!(loc.end, Position::new(13, 2, 4));
    }
}
