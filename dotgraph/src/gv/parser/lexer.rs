//! The Lexer implementation for the GraphViz file format.

use super::ast::{CommentKind, Position};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    EOF,
    /// A bare identifier or a numeral.
    Identifier(String),
    /// The content of a "double-quoted" string, with `\"` unescaped.
    QuotedString(String),
    /// The content of an <html> string, without the outer brackets.
    HtmlString(String),
    GraphKW,
    NodeKW,
    EdgeKW,
    DigraphKW,
    StrictKW,
    SubgraphKW,
    Equal,
    Colon,
    Comma,
    Semicolon,
    Plus,
    ArrowRight,
    ArrowLine,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Comment(CommentKind, String),
    Error(String),
}

impl Token {
    /// \returns the text of the token as it would appear in a file, or None
    /// for the end of the input.
    pub fn text(&self) -> Option<String> {
        let s = match self {
            Token::EOF => return Option::None,
            Token::Identifier(s) => s.clone(),
            Token::QuotedString(s) => format!("\"{}\"", s),
            Token::HtmlString(s) => format!("<{}>", s),
            Token::GraphKW => "graph".to_string(),
            Token::NodeKW => "node".to_string(),
            Token::EdgeKW => "edge".to_string(),
            Token::DigraphKW => "digraph".to_string(),
            Token::StrictKW => "strict".to_string(),
            Token::SubgraphKW => "subgraph".to_string(),
            Token::Equal => "=".to_string(),
            Token::Colon => ":".to_string(),
            Token::Comma => ",".to_string(),
            Token::Semicolon => ";".to_string(),
            Token::Plus => "+".to_string(),
            Token::ArrowRight => "->".to_string(),
            Token::ArrowLine => "--".to_string(),
            Token::OpenBracket => "[".to_string(),
            Token::CloseBracket => "]".to_string(),
            Token::OpenBrace => "{".to_string(),
            Token::CloseBrace => "}".to_string(),
            Token::Comment(_, s) => s.clone(),
            Token::Error(s) => s.clone(),
        };
        Option::Some(s)
    }
}

#[derive(Debug, Clone)]
pub struct Lexer {
    input: Rc<[char]>,
    // Index of 'ch' in the input.
    pos: usize,
    ch: char,
    line: usize,
    column: usize,
    /// Where the last token that was returned starts.
    pub start: Position,
    /// Where the last token that was returned ends (exclusive).
    pub end: Position,
}

fn is_id_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || (!ch.is_ascii() && !ch.is_whitespace())
}

fn is_id_char(ch: char) -> bool {
    is_id_start(ch) || ch.is_ascii_digit()
}

// Removes the marker padding and trailing whitespace from one comment line.
fn clean_line(text: &str) -> String {
    let text = text.trim_end();
    text.strip_prefix(' ').unwrap_or(text).to_string()
}

// Removes the '*' decorations from the body of a block comment.
fn clean_block(body: &str) -> String {
    let body = body.strip_prefix('*').unwrap_or(body);
    let lines: Vec<&str> = body
        .lines()
        .map(|line| {
            let line = line.trim();
            match line.strip_prefix('*') {
                Option::Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                Option::None => line,
            }
        })
        .collect();
    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Option::Some(first), Option::Some(last)) => {
            lines[first..=last].join("\n")
        }
        _ => String::new(),
    }
}

impl Lexer {
    pub fn from_string(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        Lexer::new(chars)
    }

    pub fn new(input: Vec<char>) -> Self {
        let ch = input.first().copied().unwrap_or('\0');
        Self {
            input: input.into(),
            pos: 0,
            ch,
            line: 1,
            column: 1,
            start: Position::new(0, 1, 1),
            end: Position::new(0, 1, 1),
        }
    }

    /// \returns the position of the next unread character.
    pub fn position(&self) -> Position {
        Position::new(self.pos, self.line, self.column)
    }

    pub fn has_next(&self) -> bool {
        self.pos < self.input.len()
    }

    // Look \p n characters ahead of the current one.
    fn peek(&self, n: usize) -> char {
        self.input.get(self.pos + n).copied().unwrap_or('\0')
    }

    pub fn read_char(&mut self) {
        if !self.has_next() {
            return;
        }
        if self.ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.pos += 1;
        self.ch = self.input.get(self.pos).copied().unwrap_or('\0');
    }

    pub fn skip_whitespace(&mut self) -> bool {
        let mut changed = false;
        while self.has_next() && (self.ch.is_whitespace() || self.ch == '\u{feff}')
        {
            self.read_char();
            changed = true;
        }
        changed
    }

    pub fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while self.has_next() && is_id_char(self.ch) {
            result.push(self.ch);
            self.read_char();
        }
        result
    }

    // numeral : [-]?(.[0-9]+ | [0-9]+(.[0-9]*)? )
    pub fn read_number(&mut self) -> String {
        let mut result = String::new();
        if self.ch == '-' {
            result.push(self.ch);
            self.read_char();
        }
        let mut period = false;
        while self.ch.is_ascii_digit() || self.ch == '.' {
            // Only allow one period in each number.
            if self.ch == '.' {
                if !period {
                    period = true;
                } else {
                    break;
                }
            }
            result.push(self.ch);
            self.read_char();
        }
        result
    }

    pub fn read_string(&mut self) -> Token {
        let mut result = String::new();
        // Consume the opening quote.
        self.read_char();
        loop {
            if !self.has_next() {
                return Token::Error("unterminated string".to_string());
            }
            match self.ch {
                '"' => {
                    self.read_char();
                    return Token::QuotedString(result);
                }
                '\\' => match self.peek(1) {
                    '"' => {
                        result.push('"');
                        self.read_char();
                        self.read_char();
                    }
                    '\\' => {
                        result.push_str("\\\\");
                        self.read_char();
                        self.read_char();
                    }
                    // Line continuation.
                    '\n' => {
                        self.read_char();
                        self.read_char();
                    }
                    '\r' if self.peek(2) == '\n' => {
                        self.read_char();
                        self.read_char();
                        self.read_char();
                    }
                    _ => {
                        result.push('\\');
                        self.read_char();
                    }
                },
                ch => {
                    result.push(ch);
                    self.read_char();
                }
            }
        }
    }

    pub fn read_html(&mut self) -> Token {
        let mut result = String::new();
        let mut bracket_balance = 0;
        loop {
            if !self.has_next() {
                // Reached EOF without completing the string
                return Token::Error("unterminated HTML string".to_string());
            }
            match self.ch {
                '<' => {
                    bracket_balance += 1;
                    if bracket_balance > 1 {
                        result.push('<');
                    }
                }
                '>' => {
                    bracket_balance -= 1;
                    if bracket_balance == 0 {
                        self.read_char();
                        return Token::HtmlString(result);
                    }
                    result.push('>');
                }
                ch => result.push(ch),
            }
            self.read_char();
        }
    }

    // \returns True if the comment that ends at the current position is
    // continued by a comment of the same kind on the next line.
    fn comment_continues(&self, marker: &str) -> bool {
        let mut i = self.pos;
        if self.input.get(i) != Option::Some(&'\n') {
            return false;
        }
        i += 1;
        while let Option::Some(c) = self.input.get(i) {
            if *c == ' ' || *c == '\t' {
                i += 1;
            } else {
                break;
            }
        }
        marker
            .chars()
            .enumerate()
            .all(|(k, m)| self.input.get(i + k) == Option::Some(&m))
    }

    // Reads one or more line comments that are on consecutive lines. The
    // newline after the last line is not consumed.
    pub fn read_line_comment(&mut self, kind: CommentKind) -> Token {
        let marker = match kind {
            CommentKind::Macro => "#",
            _ => "//",
        };
        let mut lines = Vec::new();
        loop {
            for _ in 0..marker.len() {
                self.read_char();
            }
            let mut text = String::new();
            while self.has_next() && self.ch != '\n' {
                text.push(self.ch);
                self.read_char();
            }
            lines.push(clean_line(&text));

            if !self.comment_continues(marker) {
                break;
            }
            // Move to the start of the marker on the next line.
            self.read_char();
            while self.ch == ' ' || self.ch == '\t' {
                self.read_char();
            }
        }
        Token::Comment(kind, lines.join("\n"))
    }

    pub fn read_block_comment(&mut self) -> Token {
        // Consume the "/*".
        self.read_char();
        self.read_char();
        let mut body = String::new();
        loop {
            if !self.has_next() {
                return Token::Error("unterminated comment".to_string());
            }
            if self.ch == '*' && self.peek(1) == '/' {
                self.read_char();
                self.read_char();
                return Token::Comment(CommentKind::Block, clean_block(&body));
            }
            body.push(self.ch);
            self.read_char();
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.position();
        let tok = self.read_token();
        self.end = self.position();
        tok
    }

    fn read_token(&mut self) -> Token {
        if !self.has_next() {
            return Token::EOF;
        }
        let tok: Token;
        match self.ch {
            '=' => {
                tok = Token::Equal;
            }
            ';' => {
                tok = Token::Semicolon;
            }
            ':' => {
                tok = Token::Colon;
            }
            ',' => {
                tok = Token::Comma;
            }
            '+' => {
                tok = Token::Plus;
            }
            '[' => {
                tok = Token::OpenBracket;
            }
            ']' => {
                tok = Token::CloseBracket;
            }
            '{' => {
                tok = Token::OpenBrace;
            }
            '}' => {
                tok = Token::CloseBrace;
            }
            '"' => {
                return self.read_string();
            }
            '<' => {
                return self.read_html();
            }
            '#' => {
                return self.read_line_comment(CommentKind::Macro);
            }
            '/' => match self.peek(1) {
                '/' => {
                    return self.read_line_comment(CommentKind::Slash);
                }
                '*' => {
                    return self.read_block_comment();
                }
                _ => {
                    tok = Token::Error("unexpected character '/'".to_string());
                }
            },
            '-' => match self.peek(1) {
                '>' => {
                    self.read_char();
                    tok = Token::ArrowRight;
                }
                '-' => {
                    self.read_char();
                    tok = Token::ArrowLine;
                }
                c if c.is_ascii_digit() || c == '.' => {
                    return Token::Identifier(self.read_number());
                }
                _ => {
                    tok = Token::Error("unexpected character '-'".to_string());
                }
            },
            '.' if self.peek(1).is_ascii_digit() => {
                return Token::Identifier(self.read_number());
            }
            ch if ch.is_ascii_digit() => {
                return Token::Identifier(self.read_number());
            }
            ch if is_id_start(ch) => {
                let name = self.read_identifier();
                // Keywords are case-independent.
                return match name.to_ascii_lowercase().as_str() {
                    "graph" => Token::GraphKW,
                    "node" => Token::NodeKW,
                    "edge" => Token::EdgeKW,
                    "digraph" => Token::DigraphKW,
                    "strict" => Token::StrictKW,
                    "subgraph" => Token::SubgraphKW,
                    _ => Token::Identifier(name),
                };
            }
            ch => {
                tok = Token::Error(format!("unexpected character '{}'", ch));
            }
        }
        self.read_char();
        tok
    }
}
