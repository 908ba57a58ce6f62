//! Python source tokenizer.
//!
//! Hand-written character lexer producing the token stream the extraction
//! engine consumes: keywords classified apart from identifiers, Indent/Dedent
//! from an indent stack, implicit line joining inside brackets, and the raw
//! physical line(s) each token touches. Unknown characters are skipped; the
//! stream always ends with an `EndMarker`.

use crate::models::{Position, Token, TokenKind};

/// Reserved words; `def` and `class` are the ones that drive extraction.
const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break",
    "class", "continue", "def", "del", "elif", "else", "except", "finally",
    "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal",
    "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

const THREE_CHAR_OPS: &[&str] = &["**=", "//=", ">>=", "<<=", "..."];

const TWO_CHAR_OPS: &[&str] = &[
    "**", "//", ">>", "<<", "<=", ">=", "==", "!=", "->", ":=", "+=", "-=",
    "*=", "/=", "%=", "@=", "&=", "|=", "^=",
];

const SINGLE_CHAR_OPS: &str = "()[]{}:,;.+-*/%@&|^~<>=!";

pub struct Tokenizer {
    chars: Vec<char>,
    lines: Vec<String>,
    pos: usize,
    line: usize,
    col: usize,
    bracket_depth: usize,
    indent_stack: Vec<usize>,
}

/// Tokenize an entire source string.
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new(source).tokenize()
}

impl Tokenizer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            lines: split_physical_lines(source),
            pos: 0,
            line: 1,
            col: 0,
            bracket_depth: 0,
            indent_stack: vec![0],
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn peek2(&self) -> Option<char> {
        self.chars.get(self.pos + 2).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        ch
    }

    fn here(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// Raw text of physical lines `start..=end`, empty past end of input.
    fn raw_lines(&self, start: usize, end: usize) -> String {
        self.lines
            .get(start - 1..end.min(self.lines.len()))
            .map(|ls| ls.concat())
            .unwrap_or_default()
    }

    fn make(&self, kind: TokenKind, text: String, start: Position, end: Position) -> Token {
        let line = self.raw_lines(start.line, end.line);
        Token {
            kind,
            text,
            start,
            end,
            line,
        }
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut at_line_start = true;

        while !self.at_end() {
            if at_line_start && self.bracket_depth == 0 {
                if self.handle_line_start(&mut tokens) {
                    continue;
                }
                at_line_start = false;
            }

            self.skip_inline_whitespace();
            let Some(ch) = self.current() else { break };

            match ch {
                '\n' => {
                    let kind = if self.bracket_depth > 0 {
                        TokenKind::Nl
                    } else {
                        TokenKind::Newline
                    };
                    tokens.push(self.newline_token(kind));
                    if self.bracket_depth == 0 {
                        at_line_start = true;
                    }
                }
                '\r' => {
                    self.advance();
                }
                '\\' if self.peek() == Some('\n') => {
                    self.advance();
                    self.advance();
                }
                '#' => tokens.push(self.read_comment()),
                '"' | '\'' => {
                    let start = self.here();
                    tokens.push(self.read_string(String::new(), start));
                }
                '0'..='9' => tokens.push(self.read_number()),
                '.' if matches!(self.peek(), Some(c) if c.is_ascii_digit()) => {
                    tokens.push(self.read_number())
                }
                c if c.is_alphabetic() || c == '_' => tokens.push(self.read_name()),
                _ => {
                    if let Some(tok) = self.read_operator() {
                        tokens.push(tok);
                    }
                }
            }
        }

        // a logical line left open at end of input is closed with an empty
        // Newline, then pending dedents, then the end marker
        if tokens
            .last()
            .map_or(false, |t| !matches!(t.kind, TokenKind::Newline | TokenKind::Nl))
        {
            let pos = self.here();
            let tok = self.make(TokenKind::Newline, String::new(), pos, pos);
            tokens.push(tok);
        }
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            let pos = self.here();
            tokens.push(self.make(TokenKind::Dedent, String::new(), pos, pos));
        }
        let pos = self.here();
        tokens.push(self.make(TokenKind::EndMarker, String::new(), pos, pos));

        tokens
    }

    /// Consume leading whitespace of a fresh logical line and balance the
    /// indent stack. Returns true when the line was blank or comment-only and
    /// has been fully consumed.
    fn handle_line_start(&mut self, tokens: &mut Vec<Token>) -> bool {
        let mut spaces = 0usize;
        let mut ws = String::new();
        while let Some(c) = self.current() {
            match c {
                ' ' => spaces += 1,
                '\t' => spaces = spaces / 8 * 8 + 8,
                _ => break,
            }
            ws.push(self.advance());
        }

        if self.current() == Some('\r') {
            self.advance();
        }
        let Some(ch) = self.current() else { return true };

        if ch == '\n' {
            tokens.push(self.newline_token(TokenKind::Nl));
            return true;
        }
        if ch == '#' {
            tokens.push(self.read_comment());
            if self.current() == Some('\n') {
                tokens.push(self.newline_token(TokenKind::Nl));
            }
            return true;
        }

        let current_indent = self.indent_stack.last().copied().unwrap_or(0);
        if spaces > current_indent {
            self.indent_stack.push(spaces);
            let start = Position::new(self.line, 0);
            let end = self.here();
            tokens.push(self.make(TokenKind::Indent, ws, start, end));
        } else {
            while spaces < self.indent_stack.last().copied().unwrap_or(0) {
                self.indent_stack.pop();
                let pos = self.here();
                tokens.push(self.make(TokenKind::Dedent, String::new(), pos, pos));
            }
        }

        false
    }

    fn skip_inline_whitespace(&mut self) {
        while matches!(self.current(), Some(' ') | Some('\t')) {
            self.advance();
        }
    }

    fn newline_token(&mut self, kind: TokenKind) -> Token {
        let start = self.here();
        self.advance();
        let end = Position::new(start.line, start.column + 1);
        self.make(kind, "\n".to_string(), start, end)
    }

    fn read_comment(&mut self) -> Token {
        let start = self.here();
        let mut text = String::new();
        while let Some(c) = self.current() {
            if c == '\n' {
                break;
            }
            text.push(self.advance());
        }
        let end = self.here();
        self.make(TokenKind::Comment, text, start, end)
    }

    fn read_name(&mut self) -> Token {
        let start = self.here();
        let mut name = String::new();
        while let Some(c) = self.current() {
            if c.is_alphanumeric() || c == '_' {
                name.push(self.advance());
            } else {
                break;
            }
        }

        // r"...", b'...', f"""...""" and friends: the word was a string prefix
        if matches!(self.current(), Some('"') | Some('\''))
            && name.len() <= 2
            && name
                .chars()
                .all(|c| matches!(c, 'r' | 'R' | 'b' | 'B' | 'u' | 'U' | 'f' | 'F'))
        {
            return self.read_string(name, start);
        }

        let kind = if KEYWORDS.contains(&name.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Name
        };
        let end = self.here();
        self.make(kind, name, start, end)
    }

    fn read_string(&mut self, prefix: String, start: Position) -> Token {
        let quote = self.chars[self.pos];
        let mut text = prefix;
        let triple = self.peek() == Some(quote) && self.peek2() == Some(quote);

        if triple {
            for _ in 0..3 {
                text.push(self.advance());
            }
            while !self.at_end() {
                if self.current() == Some(quote)
                    && self.peek() == Some(quote)
                    && self.peek2() == Some(quote)
                {
                    for _ in 0..3 {
                        text.push(self.advance());
                    }
                    break;
                }
                if self.current() == Some('\\') {
                    text.push(self.advance());
                    if !self.at_end() {
                        text.push(self.advance());
                    }
                } else {
                    text.push(self.advance());
                }
            }
        } else {
            text.push(self.advance());
            while let Some(c) = self.current() {
                if c == quote || c == '\n' {
                    break;
                }
                if c == '\\' {
                    text.push(self.advance());
                    if !self.at_end() {
                        text.push(self.advance());
                    }
                } else {
                    text.push(self.advance());
                }
            }
            if self.current() == Some(quote) {
                text.push(self.advance());
            }
        }

        let end = self.here();
        self.make(TokenKind::String, text, start, end)
    }

    fn read_number(&mut self) -> Token {
        let start = self.here();
        let mut text = String::new();
        while let Some(c) = self.current() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                text.push(self.advance());
                let lower = text.to_ascii_lowercase();
                let radix = lower.starts_with("0x")
                    || lower.starts_with("0b")
                    || lower.starts_with("0o");
                if !radix
                    && matches!(c, 'e' | 'E')
                    && matches!(self.current(), Some('+') | Some('-'))
                {
                    text.push(self.advance());
                }
            } else {
                break;
            }
        }
        let end = self.here();
        self.make(TokenKind::Number, text, start, end)
    }

    fn read_operator(&mut self) -> Option<Token> {
        let start = self.here();
        let rest: String = self.chars[self.pos..].iter().take(3).collect();

        for op in THREE_CHAR_OPS {
            if rest.starts_with(op) {
                return Some(self.consume_op(3, start));
            }
        }
        for op in TWO_CHAR_OPS {
            if rest.starts_with(op) {
                return Some(self.consume_op(2, start));
            }
        }

        let ch = self.chars[self.pos];
        if !SINGLE_CHAR_OPS.contains(ch) {
            self.advance();
            return None;
        }
        match ch {
            '(' | '[' | '{' => self.bracket_depth += 1,
            ')' | ']' | '}' => self.bracket_depth = self.bracket_depth.saturating_sub(1),
            _ => {}
        }
        Some(self.consume_op(1, start))
    }

    fn consume_op(&mut self, len: usize, start: Position) -> Token {
        let mut text = String::new();
        for _ in 0..len {
            text.push(self.advance());
        }
        let end = self.here();
        self.make(TokenKind::Op, text, start, end)
    }
}

fn split_physical_lines(source: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for ch in source.chars() {
        current.push(ch);
        if ch == '\n' {
            lines.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_classification() {
        let tokens = tokenize("def foo():\n    pass\n");
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].text, "def");
        assert_eq!(tokens[1].kind, TokenKind::Name);
        assert_eq!(tokens[1].text, "foo");
    }

    #[test]
    fn test_keyword_text_inside_string_is_a_string_token() {
        let tokens = tokenize("x = \"def foo():\"\n");
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Keyword));
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::String && t.text.contains("def")));
    }

    #[test]
    fn test_comment_is_not_a_keyword() {
        let tokens = tokenize("# def foo():\nx = 1\n");
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Keyword));
        assert_eq!(
            tokens.iter().filter(|t| t.kind == TokenKind::Comment).count(),
            1
        );
    }

    #[test]
    fn test_indent_dedent_balance() {
        let tokens = tokenize("if x:\n    y = 1\nz = 2\n");
        let indents = tokens.iter().filter(|t| t.kind == TokenKind::Indent).count();
        let dedents = tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count();
        assert_eq!(indents, 1);
        assert_eq!(dedents, 1);
    }

    #[test]
    fn test_newline_inside_brackets_is_structural() {
        let tokens = tokenize("f(\n    1,\n)\n");
        assert_eq!(
            tokens.iter().filter(|t| t.kind == TokenKind::Newline).count(),
            1
        );
        assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Nl).count(), 2);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Indent));
    }

    #[test]
    fn test_blank_line_is_structural() {
        let tokens = tokenize("x = 1\n\ny = 2\n");
        assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Nl).count(), 1);
        assert_eq!(
            tokens.iter().filter(|t| t.kind == TokenKind::Newline).count(),
            2
        );
    }

    #[test]
    fn test_triple_quoted_string_spans_lines() {
        let tokens = tokenize("s = \"\"\"a\nb\"\"\"\n");
        let string = tokens
            .iter()
            .find(|t| t.kind == TokenKind::String)
            .unwrap();
        assert_eq!(string.text, "\"\"\"a\nb\"\"\"");
        assert_eq!(string.start.line, 1);
        assert_eq!(string.end.line, 2);
        assert_eq!(string.line, "s = \"\"\"a\nb\"\"\"\n");
    }

    #[test]
    fn test_prefixed_string() {
        let tokens = tokenize("x = f\"hi {name}\"\n");
        let string = tokens
            .iter()
            .find(|t| t.kind == TokenKind::String)
            .unwrap();
        assert_eq!(string.text, "f\"hi {name}\"");
    }

    #[test]
    fn test_multi_char_operator() {
        let tokens = tokenize("def f() -> int:\n    pass\n");
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::Op && t.text == "->"));
    }

    #[test]
    fn test_walrus_is_one_token() {
        let tokens = tokenize("if (n := 10):\n    pass\n");
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::Op && t.text == ":="));
    }

    #[test]
    fn test_line_continuation_joins_logical_line() {
        let tokens = tokenize("x = 1 + \\\n    2\n");
        assert_eq!(
            tokens.iter().filter(|t| t.kind == TokenKind::Newline).count(),
            1
        );
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Indent));
    }

    #[test]
    fn test_endmarker_is_last() {
        let tokens = tokenize("x = 1\n");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::EndMarker);
    }

    #[test]
    fn test_missing_trailing_newline_is_closed() {
        let tokens = tokenize("x = 1");
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::Newline && t.text.is_empty()));
        assert_eq!(tokens.last().unwrap().kind, TokenKind::EndMarker);
    }

    #[test]
    fn test_token_carries_raw_line() {
        let tokens = tokenize("def foo(a):  # header\n    pass\n");
        assert_eq!(tokens[0].line, "def foo(a):  # header\n");
    }
}
