use super::ExtractError;
use crate::models::{Definition, Token, TokenKind};

/// Single-pass scanner over one file's token stream, yielding a
/// [`Definition`] for every `def`/`class` keyword in source order — nested
/// ones included, since the walk continues token by token past each captured
/// span.
///
/// Keyword detection relies solely on the tokenizer's kind classification, so
/// identifiers, strings, or comments containing the same text never trigger
/// extraction.
pub struct DefinitionScanner<'a> {
    tokens: &'a [Token],
    pos: usize,
    include_docstrings: bool,
}

impl<'a> DefinitionScanner<'a> {
    pub fn new(tokens: &'a [Token], include_docstrings: bool) -> Self {
        Self {
            tokens,
            pos: 0,
            include_docstrings,
        }
    }

    /// Read one definition starting at the keyword under the cursor: the
    /// signature through its depth-zero colon, plus an attached docstring
    /// when enabled. Leaves the cursor on the first unconsumed token.
    fn read_signature(&mut self) -> Result<Definition, ExtractError> {
        let start_line = self
            .tokens
            .get(self.pos)
            .map(|t| t.start.line)
            .unwrap_or_default();

        let mut span: Vec<Token> = Vec::new();
        let mut depth = 0usize;
        loop {
            let Some(tok) = self.tokens.get(self.pos) else {
                return Err(ExtractError::StreamExhausted { line: start_line });
            };
            self.pos += 1;

            let terminates = depth == 0 && tok.kind == TokenKind::Op && tok.text == ":";
            if tok.kind == TokenKind::Op {
                // Only round parens are tracked; a depth-zero colon inside []
                // or {} (e.g. a slice in a return annotation) ends the header
                // early.
                match tok.text.as_str() {
                    "(" => depth += 1,
                    ")" => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }

            span.push(tok.clone());
            if terminates {
                break;
            }
        }

        if self.include_docstrings {
            self.read_docstring(&mut span);
        }

        Ok(Definition::new(span))
    }

    /// Look ahead over the newline/indent run following the colon; commit the
    /// cursor only when a string literal confirms an attached docstring,
    /// otherwise leave the run for the scan to re-visit.
    fn read_docstring(&mut self, span: &mut Vec<Token>) {
        let mut end = self.pos;
        let mut has_string = false;
        while let Some(tok) = self.tokens.get(end) {
            match tok.kind {
                TokenKind::Newline | TokenKind::Indent => {}
                TokenKind::String => has_string = true,
                _ => break,
            }
            end += 1;
        }

        if has_string {
            span.extend_from_slice(&self.tokens[self.pos..end]);
            self.pos = end;
        }
    }
}

impl Iterator for DefinitionScanner<'_> {
    type Item = Result<Definition, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(tok) = self.tokens.get(self.pos) {
            if tok.kind == TokenKind::Keyword && (tok.text == "def" || tok.text == "class") {
                return Some(self.read_signature());
            }
            self.pos += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DefKind;
    use crate::tokenizer::tokenize;

    fn scan(source: &str, docstrings: bool) -> Vec<Definition> {
        let tokens = tokenize(source);
        DefinitionScanner::new(&tokens, docstrings)
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_function_with_docstring() {
        let defs = scan("def foo(a, b=(1,2)):\n    \"\"\"doc\"\"\"\n    pass\n", true);
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].tokens()[0].text, "def");
        assert!(defs[0]
            .tokens()
            .iter()
            .any(|t| t.kind == TokenKind::String));
    }

    #[test]
    fn test_docstring_skipped_when_disabled() {
        let defs = scan("def foo():\n    \"\"\"doc\"\"\"\n    pass\n", false);
        assert!(defs[0]
            .tokens()
            .iter()
            .all(|t| t.kind != TokenKind::String));
    }

    #[test]
    fn test_plain_body_is_not_a_docstring() {
        let defs = scan("def g():\n    return 1\n", true);
        assert_eq!(defs.len(), 1);
        assert!(defs[0]
            .tokens()
            .iter()
            .all(|t| t.kind != TokenKind::String));
        assert_eq!(defs[0].end_line(), 1);
    }

    #[test]
    fn test_colon_inside_parens_does_not_terminate() {
        let defs = scan("def f(x: int = 1, y: str = \"a\"):\n    pass\n", true);
        assert_eq!(defs.len(), 1);
        let last = defs[0].tokens().last().unwrap();
        assert_eq!(last.text, ":");
        assert_eq!(last.end.line, 1);
    }

    #[test]
    fn test_multiline_signature() {
        let defs = scan("def f(\n    x,\n    y,\n):\n    pass\n", true);
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].start_line(), 1);
        assert_eq!(defs[0].end_line(), 4);
    }

    #[test]
    fn test_nested_definitions_are_separate() {
        let defs = scan("class Outer:\n    def inner(self):\n        pass\n", true);
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].kind(), DefKind::Class);
        assert_eq!(defs[1].kind(), DefKind::Function);
        assert_eq!(defs[1].name().unwrap().text, "inner");
    }

    #[test]
    fn test_keyword_text_in_string_is_not_scanned() {
        let defs = scan("x = \"def foo():\"\ny = 1\n", true);
        assert!(defs.is_empty());
    }

    #[test]
    fn test_count_matches_keyword_occurrences() {
        let source = "def a():\n    pass\n\nclass B:\n    def _c(self):\n        pass\n";
        let tokens = tokenize(source);
        let keywords = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Keyword && (t.text == "def" || t.text == "class"))
            .count();
        let defs = DefinitionScanner::new(&tokens, true)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(defs.len(), keywords);
        assert_eq!(defs.len(), 3);
    }

    #[test]
    fn test_stream_exhausted_on_truncated_signature() {
        let tokens = tokenize("def broken(a, b");
        let result: Result<Vec<_>, _> = DefinitionScanner::new(&tokens, true).collect();
        assert!(matches!(result, Err(ExtractError::StreamExhausted { .. })));
    }

    #[test]
    fn test_lambda_default_does_not_terminate_early() {
        let defs = scan("def f(k=lambda x: x):\n    pass\n", true);
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].end_line(), 1);
    }
}
