use crate::models::Definition;

/// Render a definition's span from its original source lines.
///
/// Tracks the last physical line already emitted; each token contributes the
/// raw line(s) it touches that have not been emitted yet, so spacing and
/// comments on touched lines survive verbatim. A leading line-continuation
/// artifact is stripped from the result.
pub fn render_definition(def: &Definition) -> String {
    let mut out = String::new();
    let mut last_line = 0usize;

    for tok in def.tokens() {
        if tok.end.line <= last_line {
            continue;
        }
        let already_emitted = if tok.start.line <= last_line {
            last_line - tok.start.line + 1
        } else {
            0
        };
        out.push_str(skip_physical_lines(&tok.line, already_emitted));
        last_line = tok.end.line;
    }

    out.trim_start_matches(|c| c == '\\' || c == '\n').to_string()
}

// Drop the first `count` physical lines of a token's raw text.
fn skip_physical_lines(raw: &str, count: usize) -> &str {
    let mut rest = raw;
    for _ in 0..count {
        match rest.find('\n') {
            Some(idx) => rest = &rest[idx + 1..],
            None => return "",
        }
    }
    rest
}
