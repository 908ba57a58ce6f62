mod filter;
mod renderer;
mod scanner;

pub use filter::{filter_definitions, signature_name};
pub use renderer::render_definition;
pub use scanner::DefinitionScanner;

use crate::config::ExtractConfig;
use crate::models::{ApiEntry, Visibility};
use crate::tokenizer;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("token stream ended before the signature starting at line {line} reached its terminating colon")]
    StreamExhausted { line: usize },
    #[error("no name follows the `{keyword}` keyword at line {line}")]
    MalformedDefinition { keyword: String, line: usize },
}

/// Extract the API entries of one module's source text.
///
/// Runs the full per-file pipeline: tokenize, scan for definitions, filter by
/// visibility, render each retained span. Fails fast; no partial results are
/// returned for a file whose stream is malformed.
pub fn extract_api(source: &str, config: &ExtractConfig) -> Result<Vec<ApiEntry>, ExtractError> {
    let tokens = tokenizer::tokenize(source);
    let scanner = DefinitionScanner::new(&tokens, config.include_docstrings);

    filter_definitions(scanner, config.def_filter)
        .map(|item| {
            let def = item?;
            let name = signature_name(&def)?;
            Ok(ApiEntry {
                name: name.text.clone(),
                kind: def.kind(),
                visibility: Visibility::of(&name.text),
                start_line: def.start_line(),
                end_line: def.end_line(),
                text: render_definition(&def),
            })
        })
        .collect()
}

/// Extract rendered definition strings, the plain-text API of one module.
pub fn module_api(source: &str, config: &ExtractConfig) -> Result<Vec<String>, ExtractError> {
    Ok(extract_api(source, config)?
        .into_iter()
        .map(|entry| entry.text)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DefFilter, DefKind};

    #[test]
    fn test_extract_api_entry_fields() {
        let source = "def greet(name):\n    \"\"\"Say hi.\"\"\"\n    return name\n";
        let entries = extract_api(source, &ExtractConfig::default()).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "greet");
        assert_eq!(entries[0].kind, DefKind::Function);
        assert_eq!(entries[0].visibility, Visibility::Public);
        assert_eq!(entries[0].start_line, 1);
        assert_eq!(entries[0].end_line, 2);
        assert_eq!(entries[0].text, "def greet(name):\n    \"\"\"Say hi.\"\"\"\n");
    }

    #[test]
    fn test_module_api_matches_entry_text() {
        let source = "class Runner:\n    pass\n";
        let config = ExtractConfig::new(DefFilter::All);

        let entries = extract_api(source, &config).unwrap();
        let api = module_api(source, &config).unwrap();
        assert_eq!(api, vec![entries[0].text.clone()]);
    }

    #[test]
    fn test_malformed_definition_without_name() {
        let result = extract_api("def (x):\n    pass\n", &ExtractConfig::default());
        assert!(matches!(
            result,
            Err(ExtractError::MalformedDefinition { .. })
        ));
    }

    #[test]
    fn test_truncated_signature_fails() {
        let result = extract_api("def broken(a, b", &ExtractConfig::default());
        assert!(matches!(result, Err(ExtractError::StreamExhausted { .. })));
    }
}
