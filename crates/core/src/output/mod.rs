mod json;
mod yaml;

pub use json::to_json;
pub use yaml::to_yaml;

use crate::models::ApiMap;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
    Ansi,
}

/// Format an ApiMap according to the specified format
pub fn format_output(api_map: &ApiMap, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Text => Ok(format_text(api_map)),
        OutputFormat::Ansi => Ok(format_text_ansi(api_map)),
        OutputFormat::Json => to_json(api_map),
        OutputFormat::Yaml => to_yaml(api_map),
    }
}

/// Plain-text layout: a `# <path>` header per file, header and definitions
/// separated by blank lines, files likewise.
pub fn format_text(api_map: &ApiMap) -> String {
    let mut sections = Vec::new();

    for file in &api_map.files {
        let mut entries = vec![format!("# {}", file.path.display())];
        entries.extend(file.entries.iter().map(|e| e.text.clone()));
        sections.push(entries.join("\n\n"));
    }

    sections.join("\n\n")
}

/// The text layout with colored per-file headers
fn format_text_ansi(api_map: &ApiMap) -> String {
    let bold = "\x1b[1m";
    let cyan = "\x1b[36m";
    let reset = "\x1b[0m";

    let mut sections = Vec::new();

    for file in &api_map.files {
        let mut entries = vec![format!(
            "{}{}# {}{}",
            bold,
            cyan,
            file.path.display(),
            reset
        )];
        entries.extend(file.entries.iter().map(|e| e.text.clone()));
        sections.push(entries.join("\n\n"));
    }

    sections.join("\n\n")
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}
