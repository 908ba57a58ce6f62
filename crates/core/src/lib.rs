//! Modapi Core Library
//!
//! Token-stream extraction of the API shape of Python modules: the headers
//! (and optionally docstrings) of function and class definitions, top-level
//! and nested, filtered by the leading-underscore visibility convention.
//!
//! The pipeline is a single forward pass per file: tokenize, scan the stream
//! for `def`/`class` keywords, delimit each signature across arbitrarily
//! nested parentheses, decide whether a trailing string literal is an
//! attached docstring, filter by visibility, and render the matched span
//! line-faithfully from the original source.
//!
//! # Example
//!
//! ```
//! use modapi_core::{module_api, ExtractConfig};
//!
//! let source = "def greet(name):\n    \"\"\"Say hi.\"\"\"\n    return name\n";
//! let api = module_api(source, &ExtractConfig::default()).unwrap();
//! assert_eq!(api, vec!["def greet(name):\n    \"\"\"Say hi.\"\"\"\n".to_string()]);
//! ```

pub mod config;
pub mod engine;
pub mod models;
pub mod output;
pub mod tokenizer;

// Re-exports for convenience
pub use config::ExtractConfig;
pub use engine::{
    extract_api, filter_definitions, module_api, render_definition, DefinitionScanner,
    ExtractError,
};
pub use models::*;
pub use output::{format_output, FormatError, OutputFormat};
pub use tokenizer::tokenize;
