use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A line/column location in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column (0-indexed)
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Lexical classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Reserved word (`def`, `class`, `return`, ...)
    Keyword,
    /// Identifier
    Name,
    /// Numeric literal
    Number,
    /// String literal, including quotes and any prefix
    String,
    /// Operator or delimiter
    Op,
    /// `#` comment, excluding the line terminator
    Comment,
    /// End of a logical line that carried code
    Newline,
    /// Structural newline: blank line, comment-only line, or a newline
    /// inside open brackets
    Nl,
    /// Increase of indentation level
    Indent,
    /// Decrease of indentation level
    Dedent,
    /// End of the token stream
    EndMarker,
}

/// One lexical unit with its source span and the raw line(s) it appears on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text of the token
    pub text: String,
    pub start: Position,
    pub end: Position,
    /// Full raw text of every physical line the token touches
    pub line: String,
}

/// Kind of an extracted definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefKind {
    Function,
    Class,
}

impl DefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefKind::Function => "function",
            DefKind::Class => "class",
        }
    }
}

/// Visibility of a declared name, by the leading-underscore convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    /// Classify a declared name: a leading underscore marks it private.
    pub fn of(name: &str) -> Self {
        if name.starts_with('_') {
            Visibility::Private
        } else {
            Visibility::Public
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// Which definitions an extraction run retains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefFilter {
    #[default]
    Public,
    Private,
    All,
}

impl DefFilter {
    pub fn retains(&self, visibility: Visibility) -> bool {
        match self {
            DefFilter::All => true,
            DefFilter::Public => visibility == Visibility::Public,
            DefFilter::Private => visibility == Visibility::Private,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DefFilter::Public => "public",
            DefFilter::Private => "private",
            DefFilter::All => "all",
        }
    }
}

/// The captured header (and optional docstring) of one function or class
/// declaration.
///
/// Holds the contiguous token span from the `def`/`class` keyword through the
/// depth-zero colon, extended with the docstring run when one was attached.
#[derive(Debug, Clone)]
pub struct Definition {
    tokens: Vec<Token>,
}

impl Definition {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(!tokens.is_empty());
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The originating keyword token
    pub fn keyword(&self) -> &Token {
        &self.tokens[0]
    }

    pub fn kind(&self) -> DefKind {
        if self.keyword().text == "class" {
            DefKind::Class
        } else {
            DefKind::Function
        }
    }

    /// The NAME token immediately following the keyword, if one is present
    pub fn name(&self) -> Option<&Token> {
        self.tokens.get(1).filter(|t| t.kind == TokenKind::Name)
    }

    pub fn start_line(&self) -> usize {
        self.keyword().start.line
    }

    pub fn end_line(&self) -> usize {
        self.tokens
            .last()
            .map(|t| t.end.line)
            .unwrap_or_else(|| self.start_line())
    }
}

/// Serialized record of one extracted definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEntry {
    /// Declared name
    pub name: String,
    /// function or class
    pub kind: DefKind,
    /// Computed from the name, not stored on the definition
    pub visibility: Visibility,
    /// First line of the span (1-indexed)
    pub start_line: usize,
    /// Last line of the span (1-indexed)
    pub end_line: usize,
    /// Rendered source text of the span
    pub text: String,
}

/// Extracted API of a single input file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileApi {
    pub path: PathBuf,
    /// Entries in source order
    pub entries: Vec<ApiEntry>,
}

/// Totals across an extraction run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiStats {
    pub total_files: usize,
    pub total_definitions: usize,
    pub functions: usize,
    pub classes: usize,
    pub public: usize,
    pub private: usize,
}

impl ApiStats {
    pub fn add_entry(&mut self, entry: &ApiEntry) {
        self.total_definitions += 1;
        match entry.kind {
            DefKind::Function => self.functions += 1,
            DefKind::Class => self.classes += 1,
        }
        match entry.visibility {
            Visibility::Public => self.public += 1,
            Visibility::Private => self.private += 1,
        }
    }
}

/// Extraction run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractMetadata {
    pub duration_ms: u64,
    pub timestamp: String,
    pub tool_version: String,
}

impl Default for ExtractMetadata {
    fn default() -> Self {
        Self {
            duration_ms: 0,
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Aggregated extraction results for a set of files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMap {
    /// Per-file results in input order
    pub files: Vec<FileApi>,
    pub stats: ApiStats,
    pub metadata: ExtractMetadata,
}

impl ApiMap {
    pub fn new(files: Vec<FileApi>, metadata: ExtractMetadata) -> Self {
        let stats = Self::calculate_stats(&files);
        Self {
            files,
            stats,
            metadata,
        }
    }

    fn calculate_stats(files: &[FileApi]) -> ApiStats {
        let mut stats = ApiStats::default();
        stats.total_files = files.len();

        for file in files {
            for entry in &file.entries {
                stats.add_entry(entry);
            }
        }

        stats
    }
}
