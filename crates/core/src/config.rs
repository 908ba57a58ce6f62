use crate::models::DefFilter;

/// Configuration for one extraction run
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Which definitions to retain
    pub def_filter: DefFilter,
    /// Capture a docstring attached to each definition header
    pub include_docstrings: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            def_filter: DefFilter::Public,
            include_docstrings: true,
        }
    }
}

impl ExtractConfig {
    pub fn new(def_filter: DefFilter) -> Self {
        Self {
            def_filter,
            ..Default::default()
        }
    }

    pub fn with_def_filter(mut self, def_filter: DefFilter) -> Self {
        self.def_filter = def_filter;
        self
    }

    pub fn with_docstrings(mut self, include: bool) -> Self {
        self.include_docstrings = include;
        self
    }
}
