use super::ExtractError;
use crate::models::{DefFilter, Definition, Token, Visibility};

/// The NAME token immediately following a definition's keyword.
///
/// Absent for syntactically broken input only; surfaced as a
/// `MalformedDefinition` rather than left to panic downstream.
pub fn signature_name(def: &Definition) -> Result<&Token, ExtractError> {
    def.name().ok_or_else(|| ExtractError::MalformedDefinition {
        keyword: def.keyword().text.clone(),
        line: def.keyword().start.line,
    })
}

/// Retain the definitions whose declared name matches the requested mode.
/// Lazy and order-preserving.
pub fn filter_definitions<I>(
    definitions: I,
    def_filter: DefFilter,
) -> impl Iterator<Item = Result<Definition, ExtractError>>
where
    I: Iterator<Item = Result<Definition, ExtractError>>,
{
    definitions.filter_map(move |item| {
        let def = match item {
            Ok(def) => def,
            Err(e) => return Some(Err(e)),
        };
        let visibility = match signature_name(&def) {
            Ok(name) => Visibility::of(&name.text),
            Err(e) => return Some(Err(e)),
        };
        def_filter.retains(visibility).then(|| Ok(def))
    })
}
