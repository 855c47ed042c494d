//! Standalone source export of resolved fiddles.
//!
//! The inverse of [`crate::annotations::parse`]: the code comes first, then every
//! library coordinate as a dependency directive, then the name directive.

use crate::annotations::{dependency_line, name_line};
use crate::library::Library;
use crate::resolver::ResolvedFiddleData;

/// Reassemble a fiddle into annotated raw source.
///
/// Directives follow the code after one blank line. Each library contributes
/// its own coordinate and then its extra dependencies. A name that is not
/// blank is appended last with whitespace runs collapsed to single spaces.
pub fn serialize(fiddle: &ResolvedFiddleData) -> String {
    let mut directives = dependency_lines(&fiddle.libraries);
    if let Some(name) = display_name(&fiddle.name) {
        directives.push(name_line(&name));
    }

    if directives.is_empty() {
        return fiddle.source_code.clone();
    }
    format!("{}\n\n{}", fiddle.source_code, directives.join("\n"))
}

/// Append dependency directives directly after the code.
///
/// `annotations::parse(&append_dependencies(code, libs), catalog).0 == code`
/// for code without a trailing line terminator.
pub fn append_dependencies(code: &str, libraries: &[Library]) -> String {
    let lines = dependency_lines(libraries);
    if lines.is_empty() {
        return code.to_string();
    }
    format!("{}\n{}", code, lines.join("\n"))
}

fn dependency_lines(libraries: &[Library]) -> Vec<String> {
    libraries
        .iter()
        .flat_map(Library::coordinates)
        .map(|coordinate| dependency_line(&coordinate))
        .collect()
}

/// Collapse whitespace in a fiddle name; `None` when nothing is left.
fn display_name(name: &str) -> Option<String> {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}
