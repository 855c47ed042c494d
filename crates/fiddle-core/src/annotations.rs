//! Dependency and name annotations embedded in fiddle source.
//!
//! A raw fiddle is plain source with directive comments on their own lines:
//!
//! ```text
//! val x = 1
//! // $FiddleDependency org.example:%%lib:1.0
//! // $FiddleName My Fiddle
//! ```
//!
//! Parsing partitions the lines into code and directives. Directive lines are
//! removed from the code; code lines keep their relative order. The exporter
//! re-appends directives after the code, so a parse/export cycle moves every
//! directive to the end of the file.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::catalog::LibraryCatalog;
use crate::library::Library;

/// Marker token of a dependency directive.
pub const DEPENDENCY_MARKER: &str = "$FiddleDependency";

/// Marker token of a name directive.
pub const NAME_MARKER: &str = "$FiddleName";

static DEPENDENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*// \$FiddleDependency (.+)$").expect("dependency pattern is valid")
});

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*// \$FiddleName (.+)$").expect("name pattern is valid"));

/// A directive recognised on a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `// $FiddleDependency <coordinate>`
    Dependency(&'a str),
    /// `// $FiddleName <name>`
    Name(&'a str),
}

impl<'a> Directive<'a> {
    /// Classify a line. The captured value is the verbatim rest of the line.
    pub fn classify(line: &'a str) -> Option<Self> {
        if let Some(caps) = DEPENDENCY_RE.captures(line) {
            return caps.get(1).map(|m| Self::Dependency(m.as_str()));
        }
        NAME_RE
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| Self::Name(m.as_str()))
    }
}

/// Format a dependency directive line.
pub fn dependency_line(coordinate: &str) -> String {
    format!("// {} {}", DEPENDENCY_MARKER, coordinate)
}

/// Format a name directive line.
pub fn name_line(name: &str) -> String {
    format!("// {} {}", NAME_MARKER, name)
}

/// Source split into code and directive values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedSource {
    /// Code lines joined with `\n`, directives removed
    pub code: String,

    /// Dependency coordinates in source order, duplicates kept
    pub dependencies: Vec<String>,

    /// Value of the first name directive
    pub name: Option<String>,
}

impl AnnotatedSource {
    /// Split raw source into code and directives.
    ///
    /// Lines are split as by [`str::lines`], so a trailing line terminator
    /// does not produce an empty final code line.
    pub fn parse(source: &str) -> Self {
        let mut code_lines = Vec::new();
        let mut dependencies = Vec::new();
        let mut name = None;

        for line in source.lines() {
            match Directive::classify(line) {
                Some(Directive::Dependency(coordinate)) => {
                    dependencies.push(coordinate.to_string());
                }
                Some(Directive::Name(value)) => {
                    if name.is_none() {
                        name = Some(value.to_string());
                    }
                }
                None => code_lines.push(line),
            }
        }

        Self {
            code: code_lines.join("\n"),
            dependencies,
            name,
        }
    }

    /// Resolve the dependencies against a catalog, dropping unknown ones.
    pub fn resolve(&self, catalog: &LibraryCatalog) -> Vec<Library> {
        catalog.resolve_all(&self.dependencies)
    }
}

/// Parse raw source into code and the libraries it depends on.
pub fn parse(source: &str, catalog: &LibraryCatalog) -> (String, Vec<Library>) {
    let annotated = AnnotatedSource::parse(source);
    let libraries = annotated.resolve(catalog);
    (annotated.code, libraries)
}
