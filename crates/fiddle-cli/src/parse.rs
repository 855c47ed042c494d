//! Parse command implementation for the fiddle CLI.
//!
//! Splits an annotated source file and prints the result as JSON.

use std::path::Path;

use fiddle_core::{AnnotatedSource, LibraryCatalog};

use crate::DataArgs;

/// Print the code, name and libraries of an annotated source file.
pub fn execute(file: &Path, data: &DataArgs) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", file.display(), e))?;

    let catalog = match data.resolve().0 {
        Some(path) => LibraryCatalog::load(path)?,
        None => LibraryCatalog::default(),
    };

    let annotated = AnnotatedSource::parse(&source);
    let resolved: Vec<String> = annotated
        .resolve(&catalog)
        .iter()
        .map(|lib| lib.stringify())
        .collect();
    let unresolved: Vec<&String> = annotated
        .dependencies
        .iter()
        .filter(|coordinate| catalog.find_library(coordinate).is_none())
        .collect();

    let output = serde_json::json!({
        "code": annotated.code,
        "name": annotated.name,
        "libraries": resolved,
        "unresolved": unresolved,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
