//! Property-based tests for the codec and the annotation format.
//!
//! These properties must always hold:
//! - Any text survives an encode/decode cycle
//! - Decoding arbitrary input never panics
//! - Appending dependency directives never disturbs the code

use fiddle_core::annotations::{self, AnnotatedSource};
use fiddle_core::{CrossVersion, Library, LibraryCatalog, append_dependencies, codec};
use proptest::prelude::*;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

/// Code lines that are not directives and carry no line terminators.
fn code_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z0-9 (){}=.\"+*/-]{0,40}", 1..12)
        .prop_map(|lines| lines.join("\n"))
        .prop_filter("code must not end with a blank line", |code| {
            !code.ends_with('\n') && code.lines().count() == code.split('\n').count()
        })
}

fn cross_strategy() -> impl Strategy<Value = CrossVersion> {
    prop_oneof![
        Just(CrossVersion::Java),
        Just(CrossVersion::Scala),
        Just(CrossVersion::Platform),
    ]
}

fn library_strategy() -> impl Strategy<Value = Library> {
    (
        "[a-z]{1,8}(\\.[a-z]{1,8}){0,2}",
        "[a-z]{1,10}(-[a-z]{1,6})?",
        "[0-9]{1,2}\\.[0-9]{1,2}(\\.[0-9]{1,2})?",
        cross_strategy(),
    )
        .prop_map(|(org, artifact, version, cross)| {
            Library::new(artifact.clone(), org, artifact, version).with_cross(cross)
        })
}

// =============================================================================
// CODEC PROPERTIES
// =============================================================================

proptest! {
    /// Decoding an encoded text returns the text unchanged
    #[test]
    fn codec_roundtrip(text in any::<String>()) {
        prop_assert_eq!(codec::decode(&codec::encode(&text)), Some(text));
    }

    /// Arbitrary strings decode to something or nothing, never a panic
    #[test]
    fn codec_decode_never_panics(token in any::<String>()) {
        let _ = codec::decode(&token);
    }

    /// Tokens containing characters outside the URL-safe alphabet are rejected
    #[test]
    fn codec_rejects_foreign_alphabet(
        prefix in "[A-Za-z0-9_-]{0,20}",
        bad in "[+/!@#$%^&*(){}\\[\\]<>?,;:~`]",
        suffix in "[A-Za-z0-9_-]{0,20}",
    ) {
        let token = format!("{}{}{}", prefix, bad, suffix);
        prop_assert_eq!(codec::decode(&token), None);
    }
}

// =============================================================================
// ANNOTATION PROPERTIES
// =============================================================================

proptest! {
    /// Code is unchanged by appending directives and parsing them off again
    #[test]
    fn append_then_parse_preserves_code(
        code in code_strategy(),
        libraries in prop::collection::vec(library_strategy(), 0..6),
    ) {
        let catalog = LibraryCatalog::new(libraries.clone());
        let (parsed_code, _) = annotations::parse(&append_dependencies(&code, &libraries), &catalog);
        prop_assert_eq!(parsed_code, code);
    }

    /// The resolved set is exactly the catalog-resident subset, in order
    #[test]
    fn append_then_parse_resolves_resident_subset(
        code in code_strategy(),
        libraries in prop::collection::vec(library_strategy(), 0..6),
        resident in prop::collection::vec(any::<bool>(), 6),
    ) {
        let catalog = LibraryCatalog::new(
            libraries
                .iter()
                .zip(&resident)
                .filter(|(_, keep)| **keep)
                .map(|(lib, _)| lib.clone()),
        );
        let expected: Vec<Library> = libraries
            .iter()
            .filter_map(|lib| catalog.find_library(&lib.stringify()).cloned())
            .collect();

        let (_, resolved) = annotations::parse(&append_dependencies(&code, &libraries), &catalog);
        prop_assert_eq!(resolved, expected);
    }

    /// Every appended coordinate is recovered verbatim
    #[test]
    fn appended_coordinates_recovered(
        code in code_strategy(),
        libraries in prop::collection::vec(library_strategy(), 0..6),
    ) {
        let annotated = AnnotatedSource::parse(&append_dependencies(&code, &libraries));
        let expected: Vec<String> = libraries.iter().map(Library::stringify).collect();
        prop_assert_eq!(annotated.dependencies, expected);
    }
}
