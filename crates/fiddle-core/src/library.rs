//! Library descriptors and their coordinate strings.
//!
//! A coordinate names one artifact as `organization:<cross>artifact:version`,
//! where `<cross>` is empty for plain Java artifacts, `%%` for artifacts
//! published per Scala version and `%%%` for artifacts published per Scala
//! version and platform. For example `org.example:%%lib:1.0`.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How an artifact name is suffixed when it is published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossVersion {
    /// Plain artifact, no suffix.
    Java,
    /// Suffixed with the Scala binary version (`%%`).
    Scala,
    /// Suffixed with the Scala binary version and platform (`%%%`).
    #[default]
    Platform,
}

impl CrossVersion {
    /// Marker written in front of the artifact name.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Java => "",
            Self::Scala => "%%",
            Self::Platform => "%%%",
        }
    }
}

/// A library that fiddles can depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    /// Human readable name
    pub name: String,

    /// Publishing organization (e.g., "org.scala-js")
    pub organization: String,

    /// Artifact name without cross-version suffix
    pub artifact: String,

    /// Artifact version
    pub version: String,

    /// Cross-version publishing scheme
    #[serde(default)]
    pub cross: CrossVersion,

    /// Language-version tags this library is available for
    #[serde(default)]
    pub versions: BTreeSet<String>,

    /// Further coordinates pulled in whenever this library is used
    #[serde(default)]
    pub extra_deps: Vec<String>,

    /// Documentation URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// Only needed at compile time (macros, annotations)
    #[serde(default)]
    pub compile_time_only: bool,
}

impl Library {
    /// Create a library with no version tags or extra dependencies.
    pub fn new(
        name: impl Into<String>,
        organization: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            organization: organization.into(),
            artifact: artifact.into(),
            version: version.into(),
            cross: CrossVersion::default(),
            versions: BTreeSet::new(),
            extra_deps: Vec::new(),
            doc: None,
            compile_time_only: false,
        }
    }

    /// Set the cross-version scheme.
    pub fn with_cross(mut self, cross: CrossVersion) -> Self {
        self.cross = cross;
        self
    }

    /// Set the supported language-version tags.
    pub fn with_versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.versions = versions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the implied extra dependencies.
    pub fn with_extra_deps(mut self, extra_deps: Vec<String>) -> Self {
        self.extra_deps = extra_deps;
        self
    }

    /// The coordinate string of this library.
    ///
    /// This is the exact key [`LibraryCatalog::find_library`] accepts.
    ///
    /// [`LibraryCatalog::find_library`]: crate::LibraryCatalog::find_library
    pub fn stringify(&self) -> String {
        format!(
            "{}:{}{}:{}",
            self.organization,
            self.cross.marker(),
            self.artifact,
            self.version
        )
    }

    /// The library's own coordinate followed by its extra dependencies.
    pub fn coordinates(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.stringify()).chain(self.extra_deps.iter().cloned())
    }

    /// Whether the library is available for a language-version tag.
    pub fn supports(&self, version_tag: &str) -> bool {
        self.versions.contains(version_tag)
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stringify_cross_markers() {
        let lib = Library::new("Lib", "org.example", "lib", "1.0");
        assert_eq!(
            lib.clone().with_cross(CrossVersion::Scala).stringify(),
            "org.example:%%lib:1.0"
        );
        assert_eq!(
            lib.clone().with_cross(CrossVersion::Platform).stringify(),
            "org.example:%%%lib:1.0"
        );
        assert_eq!(
            lib.with_cross(CrossVersion::Java).stringify(),
            "org.example:lib:1.0"
        );
    }

    #[test]
    fn test_coordinates_keep_declared_order() {
        let lib = Library::new("Lib", "org.example", "lib", "1.0")
            .with_cross(CrossVersion::Scala)
            .with_extra_deps(vec!["b:b:2".to_string(), "a:a:1".to_string()]);

        let coords: Vec<String> = lib.coordinates().collect();
        assert_eq!(coords, vec!["org.example:%%lib:1.0", "b:b:2", "a:a:1"]);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let lib: Library = serde_json::from_str(
            r#"{"name":"DOM","organization":"org.scala-js","artifact":"scalajs-dom","version":"0.9.5"}"#,
        )
        .unwrap();

        assert_eq!(lib.cross, CrossVersion::Platform);
        assert!(lib.versions.is_empty());
        assert!(lib.extra_deps.is_empty());
        assert_eq!(lib.stringify(), "org.scala-js:%%%scalajs-dom:0.9.5");
    }

    #[test]
    fn test_supports() {
        let lib = Library::new("Lib", "o", "a", "1").with_versions(["2.11", "2.12"]);
        assert!(lib.supports("2.12"));
        assert!(!lib.supports("2.13"));
    }
}
