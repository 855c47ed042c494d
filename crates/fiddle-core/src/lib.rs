//! Core engine for shareable fiddles.
//!
//! This crate provides:
//! - Source codec for compressed inline-source URL tokens
//! - Dependency annotation parsing (`// $FiddleDependency ...`)
//! - Library catalog snapshots
//! - Fiddle resolution against a store, with partial-failure recovery
//! - Export of resolved fiddles back to annotated raw source
//!
//! # Architecture
//!
//! ```text
//! ?zrc=token ──► codec::decode ──┐
//! default template ──────────────┴──► annotations::parse ──┐
//! id + version ──► FiddleStore (fiddle, then user) ────────┼──► ResolvedFiddleData ──► export::serialize
//! LibraryCatalog::find_library ────────────────────────────┘
//! ```

pub mod annotations;
pub mod catalog;
pub mod codec;
pub mod error;
pub mod export;
pub mod library;
pub mod resolver;
pub mod store;

pub use annotations::{AnnotatedSource, Directive};
pub use catalog::{CatalogHandle, LibraryCatalog};
pub use error::{Error, LookupError, Result};
pub use export::{append_dependencies, serialize};
pub use library::{CrossVersion, Library};
pub use resolver::{AuthorInfo, DEFAULT_TEMPLATE, FiddleResolver, ResolvedFiddleData, ResolverConfig};
pub use store::{ANONYMOUS_USER, FiddleRecord, FiddleStore, MemoryStore, StoreContents, UserIdentity};
