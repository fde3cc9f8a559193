//! A write-only library for populating a single-file relational database
//! of source-code symbols, references, and their locations, consumed by an
//! external source-code exploration tool.
//!
//! Five components compose bottom-up: kind codecs ([`kind`]), name
//! hierarchies ([`name`]), utility I/O ([`util`]), the storage engine
//! ([`storage`]), and the public writer façade ([`writer`]).

pub mod error;
pub mod kind;
pub mod name;
pub mod storage;
pub mod util;
pub mod writer;

pub use error::{IndexError, Result};
pub use kind::{
    DefinitionKind, EdgeKind, ElementComponentKind, LocationKind, NodeKind, ReferenceKind,
    SymbolKind,
};
pub use name::{NameElement, NameHierarchy};
pub use storage::SUPPORTED_DATABASE_VERSION;
pub use writer::{IndexWriter, SourceRange};
