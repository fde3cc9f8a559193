//! Plain data carried between the writer façade and the storage engine.
//!
//! These mirror the schema's tables one-for-one; none of them own a
//! connection or perform I/O themselves.

use crate::kind::{DefinitionKind, ElementComponentKind, LocationKind};

/// A row in `node`, keyed by its serialized name.
#[derive(Debug, Clone)]
pub struct StorageNodeData {
    pub serialized_name: String,
    pub kind: i32,
}

/// A row in `file`, one-to-one with an `element`/`node` pair.
#[derive(Debug, Clone)]
pub struct StorageFileData {
    pub name: String,
    pub serialized_name: String,
    pub file_path: String,
    pub language: String,
    pub modification_time: String,
    pub indexed: bool,
    pub complete: bool,
    pub line_count: i32,
}

/// A row in `edge`, keyed by `(source_id, target_id, kind)`.
#[derive(Debug, Clone)]
pub struct StorageEdgeData {
    pub kind: i32,
    pub source_id: i64,
    pub target_id: i64,
}

/// A row in `local_symbol`, keyed by `name`.
#[derive(Debug, Clone)]
pub struct StorageLocalSymbolData {
    pub name: String,
}

/// A row in `source_location`, keyed by its full six-tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageSourceLocationData {
    pub file_node_id: i64,
    pub start_line: i32,
    pub start_col: i32,
    pub end_line: i32,
    pub end_col: i32,
    pub kind: LocationKind,
}

/// A row in `occurrence`: the pairing of an element to a source location.
#[derive(Debug, Clone)]
pub struct StorageOccurrenceData {
    pub element_id: i64,
    pub source_location_id: i64,
}

/// A row in `element_component`.
#[derive(Debug, Clone)]
pub struct StorageElementComponentData {
    pub element_id: i64,
    pub kind: ElementComponentKind,
    pub data: String,
}

/// A row in `error`, keyed by `(message, fatal)`.
#[derive(Debug, Clone)]
pub struct StorageErrorData {
    pub message: String,
    pub fatal: bool,
    pub indexed: bool,
    pub translation_unit: String,
    pub file_node_id: i64,
    pub start_line: i32,
    pub start_col: i32,
    pub end_line: i32,
    pub end_col: i32,
}

/// The `definition_kind` column shared by `node` and `local_symbol`
/// definitions; kept here rather than on `StorageNodeData` because not
/// every node is a definition.
#[derive(Debug, Clone, Copy)]
pub struct StorageSymbolData {
    pub node_id: i64,
    pub definition_kind: DefinitionKind,
}
