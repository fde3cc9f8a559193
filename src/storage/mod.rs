//! The relational storage engine: a thin, synchronous wrapper around a
//! single `rusqlite::Connection` that knows the schema and exposes
//! find-or-insert primitives keyed on each table's natural uniqueness
//! tuple. Nothing above this layer ever writes SQL.
//!
//! Unlike a connection pool shared across worker threads, this engine's
//! contract is single-threaded and synchronous end to end, so the
//! connection is held bare rather than behind a `Mutex`.

mod records;
mod schema;

pub use records::{
    StorageEdgeData, StorageElementComponentData, StorageErrorData, StorageFileData,
    StorageLocalSymbolData, StorageOccurrenceData, StorageSourceLocationData, StorageSymbolData,
};
pub use schema::SUPPORTED_DATABASE_VERSION;

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, instrument};

use crate::error::{IndexError, Result};
use crate::kind::{DefinitionKind, ElementComponentKind, LocationKind, NodeKind};

const DATABASE_VERSION_KEY: &str = "storage_version";
const PROJECT_SETTINGS_KEY: &str = "project_settings";

pub struct Storage {
    connection: Connection,
}

impl Storage {
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let connection = Connection::open(path)?;
        let storage = Storage { connection };
        storage.configure_pragmas()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory()?;
        let storage = Storage { connection };
        storage.configure_pragmas()?;
        Ok(storage)
    }

    fn configure_pragmas(&self) -> Result<()> {
        self.connection.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(())
    }

    /// Creates every table and index that doesn't already exist, and
    /// stamps `meta.storage_version` if this is a fresh database.
    #[instrument(skip(self))]
    pub fn setup_database(&self) -> Result<()> {
        for statement in schema::CREATE_TABLE_STATEMENTS {
            self.connection.execute_batch(statement)?;
        }
        for statement in schema::CREATE_INDEX_STATEMENTS {
            self.connection.execute_batch(statement)?;
        }

        if self.loaded_version()?.is_none() {
            self.set_version(SUPPORTED_DATABASE_VERSION)?;
        }

        debug!("database schema ready");
        Ok(())
    }

    /// Drops every row from every table without dropping the schema itself.
    #[instrument(skip(self))]
    pub fn clear_database(&self) -> Result<()> {
        for table in [
            "error",
            "component_access",
            "occurrence",
            "source_location",
            "local_symbol",
            "filecontent",
            "file",
            "symbol",
            "edge",
            "node",
            "element_component",
            "element",
            "meta",
        ] {
            self.connection
                .execute(&format!("DELETE FROM {table};"), [])?;
        }
        info!("database cleared");
        Ok(())
    }

    pub fn is_empty(&self) -> Result<bool> {
        let count: i64 =
            self.connection
                .query_row("SELECT COUNT(*) FROM element;", [], |row| row.get(0))?;
        Ok(count == 0)
    }

    pub fn loaded_version(&self) -> Result<Option<i32>> {
        self.connection
            .query_row(
                "SELECT value FROM meta WHERE key = ?1;",
                params![DATABASE_VERSION_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .map(|value| {
                value
                    .parse::<i32>()
                    .map_err(|_| IndexError::BadInput(format!("non-numeric storage version {value:?}")))
            })
            .transpose()
    }

    fn set_version(&self, version: i32) -> Result<()> {
        self.upsert_meta(DATABASE_VERSION_KEY, &version.to_string())
    }

    /// `true` when the database has never been stamped (fresh) or already
    /// carries the version this crate writes.
    pub fn is_compatible(&self) -> Result<bool> {
        match self.loaded_version()? {
            None => Ok(true),
            Some(loaded) => Ok(loaded == SUPPORTED_DATABASE_VERSION),
        }
    }

    pub fn set_project_settings_text(&self, text: &str) -> Result<()> {
        self.upsert_meta(PROJECT_SETTINGS_KEY, text)
    }

    pub fn project_settings_text(&self) -> Result<Option<String>> {
        self.connection
            .query_row(
                "SELECT value FROM meta WHERE key = ?1;",
                params![PROJECT_SETTINGS_KEY],
                |row| row.get(0),
            )
            .optional()
            .map_err(IndexError::from)
    }

    fn upsert_meta(&self, key: &str, value: &str) -> Result<()> {
        self.connection.execute(
            "INSERT OR REPLACE INTO meta(id, key, value) VALUES((SELECT id FROM meta WHERE key = ?1), ?1, ?2);",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn begin_transaction(&self) -> Result<()> {
        self.connection.execute_batch("BEGIN;")?;
        Ok(())
    }

    pub fn commit_transaction(&self) -> Result<()> {
        self.connection.execute_batch("COMMIT;")?;
        Ok(())
    }

    pub fn rollback_transaction(&self) -> Result<()> {
        self.connection.execute_batch("ROLLBACK;")?;
        Ok(())
    }

    /// Runs `PRAGMA optimize` and `VACUUM`, returning the connection's
    /// working set to a minimum. Intended to be called right before close.
    pub fn optimize(&self) -> Result<()> {
        self.connection.execute_batch("PRAGMA optimize; VACUUM;")?;
        Ok(())
    }

    fn insert_element(&self) -> Result<i64> {
        self.connection
            .prepare_cached("INSERT INTO element DEFAULT VALUES;")?
            .execute([])?;
        Ok(self.connection.last_insert_rowid())
    }

    /// Finds a node by its serialized name, inserting one with `kind` if
    /// none exists. If a placeholder node (`NodeKind::Unknown`, created by
    /// ancestor prefix-walking) is later revisited with a concrete kind,
    /// the row is refined in place rather than duplicated.
    pub fn add_node(&self, serialized_name: &str, kind: NodeKind) -> Result<i64> {
        if let Some((id, existing_kind)) = self.find_node(serialized_name)? {
            if existing_kind == NodeKind::Unknown && kind != NodeKind::Unknown {
                self.connection.prepare_cached("UPDATE node SET type = ?1 WHERE id = ?2;")?
                    .execute(params![kind.to_i32(), id])?;
            }
            return Ok(id);
        }

        let id = self.insert_element()?;
        self.connection
            .prepare_cached("INSERT INTO node(id, type, serialized_name) VALUES(?1, ?2, ?3);")?
            .execute(params![id, kind.to_i32(), serialized_name])?;
        Ok(id)
    }

    /// Unconditionally sets `node.type` for an existing row, used when a
    /// caller already holds the node's id and asserts its concrete kind.
    pub fn set_node_kind(&self, node_id: i64, kind: NodeKind) -> Result<()> {
        self.connection
            .prepare_cached("UPDATE node SET type = ?1 WHERE id = ?2;")?
            .execute(params![kind.to_i32(), node_id])?;
        Ok(())
    }

    fn find_node(&self, serialized_name: &str) -> Result<Option<(i64, NodeKind)>> {
        self.connection
            .prepare_cached("SELECT id, type FROM node WHERE serialized_name = ?1 LIMIT 1;")?
            .query_row(params![serialized_name], |row| {
                let id: i64 = row.get(0)?;
                let kind: i32 = row.get(1)?;
                Ok((id, kind))
            })
            .optional()?
            .map(|(id, kind)| Ok((id, NodeKind::from_i32(kind))))
            .transpose()
    }

    /// Marks `node_id` as a symbol definition. A later call with a more
    /// specific `definition_kind` (`Explicit` over `Implicit`) promotes the
    /// existing row rather than overwriting a stronger definition.
    pub fn add_symbol(&self, node_id: i64, definition_kind: DefinitionKind) -> Result<()> {
        self.connection
            .prepare_cached(
                "INSERT INTO symbol(id, definition_kind) VALUES(?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET definition_kind = excluded.definition_kind
                 WHERE excluded.definition_kind > symbol.definition_kind;",
            )?
            .execute(params![node_id, definition_kind.to_i32()])?;
        Ok(())
    }

    pub fn add_file(&self, data: &StorageFileData) -> Result<i64> {
        let node_id = self.add_node(&data.serialized_name, NodeKind::File)?;
        self.connection
            .prepare_cached(
                "INSERT OR REPLACE INTO file(id, path, language, modification_time, indexed, complete, line_count)
                 VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            )?
            .execute(params![
                node_id,
                data.file_path,
                data.language,
                data.modification_time,
                data.indexed,
                data.complete,
                data.line_count,
            ])?;
        Ok(node_id)
    }

    /// Updates the language column of an existing file row in place. Does
    /// not touch `add_file`'s `INSERT OR REPLACE` path, which would blank
    /// out the row's other columns if reused here.
    pub fn set_file_language(&self, file_node_id: i64, language: &str) -> Result<()> {
        self.connection
            .prepare_cached("UPDATE file SET language = ?1 WHERE id = ?2;")?
            .execute(params![language, file_node_id])?;
        Ok(())
    }

    pub fn set_file_content(&self, file_node_id: i64, content: &str) -> Result<()> {
        self.connection
            .prepare_cached("INSERT OR REPLACE INTO filecontent(id, content) VALUES(?1, ?2);")?
            .execute(params![file_node_id, content])?;
        Ok(())
    }

    pub fn add_edge(&self, kind: i32, source_id: i64, target_id: i64) -> Result<i64> {
        if let Some(id) = self
            .connection
            .prepare_cached(
                "SELECT id FROM edge WHERE type = ?1 AND source_node_id = ?2 AND target_node_id = ?3 LIMIT 1;",
            )?
            .query_row(params![kind, source_id, target_id], |row| row.get(0))
            .optional()?
        {
            return Ok(id);
        }

        let id = self.insert_element()?;
        self.connection
            .prepare_cached("INSERT INTO edge(id, type, source_node_id, target_node_id) VALUES(?1, ?2, ?3, ?4);")?
            .execute(params![id, kind, source_id, target_id])?;
        Ok(id)
    }

    pub fn add_local_symbol(&self, name: &str) -> Result<i64> {
        if let Some(id) = self
            .connection
            .prepare_cached("SELECT id FROM local_symbol WHERE name = ?1 LIMIT 1;")?
            .query_row(params![name], |row| row.get(0))
            .optional()?
        {
            return Ok(id);
        }

        let id = self.insert_element()?;
        self.connection
            .prepare_cached("INSERT INTO local_symbol(id, name) VALUES(?1, ?2);")?
            .execute(params![id, name])?;
        Ok(id)
    }

    pub fn add_source_location(&self, data: &StorageSourceLocationData) -> Result<i64> {
        if let Some(id) = self
            .connection
            .prepare_cached(
                "SELECT id FROM source_location
                 WHERE file_node_id = ?1 AND start_line = ?2 AND start_column = ?3
                   AND end_line = ?4 AND end_column = ?5 AND type = ?6 LIMIT 1;",
            )?
            .query_row(
                params![
                    data.file_node_id,
                    data.start_line,
                    data.start_col,
                    data.end_line,
                    data.end_col,
                    data.kind.to_i32(),
                ],
                |row| row.get(0),
            )
            .optional()?
        {
            return Ok(id);
        }

        self.connection
            .prepare_cached(
                "INSERT INTO source_location(file_node_id, start_line, start_column, end_line, end_column, type)
                 VALUES(?1, ?2, ?3, ?4, ?5, ?6);",
            )?
            .execute(params![
                data.file_node_id,
                data.start_line,
                data.start_col,
                data.end_line,
                data.end_col,
                data.kind.to_i32(),
            ])?;
        Ok(self.connection.last_insert_rowid())
    }

    pub fn add_occurrence(&self, element_id: i64, source_location_id: i64) -> Result<()> {
        self.connection
            .prepare_cached("INSERT OR IGNORE INTO occurrence(element_id, source_location_id) VALUES(?1, ?2);")?
            .execute(params![element_id, source_location_id])?;
        Ok(())
    }

    pub fn add_element_component(&self, element_id: i64, kind: ElementComponentKind, data: &str) -> Result<i64> {
        self.connection
            .prepare_cached("INSERT INTO element_component(element_id, type, data) VALUES(?1, ?2, ?3);")?
            .execute(params![element_id, kind.to_i32(), data])?;
        Ok(self.connection.last_insert_rowid())
    }

    pub fn set_component_access(&self, node_id: i64, kind: i32) -> Result<()> {
        self.connection
            .prepare_cached("INSERT OR REPLACE INTO component_access(node_id, type) VALUES(?1, ?2);")?
            .execute(params![node_id, kind])?;
        Ok(())
    }

    /// Records an error, deduplicated on `(message, fatal)`. When a source
    /// range is supplied, a location and occurrence are created alongside
    /// it so the error shows up at the right place in the exploration
    /// tool, matching how every other locatable element is recorded.
    pub fn add_error(&self, data: &StorageErrorData) -> Result<i64> {
        if let Some(id) = self
            .connection
            .prepare_cached("SELECT id FROM error WHERE message = ?1 AND fatal = ?2 LIMIT 1;")?
            .query_row(params![data.message, data.fatal], |row| row.get(0))
            .optional()?
        {
            return Ok(id);
        }

        let id = self.insert_element()?;
        self.connection
            .prepare_cached(
                "INSERT INTO error(id, message, fatal, indexed, translation_unit) VALUES(?1, ?2, ?3, ?4, ?5);",
            )?
            .execute(params![
                id,
                data.message,
                data.fatal,
                data.indexed,
                data.translation_unit,
            ])?;

        if data.file_node_id != 0 {
            let location_id = self.add_source_location(&StorageSourceLocationData {
                file_node_id: data.file_node_id,
                start_line: data.start_line,
                start_col: data.start_col,
                end_line: data.end_line,
                end_col: data.end_col,
                kind: LocationKind::IndexerError,
            })?;
            self.add_occurrence(id, location_id)?;
        }

        Ok(id)
    }

    // -- Bulk read accessors used by the integration test harness --

    pub fn all_node_kinds(&self) -> Result<Vec<(i64, String, i32)>> {
        self.collect_rows("SELECT id, serialized_name, type FROM node;", |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })
    }

    pub fn all_edges(&self) -> Result<Vec<(i64, i32, i64, i64)>> {
        self.collect_rows(
            "SELECT id, type, source_node_id, target_node_id FROM edge;",
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
    }

    pub fn all_files(&self) -> Result<Vec<(i64, String)>> {
        self.collect_rows("SELECT id, path FROM file;", |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
    }

    pub fn all_symbols(&self) -> Result<Vec<(i64, i32)>> {
        self.collect_rows("SELECT id, definition_kind FROM symbol;", |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
    }

    pub fn all_local_symbols(&self) -> Result<Vec<(i64, String)>> {
        self.collect_rows("SELECT id, name FROM local_symbol;", |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
    }

    pub fn all_source_locations(&self) -> Result<Vec<(i64, i64, i32, i32, i32, i32, i32)>> {
        self.collect_rows(
            "SELECT id, file_node_id, start_line, start_column, end_line, end_column, type FROM source_location;",
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            },
        )
    }

    pub fn all_occurrences(&self) -> Result<Vec<(i64, i64)>> {
        self.collect_rows(
            "SELECT element_id, source_location_id FROM occurrence;",
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
    }

    pub fn all_errors(&self) -> Result<Vec<(i64, String, bool)>> {
        self.collect_rows("SELECT id, message, fatal FROM error;", |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })
    }

    fn collect_rows<T>(
        &self,
        query: &str,
        map: impl FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let mut statement = self.connection.prepare_cached(query)?;
        let rows = statement.query_map([], map)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::NodeKind;

    fn setup() -> Storage {
        let storage = Storage::in_memory().unwrap();
        storage.setup_database().unwrap();
        storage
    }

    #[test]
    fn fresh_database_is_empty_and_stamped() {
        let storage = setup();
        assert!(storage.is_empty().unwrap());
        assert_eq!(storage.loaded_version().unwrap(), Some(SUPPORTED_DATABASE_VERSION));
        assert!(storage.is_compatible().unwrap());
    }

    #[test]
    fn add_node_deduplicates_by_serialized_name() {
        let storage = setup();
        let a = storage.add_node("foo", NodeKind::Class).unwrap();
        let b = storage.add_node("foo", NodeKind::Class).unwrap();
        assert_eq!(a, b);
        assert!(!storage.is_empty().unwrap());
    }

    #[test]
    fn add_node_refines_unknown_placeholder_kind() {
        let storage = setup();
        let placeholder = storage.add_node("ns", NodeKind::Unknown).unwrap();
        let refined = storage.add_node("ns", NodeKind::Namespace).unwrap();
        assert_eq!(placeholder, refined);
        let kinds = storage.all_node_kinds().unwrap();
        let row = kinds.iter().find(|(id, _, _)| *id == refined).unwrap();
        assert_eq!(row.2, NodeKind::Namespace.to_i32());
    }

    #[test]
    fn add_symbol_never_downgrades_explicit_to_implicit() {
        let storage = setup();
        let node_id = storage.add_node("foo", NodeKind::Function).unwrap();
        storage.add_symbol(node_id, DefinitionKind::Explicit).unwrap();
        storage.add_symbol(node_id, DefinitionKind::Implicit).unwrap();
        let symbols = storage.all_symbols().unwrap();
        assert_eq!(symbols, vec![(node_id, DefinitionKind::Explicit.to_i32())]);
    }

    #[test]
    fn add_edge_deduplicates_by_source_target_kind() {
        let storage = setup();
        let a = storage.add_node("a", NodeKind::Class).unwrap();
        let b = storage.add_node("b", NodeKind::Class).unwrap();
        let e1 = storage.add_edge(crate::kind::EdgeKind::Call.to_i32(), a, b).unwrap();
        let e2 = storage.add_edge(crate::kind::EdgeKind::Call.to_i32(), a, b).unwrap();
        assert_eq!(e1, e2);
        assert_eq!(storage.all_edges().unwrap().len(), 1);
    }

    #[test]
    fn add_source_location_deduplicates_by_full_tuple() {
        let storage = setup();
        let file_id = storage.add_node("f.rs", NodeKind::File).unwrap();
        let data = StorageSourceLocationData {
            file_node_id: file_id,
            start_line: 1,
            start_col: 1,
            end_line: 1,
            end_col: 5,
            kind: LocationKind::Token,
        };
        let id1 = storage.add_source_location(&data).unwrap();
        let id2 = storage.add_source_location(&data).unwrap();
        assert_eq!(id1, id2);
    }

    #[test]
    fn add_occurrence_is_idempotent() {
        let storage = setup();
        let file_id = storage.add_node("f.rs", NodeKind::File).unwrap();
        let location_id = storage
            .add_source_location(&StorageSourceLocationData {
                file_node_id: file_id,
                start_line: 1,
                start_col: 1,
                end_line: 1,
                end_col: 2,
                kind: LocationKind::Token,
            })
            .unwrap();
        storage.add_occurrence(file_id, location_id).unwrap();
        storage.add_occurrence(file_id, location_id).unwrap();
        assert_eq!(storage.all_occurrences().unwrap().len(), 1);
    }

    #[test]
    fn add_error_with_location_creates_occurrence() {
        let storage = setup();
        let file_id = storage.add_node("f.rs", NodeKind::File).unwrap();
        let error_id = storage
            .add_error(&StorageErrorData {
                message: "parse failure".into(),
                fatal: true,
                indexed: true,
                translation_unit: "f.rs".into(),
                file_node_id: file_id,
                start_line: 3,
                start_col: 1,
                end_line: 3,
                end_col: 10,
            })
            .unwrap();
        let occurrences = storage.all_occurrences().unwrap();
        assert!(occurrences.iter().any(|(element_id, _)| *element_id == error_id));
    }

    #[test]
    fn add_error_deduplicates_by_message_and_fatal() {
        let storage = setup();
        let data = StorageErrorData {
            message: "oops".into(),
            fatal: false,
            indexed: true,
            translation_unit: String::new(),
            file_node_id: 0,
            start_line: 0,
            start_col: 0,
            end_line: 0,
            end_col: 0,
        };
        let a = storage.add_error(&data).unwrap();
        let b = storage.add_error(&data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn clear_database_empties_every_table() {
        let storage = setup();
        storage.add_node("foo", NodeKind::Class).unwrap();
        storage.clear_database().unwrap();
        assert!(storage.is_empty().unwrap());
    }

    #[test]
    fn project_settings_text_round_trips() {
        let storage = setup();
        assert_eq!(storage.project_settings_text().unwrap(), None);
        storage.set_project_settings_text("{}").unwrap();
        assert_eq!(storage.project_settings_text().unwrap(), Some("{}".to_string()));
    }
}
