//! The public write-only façade over the storage engine.
//!
//! Every public method here catches its own errors: a failure sets
//! [`IndexWriter::last_error`] and returns a sentinel (`false`/`0`) instead
//! of propagating a `Result`, mirroring the exception-to-sentinel boundary
//! the external tool's embedders expect from this crate's original.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{error, instrument, warn};

use crate::kind::{
    DefinitionKind, EdgeKind, ElementComponentKind, LocationKind, NodeKind, ReferenceKind,
    SymbolKind,
};
use crate::name::NameHierarchy;
use crate::storage::{Storage, StorageErrorData, StorageFileData, StorageSourceLocationData};
use crate::util;

const PROJECT_FILE_EXTENSION: &str = "srctrlprj";

const PROJECT_FILE_TEMPLATE: &str = "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n<config>\n    <version>0</version>\n</config>\n";

/// Handle through which a client populates a single database file.
///
/// Not `Send`/`Sync`: the writer owns one connection and is used from a
/// single thread for the lifetime of an indexing run.
pub struct IndexWriter {
    database_path: PathBuf,
    storage: Option<Storage>,
    last_error: RefCell<String>,
}

impl Default for IndexWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexWriter {
    pub fn new() -> Self {
        IndexWriter {
            database_path: PathBuf::new(),
            storage: None,
            last_error: RefCell::new(String::new()),
        }
    }

    pub fn get_supported_database_version() -> i32 {
        crate::storage::SUPPORTED_DATABASE_VERSION
    }

    /// `"vX.dbY"`, the version string embedded in generated project files.
    pub fn get_version_string() -> String {
        format!("v0.db{}", crate::storage::SUPPORTED_DATABASE_VERSION)
    }

    pub fn get_last_error(&self) -> String {
        self.last_error.borrow().clone()
    }

    pub fn clear_last_error(&self) {
        self.last_error.borrow_mut().clear();
    }

    fn fail(&self, context: &str, err: impl std::fmt::Display) -> bool {
        let message = format!("{context}: {err}");
        error!("{message}");
        *self.last_error.borrow_mut() = message;
        false
    }

    fn storage(&self) -> Option<&Storage> {
        self.storage.as_ref()
    }

    /// Opens (creating if necessary) the database at `path` plus its
    /// `.srctrlprj` sidecar, and brings the schema up to date.
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn open(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.open_inner(path) {
            Ok(()) => true,
            Err(e) => self.fail("failed to open database", e),
        }
    }

    fn open_inner(&mut self, path: &Path) -> crate::error::Result<()> {
        let storage = Storage::open(path)?;
        if !storage.is_compatible()? {
            let loaded = storage.loaded_version()?.unwrap_or(0);
            return Err(crate::error::IndexError::IncompatibleDatabase {
                loaded,
                supported: crate::storage::SUPPORTED_DATABASE_VERSION,
            });
        }
        storage.setup_database()?;

        self.database_path = path.to_path_buf();
        self.storage = Some(storage);
        self.create_or_reset_project_file()?;
        Ok(())
    }

    fn project_file_path(&self) -> PathBuf {
        self.database_path.with_extension(PROJECT_FILE_EXTENSION)
    }

    fn create_or_reset_project_file(&self) -> crate::error::Result<()> {
        std::fs::write(self.project_file_path(), PROJECT_FILE_TEMPLATE)?;
        Ok(())
    }

    /// Flushes pending work and releases the underlying connection.
    pub fn close(&mut self) -> bool {
        if let Some(storage) = self.storage.take() {
            if let Err(e) = storage.optimize() {
                warn!("optimize before close failed: {e}");
            }
        }
        true
    }

    /// Deletes every row without touching the schema or sidecar file.
    pub fn clear(&mut self) -> bool {
        let Some(storage) = self.storage() else {
            return self.fail("clear", "database is not open");
        };
        match storage.clear_database() {
            Ok(()) => true,
            Err(e) => self.fail("clear", e),
        }
    }

    pub fn begin_transaction(&self) -> bool {
        match self.storage().map(Storage::begin_transaction) {
            Some(Ok(())) => true,
            Some(Err(e)) => self.fail("begin transaction", e),
            None => self.fail("begin transaction", "database is not open"),
        }
    }

    pub fn commit_transaction(&self) -> bool {
        match self.storage().map(Storage::commit_transaction) {
            Some(Ok(())) => true,
            Some(Err(e)) => self.fail("commit transaction", e),
            None => self.fail("commit transaction", "database is not open"),
        }
    }

    pub fn rollback_transaction(&self) -> bool {
        match self.storage().map(Storage::rollback_transaction) {
            Some(Ok(())) => true,
            Some(Err(e)) => self.fail("rollback transaction", e),
            None => self.fail("rollback transaction", "database is not open"),
        }
    }

    pub fn optimize_database_memory(&self) -> bool {
        match self.storage().map(Storage::optimize) {
            Some(Ok(())) => true,
            Some(Err(e)) => self.fail("optimize", e),
            None => self.fail("optimize", "database is not open"),
        }
    }

    /// Inserts `name` and every ancestor prefix of it, connecting each
    /// parent to its child with an `EdgeKind::Member` edge, and returns the
    /// id of the full name's node. Ancestors not already present are
    /// created as `NodeKind::Unknown` placeholders; a later call that
    /// names the same hierarchy with a concrete kind refines the row in
    /// place rather than creating a duplicate. Fails (returns `0`) if
    /// `name` has no elements.
    pub fn record_symbol(&self, name: &NameHierarchy) -> i64 {
        match self.record_symbol_inner(name) {
            Ok(id) => id,
            Err(e) => {
                self.fail("record symbol", e);
                0
            }
        }
    }

    fn record_symbol_inner(&self, name: &NameHierarchy) -> crate::error::Result<i64> {
        if name.elements.is_empty() {
            return Err(crate::error::IndexError::BadInput(
                "name hierarchy has no elements".to_string(),
            ));
        }

        let storage = self.require_storage()?;
        let mut parent_id: Option<i64> = None;
        let mut node_id = 0;
        for depth in 1..=name.elements.len() {
            let prefix = name.prefix(depth);
            node_id = storage.add_node(&prefix.to_database_string(), NodeKind::Unknown)?;
            if let Some(parent_id) = parent_id {
                storage.add_edge(EdgeKind::Member.to_i32(), parent_id, node_id)?;
            }
            parent_id = Some(node_id);
        }
        Ok(node_id)
    }

    pub fn record_symbol_kind(&self, id: i64, kind: SymbolKind) -> bool {
        self.with_storage("record symbol kind", |storage| {
            storage.set_node_kind(id, kind.to_node_kind())
        })
    }

    pub fn record_symbol_definition_kind(&self, id: i64, kind: DefinitionKind) -> bool {
        self.with_storage("record symbol definition kind", |storage| {
            storage.add_symbol(id, kind)
        })
    }

    pub fn record_symbol_location(&self, id: i64, location: &SourceRange) -> bool {
        self.record_location(id, location, LocationKind::Token)
    }

    pub fn record_symbol_scope_location(&self, id: i64, location: &SourceRange) -> bool {
        self.record_location(id, location, LocationKind::Scope)
    }

    pub fn record_symbol_signature_location(&self, id: i64, location: &SourceRange) -> bool {
        self.record_location(id, location, LocationKind::Signature)
    }

    /// Creates (or finds) a `source_location` row for `location` and binds
    /// `element_id` to it via an occurrence.
    fn record_location(&self, element_id: i64, location: &SourceRange, kind: LocationKind) -> bool {
        self.with_storage("record location", |storage| {
            let location_id = storage.add_source_location(&StorageSourceLocationData {
                file_node_id: location.file_node_id,
                start_line: location.start_line,
                start_col: location.start_column,
                end_line: location.end_line,
                end_col: location.end_column,
                kind,
            })?;
            storage.add_occurrence(element_id, location_id)
        })
    }

    /// Creates a location with no occurrence, for ranges that exist purely
    /// to mark a span rather than bind it to an element.
    fn record_location_only(&self, location: &SourceRange, kind: LocationKind) -> bool {
        self.with_storage("record location", |storage| {
            storage
                .add_source_location(&StorageSourceLocationData {
                    file_node_id: location.file_node_id,
                    start_line: location.start_line,
                    start_col: location.start_column,
                    end_line: location.end_line,
                    end_col: location.end_column,
                    kind,
                })
                .map(|_| ())
        })
    }

    /// Records an edge from `ctx` to `tgt`, deduplicated on
    /// `(ctx, tgt, kind)`. Fails (returns `0`) if either id is `0`.
    pub fn record_reference(&self, ctx: i64, tgt: i64, kind: ReferenceKind) -> i64 {
        if ctx == 0 || tgt == 0 {
            self.fail("record reference", "context and target ids must be non-zero");
            return 0;
        }
        match self.with_storage_result("record reference", |storage| {
            storage.add_edge(kind.to_edge_kind().to_i32(), ctx, tgt)
        }) {
            Some(id) => id,
            None => 0,
        }
    }

    /// Records a reference whose target could not be resolved, pointing it
    /// at a shared `"unsolved symbol"` sentinel node instead of a real
    /// symbol, and attaches `location` to it at `LocationKind::Unsolved`.
    pub fn record_reference_to_unsolved_symbol(&self, ctx: i64, kind: ReferenceKind, location: &SourceRange) -> i64 {
        if ctx == 0 {
            self.fail("record reference to unsolved symbol", "context id must be non-zero");
            return 0;
        }

        let unsolved = NameHierarchy::single("", "unsolved symbol");
        let edge_id = match self.with_storage_result("record reference to unsolved symbol", |storage| {
            let unsolved_id = storage.add_node(&unsolved.to_database_string(), NodeKind::Unknown)?;
            storage.add_edge(kind.to_edge_kind().to_i32(), ctx, unsolved_id)
        }) {
            Some(id) => id,
            None => return 0,
        };

        if !self.with_storage("record reference to unsolved symbol", |storage| {
            let location_id = storage.add_source_location(&StorageSourceLocationData {
                file_node_id: location.file_node_id,
                start_line: location.start_line,
                start_col: location.start_column,
                end_line: location.end_line,
                end_col: location.end_column,
                kind: LocationKind::Unsolved,
            })?;
            storage.add_occurrence(edge_id, location_id)
        }) {
            return 0;
        }
        edge_id
    }

    pub fn record_reference_location(&self, edge_id: i64, location: &SourceRange) -> bool {
        self.record_location(edge_id, location, LocationKind::Token)
    }

    pub fn record_reference_is_ambiguous(&self, edge_id: i64) -> bool {
        self.with_storage("record reference is ambiguous", |storage| {
            storage
                .add_element_component(edge_id, ElementComponentKind::IsAmbiguous, "")
                .map(|_| ())
        })
    }

    pub fn record_qualifier_location(&self, id: i64, location: &SourceRange) -> bool {
        self.record_location(id, location, LocationKind::Qualifier)
    }

    /// Comments have no dedicated location kind in this schema; they are
    /// recorded as a kind-only atomic range, matching how other non-owning
    /// ranges (e.g. multi-line collapsed regions) are stored.
    pub fn record_comment_location(&self, location: &SourceRange) -> bool {
        self.record_location_only(location, LocationKind::AtomicRange)
    }

    pub fn record_atomic_source_range(&self, location: &SourceRange) -> bool {
        self.record_location_only(location, LocationKind::AtomicRange)
    }

    /// Inserts a file node from its path, with `modification_time` stamped
    /// at call time and `line_count`/content derived by reading the file
    /// from disk.
    pub fn record_file(&self, path: impl AsRef<Path>) -> i64 {
        match self.record_file_inner(path.as_ref()) {
            Ok(id) => id,
            Err(e) => {
                self.fail("record file", e);
                0
            }
        }
    }

    fn record_file_inner(&self, path: &Path) -> crate::error::Result<i64> {
        let storage = self.require_storage()?;
        let path_string = path.to_string_lossy().to_string();
        let content = util::read_file(path)?;
        let line_count = util::line_count(&content) as i32;

        let file_id = storage.add_file(&StorageFileData {
            name: path_string.clone(),
            serialized_name: NameHierarchy::single("/", path_string.as_str()).to_database_string(),
            file_path: path_string,
            language: String::new(),
            modification_time: util::format_date_time(SystemTime::now()),
            indexed: true,
            complete: true,
            line_count,
        })?;
        storage.set_file_content(file_id, &content)?;
        Ok(file_id)
    }

    pub fn record_file_language(&self, id: i64, language: &str) -> bool {
        self.with_storage("record file language", |storage| {
            storage.set_file_language(id, language)
        })
    }

    pub fn record_local_symbol(&self, name: &str) -> i64 {
        match self.with_storage_result("record local symbol", |storage| storage.add_local_symbol(name)) {
            Some(id) => id,
            None => 0,
        }
    }

    pub fn record_local_symbol_location(&self, id: i64, location: &SourceRange) -> bool {
        self.record_location(id, location, LocationKind::LocalSymbol)
    }

    /// Inserts the error row (deduplicated on `(message, fatal)`) with
    /// `indexed=true` and an empty `translation_unit`, then attaches
    /// `location` at `LocationKind::IndexerError`.
    pub fn record_error(&self, message: &str, fatal: bool, location: &SourceRange) -> bool {
        self.with_storage("record error", |storage| {
            storage.add_error(&StorageErrorData {
                message: message.to_string(),
                fatal,
                indexed: true,
                translation_unit: String::new(),
                file_node_id: location.file_node_id,
                start_line: location.start_line,
                start_col: location.start_column,
                end_line: location.end_line,
                end_col: location.end_column,
            })
            .map(|_| ())
        })
    }

    fn require_storage(&self) -> crate::error::Result<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| crate::error::IndexError::Usage("database is not open".to_string()))
    }

    fn with_storage(&self, context: &str, f: impl FnOnce(&Storage) -> crate::error::Result<()>) -> bool {
        match self.require_storage().and_then(|s| f(s)) {
            Ok(()) => true,
            Err(e) => self.fail(context, e),
        }
    }

    fn with_storage_result<T>(&self, context: &str, f: impl FnOnce(&Storage) -> crate::error::Result<T>) -> Option<T> {
        match self.require_storage().and_then(|s| f(s)) {
            Ok(v) => Some(v),
            Err(e) => {
                self.fail(context, e);
                None
            }
        }
    }
}

/// A half-open `[start, end]` range of line/column positions within a
/// single file, one-indexed like the external tool's own ranges. `file_node_id`
/// is the id returned by [`IndexWriter::record_file`].
#[derive(Debug, Clone)]
pub struct SourceRange {
    pub file_node_id: i64,
    pub start_line: i32,
    pub start_column: i32,
    pub end_line: i32,
    pub end_column: i32,
}

impl SourceRange {
    pub fn new(file_node_id: i64, start_line: i32, start_column: i32, end_line: i32, end_column: i32) -> Self {
        SourceRange {
            file_node_id,
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }
}
