//! SQL schema definition.
//!
//! Table shapes and index set are carried over verbatim from the original
//! storage engine's `setup()` so that files this crate writes stay
//! byte-for-byte readable by the external exploration tool.

/// Schema/format version this crate writes. A database whose `meta` table
/// reports a different value is rejected as incompatible rather than
/// silently migrated.
pub const SUPPORTED_DATABASE_VERSION: i32 = 25;

pub const CREATE_META_TABLE: &str = "
CREATE TABLE IF NOT EXISTS meta(
    id INTEGER,
    key TEXT,
    value TEXT,
    PRIMARY KEY(id)
);";

pub const CREATE_ELEMENT_TABLE: &str = "
CREATE TABLE IF NOT EXISTS element(
    id INTEGER,
    PRIMARY KEY(id)
);";

pub const CREATE_ELEMENT_COMPONENT_TABLE: &str = "
CREATE TABLE IF NOT EXISTS element_component(
    id INTEGER,
    element_id INTEGER,
    type INTEGER,
    data TEXT,
    PRIMARY KEY(id),
    FOREIGN KEY(element_id) REFERENCES element(id) ON DELETE CASCADE
);";

pub const CREATE_EDGE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS edge(
    id INTEGER NOT NULL,
    type INTEGER NOT NULL,
    source_node_id INTEGER NOT NULL,
    target_node_id INTEGER NOT NULL,
    PRIMARY KEY(id),
    FOREIGN KEY(id) REFERENCES element(id) ON DELETE CASCADE,
    FOREIGN KEY(source_node_id) REFERENCES node(id) ON DELETE CASCADE,
    FOREIGN KEY(target_node_id) REFERENCES node(id) ON DELETE CASCADE
);";

pub const CREATE_NODE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS node(
    id INTEGER NOT NULL,
    type INTEGER NOT NULL,
    serialized_name TEXT,
    PRIMARY KEY(id),
    FOREIGN KEY(id) REFERENCES element(id) ON DELETE CASCADE
);";

pub const CREATE_NODE_SERIALIZED_NAME_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS node_serialized_name_index ON node(serialized_name);";

pub const CREATE_SYMBOL_TABLE: &str = "
CREATE TABLE IF NOT EXISTS symbol(
    id INTEGER NOT NULL,
    definition_kind INTEGER NOT NULL,
    PRIMARY KEY(id),
    FOREIGN KEY(id) REFERENCES node(id) ON DELETE CASCADE
);";

pub const CREATE_FILE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS file(
    id INTEGER NOT NULL,
    path TEXT,
    language TEXT,
    modification_time TEXT,
    indexed INTEGER,
    complete INTEGER,
    line_count INTEGER,
    PRIMARY KEY(id),
    FOREIGN KEY(id) REFERENCES node(id) ON DELETE CASCADE
);";

pub const CREATE_FILECONTENT_TABLE: &str = "
CREATE TABLE IF NOT EXISTS filecontent(
    id INTEGER,
    content TEXT,
    FOREIGN KEY(id) REFERENCES file(id) ON DELETE CASCADE
);";

pub const CREATE_LOCAL_SYMBOL_TABLE: &str = "
CREATE TABLE IF NOT EXISTS local_symbol(
    id INTEGER NOT NULL,
    name TEXT,
    PRIMARY KEY(id),
    FOREIGN KEY(id) REFERENCES element(id) ON DELETE CASCADE
);";

pub const CREATE_LOCAL_SYMBOL_NAME_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS local_symbol_name_index ON local_symbol(name);";

pub const CREATE_SOURCE_LOCATION_TABLE: &str = "
CREATE TABLE IF NOT EXISTS source_location(
    id INTEGER NOT NULL,
    file_node_id INTEGER,
    start_line INTEGER,
    start_column INTEGER,
    end_line INTEGER,
    end_column INTEGER,
    type INTEGER,
    PRIMARY KEY(id),
    FOREIGN KEY(file_node_id) REFERENCES node(id) ON DELETE CASCADE
);";

pub const CREATE_OCCURRENCE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS occurrence(
    element_id INTEGER NOT NULL,
    source_location_id INTEGER NOT NULL,
    PRIMARY KEY(element_id, source_location_id),
    FOREIGN KEY(element_id) REFERENCES element(id) ON DELETE CASCADE,
    FOREIGN KEY(source_location_id) REFERENCES source_location(id) ON DELETE CASCADE
);";

pub const CREATE_COMPONENT_ACCESS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS component_access(
    node_id INTEGER NOT NULL,
    type INTEGER NOT NULL,
    PRIMARY KEY(node_id),
    FOREIGN KEY(node_id) REFERENCES node(id) ON DELETE CASCADE
);";

pub const CREATE_ERROR_TABLE: &str = "
CREATE TABLE IF NOT EXISTS error(
    id INTEGER NOT NULL,
    message TEXT,
    fatal INTEGER,
    indexed INTEGER,
    translation_unit TEXT,
    PRIMARY KEY(id),
    FOREIGN KEY(id) REFERENCES element(id) ON DELETE CASCADE
);";

/// In creation order: every table before any index that references it.
pub const CREATE_TABLE_STATEMENTS: &[&str] = &[
    CREATE_META_TABLE,
    CREATE_ELEMENT_TABLE,
    CREATE_ELEMENT_COMPONENT_TABLE,
    CREATE_NODE_TABLE,
    CREATE_SYMBOL_TABLE,
    CREATE_EDGE_TABLE,
    CREATE_FILE_TABLE,
    CREATE_FILECONTENT_TABLE,
    CREATE_LOCAL_SYMBOL_TABLE,
    CREATE_SOURCE_LOCATION_TABLE,
    CREATE_OCCURRENCE_TABLE,
    CREATE_COMPONENT_ACCESS_TABLE,
    CREATE_ERROR_TABLE,
];

pub const CREATE_INDEX_STATEMENTS: &[&str] = &[
    CREATE_NODE_SERIALIZED_NAME_INDEX,
    CREATE_LOCAL_SYMBOL_NAME_INDEX,
];
